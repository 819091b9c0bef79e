use super::html;

#[test]
fn simple_emphasis() {
    html("*foo*\n", "<p><em>foo</em></p>\n");
    html("_foo_\n", "<p><em>foo</em></p>\n");
}

#[test]
fn simple_strong() {
    html("**foo**\n", "<p><strong>foo</strong></p>\n");
    html("__foo__\n", "<p><strong>foo</strong></p>\n");
}

#[test]
fn nested_strong_in_emphasis() {
    html(
        "*foo **bar** baz*\n",
        "<p><em>foo <strong>bar</strong> baz</em></p>\n",
    );
}

#[test]
fn rule_of_three() {
    // `*foo**bar**baz*` can't close the opening `*` against the first `**`
    // (that would need three marks' worth of `*`s to balance, the
    // "rule of 3"), so the `**` pair binds `bar` as strong and the lone
    // `*`s wrap the whole thing as emphasis.
    html(
        "*foo**bar**baz*\n",
        "<p><em>foo<strong>bar</strong>baz</em></p>\n",
    );
}

#[test]
fn intraword_underscore_emphasis_is_not_allowed() {
    html("foo_bar_baz\n", "<p>foo_bar_baz</p>\n");
}

#[test]
fn intraword_asterisk_emphasis_is_allowed() {
    html("foo*bar*baz\n", "<p>foo<em>bar</em>baz</p>\n");
}

#[test]
fn left_flanking_only_opens() {
    // A `_` preceded by a letter and followed by whitespace is not
    // left-flanking, so it can't open.
    html("foo _bar_\n", "<p>foo <em>bar</em></p>\n");
}

#[test]
fn unmatched_delimiters_render_literally() {
    html("*foo\n", "<p>*foo</p>\n");
    html("**foo*\n", "<p>*<em>foo</em></p>\n");
}

#[test]
fn emphasis_cannot_cross_a_code_span() {
    html("*foo `bar*` baz*\n", "<p>*foo <code>bar*</code> baz*</p>\n");
}

#[test]
fn strong_inside_strong() {
    html(
        "**foo **bar** baz**\n",
        "<p><strong>foo **bar** baz</strong></p>\n",
    );
}
