use super::html;

#[test]
fn basic_document() {
    html(
        concat!(
            "My **document**.\n",
            "\n",
            "It's mine.\n",
            "\n",
            "> Yes.\n",
            "\n",
            "## Hi!\n",
            "\n",
            "Okay.\n"
        ),
        concat!(
            "<p>My <strong>document</strong>.</p>\n",
            "<p>It's mine.</p>\n",
            "<blockquote>\n",
            "<p>Yes.</p>\n",
            "</blockquote>\n",
            "<h2>Hi!</h2>\n",
            "<p>Okay.</p>\n"
        ),
    );
}

#[test]
fn atx_heading() {
    html(
        concat!("# h1\n", "foo\n", "## h2\n"),
        concat!("<h1>h1</h1>\n", "<p>foo</p>\n", "<h2>h2</h2>\n"),
    );
}

#[test]
fn atx_heading_closing_sequence_stripped() {
    html("# h1 #\n", "<h1>h1</h1>\n");
    html("## h2 ##\n", "<h2>h2</h2>\n");
}

#[test]
fn atx_heading_requires_space_after_hashes() {
    html("#5 bolt\n", "<p>#5 bolt</p>\n");
}

#[test]
fn setext_heading() {
    html(
        concat!("Hi\n", "==\n", "\n", "Ok\n", "-----\n"),
        concat!("<h1>Hi</h1>\n", "<h2>Ok</h2>\n"),
    );
}

#[test]
fn thematic_breaks() {
    html(
        concat!("---\n", "\n", "- - -\n", "\n", "\n", "_        _   _\n"),
        concat!("<hr />\n", "<hr />\n", "<hr />\n"),
    );
}

#[test]
fn thematic_break_not_a_setext_underline_after_paragraph() {
    // Three or more hyphens directly under text are a setext H2, not a
    // thematic break, so this must not produce two separate blocks.
    html("Foo\n---\n", "<h2>Foo</h2>\n");
}

#[test]
fn paragraphs_are_merged_across_soft_breaks() {
    html(
        concat!("aaa\n", "bbb\n"),
        concat!("<p>aaa\n", "bbb</p>\n"),
    );
}

#[test]
fn blank_lines_separate_paragraphs() {
    html(
        concat!("aaa\n", "\n", "bbb\n"),
        concat!("<p>aaa</p>\n", "<p>bbb</p>\n"),
    );
}

#[test]
fn block_quote_lazy_continuation() {
    // A blockquote's paragraph continues onto a following non-blank line
    // even without a repeated `>`.
    html(
        concat!("> foo\n", "bar\n"),
        concat!("<blockquote>\n", "<p>foo\nbar</p>\n", "</blockquote>\n"),
    );
}

#[test]
fn block_quote_laziness_stops_at_blank_line() {
    html(
        concat!("> foo\n", "\n", "bar\n"),
        concat!(
            "<blockquote>\n",
            "<p>foo</p>\n",
            "</blockquote>\n",
            "<p>bar</p>\n"
        ),
    );
}

#[test]
fn nested_block_quotes() {
    html(
        concat!("> > foo\n"),
        concat!(
            "<blockquote>\n",
            "<blockquote>\n",
            "<p>foo</p>\n",
            "</blockquote>\n",
            "</blockquote>\n"
        ),
    );
}

#[test]
fn hard_line_break_via_backslash() {
    html("foo\\\nbar\n", "<p>foo<br />\nbar</p>\n");
}

#[test]
fn hard_line_break_via_trailing_spaces() {
    html("foo  \nbar\n", "<p>foo<br />\nbar</p>\n");
}

#[test]
fn raw_html_block_passes_through_unescaped() {
    html(
        concat!("<div>\n", "*not emphasis*\n", "</div>\n"),
        concat!("<div>\n", "*not emphasis*\n", "</div>\n"),
    );
}

#[test]
fn raw_inline_html_passes_through_unescaped() {
    html("<span>hi</span>\n", "<p><span>hi</span></p>\n");
}

#[test]
fn backslash_escapes() {
    html("\\*not emphasis\\*\n", "<p>*not emphasis*</p>\n");
}

#[test]
fn html_entity_escaping_in_text() {
    html("1 < 2 & 3 > 0\n", "<p>1 &lt; 2 &amp; 3 &gt; 0</p>\n");
}

#[test]
fn empty_document() {
    html("", "");
}
