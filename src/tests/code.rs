use super::html;

#[test]
fn simple_code_span() {
    html("`foo`\n", "<p><code>foo</code></p>\n");
}

#[test]
fn code_span_strips_one_leading_and_trailing_space() {
    html("` foo `\n", "<p><code>foo</code></p>\n");
}

#[test]
fn code_span_with_longer_backtick_run_allows_single_backticks_inside() {
    html("``foo ` bar``\n", "<p><code>foo ` bar</code></p>\n");
}

#[test]
fn code_span_content_is_escaped() {
    html("`<a>`\n", "<p><code>&lt;a&gt;</code></p>\n");
}

#[test]
fn unmatched_backtick_run_is_literal() {
    html("`foo\n", "<p>`foo</p>\n");
}

#[test]
fn fenced_code_block_with_info_string() {
    html(
        concat!("```rust\n", "fn main() {}\n", "```\n"),
        concat!(
            "<pre><code class=\"language-rust\">fn main() {}\n",
            "</code></pre>\n"
        ),
    );
}

#[test]
fn fenced_code_block_info_string_only_first_word_used_as_class() {
    html(
        concat!("``` rust startline=3\n", "foo\n", "```\n"),
        concat!(
            "<pre><code class=\"language-rust\">foo\n",
            "</code></pre>\n"
        ),
    );
}

#[test]
fn fenced_code_block_content_is_escaped_and_not_parsed_as_markdown() {
    html(
        concat!("```\n", "<a *b*>\n", "```\n"),
        concat!("<pre><code>&lt;a *b*&gt;\n", "</code></pre>\n"),
    );
}

#[test]
fn tilde_fence() {
    html(
        concat!("~~~\n", "foo\n", "~~~\n"),
        concat!("<pre><code>foo\n", "</code></pre>\n"),
    );
}

#[test]
fn fenced_code_block_closing_fence_must_be_at_least_as_long() {
    html(
        concat!("````\n", "```\n", "aaa\n", "````\n"),
        concat!("<pre><code>```\naaa\n</code></pre>\n"),
    );
}

#[test]
fn unterminated_fence_runs_to_end_of_document() {
    html(
        concat!("```\n", "foo\n"),
        concat!("<pre><code>foo\n</code></pre>\n"),
    );
}

#[test]
fn indented_code_block() {
    html("    foo\n", "<pre><code>foo\n</code></pre>\n");
}

#[test]
fn indented_code_block_spans_multiple_lines() {
    html(
        concat!("    foo\n", "    bar\n"),
        "<pre><code>foo\nbar\n</code></pre>\n",
    );
}

#[test]
fn indented_code_block_preserves_internal_blank_lines() {
    html(
        concat!("    foo\n", "\n", "    bar\n"),
        "<pre><code>foo\n\nbar\n</code></pre>\n",
    );
}

#[test]
fn indented_code_block_trims_trailing_blank_lines() {
    html(
        concat!("    foo\n", "\n", "\n", "bar\n"),
        concat!("<pre><code>foo\n</code></pre>\n", "<p>bar</p>\n"),
    );
}

#[test]
fn four_spaces_inside_a_paragraph_is_not_code() {
    html(
        concat!("foo\n", "    bar\n"),
        concat!("<p>foo\nbar</p>\n"),
    );
}

#[test]
fn three_spaces_is_not_enough_for_indented_code() {
    html("   foo\n", "<p>foo</p>\n");
}
