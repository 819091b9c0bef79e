use super::html;

#[test]
fn type_1_script_tag_ends_at_closing_tag() {
    html(
        concat!(
            "<script>\n",
            "foo\n",
            "</script>\n",
            "\n",
            "bar\n"
        ),
        concat!("<script>\n", "foo\n", "</script>\n", "<p>bar</p>\n"),
    );
}

#[test]
fn type_2_comment() {
    html(
        concat!("<!-- foo -->\n", "\n", "bar\n"),
        concat!("<!-- foo -->\n", "<p>bar</p>\n"),
    );
}

#[test]
fn type_6_block_tag_ends_at_blank_line() {
    html(
        concat!(
            "<table>\n",
            "  <tr>\n",
            "    <td>hi</td>\n",
            "  </tr>\n",
            "</table>\n",
            "\n",
            "okay.\n"
        ),
        concat!(
            "<table>\n",
            "  <tr>\n",
            "    <td>hi</td>\n",
            "  </tr>\n",
            "</table>\n",
            "<p>okay.</p>\n"
        ),
    );
}

#[test]
fn type_7_requires_blank_line_before_it_after_paragraph() {
    // A type-7 HTML block can't interrupt a paragraph.
    html(
        concat!("foo\n", "<div>\n"),
        concat!("<p>foo\n<div></p>\n"),
    );
}

#[test]
fn type_7_after_blank_line() {
    html(
        concat!("\n", "<div foo=\"bar\">\n", "\n", "baz\n"),
        concat!("<div foo=\"bar\">\n", "<p>baz</p>\n"),
    );
}

#[test]
fn html_block_does_not_parse_inline_markdown() {
    html(
        concat!("<div>\n", "*not emphasis*\n", "</div>\n"),
        concat!("<div>\n", "*not emphasis*\n", "</div>\n"),
    );
}

#[test]
fn html_block_inside_block_quote() {
    html(
        concat!("> <div>\n", "> foo\n", "> </div>\n"),
        concat!("<blockquote>\n", "<div>\nfoo\n</div>\n", "</blockquote>\n"),
    );
}
