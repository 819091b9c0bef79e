use super::html;

#[test]
fn tab_expands_to_next_four_column_stop_for_indented_code() {
    // A tab at the start of a line is worth as many columns as needed to
    // reach the next multiple of 4; one tab alone is enough to reach column
    // 4 and so satisfies the indented-code-block threshold.
    html("\tfoo\n", "<pre><code>foo\n</code></pre>\n");
}

#[test]
fn tab_with_partial_consumption_by_a_list_marker() {
    // The `-` marker plus one space consumes 2 columns, leaving a tab that
    // contributes 2 more columns to reach the next stop (column 4); that
    // still meets the item's required continuation indent of one column
    // past the marker, so `b` is ordinary paragraph content, not code.
    html(
        concat!("-\tfoo\n"),
        concat!("<ul>\n<li>foo</li>\n</ul>\n"),
    );
}

#[test]
fn tab_inside_paragraph_text_is_preserved_literally() {
    html("foo\tbar\n", "<p>foo\tbar</p>\n");
}

#[test]
fn mixed_spaces_and_tab_reach_code_indent() {
    html("  \tfoo\n", "<pre><code>foo\n</code></pre>\n");
}
