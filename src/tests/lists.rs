use super::html;

#[test]
fn bullet_list_tight() {
    html(
        concat!("- a\n", "- b\n", "- c\n"),
        concat!(
            "<ul>\n",
            "<li>a</li>\n",
            "<li>b</li>\n",
            "<li>c</li>\n",
            "</ul>\n"
        ),
    );
}

#[test]
fn bullet_list_loose_when_items_separated_by_blank_lines() {
    html(
        concat!("- a\n", "\n", "- b\n", "\n", "- c\n"),
        concat!(
            "<ul>\n",
            "<li>\n<p>a</p>\n</li>\n",
            "<li>\n<p>b</p>\n</li>\n",
            "<li>\n<p>c</p>\n</li>\n",
            "</ul>\n"
        ),
    );
}

#[test]
fn ordered_list_with_explicit_start() {
    html(
        concat!("2. Hello.\n", "3. Hi.\n"),
        concat!(
            "<ol start=\"2\">\n",
            "<li>Hello.</li>\n",
            "<li>Hi.</li>\n",
            "</ol>\n"
        ),
    );
}

#[test]
fn ordered_list_starting_at_one_omits_start_attribute() {
    html(
        concat!("1. a\n", "2. b\n"),
        concat!("<ol>\n", "<li>a</li>\n", "<li>b</li>\n", "</ol>\n"),
    );
}

#[test]
fn ordered_list_with_paren_delimiter() {
    html(
        concat!("1) a\n", "2) b\n"),
        concat!("<ol>\n", "<li>a</li>\n", "<li>b</li>\n", "</ol>\n"),
    );
}

#[test]
fn different_bullet_characters_start_separate_lists() {
    html(
        concat!("- a\n", "+ b\n"),
        concat!(
            "<ul>\n<li>a</li>\n</ul>\n",
            "<ul>\n<li>b</li>\n</ul>\n"
        ),
    );
}

#[test]
fn list_item_with_multi_paragraph_content_is_loose() {
    html(
        concat!("- a\n", "\n", "  b\n"),
        concat!("<ul>\n", "<li>\n<p>a</p>\n<p>b</p>\n</li>\n", "</ul>\n"),
    );
}

#[test]
fn nested_list_inside_list_item() {
    html(
        concat!("- a\n", "  - b\n"),
        concat!(
            "<ul>\n",
            "<li>a\n<ul>\n<li>b</li>\n</ul>\n</li>\n",
            "</ul>\n"
        ),
    );
}

#[test]
fn blank_line_between_list_and_following_paragraph() {
    html(
        concat!("- a\n", "- b\n", "\n", "para\n"),
        concat!(
            "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n",
            "<p>para</p>\n"
        ),
    );
}

#[test]
fn empty_list_item() {
    html(
        concat!("-\n", "- a\n"),
        concat!("<ul>\n<li></li>\n<li>a</li>\n</ul>\n"),
    );
}
