use super::html;

#[test]
fn inline_link() {
    html(
        "[link](/uri \"title\")\n",
        "<p><a href=\"/uri\" title=\"title\">link</a></p>\n",
    );
}

#[test]
fn inline_link_without_title() {
    html("[link](/uri)\n", "<p><a href=\"/uri\">link</a></p>\n");
}

#[test]
fn inline_link_with_empty_destination() {
    html("[link]()\n", "<p><a href=\"\">link</a></p>\n");
}

#[test]
fn full_reference_link() {
    html(
        concat!("[foo][bar]\n", "\n", "[bar]: /url \"title\"\n"),
        "<p><a href=\"/url\" title=\"title\">foo</a></p>\n",
    );
}

#[test]
fn collapsed_reference_link() {
    html(
        concat!("[foo][]\n", "\n", "[foo]: /url \"title\"\n"),
        "<p><a href=\"/url\" title=\"title\">foo</a></p>\n",
    );
}

#[test]
fn shortcut_reference_link() {
    html(
        concat!("[foo]\n", "\n", "[foo]: /url \"title\"\n"),
        "<p><a href=\"/url\" title=\"title\">foo</a></p>\n",
    );
}

#[test]
fn reference_labels_are_case_and_whitespace_insensitive() {
    html(
        concat!("[Foo]\n", "\n", "[foo]: /url\n"),
        "<p><a href=\"/url\">Foo</a></p>\n",
    );
}

#[test]
fn link_reference_definition_produces_no_output_of_its_own() {
    html("[foo]: /url \"title\"\n", "");
}

#[test]
fn unknown_reference_renders_as_literal_text() {
    html("[foo][bar]\n", "<p>[foo][bar]</p>\n");
}

#[test]
fn reference_definition_opener_with_no_destination_is_a_paragraph() {
    html("[foo]:\n", "<p>[foo]:</p>\n");
}

#[test]
fn image() {
    html(
        "![foo](/url \"title\")\n",
        "<p><img src=\"/url\" alt=\"foo\" title=\"title\" /></p>\n",
    );
}

#[test]
fn image_alt_text_flattens_nested_inlines() {
    html(
        "![foo *bar*](/url)\n",
        "<p><img src=\"/url\" alt=\"foo bar\" /></p>\n",
    );
}

#[test]
fn links_cannot_be_nested() {
    html(
        "[a [b](/url)](/url2)\n",
        "<p>[a <a href=\"/url\">b</a>](/url2)</p>\n",
    );
}

#[test]
fn link_destination_with_angle_brackets() {
    html(
        "[link](</my uri>)\n",
        "<p><a href=\"/my%20uri\">link</a></p>\n",
    );
}

#[test]
fn autolink_uri() {
    html(
        "<http://foo.bar.baz>\n",
        "<p><a href=\"http://foo.bar.baz\">http://foo.bar.baz</a></p>\n",
    );
}

#[test]
fn autolink_email() {
    html(
        "<foo@bar.example.com>\n",
        concat!(
            "<p><a href=\"mailto:foo@bar.example.com\">",
            "foo@bar.example.com</a></p>\n"
        ),
    );
}

#[test]
fn link_destination_percent_encodes_unsafe_bytes() {
    html(
        "[a](/foo\u{00e9}bar)\n",
        "<p><a href=\"/foo%C3%A9bar\">a</a></p>\n",
    );
}
