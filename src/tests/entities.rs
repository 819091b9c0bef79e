use super::html;

#[test]
fn named_entity() {
    html("&amp;\n", "<p>&amp;</p>\n");
    html("&copy;\n", "<p>\u{00a9}</p>\n");
}

#[test]
fn decimal_entity() {
    html("&#35;\n", "<p>#</p>\n");
}

#[test]
fn hex_entity() {
    html("&#X22;\n", "<p>&quot;</p>\n");
    html("&#x26;\n", "<p>&amp;</p>\n");
}

#[test]
fn unknown_entity_passes_through_literally() {
    html("&nosuchentity;\n", "<p>&amp;nosuchentity;</p>\n");
}

#[test]
fn entity_without_trailing_semicolon_is_not_recognized() {
    html("&amp\n", "<p>&amp;amp</p>\n");
}

#[test]
fn out_of_range_numeric_entity_becomes_replacement_character() {
    html("&#99999999;\n", "<p>\u{fffd}</p>\n");
}

#[test]
fn entity_inside_link_destination_is_decoded() {
    html(
        "[a](/foo&amp;bar)\n",
        "<p><a href=\"/foo&amp;bar\">a</a></p>\n",
    );
}
