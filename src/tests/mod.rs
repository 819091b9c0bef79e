use crate::{markdown_to_html, Options};
use pretty_assertions::assert_eq;

mod code;
mod core;
mod emphasis;
mod entities;
mod html_blocks;
mod links;
mod lists;
mod tabs;

/// Asserts that rendering `input` as CommonMark produces exactly `expected`.
fn html(input: &str, expected: &str) {
    let output = markdown_to_html(input, &Options::default());
    assert_eq!(output, expected, "input: {:?}", input);
}
