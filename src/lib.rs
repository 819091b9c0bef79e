//! `cmarkrs` parses CommonMark 0.31.2 Markdown and renders it to HTML.
//!
//! ```
//! let html = cmarkrs::markdown_to_html("Hello, *world*!\n", &cmarkrs::Options::default());
//! assert_eq!(html, "<p>Hello, <em>world</em>!</p>\n");
//! ```
//!
//! Parsing produces a tree of [`nodes::AstNode`]s allocated out of a single
//! arena per call; the tree is tied to that arena's lifetime rather than to
//! any individual node, and no node is ever freed on its own.

mod arena_tree;
mod autolink;
mod character_set;
mod ctype;
mod entity;
mod html;
mod nodes;
mod parser;
mod scanners;
mod strings;

pub use html::format_document;
pub use nodes::{
    Ast, AstNode, ListDelimType, ListType, NodeCodeBlock, NodeHeading, NodeHtmlBlock, NodeLink,
    NodeList, NodeListItem, NodeValue,
};
pub use parser::options::{Options, RenderOptions};
pub use parser::parse_document;

#[cfg(test)]
mod tests;

use typed_arena::Arena;

/// Parses `text` and renders it straight to an HTML `String`, using a
/// throwaway arena that is dropped before returning. Most callers who don't
/// need to inspect or transform the tree want this rather than calling
/// [`parse_document`] and [`format_document`] themselves.
///
/// Input bytes that aren't valid UTF-8 are passed through unchanged by the
/// parser and renderer (spec's error-handling rules reject nothing), so the
/// result is lossily re-decoded here for callers who want a `String`; use
/// [`format_document`] directly to get the raw bytes instead.
pub fn markdown_to_html(text: &str, options: &Options) -> String {
    let arena = Arena::new();
    let root = parse_document(&arena, text.as_bytes(), options);
    let mut output = Vec::new();
    format_document(root, options, &mut output).expect("writing to a Vec<u8> cannot fail");
    String::from_utf8_lossy(&output).into_owned()
}
