//! The HTML renderer (spec.md §4.4): a single traversal over the AST that
//! writes HTML to a byte sink. Mirrors the teacher's iterative, stack-based
//! `format_document_with_formatter` shape — pre-order to open a node,
//! post-order to close it — trimmed to the one non-pluggable formatter this
//! crate needs; there is no GFM surface to make pluggable.

mod context;

use crate::character_set::character_set;
use crate::ctype::isspace;
use crate::nodes::{AstNode, ListType, NodeCodeBlock, NodeHeading, NodeList, NodeValue};

pub use context::Context;

use std::io::{self, Write};

/// Renders `root` as HTML into `output`, per the options given.
pub fn format_document<'a>(
    root: &'a AstNode<'a>,
    options: &crate::Options,
    output: &mut dyn Write,
) -> io::Result<()> {
    let mut context = Context::new(output, options);

    enum Phase {
        Pre,
        Post,
    }

    let mut stack = vec![(root, Phase::Pre)];

    while let Some((node, phase)) = stack.pop() {
        match phase {
            Phase::Pre => {
                let descend = render_node(&mut context, node, true)?;
                if descend {
                    stack.push((node, Phase::Post));
                    for child in node.reverse_children() {
                        stack.push((child, Phase::Pre));
                    }
                }
            }
            Phase::Post => {
                render_node(&mut context, node, false)?;
            }
        }
    }

    Ok(())
}

/// Dispatches a single node's rendering for one traversal phase. Returns
/// whether the node's children should be descended into (only meaningful
/// when `entering` is `true`; nodes that render their children themselves,
/// like `image`, return `false` here and flatten them separately).
fn render_node<'a>(
    context: &mut Context,
    node: &'a AstNode<'a>,
    entering: bool,
) -> io::Result<bool> {
    let ast = node.data.borrow();
    match ast.value {
        NodeValue::Document => Ok(true),
        NodeValue::BlockQuote => render_block_quote(context, entering),
        NodeValue::List(ref nl) => render_list(context, entering, nl),
        NodeValue::Item(_) => render_item(context, entering),
        NodeValue::CodeBlock(ref ncb) => render_code_block(context, entering, ncb),
        NodeValue::HtmlBlock(ref nhb) => render_html_block(context, entering, &nhb.literal),
        NodeValue::Paragraph => {
            drop(ast);
            render_paragraph(context, node, entering)
        }
        NodeValue::Heading(ref nh) => render_heading(context, entering, nh),
        NodeValue::ThematicBreak => render_thematic_break(context, entering),
        NodeValue::Text(ref literal) => render_text(context, entering, literal),
        NodeValue::SoftBreak => render_soft_break(context, entering),
        NodeValue::LineBreak => render_line_break(context, entering),
        NodeValue::Code(ref literal) => render_code(context, entering, literal),
        NodeValue::HtmlInline(ref literal) => render_html_inline(context, entering, literal),
        NodeValue::Emph => render_wrap(context, entering, "em"),
        NodeValue::Strong => render_wrap(context, entering, "strong"),
        NodeValue::Link(ref nl) => render_link(context, entering, &nl.url, &nl.title),
        NodeValue::Image(ref nl) => {
            let (url, title) = (nl.url.clone(), nl.title.clone());
            drop(ast);
            render_image(context, node, entering, &url, &title)
        }
    }
}

fn render_block_quote(context: &mut Context, entering: bool) -> io::Result<bool> {
    if entering {
        context.cr()?;
        context.write_str("<blockquote>\n")?;
    } else {
        context.cr()?;
        context.write_str("</blockquote>\n")?;
    }
    Ok(true)
}

fn render_list(context: &mut Context, entering: bool, nl: &NodeList) -> io::Result<bool> {
    if entering {
        context.cr()?;
        match nl.list_type {
            ListType::Bullet => context.write_str("<ul>\n")?,
            ListType::Ordered if nl.start == 1 => context.write_str("<ol>\n")?,
            ListType::Ordered => context.write_str(&format!("<ol start=\"{}\">\n", nl.start))?,
        }
    } else {
        match nl.list_type {
            ListType::Bullet => context.write_str("</ul>\n")?,
            ListType::Ordered => context.write_str("</ol>\n")?,
        }
    }
    Ok(true)
}

fn render_item(context: &mut Context, entering: bool) -> io::Result<bool> {
    if entering {
        context.cr()?;
        context.write_str("<li>")?;
    } else {
        context.write_str("</li>\n")?;
    }
    Ok(true)
}

fn render_code_block(
    context: &mut Context,
    entering: bool,
    ncb: &NodeCodeBlock,
) -> io::Result<bool> {
    if entering {
        context.cr()?;
        context.write_str("<pre><code")?;
        if let Some(ref info) = ncb.info {
            if !info.is_empty() {
                let first_word_len = info.iter().position(|&c| isspace(c)).unwrap_or(info.len());
                context.write_str(" class=\"language-")?;
                context.escape(&info[..first_word_len])?;
                context.write_str("\"")?;
            }
        }
        context.write_str(">")?;
        context.escape(&ncb.literal)?;
        context.write_str("</code></pre>\n")?;
    }
    Ok(false)
}

fn render_html_block(context: &mut Context, entering: bool, literal: &[u8]) -> io::Result<bool> {
    if entering {
        context.cr()?;
        context.write_all(literal)?;
        context.cr()?;
    }
    Ok(false)
}

/// Whether `node` is the sole child of a tight list item: the paragraph
/// wrapper is suppressed in that case and its inline children are written
/// straight through (spec.md §4.4).
fn in_tight_list_item<'a>(node: &'a AstNode<'a>) -> bool {
    node.parent()
        .and_then(|item| item.parent())
        .map_or(false, |list| match list.data.borrow().value {
            NodeValue::List(ref nl) => nl.tight,
            _ => false,
        })
}

/// An empty paragraph (no children, or only whitespace-only text children)
/// renders nothing at all (spec.md §4.4).
fn paragraph_is_empty<'a>(node: &'a AstNode<'a>) -> bool {
    node.children()
        .all(|child| match child.data.borrow().value {
            NodeValue::Text(ref literal) => crate::strings::is_blank(literal),
            _ => false,
        })
}

fn render_paragraph<'a>(
    context: &mut Context,
    node: &'a AstNode<'a>,
    entering: bool,
) -> io::Result<bool> {
    if paragraph_is_empty(node) {
        return Ok(false);
    }

    if in_tight_list_item(node) {
        // No wrapper, no added whitespace: the enclosing `<li>`'s own
        // closing tag supplies the line break that follows.
        return Ok(true);
    }

    if entering {
        context.cr()?;
        context.write_str("<p>")?;
    } else {
        context.write_str("</p>\n")?;
    }
    Ok(true)
}

fn render_heading(context: &mut Context, entering: bool, nh: &NodeHeading) -> io::Result<bool> {
    if entering {
        context.cr()?;
        context.write_str(&format!("<h{}>", nh.level))?;
    } else {
        context.write_str(&format!("</h{}>\n", nh.level))?;
    }
    Ok(true)
}

fn render_thematic_break(context: &mut Context, entering: bool) -> io::Result<bool> {
    if entering {
        context.cr()?;
        context.write_str("<hr />\n")?;
    }
    Ok(false)
}

fn render_text(context: &mut Context, entering: bool, literal: &[u8]) -> io::Result<bool> {
    if entering {
        context.escape(literal)?;
    }
    Ok(false)
}

fn render_soft_break(context: &mut Context, entering: bool) -> io::Result<bool> {
    if entering {
        context.write_str("\n")?;
    }
    Ok(false)
}

fn render_line_break(context: &mut Context, entering: bool) -> io::Result<bool> {
    if entering {
        context.write_str("<br />\n")?;
    }
    Ok(false)
}

fn render_code(context: &mut Context, entering: bool, literal: &[u8]) -> io::Result<bool> {
    if entering {
        context.write_str("<code>")?;
        context.escape(literal)?;
        context.write_str("</code>")?;
    }
    Ok(false)
}

fn render_html_inline(context: &mut Context, entering: bool, literal: &[u8]) -> io::Result<bool> {
    if entering {
        context.write_all(literal)?;
    }
    Ok(false)
}

fn render_wrap(context: &mut Context, entering: bool, tag: &str) -> io::Result<bool> {
    if entering {
        context.write_str(&format!("<{}>", tag))?;
    } else {
        context.write_str(&format!("</{}>", tag))?;
    }
    Ok(true)
}

fn render_link(
    context: &mut Context,
    entering: bool,
    url: &[u8],
    title: &[u8],
) -> io::Result<bool> {
    if entering {
        context.write_str("<a href=\"")?;
        context.escape_href(url)?;
        context.write_str("\"")?;
        if !title.is_empty() {
            context.write_str(" title=\"")?;
            context.escape(title)?;
            context.write_str("\"")?;
        }
        context.write_str(">")?;
    } else {
        context.write_str("</a>")?;
    }
    Ok(true)
}

fn render_image<'a>(
    context: &mut Context,
    node: &'a AstNode<'a>,
    entering: bool,
    url: &[u8],
    title: &[u8],
) -> io::Result<bool> {
    if !entering {
        return Ok(false);
    }

    context.write_str("<img src=\"")?;
    context.escape_href(url)?;
    context.write_str("\" alt=\"")?;
    let alt = collect_alt_text(node);
    context.escape(&alt)?;
    context.write_str("\"")?;
    if !title.is_empty() {
        context.write_str(" title=\"")?;
        context.escape(title)?;
        context.write_str("\"")?;
    }
    context.write_str(" />")?;
    Ok(false)
}

/// Flattens an image's (or nested link/image's) children to plain text for
/// its `alt` attribute: code span literals count as text, soft/hard breaks
/// become spaces, and nested links/images contribute their own alt text
/// recursively (spec.md §4.4).
fn collect_alt_text<'a>(node: &'a AstNode<'a>) -> Vec<u8> {
    let mut out = Vec::new();
    for child in node.children() {
        match child.data.borrow().value {
            NodeValue::Text(ref literal) | NodeValue::Code(ref literal) => {
                out.extend_from_slice(literal)
            }
            NodeValue::SoftBreak | NodeValue::LineBreak => out.push(b' '),
            NodeValue::Image(_) | NodeValue::Link(_) | NodeValue::Emph | NodeValue::Strong => {
                out.extend(collect_alt_text(child))
            }
            _ => {}
        }
    }
    out
}

/// Writes `buffer` HTML-escaped: `&`→`&amp;`, `<`→`&lt;`, `>`→`&gt;`,
/// `"`→`&quot;`, everything else passed through (spec.md §4.4).
pub fn escape(output: &mut dyn Write, buffer: &[u8]) -> io::Result<()> {
    let matcher = jetscii::bytes!(b'"', b'&', b'<', b'>');

    let mut offset = 0;
    while let Some(i) = matcher.find(&buffer[offset..]) {
        let esc: &[u8] = match buffer[offset + i] {
            b'"' => b"&quot;",
            b'&' => b"&amp;",
            b'<' => b"&lt;",
            b'>' => b"&gt;",
            _ => unreachable!(),
        };
        output.write_all(&buffer[offset..offset + i])?;
        output.write_all(esc)?;
        offset += i + 1;
    }
    output.write_all(&buffer[offset..])
}

/// Writes `buffer` percent-encoded for use inside an HTML attribute carrying
/// a URL: bytes `<=0x20` or `>=0x80`, or one of `` <>"\[]{}|^` ``, are
/// percent-encoded; `&` becomes `&amp;`; everything else passes through
/// (spec.md §4.4). This is the plain CommonMark reference algorithm rather
/// than the teacher's newer IPv6-aware allow-list one (see DESIGN.md).
pub fn escape_href(output: &mut dyn Write, buffer: &[u8]) -> io::Result<()> {
    const ALWAYS_ESCAPE: [bool; 256] = character_set!(br#"<>"\[]{}|^`"#);

    for &byte in buffer {
        if byte == b'&' {
            output.write_all(b"&amp;")?;
        } else if byte <= 0x20 || byte >= 0x80 || ALWAYS_ESCAPE[byte as usize] {
            write!(output, "%{:02X}", byte)?;
        } else {
            output.write_all(&[byte])?;
        }
    }
    Ok(())
}
