//! The CommonMark AST.

use crate::arena_tree::Node;
use std::cell::RefCell;

/// The core AST node enum. Closed over exactly the block and inline kinds
/// CommonMark 0.31.2 defines; no GFM extensions.
#[derive(Debug, Clone)]
pub enum NodeValue {
    /// The root of every document. Contains **blocks**.
    Document,

    /// **Block**. A block quote. Contains other **blocks**.
    BlockQuote,

    /// **Block**. A list. Contains [`NodeValue::Item`]s.
    List(NodeList),

    /// **Block**. A list item. Contains other **blocks**.
    Item(NodeListItem),

    /// **Block**. A code block; fenced or indented. Contains raw text which
    /// is not parsed as Markdown.
    CodeBlock(NodeCodeBlock),

    /// **Block**. An HTML block. Contains raw text which is neither parsed
    /// as Markdown nor HTML-escaped.
    HtmlBlock(NodeHtmlBlock),

    /// **Block**. A paragraph. Contains **inlines**.
    Paragraph,

    /// **Block**. A heading; ATX or setext. Contains **inlines**.
    Heading(NodeHeading),

    /// **Block**. A thematic break. Has no children.
    ThematicBreak,

    /// **Inline**. Textual content.
    Text(Vec<u8>),

    /// **Inline**. A soft line break.
    SoftBreak,

    /// **Inline**. A hard line break.
    LineBreak,

    /// **Inline**. A code span.
    Code(Vec<u8>),

    /// **Inline**. Raw inline HTML.
    HtmlInline(Vec<u8>),

    /// **Inline**. Emphasized text.
    Emph,

    /// **Inline**. Strong text.
    Strong,

    /// **Inline**. A link to some URL, with an optional title.
    Link(NodeLink),

    /// **Inline**. An image.
    Image(NodeLink),
}

/// The details of a link's destination, or an image's source.
#[derive(Debug, Clone, Default)]
pub struct NodeLink {
    /// The URL for the link destination or image source.
    pub url: Vec<u8>,

    /// The title for the link or image.
    pub title: Vec<u8>,
}

/// The metadata of a list or list item; the kind of list, the delimiter
/// used, tightness, and so on.
#[derive(Debug, Default, Clone, Copy)]
pub struct NodeList {
    /// The kind of list (bullet or ordered).
    pub list_type: ListType,

    /// Columns occupied by the marker itself, before any trailing
    /// whitespace.
    pub marker_offset: usize,

    /// Columns of required whitespace following the marker before the
    /// content of the first line.
    pub padding: usize,

    /// For ordered lists, the ordinal the list starts at.
    pub start: usize,

    /// For ordered lists, the delimiter after each number.
    pub delimiter: ListDelimType,

    /// For bullet lists, the character used for each bullet.
    pub bullet_char: u8,

    /// Whether the list is tight, i.e. whether item paragraphs are wrapped
    /// in `<p>` tags when rendered.
    pub tight: bool,
}

/// The type of list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListType {
    /// A bullet (unordered) list.
    Bullet,
    /// An ordered list.
    Ordered,
}

impl Default for ListType {
    fn default() -> ListType {
        ListType::Bullet
    }
}

/// The delimiter for ordered lists, i.e. the character following each
/// number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListDelimType {
    /// A period character `.`.
    Period,
    /// A paren character `)`.
    Paren,
}

impl Default for ListDelimType {
    fn default() -> ListDelimType {
        ListDelimType::Period
    }
}

/// Per-item bookkeeping a list item needs independent of the list it
/// belongs to: each item's marker can have a different column width (`"1. "`
/// vs `"10. "`), and tightness/continuation tracking is per-item.
#[derive(Debug, Default, Clone, Copy)]
pub struct NodeListItem {
    /// Columns required for a following line to continue this item (marker
    /// width plus the whitespace consumed after it).
    pub content_indent: usize,

    /// Set when the marker was followed directly by the end of the line
    /// (nothing else on the opening line).
    pub is_empty_first_line: bool,

    /// Set once a blank line has been seen since this item's last block.
    pub has_trailing_blank: bool,

    /// Set once an empty item has seen a blank line; such an item stops
    /// matching further continuation lines.
    pub seen_blank_after_item: bool,
}

/// The metadata and data of a code block, fenced or indented.
#[derive(Debug, Default, Clone)]
pub struct NodeCodeBlock {
    /// Whether the code block is fenced (as opposed to indented).
    pub fenced: bool,

    /// For fenced code blocks, the fence character (`` ` `` or `~`).
    pub fence_char: u8,

    /// For fenced code blocks, the length of the opening fence.
    pub fence_length: usize,

    /// For fenced code blocks, the column at which the fence itself sat,
    /// which is stripped from every following line of the block.
    pub fence_offset: usize,

    /// The info string after the opening fence, if any. `None` for
    /// indented code blocks; `Some(vec![])` for a fenced block with no
    /// info string.
    pub info: Option<Vec<u8>>,

    /// The literal contents of the code block.
    pub literal: Vec<u8>,
}

/// The metadata of a heading.
#[derive(Debug, Default, Clone, Copy)]
pub struct NodeHeading {
    /// The level of the heading: 1 to 6.
    pub level: u8,

    /// Whether the heading is setext (if not, ATX).
    pub setext: bool,
}

/// The metadata of an HTML block.
#[derive(Debug, Clone)]
pub struct NodeHtmlBlock {
    /// The literal contents of the HTML block.
    pub literal: Vec<u8>,
}

impl NodeValue {
    /// Indicates whether this node is a block node (as opposed to inline).
    pub fn block(&self) -> bool {
        matches!(
            *self,
            NodeValue::Document
                | NodeValue::BlockQuote
                | NodeValue::List(..)
                | NodeValue::Item(..)
                | NodeValue::CodeBlock(..)
                | NodeValue::HtmlBlock(..)
                | NodeValue::Paragraph
                | NodeValue::Heading(..)
                | NodeValue::ThematicBreak
        )
    }

    /// Whether the block, while open, accumulates raw text lines into its
    /// `content` scratch buffer for the inline parser to later reparse.
    /// Code and HTML blocks accumulate directly into their own `literal`
    /// field instead, since their content is never reparsed as inlines.
    pub fn accepts_lines(&self) -> bool {
        matches!(*self, NodeValue::Paragraph | NodeValue::Heading(..))
    }

    /// Indicates whether this node's children, once parsed, are inlines.
    pub fn contains_inlines(&self) -> bool {
        matches!(*self, NodeValue::Paragraph | NodeValue::Heading(..))
    }
}

/// A single node in the CommonMark AST: the value plus positional metadata.
#[derive(Debug, Clone)]
pub struct Ast {
    /// The node's value.
    pub value: NodeValue,

    /// The 1-based line the node starts on.
    pub start_line: u32,

    /// The 1-based line the node ends on (inclusive). Updated as the block
    /// parser consumes further lines into the node.
    pub end_line: u32,

    /// Raw-line scratch buffer for blocks that `accepts_lines`; consumed and
    /// cleared by the inline parser (for paragraphs/headings) or left in
    /// place as the rendered literal (for code blocks, via `NodeCodeBlock`
    /// instead).
    pub content: Vec<u8>,

    /// Whether the block is still open for continuation.
    pub open: bool,

    /// Whether the last line added to this block (or, for containers, to its
    /// last descendant) was blank. Drives tight/loose list promotion.
    pub last_line_blank: bool,
}

pub fn make_block(value: NodeValue, start_line: u32) -> Ast {
    Ast {
        value,
        start_line,
        end_line: start_line,
        content: Vec::new(),
        open: true,
        last_line_blank: false,
    }
}

/// A node within the document tree, bound to the lifetime of the arena its
/// nodes are allocated in.
pub type AstNode<'a> = Node<'a, RefCell<Ast>>;

pub fn last_child_is_open<'a>(node: &'a AstNode<'a>) -> bool {
    node.last_child().map_or(false, |n| n.data.borrow().open)
}

/// Whether `node` (a container) may directly contain a child of kind
/// `child`.
pub fn can_contain_type<'a>(node: &'a AstNode<'a>, child: &NodeValue) -> bool {
    if let NodeValue::Document = *child {
        return false;
    }

    match node.data.borrow().value {
        NodeValue::Document | NodeValue::BlockQuote | NodeValue::Item(..) => {
            child.block() && !matches!(*child, NodeValue::Item(..))
        }
        NodeValue::List(..) => matches!(*child, NodeValue::Item(..)),
        NodeValue::Paragraph
        | NodeValue::Heading(..)
        | NodeValue::Emph
        | NodeValue::Strong
        | NodeValue::Link(..)
        | NodeValue::Image(..) => !child.block(),
        _ => false,
    }
}

/// Whether `node`, or (recursively, for list/item containers) its last
/// child, ends with a blank line.
pub fn ends_with_blank_line<'a>(node: &'a AstNode<'a>) -> bool {
    let mut it = Some(node);
    while let Some(cur) = it {
        if cur.data.borrow().last_line_blank {
            return true;
        }
        it = match cur.data.borrow().value {
            NodeValue::List(..) | NodeValue::Item(..) => cur.last_child(),
            _ => None,
        };
    }
    false
}

/// The nearest block-level ancestor of `node`, inclusive of `node` itself.
pub fn containing_block<'a>(node: &'a AstNode<'a>) -> Option<&'a AstNode<'a>> {
    let mut ch = Some(node);
    while let Some(n) = ch {
        if n.data.borrow().value.block() {
            return Some(n);
        }
        ch = n.parent();
    }
    None
}
