//! The block parser (spec.md §4.2): consumes a document line by line,
//! maintains a stack of currently-open container blocks, and produces a
//! tree of block nodes. Mirrors the teacher's dispatch-cascade architecture
//! (container matching, then an ordered "try each block start" cascade)
//! minus every GFM/extension block type.

pub mod inlines;
pub mod options;

use crate::arena_tree::Node;
use crate::entity;
use crate::nodes::{
    self, make_block, Ast, AstNode, ListDelimType, ListType, NodeCodeBlock, NodeHeading,
    NodeHtmlBlock, NodeList, NodeListItem, NodeValue,
};
use crate::scanners::{self, SetextChar};
use crate::strings;
use std::cell::RefCell;
use std::collections::HashMap;
use typed_arena::Arena;

pub use self::options::{Options, RenderOptions};

const TAB_STOP: usize = 4;
const CODE_INDENT: usize = 4;

/// A resolved link reference definition (spec.md §3's "Reference map").
#[derive(Debug, Clone, Default)]
pub struct Reference {
    pub url: Vec<u8>,
    pub title: Vec<u8>,
}

pub type RefMap = HashMap<String, Reference>;

/// Parses `buffer` (raw bytes, any line-ending convention) into a document
/// tree allocated in `arena`. See the crate root for the public entry point.
pub fn parse_document<'a>(
    arena: &'a Arena<AstNode<'a>>,
    buffer: &[u8],
    options: &Options,
) -> &'a AstNode<'a> {
    let root: &'a AstNode<'a> =
        arena.alloc(Node::new(RefCell::new(make_block(NodeValue::Document, 1))));
    let mut parser = Parser::new(arena, root, options);
    parser.feed(buffer);
    parser.finish()
}

/// The state machine a pending, possibly multi-line link reference
/// definition moves through (spec.md §4.2.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefDefState {
    Url,
    TitleOrEnd,
    TitleContinuation(u8),
}

struct PartialReference {
    label: Vec<u8>,
    url: Vec<u8>,
    title: Vec<u8>,
    state: RefDefState,
    /// Raw lines consumed so far, for rollback into a paragraph on failure.
    buffered_lines: Vec<Vec<u8>>,
}

struct Parser<'a, 'o> {
    arena: &'a Arena<AstNode<'a>>,
    root: &'a AstNode<'a>,
    current: &'a AstNode<'a>,
    options: &'o Options,
    line_number: u32,

    offset: usize,
    column: usize,
    first_nonspace: usize,
    first_nonspace_column: usize,
    indent: usize,
    blank: bool,
    partially_consumed_tab: bool,

    refmap: RefMap,
    pending_refdef: Option<PartialReference>,
    /// The HTML-block type code (1-7) of the currently open HTML block, if
    /// the tip is one. Not stored on the node itself (spec.md §3: "type is a
    /// parse-time concern, not stored").
    html_block_type: Option<u8>,
}

impl<'a, 'o> Parser<'a, 'o> {
    fn new(arena: &'a Arena<AstNode<'a>>, root: &'a AstNode<'a>, options: &'o Options) -> Self {
        Parser {
            arena,
            root,
            current: root,
            options,
            line_number: 0,
            offset: 0,
            column: 0,
            first_nonspace: 0,
            first_nonspace_column: 0,
            indent: 0,
            blank: false,
            partially_consumed_tab: false,
            refmap: RefMap::new(),
            pending_refdef: None,
            html_block_type: None,
        }
    }

    fn feed(&mut self, buffer: &[u8]) {
        for line in split_lines(buffer) {
            self.process_line(&line);
        }
    }

    // ---- column/offset bookkeeping -------------------------------------

    fn find_first_nonspace(&mut self, line: &[u8]) {
        let mut offset = self.offset;
        let mut column = self.column;
        while offset < line.len() {
            match line[offset] {
                b' ' => {
                    offset += 1;
                    column += 1;
                }
                b'\t' => {
                    offset += 1;
                    column += TAB_STOP - (column % TAB_STOP);
                }
                _ => break,
            }
        }
        self.first_nonspace = offset;
        self.first_nonspace_column = column;
        self.indent = self.first_nonspace_column - self.column;
        self.blank = offset >= line.len();
    }

    /// Advances the cursor by `count` columns (or bytes, if `!columns`),
    /// handling the case where a tab is only partially consumed (spec.md
    /// §4.2.1 item 2).
    fn advance_offset(&mut self, line: &[u8], mut count: usize, columns: bool) {
        while count > 0 && self.offset < line.len() {
            match line[self.offset] {
                b'\t' => {
                    let chars_to_tab = TAB_STOP - (self.column % TAB_STOP);
                    if columns {
                        self.partially_consumed_tab = chars_to_tab > count;
                        let advance = chars_to_tab.min(count);
                        self.column += advance;
                        self.offset += if self.partially_consumed_tab { 0 } else { 1 };
                        count -= advance;
                    } else {
                        self.partially_consumed_tab = false;
                        self.column += chars_to_tab;
                        self.offset += 1;
                        count -= 1;
                    }
                }
                _ => {
                    self.partially_consumed_tab = false;
                    self.offset += 1;
                    self.column += 1;
                    count -= 1;
                }
            }
        }
    }

    /// The remainder of `line` from the cursor, with a partially-consumed
    /// tab's residual columns reified as literal spaces.
    fn rest_of_line(&self, line: &[u8]) -> Vec<u8> {
        if self.partially_consumed_tab {
            let spaces = TAB_STOP - (self.column % TAB_STOP);
            let mut v = vec![b' '; spaces];
            v.extend_from_slice(&line[self.offset + 1..]);
            v
        } else {
            line[self.offset..].to_vec()
        }
    }

    // ---- per-line driver -------------------------------------------------

    fn process_line(&mut self, line: &[u8]) {
        self.line_number += 1;
        self.offset = 0;
        self.column = 0;
        self.blank = false;
        self.partially_consumed_tab = false;

        let tip_was_paragraph = matches!(self.current.data.borrow().value, NodeValue::Paragraph);

        let (container, all_matched) = self.check_open_blocks(line, tip_was_paragraph);
        if !all_matched {
            self.current = container.parent().unwrap_or(container);
            self.close_unmatched_children();
        } else {
            self.current = container;
        }

        // Fast paths: fenced code / HTML block, which bypass the structural
        // recognition cascade entirely.
        let tip = self.current;
        let is_fenced_open = matches!(
            tip.data.borrow().value,
            NodeValue::CodeBlock(NodeCodeBlock { fenced: true, .. })
        );
        if is_fenced_open {
            self.continue_fenced_code(tip, line);
            return;
        }
        if matches!(tip.data.borrow().value, NodeValue::HtmlBlock(..)) {
            self.continue_html_block(tip, line);
            return;
        }

        self.find_first_nonspace(line);

        if self.blank {
            self.handle_blank_line();
            return;
        }

        self.open_new_blocks(line);
    }

    fn close_unmatched_children(&mut self) {
        // Close every open descendant below `self.current` (the last
        // container that matched), deepest first; they cannot continue
        // onto this line.
        loop {
            let mut deepest = self.current;
            loop {
                match deepest.last_child() {
                    Some(c) if c.data.borrow().open => deepest = c,
                    _ => break,
                }
            }
            if deepest.same_node(self.current) {
                break;
            }
            self.finalize(deepest);
        }
    }

    /// Walks the open-container path from root, trying each container's
    /// continuation matcher in turn. Returns the deepest node reached and
    /// whether every container on the path matched.
    fn check_open_blocks(
        &mut self,
        line: &[u8],
        tip_was_paragraph: bool,
    ) -> (&'a AstNode<'a>, bool) {
        let mut container: &'a AstNode<'a> = self.root;
        let mut all_matched = true;

        loop {
            let next = match container.last_child() {
                Some(lc) if lc.data.borrow().open => lc,
                _ => break,
            };
            container = next;
            self.find_first_nonspace(line);

            let kind_is_leaf = container.data.borrow().value.block()
                && !matches!(
                    container.data.borrow().value,
                    NodeValue::Document | NodeValue::BlockQuote | NodeValue::List(..) | NodeValue::Item(..)
                );
            if kind_is_leaf {
                // Leaf blocks never have open block children beyond
                // themselves; their own continuation is checked by the
                // fast-path / structural cascade, not here.
                break;
            }

            let matched = match container.data.borrow().value {
                NodeValue::BlockQuote => self.match_block_quote(line, tip_was_paragraph),
                NodeValue::Item(item) => self.match_list_item(line, item, tip_was_paragraph),
                NodeValue::List(..) => true,
                NodeValue::Document => true,
                _ => unreachable!(),
            };

            if !matched {
                all_matched = false;
                break;
            }
        }

        (container, all_matched)
    }

    fn match_block_quote(&mut self, line: &[u8], tip_was_paragraph: bool) -> bool {
        if self.indent <= 3 && line.get(self.first_nonspace) == Some(&b'>') {
            self.advance_offset(line, self.first_nonspace - self.offset + 1, false);
            if matches!(line.get(self.offset), Some(&b' ') | Some(&b'\t')) {
                self.advance_offset(line, 1, true);
            }
            true
        } else {
            tip_was_paragraph && !self.looks_structural(line)
        }
    }

    fn match_list_item(
        &mut self,
        line: &[u8],
        item: NodeListItem,
        tip_was_paragraph: bool,
    ) -> bool {
        if self.blank {
            return !(item.seen_blank_after_item && item.is_empty_first_line);
        }
        if self.indent >= item.content_indent {
            self.advance_offset(line, item.content_indent, true);
            return true;
        }
        tip_was_paragraph && !self.looks_structural(line)
    }

    /// The "looks structural" predicate (spec.md §4.2.2): matches the
    /// opener side of every block start this parser honors.
    fn looks_structural(&self, line: &[u8]) -> bool {
        let rest = &line[self.first_nonspace..];
        if self.indent >= CODE_INDENT {
            return false;
        }
        scanners::thematic_break(rest)
            || scanners::atx_heading_start(rest).is_some()
            || self.parse_list_marker(rest, false).is_some()
            || line.get(self.first_nonspace) == Some(&b'>')
            || scanners::open_code_fence(rest).is_some()
            || scanners::html_block_start(rest).is_some()
    }

    fn handle_blank_line(&mut self) {
        let tip = self.current;
        {
            let mut ast = tip.data.borrow_mut();
            ast.last_line_blank = true;
        }
        // Also propagate onto the nearest enclosing list item, mirroring
        // the teacher's own container-level update: the between-items
        // tight/loose check (`list_is_tight`) inspects an item's own flag
        // directly, not just its descendants', so a blank line closing a
        // deeply nested leaf still needs to mark the item that contains it.
        if !matches!(tip.data.borrow().value, NodeValue::Item(..)) {
            let mut ancestor = tip.parent();
            while let Some(cur) = ancestor {
                if matches!(cur.data.borrow().value, NodeValue::Item(..)) {
                    cur.data.borrow_mut().last_line_blank = true;
                    break;
                }
                ancestor = cur.parent();
            }
        }
        if let NodeValue::Item(ref mut item) = tip.data.borrow_mut().value {
            item.has_trailing_blank = true;
            if item.is_empty_first_line {
                item.seen_blank_after_item = true;
            }
        }
        if matches!(tip.data.borrow().value, NodeValue::Paragraph) {
            self.finalize(tip);
        }
        // An indented code block absorbs a blank line as part of its
        // literal (trailing ones are trimmed off in `finalize` if the
        // block doesn't continue past them); it is never closed by one.
        if let NodeValue::CodeBlock(ref mut ncb) = tip.data.borrow_mut().value {
            if !ncb.fenced {
                ncb.literal.push(b'\n');
            }
        }
        if let Some(pending) = self.pending_refdef.take() {
            self.abandon_reference_definition(pending);
        }
    }

    fn continue_fenced_code(&mut self, tip: &'a AstNode<'a>, line: &[u8]) {
        self.find_first_nonspace(line);
        let (fence_char, fence_length, fence_offset) = match tip.data.borrow().value {
            NodeValue::CodeBlock(ref ncb) => (ncb.fence_char, ncb.fence_length, ncb.fence_offset),
            _ => unreachable!(),
        };
        let rest = &line[self.first_nonspace..];
        if self.indent <= 3 && scanners::close_code_fence(rest, fence_char, fence_length) {
            self.finalize(tip);
            return;
        }
        self.advance_offset(line, fence_offset.min(self.indent), true);
        let mut content = self.rest_of_line(line);
        content.push(b'\n');
        if let NodeValue::CodeBlock(ref mut ncb) = tip.data.borrow_mut().value {
            ncb.literal.extend_from_slice(&content);
        }
    }

    fn continue_html_block(&mut self, tip: &'a AstNode<'a>, line: &[u8]) {
        let block_type = self.html_block_type.unwrap_or(7);
        {
            let mut content = line.to_vec();
            content.push(b'\n');
            if let NodeValue::HtmlBlock(ref mut nb) = tip.data.borrow_mut().value {
                nb.literal.extend_from_slice(&content);
            }
        }
        let closes = if block_type <= 5 {
            scanners::html_block_end(block_type, line)
        } else {
            strings::is_blank(line)
        };
        if closes {
            self.html_block_type = None;
            self.finalize(tip);
        }
    }

    // ---- structural recognition cascade (spec.md §4.2.1 item 6) ---------

    fn open_new_blocks(&mut self, line: &[u8]) {
        loop {
            self.find_first_nonspace(line);

            let tip_is_paragraph = matches!(self.current.data.borrow().value, NodeValue::Paragraph);
            let tip_is_indented_code = matches!(
                self.current.data.borrow().value,
                NodeValue::CodeBlock(NodeCodeBlock { fenced: false, .. })
            );
            let pending = self.pending_refdef.is_some();

            if self.indent >= CODE_INDENT && !tip_is_paragraph && !pending {
                if tip_is_indented_code {
                    self.continue_indented_code_block(line);
                } else {
                    self.open_indented_code_block(line);
                }
                return;
            }

            if pending {
                if self.continue_reference_definition(line) {
                    return;
                }
                // fell through: definition was abandoned; reprocess line
                // against the normal cascade below.
                self.find_first_nonspace(line);
            }

            if !tip_is_paragraph && self.try_start_reference_definition(line) {
                // Either the definition is still pending continuation lines,
                // or it was consumed (finalized or restored as a paragraph)
                // entirely on this line; either way this line is spent and
                // must not also fall through to the cascade below.
                return;
            }

            let rest = &line[self.first_nonspace..];
            let indent_ok = self.indent <= 3;

            if indent_ok && line.get(self.first_nonspace) == Some(&b'>') {
                self.open_block_quote(line);
                continue;
            }

            if indent_ok {
                if let Some(block_type) = scanners::html_block_start(rest) {
                    self.open_html_block(line, block_type);
                    return;
                }
                if !tip_is_paragraph && scanners::html_block_start_7(rest) {
                    self.open_html_block(line, 7);
                    return;
                }
            }

            if indent_ok {
                if let Some((fence_char, fence_length)) = scanners::open_code_fence(rest) {
                    self.open_fenced_code_block(line, fence_char, fence_length);
                    return;
                }
            }

            if indent_ok {
                if let Some((level, _)) = scanners::atx_heading_start(rest) {
                    self.open_atx_heading(line, level);
                    return;
                }
            }

            if indent_ok && tip_is_paragraph {
                if let Some(setext) = scanners::setext_heading_line(rest) {
                    self.convert_to_setext_heading(setext);
                    return;
                }
            }

            if indent_ok && scanners::thematic_break(rest) {
                self.open_thematic_break(line);
                return;
            }

            if indent_ok {
                if let Some((list_data, item_data, consumed)) =
                    self.parse_list_marker(rest, tip_is_paragraph)
                {
                    self.open_list_item(line, list_data, item_data, consumed);
                    continue;
                }
            }

            self.add_text_to_paragraph(line);
            return;
        }
    }

    fn open_indented_code_block(&mut self, line: &[u8]) {
        self.advance_offset(line, CODE_INDENT, true);
        let mut content = self.rest_of_line(line);
        content.push(b'\n');
        let node = self.add_child(make_block(
            NodeValue::CodeBlock(NodeCodeBlock {
                fenced: false,
                fence_char: 0,
                fence_length: 0,
                fence_offset: 0,
                info: None,
                literal: Vec::new(),
            }),
            self.line_number,
        ));
        if let NodeValue::CodeBlock(ref mut ncb) = node.data.borrow_mut().value {
            ncb.literal = content;
        }
    }

    /// Appends another already-indented line to the currently open indented
    /// code block (the tip), rather than opening a new one.
    fn continue_indented_code_block(&mut self, line: &[u8]) {
        self.advance_offset(line, CODE_INDENT, true);
        let mut content = self.rest_of_line(line);
        content.push(b'\n');
        if let NodeValue::CodeBlock(ref mut ncb) = self.current.data.borrow_mut().value {
            ncb.literal.extend_from_slice(&content);
        }
    }

    fn open_block_quote(&mut self, line: &[u8]) {
        self.advance_offset(line, self.first_nonspace - self.offset + 1, false);
        if matches!(line.get(self.offset), Some(&b' ') | Some(&b'\t')) {
            self.advance_offset(line, 1, true);
        }
        self.add_child(make_block(NodeValue::BlockQuote, self.line_number));
    }

    fn open_html_block(&mut self, line: &[u8], block_type: u8) {
        self.html_block_type = Some(block_type);
        let node = self.add_child(make_block(
            NodeValue::HtmlBlock(NodeHtmlBlock {
                literal: Vec::new(),
            }),
            self.line_number,
        ));
        let mut content = line[self.offset..].to_vec();
        content.push(b'\n');
        if let NodeValue::HtmlBlock(ref mut nb) = node.data.borrow_mut().value {
            nb.literal = content;
        }
        let closes_immediately = if block_type <= 5 {
            scanners::html_block_end(block_type, &line[self.offset..])
        } else {
            false
        };
        if closes_immediately {
            self.html_block_type = None;
            self.finalize(node);
        }
    }

    fn open_fenced_code_block(&mut self, line: &[u8], fence_char: u8, fence_length: usize) {
        let fence_offset = self.indent;
        self.advance_offset(line, self.first_nonspace - self.offset + fence_length, false);
        let mut info_bytes = line[self.offset..].to_vec();
        strings::trim(&mut info_bytes);
        let mut info = entity::unescape_html(&info_bytes);
        strings::unescape(&mut info);
        self.add_child(make_block(
            NodeValue::CodeBlock(NodeCodeBlock {
                fenced: true,
                fence_char,
                fence_length,
                fence_offset,
                info: Some(info),
                literal: Vec::new(),
            }),
            self.line_number,
        ));
    }

    fn open_atx_heading(&mut self, line: &[u8], level: u8) {
        self.advance_offset(line, self.first_nonspace - self.offset + level as usize, false);
        let mut content = self.rest_of_line(line);
        strings::trim(&mut content);
        strip_atx_closing_sequence(&mut content);
        let node = self.add_child(make_block(
            NodeValue::Heading(NodeHeading {
                level,
                setext: false,
            }),
            self.line_number,
        ));
        node.data.borrow_mut().content = content;
        self.finalize(node);
    }

    fn convert_to_setext_heading(&mut self, setext: SetextChar) {
        let tip = self.current;
        let level = match setext {
            SetextChar::Equals => 1,
            SetextChar::Hyphen => 2,
        };
        {
            let mut ast = tip.data.borrow_mut();
            ast.value = NodeValue::Heading(NodeHeading {
                level,
                setext: true,
            });
        }
        self.finalize(tip);
    }

    fn open_thematic_break(&mut self, _line: &[u8]) {
        self.add_child(make_block(NodeValue::ThematicBreak, self.line_number));
        self.finalize(self.current);
    }

    fn open_list_item(
        &mut self,
        line: &[u8],
        list_data: NodeList,
        item_data: NodeListItem,
        consumed_columns: usize,
    ) {
        // Reuse the innermost currently-open list if this marker matches it;
        // otherwise close it (if any) and open a fresh one.
        let reuse = match self.nearest_open_list() {
            Some(list_node) => match list_node.data.borrow().value {
                NodeValue::List(existing) => {
                    existing.list_type == list_data.list_type
                        && existing.bullet_char == list_data.bullet_char
                        && existing.delimiter == list_data.delimiter
                }
                _ => false,
            },
            None => false,
        };
        if !reuse {
            self.add_child(make_block(NodeValue::List(list_data), self.line_number));
        }

        self.advance_offset(line, consumed_columns, true);
        self.add_child(make_block(NodeValue::Item(item_data), self.line_number));
    }

    fn add_text_to_paragraph(&mut self, line: &[u8]) {
        let content = self.rest_of_line(line);
        let node = if matches!(self.current.data.borrow().value, NodeValue::Paragraph) {
            self.current
        } else {
            self.add_child(make_block(NodeValue::Paragraph, self.line_number))
        };
        let mut ast = node.data.borrow_mut();
        if !ast.content.is_empty() {
            ast.content.push(b'\n');
        }
        ast.content.extend_from_slice(strings::ltrim_slice(&content));
    }

    /// Closes blocks from `self.current` up to (and not including) the
    /// first ancestor that can contain `value`, then appends a new child of
    /// that kind and makes it the new tip.
    fn add_child(&mut self, value_ast: Ast) -> &'a AstNode<'a> {
        while !nodes::can_contain_type(self.current, &value_ast.value) {
            self.finalize(self.current);
        }
        let node = self.arena.alloc(Node::new(RefCell::new(value_ast)));
        self.current.append(node);
        self.current = node;
        node
    }

    /// The innermost `List` ancestor of the current tip, if any, walking up
    /// without closing anything.
    fn nearest_open_list(&self) -> Option<&'a AstNode<'a>> {
        let mut n = Some(self.current);
        while let Some(cur) = n {
            if matches!(cur.data.borrow().value, NodeValue::List(..)) {
                return Some(cur);
            }
            n = cur.parent();
        }
        None
    }

    fn finalize(&mut self, node: &'a AstNode<'a>) {
        if let Some(parent) = node.parent() {
            if self.current.same_node(node) {
                self.current = parent;
            }
        }

        let value_kind = node.data.borrow().value.clone();
        match value_kind {
            NodeValue::CodeBlock(ref ncb) if !ncb.fenced => {
                let mut node_ast = node.data.borrow_mut();
                if let NodeValue::CodeBlock(ref mut ncb) = node_ast.value {
                    // Every accumulated line already carries its own
                    // trailing '\n' (see `open_indented_code_block` /
                    // `continue_indented_code_block` / the blank-line case
                    // in `handle_blank_line`); trimming is the only thing
                    // left to do here.
                    trim_trailing_blank_lines(&mut ncb.literal);
                }
            }
            NodeValue::List(..) => {
                let tight = list_is_tight(node);
                if let NodeValue::List(ref mut nl) = node.data.borrow_mut().value {
                    nl.tight = tight;
                }
            }
            _ => {}
        }

        node.data.borrow_mut().open = false;
    }

    fn finish(mut self) -> &'a AstNode<'a> {
        // Close everything still open, root included.
        loop {
            let deepest_open = {
                let mut n = self.root;
                loop {
                    match n.last_child() {
                        Some(c) if c.data.borrow().open => n = c,
                        _ => break,
                    }
                }
                n
            };
            if deepest_open.data.borrow().open {
                self.finalize(deepest_open);
            } else {
                break;
            }
        }
        if let Some(pending) = self.pending_refdef.take() {
            self.abandon_reference_definition(pending);
        }
        self.root.data.borrow_mut().open = false;

        self.process_inlines(self.root);
        self.root
    }

    fn process_inlines(&mut self, node: &'a AstNode<'a>) {
        let contains_inlines = node.data.borrow().value.contains_inlines();
        if contains_inlines {
            let content = node.data.borrow().content.clone();
            self::inlines::parse_inlines(self.arena, &mut self.refmap, &content, node);
        } else {
            let children: Vec<_> = node.children().collect();
            for child in children {
                self.process_inlines(child);
            }
        }
    }

    // ---- list markers -----------------------------------------------------

    /// Parses a list marker at the start of `rest` (already stripped of
    /// leading indentation). Returns the list/item metadata and the number
    /// of columns consumed by the marker and its required following
    /// whitespace.
    fn parse_list_marker(
        &self,
        rest: &[u8],
        interrupts_paragraph: bool,
    ) -> Option<(NodeList, NodeListItem, usize)> {
        let mut i = 0;
        let (list_type, bullet_char, delimiter, start) = match rest.first()? {
            c @ (b'-' | b'+' | b'*') => {
                i += 1;
                (ListType::Bullet, *c, ListDelimType::Period, 1)
            }
            c if c.is_ascii_digit() => {
                let mut n: usize = 0;
                let mut ndigits = 0;
                while i < rest.len() && rest[i].is_ascii_digit() {
                    if ndigits == 9 {
                        return None;
                    }
                    n = n * 10 + (rest[i] - b'0') as usize;
                    i += 1;
                    ndigits += 1;
                }
                let delim_char = *rest.get(i)?;
                if delim_char != b'.' && delim_char != b')' {
                    return None;
                }
                i += 1;
                (
                    ListType::Ordered,
                    0,
                    if delim_char == b'.' {
                        ListDelimType::Period
                    } else {
                        ListDelimType::Paren
                    },
                    n,
                )
            }
            _ => return None,
        };

        let marker_width = i;
        let next = rest.get(i).copied();
        let is_empty_first_line = next.is_none();

        if interrupts_paragraph {
            if is_empty_first_line {
                return None;
            }
            if list_type == ListType::Ordered && start != 1 {
                return None;
            }
        }

        if !is_empty_first_line && !matches!(next, Some(b' ') | Some(b'\t')) {
            return None;
        }

        let mut ws_columns = 0;
        let mut column = 0usize;
        let mut j = i;
        while j < rest.len() && matches!(rest[j], b' ' | b'\t') {
            column += if rest[j] == b'\t' {
                TAB_STOP - (column % TAB_STOP)
            } else {
                1
            };
            ws_columns = column;
            j += 1;
        }

        let content_indent = if is_empty_first_line {
            marker_width + 1
        } else if ws_columns >= 1 + CODE_INDENT {
            marker_width + 1
        } else {
            marker_width + ws_columns.max(1)
        };

        let list_data = NodeList {
            list_type,
            marker_offset: self.indent,
            padding: content_indent,
            start,
            delimiter,
            bullet_char,
            tight: true,
        };
        let item_data = NodeListItem {
            content_indent,
            is_empty_first_line,
            has_trailing_blank: false,
            seen_blank_after_item: false,
        };

        Some((list_data, item_data, content_indent))
    }

    // ---- link reference definitions (spec.md §4.2.4-4.2.5) ---------------

    fn try_start_reference_definition(&mut self, line: &[u8]) -> bool {
        let rest = &line[self.first_nonspace..];
        if rest.first() != Some(&b'[') {
            return false;
        }
        let Some(label_len) = scan_link_label(rest) else {
            return false;
        };
        let label = rest[1..label_len - 1].to_vec();
        if rest.get(label_len) != Some(&b':') {
            return false;
        }

        let entry_offset = self.offset;
        let entry_column = self.column;
        let entry_partially_consumed_tab = self.partially_consumed_tab;

        let buffered = vec![line.to_vec()];
        let mut pending = PartialReference {
            label,
            url: Vec::new(),
            title: Vec::new(),
            state: RefDefState::Url,
            buffered_lines: buffered,
        };

        self.advance_offset(line, self.first_nonspace - self.offset + label_len + 1, false);
        self.find_first_nonspace(line);
        self.advance_offset(line, self.first_nonspace - self.offset, false);

        let rest = &line[self.offset..];
        let Some((url, url_len)) = manual_scan_link_url(rest) else {
            // No URL on the opener line: this was never a valid definition.
            // Restore the cursor to where it stood before we started
            // consuming the label, and feed the whole line to the paragraph
            // instead of silently dropping it.
            self.offset = entry_offset;
            self.column = entry_column;
            self.partially_consumed_tab = entry_partially_consumed_tab;
            self.add_text_to_paragraph(line);
            return true;
        };
        pending.url = url;
        self.advance_offset(line, url_len, false);
        pending.state = RefDefState::TitleOrEnd;
        self.pending_refdef = Some(pending);

        self.continue_reference_definition_after_url(line)
    }

    fn continue_reference_definition_after_url(&mut self, line: &[u8]) -> bool {
        self.find_first_nonspace(line);
        if self.blank {
            self.finalize_reference_definition();
            return true;
        }
        let rest = &line[self.first_nonspace..];
        if let Some((title, consumed, terminated)) = manual_scan_link_title(rest) {
            if terminated {
                // title ends on the same line; only valid if nothing but
                // whitespace follows.
                if strings::is_blank(&rest[consumed..]) {
                    if let Some(pending) = self.pending_refdef.as_mut() {
                        pending.title = title;
                    }
                    self.finalize_reference_definition();
                    return true;
                }
            } else if let Some(pending) = self.pending_refdef.as_mut() {
                pending.title = title;
                pending.state = RefDefState::TitleContinuation(rest[0]);
                pending.buffered_lines.push(line.to_vec());
                return true;
            }
        }
        if !strings::is_blank(rest) {
            // Trailing garbage after the URL with no valid title: abandon.
            if let Some(pending) = self.pending_refdef.take() {
                self.abandon_reference_definition(pending);
            }
            return false;
        }
        self.finalize_reference_definition();
        true
    }

    fn continue_reference_definition(&mut self, line: &[u8]) -> bool {
        let state = self.pending_refdef.as_ref().map(|p| p.state);
        match state {
            Some(RefDefState::TitleContinuation(quote)) => {
                self.find_first_nonspace(line);
                if self.blank {
                    if let Some(pending) = self.pending_refdef.take() {
                        self.abandon_reference_definition(pending);
                    }
                    return false;
                }
                let rest = &line[self.first_nonspace..];
                let closer = matching_title_closer(quote);
                if let Some(pos) = rest.iter().position(|&b| b == closer) {
                    if strings::is_blank(&rest[pos + 1..]) {
                        if let Some(pending) = self.pending_refdef.as_mut() {
                            pending.title.push(b'\n');
                            pending.title.extend_from_slice(&rest[..pos]);
                        }
                        self.finalize_reference_definition();
                        return true;
                    }
                }
                if let Some(pending) = self.pending_refdef.as_mut() {
                    pending.title.push(b'\n');
                    pending.title.extend_from_slice(rest);
                    pending.buffered_lines.push(line.to_vec());
                }
                true
            }
            _ => false,
        }
    }

    fn finalize_reference_definition(&mut self) {
        let Some(pending) = self.pending_refdef.take() else {
            return;
        };
        let label = String::from_utf8_lossy(&pending.label).into_owned();
        let normalized = strings::normalize_reference_label(&label);
        if !normalized.is_empty() {
            self.refmap.entry(normalized).or_insert_with(|| Reference {
                url: strings::clean_url(&pending.url),
                title: strings::clean_title(&pending.title),
            });
        }
    }

    fn abandon_reference_definition(&mut self, pending: PartialReference) {
        for (i, raw) in pending.buffered_lines.iter().enumerate() {
            if i == 0 {
                self.add_text_to_paragraph(raw);
            } else {
                let node = self.current;
                let mut ast = node.data.borrow_mut();
                ast.content.push(b'\n');
                ast.content.extend_from_slice(strings::ltrim_slice(raw));
            }
        }
    }
}

fn matching_title_closer(opener: u8) -> u8 {
    match opener {
        b'(' => b')',
        other => other,
    }
}

/// Whether `list_node` is tight (spec.md §4.2.3 / §3): no blank line
/// between two items, and no blank line separating two block-level
/// children within any single item. Mirrors the teacher's own
/// `item`/`subitem` double loop (the flat "does any item but the last end
/// blank" check misses blanks internal to a single item).
fn list_is_tight<'a>(list_node: &'a AstNode<'a>) -> bool {
    let mut item = list_node.first_child();
    while let Some(cur_item) = item {
        if cur_item.data.borrow().last_line_blank && cur_item.next_sibling().is_some() {
            return false;
        }

        let mut subitem = cur_item.first_child();
        while let Some(cur_sub) = subitem {
            if (cur_item.next_sibling().is_some() || cur_sub.next_sibling().is_some())
                && nodes::ends_with_blank_line(cur_sub)
            {
                return false;
            }
            subitem = cur_sub.next_sibling();
        }

        item = cur_item.next_sibling();
    }
    true
}

fn trim_trailing_blank_lines(literal: &mut Vec<u8>) {
    while literal.last() == Some(&b'\n') {
        let start_of_last = literal[..literal.len() - 1]
            .iter()
            .rposition(|&b| b == b'\n')
            .map(|p| p + 1)
            .unwrap_or(0);
        if strings::is_blank(&literal[start_of_last..literal.len() - 1]) {
            literal.truncate(start_of_last);
        } else {
            break;
        }
    }
}

/// Strips an ATX heading's optional closing `#` sequence (spec.md §4.2.1
/// item f): trailing whitespace, then a run of `#`s that is either
/// preceded by whitespace or makes up the entire remaining text.
fn strip_atx_closing_sequence(content: &mut Vec<u8>) {
    strings::rtrim(content);
    let mut end = content.len();
    while end > 0 && content[end - 1] == b'#' {
        end -= 1;
    }
    if end < content.len() && (end == 0 || matches!(content[end - 1], b' ' | b'\t')) {
        content.truncate(end);
        strings::rtrim(content);
    }
}

/// Splits `buffer` into lines, mapping CR, LF, and CRLF line endings all to
/// plain line boundaries (spec.md §4.1). A final line without a terminator
/// is still emitted.
fn split_lines(buffer: &[u8]) -> Vec<Vec<u8>> {
    let mut lines = Vec::new();
    let mut cur = Vec::new();
    let mut i = 0;
    while i < buffer.len() {
        match buffer[i] {
            b'\n' => {
                lines.push(std::mem::take(&mut cur));
                i += 1;
            }
            b'\r' => {
                lines.push(std::mem::take(&mut cur));
                i += 1;
                if buffer.get(i) == Some(&b'\n') {
                    i += 1;
                }
            }
            c => {
                cur.push(c);
                i += 1;
            }
        }
    }
    if !cur.is_empty() {
        lines.push(cur);
    }
    lines
}

/// Scans a `[label]` at the start of `text`, returning the length including
/// both brackets. The label may contain escaped brackets; an unescaped `[`
/// is not permitted inside (spec.md §4.2.4/§4.3.1 item 5).
pub(crate) fn scan_link_label(text: &[u8]) -> Option<usize> {
    if text.first() != Some(&b'[') {
        return None;
    }
    let mut i = 1;
    let mut len = 0;
    while i < text.len() {
        match text[i] {
            b'\\' if i + 1 < text.len() && crate::ctype::ispunct(text[i + 1]) => {
                i += 2;
                len += 1;
            }
            b'[' => return None,
            b']' => return if len > 0 { Some(i + 1) } else { None },
            _ => {
                i += 1;
                len += 1;
            }
        }
        if len > 999 {
            return None;
        }
    }
    None
}

/// Scans a link destination: angle-bracket form `<...>` or bare form
/// (balanced parens, no whitespace/control bytes). Returns the decoded URL
/// and the number of input bytes consumed.
pub(crate) fn manual_scan_link_url(text: &[u8]) -> Option<(Vec<u8>, usize)> {
    if text.first() == Some(&b'<') {
        let mut i = 1;
        while i < text.len() {
            match text[i] {
                b'>' => return Some((strings::clean_url(&text[..=i]), i + 1)),
                b'\\' if i + 1 < text.len() => i += 2,
                b'<' | b'\n' => return None,
                _ => i += 1,
            }
        }
        return None;
    }

    let mut i = 0;
    let mut depth: i32 = 0;
    while i < text.len() {
        match text[i] {
            c if c <= 0x20 => break,
            b'(' => {
                depth += 1;
                i += 1;
            }
            b')' => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
                i += 1;
            }
            b'\\' if i + 1 < text.len() => i += 2,
            _ => i += 1,
        }
    }
    if i == 0 || depth != 0 {
        return None;
    }
    Some((strings::clean_url(&text[..i]), i))
}

/// Scans a link title (`"..."`, `'...'`, or `(...)`), allowing it to span
/// multiple lines. Returns the decoded title, the bytes consumed on this
/// line, and whether the closing delimiter was found on this line.
pub(crate) fn manual_scan_link_title(text: &[u8]) -> Option<(Vec<u8>, usize, bool)> {
    let opener = *text.first()?;
    let closer = match opener {
        b'"' | b'\'' => opener,
        b'(' => b')',
        _ => return None,
    };
    let mut i = 1;
    while i < text.len() {
        match text[i] {
            c if c == closer => {
                return Some((strings::clean_title(&text[..=i]), i + 1, true));
            }
            b'\\' if i + 1 < text.len() => i += 2,
            b'(' if closer == b')' => return None,
            _ => i += 1,
        }
    }
    Some((text[1..].to_vec(), text.len(), false))
}
