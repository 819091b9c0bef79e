//! The inline parser (spec.md §4.3): a single left-to-right scan over a
//! block's accumulated `content` buffer, dispatching on the next byte to one
//! of the nine inline productions in priority order, plus a trailing pass
//! resolving the emphasis delimiter stack.
//!
//! Links and images are handled by a small recursive-descent step rather
//! than the arena-of-brackets algorithm the teacher's modern parser uses:
//! on `[`/`![`, we scan forward for the balanced closing `]` (skipping code
//! spans and backslash escapes), then try the inline/reference forms against
//! what follows, and recursively reparse the bracketed text as its own
//! inline run. This mirrors an older, simpler shape of the same parser (see
//! DESIGN.md) and is easier to get right by hand than the intrusive
//! delimiter/bracket arena.

use super::{manual_scan_link_title, manual_scan_link_url, scan_link_label, RefMap, Reference};
use crate::ctype::{ispunct, isspace};
use crate::nodes::{make_block, AstNode, NodeLink, NodeValue};
use crate::{autolink, entity, scanners, strings};
use std::cell::RefCell;
use typed_arena::Arena;
use unicode_categories::UnicodeCategories;

/// Parses `content` as inlines, appending the resulting nodes as children of
/// `node`. Called once per paragraph/heading by the block parser.
pub fn parse_inlines<'a>(
    arena: &'a Arena<AstNode<'a>>,
    refmap: &RefMap,
    content: &[u8],
    node: &'a AstNode<'a>,
) {
    let mut input = content.to_vec();
    strings::rtrim(&mut input);
    let line = node.data.borrow().start_line;
    let mut subj = Subject {
        arena,
        refmap,
        input: &input,
        pos: 0,
        line,
        delimiters: Vec::new(),
        link_text_depth: 0,
    };
    while subj.pos < subj.input.len() {
        subj.parse_inline(node);
    }
    subj.process_emphasis();
}

/// A delimiter run (`*`, `**`, `_`, ...) still eligible to open or close an
/// emphasis span. This `Vec` is the stack `process_emphasis` walks, using
/// plain indices in place of the teacher's intrusive arena-linked list.
struct Delimiter<'a> {
    /// The placeholder text node holding this run's literal characters. Its
    /// literal shrinks as the run is consumed by matched emphasis.
    inline: &'a AstNode<'a>,
    delim_char: u8,
    /// How many of this run's characters are still unconsumed.
    length: usize,
    can_open: bool,
    can_close: bool,
}

struct Subject<'i, 'a, 'r> {
    arena: &'a Arena<AstNode<'a>>,
    refmap: &'r RefMap,
    input: &'i [u8],
    pos: usize,
    line: u32,
    delimiters: Vec<Delimiter<'a>>,
    /// Depth of nested "parsing a link's text" contexts; while positive, a
    /// `[` is never allowed to resolve into a link (images still can),
    /// forbidding links inside links (spec.md §4.3.1 item 5).
    link_text_depth: usize,
}

fn is_special_char(c: u8) -> bool {
    matches!(
        c,
        b'\n' | b'\r' | b'`' | b'\\' | b'&' | b'<' | b'[' | b']' | b'!' | b'_' | b'*'
    )
}

impl<'i, 'a, 'r> Subject<'i, 'a, 'r> {
    fn make_inline(&self, value: NodeValue) -> &'a AstNode<'a> {
        self.arena.alloc(AstNode::new(RefCell::new(make_block(value, self.line))))
    }

    fn append_text(&self, node: &'a AstNode<'a>, bytes: Vec<u8>) {
        if bytes.is_empty() {
            return;
        }
        node.append(self.make_inline(NodeValue::Text(bytes)));
    }

    /// Dispatches on the next byte and consumes (at least) it, appending
    /// whatever inline node(s) result as children of `node`.
    fn parse_inline(&mut self, node: &'a AstNode<'a>) {
        let c = self.input[self.pos];
        match c {
            b'\n' | b'\r' => self.handle_newline(node),
            b'`' => self.handle_backtick(node),
            b'\\' => self.handle_backslash(node),
            b'&' => self.handle_entity(node),
            b'<' => self.handle_pointy_brace(node),
            b'*' | b'_' => self.handle_delim(node, c),
            b'[' => self.handle_open_bracket(node, false),
            b'!' if self.input.get(self.pos + 1) == Some(&b'[') => {
                self.pos += 1;
                self.handle_open_bracket(node, true);
            }
            b']' => self.handle_close_bracket(node),
            _ => self.handle_text(node),
        }
    }

    fn find_special_char(&self) -> usize {
        let mut i = self.pos;
        while i < self.input.len() && !is_special_char(self.input[i]) {
            i += 1;
        }
        i
    }

    fn handle_text(&mut self, node: &'a AstNode<'a>) {
        let start = self.pos;
        self.pos = self.find_special_char().max(start + 1);
        self.append_text(node, self.input[start..self.pos].to_vec());
    }

    // ---- line endings (spec.md §4.3.1 item 8) ----------------------------

    fn handle_newline(&mut self, node: &'a AstNode<'a>) {
        let nl_pos = self.pos;
        let mut i = nl_pos;
        let mut spaces = 0usize;
        while i > 0 && self.input[i - 1] == b' ' {
            spaces += 1;
            i -= 1;
        }
        let backslash = spaces == 0 && i > 0 && self.input[i - 1] == b'\\';
        let hard = spaces >= 2 || backslash;

        self.pos = nl_pos + 1;
        while self.pos < self.input.len() && matches!(self.input[self.pos], b' ' | b'\t') {
            self.pos += 1;
        }

        if let Some(last) = node.last_child() {
            if let NodeValue::Text(ref mut lit) = last.data.borrow_mut().value {
                if backslash {
                    if lit.last() == Some(&b'\\') {
                        lit.pop();
                    }
                } else {
                    while lit.last() == Some(&b' ') {
                        lit.pop();
                    }
                }
            }
        }

        node.append(self.make_inline(if hard {
            NodeValue::LineBreak
        } else {
            NodeValue::SoftBreak
        }));
    }

    // ---- code spans (spec.md §4.3.1 item 1) -------------------------------

    fn handle_backtick(&mut self, node: &'a AstNode<'a>) {
        let start = self.pos;
        let mut i = start;
        while i < self.input.len() && self.input[i] == b'`' {
            i += 1;
        }
        let open_len = i - start;
        self.pos = i;

        match self.scan_to_closing_backtick(open_len) {
            Some(end) => {
                let mut buf = self.input[self.pos..end - open_len].to_vec();
                for b in buf.iter_mut() {
                    if *b == b'\n' {
                        *b = b' ';
                    }
                }
                if buf.len() >= 2
                    && buf[0] == b' '
                    && *buf.last().unwrap() == b' '
                    && buf.iter().any(|&b| b != b' ')
                {
                    buf.remove(0);
                    buf.pop();
                }
                self.pos = end;
                node.append(self.make_inline(NodeValue::Code(buf)));
            }
            None => {
                self.append_text(node, self.input[start..self.pos].to_vec());
            }
        }
    }

    fn scan_to_closing_backtick(&self, open_len: usize) -> Option<usize> {
        let mut i = self.pos;
        while i < self.input.len() {
            if self.input[i] == b'`' {
                let run_start = i;
                while i < self.input.len() && self.input[i] == b'`' {
                    i += 1;
                }
                if i - run_start == open_len {
                    return Some(i);
                }
            } else {
                i += 1;
            }
        }
        None
    }

    // ---- autolinks and raw HTML (spec.md §4.3.1 items 2-3) ---------------

    fn handle_pointy_brace(&mut self, node: &'a AstNode<'a>) {
        let rest = &self.input[self.pos + 1..];

        if let Some(len) = autolink::autolink_uri(rest) {
            if rest.get(len) == Some(&b'>') {
                let url = rest[..len].to_vec();
                self.pos += len + 2;
                self.append_autolink(node, url.clone(), url);
                return;
            }
        }
        if let Some(len) = autolink::autolink_email(rest) {
            if rest.get(len) == Some(&b'>') {
                let email = rest[..len].to_vec();
                self.pos += len + 2;
                let mut url = b"mailto:".to_vec();
                url.extend_from_slice(&email);
                self.append_autolink(node, url, email);
                return;
            }
        }
        if let Some(len) = scanners::html_tag(&self.input[self.pos..]) {
            let raw = self.input[self.pos..self.pos + len].to_vec();
            self.pos += len;
            node.append(self.make_inline(NodeValue::HtmlInline(raw)));
            return;
        }

        self.pos += 1;
        self.append_text(node, b"<".to_vec());
    }

    fn append_autolink(&self, node: &'a AstNode<'a>, url: Vec<u8>, display: Vec<u8>) {
        let link = self.make_inline(NodeValue::Link(NodeLink {
            url,
            title: Vec::new(),
        }));
        link.append(self.make_inline(NodeValue::Text(display)));
        node.append(link);
    }

    // ---- entities (spec.md §4.3.1 item 6) --------------------------------

    fn handle_entity(&mut self, node: &'a AstNode<'a>) {
        match entity::unescape(&self.input[self.pos + 1..]) {
            Some((bytes, used)) => {
                self.pos += 1 + used;
                self.append_text(node, bytes);
            }
            None => {
                self.pos += 1;
                self.append_text(node, b"&".to_vec());
            }
        }
    }

    // ---- backslash escapes (spec.md §4.3.1 item 7) ------------------------

    fn handle_backslash(&mut self, node: &'a AstNode<'a>) {
        self.pos += 1;
        if let Some(&c) = self.input.get(self.pos) {
            if ispunct(c) {
                self.pos += 1;
                self.append_text(node, vec![c]);
                return;
            }
        }
        self.append_text(node, b"\\".to_vec());
    }

    // ---- emphasis delimiter runs (spec.md §4.3.2) -------------------------

    fn handle_delim(&mut self, node: &'a AstNode<'a>, c: u8) {
        let start = self.pos;
        let (numdelims, can_open, can_close) = self.scan_delims(c);
        let text = self.make_inline(NodeValue::Text(self.input[start..self.pos].to_vec()));
        node.append(text);
        if can_open || can_close {
            self.delimiters.push(Delimiter {
                inline: text,
                delim_char: c,
                length: numdelims,
                can_open,
                can_close,
            });
        }
    }

    /// Counts a run of `c`, then computes left/right flanking per spec.md
    /// §4.3.2 using full Unicode whitespace/punctuation classification.
    fn scan_delims(&mut self, c: u8) -> (usize, bool, bool) {
        let start = self.pos;
        while self.pos < self.input.len() && self.input[self.pos] == c {
            self.pos += 1;
        }
        let numdelims = self.pos - start;

        let before = self.char_before(start);
        let after = self.char_at(self.pos);

        let before_is_space = before.map_or(true, char::is_whitespace);
        let before_is_punct = before.map_or(false, is_cmark_punctuation);
        let after_is_space = after.map_or(true, char::is_whitespace);
        let after_is_punct = after.map_or(false, is_cmark_punctuation);

        let left_flanking = !after_is_space && (!after_is_punct || before_is_space || before_is_punct);
        let right_flanking = !before_is_space && (!before_is_punct || after_is_space || after_is_punct);

        let (can_open, can_close) = if c == b'_' {
            (
                left_flanking && (!right_flanking || before_is_punct),
                right_flanking && (!left_flanking || after_is_punct),
            )
        } else {
            (left_flanking, right_flanking)
        };

        (numdelims, can_open, can_close)
    }

    fn char_before(&self, pos: usize) -> Option<char> {
        if pos == 0 {
            return None;
        }
        let mut start = pos - 1;
        while start > 0 && (self.input[start] & 0xC0) == 0x80 {
            start -= 1;
        }
        std::str::from_utf8(&self.input[start..pos]).ok()?.chars().next()
    }

    fn char_at(&self, pos: usize) -> Option<char> {
        if pos >= self.input.len() {
            return None;
        }
        let mut end = pos + 1;
        while end < self.input.len() && (self.input[end] & 0xC0) == 0x80 {
            end += 1;
        }
        std::str::from_utf8(&self.input[pos..end]).ok()?.chars().next()
    }

    /// Resolves the whole delimiter stack into `Emph`/`Strong` nodes,
    /// honoring the "rule of 3": a closer whose length is a multiple of 3
    /// can't match an opener whose length is also a multiple of 3 unless
    /// both lengths are multiples of 3.
    fn process_emphasis(&mut self) {
        let mut closer = 0;
        while closer < self.delimiters.len() {
            if !self.delimiters[closer].can_close || self.delimiters[closer].length == 0 {
                closer += 1;
                continue;
            }

            let close_char = self.delimiters[closer].delim_char;
            let close_len = self.delimiters[closer].length;

            let mut opener_ix = None;
            let mut o = closer;
            while o > 0 {
                o -= 1;
                let d = &self.delimiters[o];
                if d.length == 0 || d.delim_char != close_char || !d.can_open {
                    continue;
                }
                let rule_of_3 = (d.can_open && d.can_close || self.delimiters[closer].can_open)
                    && (d.length + close_len) % 3 == 0
                    && !(d.length % 3 == 0 && close_len % 3 == 0);
                if rule_of_3 {
                    continue;
                }
                opener_ix = Some(o);
                break;
            }

            let Some(opener_ix) = opener_ix else {
                closer += 1;
                continue;
            };

            let strong = self.delimiters[opener_ix].length >= 2 && self.delimiters[closer].length >= 2;
            let used = if strong { 2 } else { 1 };

            let opener_node = self.delimiters[opener_ix].inline;
            let closer_node = self.delimiters[closer].inline;

            let wrap = self.make_inline(if strong {
                NodeValue::Strong
            } else {
                NodeValue::Emph
            });

            let mut cur = opener_node.next_sibling();
            while let Some(n) = cur {
                if n.same_node(closer_node) {
                    break;
                }
                let next = n.next_sibling();
                n.detach();
                wrap.append(n);
                cur = next;
            }
            opener_node.insert_after(wrap);

            self.shrink_delim(opener_ix, used);
            self.shrink_delim(closer, used);

            // Any delimiters strictly between opener and closer that were
            // just swallowed into `wrap` as plain text can never match
            // anything further; drop them from the stack so later scans
            // don't see stale entries. They stay in the tree as-is (inside
            // `wrap`), only the bookkeeping entry is removed.
            self.delimiters.drain(opener_ix + 1..closer);
            closer = opener_ix + 1;
        }

        self.delimiters.clear();
    }

    fn shrink_delim(&mut self, ix: usize, used: usize) {
        let d = &mut self.delimiters[ix];
        d.length -= used;
        let empty = {
            let mut ast = d.inline.data.borrow_mut();
            if let NodeValue::Text(ref mut v) = ast.value {
                v.truncate(d.length);
            }
            d.length == 0
        };
        if empty {
            d.inline.detach();
        }
    }

    // ---- links and images (spec.md §4.3.1 item 5) -------------------------

    fn handle_open_bracket(&mut self, node: &'a AstNode<'a>, image: bool) {
        let marker: &[u8] = if image { b"![" } else { b"[" };
        self.pos += 1;
        self.append_text(node, marker.to_vec());

        let text_start = self.pos;
        let Some(close_rel) = self.scan_balanced_bracket() else {
            return;
        };
        let text_end = text_start + close_rel;
        let after_bracket = text_end + 1;

        if !image && self.link_text_depth > 0 {
            // Link-in-link is forbidden; leave the `[` as literal text
            // already appended above and keep scanning normally.
            return;
        }

        let Some((url, title, tail_len)) = self.resolve_link_tail(text_start, text_end, after_bracket) else {
            return;
        };

        // The literal "["/"![" marker we appended above is replaced by the
        // new link/image node.
        node.last_child().unwrap().detach();

        let inner_text = self.input[text_start..text_end].to_vec();
        let value = if image {
            NodeValue::Image(NodeLink { url, title })
        } else {
            NodeValue::Link(NodeLink { url, title })
        };
        let wrapper = self.make_inline(value);
        node.append(wrapper);

        if !image {
            self.link_text_depth += 1;
        }
        parse_inlines(self.arena, self.refmap, &inner_text, wrapper);
        if !image {
            self.link_text_depth -= 1;
        }

        self.pos = after_bracket + tail_len;
    }

    /// From `self.pos` sitting just after an opening `[`/`![`, finds the
    /// offset (relative to that position) of the matching `]`, treating
    /// well-formed code spans as opaque and tracking bracket depth.
    fn scan_balanced_bracket(&self) -> Option<usize> {
        let start = self.pos;
        let mut i = start;
        let mut depth = 1i32;
        while i < self.input.len() {
            match self.input[i] {
                b'\\' if i + 1 < self.input.len() && ispunct(self.input[i + 1]) => i += 2,
                b'`' => {
                    let run_start = i;
                    let mut j = i;
                    while j < self.input.len() && self.input[j] == b'`' {
                        j += 1;
                    }
                    let open_len = j - run_start;
                    let mut k = j;
                    let mut closed = None;
                    while k < self.input.len() {
                        if self.input[k] == b'`' {
                            let rs = k;
                            while k < self.input.len() && self.input[k] == b'`' {
                                k += 1;
                            }
                            if k - rs == open_len {
                                closed = Some(k);
                                break;
                            }
                        } else {
                            k += 1;
                        }
                    }
                    i = closed.unwrap_or(j);
                }
                b'[' => {
                    depth += 1;
                    i += 1;
                }
                b']' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i - start);
                    }
                    i += 1;
                }
                _ => i += 1,
            }
        }
        None
    }

    /// Given the matched `[text]` span, looks at what follows `]` to decide
    /// the link/image's destination and title: inline form, full/collapsed
    /// reference, or shortcut reference. Returns the destination, title, and
    /// number of bytes consumed after the closing `]`.
    fn resolve_link_tail(
        &self,
        text_start: usize,
        text_end: usize,
        after_bracket: usize,
    ) -> Option<(Vec<u8>, Vec<u8>, usize)> {
        if self.input.get(after_bracket) == Some(&b'(') {
            if let Some(result) = self.scan_inline_link_tail(after_bracket) {
                return Some(result);
            }
        }

        let rest = &self.input[after_bracket..];
        if rest.first() == Some(&b'[') {
            if let Some(label_len) = scan_link_label(rest) {
                let label: &[u8] = if label_len == 2 {
                    &self.input[text_start..text_end]
                } else {
                    &rest[1..label_len - 1]
                };
                return self
                    .lookup_reference(label)
                    .map(|r| (r.url.clone(), r.title.clone(), label_len));
            }
        }

        // Shortcut reference: the bracketed text itself is the label.
        let label = &self.input[text_start..text_end];
        self.lookup_reference(label).map(|r| (r.url.clone(), r.title.clone(), 0))
    }

    fn lookup_reference(&self, label: &[u8]) -> Option<&Reference> {
        let label = String::from_utf8_lossy(label);
        let normalized = strings::normalize_reference_label(&label);
        self.refmap.get(&normalized)
    }

    fn scan_inline_link_tail(&self, open_paren: usize) -> Option<(Vec<u8>, Vec<u8>, usize)> {
        let mut i = open_paren + 1;
        i += self.skip_link_whitespace(i);

        let url = if self.input.get(i) == Some(&b')') {
            Vec::new()
        } else {
            let (url, used) = manual_scan_link_url(&self.input[i..])?;
            i += used;
            url
        };

        let before_title = i;
        let ws = self.skip_link_whitespace(i);
        let title = if ws > 0 && matches!(self.input.get(i + ws), Some(b'"') | Some(b'\'') | Some(b'(')) {
            let (title, tused, terminated) = manual_scan_link_title(&self.input[i + ws..])?;
            if !terminated {
                return None;
            }
            i += ws + tused;
            title
        } else {
            i = before_title;
            Vec::new()
        };

        i += self.skip_link_whitespace(i);
        if self.input.get(i) != Some(&b')') {
            return None;
        }
        i += 1;

        Some((url, title, i - open_paren))
    }

    fn skip_link_whitespace(&self, pos: usize) -> usize {
        let mut i = pos;
        while i < self.input.len() && (isspace(self.input[i]) || self.input[i] == b'\n') {
            i += 1;
        }
        i - pos
    }

    fn handle_close_bracket(&mut self, node: &'a AstNode<'a>) {
        // Reached without a matching opener having consumed it (or the
        // match failed): literal `]`.
        self.pos += 1;
        self.append_text(node, b"]".to_vec());
    }
}

/// A Unicode punctuation character per the Glossary: the P or S general
/// category, which subsumes ASCII punctuation.
fn is_cmark_punctuation(c: char) -> bool {
    c.is_punctuation() || c.is_symbol()
}
