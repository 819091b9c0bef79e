//! Line-prefix recognizers for the block parser.
//!
//! These are hand-written byte matchers rather than the pest-grammar-backed
//! scanners seen elsewhere in this lineage: that grammar file depends on a
//! `pest`/`twoway` pairing that never made it into this crate's actual
//! dependency stack (see DESIGN.md). The function signatures below keep the
//! same shape — each recognizes a fixed line-start production and reports
//! how much of the line it consumed.

use crate::ctype::{isalnum, isalpha, isspace};

/// Whether `line` is blank for block-parsing purposes: empty, or containing
/// only spaces/tabs (with an optional trailing line terminator already
/// stripped by the preprocessor).
pub fn is_blank(line: &[u8]) -> bool {
    line.iter().all(|&c| c == b' ' || c == b'\t')
}

/// Matches an ATX heading start: 1-6 `#` characters followed by a space,
/// tab, or end of line. Returns `(level, offset_of_content)`, where
/// `offset_of_content` is the index right after the run of `#` and any
/// single following space/tab has been skipped (callers still need to strip
/// further leading spaces from the content and any trailing closing hashes).
pub fn atx_heading_start(line: &[u8]) -> Option<(u8, usize)> {
    let mut i = 0;
    while i < line.len() && i < 6 && line[i] == b'#' {
        i += 1;
    }
    if i == 0 || i > 6 {
        return None;
    }
    if i < line.len() && line[i] != b' ' && line[i] != b'\t' && !is_line_end(line[i]) {
        return None;
    }
    Some((i as u8, i))
}

fn is_line_end(c: u8) -> bool {
    c == b'\n' || c == b'\r'
}

/// Matches a thematic break: a line of only whitespace and 3+ of the same
/// one of `*`, `-`, `_`.
pub fn thematic_break(line: &[u8]) -> bool {
    let mut count = 0;
    let mut marker = 0u8;
    for &c in line {
        match c {
            b'*' | b'-' | b'_' => {
                if marker == 0 {
                    marker = c;
                } else if c != marker {
                    return false;
                }
                count += 1;
            }
            b' ' | b'\t' => {}
            c if is_line_end(c) => break,
            _ => return false,
        }
    }
    count >= 3
}

pub enum SetextChar {
    Equals,
    Hyphen,
}

/// Matches a setext heading underline: a run of `=` (level 1) or `-`
/// (level 2), with only trailing whitespace permitted after it.
pub fn setext_heading_line(line: &[u8]) -> Option<SetextChar> {
    if line.is_empty() {
        return None;
    }
    let marker = line[0];
    if marker != b'=' && marker != b'-' {
        return None;
    }
    let mut i = 0;
    while i < line.len() && line[i] == marker {
        i += 1;
    }
    while i < line.len() && (line[i] == b' ' || line[i] == b'\t') {
        i += 1;
    }
    if i < line.len() && !is_line_end(line[i]) {
        return None;
    }
    Some(if marker == b'=' {
        SetextChar::Equals
    } else {
        SetextChar::Hyphen
    })
}

/// Matches a fenced code block opener: a run of 3+ `` ` `` or `~` (a
/// backtick fence's info string may not itself contain a backtick). Returns
/// `(fence_char, fence_length)`.
pub fn open_code_fence(line: &[u8]) -> Option<(u8, usize)> {
    if line.is_empty() {
        return None;
    }
    let marker = line[0];
    if marker != b'`' && marker != b'~' {
        return None;
    }
    let mut i = 0;
    while i < line.len() && line[i] == marker {
        i += 1;
    }
    if i < 3 {
        return None;
    }
    if marker == b'`' && line[i..].contains(&b'`') {
        return None;
    }
    Some((marker, i))
}

/// Whether `line` closes a fence opened with `fence_char`/`fence_length`:
/// same character, at least as long, and nothing but whitespace follows.
pub fn close_code_fence(line: &[u8], fence_char: u8, fence_length: usize) -> bool {
    let mut i = 0;
    while i < line.len() && line[i] == fence_char {
        i += 1;
    }
    if i < fence_length {
        return false;
    }
    line[i..].iter().all(|&c| c == b' ' || c == b'\t' || is_line_end(c))
}

/// The 7 HTML-block start conditions (spec.md §6.1), tried in order. Types
/// 1-6 are checked case-insensitively against the start of the (already
/// indent-stripped) line; type 7 is checked separately via
/// [`html_block_start_7`] because it additionally requires the block not be
/// interrupting a paragraph.
pub fn html_block_start(line: &[u8]) -> Option<u8> {
    if line.is_empty() || line[0] != b'<' {
        return None;
    }

    const TYPE1_TAGS: &[&str] = &["script", "pre", "style", "textarea"];
    let rest = &line[1..];
    for tag in TYPE1_TAGS {
        if rest.len() >= tag.len() && eq_ignore_case(&rest[..tag.len()], tag.as_bytes()) {
            let next = rest.get(tag.len()).copied();
            if tag_boundary(next) {
                return Some(1);
            }
        }
    }

    if line.starts_with(b"<!--") {
        return Some(2);
    }
    if line.starts_with(b"<?") {
        return Some(3);
    }
    if line.len() >= 3 && line[1] == b'!' && line[2].is_ascii_uppercase() {
        return Some(4);
    }
    if line.starts_with(b"<![CDATA[") {
        return Some(5);
    }

    // Type 6: `<tag` or `</tag`, where tag is a recognized block-level name.
    let (after_slash, name_region) = if rest.first() == Some(&b'/') {
        (true, &rest[1..])
    } else {
        (false, rest)
    };
    if let Some(tag_len) = block_tag_at(name_region) {
        let mut next_idx = tag_len;
        if after_slash {
            next_idx += 1; // account for the leading '/'
        }
        let next = rest.get(next_idx).copied();
        if tag_boundary(next) || (!after_slash && next == Some(b'/') && rest.get(next_idx + 1) == Some(&b'>')) {
            return Some(6);
        }
    }

    None
}

/// HTML-block start type 7 (spec.md §6.1): a complete open or close tag
/// occupying the line, with nothing but whitespace following it. Checked
/// separately from the other six types because it additionally requires
/// the block not be interrupting a paragraph (the caller's concern).
pub fn html_block_start_7(line: &[u8]) -> bool {
    match html_tag(line) {
        Some(len) => strings_is_blank(&line[len..]),
        None => false,
    }
}

fn strings_is_blank(s: &[u8]) -> bool {
    s.iter().all(|&c| c == b' ' || c == b'\t')
}

fn tag_boundary(next: Option<u8>) -> bool {
    match next {
        None => true,
        Some(b' ') | Some(b'\t') | Some(b'>') => true,
        Some(c) => is_line_end(c),
    }
}

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "base", "basefont", "blockquote", "body", "caption", "center",
    "col", "colgroup", "dd", "details", "dialog", "dir", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "frame", "frameset", "h1", "h2", "h3", "h4", "h5",
    "h6", "head", "header", "hr", "html", "iframe", "legend", "li", "link", "main", "menu",
    "menuitem", "nav", "noframes", "ol", "optgroup", "option", "p", "param", "search", "section",
    "summary", "table", "tbody", "td", "tfoot", "th", "thead", "title", "tr", "track", "ul",
];

fn block_tag_at(text: &[u8]) -> Option<usize> {
    for tag in BLOCK_TAGS {
        let tb = tag.as_bytes();
        if text.len() >= tb.len() && eq_ignore_case(&text[..tb.len()], tb) {
            return Some(tb.len());
        }
    }
    None
}

fn eq_ignore_case(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.to_ascii_lowercase() == y.to_ascii_lowercase())
}

/// Whether `line` closes an HTML block of the given type (types 1-5 only;
/// types 6/7 close on the next blank line, handled by the caller directly).
pub fn html_block_end(block_type: u8, line: &[u8]) -> bool {
    match block_type {
        1 => {
            contains_ci(line, b"</script>") || contains_ci(line, b"</pre>") || contains_ci(line, b"</style>")
                || contains_ci(line, b"</textarea>")
        }
        2 => contains(line, b"-->"),
        3 => contains(line, b"?>"),
        4 => line.contains(&b'>'),
        5 => contains(line, b"]]>"),
        _ => false,
    }
}

fn contains(hay: &[u8], needle: &[u8]) -> bool {
    hay.windows(needle.len()).any(|w| w == needle)
}

fn contains_ci(hay: &[u8], needle: &[u8]) -> bool {
    if needle.len() > hay.len() {
        return false;
    }
    hay.windows(needle.len()).any(|w| eq_ignore_case(w, needle))
}

/// Scans a complete HTML tag (open or close), comment, processing
/// instruction, declaration, or CDATA section starting at the beginning of
/// `text`, per the inline raw-HTML grammar (spec.md §4.3.1 item 3). Returns
/// the byte length of the match, including the enclosing `<`/`>`.
pub fn html_tag(text: &[u8]) -> Option<usize> {
    if text.is_empty() || text[0] != b'<' {
        return None;
    }

    if text.starts_with(b"<!--") {
        let rest = &text[4..];
        if rest.starts_with(b">") || rest.starts_with(b"->") {
            return None;
        }
        return find(rest, b"-->").map(|p| 4 + p + 3);
    }

    if text.starts_with(b"<?") {
        return find(&text[2..], b"?>").map(|p| 2 + p + 2);
    }

    if text.starts_with(b"<![CDATA[") {
        return find(&text[9..], b"]]>").map(|p| 9 + p + 3);
    }

    if text.len() >= 2 && text[1] == b'!' && text[2..].first().map_or(false, |c| c.is_ascii_alphabetic()) {
        return find(&text[2..], b">").map(|p| 2 + p + 1);
    }

    if text.len() >= 2 && text[1] == b'/' {
        return scan_close_tag(&text[2..]).map(|n| 2 + n);
    }

    scan_open_tag(&text[1..]).map(|n| 1 + n)
}

fn find(hay: &[u8], needle: &[u8]) -> Option<usize> {
    hay.windows(needle.len()).position(|w| w == needle)
}

fn tag_name_len(text: &[u8]) -> usize {
    if text.is_empty() || !text[0].is_ascii_alphabetic() {
        return 0;
    }
    let mut i = 1;
    while i < text.len() && (text[i].is_ascii_alphanumeric() || text[i] == b'-') {
        i += 1;
    }
    i
}

fn scan_close_tag(text: &[u8]) -> Option<usize> {
    let n = tag_name_len(text);
    if n == 0 {
        return None;
    }
    let mut i = n;
    while i < text.len() && isspace(text[i]) {
        i += 1;
    }
    if text.get(i) == Some(&b'>') {
        Some(i + 1)
    } else {
        None
    }
}

fn scan_open_tag(text: &[u8]) -> Option<usize> {
    let n = tag_name_len(text);
    if n == 0 {
        return None;
    }
    let mut i = n;
    loop {
        let ws_start = i;
        while i < text.len() && isspace(text[i]) {
            i += 1;
        }
        let had_ws = i > ws_start;

        if text.get(i) == Some(&b'/') {
            return if text.get(i + 1) == Some(&b'>') { Some(i + 2) } else { None };
        }
        if text.get(i) == Some(&b'>') {
            return Some(i + 1);
        }
        if !had_ws {
            return None;
        }

        let name_start = i;
        if i >= text.len() || !(text[i].is_ascii_alphabetic() || text[i] == b'_' || text[i] == b':') {
            return None;
        }
        i += 1;
        while i < text.len()
            && (text[i].is_ascii_alphanumeric()
                || matches!(text[i], b'_' | b':' | b'.' | b'-'))
        {
            i += 1;
        }
        let _ = name_start;

        let mut j = i;
        while j < text.len() && isspace(text[j]) {
            j += 1;
        }
        if text.get(j) == Some(&b'=') {
            j += 1;
            while j < text.len() && isspace(text[j]) {
                j += 1;
            }
            match text.get(j) {
                Some(&q @ (b'"' | b'\'')) => {
                    j += 1;
                    let start = j;
                    while j < text.len() && text[j] != q {
                        j += 1;
                    }
                    if j >= text.len() {
                        return None;
                    }
                    let _ = start;
                    j += 1;
                }
                Some(_) => {
                    let start = j;
                    while j < text.len()
                        && !isspace(text[j])
                        && !matches!(text[j], b'"' | b'\'' | b'=' | b'<' | b'>' | b'`')
                    {
                        j += 1;
                    }
                    if j == start {
                        return None;
                    }
                }
                None => return None,
            }
            i = j;
        } else {
            i = j;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atx() {
        assert_eq!(atx_heading_start(b"# foo"), Some((1, 2)));
        assert_eq!(atx_heading_start(b"###### foo"), Some((6, 7)));
        assert_eq!(atx_heading_start(b"####### foo"), None);
        assert_eq!(atx_heading_start(b"#foo"), None);
        assert_eq!(atx_heading_start(b"#"), Some((1, 1)));
    }

    #[test]
    fn hr() {
        assert!(thematic_break(b"***"));
        assert!(thematic_break(b"- - -"));
        assert!(thematic_break(b" ** * ** * ** * **"));
        assert!(!thematic_break(b"**"));
        assert!(!thematic_break(b"* * -"));
    }

    #[test]
    fn fence() {
        assert_eq!(open_code_fence(b"```rust"), Some((b'`', 3)));
        assert_eq!(open_code_fence(b"``` rust `x`"), None);
        assert!(close_code_fence(b"````", b'`', 3));
        assert!(!close_code_fence(b"``", b'`', 3));
    }

    #[test]
    fn tag() {
        assert_eq!(html_tag(b"<a href=\"x\">"), Some(12));
        assert_eq!(html_tag(b"<!-- comment -->"), Some(16));
        assert_eq!(html_tag(b"</a>"), Some(4));
        assert_eq!(html_tag(b"<a/>"), Some(4));
    }
}
