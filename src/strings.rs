//! Small string/byte utilities shared by the block and inline parsers.

use crate::ctype::{ispunct, isspace};
use crate::entity;

/// Un-escape backslash escapes of ASCII punctuation in place (spec.md
/// §4.3.1 item 7), operating on raw UTF-8 bytes.
pub fn unescape(v: &mut Vec<u8>) {
    let mut r = 0;
    while r < v.len() {
        if v[r] == b'\\' && r + 1 < v.len() && ispunct(v[r + 1]) {
            v.remove(r);
        }
        r += 1;
    }
}

pub fn is_line_end_char(ch: u8) -> bool {
    ch == b'\n' || ch == b'\r'
}

pub fn is_space_or_tab(ch: u8) -> bool {
    ch == b'\t' || ch == b' '
}

pub fn rtrim(line: &mut Vec<u8>) {
    while let Some(&last) = line.last() {
        if isspace(last) {
            line.pop();
        } else {
            break;
        }
    }
}

pub fn ltrim(line: &mut Vec<u8>) {
    let mut n = 0;
    while n < line.len() && isspace(line[n]) {
        n += 1;
    }
    line.drain(0..n);
}

pub fn trim(line: &mut Vec<u8>) {
    ltrim(line);
    rtrim(line);
}

pub fn trim_slice(mut i: &[u8]) -> &[u8] {
    while !i.is_empty() && isspace(i[0]) {
        i = &i[1..];
    }
    while !i.is_empty() && isspace(i[i.len() - 1]) {
        i = &i[..i.len() - 1];
    }
    i
}

/// Like [`trim_slice`], but only strips leading whitespace. Used when
/// joining a paragraph's source lines: trailing spaces are left in place
/// since the inline parser needs them to tell a hard line break (two or
/// more trailing spaces) from a soft one.
pub fn ltrim_slice(mut i: &[u8]) -> &[u8] {
    while !i.is_empty() && isspace(i[0]) {
        i = &i[1..];
    }
    i
}

/// Decodes a link/image destination: strips an angle-bracket wrapper if
/// present, decodes HTML entities, then un-escapes backslash escapes.
pub fn clean_url(url: &[u8]) -> Vec<u8> {
    let url = trim_slice(url);
    if url.is_empty() {
        return Vec::new();
    }

    let mut b = if url[0] == b'<' && url[url.len() - 1] == b'>' {
        entity::unescape_html(&url[1..url.len() - 1])
    } else {
        entity::unescape_html(url)
    };

    unescape(&mut b);
    b
}

/// Decodes a link/image title: strips the surrounding quote/paren pair,
/// decodes HTML entities, then un-escapes backslash escapes.
pub fn clean_title(title: &[u8]) -> Vec<u8> {
    if title.is_empty() {
        return Vec::new();
    }

    let first = title[0];
    let last = title[title.len() - 1];

    let mut b = if (first == b'\'' && last == b'\'')
        || (first == b'(' && last == b')')
        || (first == b'"' && last == b'"')
    {
        entity::unescape_html(&title[1..title.len() - 1])
    } else {
        entity::unescape_html(title)
    };

    unescape(&mut b);
    b
}

/// Whether `s` is empty or contains only whitespace (a CommonMark "blank
/// line", once container markers have been stripped).
pub fn is_blank(s: &[u8]) -> bool {
    s.iter().all(|&c| c == b' ' || c == b'\t')
}

/// Normalizes a reference label per the Glossary: whitespace runs collapsed
/// to a single space, leading/trailing whitespace trimmed, and Unicode case
/// folded (full Unicode case folding subsumes the spec's ASCII-lowercase +
/// Latin-1/Greek/sharp-s folding requirement).
pub fn normalize_reference_label(i: &str) -> String {
    let trimmed = i.trim();
    let mut collapsed = String::with_capacity(trimmed.len());
    let mut last_was_whitespace = false;
    for c in trimmed.chars() {
        if c.is_whitespace() {
            if !last_was_whitespace {
                collapsed.push(' ');
                last_was_whitespace = true;
            }
        } else {
            last_was_whitespace = false;
            collapsed.push(c);
        }
    }
    caseless::default_case_fold_str(&collapsed)
}
