//! HTML entity decoding: named entities (`&amp;`), decimal character
//! references (`&#99;`), and hexadecimal character references (`&#x63;`).

use crate::ctype::isdigit;
use std::char;
use std::cmp::min;
use std::str;

include!(concat!(env!("OUT_DIR"), "/entitydata.rs"));

pub const ENTITY_MIN_LENGTH: usize = 2;
pub const ENTITY_MAX_LENGTH: usize = 31;

fn isxdigit(ch: u8) -> bool {
    ch.is_ascii_hexdigit()
}

/// Attempts to decode an entity or character reference starting right after
/// the `&` at the front of `text`. On success, returns the decoded UTF-8
/// bytes and the number of bytes of `text` consumed (not including the
/// leading `&`).
pub fn unescape(text: &[u8]) -> Option<(Vec<u8>, usize)> {
    if text.len() >= 3 && text[0] == b'#' {
        let mut codepoint: u32 = 0;
        let mut i;

        let num_digits = if text.len() > 1 && isdigit(text[1]) {
            i = 1;
            while i < text.len() && isdigit(text[i]) {
                codepoint = (codepoint * 10) + (text[i] as u32 - '0' as u32);
                codepoint = min(codepoint, 0x11_0000);
                i += 1;
            }
            i - 1
        } else if text.len() > 1 && (text[1] == b'x' || text[1] == b'X') {
            i = 2;
            while i < text.len() && isxdigit(text[i]) {
                codepoint = (codepoint * 16) + ((text[i] as u32 | 32) % 39 - 9);
                codepoint = min(codepoint, 0x11_0000);
                i += 1;
            }
            i - 2
        } else {
            0
        };

        if (1..=8).contains(&num_digits) && i < text.len() && text[i] == b';' {
            if codepoint == 0 || (0xD800..=0xDFFF).contains(&codepoint) || codepoint >= 0x110000 {
                codepoint = 0xFFFD;
            }
            return Some((
                char::from_u32(codepoint)
                    .unwrap_or('\u{FFFD}')
                    .to_string()
                    .into_bytes(),
                i + 1,
            ));
        }
    }

    let size = min(text.len(), ENTITY_MAX_LENGTH);
    for i in ENTITY_MIN_LENGTH..size {
        if text[i] == b' ' {
            return None;
        }

        if text[i] == b';' {
            return lookup(&text[..i]).map(|e| (e.as_bytes().to_vec(), i + 1));
        }
    }

    None
}

fn lookup(name: &[u8]) -> Option<&'static str> {
    let name = str::from_utf8(name).ok()?;
    entitydata::TRANSLATED_ENTITIES
        .binary_search_by_key(&name, |&(n, _)| n)
        .ok()
        .map(|idx| entitydata::TRANSLATED_ENTITIES[idx].1)
}

/// Decodes every entity and character reference in `src`, leaving other
/// bytes untouched. An `&` that does not begin a valid reference is passed
/// through literally.
pub fn unescape_html(src: &[u8]) -> Vec<u8> {
    let size = src.len();
    let mut i = 0;
    let mut v = Vec::with_capacity(size);

    while i < size {
        let org = i;
        while i < size && src[i] != b'&' {
            i += 1;
        }

        if i > org {
            if org == 0 && i >= size {
                return src.to_vec();
            }
            v.extend_from_slice(&src[org..i]);
        }

        if i >= size {
            return v;
        }

        i += 1;
        match unescape(&src[i..]) {
            Some((chs, used)) => {
                v.extend_from_slice(&chs);
                i += used;
            }
            None => v.push(b'&'),
        }
    }

    v
}
