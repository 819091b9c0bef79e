//! Recognizers for the two CommonMark autolink forms found inside `<…>`:
//! `<scheme:uri>` and `<local@domain>`. Used by the inline parser's autolink
//! production (spec.md §4.3.1 item 2); the rest of the destination/title
//! handling lives in [`crate::strings`].

use crate::ctype::{isalnum, isalpha};

/// If `text` begins with a valid URI autolink body (a scheme of 2-32
/// characters, then `:`, then zero or more non-whitespace,
/// non-control, non-`<`/`>` bytes), returns the length of that body.
pub fn autolink_uri(text: &[u8]) -> Option<usize> {
    let scheme_len = scheme(text)?;
    if text.get(scheme_len) != Some(&b':') {
        return None;
    }
    let mut i = scheme_len + 1;
    while i < text.len() {
        match text[i] {
            b'<' | b'>' => break,
            c if c <= 0x20 => break,
            _ => i += 1,
        }
    }
    Some(i)
}

/// Length of a valid autolink scheme (2-32 alphanumeric/`+`/`.`/`-`
/// characters, first an ASCII letter) at the start of `text`, or `None`.
pub fn scheme(text: &[u8]) -> Option<usize> {
    if text.is_empty() || !isalpha(text[0]) {
        return None;
    }
    let mut i = 1;
    while i < text.len() && i < 32 {
        match text[i] {
            c if isalnum(c) => i += 1,
            b'+' | b'.' | b'-' => i += 1,
            _ => break,
        }
    }
    if (2..=32).contains(&i) {
        Some(i)
    } else {
        None
    }
}

/// If `text` begins with a valid email autolink body (the grammar from the
/// CommonMark spec's Appendix: `local@domain(.domain)+`, where `domain` is
/// an alphanumeric label optionally hyphenated), returns its length.
pub fn autolink_email(text: &[u8]) -> Option<usize> {
    let mut i = 0;
    while i < text.len() && is_email_local_char(text[i]) {
        i += 1;
    }
    if i == 0 || text.get(i) != Some(&b'@') {
        return None;
    }
    i += 1;

    loop {
        let label_start = i;
        let mut len = 0;
        while i < text.len() && (isalnum(text[i]) || text[i] == b'-') {
            if text[i] == b'-' && len == 0 {
                return None;
            }
            i += 1;
            len += 1;
        }
        if len == 0 || len > 63 || text.get(i.wrapping_sub(1)) == Some(&b'-') {
            return None;
        }
        let _ = label_start;
        if text.get(i) == Some(&b'.') {
            i += 1;
            continue;
        }
        break;
    }

    Some(i)
}

fn is_email_local_char(c: u8) -> bool {
    isalnum(c) || matches!(c, b'.' | b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'/' | b'=' | b'?' | b'^' | b'_' | b'`' | b'{' | b'|' | b'}' | b'~' | b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uri_scheme() {
        assert_eq!(autolink_uri(b"http://foo.bar>"), Some(14));
        assert_eq!(autolink_uri(b"a:b>"), Some(3));
        assert_eq!(autolink_uri(b"not a scheme"), None);
    }

    #[test]
    fn email() {
        assert_eq!(autolink_email(b"foo@bar.baz>"), Some(11));
        assert_eq!(autolink_email(b"foo@bar>"), None);
        assert_eq!(autolink_email(b"@bar.baz>"), None);
    }
}
