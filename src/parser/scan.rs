//! Byte-level helpers shared by the markup, style and script scanners. All
//! matching is done on ASCII bytes, which never occur inside UTF-8
//! continuation bytes, so every returned offset is a char boundary.

use memchr::{memchr, memchr2, memmem};

#[inline]
pub fn starts_with_ignore_ascii_case_at(haystack: &[u8], start: usize, needle: &[u8]) -> bool {
    haystack.len() >= start + needle.len()
        && haystack[start..start + needle.len()].eq_ignore_ascii_case(needle)
}

#[inline]
pub fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }

    pos
}

#[inline]
pub fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic()
}

#[inline]
pub fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'_' | b':')
}

/// End of a tag or attribute name starting at `start`, or `None` if there's
/// no name there.
#[inline]
pub fn scan_name(bytes: &[u8], start: usize) -> Option<usize> {
    if !bytes.get(start).copied().is_some_and(is_name_start) {
        return None;
    }

    let mut end = start + 1;

    while end < bytes.len() && is_name_char(bytes[end]) {
        end += 1;
    }

    Some(end)
}

#[inline]
pub fn find_byte(bytes: &[u8], from: usize, b: u8) -> Option<usize> {
    memchr(b, &bytes[from..]).map(|i| from + i)
}

#[inline]
pub fn find_either(bytes: &[u8], from: usize, b1: u8, b2: u8) -> Option<usize> {
    memchr2(b1, b2, &bytes[from..]).map(|i| from + i)
}

#[inline]
pub fn find_seq(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    memmem::find(&bytes[from..], needle).map(|i| from + i)
}

#[inline]
pub fn line_end(bytes: &[u8], from: usize) -> usize {
    find_byte(bytes, from, b'\n').unwrap_or(bytes.len())
}

/// Finds the closing quote of a string literal whose opening quote is at
/// `open`, honouring backslash escapes. Returns the index of the closing
/// quote.
pub fn find_closing_quote(bytes: &[u8], open: usize, cross_lines: bool) -> Option<usize> {
    let quote = bytes[open];
    let mut pos = open + 1;

    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b'\n' if !cross_lines => return None,
            b if b == quote => return Some(pos),
            _ => pos += 1,
        }
    }

    None
}

/// Start and end of the first `</name\s*>` at or after `from`.
pub fn find_close_tag(input: &str, from: usize, name: &[u8]) -> Option<(usize, usize)> {
    let bytes = input.as_bytes();
    let mut pos = from;

    while let Some(lt) = find_byte(bytes, pos, b'<') {
        if bytes.get(lt + 1) == Some(&b'/')
            && starts_with_ignore_ascii_case_at(bytes, lt + 2, name)
        {
            let end = skip_whitespace(bytes, lt + 2 + name.len());

            if bytes.get(end) == Some(&b'>') {
                return Some((lt, end + 1));
            }
        }

        pos = lt + 1;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_tag_search() {
        let input = "a < b </scriptx> </SCRIPT >tail";

        assert_eq!(find_close_tag(input, 0, b"script"), Some((17, 27)));
        assert_eq!(find_close_tag("</style", 0, b"style"), None);
    }

    #[test]
    fn quotes() {
        assert_eq!(find_closing_quote(b"'a\\'b'", 0, false), Some(5));
        assert_eq!(find_closing_quote(b"'a\nb'", 0, false), None);
        assert_eq!(find_closing_quote(b"`a\nb`", 0, true), Some(4));
    }
}
