use super::scan::*;
use crate::token::{Attribute, BeginTag, Comment, EndTag, MarkupDirective, Token};

/// Tries every markup construct at `at` (which holds `<`), returning the
/// token and the offset right after it.
pub fn scan_markup(input: &str, at: usize) -> Option<(Token<'_>, usize)> {
    let bytes = input.as_bytes();

    debug_assert_eq!(bytes[at], b'<');

    match *bytes.get(at + 1)? {
        b'!' => scan_comment(input, at).or_else(|| scan_directive(input, at)),
        b'/' => scan_end_tag(input, at),
        b if is_name_start(b) => Some(scan_begin_tag(input, at)),
        _ => None,
    }
}

fn scan_comment(input: &str, at: usize) -> Option<(Token<'_>, usize)> {
    let bytes = input.as_bytes();

    if !bytes[at..].starts_with(b"<!--") {
        return None;
    }

    let mut pos = at + 4;

    while let Some(dashes) = find_seq(bytes, pos, b"--") {
        let gt = skip_whitespace(bytes, dashes + 2);

        if bytes.get(gt) == Some(&b'>') {
            let end = gt + 1;

            return Some((Token::Comment(Comment::new(&input[at..end])), end));
        }

        pos = dashes + 1;
    }

    None
}

fn scan_directive(input: &str, at: usize) -> Option<(Token<'_>, usize)> {
    let bytes = input.as_bytes();

    if bytes[at..].starts_with(b"<!--") {
        return None;
    }

    let end = find_byte(bytes, at + 2, b'>')? + 1;

    Some((
        Token::MarkupDirective(MarkupDirective::new(&input[at..end])),
        end,
    ))
}

fn scan_end_tag(input: &str, at: usize) -> Option<(Token<'_>, usize)> {
    let bytes = input.as_bytes();
    let name_start = at + 2;
    let name_end = scan_name(bytes, name_start)?;
    let gt = skip_whitespace(bytes, name_end);

    if bytes.get(gt) != Some(&b'>') {
        return None;
    }

    let end = gt + 1;

    Some((
        Token::EndTag(EndTag::new(&input[at..end], &input[name_start..name_end])),
        end,
    ))
}

/// A begin tag always matches once `<` is followed by a letter; malformed
/// tails become residue and a missing `>` leaves the tag unterminated.
fn scan_begin_tag(input: &str, at: usize) -> (Token<'_>, usize) {
    let bytes = input.as_bytes();
    let name_start = at + 1;
    let name_end = scan_name(bytes, name_start).unwrap_or(name_start + 1);
    let mut attributes = Vec::new();
    let mut residue = None;
    let mut complete = false;
    let mut pos = name_end;

    let end = loop {
        pos = skip_whitespace(bytes, pos);

        match bytes.get(pos) {
            None => break pos,
            Some(b'>') => break pos + 1,
            Some(b'/') if bytes.get(pos + 1) == Some(&b'>') => {
                complete = true;
                break pos + 2;
            }
            _ => (),
        }

        if let Some(attr_name_end) = scan_name(bytes, pos) {
            let name = &input[pos..attr_name_end];

            match scan_attribute_value(input, attr_name_end) {
                Some((value, quote, value_end)) => {
                    attributes.push(Attribute::new(name, Some(value), quote));
                    pos = value_end;
                }
                None => {
                    attributes.push(Attribute::new(name, None, None));
                    pos = attr_name_end;
                }
            }

            continue;
        }

        // NOTE: anything we can't make sense of runs up to the next `<` or `>`.
        match find_either(bytes, pos, b'<', b'>') {
            Some(stop) => {
                residue = Some(input[pos..stop].trim_end()).filter(|r| !r.is_empty());

                break if bytes[stop] == b'>' { stop + 1 } else { stop };
            }
            None => {
                residue = Some(input[pos..].trim_end()).filter(|r| !r.is_empty());

                break bytes.len();
            }
        }
    };

    let tag = BeginTag::new(
        &input[at..end],
        &input[name_start..name_end],
        attributes,
        residue,
        complete,
    );

    (Token::BeginTag(tag), end)
}

/// Matches `\s*=\s*` followed by a quoted or unquoted value, returning the
/// value (without quotes), the quote and the end offset.
fn scan_attribute_value(input: &str, from: usize) -> Option<(&str, Option<char>, usize)> {
    let bytes = input.as_bytes();
    let eq = skip_whitespace(bytes, from);

    if bytes.get(eq) != Some(&b'=') {
        return None;
    }

    let start = skip_whitespace(bytes, eq + 1);

    if let Some(&q @ (b'"' | b'\'')) = bytes.get(start) {
        if let Some(close) = find_byte(bytes, start + 1, q) {
            return Some((&input[start + 1..close], Some(char::from(q)), close + 1));
        }
    }

    let mut end = start;

    while end < bytes.len() && !bytes[end].is_ascii_whitespace() && bytes[end] != b'>' {
        end += 1;
    }

    (end > start).then(|| (&input[start..end], None, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn begin_tag(input: &str) -> (BeginTag<'_>, usize) {
        match scan_markup(input, 0) {
            Some((Token::BeginTag(t), end)) => (t, end),
            other => panic!("expected begin tag, got {other:?}"),
        }
    }

    #[test]
    fn comments() {
        assert!(matches!(
            scan_markup("<!-- a -- b -- >x", 0),
            Some((Token::Comment(_), 16))
        ));
        assert!(matches!(scan_markup("<!---->", 0), Some((Token::Comment(_), 7))));
        assert!(scan_markup("<!-- never closed", 0).is_none());
    }

    #[test]
    fn directives() {
        match scan_markup("<!DOCTYPE html><p>", 0) {
            Some((Token::MarkupDirective(d), 15)) => assert_eq!(d.raw(), "<!DOCTYPE html>"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn end_tags() {
        match scan_markup("</Div  >", 0) {
            Some((Token::EndTag(t), 8)) => assert_eq!(t.name(), "Div"),
            other => panic!("unexpected {other:?}"),
        }

        assert!(scan_markup("</div x>", 0).is_none());
        assert!(scan_markup("</ div>", 0).is_none());
        assert!(scan_markup("< div>", 0).is_none());
    }

    #[test]
    fn attributes() {
        let (tag, end) = begin_tag("<a href=\"x.html\" title='t' id=main compact>rest");

        assert_eq!(end, 43);
        assert_eq!(tag.name(), "a");
        assert_eq!(tag.attributes().len(), 4);
        assert_eq!(tag.attribute_value("HREF").unwrap(), "x.html");
        assert_eq!(tag.attribute_value("title").unwrap(), "t");
        assert_eq!(tag.attribute_value("id").unwrap(), "main");
        assert!(tag.attribute("compact").unwrap().value().is_none());
        assert!(!tag.is_unterminated());
        assert!(!tag.is_complete());
    }

    #[test]
    fn self_closing_and_unterminated() {
        let (tag, _) = begin_tag("<br/>");

        assert!(tag.is_complete());

        let (tag, end) = begin_tag("<a href=foo<b>");

        assert_eq!(end, 14);
        assert!(!tag.is_unterminated());
        assert_eq!(tag.attribute_value("href").unwrap(), "foo<b");

        let (tag, end) = begin_tag("<a href=\"foo\" <b>");

        assert_eq!(end, 14);
        assert!(tag.is_unterminated());
    }

    #[test]
    fn residue() {
        let (tag, end) = begin_tag("<img src=a.png \"junk\" alt=x>");

        assert_eq!(end, 28);
        assert_eq!(tag.attributes().len(), 1);
        assert_eq!(tag.raw(), "<img src=a.png \"junk\" alt=x>");
    }
}
