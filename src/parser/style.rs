use super::scan::*;
use crate::token::{Literal, LiteralSyntax, StyleComment, StyleText, Token};

/// Splits the content of a `<style>` block (or a stylesheet) into text,
/// comments, string literals, `url(...)` references and `@import`s.
pub fn tokenize_style(css: &str) -> Vec<Token<'_>> {
    let bytes = css.as_bytes();
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut pos = 0;

    macro_rules! emit {
        ($start:expr, $end:expr, $token:expr) => {{
            if text_start < $start {
                tokens.push(Token::StyleText(StyleText::new(&css[text_start..$start])));
            }

            tokens.push($token);
            pos = $end;
            text_start = $end;
        }};
    }

    while pos < bytes.len() {
        let start = pos;

        match bytes[pos] {
            b'"' | b'\'' => {
                if let Some(close) = find_closing_quote(bytes, pos, false) {
                    let quote = char::from(bytes[pos]);
                    let raw = &css[start..=close];
                    let literal = Literal::new(raw, 1..raw.len() - 1, Some(quote), LiteralSyntax::CssString);

                    emit!(start, close + 1, Token::StyleLiteral(literal));
                    continue;
                }
            }
            b'/' if bytes.get(pos + 1) == Some(&b'*') => {
                let end = find_seq(bytes, pos + 2, b"*/").map_or(bytes.len(), |e| e + 2);

                emit!(start, end, Token::StyleComment(StyleComment::new(&css[start..end])));
                continue;
            }
            b'/' if bytes.get(pos + 1) == Some(&b'/') => {
                let end = line_end(bytes, pos);

                emit!(start, end, Token::StyleComment(StyleComment::new(&css[start..end])));
                continue;
            }
            b'<' if bytes[pos..].starts_with(b"<!--") => {
                emit!(start, pos + 4, Token::StyleComment(StyleComment::new(&css[start..pos + 4])));
                continue;
            }
            b'-' if bytes[pos..].starts_with(b"-->") => {
                emit!(start, pos + 3, Token::StyleComment(StyleComment::new(&css[start..pos + 3])));
                continue;
            }
            b'u' | b'U' if at_word_start(bytes, pos) => {
                if let Some((literal, end)) = scan_url(css, pos, pos, LiteralSyntax::CssUrl) {
                    emit!(start, end, Token::StyleUrl(literal));
                    continue;
                }
            }
            b'@' => {
                if let Some((literal, end)) = scan_import(css, pos) {
                    emit!(start, end, Token::StyleImport(literal));
                    continue;
                }
            }
            _ => (),
        }

        pos += 1;
    }

    if text_start < bytes.len() {
        tokens.push(Token::StyleText(StyleText::new(&css[text_start..])));
    }

    tokens
}

#[inline]
fn at_word_start(bytes: &[u8], pos: usize) -> bool {
    pos == 0 || !(bytes[pos - 1].is_ascii_alphanumeric() || matches!(bytes[pos - 1], b'-' | b'_'))
}

/// Matches `url( ... )` at `at`; the literal's raw text starts at `raw_start`.
fn scan_url(
    css: &str,
    raw_start: usize,
    at: usize,
    syntax: LiteralSyntax,
) -> Option<(Literal<'_>, usize)> {
    let bytes = css.as_bytes();

    if !starts_with_ignore_ascii_case_at(bytes, at, b"url(") {
        return None;
    }

    let open = skip_whitespace(bytes, at + 4);

    let (body, quote, after_body) = match bytes.get(open) {
        Some(&(b'"' | b'\'')) => {
            let close = find_closing_quote(bytes, open, false)?;

            (open + 1..close, Some(char::from(bytes[open])), close + 1)
        }
        _ => {
            let close = find_byte(bytes, open, b')')?;
            let body_end = open + css[open..close].trim_end().len();

            (open..body_end, None, body_end)
        }
    };

    let paren = skip_whitespace(bytes, after_body);

    if bytes.get(paren) != Some(&b')') {
        return None;
    }

    let end = paren + 1;
    let body = body.start - raw_start..body.end - raw_start;

    Some((Literal::new(&css[raw_start..end], body, quote, syntax), end))
}

/// Matches `@import` followed by a quoted string or a `url(...)`.
fn scan_import(css: &str, at: usize) -> Option<(Literal<'_>, usize)> {
    let bytes = css.as_bytes();

    if !starts_with_ignore_ascii_case_at(bytes, at, b"@import") {
        return None;
    }

    let after_keyword = at + 7;

    if !matches!(bytes.get(after_keyword), Some(b'"' | b'\'') | Some(b' ' | b'\t' | b'\r' | b'\n' | b'\x0c')) {
        return None;
    }

    let value = skip_whitespace(bytes, after_keyword);

    match bytes.get(value)? {
        b'"' | b'\'' => {
            let close = find_closing_quote(bytes, value, false)?;
            let quote = char::from(bytes[value]);
            let body = value + 1 - at..close - at;

            Some((
                Literal::new(&css[at..=close], body, Some(quote), LiteralSyntax::CssImport),
                close + 1,
            ))
        }
        _ => scan_url(css, at, value, LiteralSyntax::CssImport),
    }
}
