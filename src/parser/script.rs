use super::scan::*;
use crate::token::{Literal, LiteralSyntax, ScriptComment, ScriptText, Token};

/// Splits the content of a `<script>` block into text, comments and string
/// literals. Only enough of the grammar is recognized to find the literals.
pub fn tokenize_script(js: &str) -> Vec<Token<'_>> {
    let bytes = js.as_bytes();
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        let (token, end) = match bytes[pos] {
            q @ (b'"' | b'\'' | b'`') => match find_closing_quote(bytes, pos, q == b'`') {
                Some(close) => {
                    let raw = &js[pos..=close];
                    let literal = Literal::new(
                        raw,
                        1..raw.len() - 1,
                        Some(char::from(q)),
                        LiteralSyntax::Script,
                    );

                    (Token::ScriptLiteral(literal), close + 1)
                }
                None => {
                    pos += 1;
                    continue;
                }
            },
            b'/' if bytes.get(pos + 1) == Some(&b'/') => {
                let end = line_end(bytes, pos);

                (Token::ScriptComment(ScriptComment::new(&js[pos..end])), end)
            }
            b'/' if bytes.get(pos + 1) == Some(&b'*') => {
                let end = find_seq(bytes, pos + 2, b"*/").map_or(bytes.len(), |e| e + 2);

                (Token::ScriptComment(ScriptComment::new(&js[pos..end])), end)
            }
            // NOTE: HTML-like comment markers act as single line comments in scripts.
            b'<' if bytes[pos..].starts_with(b"<!--") => {
                let end = line_end(bytes, pos);

                (Token::ScriptComment(ScriptComment::new(&js[pos..end])), end)
            }
            b'-' if bytes[pos..].starts_with(b"-->") => {
                let end = line_end(bytes, pos);

                (Token::ScriptComment(ScriptComment::new(&js[pos..end])), end)
            }
            _ => {
                pos += 1;
                continue;
            }
        };

        if text_start < pos {
            tokens.push(Token::ScriptText(ScriptText::new(&js[text_start..pos])));
        }

        tokens.push(token);
        pos = end;
        text_start = end;
    }

    if text_start < bytes.len() {
        tokens.push(Token::ScriptText(ScriptText::new(&js[text_start..])));
    }

    tokens
}
