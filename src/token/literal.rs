use super::Serialize;
use std::borrow::Cow;
use std::fmt::{self, Debug};
use std::ops::Range;

/// Which grammar a literal was lexed with; decides how its text is escaped.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LiteralSyntax {
    CssString,
    CssUrl,
    CssImport,
    Script,
}

/// A string literal inside a style or script block, including CSS `url(...)`
/// and `@import` references.
#[derive(Clone, PartialEq, Eq)]
pub struct Literal<'i> {
    raw: Cow<'i, str>,
    body: Range<usize>,
    quote: Option<char>,
    syntax: LiteralSyntax,
    replacement: Option<String>,
}

impl<'i> Literal<'i> {
    /// `body` is the literal text inside the quotes (if any) relative to `raw`.
    pub(crate) fn new(
        raw: &'i str,
        body: Range<usize>,
        quote: Option<char>,
        syntax: LiteralSyntax,
    ) -> Self {
        debug_assert!(body.end <= raw.len());

        Literal {
            raw: Cow::Borrowed(raw),
            body,
            quote,
            syntax,
            replacement: None,
        }
    }

    #[inline]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[inline]
    pub fn syntax(&self) -> LiteralSyntax {
        self.syntax
    }

    #[inline]
    pub fn quote(&self) -> Option<char> {
        self.quote
    }

    /// The unescaped literal text.
    pub fn text(&self) -> Cow<'_, str> {
        if let Some(text) = &self.replacement {
            return Cow::Borrowed(text);
        }

        let body = &self.raw[self.body.clone()];

        match self.syntax {
            LiteralSyntax::Script => js_unescape(body),
            _ => css_unescape(body),
        }
    }

    #[inline]
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.replacement = Some(text.into());
    }

    #[inline]
    pub fn is_modified(&self) -> bool {
        self.replacement.is_some()
    }

    pub fn to_owned(&self) -> Literal<'static> {
        Literal {
            raw: Cow::Owned(self.raw.to_string()),
            body: self.body.clone(),
            quote: self.quote,
            syntax: self.syntax,
            replacement: self.replacement.clone(),
        }
    }

    fn outer_span(&self) -> Range<usize> {
        let quote_len = self.quote.map_or(0, char::len_utf8);

        self.body.start - quote_len..self.body.end + quote_len
    }
}

impl Serialize for Literal<'_> {
    fn serialize(&self, output: &mut String) {
        let Some(text) = &self.replacement else {
            output.push_str(&self.raw);
            return;
        };

        let outer = self.outer_span();
        let quote = self.quote.unwrap_or('"');

        output.push_str(&self.raw[..outer.start]);
        output.push(quote);

        match self.syntax {
            LiteralSyntax::Script => js_escape(text, quote, output),
            _ => css_escape(text, quote, output),
        }

        output.push(quote);
        output.push_str(&self.raw[outer.end..]);
    }
}

impl Debug for Literal<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Literal")
            .field("syntax", &self.syntax)
            .field("text", &self.text())
            .finish()
    }
}

fn css_unescape(body: &str) -> Cow<'_, str> {
    if !body.contains('\\') {
        return Cow::Borrowed(body);
    }

    let mut text = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            text.push(ch);
            continue;
        }

        match chars.peek().copied() {
            Some(c) if c.is_ascii_hexdigit() => {
                let mut code = 0u32;
                let mut digits = 0;

                while let Some(d) = chars.peek().and_then(|c| c.to_digit(16)) {
                    if digits == 6 {
                        break;
                    }

                    code = code * 16 + d;
                    digits += 1;
                    chars.next();
                }

                if chars.peek().is_some_and(|c| c.is_ascii_whitespace()) {
                    chars.next();
                }

                text.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            Some('\n') => {
                chars.next();
            }
            Some(c) => {
                text.push(c);
                chars.next();
            }
            None => text.push('\\'),
        }
    }

    Cow::Owned(text)
}

fn css_escape(text: &str, quote: char, output: &mut String) {
    for ch in text.chars() {
        match ch {
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\a "),
            c if c == quote => {
                output.push('\\');
                output.push(c);
            }
            c => output.push(c),
        }
    }
}

fn js_unescape(body: &str) -> Cow<'_, str> {
    if !body.contains('\\') {
        return Cow::Borrowed(body);
    }

    let mut text = String::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            text.push(ch);
            continue;
        }

        match chars.next() {
            Some('n') => text.push('\n'),
            Some('r') => text.push('\r'),
            Some('t') => text.push('\t'),
            Some('b') => text.push('\u{8}'),
            Some('f') => text.push('\u{c}'),
            Some('v') => text.push('\u{b}'),
            Some('0') => text.push('\0'),
            Some(kind @ ('x' | 'u')) => {
                let len = if kind == 'x' { 2 } else { 4 };
                let digits: String = chars.clone().take(len).collect();

                match u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32) {
                    Some(c) if digits.len() == len => {
                        text.push(c);
                        chars.nth(len - 1);
                    }
                    _ => text.push(kind),
                }
            }
            Some('\n') => (),
            Some(c) => text.push(c),
            None => text.push('\\'),
        }
    }

    Cow::Owned(text)
}

fn js_escape(text: &str, quote: char, output: &mut String) {
    for ch in text.chars() {
        match ch {
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            c if c == quote => {
                output.push('\\');
                output.push(c);
            }
            c => output.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmodified_literal_is_raw() {
        let raw = "url( 'a b.png' )";
        let lit = Literal::new(raw, 6..13, Some('\''), LiteralSyntax::CssUrl);

        assert_eq!(lit.text(), "a b.png");
        assert_eq!(lit.to_html(), raw);
    }

    #[test]
    fn replaced_unquoted_url_gains_quotes() {
        let raw = "url(a.png)";
        let mut lit = Literal::new(raw, 4..9, None, LiteralSyntax::CssUrl);

        assert_eq!(lit.text(), "a.png");

        lit.set_text("http://x.com/a.png");

        assert_eq!(lit.to_html(), "url(\"http://x.com/a.png\")");
    }

    #[test]
    fn replaced_literal_keeps_its_quote() {
        let raw = "'it\\'s'";
        let mut lit = Literal::new(raw, 1..6, Some('\''), LiteralSyntax::Script);

        assert_eq!(lit.text(), "it's");

        lit.set_text("don't");

        assert_eq!(lit.to_html(), "'don\\'t'");
    }

    #[test]
    fn css_escapes() {
        assert_eq!(css_unescape("\\26 b"), "&b");
        assert_eq!(css_unescape("a\\\"b"), "a\"b");
        assert_eq!(js_unescape("\\x41\\u0042\\n"), "AB\n");
    }
}
