//! A lenient tokenizer for HTML found in the wild.
//!
//! It never fails: anything that doesn't look like markup is text, tags with
//! a missing `>` are reported as unterminated, and every token keeps its exact
//! source text so that serializing an untouched token stream reproduces the
//! input.

mod markup;
mod scan;
mod script;
mod style;

pub use self::script::tokenize_script;
pub use self::style::tokenize_style;

use self::markup::scan_markup;
use self::scan::{find_byte, find_close_tag};
use crate::html::is_void_element;
use crate::token::{EndTag, Text, Token};
use cfg_if::cfg_if;
use std::collections::VecDeque;

pub struct Tokenizer<'i> {
    input: &'i str,
    pos: usize,
    pending: VecDeque<Token<'i>>,
    implicit_end_tags: bool,
}

impl<'i> Tokenizer<'i> {
    pub fn new(input: &'i str) -> Self {
        Tokenizer {
            input,
            pos: 0,
            pending: VecDeque::new(),
            implicit_end_tags: false,
        }
    }

    /// Makes the tokenizer follow void and self-closing begin tags with an
    /// implicit end tag.
    #[inline]
    pub fn with_implicit_end_tags(mut self, enabled: bool) -> Self {
        self.implicit_end_tags = enabled;
        self
    }

    /// Finds the next `<` at or after `from` that starts markup.
    fn next_markup(&self, from: usize) -> Option<(Token<'i>, usize, usize)> {
        let bytes = self.input.as_bytes();
        let mut pos = from;

        while let Some(lt) = find_byte(bytes, pos, b'<') {
            if let Some((token, end)) = scan_markup(self.input, lt) {
                return Some((token, lt, end));
            }

            pos = lt + 1;
        }

        None
    }

    fn enqueue_markup(&mut self, token: Token<'i>, start: usize, end: usize) {
        let input = self.input;

        self.pos = end;

        let mut raw_content_end_tag = None;
        let mut implicit_end_tag = None;

        if let Token::BeginTag(tag) = &token {
            if tag.name_eq("script") || tag.name_eq("style") {
                raw_content_end_tag = Some(tag.name().to_ascii_lowercase());
            } else if self.implicit_end_tags && (tag.is_complete() || is_void_element(tag.name())) {
                let name_start = start + 1;

                implicit_end_tag = Some(&input[name_start..name_start + tag.name().len()]);
            }
        }

        self.pending.push_back(token);

        if let Some(name) = implicit_end_tag {
            self.pending.push_back(Token::EndTag(EndTag::new_implicit(name)));
        }

        if let Some(name) = raw_content_end_tag {
            let content_end = find_close_tag(input, end, name.as_bytes())
                .map_or(input.len(), |(start, _)| start);

            let content = &input[end..content_end];

            if !content.is_empty() {
                if name == "script" {
                    self.pending.extend(tokenize_script(content));
                } else {
                    self.pending.extend(tokenize_style(content));
                }
            }

            self.pos = content_end;
        }
    }
}

impl<'i> Iterator for Tokenizer<'i> {
    type Item = Token<'i>;

    fn next(&mut self) -> Option<Token<'i>> {
        if let Some(token) = self.pending.pop_front() {
            return Some(token);
        }

        if self.pos >= self.input.len() {
            return None;
        }

        let input = self.input;

        match self.next_markup(self.pos) {
            Some((token, start, end)) => {
                let text_start = self.pos;

                self.enqueue_markup(token, start, end);

                if text_start < start {
                    Some(Token::Text(Text::new(&input[text_start..start])))
                } else {
                    self.pending.pop_front()
                }
            }
            None => {
                let text = &input[self.pos..];

                self.pos = input.len();

                Some(Token::Text(Text::new(text)))
            }
        }
    }
}

cfg_if! {
    if #[cfg(feature = "integration_test")] {
        /// Names the kind of every token of `html`, for comparing against
        /// fixtures.
        pub fn token_kinds(html: &str) -> Vec<&'static str> {
            Tokenizer::new(html)
                .map(|token| match token {
                    Token::BeginTag(tag) if tag.is_unterminated() => "UnterminatedTag",
                    Token::BeginTag(_) => "BeginTag",
                    Token::EndTag(_) => "EndTag",
                    Token::Text(_) => "Text",
                    Token::Comment(_) => "Comment",
                    Token::MarkupDirective(_) => "MarkupDirective",
                    Token::StyleText(_) => "StyleText",
                    Token::StyleUrl(_) => "StyleUrl",
                    Token::StyleImport(_) => "StyleImport",
                    Token::StyleComment(_) => "StyleComment",
                    Token::StyleLiteral(_) => "StyleLiteral",
                    Token::ScriptText(_) => "ScriptText",
                    Token::ScriptComment(_) => "ScriptComment",
                    Token::ScriptLiteral(_) => "ScriptLiteral",
                })
                .collect()
        }
    }
}
