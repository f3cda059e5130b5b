mod attribute;
mod literal;
mod tag;

pub use self::attribute::Attribute;
pub use self::literal::{Literal, LiteralSyntax};
pub use self::tag::{BeginTag, EndTag};

use std::borrow::Cow;

/// Writes a token back as markup.
pub trait Serialize {
    fn serialize(&self, output: &mut String);

    fn to_html(&self) -> String {
        let mut output = String::new();

        self.serialize(&mut output);

        output
    }
}

impl<T: Serialize> Serialize for [T] {
    #[inline]
    fn serialize(&self, output: &mut String) {
        for item in self {
            item.serialize(output);
        }
    }
}

macro_rules! raw_token {
    ($($(#[$meta:meta])* $Name:ident),+) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq, Eq)]
            pub struct $Name<'i> {
                raw: Cow<'i, str>,
            }

            impl<'i> $Name<'i> {
                #[inline]
                pub(crate) fn new(raw: &'i str) -> Self {
                    $Name { raw: Cow::Borrowed(raw) }
                }

                #[inline]
                pub fn raw(&self) -> &str {
                    &self.raw
                }

                #[inline]
                pub fn set_raw(&mut self, raw: impl Into<String>) {
                    self.raw = Cow::Owned(raw.into());
                }

                #[inline]
                pub fn to_owned(&self) -> $Name<'static> {
                    $Name { raw: Cow::Owned(self.raw.to_string()) }
                }
            }

            impl Serialize for $Name<'_> {
                #[inline]
                fn serialize(&self, output: &mut String) {
                    output.push_str(&self.raw);
                }
            }
        )+
    };
}

raw_token!(
    /// A run of character data, entities still escaped.
    Text,
    /// `<!-- ... -->`
    Comment,
    /// `<!DOCTYPE ...>` and other `<!...>` constructs that aren't comments.
    MarkupDirective,
    StyleText,
    StyleComment,
    ScriptText,
    ScriptComment
);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'i> {
    BeginTag(BeginTag<'i>),
    EndTag(EndTag<'i>),
    Text(Text<'i>),
    Comment(Comment<'i>),
    MarkupDirective(MarkupDirective<'i>),
    StyleText(StyleText<'i>),
    StyleUrl(Literal<'i>),
    StyleImport(Literal<'i>),
    StyleComment(StyleComment<'i>),
    StyleLiteral(Literal<'i>),
    ScriptText(ScriptText<'i>),
    ScriptComment(ScriptComment<'i>),
    ScriptLiteral(Literal<'i>),
}

impl<'i> Token<'i> {
    // NOTE: not a trait implementation due to the `Borrow` constraint for
    // the `Owned` associated type.
    // See: https://github.com/rust-lang/rust/issues/44950
    pub fn to_owned(&self) -> Token<'static> {
        match self {
            Token::BeginTag(t) => Token::BeginTag(t.to_owned()),
            Token::EndTag(t) => Token::EndTag(t.to_owned()),
            Token::Text(t) => Token::Text(t.to_owned()),
            Token::Comment(t) => Token::Comment(t.to_owned()),
            Token::MarkupDirective(t) => Token::MarkupDirective(t.to_owned()),
            Token::StyleText(t) => Token::StyleText(t.to_owned()),
            Token::StyleUrl(t) => Token::StyleUrl(t.to_owned()),
            Token::StyleImport(t) => Token::StyleImport(t.to_owned()),
            Token::StyleComment(t) => Token::StyleComment(t.to_owned()),
            Token::StyleLiteral(t) => Token::StyleLiteral(t.to_owned()),
            Token::ScriptText(t) => Token::ScriptText(t.to_owned()),
            Token::ScriptComment(t) => Token::ScriptComment(t.to_owned()),
            Token::ScriptLiteral(t) => Token::ScriptLiteral(t.to_owned()),
        }
    }

    /// The exact source text of the token.
    pub fn raw(&self) -> &str {
        match self {
            Token::BeginTag(t) => t.raw(),
            Token::EndTag(t) => t.raw(),
            Token::Text(t) => t.raw(),
            Token::Comment(t) => t.raw(),
            Token::MarkupDirective(t) => t.raw(),
            Token::StyleText(t) => t.raw(),
            Token::StyleComment(t) => t.raw(),
            Token::ScriptText(t) => t.raw(),
            Token::ScriptComment(t) => t.raw(),
            Token::StyleUrl(t)
            | Token::StyleImport(t)
            | Token::StyleLiteral(t)
            | Token::ScriptLiteral(t) => t.raw(),
        }
    }
}

impl Serialize for Token<'_> {
    fn serialize(&self, output: &mut String) {
        match self {
            Token::BeginTag(t) => t.serialize(output),
            Token::EndTag(t) => t.serialize(output),
            Token::Text(t) => t.serialize(output),
            Token::Comment(t) => t.serialize(output),
            Token::MarkupDirective(t) => t.serialize(output),
            Token::StyleText(t) => t.serialize(output),
            Token::StyleComment(t) => t.serialize(output),
            Token::ScriptText(t) => t.serialize(output),
            Token::ScriptComment(t) => t.serialize(output),
            Token::StyleUrl(t)
            | Token::StyleImport(t)
            | Token::StyleLiteral(t)
            | Token::ScriptLiteral(t) => t.serialize(output),
        }
    }
}

macro_rules! impl_from {
    ($($Type:ident),+) => {
        $(
            impl<'i> From<$Type<'i>> for Token<'i> {
                fn from(token: $Type<'i>) -> Self {
                    Token::$Type(token)
                }
            }
        )+
    };
}

impl_from!(BeginTag, EndTag, Text, Comment, MarkupDirective);
