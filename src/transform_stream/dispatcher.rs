use crate::parser::Tokenizer;
use crate::token::*;

/// A single pass over a token stream. Every hook defaults to
/// [`default_action`](TokenHandler::default_action), which does nothing;
/// passes that copy input to output override it.
pub trait TokenHandler {
    fn document_begin(&mut self) {}

    fn document_end(&mut self) {}

    fn begin_tag(&mut self, tag: &mut BeginTag<'_>) {
        self.default_action(tag);
    }

    fn end_tag(&mut self, tag: &mut EndTag<'_>) {
        self.default_action(tag);
    }

    fn text(&mut self, text: &mut Text<'_>) {
        self.default_action(text);
    }

    fn comment(&mut self, comment: &mut Comment<'_>) {
        self.default_action(comment);
    }

    fn markup_directive(&mut self, directive: &mut MarkupDirective<'_>) {
        self.default_action(directive);
    }

    fn style_text(&mut self, text: &mut StyleText<'_>) {
        self.default_action(text);
    }

    fn style_url(&mut self, url: &mut Literal<'_>) {
        self.default_action(url);
    }

    fn style_import(&mut self, import: &mut Literal<'_>) {
        self.default_action(import);
    }

    fn style_comment(&mut self, comment: &mut StyleComment<'_>) {
        self.default_action(comment);
    }

    fn style_literal(&mut self, literal: &mut Literal<'_>) {
        self.default_action(literal);
    }

    fn script_text(&mut self, text: &mut ScriptText<'_>) {
        self.default_action(text);
    }

    fn script_comment(&mut self, comment: &mut ScriptComment<'_>) {
        self.default_action(comment);
    }

    fn script_literal(&mut self, literal: &mut Literal<'_>) {
        self.default_action(literal);
    }

    fn default_action(&mut self, _token: &dyn Serialize) {}

    /// Lets a handler stop the pass early; checked before every token.
    fn is_done(&self) -> bool {
        false
    }
}

/// Pulls tokens from a tokenizer until it's exhausted (or the handler is
/// done) and routes each of them to the matching hook.
pub struct Dispatcher<'i, H: TokenHandler> {
    tokenizer: Tokenizer<'i>,
    handler: H,
}

impl<'i, H: TokenHandler> Dispatcher<'i, H> {
    #[inline]
    pub fn new(html: &'i str, handler: H) -> Self {
        Self::with_tokenizer(Tokenizer::new(html), handler)
    }

    #[inline]
    pub fn with_tokenizer(tokenizer: Tokenizer<'i>, handler: H) -> Self {
        Dispatcher { tokenizer, handler }
    }

    /// Runs the pass to completion and hands the handler back.
    pub fn parse(mut self) -> H {
        let handler = &mut self.handler;

        handler.document_begin();

        for mut token in self.tokenizer.by_ref() {
            if handler.is_done() {
                break;
            }

            trace!(@token "dispatcher", token);

            match &mut token {
                Token::BeginTag(t) => handler.begin_tag(t),
                Token::EndTag(t) => handler.end_tag(t),
                Token::Text(t) => handler.text(t),
                Token::Comment(t) => handler.comment(t),
                Token::MarkupDirective(t) => handler.markup_directive(t),
                Token::StyleText(t) => handler.style_text(t),
                Token::StyleUrl(t) => handler.style_url(t),
                Token::StyleImport(t) => handler.style_import(t),
                Token::StyleComment(t) => handler.style_comment(t),
                Token::StyleLiteral(t) => handler.style_literal(t),
                Token::ScriptText(t) => handler.script_text(t),
                Token::ScriptComment(t) => handler.script_comment(t),
                Token::ScriptLiteral(t) => handler.script_literal(t),
            }
        }

        handler.document_end();

        self.handler
    }
}
