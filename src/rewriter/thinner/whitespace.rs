use super::tag_table::TagCategory;

/// What a token amounts to for whitespace collapsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementClass {
    Space,
    Break,
    Paragraph,
    NotBlock,
    Block,
}

impl ElementClass {
    pub fn of_tag(name: &str, category: TagCategory) -> Self {
        match name {
            "p" => ElementClass::Paragraph,
            "br" => ElementClass::Break,
            "hr" => ElementClass::Block,
            _ if category == TagCategory::Block => ElementClass::Block,
            _ => ElementClass::NotBlock,
        }
    }

    /// Text made of whitespace and `&nbsp;` only is a space, anything else
    /// is inline content. Expects escaped text.
    pub fn of_text(text: &str) -> Self {
        let mut rest = text;

        loop {
            rest = rest.trim_start();

            match rest.strip_prefix("&nbsp;") {
                Some(tail) => rest = tail,
                None => break,
            }
        }

        if rest.is_empty() {
            ElementClass::Space
        } else {
            ElementClass::NotBlock
        }
    }

    #[inline]
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            ElementClass::Block | ElementClass::Paragraph | ElementClass::Break
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum WhitespaceState {
    #[default]
    Empty,
    PendingSpace,
    PendingBreak,
    PendingParagraph,
}

/// Collects a run of whitespace-like tokens and stands for the strongest of
/// them: a paragraph beats a line break, which beats a space.
#[derive(Debug, Default)]
pub struct WhitespaceBuffer {
    state: WhitespaceState,
    frozen: bool,
}

impl WhitespaceBuffer {
    /// The implicit paragraph a thinned document starts with. It is frozen,
    /// so whitespace ahead of the first content is absorbed without changing
    /// what gets rendered.
    pub fn pending_paragraph() -> Self {
        let mut buffer = WhitespaceBuffer::default();

        buffer.promote(WhitespaceState::PendingParagraph);
        buffer.freeze();

        buffer
    }

    #[inline]
    pub fn state(&self) -> WhitespaceState {
        self.state
    }

    /// Stops any further promotion until the next flush.
    #[inline]
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    #[inline]
    pub fn promote(&mut self, state: WhitespaceState) {
        if !self.frozen {
            self.state = self.state.max(state);
        }
    }

    /// Feeds a token's class to the buffer. Whitespace-like classes are
    /// absorbed and `None` is returned; any other class flushes the buffer and
    /// yields the markup that has to precede the token.
    pub fn process(&mut self, class: ElementClass) -> Option<&'static str> {
        match class {
            ElementClass::Space => self.promote(WhitespaceState::PendingSpace),
            ElementClass::Break => self.promote(WhitespaceState::PendingBreak),
            ElementClass::Paragraph => self.promote(WhitespaceState::PendingParagraph),
            ElementClass::Block | ElementClass::NotBlock => return Some(self.flush(class)),
        }

        None
    }

    fn flush(&mut self, forcing: ElementClass) -> &'static str {
        let state = std::mem::take(self).state;

        // NOTE: blocks break the line themselves.
        if forcing == ElementClass::Block {
            return "";
        }

        match state {
            WhitespaceState::Empty => "",
            WhitespaceState::PendingSpace => " ",
            WhitespaceState::PendingBreak => "<br>",
            WhitespaceState::PendingParagraph => "<p>",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promotion_is_monotonic() {
        let mut buffer = WhitespaceBuffer::default();

        assert_eq!(buffer.process(ElementClass::Break), None);
        assert_eq!(buffer.process(ElementClass::Space), None);
        assert_eq!(buffer.state(), WhitespaceState::PendingBreak);
        assert_eq!(buffer.process(ElementClass::NotBlock), Some("<br>"));
        assert_eq!(buffer.state(), WhitespaceState::Empty);
        assert_eq!(buffer.process(ElementClass::NotBlock), Some(""));
    }

    #[test]
    fn implicit_paragraph_is_frozen_until_the_first_content() {
        let mut buffer = WhitespaceBuffer::pending_paragraph();

        assert_eq!(buffer.process(ElementClass::Space), None);
        assert_eq!(buffer.process(ElementClass::Break), None);
        assert_eq!(buffer.state(), WhitespaceState::PendingParagraph);
        assert_eq!(buffer.process(ElementClass::NotBlock), Some("<p>"));
        assert_eq!(buffer.state(), WhitespaceState::Empty);

        buffer.promote(WhitespaceState::PendingSpace);
        buffer.promote(WhitespaceState::PendingBreak);

        assert_eq!(buffer.state(), WhitespaceState::PendingBreak);
    }

    #[test]
    fn blocks_absorb_pending_whitespace() {
        let mut buffer = WhitespaceBuffer::pending_paragraph();

        assert_eq!(buffer.process(ElementClass::Block), Some(""));
        assert_eq!(buffer.state(), WhitespaceState::Empty);
    }

    #[test]
    fn frozen_buffer_keeps_its_state_until_flushed() {
        let mut buffer = WhitespaceBuffer::default();

        buffer.promote(WhitespaceState::PendingSpace);
        buffer.freeze();
        buffer.promote(WhitespaceState::PendingParagraph);

        assert_eq!(buffer.process(ElementClass::NotBlock), Some(" "));

        buffer.promote(WhitespaceState::PendingParagraph);

        assert_eq!(buffer.state(), WhitespaceState::PendingParagraph);
    }

    #[test]
    fn classification() {
        assert_eq!(ElementClass::of_text(" \n&nbsp; &nbsp;"), ElementClass::Space);
        assert_eq!(ElementClass::of_text(""), ElementClass::Space);
        assert_eq!(ElementClass::of_text(" x "), ElementClass::NotBlock);
        assert_eq!(ElementClass::of_text("&nbsp"), ElementClass::NotBlock);

        assert_eq!(ElementClass::of_tag("p", TagCategory::Empty), ElementClass::Paragraph);
        assert_eq!(ElementClass::of_tag("hr", TagCategory::Empty), ElementClass::Block);
        assert_eq!(ElementClass::of_tag("li", TagCategory::Block), ElementClass::Block);
        assert_eq!(ElementClass::of_tag("img", TagCategory::Empty), ElementClass::NotBlock);
    }
}
