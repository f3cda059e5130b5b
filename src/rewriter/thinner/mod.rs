//! Reduction of arbitrary markup to a small vocabulary of tags.
//!
//! Tags outside the vocabulary are dropped (their text is kept), the rest
//! are renamed and stripped of attributes according to a tag table. Runs of
//! whitespace, paragraph and line break markers collapse into the single
//! strongest marker of the run.

mod capture;
mod tag_table;
mod whitespace;

pub use self::capture::{thin_for_capture, CaptureFlags};
pub use self::tag_table::{TagCategory, TagDesc};
pub use self::whitespace::{ElementClass, WhitespaceBuffer, WhitespaceState};

use self::tag_table::lookup;
use crate::html::{escape, unescape, UnescapeMode};
use crate::token::{BeginTag, EndTag, Text};
use crate::transform_stream::{Dispatcher, OutputBuffer, TokenHandler};
use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ThinFlags: u32 {
        const PRESERVE_IMAGES = 0b0001;
        /// Use the strict table: paragraphs, line breaks, links and images only.
        const STRICT = 0b0010;
        /// Keep `table`, `tr`, `td` and `th` instead of turning them into
        /// paragraphs and line breaks.
        const PRESERVE_TABLES = 0b0100;
    }
}

#[derive(Debug, Clone, Default)]
pub struct ThinSettings {
    pub flags: ThinFlags,
    /// Appended to Word footnote anchors (`_ftn1`, `#_ftnref1`, `_edn1`, ...)
    /// so that several thinned snippets can live on the same page.
    pub footnote_anchor_suffix: Option<String>,
}

impl ThinSettings {
    #[inline]
    pub fn new(flags: ThinFlags) -> Self {
        ThinSettings {
            flags,
            footnote_anchor_suffix: None,
        }
    }
}

/// Thins `html` down to the vocabulary selected by `settings`.
pub fn thin(html: &str, settings: &ThinSettings) -> String {
    let pass = ThinPass {
        settings,
        leading: OutputBuffer::with_capacity(8),
        main: OutputBuffer::with_capacity(html.len()),
        in_main: false,
        // NOTE: content that doesn't start with a block gets an implicit
        // paragraph, unless the document turns out to have no blocks at all.
        whitespace: WhitespaceBuffer::pending_paragraph(),
        preserve_whitespace: false,
        has_block: false,
        paragraph_open: false,
    };

    Dispatcher::new(html, pass).parse().finish()
}

fn is_footnote_anchor(value: &str) -> bool {
    let rest = match value.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("_ftn") || prefix.eq_ignore_ascii_case("_edn") => {
            &value[4..]
        }
        _ => return false,
    };

    let digits = match rest.get(..3) {
        Some(r) if r.eq_ignore_ascii_case("ref") => &rest[3..],
        _ => rest,
    };

    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

struct ThinPass<'s> {
    settings: &'s ThinSettings,
    leading: OutputBuffer,
    main: OutputBuffer,
    in_main: bool,
    whitespace: WhitespaceBuffer,
    preserve_whitespace: bool,
    has_block: bool,
    paragraph_open: bool,
}

impl ThinPass<'_> {
    #[inline]
    fn output(&mut self) -> &mut OutputBuffer {
        if self.in_main {
            &mut self.main
        } else {
            &mut self.leading
        }
    }

    /// Runs a token's class through the whitespace buffer. Returns `true` if
    /// the token was absorbed and must not be written.
    fn collapse(&mut self, class: ElementClass) -> bool {
        if self.preserve_whitespace {
            return false;
        }

        let Some(rendered) = self.whitespace.process(class) else {
            return true;
        };

        if self.paragraph_open && (class == ElementClass::Block || rendered == "<p>") {
            self.output().write_str("</p>");
            self.paragraph_open = false;
        }

        if rendered == "<p>" {
            self.paragraph_open = true;
        }

        self.output().write_str(rendered);

        false
    }

    /// Resolves a tag to the name it's written with, or `None` if it's dropped.
    fn resolve(&self, name: &str) -> Option<(&'static TagDesc, String)> {
        let lower = name.to_ascii_lowercase();
        let desc = lookup(&lower, self.settings.flags)?;
        let name = desc.substitute.map_or(lower, str::to_string);

        if name == "img" && !self.settings.flags.contains(ThinFlags::PRESERVE_IMAGES) {
            return None;
        }

        Some((desc, name))
    }

    fn write_begin_tag(&mut self, desc: &TagDesc, name: &str, tag: &BeginTag<'_>) {
        let mut markup = format!("<{name}");

        for attr in tag.attributes() {
            if !desc.allows_attribute(attr.name()) {
                continue;
            }

            markup.push(' ');
            markup.push_str(attr.name());

            if let Some(value) = attr.value() {
                let mut value = value.into_owned();

                if name == "a" && (attr.name_eq("name") || attr.name_eq("href")) {
                    self.disambiguate_footnote(attr.name_eq("href"), &mut value);
                }

                markup.push_str("=\"");
                markup.push_str(&escape(&value));
                markup.push('"');
            }
        }

        markup.push('>');

        self.main.write_str(&markup);
    }

    fn disambiguate_footnote(&self, is_href: bool, value: &mut String) {
        let Some(suffix) = &self.settings.footnote_anchor_suffix else {
            return;
        };

        let anchor = if is_href {
            value.strip_prefix('#')
        } else {
            Some(value.as_str())
        };

        if anchor.is_some_and(is_footnote_anchor) {
            value.push_str(suffix);
        }
    }

    fn finish(mut self) -> String {
        // NOTE: trailing whitespace left in the buffer is dropped.
        if !self.has_block {
            return self.main.into_string();
        }

        if self.paragraph_open {
            self.main.write_str("</p>");
        }

        self.main.prepend(self.leading.as_str());
        self.main.into_string()
    }
}

impl TokenHandler for ThinPass<'_> {
    fn begin_tag(&mut self, tag: &mut BeginTag<'_>) {
        let Some((desc, name)) = self.resolve(tag.name()) else {
            return;
        };

        let class = ElementClass::of_tag(&name, desc.category);

        self.has_block |= class.is_structural();

        if self.collapse(class) {
            return;
        }

        self.in_main = true;
        self.write_begin_tag(desc, &name, tag);

        if name == "pre" {
            self.preserve_whitespace = true;
        }
    }

    fn end_tag(&mut self, tag: &mut EndTag<'_>) {
        let Some((desc, name)) = self.resolve(tag.name()) else {
            return;
        };

        let class = ElementClass::of_tag(&name, desc.category);

        self.has_block |= class.is_structural();

        if self.collapse(class) {
            return;
        }

        self.in_main = true;

        if !tag.is_implicit() && desc.category != TagCategory::Empty {
            self.main.write_str(&format!("</{name}>"));
        }

        if name == "pre" {
            self.preserve_whitespace = false;
        }
    }

    fn text(&mut self, text: &mut Text<'_>) {
        let normalized = escape(&unescape(text.raw(), UnescapeMode::Text)).into_owned();

        if self.collapse(ElementClass::of_text(&normalized)) {
            return;
        }

        self.in_main = true;
        self.main.write_str(&normalized);
    }
}
