use crate::token::{BeginTag, Comment, EndTag, Serialize, Text};
use crate::transform_stream::{Dispatcher, OutputBuffer, TokenHandler};
use bitflags::bitflags;

bitflags! {
    /// Vocabulary of [`thin_for_capture`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CaptureFlags: u8 {
        /// Keep the page structure (`head`, `body`, `meta`) besides content.
        const FOR_PAGE = 0b001;
        const FOR_SNIPPET = 0b010;
        const PRESERVE_IMAGES = 0b100;
    }
}

impl Default for CaptureFlags {
    #[inline]
    fn default() -> Self {
        CaptureFlags::FOR_PAGE
    }
}

fn is_preserved_tag(name: &str, flags: CaptureFlags) -> bool {
    name_is_one_of!(
        name,
        ["a", "p", "br", "form", "input", "select", "option", "ilayer", "div", "iframe", "pre"]
    ) || (flags.contains(CaptureFlags::FOR_PAGE) && name_is_one_of!(name, ["meta", "head", "body"]))
        || (flags.contains(CaptureFlags::PRESERVE_IMAGES) && name_is_one_of!(name, ["img"]))
}

fn replacement(name: &str) -> Option<&'static str> {
    if name_is_one_of!(
        name,
        ["h1", "h2", "h3", "h4", "h5", "h6", "hr", "menu", "ul", "ol", "dir", "dl", "blockquote"]
    ) {
        Some("p")
    } else if name_is_one_of!(name, ["li", "dt", "dd"]) {
        Some("br")
    } else {
        None
    }
}

fn is_preserved_attribute(name: &str) -> bool {
    name_is_one_of!(
        name,
        [
            "href",
            "name",
            "value",
            "action",
            "method",
            "enctype",
            "size",
            "type",
            "src",
            "content",
            "http-equiv",
            "height",
            "width",
            "alt"
        ]
    )
}

/// Thins a captured page or snippet down to links, paragraphs, line breaks
/// and forms. Scripts, styles, directives and the title are dropped and line
/// breaks in text become spaces.
pub fn thin_for_capture(html: &str, flags: CaptureFlags) -> String {
    let pass = CapturePass {
        flags,
        in_title: false,
        output: OutputBuffer::with_capacity(html.len()),
    };

    Dispatcher::new(html, pass).parse().output.into_string()
}

struct CapturePass {
    flags: CaptureFlags,
    in_title: bool,
    output: OutputBuffer,
}

impl CapturePass {
    fn output_name<'n>(&self, name: &'n str) -> Option<&'n str> {
        if is_preserved_tag(name, self.flags) {
            Some(name)
        } else {
            replacement(name)
        }
    }
}

impl TokenHandler for CapturePass {
    fn begin_tag(&mut self, tag: &mut BeginTag<'_>) {
        if tag.name_eq("title") && !tag.is_complete() {
            self.in_title = true;
        }

        let Some(name) = self.output_name(tag.name()) else {
            return;
        };

        let mut markup = format!("<{name}");

        for attr in tag.attributes().iter().filter(|a| is_preserved_attribute(a.name())) {
            markup.push(' ');
            attr.serialize(&mut markup);
        }

        if tag.is_complete() {
            markup.push('/');
        }

        markup.push('>');

        self.output.write_str(&markup);
    }

    fn end_tag(&mut self, tag: &mut EndTag<'_>) {
        if tag.is_implicit() {
            return;
        }

        if tag.name_eq("title") {
            self.in_title = false;
        }

        if let Some(name) = self.output_name(tag.name()) {
            if !name_is_one_of!(name, ["br", "img"]) {
                self.output.write_str(&format!("</{name}>"));
            }
        }
    }

    fn text(&mut self, text: &mut Text<'_>) {
        if !self.in_title {
            self.output.write_str(&text.raw().replace(['\r', '\n'], " "));
        }
    }

    fn comment(&mut self, comment: &mut Comment<'_>) {
        self.output.write_token(comment);
    }
}
