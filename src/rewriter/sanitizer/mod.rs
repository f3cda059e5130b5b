//! Removal of dangerous and unwanted markup from untrusted HTML fragments.

mod open_tag_stack;

pub use self::open_tag_stack::OpenTagStack;

use crate::base::url_decode;
use crate::html::{is_event_handler_attribute, is_uri_attribute, requires_end_tag};
use crate::token::*;
use crate::transform_stream::{Dispatcher, OutputBuffer, TokenHandler};
use bitflags::bitflags;
use memchr::{memchr, memchr2, memchr_iter};
use std::borrow::Cow;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SanitizeFlags: u32 {
        /// `<script>` tags and everything inside them, along with anything
        /// else that would put a `<script` into the output.
        const REMOVE_SCRIPT_TAGS = 0x001;
        /// `on*` event handlers and URI attributes pointing at `javascript:`.
        const REMOVE_SCRIPT_ATTRIBUTES = 0x002;
        /// Unterminated tags and text that looks like the start of a tag.
        const REMOVE_PARTIAL_TAGS = 0x004;
        /// Style sheets, `<font>` and styling attributes.
        const REMOVE_STYLES = 0x008;
        /// End tags that close nothing.
        const REMOVE_UNOPENED_CLOSE_TAGS = 0x010;
        /// `<html>`, `<body>`, `<base>` and the whole `<head>`.
        const REMOVE_DOCUMENT_TAGS = 0x020;
        const REMOVE_COMMENTS = 0x040;
        const REMOVE_MARKUP_DIRECTIVES = 0x080;
        /// Close the tags that are left open at the end of the fragment.
        const FORCE_CLOSE_TAGS = 0x100;
    }
}

impl Default for SanitizeFlags {
    #[inline]
    fn default() -> Self {
        SanitizeFlags::all()
    }
}

/// Removes from `html` the constructs selected by `flags`.
///
/// The output never contains an end tag that could close markup surrounding
/// the fragment when both `REMOVE_UNOPENED_CLOSE_TAGS` and
/// `FORCE_CLOSE_TAGS` are set.
pub fn sterilize(html: &str, flags: SanitizeFlags) -> String {
    let pass = SanitizePass {
        flags,
        suppressed_depth: 0,
        open_tags: OpenTagStack::default(),
        output: OutputBuffer::with_capacity(html.len()),
    };

    Dispatcher::new(html, pass).parse().output.into_string()
}

fn is_suppressed_subtree_root(name: &str, flags: SanitizeFlags) -> bool {
    flags.contains(SanitizeFlags::REMOVE_DOCUMENT_TAGS) && name.eq_ignore_ascii_case("head")
}

/// Whether `raw` contains `<script`, in any case.
fn contains_script_tag(raw: &str) -> bool {
    let bytes = raw.as_bytes();

    memchr_iter(b'<', bytes).any(|lt| {
        bytes
            .get(lt + 1..lt + 7)
            .is_some_and(|name| name.eq_ignore_ascii_case(b"script"))
    })
}

fn is_illegal_tag_name(name: &str, flags: SanitizeFlags) -> bool {
    // NOTE: `<scripts>` and the like are not script elements, but still spell `<script`.
    (flags.contains(SanitizeFlags::REMOVE_SCRIPT_TAGS)
        && name.get(..6).is_some_and(|prefix| prefix.eq_ignore_ascii_case("script")))
        || (flags.contains(SanitizeFlags::REMOVE_STYLES) && name_is_one_of!(name, ["style", "font"]))
        || (flags.contains(SanitizeFlags::REMOVE_DOCUMENT_TAGS)
            && name_is_one_of!(name, ["body", "html", "base"]))
}

fn is_illegal_tag(tag: &BeginTag<'_>, flags: SanitizeFlags) -> bool {
    if is_illegal_tag_name(tag.name(), flags) {
        return true;
    }

    flags.contains(SanitizeFlags::REMOVE_STYLES)
        && tag.name_eq("link")
        && tag
            .attribute_value("rel")
            .is_some_and(|rel| rel.trim().eq_ignore_ascii_case("stylesheet"))
}

fn is_script_uri(value: &str) -> bool {
    let decoded = url_decode(value.trim());

    decoded
        .get(..11)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("javascript:"))
}

fn is_illegal_attribute(attr: &Attribute<'_>, flags: SanitizeFlags) -> bool {
    let name = attr.name();

    // NOTE: namespaced attributes (`o:p`, `v:shapes`) come from office
    // documents; only the `xml` ones are kept.
    if name.contains(':') && !name.get(..3).is_some_and(|p| p.eq_ignore_ascii_case("xml")) {
        return true;
    }

    if flags.contains(SanitizeFlags::REMOVE_SCRIPT_TAGS) && name.contains('<') {
        return true;
    }

    if flags.contains(SanitizeFlags::REMOVE_STYLES)
        && name_is_one_of!(name, ["font", "class", "style", "face"])
    {
        return true;
    }

    if flags.contains(SanitizeFlags::REMOVE_SCRIPT_ATTRIBUTES) {
        if is_event_handler_attribute(name) {
            return true;
        }

        if is_uri_attribute(name) {
            return attr.value().is_some_and(|value| is_script_uri(&value));
        }
    }

    false
}

/// Removes `<x...` fragments (`<` followed by a letter or `!`) up to the
/// next `>` or the end of the text. A fragment doesn't extend over a line
/// break unless the break ends the text.
fn strip_partial_tags(text: &str) -> Cow<'_, str> {
    let bytes = text.as_bytes();
    let mut stripped = String::new();
    let mut copied = 0;
    let mut changed = false;
    let mut pos = 0;

    while let Some(lt) = memchr(b'<', &bytes[pos..]).map(|i| i + pos) {
        pos = lt + 1;

        if !bytes
            .get(lt + 1)
            .is_some_and(|&b| b.is_ascii_alphabetic() || b == b'!')
        {
            continue;
        }

        let end = match memchr2(b'>', b'\n', &bytes[lt..]).map(|i| i + lt) {
            Some(gt) if bytes[gt] == b'>' => gt + 1,
            Some(nl) if nl + 1 == bytes.len() => nl,
            Some(_) => continue,
            None => bytes.len(),
        };

        stripped.push_str(&text[copied..lt]);
        copied = end;
        pos = end;
        changed = true;
    }

    if !changed {
        return Cow::Borrowed(text);
    }

    stripped.push_str(&text[copied..]);

    Cow::Owned(stripped)
}

struct SanitizePass {
    flags: SanitizeFlags,
    suppressed_depth: usize,
    open_tags: OpenTagStack,
    output: OutputBuffer,
}

impl SanitizePass {
    #[inline]
    fn emit(&mut self, token: &dyn Serialize) {
        if self.suppressed_depth == 0 {
            self.output.write_token(token);
        }
    }

    #[inline]
    fn emit_unless(&mut self, flag: SanitizeFlags, token: &dyn Serialize) {
        if !self.flags.contains(flag) {
            self.emit(token);
        }
    }

    /// Same as [`emit_unless`](Self::emit_unless), but a token that spells
    /// `<script` is also dropped when scripts are removed.
    fn emit_raw_unless(&mut self, flag: SanitizeFlags, raw: &str, token: &dyn Serialize) {
        if self.flags.contains(SanitizeFlags::REMOVE_SCRIPT_TAGS) && contains_script_tag(raw) {
            trace!(@action "sanitizer", "drop {:?}", raw);

            return;
        }

        self.emit_unless(flag, token);
    }
}

/// Re-escapes attribute values that contain a raw `<`.
fn escape_angle_brackets(tag: &mut BeginTag<'_>) {
    for attr in tag.attributes_mut() {
        if !attr.raw_value().is_some_and(|raw| raw.contains('<')) {
            continue;
        }

        if let Some(value) = attr.value().map(Cow::into_owned) {
            attr.set_value(value);
        }
    }
}

impl TokenHandler for SanitizePass {
    fn begin_tag(&mut self, tag: &mut BeginTag<'_>) {
        let flags = self.flags;

        if flags.contains(SanitizeFlags::REMOVE_PARTIAL_TAGS) && tag.is_unterminated() {
            return;
        }

        tag.retain_attributes(|attr| !is_illegal_attribute(attr, flags));

        if flags.contains(SanitizeFlags::REMOVE_SCRIPT_TAGS) {
            escape_angle_brackets(tag);
        }

        if is_suppressed_subtree_root(tag.name(), flags) {
            self.suppressed_depth += 1;

            trace!(@suppress "sanitizer", "enter", self.suppressed_depth);
        } else if self.suppressed_depth == 0 && !is_illegal_tag(tag, flags) {
            self.open_tags.push(tag.name());
            self.emit(tag);
        }
    }

    fn end_tag(&mut self, tag: &mut EndTag<'_>) {
        if self.suppressed_depth > 0 {
            if is_suppressed_subtree_root(tag.name(), self.flags) {
                self.suppressed_depth -= 1;

                trace!(@suppress "sanitizer", "leave", self.suppressed_depth);
            }

            return;
        }

        if is_illegal_tag_name(tag.name(), self.flags) {
            return;
        }

        match self.open_tags.pop(tag.name()) {
            Ok(_) => self.emit(tag),
            Err(_unmatched) => {
                trace!(@action "sanitizer", "{}", _unmatched);

                self.emit_unless(SanitizeFlags::REMOVE_UNOPENED_CLOSE_TAGS, tag);
            }
        }
    }

    fn text(&mut self, text: &mut Text<'_>) {
        if self.flags.contains(SanitizeFlags::REMOVE_PARTIAL_TAGS) {
            let stripped = match strip_partial_tags(text.raw()) {
                Cow::Owned(stripped) => Some(stripped),
                Cow::Borrowed(_) => None,
            };

            if let Some(stripped) = stripped {
                text.set_raw(stripped);
            }
        }

        self.emit(text);
    }

    fn comment(&mut self, comment: &mut Comment<'_>) {
        self.emit_raw_unless(SanitizeFlags::REMOVE_COMMENTS, comment.raw(), &*comment);
    }

    fn markup_directive(&mut self, directive: &mut MarkupDirective<'_>) {
        self.emit_raw_unless(
            SanitizeFlags::REMOVE_MARKUP_DIRECTIVES,
            directive.raw(),
            &*directive,
        );
    }

    fn style_text(&mut self, text: &mut StyleText<'_>) {
        self.emit_raw_unless(SanitizeFlags::REMOVE_STYLES, text.raw(), &*text);
    }

    fn style_url(&mut self, url: &mut Literal<'_>) {
        self.emit_raw_unless(SanitizeFlags::REMOVE_STYLES, url.raw(), &*url);
    }

    fn style_import(&mut self, import: &mut Literal<'_>) {
        self.emit_raw_unless(SanitizeFlags::REMOVE_STYLES, import.raw(), &*import);
    }

    fn style_comment(&mut self, comment: &mut StyleComment<'_>) {
        self.emit_raw_unless(SanitizeFlags::REMOVE_STYLES, comment.raw(), &*comment);
    }

    fn style_literal(&mut self, literal: &mut Literal<'_>) {
        self.emit_raw_unless(SanitizeFlags::REMOVE_STYLES, literal.raw(), &*literal);
    }

    fn script_text(&mut self, text: &mut ScriptText<'_>) {
        self.emit_unless(SanitizeFlags::REMOVE_SCRIPT_TAGS, text);
    }

    fn script_comment(&mut self, comment: &mut ScriptComment<'_>) {
        self.emit_unless(SanitizeFlags::REMOVE_SCRIPT_TAGS, comment);
    }

    fn script_literal(&mut self, literal: &mut Literal<'_>) {
        self.emit_unless(SanitizeFlags::REMOVE_SCRIPT_TAGS, literal);
    }

    fn document_end(&mut self) {
        if !self.flags.contains(SanitizeFlags::FORCE_CLOSE_TAGS)
            || self.suppressed_depth > 0
            || self.open_tags.is_empty()
        {
            return;
        }

        let closes: String = self
            .open_tags
            .innermost_first()
            .filter(|name| requires_end_tag(name))
            .map(|name| format!("</{name}>"))
            .collect();

        self.output.write_str(&closes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sterilize_all(html: &str) -> String {
        sterilize(html, SanitizeFlags::all())
    }

    #[test]
    fn scripts_are_removed_entirely() {
        assert_eq!(
            sterilize_all("<p onclick=\"go()\">hi<script>alert('</p>')</script></p>"),
            "<p>hi</p>"
        );
        assert_eq!(
            sterilize_all("<SCRIPT src=x.js></SCRIPT><script>// c\n</script>ok"),
            "ok"
        );
    }

    #[test]
    fn scripts_are_kept_without_the_flag() {
        let html = "<script>var a = 'b'; /* c */</script>";

        assert_eq!(sterilize(html, SanitizeFlags::empty()), html);
    }

    #[test]
    fn javascript_uris_are_removed() {
        assert_eq!(
            sterilize_all("<a href=\" JavaScript:alert(1)\" title=t>x</a>"),
            "<a title=t>x</a>"
        );
        assert_eq!(
            sterilize_all("<img src=\"java%73cript:go()\" alt=a>"),
            "<img alt=a>"
        );
        assert_eq!(
            sterilize_all("<a href=\"http://x.com/javascript:\">x</a>"),
            "<a href=\"http://x.com/javascript:\">x</a>"
        );
    }

    #[test]
    fn namespaced_attributes_are_removed() {
        assert_eq!(
            sterilize(
                "<p class=MsoNormal o:spid=\"1\" xml:lang=\"en\">x</p>",
                SanitizeFlags::empty()
            ),
            "<p class=MsoNormal xml:lang=\"en\">x</p>"
        );
    }

    #[test]
    fn styles_are_removed() {
        assert_eq!(
            sterilize(
                "<font face=x>t</font><span style=\"color:red\" id=i class=c>u</span>\
                 <link rel=\" Stylesheet\" href=a.css><link rel=alternate href=b.xml>\
                 <style>p { background: url(x.png) }</style>",
                SanitizeFlags::REMOVE_STYLES
            ),
            "t<span id=i>u</span><link rel=alternate href=b.xml>"
        );
    }

    #[test]
    fn head_subtree_and_document_tags_are_removed() {
        assert_eq!(
            sterilize_all(
                "<html><head><title>t</title><style>a{}</style></head>\
                 <body bgcolor=white><b>x</b></body></html>"
            ),
            "<b>x</b>"
        );
    }

    #[test]
    fn script_tags_hidden_in_other_markup_are_removed() {
        let flags = SanitizeFlags::REMOVE_SCRIPT_TAGS;

        assert_eq!(
            sterilize("<a title=\"<script>\" href=x>x</a><!-- <script>y --> ", flags),
            "<a title=\"&lt;script&gt;\" href=x>x</a> "
        );
        assert_eq!(
            sterilize("<i title=a<SCRIPT>b</i><!DOCTYPE x <Script>", flags),
            "<i title=\"a&lt;SCRIPT\">b</i>"
        );
        assert_eq!(sterilize("<scripts>x</scripts>", flags), "x");
        assert_eq!(
            sterilize("<style>/* <script> */ p {}</style>", flags),
            "<style> p {}</style>"
        );

        // Without the flag, nothing is touched.
        assert_eq!(
            sterilize("<a title=\"<script>\">x</a><!-- <script> -->", SanitizeFlags::empty()),
            "<a title=\"<script>\">x</a><!-- <script> -->"
        );
    }

    #[test]
    fn unmatched_end_tags() {
        assert_eq!(sterilize_all("a</b>c</div>"), "ac");
        assert_eq!(
            sterilize(
                "a</b>c",
                SanitizeFlags::all() - SanitizeFlags::REMOVE_UNOPENED_CLOSE_TAGS
            ),
            "a</b>c"
        );
    }

    #[test]
    fn open_tags_are_force_closed() {
        assert_eq!(sterilize_all("<div><b>x"), "<div><b>x</b></div>");
        assert_eq!(sterilize_all("<p>a<br>b"), "<p>a<br>b");
        assert_eq!(
            sterilize("<div><b>x", SanitizeFlags::empty()),
            "<div><b>x"
        );
    }

    #[test]
    fn partial_tags_are_removed() {
        assert_eq!(sterilize_all("<b>x</b><i y=\"z"), "<b>x</b>");
        assert_eq!(strip_partial_tags("a <!-- b"), "a ");
        assert_eq!(strip_partial_tags("a <!b> c"), "a  c");
        assert_eq!(strip_partial_tags("x <!oops\nmore"), "x <!oops\nmore");
        assert_eq!(strip_partial_tags("x <!oops\n"), "x \n");
        assert_eq!(strip_partial_tags("1 < 2"), "1 < 2");
    }

    #[test]
    fn comments_and_directives() {
        let html = "<!DOCTYPE html><!-- c -->x";

        assert_eq!(sterilize_all(html), "x");
        assert_eq!(sterilize(html, SanitizeFlags::REMOVE_COMMENTS), "<!DOCTYPE html>x");
        assert_eq!(sterilize(html, SanitizeFlags::empty()), html);
    }

    #[test]
    fn sterilizing_twice_changes_nothing() {
        let html = "<html><head><script>x()</script></head><body onload=init()>\
                    <div><p class=a>one</b> <a href='javascript:void(0)'>two</a>\
                    <font color=red><img src=a.png o:x=1></font><!-- c --><i>three <!bad";

        for flags in [
            SanitizeFlags::all(),
            SanitizeFlags::REMOVE_SCRIPT_TAGS
                | SanitizeFlags::REMOVE_PARTIAL_TAGS
                | SanitizeFlags::FORCE_CLOSE_TAGS,
            SanitizeFlags::empty(),
        ] {
            let once = sterilize(html, flags);

            assert_eq!(sterilize(&once, flags), once, "flags: {flags:?}");
        }
    }
}
