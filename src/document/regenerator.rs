use super::{DocumentMetadata, SpecialHeaders};
use crate::base::{is_file_url, saved_from_marker};
use crate::html::{escape, is_event_handler_attribute, permitted_above_body};
use crate::rewriter::reference_fixer::{ReferenceFixer, ReferenceFixerExt, WithSubstitutions};
use crate::token::{BeginTag, EndTag, Literal, MarkupDirective, Serialize};
use crate::transform_stream::{Dispatcher, OutputBuffer, TokenHandler};
use hashbrown::HashSet;

type Replacements = WithSubstitutions<fn(&str, &str) -> Option<String>>;

fn keep_reference(_tag_name: &str, _reference: &str) -> Option<String> {
    None
}

/// Re-serializes a document so that it stands on its own: the `html`,
/// `head` and `body` structure is completed, scripts and inline event
/// handlers are removed, metadata is patched in and references are replaced.
///
/// ```
/// use html_tamer::document::Regenerator;
///
/// let html = Regenerator::new("file:///page.html", [("a.png", "b.png")])
///     .regenerate("<p><img src=a.png><script>x()</script>");
///
/// assert_eq!(
///     html,
///     "<html><head></head><body><p><img src=\"b.png\"></body></html>"
/// );
/// ```
pub struct Regenerator<'m> {
    url: String,
    metadata: Option<&'m DocumentMetadata>,
    fixer: Replacements,
    fragment: bool,
}

impl<'m> Regenerator<'m> {
    /// `replacements` maps old references to new ones; references are
    /// compared without their fragment, which is carried over.
    pub fn new<K, V>(url: &str, replacements: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let keep: fn(&str, &str) -> Option<String> = keep_reference;

        Regenerator {
            url: url.to_string(),
            metadata: None,
            fixer: keep.with_substitutions(replacements),
            fragment: false,
        }
    }

    /// Patches `metadata` into the `<head>` of the document.
    #[inline]
    pub fn with_metadata(mut self, metadata: &'m DocumentMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Treats the input as a fragment: no `html`, `head` or `body` tags are
    /// synthesized.
    #[inline]
    pub fn fragment(mut self) -> Self {
        self.fragment = true;
        self
    }

    pub fn regenerate(self, html: &str) -> String {
        let Regenerator {
            url,
            metadata,
            fixer,
            fragment,
        } = self;

        let pass = RegeneratePass {
            metadata,
            fixer,
            output: OutputBuffer::with_capacity(html.len()),
            first_tag: !fragment,
            seen_head: fragment,
            seen_body: fragment,
            script_depth: 0,
            synthesized: Vec::new(),
            emitted_metadata: HashSet::default(),
        };

        let mut output = Dispatcher::new(html, pass).parse().output;

        insert_special_headers(&mut output, &url, metadata);

        output.into_string()
    }
}

fn insert_special_headers(
    output: &mut OutputBuffer,
    url: &str,
    metadata: Option<&DocumentMetadata>,
) {
    let headers = SpecialHeaders::scan(output.as_str());

    // NOTE: local files keep the marker they came with, so that the page
    // stays in the security zone it was saved from.
    if headers.saved_from.is_none() {
        let saved_from = metadata.and_then(|m| m.saved_from.as_deref());

        if let Some(saved_from) = saved_from {
            output.prepend("\r\n");
            output.prepend(saved_from);
        } else if !url.is_empty() && !is_file_url(url) {
            output.prepend("\r\n");
            output.prepend(&saved_from_marker(url));
        }
    }

    if let Some(doc_type) = metadata.and_then(|m| m.doc_type.as_deref()) {
        output.prepend(doc_type);
    }
}

/// The content the regenerator gives the `<meta>` tag called `key`.
fn meta_value(metadata: &DocumentMetadata, key: &str) -> Option<String> {
    match key {
        "AUTHOR" => metadata.author.clone(),
        "CONTENT-TYPE" => metadata.charset.as_ref().map(|c| format!("text/html; charset={c}")),
        "CHARSET" => metadata.charset.clone(),
        "DESCRIPTION" => metadata.description.clone(),
        "GENERATOR" => metadata.generator.clone(),
        "COPYRIGHT" => metadata.copyright.clone(),
        "KEYWORDS" => metadata.keywords.clone(),
        "PRAGMA" => metadata.pragma.clone(),
        "ROBOTS" => metadata.robots.clone(),
        _ => None,
    }
}

struct RegeneratePass<'m> {
    metadata: Option<&'m DocumentMetadata>,
    fixer: Replacements,
    output: OutputBuffer,
    first_tag: bool,
    seen_head: bool,
    seen_body: bool,
    script_depth: usize,
    synthesized: Vec<&'static str>,
    emitted_metadata: HashSet<String>,
}

impl RegeneratePass<'_> {
    fn synthesize(&mut self, name: &'static str) {
        trace!(@action "regenerate", "synthesized <{}>", name);

        self.output.write_str(&format!("<{name}>"));
        self.synthesized.push(name);
    }

    /// Writes the metadata the source doesn't have a tag for.
    fn emit_missing_metadata(&mut self) {
        let Some(metadata) = self.metadata else {
            return;
        };

        let content_type = metadata
            .charset
            .as_ref()
            .filter(|_| !self.emitted_metadata.contains("CHARSET"))
            .map(|charset| format!("text/html; charset={charset}"));

        let named = |name: &str, value: &Option<String>| {
            value.as_deref().map(|value| meta_markup("name", name, value))
        };

        let entries = [
            ("BASE", metadata.base.as_deref().map(|base| format!("<base href=\"{}\">", escape(base)))),
            ("AUTHOR", named("author", &metadata.author)),
            ("CONTENT-TYPE", content_type.map(|value| meta_markup("http-equiv", "content-type", &value))),
            ("DESCRIPTION", named("description", &metadata.description)),
            ("COPYRIGHT", named("copyright", &metadata.copyright)),
            ("GENERATOR", named("generator", &metadata.generator)),
            ("KEYWORDS", named("keywords", &metadata.keywords)),
            ("ROBOTS", named("robots", &metadata.robots)),
            ("PRAGMA", metadata.pragma.as_deref().map(|value| meta_markup("http-equiv", "pragma", value))),
        ];

        for (key, markup) in entries {
            let Some(markup) = markup else {
                continue;
            };

            if self.emitted_metadata.insert(key.to_string()) {
                self.output.write_str(&markup);
            }
        }
    }

    fn patch_meta(&mut self, tag: &mut BeginTag<'_>) {
        let Some(metadata) = self.metadata else {
            return;
        };

        if let Some(charset) = &metadata.charset {
            if tag.set_attribute_value("charset", charset.as_str()) {
                self.emitted_metadata.insert("CHARSET".into());
            }
        }

        let key = tag
            .attribute_value("name")
            .or_else(|| tag.attribute_value("http-equiv"))
            .map(|key| key.trim().to_ascii_uppercase());

        let Some(key) = key else {
            return;
        };

        if let Some(value) = meta_value(metadata, &key) {
            tag.set_attribute_value("content", value);
        }

        self.emitted_metadata.insert(key);
    }

    fn fix_attributes(&self, tag: &mut BeginTag<'_>) {
        tag.retain_attributes(|attr| !is_event_handler_attribute(attr.name()));

        let fixes: Vec<_> = tag
            .attributes()
            .iter()
            .enumerate()
            .filter_map(|(i, attr)| {
                let value = attr.value()?;
                let fixed = self.fixer.fix_reference(tag.name(), &value)?;

                (fixed != value).then_some((i, fixed))
            })
            .collect();

        if fixes.is_empty() {
            return;
        }

        let attributes = tag.attributes_mut();

        for (i, fixed) in fixes {
            attributes[i].set_value(fixed);
        }
    }

    fn fix_literal(&mut self, literal: &mut Literal<'_>) {
        if self.script_depth > 0 {
            return;
        }

        let fixed = self.fixer.fix_reference("style", &literal.text());

        if let Some(fixed) = fixed {
            literal.set_text(fixed);
        }

        self.output.write_token(literal);
    }
}

fn meta_markup(kind: &str, name: &str, content: &str) -> String {
    format!("<meta {kind}=\"{name}\" content=\"{}\">", escape(content))
}

impl TokenHandler for RegeneratePass<'_> {
    fn begin_tag(&mut self, tag: &mut BeginTag<'_>) {
        if self.first_tag {
            if !tag.name_eq("html") {
                self.synthesize("html");
            }

            self.first_tag = false;
        }

        let above_body = permitted_above_body(tag.name());

        if !self.seen_head && !above_body {
            self.output.write_str("<head>");
            self.emit_missing_metadata();
            self.output.write_str("</head>");
            self.seen_head = true;
        }

        if tag.name_eq("script") {
            if !tag.is_complete() {
                self.script_depth += 1;
            }

            return;
        }

        if tag.name_eq("head") {
            self.seen_head = true;
        } else if !self.seen_body {
            if tag.name_eq("body") {
                self.seen_body = true;
            } else if !above_body {
                self.synthesize("body");
                self.seen_body = true;
            }
        }

        if tag.name_eq("base") {
            let Some(base) = self.metadata.and_then(|m| m.base.as_deref()) else {
                return;
            };

            tag.set_attribute_value("href", base);
            self.emitted_metadata.insert("BASE".into());
        } else if tag.name_eq("meta") {
            self.patch_meta(tag);
        }

        self.fix_attributes(tag);
        self.output.write_token(tag);
    }

    fn end_tag(&mut self, tag: &mut EndTag<'_>) {
        if tag.name_eq("script") {
            if !tag.is_implicit() && self.script_depth > 0 {
                self.script_depth -= 1;
            }

            return;
        }

        if tag.name_eq("head") {
            self.emit_missing_metadata();
        }

        if tag.name_eq("html") {
            if let Some(pos) = self.synthesized.iter().position(|&n| n == "body") {
                self.output.write_str("</body>");
                self.synthesized.remove(pos);
            }
        }

        self.output.write_token(tag);
    }

    fn markup_directive(&mut self, directive: &mut MarkupDirective<'_>) {
        let is_doc_type = directive
            .raw()
            .get(..9)
            .is_some_and(|start| start.eq_ignore_ascii_case("<!DOCTYPE"));

        // NOTE: the doctype of the metadata is put back at the very top.
        if is_doc_type && self.metadata.is_some_and(|m| m.doc_type.is_some()) {
            return;
        }

        self.default_action(directive);
    }

    fn style_url(&mut self, url: &mut Literal<'_>) {
        self.fix_literal(url);
    }

    fn style_import(&mut self, import: &mut Literal<'_>) {
        self.fix_literal(import);
    }

    fn style_literal(&mut self, literal: &mut Literal<'_>) {
        self.fix_literal(literal);
    }

    fn default_action(&mut self, token: &dyn Serialize) {
        if self.script_depth == 0 {
            self.output.write_token(token);
        }
    }

    fn document_end(&mut self) {
        while let Some(name) = self.synthesized.pop() {
            self.output.write_str(&format!("</{name}>"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::IndexedDocument;

    fn regenerate(html: &str) -> String {
        Regenerator::new("", std::iter::empty::<(&str, &str)>()).regenerate(html)
    }

    #[test]
    fn structure_is_completed() {
        assert_eq!(
            regenerate("<title>T</title><p>x</p>"),
            "<html><title>T</title><head></head><body><p>x</p></body></html>"
        );
        assert_eq!(
            regenerate("<html><head><title>T</title></head><p>x</p></html>"),
            "<html><head><title>T</title></head><body><p>x</p></body></html>"
        );
        assert_eq!(
            regenerate("<html><head></head><body>x</body></html>"),
            "<html><head></head><body>x</body></html>"
        );
    }

    #[test]
    fn fragments_are_left_alone() {
        assert_eq!(
            Regenerator::new("", std::iter::empty::<(&str, &str)>())
                .fragment()
                .regenerate("<p onclick=go()>x</p>"),
            "<p>x</p>"
        );
    }

    #[test]
    fn scripts_and_event_handlers_are_removed() {
        assert_eq!(
            regenerate("<body onload=\"init()\"><script>if (a < b) x();</script>\
                        <b onmouseover=f()>x</b></body>"),
            "<html><head></head><body><b>x</b></body></html>"
        );
    }

    #[test]
    fn metadata_is_patched_and_completed() {
        let metadata = DocumentMetadata {
            author: Some("New Author".into()),
            charset: Some("utf-8".into()),
            description: Some("About \"things\"".into()),
            ..DocumentMetadata::default()
        };

        let html = Regenerator::new("", std::iter::empty::<(&str, &str)>())
            .with_metadata(&metadata)
            .regenerate(
                "<html><head><meta name=author content=old><base href=http://x.com/></head>\
                 <body>x</body></html>",
            );

        assert_eq!(
            html,
            "<html><head><meta name=author content=\"New Author\">\
             <meta http-equiv=\"content-type\" content=\"text/html; charset=utf-8\">\
             <meta name=\"description\" content=\"About &quot;things&quot;\"></head>\
             <body>x</body></html>"
        );
    }

    #[test]
    fn base_is_replaced_from_metadata() {
        let metadata = DocumentMetadata {
            base: Some("http://new.com/".into()),
            ..DocumentMetadata::default()
        };

        let html = Regenerator::new("", std::iter::empty::<(&str, &str)>())
            .with_metadata(&metadata)
            .regenerate("<html><head><base href=http://old.com/></head></html>");

        assert_eq!(
            html,
            "<html><head><base href=\"http://new.com/\"></head></html>"
        );
    }

    #[test]
    fn references_are_replaced() {
        let html = Regenerator::new(
            "",
            [("http://x.com/a.png", "local/a.png"), ("http://x.com/s.css", "local/s.css")],
        )
        .fragment()
        .regenerate(
            "<img src=\"http://x.com/a.png#f\" alt=\"http://x.com/a.png\">\
             <style>@import url(http://x.com/s.css);</style>",
        );

        assert_eq!(
            html,
            "<img src=\"local/a.png#f\" alt=\"local/a.png\">\
             <style>@import url(\"local/s.css\");</style>"
        );
    }

    #[test]
    fn special_headers() {
        let doc = IndexedDocument::index(
            "<!DOCTYPE html><p>hi</p>",
            "http://x.com/a.html",
        );

        assert_eq!(
            doc.generate_html(),
            "<!DOCTYPE html><!-- saved from url=(0019)http://x.com/a.html -->\r\n\
             <html><head></head><body><p>hi</p></body></html>"
        );

        let local = IndexedDocument::index("<p>hi</p>", "file:///C:/a.html");

        assert_eq!(
            local.generate_html(),
            "<html><head></head><body><p>hi</p></body></html>"
        );
    }

    #[test]
    fn frames_are_substituted() {
        let frame = IndexedDocument::index("<p>menu</p>", "http://real.com/menu.html").with_name("menu");
        let doc = IndexedDocument::with_frames(
            "<frameset><frame name=menu src=menu.html></frameset>",
            "file:///C:/site/index.html",
            vec![frame],
        );

        assert_eq!(
            doc.generate_html(),
            "<html><frameset><frame name=menu src=\"http://real.com/menu.html\"></frameset></html>"
        );
    }
}
