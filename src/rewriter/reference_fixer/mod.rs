//! Rewriting of the references a document makes to other resources: links,
//! image and frame sources, form actions, CSS `url(...)` and `@import`.

mod fixers;

pub use self::fixers::{AbsoluteUrls, LocalFilesOnly, ReferenceFixerExt, WithSubstitutions};

use crate::errors::UrlError;
use crate::token::{BeginTag, Literal, Serialize};
use crate::transform_stream::{Dispatcher, OutputBuffer, TokenHandler};

/// Decides what a reference found in a document becomes.
pub trait ReferenceFixer {
    /// Returns the new reference, or `None` to leave `reference` as it is.
    /// `tag_name` is the name of the tag the reference was found in
    /// (`style` for references in style sheets).
    fn fix_reference(&self, tag_name: &str, reference: &str) -> Option<String>;

    /// Called for every `<base href>` of the document.
    fn rebase(&mut self, _href: &str) {}
}

impl<F> ReferenceFixer for F
where
    F: Fn(&str, &str) -> Option<String>,
{
    #[inline]
    fn fix_reference(&self, tag_name: &str, reference: &str) -> Option<String> {
        self(tag_name, reference)
    }
}

/// The attributes of `tag` that hold a reference.
pub(crate) fn reference_attributes(tag: &BeginTag<'_>) -> &'static [&'static str] {
    let name = tag.name();

    if name_is_one_of!(name, ["a", "area", "link"]) {
        &["href"]
    } else if name_is_one_of!(name, ["frame", "iframe", "script", "input", "embed"]) {
        &["src"]
    } else if name_is_one_of!(name, ["img"]) {
        &["src", "longdesc", "usemap"]
    } else if name_is_one_of!(name, ["object"]) {
        &["data", "codebase", "src"]
    } else if name_is_one_of!(name, ["applet"]) {
        &["codebase"]
    } else if name_is_one_of!(name, ["form"]) {
        &["action"]
    } else if name_is_one_of!(name, ["blockquote", "q", "ins", "del"]) {
        &["cite"]
    } else if name_is_one_of!(name, ["body", "table", "tr", "td", "th"]) {
        &["background"]
    } else if name_is_one_of!(name, ["param"]) && is_url_param(tag) {
        &["value"]
    } else {
        &[]
    }
}

/// `<param name="movie|src" value="...">`, the way plugins get their source.
pub(crate) fn is_url_param(tag: &BeginTag<'_>) -> bool {
    tag.attribute_value("name")
        .is_some_and(|name| name_is_one_of!(name.trim(), ["movie", "src"]))
}

/// Copies a document through, rewriting every reference it makes with a
/// [`ReferenceFixer`].
pub struct ReferenceFixingPass<F: ReferenceFixer> {
    fixer: F,
    output: OutputBuffer,
}

impl<F: ReferenceFixer> ReferenceFixingPass<F> {
    pub fn new(fixer: F, capacity: usize) -> Self {
        ReferenceFixingPass {
            fixer,
            output: OutputBuffer::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.output.into_string()
    }

    fn fix_literal(&self, literal: &mut Literal<'_>) {
        let fixed = self.fixer.fix_reference("style", &literal.text());

        if let Some(fixed) = fixed {
            literal.set_text(fixed);
        }
    }
}

impl<F: ReferenceFixer> TokenHandler for ReferenceFixingPass<F> {
    fn begin_tag(&mut self, tag: &mut BeginTag<'_>) {
        if tag.name_eq("base") {
            if let Some(href) = tag.attribute_value("href") {
                self.fixer.rebase(&href);
            }
        } else {
            let fixes: Vec<_> = reference_attributes(tag)
                .iter()
                .filter_map(|&name| {
                    let value = tag.attribute_value(name)?;
                    let fixed = self.fixer.fix_reference(tag.name(), &value)?;

                    (fixed != value).then_some((name, fixed))
                })
                .collect();

            for (name, fixed) in fixes {
                tag.set_attribute_value(name, fixed);
            }
        }

        self.output.write_token(tag);
    }

    fn style_url(&mut self, url: &mut Literal<'_>) {
        self.fix_literal(url);
        self.output.write_token(url);
    }

    fn style_import(&mut self, import: &mut Literal<'_>) {
        self.fix_literal(import);
        self.output.write_token(import);
    }

    fn default_action(&mut self, token: &dyn Serialize) {
        self.output.write_token(token);
    }
}

/// Rewrites every reference of `html` with `fixer`.
pub fn fix_references(html: &str, fixer: impl ReferenceFixer) -> String {
    Dispatcher::new(html, ReferenceFixingPass::new(fixer, html.len()))
        .parse()
        .into_string()
}

/// Makes every relative reference of `html` absolute against `base`.
/// `<base href>` tags of the document move the base as they're met.
pub fn absolutize(html: &str, base: &str) -> Result<String, UrlError> {
    Ok(fix_references(html, AbsoluteUrls::new(base)?))
}

/// Like [`absolutize`], but references found in `substitutions` are replaced
/// by the mapped value instead.
pub fn absolutize_with<K, V>(
    html: &str,
    base: &str,
    substitutions: impl IntoIterator<Item = (K, V)>,
) -> Result<String, UrlError>
where
    K: AsRef<str>,
    V: Into<String>,
{
    let fixer = AbsoluteUrls::new(base)?.with_substitutions(substitutions);

    Ok(fix_references(html, fixer))
}
