//! A lightweight view of a document: its begin tags indexed by name, plus
//! what can be derived from them (title, references, metadata) without
//! building a tree.

mod metadata;
mod regenerator;

pub use self::metadata::{DocumentMetadata, SpecialHeaders};
pub use self::regenerator::Regenerator;

use crate::base::{is_absolute, resolve};
use crate::html::{unescape, UnescapeMode};
use crate::rewriter::reference_fixer::{absolutize, is_url_param};
use crate::token::{BeginTag, EndTag, Literal, Text};
use crate::transform_stream::{Dispatcher, TokenHandler};
use hashbrown::HashMap;
use std::sync::OnceLock;
use url::Url;

/// A reference made by a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlInfo {
    pub url: String,
    /// Name of the tag holding the reference (`style` and `import` for style
    /// sheet references).
    pub tag_name: String,
    /// Text of the anchor, for anchors.
    pub name: Option<String>,
}

impl UrlInfo {
    fn new(url: String, tag_name: &str, name: Option<&str>) -> Self {
        UrlInfo {
            url,
            tag_name: tag_name.to_string(),
            name: name.map(|name| name.replace("\r\n", " ").replace(['\r', '\n'], " ")),
        }
    }

    /// The anchor text if there's any, else the file name of the URL without
    /// its extension, else the URL itself.
    pub fn display_name(&self) -> &str {
        if let Some(name) = self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name;
        }

        let path = self.url.split(['?', '#']).next().unwrap_or_default();
        let file_name = path.rsplit('/').next().unwrap_or_default();
        let stem = file_name.rsplit_once('.').map_or(file_name, |(stem, _)| stem);

        if stem.is_empty() {
            &self.url
        } else {
            stem
        }
    }
}

/// A begin tag of an indexed document.
#[derive(Debug, Clone)]
pub struct IndexedTag {
    tag: BeginTag<'static>,
    anchor_text: Option<String>,
}

impl IndexedTag {
    #[inline]
    pub fn tag(&self) -> &BeginTag<'static> {
        &self.tag
    }

    /// The raw text between an `<a href>` and its end tag.
    #[inline]
    pub fn anchor_text(&self) -> Option<&str> {
        self.anchor_text.as_deref()
    }
}

type ElementTable = &'static [(&'static str, &'static str)];

const RESOURCE_ELEMENTS: ElementTable = &[
    ("img", "src"),
    ("object", "src"),
    ("embed", "src"),
    ("script", "src"),
    ("body", "background"),
    ("input", "src"),
    ("td", "background"),
    ("tr", "background"),
    ("table", "background"),
];

const USER_VISIBLE_ELEMENTS: ElementTable = &[
    ("img", "src"),
    ("object", "src"),
    ("embed", "src"),
    ("body", "background"),
    ("input", "src"),
    ("td", "background"),
    ("tr", "background"),
    ("table", "background"),
];

const ANCHOR_ELEMENTS: ElementTable = &[("a", "href"), ("area", "href")];

const NON_RESOURCE_ELEMENTS: ElementTable = &[
    ("form", "action"),
    ("a", "href"),
    ("link", "href"),
    ("area", "href"),
];

const FRAME_ELEMENTS: ElementTable = &[("iframe", "src"), ("frame", "src")];

#[derive(Default)]
struct Cache {
    resource_urls: OnceLock<Vec<UrlInfo>>,
    user_visible_resource_urls: OnceLock<Vec<UrlInfo>>,
    anchors: OnceLock<Vec<UrlInfo>>,
    non_resource_urls: OnceLock<Vec<UrlInfo>>,
    frame_urls: OnceLock<Vec<UrlInfo>>,
    metadata: OnceLock<DocumentMetadata>,
}

/// An HTML document with its begin tags indexed by (case-insensitive) name.
pub struct IndexedDocument {
    html: String,
    url: String,
    name: Option<String>,
    tags: HashMap<String, Vec<IndexedTag>>,
    title: Option<String>,
    headers: SpecialHeaders,
    style_urls: Vec<UrlInfo>,
    frames: Vec<IndexedDocument>,
    frame_substitutions: Vec<(String, String)>,
    cache: Cache,
}

impl IndexedDocument {
    /// Indexes `html` as it is.
    pub fn index(html: impl Into<String>, url: impl Into<String>) -> Self {
        Self::build(html.into(), url.into(), Vec::new())
    }

    /// Indexes `html` after making its references absolute against `url`.
    /// If `url` can't serve as a base, the document is indexed as it is.
    pub fn from_html(html: &str, url: impl Into<String>) -> Self {
        Self::with_frames(html, url, Vec::new())
    }

    /// Like [`from_html`](Self::from_html), for a frameset whose frame
    /// documents are already known. A `<frame name>` whose sibling document
    /// has a different URL than its `src` is regenerated with the
    /// document's URL.
    pub fn with_frames(html: &str, url: impl Into<String>, frames: Vec<IndexedDocument>) -> Self {
        let url = url.into();

        let html = match absolutize(html, &url) {
            Ok(html) => html,
            Err(_) => {
                trace!(@action "document", "kept relative references, unusable base `{}`", url);
                html.to_string()
            }
        };

        Self::build(html, url, frames)
    }

    fn build(html: String, url: String, frames: Vec<IndexedDocument>) -> Self {
        let headers = SpecialHeaders::scan(&html);

        let indexer = Dispatcher::new(&html, Indexer::new(&frames)).parse();

        let Indexer {
            tags,
            title,
            style_urls,
            frame_substitutions,
            ..
        } = indexer;

        IndexedDocument {
            url,
            name: None,
            tags,
            title,
            headers,
            style_urls,
            frames,
            frame_substitutions,
            cache: Cache::default(),
            html,
        }
    }

    /// Names the document, which is how a frameset refers to it.
    #[inline]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[inline]
    pub fn html(&self) -> &str {
        &self.html
    }

    #[inline]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[inline]
    pub fn frames(&self) -> &[IndexedDocument] {
        &self.frames
    }

    /// The begin tags called `name`, in source order.
    pub fn tags_by_name(&self, name: &str) -> &[IndexedTag] {
        self.tags
            .get(name.to_ascii_uppercase().as_str())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The first text after `<title>`, or the URL of the document.
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.url)
    }

    #[inline]
    pub fn doc_type(&self) -> Option<&str> {
        self.headers.doc_type.as_deref()
    }

    #[inline]
    pub fn saved_from(&self) -> Option<&str> {
        self.headers.saved_from.as_deref()
    }

    pub fn has_frames_or_styles(&self) -> bool {
        ["style", "frame", "iframe", "link"]
            .iter()
            .any(|name| !self.tags_by_name(name).is_empty())
    }

    /// Everything that gets downloaded along with the document: images,
    /// plugins, scripts, backgrounds, style sheets and their references.
    pub fn resource_urls(&self) -> &[UrlInfo] {
        self.cache.resource_urls.get_or_init(|| {
            let mut urls = self.url_infos(RESOURCE_ELEMENTS);

            urls.extend(self.style_urls.iter().cloned());

            for param in self.tags_by_name("param") {
                if is_url_param(param.tag()) {
                    if let Some(value) = param.tag().attribute_value("value") {
                        urls.push(UrlInfo::new(self.resolve(&value), "param", None));
                    }
                }
            }

            for link in self.tags_by_name("link") {
                let is_style_sheet = link
                    .tag()
                    .attribute_value("rel")
                    .is_some_and(|rel| rel.trim().eq_ignore_ascii_case("stylesheet"));

                if is_style_sheet {
                    if let Some(href) = link.tag().attribute_value("href") {
                        urls.push(UrlInfo::new(self.resolve(&href), "link", None));
                    }
                }
            }

            urls
        })
    }

    /// Resources the reader actually sees, which leaves out scripts and
    /// plugin parameters.
    pub fn user_visible_resource_urls(&self) -> &[UrlInfo] {
        self.cache
            .user_visible_resource_urls
            .get_or_init(|| self.url_infos(USER_VISIBLE_ELEMENTS))
    }

    /// Links, named by their anchor text.
    pub fn anchors(&self) -> &[UrlInfo] {
        self.cache
            .anchors
            .get_or_init(|| self.url_infos(ANCHOR_ELEMENTS))
    }

    /// References that aren't downloaded with the document.
    pub fn non_resource_urls(&self) -> &[UrlInfo] {
        self.cache
            .non_resource_urls
            .get_or_init(|| self.url_infos(NON_RESOURCE_ELEMENTS))
    }

    pub fn frame_urls(&self) -> &[UrlInfo] {
        self.cache
            .frame_urls
            .get_or_init(|| self.url_infos(FRAME_ELEMENTS))
    }

    /// `url(...)` and `@import` references of the document's style sheets.
    #[inline]
    pub fn style_resource_urls(&self) -> &[UrlInfo] {
        &self.style_urls
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        self.cache
            .metadata
            .get_or_init(|| DocumentMetadata::from_document(self))
    }

    /// Regenerates the document with its own metadata. See [`Regenerator`].
    pub fn generate_html(&self) -> String {
        self.generate_html_with(self.metadata(), std::iter::empty::<(&str, &str)>())
    }

    /// Regenerates the document with `metadata`, replacing references found
    /// in `replacements` with the mapped value.
    pub fn generate_html_with<K, V>(
        &self,
        metadata: &DocumentMetadata,
        replacements: impl IntoIterator<Item = (K, V)>,
    ) -> String
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let frame_substitutions = self
            .frame_substitutions
            .iter()
            .map(|(old, new)| (old.to_string(), new.to_string()));

        let replacements = replacements
            .into_iter()
            .map(|(old, new)| (old.as_ref().to_string(), new.into()));

        // NOTE: explicit replacements win over frame substitutions.
        Regenerator::new(&self.url, frame_substitutions.chain(replacements))
            .with_metadata(metadata)
            .regenerate(&self.html)
    }

    fn resolve(&self, reference: &str) -> String {
        if is_absolute(reference) {
            return reference.to_string();
        }

        Url::parse(&self.url)
            .ok()
            .and_then(|base| resolve(&base, reference))
            .unwrap_or_else(|| reference.to_string())
    }

    fn url_infos(&self, elements: ElementTable) -> Vec<UrlInfo> {
        let mut urls = Vec::new();

        for &(tag_name, attribute) in elements {
            for indexed in self.tags_by_name(tag_name) {
                if let Some(value) = indexed.tag().attribute_value(attribute) {
                    urls.push(UrlInfo::new(
                        self.resolve(&value),
                        indexed.tag().name(),
                        indexed.anchor_text(),
                    ));
                }
            }
        }

        urls
    }
}

struct Indexer<'f> {
    frames: &'f [IndexedDocument],
    tags: HashMap<String, Vec<IndexedTag>>,
    title: Option<String>,
    in_title: bool,
    anchor: Option<usize>,
    nested_anchors: usize,
    style_urls: Vec<UrlInfo>,
    frame_substitutions: Vec<(String, String)>,
}

impl<'f> Indexer<'f> {
    fn new(frames: &'f [IndexedDocument]) -> Self {
        Indexer {
            frames,
            tags: HashMap::default(),
            title: None,
            in_title: false,
            anchor: None,
            nested_anchors: 0,
            style_urls: Vec::new(),
            frame_substitutions: Vec::new(),
        }
    }

    fn substitute_frame(&mut self, tag: &BeginTag<'_>) {
        let Some(name) = tag.attribute_value("name") else {
            return;
        };

        let Some(frame) = self.frames.iter().find(|f| f.name() == Some(&*name)) else {
            return;
        };

        if let Some(src) = tag.attribute_value("src") {
            if src != frame.url() {
                trace!(@action "document", "frame `{}` substitutes {} with {}", name, src, frame.url());

                self.frame_substitutions
                    .push((src.into_owned(), frame.url().to_string()));
            }
        }
    }

    fn anchor_mut(&mut self) -> Option<&mut IndexedTag> {
        let index = self.anchor?;

        self.tags.get_mut("A").and_then(|anchors| anchors.get_mut(index))
    }
}

impl TokenHandler for Indexer<'_> {
    fn begin_tag(&mut self, tag: &mut BeginTag<'_>) {
        if tag.name_eq("frame") && !self.frames.is_empty() {
            self.substitute_frame(tag);
        }

        let entries = self.tags.entry(tag.name().to_ascii_uppercase()).or_default();

        entries.push(IndexedTag {
            tag: tag.to_owned(),
            anchor_text: None,
        });

        let index = entries.len() - 1;

        if tag.name_eq("title") && !tag.is_complete() {
            self.in_title = true;
        } else if tag.name_eq("a") && !tag.is_complete() && tag.attribute("href").is_some() {
            if self.anchor.is_some() {
                self.nested_anchors += 1;
            } else {
                self.anchor = Some(index);
            }
        }
    }

    fn end_tag(&mut self, tag: &mut EndTag<'_>) {
        if self.anchor.is_some() && tag.name_eq("a") {
            if self.nested_anchors == 0 {
                self.anchor = None;
            } else {
                self.nested_anchors -= 1;
            }
        }
    }

    fn text(&mut self, text: &mut Text<'_>) {
        if self.in_title {
            self.title = Some(unescape(text.raw(), UnescapeMode::Text).into_owned());
            self.in_title = false;
        }

        if let Some(anchor) = self.anchor_mut() {
            anchor
                .anchor_text
                .get_or_insert_with(String::new)
                .push_str(text.raw());
        }
    }

    fn style_url(&mut self, url: &mut Literal<'_>) {
        self.style_urls
            .push(UrlInfo::new(url.text().into_owned(), "style", None));
    }

    fn style_import(&mut self, import: &mut Literal<'_>) {
        self.style_urls
            .push(UrlInfo::new(import.text().into_owned(), "import", None));
    }
}
