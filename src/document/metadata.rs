use super::IndexedDocument;
use hashbrown::HashMap;

/// Headers a browser keeps in front of a saved page: the doctype and the
/// `<!-- saved from url=... -->` marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecialHeaders {
    pub doc_type: Option<String>,
    pub saved_from: Option<String>,
}

const SCAN_LIMIT: usize = 1024;
const MAX_CHUNKS: usize = 3;

impl SpecialHeaders {
    /// Looks at the first `>`-terminated chunks at the top of `html`.
    pub fn scan(html: &str) -> Self {
        let mut headers = SpecialHeaders::default();
        let mut chunk_start = 0;
        let mut chunks = 0;

        for (count, (pos, ch)) in html.char_indices().enumerate() {
            if count > SCAN_LIMIT || chunks == MAX_CHUNKS {
                break;
            }

            if ch != '>' {
                continue;
            }

            let chunk = html[chunk_start..=pos].trim();

            if starts_with_ignore_case(chunk, "<!DOCTYPE") {
                headers.doc_type = Some(chunk.to_string());
            } else if starts_with_ignore_case(chunk, "<!-- SAVED FROM URL=") {
                headers.saved_from = Some(chunk.to_string());
            }

            chunk_start = pos + 1;
            chunks += 1;
        }

        headers
    }
}

#[inline]
fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|start| start.eq_ignore_ascii_case(prefix))
}

/// Collapses runs of whitespace into a single space and trims the ends.
fn compact_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// What a document says about itself in its `<meta>` and `<base>` tags and
/// special headers. Fields are public so that a caller can amend them before
/// regenerating the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentMetadata {
    pub base: Option<String>,
    pub author: Option<String>,
    pub charset: Option<String>,
    pub description: Option<String>,
    pub generator: Option<String>,
    pub copyright: Option<String>,
    pub keywords: Option<String>,
    pub pragma: Option<String>,
    pub robots: Option<String>,
    pub doc_type: Option<String>,
    pub saved_from: Option<String>,
}

impl DocumentMetadata {
    pub fn from_document(document: &IndexedDocument) -> Self {
        let base = document
            .tags_by_name("base")
            .iter()
            .find_map(|base| base.tag().attribute_value("href"))
            .map(|href| href.into_owned());

        let mut meta = MetaTable::from_document(document);

        DocumentMetadata {
            base,
            author: meta.take("AUTHOR"),
            charset: meta.charset().or_else(|| charset_attribute(document)),
            description: meta.take("DESCRIPTION").map(|d| compact_whitespace(&d)),
            generator: meta.take("GENERATOR"),
            copyright: meta.take("COPYRIGHT"),
            keywords: meta.take("KEYWORDS"),
            pragma: meta.take("PRAGMA"),
            robots: meta.take("ROBOTS"),
            doc_type: document.doc_type().map(str::to_string),
            saved_from: document.saved_from().map(str::to_string),
        }
    }

    /// The keywords, split on commas if there are any, else on spaces.
    pub fn keyword_list(&self) -> Vec<String> {
        let Some(keywords) = self.keywords.as_deref().map(compact_whitespace) else {
            return Vec::new();
        };

        let separator = if keywords.contains(',') { ',' } else { ' ' };

        keywords
            .split(separator)
            .map(str::trim)
            .filter(|keyword| !keyword.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// `<meta>` contents keyed by the upper-cased `name` (or `http-equiv`).
/// The first value for a key wins.
struct MetaTable(HashMap<String, String>);

impl MetaTable {
    fn from_document(document: &IndexedDocument) -> Self {
        let mut table = HashMap::new();

        for meta in document.tags_by_name("meta") {
            let tag = meta.tag();

            for key_attribute in ["name", "http-equiv"] {
                let Some(key) = tag.attribute_value(key_attribute) else {
                    continue;
                };

                let key = key.trim().to_ascii_uppercase();

                if let Some(content) = tag.attribute_value("content") {
                    if !table.contains_key(&key) {
                        table.insert(key, content.into_owned());
                        break;
                    }
                }
            }
        }

        MetaTable(table)
    }

    #[inline]
    fn take(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    fn charset(&self) -> Option<String> {
        let content_type = self.0.get("CONTENT-TYPE")?.parse::<mime::Mime>().ok()?;

        content_type
            .get_param(mime::CHARSET)
            .map(|charset| charset.as_str().to_string())
    }
}

fn charset_attribute(document: &IndexedDocument) -> Option<String> {
    document
        .tags_by_name("meta")
        .iter()
        .find_map(|meta| meta.tag().attribute_value("charset"))
        .map(|charset| charset.trim().to_string())
}
