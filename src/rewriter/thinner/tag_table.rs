use super::ThinFlags;
use hashbrown::HashMap;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagCategory {
    Block,
    Inline,
    Empty,
}

/// How the thinner treats a tag it keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagDesc {
    /// The name the tag is written with, if it's not its own.
    pub substitute: Option<&'static str>,
    pub category: TagCategory,
    pub allowed_attributes: &'static [&'static str],
}

impl TagDesc {
    const fn new(category: TagCategory, allowed_attributes: &'static [&'static str]) -> Self {
        TagDesc {
            substitute: None,
            category,
            allowed_attributes,
        }
    }

    const fn replaced_by(substitute: &'static str, category: TagCategory) -> Self {
        TagDesc {
            substitute: Some(substitute),
            category,
            allowed_attributes: &[],
        }
    }

    #[inline]
    pub fn allows_attribute(&self, name: &str) -> bool {
        self.allowed_attributes
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(name))
    }
}

use self::TagCategory::*;

const BLOCK: TagDesc = TagDesc::new(Block, &[]);
const INLINE: TagDesc = TagDesc::new(Inline, &[]);
const LIST: TagDesc = TagDesc::new(Block, &["compact"]);
const P: TagDesc = TagDesc::replaced_by("p", Block);
const BR: TagDesc = TagDesc::replaced_by("br", Empty);

const A: TagDesc = TagDesc::new(Inline, &["href", "name"]);

static LENIENT: LazyLock<HashMap<&'static str, TagDesc>> = LazyLock::new(|| {
    [
        ("p", BLOCK),
        ("pre", BLOCK),
        ("ol", TagDesc::new(Block, &["compact", "start"])),
        ("ul", LIST),
        ("dir", LIST),
        ("menu", LIST),
        ("dl", LIST),
        ("li", BLOCK),
        ("dt", INLINE),
        ("dd", BLOCK),
        ("tt", INLINE),
        ("i", INLINE),
        ("b", INLINE),
        ("u", INLINE),
        ("s", INLINE),
        ("strike", INLINE),
        ("big", INLINE),
        ("small", INLINE),
        ("em", INLINE),
        ("strong", INLINE),
        ("dfn", INLINE),
        ("code", INLINE),
        ("samp", INLINE),
        ("kbd", INLINE),
        ("var", INLINE),
        ("cite", INLINE),
        ("abbr", INLINE),
        ("acronym", INLINE),
        ("sub", INLINE),
        ("sup", INLINE),
        ("div", P),
        ("center", P),
        ("h1", TagDesc::replaced_by("h3", Block)),
        ("h2", TagDesc::replaced_by("h4", Block)),
        ("h3", TagDesc::replaced_by("h5", Block)),
        ("h4", TagDesc::replaced_by("h6", Block)),
        ("h5", TagDesc::replaced_by("h6", Block)),
        ("h6", TagDesc::replaced_by("h6", Block)),
        ("a", A),
        ("br", TagDesc::new(Empty, &["clear"])),
        (
            "img",
            TagDesc::new(
                Empty,
                &[
                    "src", "alt", "longdesc", "title", "border", "align", "height", "width",
                    "hspace", "vspace",
                ],
            ),
        ),
        ("hr", TagDesc::new(Empty, &["align", "noshade", "size", "width"])),
        ("blockquote", TagDesc::new(Block, &["cite"])),
        ("q", TagDesc::new(Inline, &["cite"])),
        ("ins", TagDesc::new(Inline, &["cite", "datetime"])),
        ("del", TagDesc::new(Inline, &["cite", "datetime"])),
        ("tr", TagDesc::replaced_by("p", Empty)),
        ("th", BR),
        ("td", BR),
    ]
    .into_iter()
    .collect()
});

static STRICT: LazyLock<HashMap<&'static str, TagDesc>> = LazyLock::new(|| {
    [
        ("a", A),
        (
            "img",
            TagDesc::new(Empty, &["src", "alt", "longdesc", "title", "height", "width"]),
        ),
        ("p", BLOCK),
        ("pre", BLOCK),
        ("ol", P),
        ("ul", P),
        ("dir", P),
        ("menu", P),
        ("dl", BR),
        ("li", BR),
        ("dt", BR),
        ("div", P),
        ("center", P),
        ("h1", P),
        ("h2", P),
        ("h3", P),
        ("h4", P),
        ("h5", P),
        ("h6", P),
        ("br", BR),
        ("blockquote", P),
        ("tr", P),
        ("th", BR),
        ("td", BR),
    ]
    .into_iter()
    .collect()
});

static PRESERVED_TABLES: LazyLock<HashMap<&'static str, TagDesc>> = LazyLock::new(|| {
    [
        (
            "table",
            TagDesc::new(Block, &["border", "cellpadding", "cellspacing"]),
        ),
        ("tr", BLOCK),
        ("td", TagDesc::new(Block, &["width", "valign"])),
        ("th", BLOCK),
    ]
    .into_iter()
    .collect()
});

/// Looks up a lower-cased tag name. `None` means the tag is dropped.
pub fn lookup(name: &str, flags: ThinFlags) -> Option<&'static TagDesc> {
    if flags.contains(ThinFlags::PRESERVE_TABLES) {
        if let Some(desc) = PRESERVED_TABLES.get(name) {
            return Some(desc);
        }
    }

    if flags.contains(ThinFlags::STRICT) {
        STRICT.get(name)
    } else {
        LENIENT.get(name)
    }
}
