use super::Serialize;
use crate::html::{escape, unescape, UnescapeMode};
use std::borrow::Cow;
use std::fmt::{self, Debug};

#[derive(Clone, PartialEq, Eq)]
pub struct Attribute<'i> {
    name: Cow<'i, str>,
    raw_value: Option<Cow<'i, str>>,
    quote: Option<char>,
    value_override: Option<String>,
}

impl<'i> Attribute<'i> {
    #[inline]
    pub(crate) fn new(name: &'i str, raw_value: Option<&'i str>, quote: Option<char>) -> Self {
        Attribute {
            name: Cow::Borrowed(name),
            raw_value: raw_value.map(Cow::Borrowed),
            quote,
            value_override: None,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn name_eq(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// The decoded value, or `None` for a bare attribute such as `compact`.
    pub fn value(&self) -> Option<Cow<'_, str>> {
        if let Some(value) = &self.value_override {
            return Some(Cow::Borrowed(value));
        }

        self.raw_value
            .as_deref()
            .map(|raw| unescape(raw, UnescapeMode::Attribute))
    }

    /// The value as it appears in the source, entities still escaped.
    #[inline]
    pub fn raw_value(&self) -> Option<&str> {
        self.raw_value.as_deref()
    }

    #[inline]
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value_override = Some(value.into());
    }

    #[inline]
    pub fn is_modified(&self) -> bool {
        self.value_override.is_some()
    }

    pub fn to_owned(&self) -> Attribute<'static> {
        Attribute {
            name: Cow::Owned(self.name.to_string()),
            raw_value: self.raw_value.as_ref().map(|v| Cow::Owned(v.to_string())),
            quote: self.quote,
            value_override: self.value_override.clone(),
        }
    }
}

impl Serialize for Attribute<'_> {
    fn serialize(&self, output: &mut String) {
        output.push_str(&self.name);

        if let Some(value) = &self.value_override {
            output.push_str("=\"");
            output.push_str(&escape(value));
            output.push('"');
        } else if let Some(raw) = &self.raw_value {
            output.push('=');

            match self.quote {
                Some(q) => {
                    output.push(q);
                    output.push_str(raw);
                    output.push(q);
                }
                None => output.push_str(raw),
            }
        }
    }
}

impl Debug for Attribute<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name())
            .field("value", &self.value())
            .finish()
    }
}
