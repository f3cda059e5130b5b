use super::{Attribute, Serialize};
use std::borrow::Cow;
use std::fmt::{self, Debug};

#[derive(Clone, PartialEq, Eq)]
pub struct BeginTag<'i> {
    raw: Cow<'i, str>,
    name: Cow<'i, str>,
    attributes: Vec<Attribute<'i>>,
    residue: Option<Cow<'i, str>>,
    complete: bool,
    modified: bool,
}

impl<'i> BeginTag<'i> {
    pub(crate) fn new(
        raw: &'i str,
        name: &'i str,
        attributes: Vec<Attribute<'i>>,
        residue: Option<&'i str>,
        complete: bool,
    ) -> Self {
        BeginTag {
            raw: Cow::Borrowed(raw),
            name: Cow::Borrowed(name),
            attributes,
            residue: residue.map(Cow::Borrowed),
            complete,
            modified: false,
        }
    }

    /// The tag name as written in the source.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn name_eq(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    #[inline]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// `true` for self-closing tags (`<br/>`).
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// `true` if the source text of the tag doesn't end with `>`.
    #[inline]
    pub fn is_unterminated(&self) -> bool {
        !self.raw.ends_with('>')
    }

    #[inline]
    pub fn attributes(&self) -> &[Attribute<'i>] {
        &self.attributes
    }

    #[inline]
    pub fn attributes_mut(&mut self) -> &mut [Attribute<'i>] {
        self.modified = true;

        &mut self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute<'i>> {
        self.attributes.iter().find(|a| a.name_eq(name))
    }

    /// The decoded value of the first attribute called `name`.
    pub fn attribute_value(&self, name: &str) -> Option<Cow<'_, str>> {
        self.attribute(name).and_then(Attribute::value)
    }

    /// Sets the value of the first attribute called `name`. Returns `false`
    /// if the tag has no such attribute.
    pub fn set_attribute_value(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.attributes.iter_mut().find(|a| a.name_eq(name)) {
            Some(attr) => {
                attr.set_value(value);
                self.modified = true;
                true
            }
            None => false,
        }
    }

    pub fn remove_attribute(&mut self, name: &str) -> bool {
        let len = self.attributes.len();

        self.retain_attributes(|a| !a.name_eq(name));

        len != self.attributes.len()
    }

    pub fn retain_attributes(&mut self, mut keep: impl FnMut(&Attribute<'i>) -> bool) {
        let len = self.attributes.len();

        self.attributes.retain(|a| keep(a));

        if len != self.attributes.len() {
            self.modified = true;
        }
    }

    #[inline]
    pub fn is_modified(&self) -> bool {
        self.modified || self.attributes.iter().any(Attribute::is_modified)
    }

    pub fn to_owned(&self) -> BeginTag<'static> {
        BeginTag {
            raw: Cow::Owned(self.raw.to_string()),
            name: Cow::Owned(self.name.to_string()),
            attributes: self.attributes.iter().map(Attribute::to_owned).collect(),
            residue: self.residue.as_ref().map(|r| Cow::Owned(r.to_string())),
            complete: self.complete,
            modified: self.modified,
        }
    }

    fn serialize_from_parts(&self, output: &mut String) {
        output.push('<');
        output.push_str(&self.name);

        for attr in &self.attributes {
            output.push(' ');
            attr.serialize(output);
        }

        if let Some(residue) = &self.residue {
            output.push(' ');
            output.push_str(residue);
        }

        if self.complete {
            output.push_str(" /");
        }

        if !self.is_unterminated() {
            output.push('>');
        }
    }
}

impl Serialize for BeginTag<'_> {
    #[inline]
    fn serialize(&self, output: &mut String) {
        if self.is_modified() {
            self.serialize_from_parts(output);
        } else {
            output.push_str(&self.raw);
        }
    }
}

impl Debug for BeginTag<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeginTag")
            .field("name", &self.name())
            .field("attributes", &self.attributes())
            .field("complete", &self.complete)
            .field("unterminated", &self.is_unterminated())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndTag<'i> {
    raw: Cow<'i, str>,
    name: Cow<'i, str>,
    implicit: bool,
}

impl<'i> EndTag<'i> {
    #[inline]
    pub(crate) fn new(raw: &'i str, name: &'i str) -> Self {
        EndTag {
            raw: Cow::Borrowed(raw),
            name: Cow::Borrowed(name),
            implicit: false,
        }
    }

    /// An end tag inferred by the tokenizer rather than present in the source.
    #[inline]
    pub(crate) fn new_implicit(name: &'i str) -> Self {
        EndTag {
            raw: Cow::Borrowed(""),
            name: Cow::Borrowed(name),
            implicit: true,
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

    #[inline]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[inline]
    pub fn is_implicit(&self) -> bool {
        self.implicit
    }

    pub fn to_owned(&self) -> EndTag<'static> {
        EndTag {
            raw: Cow::Owned(self.raw.to_string()),
            name: Cow::Owned(self.name.to_string()),
            implicit: self.implicit,
        }
    }
}

impl Serialize for EndTag<'_> {
    #[inline]
    fn serialize(&self, output: &mut String) {
        if !self.implicit {
            output.push_str(&self.raw);
        }
    }
}
