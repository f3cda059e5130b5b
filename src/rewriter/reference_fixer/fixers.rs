use super::ReferenceFixer;
use crate::base::{is_absolute, is_file_url, split_fragment};
use crate::errors::UrlError;
use hashbrown::HashMap;
use url::Url;

/// Resolves relative references against a base URL.
///
/// Absolute references, pure fragments (`#top`) and empty references are
/// left alone. The fragment of a resolved reference is kept as written.
#[derive(Debug, Clone)]
pub struct AbsoluteUrls {
    base: Url,
}

impl AbsoluteUrls {
    pub fn new(base: &str) -> Result<Self, UrlError> {
        Url::parse(base.trim())
            .map(|base| AbsoluteUrls { base })
            .map_err(|source| UrlError::InvalidBase {
                url: base.to_string(),
                source,
            })
    }

    #[inline]
    pub fn base(&self) -> &Url {
        &self.base
    }
}

impl ReferenceFixer for AbsoluteUrls {
    fn fix_reference(&self, _tag_name: &str, reference: &str) -> Option<String> {
        let (resource, fragment) = split_fragment(reference);
        let resource = resource.trim();

        if resource.is_empty() || is_absolute(resource) {
            return None;
        }

        let mut fixed = String::from(self.base.join(resource).ok()?);

        if let Some(fragment) = fragment {
            fixed.push('#');
            fixed.push_str(fragment);
        }

        Some(fixed)
    }

    fn rebase(&mut self, href: &str) {
        match self.base.join(href.trim()) {
            Ok(base) => {
                trace!(@action "absolutize", "rebased to {}", base);
                self.base = base;
            }
            Err(_) => {
                trace!(@action "absolutize", "ignored unusable base `{}`", href);
            }
        }
    }
}

/// Replaces known references with new ones before falling back to the
/// wrapped fixer. See [`ReferenceFixerExt::with_substitutions`].
#[derive(Debug, Clone)]
pub struct WithSubstitutions<F> {
    inner: F,
    table: HashMap<String, String>,
}

impl<F: ReferenceFixer> WithSubstitutions<F> {
    fn lookup(&self, reference: &str) -> Option<String> {
        let (resource, fragment) = split_fragment(reference);
        let mut fixed = self.table.get(resource.trim())?.clone();

        if let Some(fragment) = fragment {
            if split_fragment(&fixed).1.is_none() {
                fixed.push('#');
                fixed.push_str(fragment);
            }
        }

        Some(fixed)
    }
}

impl<F: ReferenceFixer> ReferenceFixer for WithSubstitutions<F> {
    fn fix_reference(&self, tag_name: &str, reference: &str) -> Option<String> {
        if let Some(fixed) = self.lookup(reference) {
            return Some(fixed);
        }

        let fixed = self.inner.fix_reference(tag_name, reference)?;

        // NOTE: substitutions may be keyed by the already resolved reference.
        Some(self.lookup(&fixed).unwrap_or(fixed))
    }

    #[inline]
    fn rebase(&mut self, href: &str) {
        self.inner.rebase(href);
    }
}

/// Restricts the wrapped fixer to references that point to local files.
/// See [`ReferenceFixerExt::local_files_only`].
#[derive(Debug, Clone)]
pub struct LocalFilesOnly<F> {
    inner: F,
}

impl<F: ReferenceFixer> ReferenceFixer for LocalFilesOnly<F> {
    fn fix_reference(&self, tag_name: &str, reference: &str) -> Option<String> {
        let fixed = self.inner.fix_reference(tag_name, reference)?;

        (is_file_url(reference) || is_file_url(&fixed)).then_some(fixed)
    }

    #[inline]
    fn rebase(&mut self, href: &str) {
        self.inner.rebase(href);
    }
}

pub trait ReferenceFixerExt: ReferenceFixer + Sized {
    /// Maps references equal to a key of `substitutions` (fragments aside) to
    /// its value. The fragment of the replaced reference is carried over.
    fn with_substitutions<K, V>(
        self,
        substitutions: impl IntoIterator<Item = (K, V)>,
    ) -> WithSubstitutions<Self>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let table = substitutions
            .into_iter()
            .map(|(old, new)| (split_fragment(old.as_ref()).0.trim().to_string(), new.into()))
            .collect();

        WithSubstitutions { inner: self, table }
    }

    /// Only lets through fixes of `file:` references, or of references that
    /// the wrapped fixer turns into `file:` URLs.
    #[inline]
    fn local_files_only(self) -> LocalFilesOnly<Self> {
        LocalFilesOnly { inner: self }
    }
}

impl<F: ReferenceFixer> ReferenceFixerExt for F {}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix(fixer: &impl ReferenceFixer, reference: &str) -> Option<String> {
        fixer.fix_reference("a", reference)
    }

    #[test]
    fn invalid_base() {
        assert!(matches!(
            AbsoluteUrls::new("not a url"),
            Err(UrlError::InvalidBase { .. })
        ));
    }

    #[test]
    fn relative_references_are_resolved() {
        let fixer = AbsoluteUrls::new("http://x.com/dir/page.html").unwrap();

        assert_eq!(fix(&fixer, "a.png").unwrap(), "http://x.com/dir/a.png");
        assert_eq!(fix(&fixer, " ../up.html ").unwrap(), "http://x.com/up.html");
        assert_eq!(fix(&fixer, "rel#frag").unwrap(), "http://x.com/dir/rel#frag");
        assert_eq!(fix(&fixer, "#top"), None);
        assert_eq!(fix(&fixer, ""), None);
        assert_eq!(fix(&fixer, "https://y.com/"), None);
        assert_eq!(fix(&fixer, "mailto:a@b.c"), None);
    }

    #[test]
    fn rebase_is_relative_to_the_current_base() {
        let mut fixer = AbsoluteUrls::new("http://x.com/dir/").unwrap();

        fixer.rebase("sub/");

        assert_eq!(fix(&fixer, "a.png").unwrap(), "http://x.com/dir/sub/a.png");

        fixer.rebase("http://cdn.com/");

        assert_eq!(fix(&fixer, "a.png").unwrap(), "http://cdn.com/a.png");
    }

    #[test]
    fn substitutions_keep_the_fragment() {
        let fixer = AbsoluteUrls::new("http://x.com/")
            .unwrap()
            .with_substitutions([("old.html#ignored", "http://y.com/new.html")]);

        assert_eq!(fix(&fixer, "old.html#sec").unwrap(), "http://y.com/new.html#sec");
        assert_eq!(fix(&fixer, "old.html").unwrap(), "http://y.com/new.html");
        assert_eq!(fix(&fixer, "other.html").unwrap(), "http://x.com/other.html");
    }

    #[test]
    fn substitutions_match_resolved_references() {
        let fixer = AbsoluteUrls::new("http://x.com/")
            .unwrap()
            .with_substitutions([("http://x.com/frame.html", "http://z.com/real.html")]);

        assert_eq!(fix(&fixer, "frame.html").unwrap(), "http://z.com/real.html");
    }

    #[test]
    fn closures_are_fixers() {
        let upper = |_: &str, reference: &str| Some(reference.to_uppercase());

        assert_eq!(fix(&upper, "a.png").unwrap(), "A.PNG");
    }

    #[test]
    fn local_files_only() {
        let web = AbsoluteUrls::new("http://x.com/").unwrap().local_files_only();
        let local = AbsoluteUrls::new("file:///C:/pages/").unwrap().local_files_only();

        assert_eq!(fix(&web, "a.png"), None);
        assert_eq!(fix(&local, "a.png").unwrap(), "file:///C:/pages/a.png");

        let rewrite_all = (|_: &str, _: &str| Some("http://cdn.com/x".to_string())).local_files_only();

        assert_eq!(fix(&rewrite_all, "file:///tmp/a.png").unwrap(), "http://cdn.com/x");
        assert_eq!(fix(&rewrite_all, "http://x.com/a.png"), None);
    }
}
