use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use url::Url;

/// Splits `reference` at its last `#`, returning the part before it and the
/// fragment (without `#`), if any.
#[inline]
pub fn split_fragment(reference: &str) -> (&str, Option<&str>) {
    match reference.rfind('#') {
        Some(pos) => (&reference[..pos], Some(&reference[pos + 1..])),
        None => (reference, None),
    }
}

/// Parses `reference` as an absolute URL. Windows drive paths (`C:\dir`) are
/// not URLs even though they look like they have a scheme.
pub fn parse_absolute(reference: &str) -> Option<Url> {
    match Url::parse(reference.trim()) {
        Ok(url) if url.scheme().len() > 1 => Some(url),
        _ => None,
    }
}

#[inline]
pub fn is_absolute(reference: &str) -> bool {
    parse_absolute(reference).is_some()
}

#[inline]
pub fn is_file_url(reference: &str) -> bool {
    parse_absolute(reference).is_some_and(|url| url.scheme() == "file")
}

/// Resolves `reference` against `base`, leaving absolute references as they are.
pub fn resolve(base: &Url, reference: &str) -> Option<String> {
    let reference = reference.trim();

    if is_absolute(reference) {
        return Some(reference.to_string());
    }

    base.join(reference).ok().map(String::from)
}

/// Compares two references ignoring their fragments.
#[inline]
pub fn same_resource(a: &str, b: &str) -> bool {
    split_fragment(a).0 == split_fragment(b).0
}

/// Percent-decodes `value`, replacing invalid UTF-8 sequences.
#[inline]
pub fn url_decode(value: &str) -> Cow<'_, str> {
    percent_decode_str(value).decode_utf8_lossy()
}

/// The `<!-- saved from url=(NNNN)... -->` marker browsers put at the top of
/// pages saved from the network.
pub fn saved_from_marker(url: &str) -> String {
    format!("<!-- saved from url=({:04}){} -->", url.chars().count(), url)
}
