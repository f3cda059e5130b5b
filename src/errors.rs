use thiserror::Error;

/// An error that occurs when bytes can't be decoded with the requested encoding.
#[derive(Error, Debug, Eq, PartialEq, Clone)]
pub enum EncodingError {
    /// The provided value doesn't match any of the [labels specified in the standard].
    ///
    /// [labels specified in the standard]: https://encoding.spec.whatwg.org/#names-and-labels
    #[error("Unknown character encoding has been provided: `{0}`.")]
    UnknownEncoding(String),
}

/// An error that occurs when a base URL for reference rewriting is unusable.
#[derive(Error, Debug, Eq, PartialEq, Clone)]
pub enum UrlError {
    /// The base URL could not be parsed as an absolute URL.
    #[error("Invalid base URL `{url}`: {source}")]
    InvalidBase {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// An end tag that closes nothing the sanitizer has let through.
///
/// Never escapes the pass: the sanitizer either drops the end tag or passes
/// it through, depending on its flags.
#[derive(Error, Debug, Eq, PartialEq, Clone)]
#[error("Cannot close unopened tag `{0}`.")]
pub struct UnmatchedEndTag(pub String);
