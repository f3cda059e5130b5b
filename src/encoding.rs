//! Decoding of HTML bytes, with a second chance for documents that declare
//! a charset in their `<meta>` tags.

use crate::document::IndexedDocument;
use crate::errors::EncodingError;
use encoding_rs::Encoding;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedHtml {
    pub html: String,
    /// The encoding the text was finally decoded with.
    pub encoding: &'static Encoding,
}

/// Decodes `bytes` with the encoding called `label`, then decodes them once
/// more if the document declares a different charset. A byte order mark
/// takes precedence over both.
pub fn decode_html(bytes: &[u8], label: &str) -> Result<DecodedHtml, EncodingError> {
    let encoding = Encoding::for_label_no_replacement(label.trim().as_bytes())
        .ok_or_else(|| EncodingError::UnknownEncoding(label.to_string()))?;

    let decoded = decode(bytes, encoding);

    if Encoding::for_bom(bytes).is_some() {
        return Ok(decoded);
    }

    let Some(charset) = declared_charset(&decoded.html) else {
        return Ok(decoded);
    };

    match Encoding::for_label_no_replacement(charset.as_bytes()) {
        Some(declared) if declared != decoded.encoding => {
            log::debug!(
                "document declares `{}`, decoding again instead of `{}`",
                declared.name(),
                decoded.encoding.name()
            );

            Ok(decode(bytes, declared))
        }
        Some(_) => Ok(decoded),
        None => {
            log::warn!("ignoring unknown charset `{charset}` declared by document");

            Ok(decoded)
        }
    }
}

fn decode(bytes: &[u8], encoding: &'static Encoding) -> DecodedHtml {
    let (html, encoding, had_errors) = encoding.decode(bytes);

    if had_errors {
        log::debug!("malformed `{}` sequences were replaced", encoding.name());
    }

    DecodedHtml {
        html: html.into_owned(),
        encoding,
    }
}

fn declared_charset(html: &str) -> Option<String> {
    let document = IndexedDocument::index(html, "");
    let charset = document.metadata().charset.as_deref()?.trim();

    (!charset.is_empty()).then(|| charset.to_string())
}
