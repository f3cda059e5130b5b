//! **html_tamer** prepares HTML captured from the wild for reuse.
//!
//! Every transformation is a single streaming pass over the tokens of a
//! document, driven by a [`Dispatcher`](transform_stream::Dispatcher):
//!
//! * [`balance`] truncates markup to a cost budget and keeps it well-formed;
//! * [`sterilize`] removes scripts, styles, broken tags and other dangerous
//!   or unwanted constructs;
//! * [`thin`] and [`thin_for_capture`] reduce markup to a small vocabulary;
//! * [`absolutize`] makes relative references absolute.
//!
//! [`IndexedDocument`] indexes a document's tags to query its title,
//! references and metadata, and regenerates it as a standalone page.
//!
//! ```
//! use html_tamer::{balance, sterilize, SanitizeFlags};
//!
//! let html = sterilize("<p onclick=\"steal()\">Hello <b>world", SanitizeFlags::all());
//!
//! assert_eq!(html, "<p>Hello <b>world</b>");
//! assert_eq!(balance(&html, 18), "<p>Hello <b>wo</b>");
//! ```

#![forbid(unsafe_code)]
#![allow(clippy::needless_lifetimes)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

#[macro_use]
mod debug_trace;

#[macro_use]
pub mod html;

pub mod base;
pub mod document;
pub mod encoding;
pub mod parser;
pub mod rewriter;
pub mod token;
pub mod transform_stream;

mod errors;

pub use self::document::{DocumentMetadata, IndexedDocument, UrlInfo};
pub use self::encoding::{decode_html, DecodedHtml};
pub use self::errors::*;
pub use self::rewriter::{
    absolutize, absolutize_with, balance, fix_references, sterilize, thin, thin_for_capture,
    BalanceSettings, Balancer, CaptureFlags, CharCount, CostFilter, ReferenceFixer,
    SanitizeFlags, TextOnly, ThinFlags, ThinSettings, UrlEncodedLength,
};
