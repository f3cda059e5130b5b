//! The rewriting passes. Each is a [`TokenHandler`](crate::transform_stream::TokenHandler)
//! run over a single document by a [`Dispatcher`](crate::transform_stream::Dispatcher).

pub mod balancer;
pub mod reference_fixer;
pub mod sanitizer;
pub mod thinner;

pub use self::balancer::{
    balance, BalanceSettings, Balancer, CharCount, CostFilter, TextOnly, UrlEncodedLength,
};
pub use self::reference_fixer::{absolutize, absolutize_with, fix_references, ReferenceFixer};
pub use self::sanitizer::{sterilize, SanitizeFlags};
pub use self::thinner::{thin, thin_for_capture, CaptureFlags, ThinFlags, ThinSettings};
