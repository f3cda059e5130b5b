#[macro_use]
mod names;
mod entities;

pub use self::entities::{escape, unescape, UnescapeMode};
pub use self::names::*;
