//! Error types for the value codec.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// The 3-bit tag field held a value outside the four known tags.
    #[error("unrecognized value tag: {0}")]
    UnrecognizedTag(u8),
    /// Text could not be parsed as a 64-bit word.
    #[error("invalid value word '{0}'")]
    InvalidWord(String),
}
