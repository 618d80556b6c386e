//! # Error Types
//!
//! Errors raised while encoding identifiers or deriving locations.

use thiserror::Error;

/// Errors from the codec and the deriver.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DerivationError {
    /// Input does not fit the fixed-width field. Never truncated.
    #[error("encoding error: {len} bytes exceed fixed width {width}")]
    Encoding { len: usize, width: usize },

    /// Address or mint is empty; it would encode to the absent sentinel.
    #[error("encoding error: empty identifier")]
    EmptyIdentifier,

    /// No bump in `0..=255` produced an addressable location.
    #[error("no addressable location for tag {tag:?} in bump range 0..=255")]
    NoValidBump { tag: String },

    /// Hex text could not be parsed.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Fixed-width text field is not valid UTF-8.
    #[error("invalid utf-8 in fixed-width field")]
    InvalidUtf8,
}
