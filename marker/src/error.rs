//! Marker Error Types
//!
//! This module defines the [`MarkerError`] enum, covering everything that can go wrong while
//! turning two source texts into labelled token streams.
//!
//! # Example
//!
//! ```rust
//! use marker::error::MarkerError;
//!
//! fn require_python(language: &str) -> Result<(), MarkerError> {
//!     if language != "Python" {
//!         return Err(MarkerError::UnsupportedLanguage(language.to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Represents all error types that can occur in the marker system.
#[derive(Debug, Error)]
pub enum MarkerError {
    /// No grammar is wired up for the declared language.
    #[error("no grammar available for language '{0}'")]
    UnsupportedLanguage(String),
    /// The grammar could not be loaded into a parser (ABI mismatch).
    #[error("failed to load {language} grammar: {reason}")]
    Grammar { language: String, reason: String },
    /// The parser returned no tree at all.
    #[error("failed to parse {0} source")]
    ParseFailed(String),
    /// A leaf's byte range did not fall on UTF-8 boundaries.
    #[error("token is not valid UTF-8: {0}")]
    InvalidToken(#[from] std::str::Utf8Error),
}
