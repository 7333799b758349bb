//! Parser Trait
//!
//! This module defines the [`Parser`] trait, a generic interface for turning an input into a
//! strongly-typed output. Tokenizers implement it for `&str -> Vec<String>`.
//!
//! # Example
//!
//! ```rust
//! use marker::error::MarkerError;
//! use marker::traits::parser::Parser;
//!
//! struct Whitespace;
//!
//! impl<'a> Parser<&'a str, Vec<String>> for Whitespace {
//!     fn parse(&self, input: &'a str) -> Result<Vec<String>, MarkerError> {
//!         Ok(input.split_whitespace().map(str::to_string).collect())
//!     }
//! }
//!
//! assert_eq!(Whitespace.parse("a b").unwrap(), vec!["a", "b"]);
//! ```

use crate::error::MarkerError;

/// A generic trait for parsing data into a strongly-typed Rust structure.
///
/// # Type Parameters
///
/// * `Input` - The input type to be parsed.
/// * `Output` - The output type produced by the parser.
pub trait Parser<Input, Output> {
    /// Parse an input value into the target type.
    ///
    /// # Errors
    ///
    /// Returns a [`MarkerError`] if the input cannot be parsed.
    fn parse(&self, input: Input) -> Result<Output, MarkerError>;
}
