//! # Parsers
//!
//! - [`token_parser`]: grammar-backed source tokenizer.

pub mod token_parser;
