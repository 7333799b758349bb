//!
//! Traits Module
//!
//! Core seams of the marker crate.
//!
//! - [`parser`]: turns source text into a flat token sequence.
//! - [`comparator`]: aligns two token sequences into tagged opcodes.

pub mod comparator;
pub mod parser;
