//! # Types Module
//!
//! Core data structures shared by the tokenizer, the sequence matcher and the labelling step.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of an alignment operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpTag {
    Equal,
    Replace,
    Delete,
    Insert,
}

impl fmt::Display for OpTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OpTag::Equal => "equal",
            OpTag::Replace => "replace",
            OpTag::Delete => "delete",
            OpTag::Insert => "insert",
        };
        f.write_str(s)
    }
}

/// One alignment operation: `a[i1..i2]` relates to `b[j1..j2]` as described by `tag`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opcode {
    pub tag: OpTag,
    pub i1: usize,
    pub i2: usize,
    pub j1: usize,
    pub j2: usize,
}

impl Opcode {
    pub fn new(tag: OpTag, i1: usize, i2: usize, j1: usize, j2: usize) -> Self {
        Self { tag, i1, i2, j1, j2 }
    }
}

/// A maximal run of equal elements: `a[a..a+size] == b[b..b+size]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Match {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

/// Both token streams of a pair together with their per-token defect labels.
///
/// `original_labels.len() == original_tokens.len()` and
/// `changed_labels.len() == changed_tokens.len()` always hold; every label is 0 or 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenLabels {
    pub original_tokens: Vec<String>,
    pub original_labels: Vec<u8>,
    pub changed_tokens: Vec<String>,
    pub changed_labels: Vec<u8>,
}
