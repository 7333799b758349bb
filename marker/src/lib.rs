//! # Marker Library
//!
//! Token-level defect labelling for a (buggy, fixed) pair of source files.
//!
//! ## Key Concepts
//! - **LabelingJob**: the main struct, holding both sources, a tokenizer and an alignment strategy.
//! - **Parsers**: grammar-backed tokenizers producing a flat sequence of leaf tokens.
//! - **Comparators**: pluggable alignment strategies producing `equal`/`replace`/`delete`/`insert`
//!   opcodes (Ratcliff/Obershelp by default).
//! - **Labeler**: converts opcodes into per-token 0/1 labels.

pub mod comparators;
pub mod error;
pub mod labeler;
pub mod parsers;
pub mod traits;
pub mod types;

use tracing::trace;

use crate::comparators::sequence_matcher::RatcliffObershelp;
use crate::error::MarkerError;
use crate::labeler::labels_from_opcodes;
use crate::parsers::token_parser::TokenParser;
use crate::traits::comparator::SequenceComparator;
use crate::traits::parser::Parser;
use crate::types::TokenLabels;

/// Labels one pair of sources written in the same language.
pub struct LabelingJob<'a> {
    original: &'a str,
    changed: &'a str,
    tokenizer: Box<dyn for<'s> Parser<&'s str, Vec<String>> + Send + Sync + 'a>,
    comparator: Box<dyn SequenceComparator + 'a>,
}

impl<'a> LabelingJob<'a> {
    /// Create a job for `language` (dataset name such as `"Python"`).
    ///
    /// # Errors
    /// [`MarkerError::UnsupportedLanguage`] when no grammar is wired up for `language`.
    pub fn new(language: &str, original: &'a str, changed: &'a str) -> Result<Self, MarkerError> {
        Ok(Self {
            original,
            changed,
            tokenizer: Box::new(TokenParser::for_language(language)?),
            comparator: Box::new(RatcliffObershelp),
        })
    }

    /// Replace the tokenizer.
    pub fn with_tokenizer<P>(mut self, tokenizer: P) -> Self
    where
        P: for<'s> Parser<&'s str, Vec<String>> + Send + Sync + 'a,
    {
        self.tokenizer = Box::new(tokenizer);
        self
    }

    /// Set a custom alignment strategy.
    pub fn with_comparator<C: SequenceComparator + 'a>(mut self, comparator: C) -> Self {
        self.comparator = Box::new(comparator);
        self
    }

    /// Tokenize both sources, align them and label every token.
    pub fn run(self) -> Result<TokenLabels, MarkerError> {
        let original_tokens = self.tokenizer.parse(self.original)?;
        let changed_tokens = self.tokenizer.parse(self.changed)?;
        Ok(label_tokens_with(&*self.comparator, original_tokens, changed_tokens))
    }
}

fn label_tokens_with(
    comparator: &dyn SequenceComparator,
    original_tokens: Vec<String>,
    changed_tokens: Vec<String>,
) -> TokenLabels {
    let opcodes = comparator.opcodes(&original_tokens, &changed_tokens);
    trace!(ops = opcodes.len(), "aligned token streams");
    let (original_labels, changed_labels) =
        labels_from_opcodes(&opcodes, original_tokens.len(), changed_tokens.len());

    TokenLabels {
        original_tokens,
        original_labels,
        changed_tokens,
        changed_labels,
    }
}

/// Aligns two token streams with the default comparator and labels them.
pub fn label_tokens(original_tokens: Vec<String>, changed_tokens: Vec<String>) -> TokenLabels {
    label_tokens_with(&RatcliffObershelp, original_tokens, changed_tokens)
}

/// Tokenizes `original` and `changed` with the grammar for `language` and labels them.
pub fn diff_sources(language: &str, original: &str, changed: &str) -> Result<TokenLabels, MarkerError> {
    LabelingJob::new(language, original, changed)?.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn identical_sources_have_zero_labels() {
        let labels = diff_sources("Python", "print(1)", "print(1)").unwrap();
        assert_eq!(labels.original_tokens, labels.changed_tokens);
        assert_eq!(labels.original_labels, vec![0, 0, 0, 0]);
        assert_eq!(labels.changed_labels, vec![0, 0, 0, 0]);
    }

    #[test]
    fn changed_literal_is_labelled_on_both_sides() {
        let labels = diff_sources("Python", "print(1)", "print(2)").unwrap();
        assert_eq!(labels.original_tokens, vec!["print", "(", "1", ")"]);
        assert_eq!(labels.changed_tokens, vec!["print", "(", "2", ")"]);
        assert_eq!(labels.original_labels, vec![0, 0, 1, 0]);
        assert_eq!(labels.changed_labels, vec![0, 0, 1, 0]);
    }

    #[test]
    fn label_lengths_match_token_lengths() {
        let original = "n = int(input())\nprint(10 / n)\n";
        let changed = "n = int(input())\nif n != 0:\n    print(10 // n)\n";
        let labels = diff_sources("Python", original, changed).unwrap();
        assert_eq!(labels.original_labels.len(), labels.original_tokens.len());
        assert_eq!(labels.changed_labels.len(), labels.changed_tokens.len());
        assert!(labels.original_labels.iter().chain(&labels.changed_labels).all(|l| *l <= 1));
        assert!(labels.changed_labels.contains(&1));
    }

    #[test]
    fn unsupported_language_is_an_error() {
        let err = diff_sources("Java", "class A {}", "class B {}").unwrap_err();
        assert!(matches!(err, MarkerError::UnsupportedLanguage(_)));
    }

    #[test]
    fn deleted_token_marks_boundary_in_changed() {
        let labels = label_tokens(toks("a b c d"), toks("a b d"));
        assert_eq!(labels.original_labels, vec![0, 0, 1, 0]);
        assert_eq!(labels.changed_labels, vec![0, 0, 1]);
    }

    struct Whitespace;

    impl<'s> Parser<&'s str, Vec<String>> for Whitespace {
        fn parse(&self, input: &'s str) -> Result<Vec<String>, MarkerError> {
            Ok(toks(input))
        }
    }

    #[test]
    fn custom_tokenizer_is_used() {
        let labels = LabelingJob::new("Python", "x y", "x z")
            .unwrap()
            .with_tokenizer(Whitespace)
            .run()
            .unwrap();
        assert_eq!(labels.original_tokens, vec!["x", "y"]);
        assert_eq!(labels.original_labels, vec![0, 1]);
        assert_eq!(labels.changed_labels, vec![0, 1]);
    }

    #[test]
    fn empty_original_is_one_relabelled_root_token() {
        let labels = diff_sources("Python", "", "print(1)").unwrap();
        assert_eq!(labels.original_tokens, vec![""]);
        assert_eq!(labels.original_labels, vec![1]);
        assert_eq!(labels.changed_labels, vec![1, 1, 1, 1]);
    }
}
