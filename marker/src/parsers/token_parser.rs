//! # Token Parser
//!
//! Grammar-backed tokenizer. Source text is parsed into a concrete syntax tree with tree-sitter
//! and flattened, pre-order, into the text of its leaves. Comment leaves are dropped.
//!
//! Each thread builds its own parser on first use and keeps it for the thread's lifetime, so
//! workers never share parser state.

use std::cell::RefCell;

use tracing::debug;
use tree_sitter::{Node, Tree};
use util::languages::Language;

use crate::error::MarkerError;
use crate::traits::parser::Parser;

const COMMENT_KIND: &str = "comment";

thread_local! {
    static PYTHON_PARSER: RefCell<Option<tree_sitter::Parser>> = const { RefCell::new(None) };
}

fn python_grammar() -> tree_sitter::Language {
    tree_sitter_python::LANGUAGE.into()
}

fn parse_python(source: &str) -> Result<Tree, MarkerError> {
    PYTHON_PARSER.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            let mut parser = tree_sitter::Parser::new();
            parser
                .set_language(&python_grammar())
                .map_err(|e| MarkerError::Grammar {
                    language: Language::Python.to_string(),
                    reason: e.to_string(),
                })?;
            debug!("initialised Python parser for this worker");
            *slot = Some(parser);
        }

        match slot.as_mut() {
            Some(parser) => parser
                .parse(source, None)
                .ok_or_else(|| MarkerError::ParseFailed(Language::Python.to_string())),
            None => Err(MarkerError::ParseFailed(Language::Python.to_string())),
        }
    })
}

/// Leaf nodes of `tree` in pre-order, comments excluded.
pub fn leaf_nodes(tree: &Tree) -> Vec<Node<'_>> {
    let mut leaves = Vec::new();
    let mut cursor = tree.walk();

    loop {
        let node = cursor.node();
        if node.child_count() == 0 && node.kind() != COMMENT_KIND {
            leaves.push(node);
        }

        if cursor.goto_first_child() || cursor.goto_next_sibling() {
            continue;
        }

        // Climb until some ancestor has a next sibling; reaching the root ends the walk.
        loop {
            if !cursor.goto_parent() {
                return leaves;
            }
            if cursor.goto_next_sibling() {
                break;
            }
        }
    }
}

/// Tokenizer for one declared language.
#[derive(Debug, Clone, Copy)]
pub struct TokenParser {
    language: Language,
}

impl TokenParser {
    /// Fails with [`MarkerError::UnsupportedLanguage`] for languages without a grammar.
    pub fn new(language: Language) -> Result<Self, MarkerError> {
        match language {
            Language::Python => Ok(Self { language }),
            other => Err(MarkerError::UnsupportedLanguage(other.to_string())),
        }
    }

    /// Looks the language up by its dataset name (`"Python"`, `"C++"`, ...).
    pub fn for_language(language: &str) -> Result<Self, MarkerError> {
        let language = Language::from_codenet(language)
            .ok_or_else(|| MarkerError::UnsupportedLanguage(language.to_string()))?;
        Self::new(language)
    }

    fn parse_tree(&self, source: &str) -> Result<Tree, MarkerError> {
        match self.language {
            Language::Python => parse_python(source),
            other => Err(MarkerError::UnsupportedLanguage(other.to_string())),
        }
    }
}

impl<'a> Parser<&'a str, Vec<String>> for TokenParser {
    fn parse(&self, source: &'a str) -> Result<Vec<String>, MarkerError> {
        let tree = self.parse_tree(source)?;
        let bytes = source.as_bytes();
        leaf_nodes(&tree)
            .into_iter()
            .map(|node| Ok(node.utf8_text(bytes)?.to_string()))
            .collect()
    }
}
