//! The parser seam.
//!
//! Syntactic scope handlers only ever ask one question: "where are the
//! nodes matching this matcher". [`SyntaxProvider`] is that question as a
//! trait, so hosts can plug in their own parser infrastructure; the
//! built-in implementation runs tree-sitter over the document text on
//! each call.

use std::collections::HashMap;

use tree_sitter::{Language, Node, Parser};

use crate::document::Document;
use crate::error::ResolutionError;
use crate::primitives::Range;

/// Describes the syntax nodes a scope kind maps to: exact node kinds plus
/// kind suffixes (`_statement` catches every statement flavor a grammar
/// defines).
#[derive(Debug, Clone, Copy)]
pub struct NodeMatcher {
    pub kinds: &'static [&'static str],
    pub suffixes: &'static [&'static str],
}

impl NodeMatcher {
    pub fn matches(&self, node_kind: &str) -> bool {
        self.kinds.contains(&node_kind)
            || self.suffixes.iter().any(|suffix| node_kind.ends_with(suffix))
    }
}

pub trait SyntaxProvider {
    fn supports(&self, language_id: &str) -> bool;

    /// Whether the language's grammar defines any node kind the matcher
    /// could match. Providers that cannot introspect their grammars may
    /// leave the default, which assumes yes.
    fn supports_matcher(&self, _language_id: &str, _matcher: &NodeMatcher) -> bool {
        true
    }

    /// Ranges of all nodes matching `matcher`, in document order.
    /// Fails with [`ResolutionError::UnsupportedLanguage`] when the
    /// document's language has no registered grammar.
    fn matching_nodes(
        &self,
        document: &dyn Document,
        matcher: &NodeMatcher,
    ) -> Result<Vec<Range>, ResolutionError>;
}

/// Tree-sitter-backed provider. Grammars are registered up front; parsing
/// happens per call against the current document text.
#[derive(Default)]
pub struct TreeSitterProvider {
    languages: HashMap<String, Language>,
}

impl TreeSitterProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, language_id: impl Into<String>, language: Language) {
        self.languages.insert(language_id.into(), language);
    }
}

impl SyntaxProvider for TreeSitterProvider {
    fn supports(&self, language_id: &str) -> bool {
        self.languages.contains_key(language_id)
    }

    fn supports_matcher(&self, language_id: &str, matcher: &NodeMatcher) -> bool {
        let Some(language) = self.languages.get(language_id) else {
            return true;
        };
        if matcher
            .kinds
            .iter()
            .any(|kind| language.id_for_node_kind(kind, true) != 0)
        {
            return true;
        }
        (0..language.node_kind_count()).any(|id| {
            language
                .node_kind_for_id(id as u16)
                .is_some_and(|kind| matcher.suffixes.iter().any(|s| kind.ends_with(s)))
        })
    }

    fn matching_nodes(
        &self,
        document: &dyn Document,
        matcher: &NodeMatcher,
    ) -> Result<Vec<Range>, ResolutionError> {
        let language = self.languages.get(document.language_id()).ok_or_else(|| {
            ResolutionError::UnsupportedLanguage {
                language: document.language_id().to_string(),
            }
        })?;

        let mut parser = Parser::new();
        parser
            .set_language(language)
            .map_err(|_| ResolutionError::UnsupportedLanguage {
                language: document.language_id().to_string(),
            })?;

        let text = document.text();
        let Some(tree) = parser.parse(&text, None) else {
            return Ok(Vec::new());
        };

        let mut ranges = Vec::new();
        collect(tree.root_node(), matcher, document, &mut ranges);
        Ok(ranges)
    }
}

fn collect(node: Node<'_>, matcher: &NodeMatcher, document: &dyn Document, out: &mut Vec<Range>) {
    if matcher.matches(node.kind()) {
        out.push(Range::new(
            document.position_at(node.start_byte()),
            document.position_at(node.end_byte()),
        ));
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect(child, matcher, document, out);
    }
}
