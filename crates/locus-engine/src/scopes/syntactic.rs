//! Syntax-tree scope kinds, resolved through the provider seam.
//!
//! Each kind maps to a node matcher covering the common grammar
//! vocabularies, so one table serves rust, the C family, and the usual
//! scripting grammars without per-language handler code.

use crate::document::Document;
use crate::error::ResolutionError;
use crate::syntax::NodeMatcher;

use super::{Scope, ScopeContext, ScopeKind};

fn matcher_for(kind: ScopeKind) -> NodeMatcher {
    match kind {
        ScopeKind::NamedFunction => NodeMatcher {
            kinds: &[
                "function_item",
                "function_declaration",
                "function_definition",
                "method_definition",
                "method_declaration",
            ],
            suffixes: &[],
        },
        ScopeKind::Class => NodeMatcher {
            kinds: &[
                "struct_item",
                "enum_item",
                "union_item",
                "trait_item",
                "impl_item",
                "class_declaration",
                "class_definition",
                "class_specifier",
            ],
            suffixes: &[],
        },
        ScopeKind::Statement => NodeMatcher {
            kinds: &["let_declaration", "use_declaration"],
            suffixes: &["_statement"],
        },
        ScopeKind::String => NodeMatcher {
            kinds: &["string_literal", "raw_string_literal", "string", "char_literal"],
            suffixes: &[],
        },
        ScopeKind::Comment => NodeMatcher {
            kinds: &["line_comment", "block_comment", "comment"],
            suffixes: &[],
        },
        _ => unreachable!("non-syntactic scope kind {kind}"),
    }
}

pub fn candidates(
    ctx: &ScopeContext<'_>,
    document: &dyn Document,
    kind: ScopeKind,
) -> Result<Vec<Scope>, ResolutionError> {
    let matcher = matcher_for(kind);
    if !ctx.provider.supports_matcher(document.language_id(), &matcher) {
        return Err(ResolutionError::UnsupportedScope {
            kind,
            language: document.language_id().to_string(),
        });
    }
    let ranges = ctx.provider.matching_nodes(document, &matcher)?;
    Ok(ranges
        .into_iter()
        .map(|range| Scope::simple(kind, range))
        .collect())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::document::TextDocument;
    use crate::settings::EngineSettings;
    use crate::syntax::TreeSitterProvider;
    use crate::tokenizer::Tokenizer;

    use super::*;

    fn scopes_of(text: &str, kind: ScopeKind) -> Result<Vec<Scope>, ResolutionError> {
        let settings = EngineSettings::default();
        let mut provider = TreeSitterProvider::new();
        provider.register("rust", tree_sitter_rust::LANGUAGE.into());
        let tokenizer = Tokenizer::default();
        let ctx = ScopeContext {
            settings: &settings,
            provider: &provider,
            tokenizer: &tokenizer,
        };
        let doc = TextDocument::new("rust", text);
        candidates(&ctx, &doc, kind)
    }

    #[test]
    fn functions_and_classes_resolve() {
        let text = "struct S;\n\nfn main() {\n    let x = 1;\n}\n";
        let functions = scopes_of(text, ScopeKind::NamedFunction).unwrap();
        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].domain.start.line, 2);

        let classes = scopes_of(text, ScopeKind::Class).unwrap();
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].domain.start.line, 0);
    }

    #[test]
    fn statements_include_let_declarations() {
        let text = "fn main() {\n    let x = 1;\n    x;\n}\n";
        let statements = scopes_of(text, ScopeKind::Statement).unwrap();
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].domain.start.line, 1);
        assert_eq!(statements[1].domain.start.line, 2);
    }

    #[test]
    fn comments_and_strings_resolve() {
        let text = "// hello\nfn main() {\n    let s = \"world\";\n}\n";
        let comments = scopes_of(text, ScopeKind::Comment).unwrap();
        assert_eq!(comments.len(), 1);
        let strings = scopes_of(text, ScopeKind::String).unwrap();
        assert_eq!(strings.len(), 1);
        assert_eq!(strings[0].domain.start.line, 2);
    }
}
