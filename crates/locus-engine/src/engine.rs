//! The engine facade: hat allocation, scope generation and target
//! resolution behind one stateful object.
//!
//! The engine owns the mutable state that outlives a single call: the
//! current hat-token map, the previous command's targets (for `That`
//! marks) and a per-language tokenizer cache. Everything else is computed
//! fresh from the document handed in.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::document::Document;
use crate::error::ResolutionError;
use crate::hats::{HatTokenMap, allocate_hats};
use crate::pipeline::{self, Target, TargetRequest};
use crate::primitives::{Position, Range};
use crate::scopes::{self, Direction, IterationOptions, ScopeContext, ScopeIterator, ScopeKind};
use crate::settings::EngineSettings;
use crate::syntax::SyntaxProvider;
use crate::tokenizer::Tokenizer;

pub struct Engine {
    settings: EngineSettings,
    provider: Box<dyn SyntaxProvider>,
    hat_map: HatTokenMap,
    previous_targets: Vec<Target>,
    tokenizers: RefCell<HashMap<String, Rc<Tokenizer>>>,
}

impl Engine {
    pub fn new(settings: EngineSettings, provider: Box<dyn SyntaxProvider>) -> Self {
        Self {
            settings,
            provider,
            hat_map: HatTokenMap::default(),
            previous_targets: Vec::new(),
            tokenizers: RefCell::new(HashMap::new()),
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn hat_map(&self) -> &HatTokenMap {
        &self.hat_map
    }

    fn tokenizer_for(&self, language_id: &str) -> Rc<Tokenizer> {
        let mut cache = self.tokenizers.borrow_mut();
        if let Some(tokenizer) = cache.get(language_id) {
            return Rc::clone(tokenizer);
        }
        let separators = self.settings.language(language_id).word_separators;
        let tokenizer = Rc::new(Tokenizer::new(&separators));
        cache.insert(language_id.to_string(), Rc::clone(&tokenizer));
        tokenizer
    }

    /// Reallocates hats for the document wholesale; the previous map feeds
    /// the stability policy. Returns the fresh map.
    pub fn allocate_hats(
        &mut self,
        document: &dyn Document,
        cursor_positions: &[Position],
    ) -> &HatTokenMap {
        let tokenizer = self.tokenizer_for(document.language_id());
        let tokens = tokenizer.tokenize(document);
        let hats = allocate_hats(
            &tokens,
            cursor_positions,
            self.hat_map.hats(),
            &self.settings.hat_styles,
            self.settings.stability,
            &tokenizer,
        );
        log::debug!(
            "allocated {} hats over {} tokens (version {})",
            hats.len(),
            tokens.len(),
            document.version()
        );
        self.hat_map = HatTokenMap::new(hats);
        &self.hat_map
    }

    /// Enumerates scopes of `kind` relative to `position`.
    pub fn generate_scopes(
        &self,
        document: &dyn Document,
        kind: ScopeKind,
        position: Position,
        direction: Direction,
        options: IterationOptions,
    ) -> Result<ScopeIterator, ResolutionError> {
        let tokenizer = self.tokenizer_for(document.language_id());
        let ctx = ScopeContext {
            settings: &self.settings,
            provider: self.provider.as_ref(),
            tokenizer: &tokenizer,
        };
        scopes::generate(&ctx, document, kind, position, direction, options)
    }

    /// Resolves every request against the document, all-or-nothing: one
    /// failing request fails the batch and leaves the previous targets
    /// untouched. On success the results become the new `That` arena.
    pub fn resolve_targets(
        &mut self,
        document: &dyn Document,
        selections: &[Range],
        requests: &[TargetRequest],
    ) -> Result<Vec<Target>, ResolutionError> {
        let tokenizer = self.tokenizer_for(document.language_id());
        let ctx = ScopeContext {
            settings: &self.settings,
            provider: self.provider.as_ref(),
            tokenizer: &tokenizer,
        };

        let mut resolved = Vec::new();
        for request in requests {
            resolved.extend(pipeline::resolve(
                &ctx,
                document,
                request,
                selections,
                &self.hat_map,
                &self.previous_targets,
            )?);
        }

        log::debug!("resolved {} targets from {} requests", resolved.len(), requests.len());
        self.previous_targets = resolved.clone();
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TextDocument;
    use crate::pipeline::{Mark, Modifier};
    use crate::syntax::TreeSitterProvider;

    fn engine() -> Engine {
        Engine::new(EngineSettings::default(), Box::new(TreeSitterProvider::new()))
    }

    #[test]
    fn failed_request_leaves_previous_targets_intact() {
        let mut engine = engine();
        let doc = TextDocument::new("rust", "foo bar\n");

        let ok = engine
            .resolve_targets(
                &doc,
                &[Range::empty(Position::new(0, 1))],
                &[TargetRequest {
                    mark: Mark::Cursor,
                    modifiers: vec![Modifier::ContainingScope(ScopeKind::Token)],
                }],
            )
            .unwrap();
        assert_eq!(ok.len(), 1);

        // A cursor outside any parens cannot find a surrounding pair
        let err = engine.resolve_targets(
            &doc,
            &[Range::empty(Position::new(0, 1))],
            &[TargetRequest {
                mark: Mark::Cursor,
                modifiers: vec![Modifier::SurroundingPair {
                    family: crate::scopes::delimiters::PairKind::Parentheses,
                    require_strong_containment: false,
                }],
            }],
        );
        assert!(err.is_err());

        // `That` still refers to the last successful batch
        let that = engine
            .resolve_targets(
                &doc,
                &[],
                &[TargetRequest {
                    mark: Mark::That,
                    modifiers: vec![],
                }],
            )
            .unwrap();
        assert_eq!(that[0].content_range, ok[0].content_range);
    }

    #[test]
    fn tokenizers_are_cached_per_language() {
        let engine = engine();
        let a = engine.tokenizer_for("rust");
        let b = engine.tokenizer_for("rust");
        assert!(Rc::ptr_eq(&a, &b));
    }
}
