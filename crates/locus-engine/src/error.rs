use thiserror::Error;

use crate::hats::HatStyle;
use crate::scopes::ScopeKind;

/// Everything that can go wrong while resolving targets. All variants are
/// recoverable at the command boundary; resolution is all-or-nothing per
/// command, so callers never see a partial target list alongside an error.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("no containing {kind} scope found")]
    NoContainingScope { kind: ScopeKind },

    #[error("scope type {kind} has no child scopes to iterate")]
    NotHierarchicalScope { kind: ScopeKind },

    #[error("requested {requested} {kind} scope(s) but only {available} available")]
    OutOfRange {
        kind: ScopeKind,
        requested: usize,
        available: usize,
    },

    #[error("scope type {kind} is not supported for language \"{language}\"")]
    UnsupportedScope { kind: ScopeKind, language: String },

    #[error("language \"{language}\" is not supported")]
    UnsupportedLanguage { language: String },

    #[error("no token is currently wearing hat {style}")]
    HatLookup { style: HatStyle },

    #[error("no previous targets to refer back to")]
    NoPreviousTargets,
}
