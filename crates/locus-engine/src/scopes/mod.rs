//! Scope handlers: polymorphic generators of structural regions.
//!
//! A scope is a structurally meaningful region (line, function, bracket
//! pair, ...). Handlers enumerate scopes of one kind relative to a
//! position and direction. Scope kinds form a closed enum dispatched
//! exhaustively in [`generate`]; adding a kind is a compile-time affair.
//!
//! Candidate scopes are produced eagerly per call, then consumed lazily
//! through [`ScopeIterator`], which applies containment filtering and the
//! monotonic-ordering guarantee: domains come out in non-decreasing start
//! order going forward (non-increasing going backward) and sibling scopes
//! never partially overlap.

pub mod collection_item;
pub mod delimiters;
pub mod ordering;
pub mod surrounding_pair;
pub mod syntactic;
pub mod textual;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::ResolutionError;
use crate::primitives::{Position, Range};
use crate::settings::EngineSettings;
use crate::syntax::SyntaxProvider;
use crate::tokenizer::Tokenizer;

use delimiters::PairKind;
use ordering::compare_scopes;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScopeKind {
    Character,
    Word,
    Token,
    Line,
    Paragraph,
    Document,
    NamedFunction,
    Class,
    Statement,
    String,
    Comment,
    SurroundingPair(PairKind),
    PairInterior(PairKind),
    CollectionItem,
}

impl ScopeKind {
    /// The scope kind this kind iterates within, used by "every"/"ordinal"
    /// semantics when the input target has no explicit range. `None` means
    /// the kind has no iteration relation.
    pub fn iteration_kind(&self) -> Option<ScopeKind> {
        match self {
            ScopeKind::Character | ScopeKind::Word => Some(ScopeKind::Token),
            ScopeKind::Token => Some(ScopeKind::Line),
            ScopeKind::Line | ScopeKind::Paragraph => Some(ScopeKind::Document),
            ScopeKind::Document => None,
            ScopeKind::NamedFunction
            | ScopeKind::Class
            | ScopeKind::Statement
            | ScopeKind::String
            | ScopeKind::Comment => Some(ScopeKind::Document),
            ScopeKind::SurroundingPair(_) | ScopeKind::PairInterior(_) => {
                Some(ScopeKind::Document)
            }
            ScopeKind::CollectionItem => Some(ScopeKind::PairInterior(
                PairKind::CollectionBoundary,
            )),
        }
    }

    pub fn insertion_delimiter(&self) -> &'static str {
        match self {
            ScopeKind::Character | ScopeKind::Word => "",
            ScopeKind::Token => " ",
            ScopeKind::Line | ScopeKind::Statement => "\n",
            ScopeKind::Paragraph
            | ScopeKind::NamedFunction
            | ScopeKind::Class => "\n\n",
            ScopeKind::Document => "\n",
            ScopeKind::String | ScopeKind::Comment => " ",
            ScopeKind::SurroundingPair(_) | ScopeKind::PairInterior(_) => "",
            ScopeKind::CollectionItem => ", ",
        }
    }

    pub fn requires_syntax_tree(&self) -> bool {
        matches!(
            self,
            ScopeKind::NamedFunction
                | ScopeKind::Class
                | ScopeKind::Statement
                | ScopeKind::String
                | ScopeKind::Comment
        )
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeKind::Character => write!(f, "character"),
            ScopeKind::Word => write!(f, "word"),
            ScopeKind::Token => write!(f, "token"),
            ScopeKind::Line => write!(f, "line"),
            ScopeKind::Paragraph => write!(f, "paragraph"),
            ScopeKind::Document => write!(f, "document"),
            ScopeKind::NamedFunction => write!(f, "named function"),
            ScopeKind::Class => write!(f, "class"),
            ScopeKind::Statement => write!(f, "statement"),
            ScopeKind::String => write!(f, "string"),
            ScopeKind::Comment => write!(f, "comment"),
            ScopeKind::SurroundingPair(kind) => write!(f, "surrounding pair ({kind})"),
            ScopeKind::PairInterior(kind) => write!(f, "pair interior ({kind})"),
            ScopeKind::CollectionItem => write!(f, "collection item"),
        }
    }
}

/// A resolved structural region. `domain` is what the scope owns for
/// counting and containment purposes; `content_range` is what an action
/// would operate on (for a pair interior, the part inside the delimiters).
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    pub kind: ScopeKind,
    pub domain: Range,
    pub content_range: Range,
    pub removal_range: Option<Range>,
    pub leading_delimiter: Option<Range>,
    pub trailing_delimiter: Option<Range>,
    pub insertion_delimiter: &'static str,
}

impl Scope {
    pub fn simple(kind: ScopeKind, range: Range) -> Self {
        Self {
            kind,
            domain: range,
            content_range: range,
            removal_range: None,
            leading_delimiter: None,
            trailing_delimiter: None,
            insertion_delimiter: kind.insertion_delimiter(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Containment {
    /// Only yield scopes whose domain contains the query position, e.g.
    /// for "the function containing this".
    Required,
    /// Skip scopes containing the position, e.g. for "next function".
    Disallowed,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IterationOptions {
    pub containment: Option<Containment>,
    /// Skip scopes that contain a previously yielded scope, so relative
    /// iteration steps through siblings instead of climbing ancestors.
    pub skip_ancestor_scopes: bool,
    /// Hard bound for iteration; scopes entirely past it are never yielded.
    pub distal_position: Option<Position>,
}

impl IterationOptions {
    pub fn containing() -> Self {
        Self {
            containment: Some(Containment::Required),
            ..Self::default()
        }
    }

    pub fn adjacent() -> Self {
        Self {
            containment: Some(Containment::Disallowed),
            skip_ancestor_scopes: true,
            ..Self::default()
        }
    }
}

/// Pull-based cursor over the scopes of one handler invocation. A new call
/// to [`generate`] produces a fresh, restartable sequence; abandoning the
/// iterator is the only cancellation needed.
pub struct ScopeIterator {
    candidates: Vec<Scope>,
    index: usize,
    position: Position,
    direction: Direction,
    options: IterationOptions,
    previous_domain: Option<Range>,
}

impl ScopeIterator {
    fn new(
        candidates: Vec<Scope>,
        position: Position,
        direction: Direction,
        options: IterationOptions,
    ) -> Self {
        Self {
            candidates,
            index: 0,
            position,
            direction,
            options,
            previous_domain: None,
        }
    }

    fn should_yield(&self, scope: &Scope) -> bool {
        let domain = scope.domain;

        // Only scopes that are still "ahead" of the position are relevant
        let relevant = match self.direction {
            Direction::Forward => domain.end >= self.position,
            Direction::Backward => domain.start <= self.position,
        };
        if !relevant {
            return false;
        }

        match self.options.containment {
            Some(Containment::Required) if !domain.contains_position(self.position) => {
                return false;
            }
            Some(Containment::Disallowed)
                if domain.contains_position(self.position) && !domain.is_empty() =>
            {
                return false;
            }
            _ => {}
        }

        if self.options.skip_ancestor_scopes
            && let Some(previous) = self.previous_domain
            && domain.contains(previous)
        {
            return false;
        }

        true
    }

    fn past_distal(&self, scope: &Scope) -> bool {
        match (self.options.distal_position, self.direction) {
            (Some(distal), Direction::Forward) => scope.domain.start > distal,
            (Some(distal), Direction::Backward) => scope.domain.end < distal,
            (None, _) => false,
        }
    }
}

impl Iterator for ScopeIterator {
    type Item = Scope;

    fn next(&mut self) -> Option<Scope> {
        while self.index < self.candidates.len() {
            let scope = self.candidates[self.index].clone();
            self.index += 1;

            if self.past_distal(&scope) {
                return None;
            }
            if self.should_yield(&scope) {
                self.previous_domain = Some(scope.domain);
                return Some(scope);
            }
        }
        None
    }
}

/// Everything a handler needs besides the document itself.
pub struct ScopeContext<'a> {
    pub settings: &'a EngineSettings,
    pub provider: &'a dyn SyntaxProvider,
    pub tokenizer: &'a Tokenizer,
}

/// Produces the scope sequence for `kind` relative to `position`.
pub fn generate(
    ctx: &ScopeContext<'_>,
    document: &dyn Document,
    kind: ScopeKind,
    position: Position,
    direction: Direction,
    options: IterationOptions,
) -> Result<ScopeIterator, ResolutionError> {
    let mut candidates = match kind {
        ScopeKind::Character
        | ScopeKind::Word
        | ScopeKind::Token
        | ScopeKind::Line
        | ScopeKind::Paragraph
        | ScopeKind::Document => textual::candidates(ctx, document, kind),
        ScopeKind::NamedFunction
        | ScopeKind::Class
        | ScopeKind::Statement
        | ScopeKind::String
        | ScopeKind::Comment => syntactic::candidates(ctx, document, kind)?,
        ScopeKind::SurroundingPair(pair_kind) => {
            surrounding_pair::candidates(ctx, document, pair_kind, false)
        }
        ScopeKind::PairInterior(pair_kind) => {
            surrounding_pair::candidates(ctx, document, pair_kind, true)
        }
        ScopeKind::CollectionItem => collection_item::candidates(ctx, document),
    };

    candidates.sort_by(|a, b| compare_scopes(direction, position, a, b));
    candidates.dedup_by(|a, b| a.domain == b.domain && a.content_range == b.content_range);

    Ok(ScopeIterator::new(candidates, position, direction, options))
}
