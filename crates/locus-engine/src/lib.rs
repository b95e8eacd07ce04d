pub mod document;
pub mod engine;
pub mod error;
pub mod hats;
pub mod pipeline;
pub mod primitives;
pub mod range_tree;
pub mod scopes;
pub mod settings;
pub mod syntax;
pub mod tokenizer;

// Re-export key types for easier usage
pub use document::{Document, TextDocument};
pub use engine::Engine;
pub use error::ResolutionError;
pub use hats::{HatColor, HatShape, HatStability, HatStyle, HatStyleSetting, HatTokenMap, TokenHat};
pub use pipeline::{Mark, Modifier, Target, TargetRequest};
pub use primitives::{Position, Range};
pub use scopes::delimiters::{PairKind, SimplePairKind};
pub use scopes::{Containment, Direction, IterationOptions, Scope, ScopeIterator, ScopeKind};
pub use settings::{EngineSettings, LanguageSettings};
pub use syntax::{SyntaxProvider, TreeSitterProvider};
pub use tokenizer::{Token, TokenKind, Tokenizer};
