//! Position/Range value types shared by every layer of the engine.
//!
//! Positions use zero-based lines and UTF-16 code-unit columns so that they
//! line up with the addressing scheme of the host editor. Both types are
//! plain values with no lifecycle of their own; anything that needs byte
//! offsets goes through [`crate::document::Document`].

pub mod position;
pub mod range;

pub use position::Position;
pub use range::Range;
