//! Hat allocation and the hat token map.
//!
//! A hat is a (color, shape) glyph drawn over one character of a token so
//! the user can name the token out loud. This module decides which token
//! gets which hat ([`allocate::allocate_hats`]) and answers hat lookups
//! during mark resolution ([`HatTokenMap`]).

pub mod allocate;
pub mod style;
pub mod token_map;

pub use allocate::{TokenHat, allocate_hats};
pub use style::{HatColor, HatShape, HatStability, HatStyle, HatStyleSetting};
pub use token_map::HatTokenMap;
