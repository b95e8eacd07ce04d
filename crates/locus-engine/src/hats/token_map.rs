use std::collections::HashMap;

use crate::error::ResolutionError;
use crate::tokenizer::Token;

use super::allocate::TokenHat;
use super::style::HatStyle;

/// Read-only view of the current hat bindings, rebuilt wholesale on every
/// allocation pass. Mark resolution queries it by (color, shape).
#[derive(Debug, Default)]
pub struct HatTokenMap {
    hats: Vec<TokenHat>,
    by_style: HashMap<HatStyle, usize>,
}

impl HatTokenMap {
    pub fn new(hats: Vec<TokenHat>) -> Self {
        let by_style = hats
            .iter()
            .enumerate()
            .map(|(i, hat)| (hat.style, i))
            .collect();
        Self { hats, by_style }
    }

    pub fn token(&self, style: HatStyle) -> Result<&Token, ResolutionError> {
        self.by_style
            .get(&style)
            .map(|&i| &self.hats[i].token)
            .ok_or(ResolutionError::HatLookup { style })
    }

    pub fn hats(&self) -> &[TokenHat] {
        &self.hats
    }

    pub fn len(&self) -> usize {
        self.hats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hats.is_empty()
    }
}
