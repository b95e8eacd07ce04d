//! Engine-side settings types.
//!
//! These are plain serde values so that the config crate can read them
//! straight out of TOML; the engine itself never touches the filesystem.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::hats::{HatStability, HatStyleSetting, style::default_hat_styles};
use crate::scopes::delimiters::SimplePairKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub stability: HatStability,
    pub hat_styles: Vec<HatStyleSetting>,
    pub languages: HashMap<String, LanguageSettings>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        let mut languages = HashMap::new();
        // Languages where `-` is identifier-internal
        for id in ["css", "scss", "shellscript"] {
            languages.insert(
                id.to_string(),
                LanguageSettings {
                    word_separators: vec!["-".to_string(), "_".to_string()],
                    ..LanguageSettings::default()
                },
            );
        }
        Self {
            stability: HatStability::default(),
            hat_styles: default_hat_styles(),
            languages,
        }
    }
}

impl EngineSettings {
    pub fn language(&self, language_id: &str) -> LanguageSettings {
        self.languages.get(language_id).cloned().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageSettings {
    /// Characters treated as identifier-internal by the tokenizer.
    pub word_separators: Vec<String>,
    /// Delimiter text overrides, e.g. `''` instead of `'` for nix single
    /// quotes. Values are (left, right) text.
    pub delimiter_overrides: HashMap<SimplePairKind, (String, String)>,
}

impl Default for LanguageSettings {
    fn default() -> Self {
        Self {
            word_separators: vec!["_".to_string()],
            delimiter_overrides: HashMap::new(),
        }
    }
}
