use std::path::{Path, PathBuf};

use glob::glob;
use locus_engine::{EngineSettings, LanguageSettings};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to scan language configs under {dir}: {source}")]
    LanguageScanError {
        dir: PathBuf,
        source: glob::PatternError,
    },
}

/// On-disk engine configuration. The main `config.toml` holds the engine
/// settings; per-language overrides live next to it in `languages/<id>.toml`
/// and are merged into `engine.languages` on load.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineSettings,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        if let Some(dir) = config_path.parent() {
            config.load_language_overrides(&dir.join("languages"))?;
        }

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    /// Merges `<dir>/<language id>.toml` files into the engine's language
    /// table. Missing directory is fine; unreadable files are not.
    pub fn load_language_overrides(&mut self, dir: &Path) -> Result<(), ConfigError> {
        if !dir.exists() {
            return Ok(());
        }

        let pattern = dir.join("*.toml");
        let entries = glob(&pattern.to_string_lossy()).map_err(|source| {
            ConfigError::LanguageScanError {
                dir: dir.to_path_buf(),
                source,
            }
        })?;

        for entry in entries.flatten() {
            let Some(language_id) = entry.file_stem().map(|s| s.to_string_lossy().to_string())
            else {
                continue;
            };
            let content =
                std::fs::read_to_string(&entry).map_err(|source| ConfigError::ConfigReadError {
                    config_path: entry.clone(),
                    source,
                })?;
            let settings: LanguageSettings =
                toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                    config_path: entry.clone(),
                    source,
                })?;
            self.engine.languages.insert(language_id, settings);
        }

        Ok(())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/locus");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use locus_engine::{HatStability, SimplePairKind};
    use tempfile::TempDir;

    #[test]
    fn config_path_expands_tilde() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/locus/config.toml"));
    }

    #[test]
    fn missing_config_is_none() {
        let dir = TempDir::new().unwrap();
        let loaded = Config::load_from_path(dir.path().join("config.toml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn stability_round_trips_through_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[engine]\nstability = \"stable\"\n").unwrap();

        let config = Config::load_from_path(&path).unwrap().unwrap();
        assert_eq!(config.engine.stability, HatStability::Stable);
    }

    #[test]
    fn parse_errors_carry_the_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not valid toml [").unwrap();

        let err = Config::load_from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn language_overrides_are_discovered() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[engine]\nstability = \"greedy\"\n").unwrap();

        let languages = dir.path().join("languages");
        std::fs::create_dir_all(&languages).unwrap();
        std::fs::write(
            languages.join("nix.toml"),
            "word_separators = [\"_\", \"-\"]\n\n[delimiter_overrides]\nsingleQuotes = [\"''\", \"''\"]\n",
        )
        .unwrap();

        let config = Config::load_from_path(&path).unwrap().unwrap();
        let nix = config.engine.language("nix");
        assert_eq!(nix.word_separators, vec!["_".to_string(), "-".to_string()]);
        assert_eq!(
            nix.delimiter_overrides.get(&SimplePairKind::SingleQuotes),
            Some(&("''".to_string(), "''".to_string()))
        );
    }

    #[test]
    fn save_and_reload_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.engine.stability = HatStability::Floor;
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap().unwrap();
        assert_eq!(loaded.engine.stability, HatStability::Floor);
    }
}
