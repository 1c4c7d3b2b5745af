//! Board configuration.
//!
//! # Responsibility
//! - Describe where board state is stored, which palette new notes cycle
//!   through, and when staged writes reach storage.
//! - Load configuration from an optional JSON file with per-field defaults.
//!
//! # Invariants
//! - `storage_key` is never empty after validation.
//! - Every palette entry is a `#rrggbb` hex color after validation.

use crate::model::note::Palette;
use crate::repo::note_slot::STORAGE_KEY;
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid hex color regex"));

/// When staged note snapshots are written to storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlushPolicy {
    /// Flush after every mutation.
    #[default]
    Immediate,
    /// Caller flushes explicitly, e.g. once per event turn.
    Manual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub storage_key: String,
    pub palette: Palette,
    pub flush_policy: FlushPolicy,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_string(),
            palette: Palette::default(),
            flush_policy: FlushPolicy::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    EmptyStorageKey,
    InvalidColor(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read board config: {err}"),
            Self::Parse(err) => write!(f, "failed to parse board config: {err}"),
            Self::EmptyStorageKey => write!(f, "storage_key cannot be empty"),
            Self::InvalidColor(value) => {
                write!(f, "palette color `{value}` is not a #rrggbb hex value")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl BoardConfig {
    /// Loads config from a JSON file; a missing file yields defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "event=config_load module=config status=ok source=default path={}",
                    path.display()
                );
                return Ok(Self::default());
            }
            Err(err) => return Err(ConfigError::Io(err)),
        };

        let config = Self::from_json(&contents)?;
        info!(
            "event=config_load module=config status=ok source=file path={} flush_policy={:?} palette_len={}",
            path.display(),
            config.flush_policy,
            config.palette.len()
        );
        Ok(config)
    }

    /// Parses and validates config from JSON text.
    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(contents).map_err(ConfigError::Parse)?;
        config.storage_key = config.storage_key.trim().to_string();
        // An explicit empty palette means "use the default colors".
        config.palette = Palette::new(config.palette.colors().to_vec());
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        if let Some(bad) = self
            .palette
            .colors()
            .iter()
            .find(|color| !HEX_COLOR_RE.is_match(color))
        {
            return Err(ConfigError::InvalidColor(bad.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config = BoardConfig::from_json("{}").expect("defaults should parse");
        assert_eq!(config, BoardConfig::default());
        assert_eq!(config.storage_key, "sticky-notes-app-state-v1");
    }

    #[test]
    fn custom_palette_and_manual_flush_parse() {
        let config = BoardConfig::from_json(
            r##"{"palette": ["#000000", "#FFFFFF"], "flush_policy": "manual"}"##,
        )
        .expect("config should parse");
        assert_eq!(config.palette.len(), 2);
        assert_eq!(config.flush_policy, FlushPolicy::Manual);
    }

    #[test]
    fn rejects_bad_color_and_blank_key() {
        let err = BoardConfig::from_json(r#"{"palette": ["yellow"]}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidColor(value) if value == "yellow"));

        let err = BoardConfig::from_json(r#"{"storage_key": "  "}"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyStorageKey));
    }

    #[test]
    fn empty_palette_falls_back_to_default_colors() {
        let config = BoardConfig::from_json(r#"{"palette": []}"#).expect("config should parse");
        assert_eq!(config.palette, Palette::default());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config =
            BoardConfig::load(dir.path().join("absent.json")).expect("missing file is fine");
        assert_eq!(config, BoardConfig::default());
    }
}
