//! Global user settings loaded from `~/.clef/settings.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use clef_util::errors::ClefError;

/// Global user settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub lilypond: LilypondSettings,

    #[serde(default)]
    pub resolver: ResolverSettings,
}

/// LilyPond selection from `[lilypond]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LilypondSettings {
    /// Version used when none is requested explicitly.
    #[serde(default)]
    pub default: Option<String>,
}

/// Resolution defaults from `[resolver]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolverSettings {
    /// Extra directories searched when resolving include references.
    #[serde(default, rename = "include-paths")]
    pub include_paths: Vec<PathBuf>,
}

impl Settings {
    /// Load settings from the default location, or return defaults if the
    /// file doesn't exist.
    pub fn load() -> Result<Self, ClefError> {
        Self::load_path(&clef_util::fs::settings_file())
    }

    pub fn load_path(path: &Path) -> Result<Self, ClefError> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| ClefError::Settings {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        toml::from_str(&content).map_err(|e| ClefError::Settings {
            message: format!("Failed to parse {}: {e}", path.display()),
        })
    }

    /// Write settings back to the default location, creating `~/.clef` if
    /// needed.
    pub fn save(&self) -> Result<(), ClefError> {
        self.save_path(&clef_util::fs::settings_file())
    }

    pub fn save_path(&self, path: &Path) -> Result<(), ClefError> {
        if let Some(parent) = path.parent() {
            clef_util::fs::ensure_dir(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| ClefError::Settings {
            message: format!("Failed to serialize settings: {e}"),
        })?;
        std::fs::write(path, content).map_err(|e| ClefError::Settings {
            message: format!("Failed to write {}: {e}", path.display()),
        })
    }
}
