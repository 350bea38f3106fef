use std::path::{Path, PathBuf};

use modelgen_core::LoadOptions;
use modelgen_render::RenderOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings file looked up next to the definition when `--config` is absent.
pub const SETTINGS_FILE: &str = "modelgen.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read settings <{}>: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings <{}>: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadSettings {
    pub enforce_unique_index_names: bool,
}

impl Default for LoadSettings {
    fn default() -> Self {
        Self {
            enforce_unique_index_names: true,
        }
    }
}

impl LoadSettings {
    pub fn to_options(&self) -> LoadOptions {
        LoadOptions {
            enforce_unique_index_names: self.enforce_unique_index_names,
        }
    }
}

/// Contents of `modelgen.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub load: LoadSettings,
    pub render: RenderOptions,
}

impl Settings {
    pub fn from_toml(path: &Path, content: &str) -> Result<Self, SettingsError> {
        toml::from_str(content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Reads the explicit settings file, or `modelgen.toml` beside the
/// definition when it exists, or falls back to defaults.
pub fn load_settings(explicit: Option<&Path>, definition: &Path) -> Result<Settings, SettingsError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let candidate = definition
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(SETTINGS_FILE);
            if !candidate.is_file() {
                return Ok(Settings::default());
            }
            candidate
        }
    };

    let content = std::fs::read_to_string(&path).map_err(|source| SettingsError::Read {
        path: path.clone(),
        source,
    })?;
    Settings::from_toml(&path, &content)
}
