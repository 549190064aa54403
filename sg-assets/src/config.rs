//! Loader configuration (sg.toml)
//!
//! Every field has a default, so an empty or partial file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Model loader settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Directory model names are resolved against (default: ".")
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Extension appended to a model name to find its mesh file (default: "sgm")
    #[serde(default = "default_mesh_extension")]
    pub mesh_extension: String,
    /// Replaces `*` in a companion animation reference (default: "sga")
    #[serde(default = "default_animation_token")]
    pub animation_token: String,
    /// Fail the load when the companion animation cannot be fetched or
    /// decoded, instead of falling back to a static model (default: false)
    #[serde(default)]
    pub strict_animation: bool,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}
fn default_mesh_extension() -> String {
    "sgm".to_string()
}
fn default_animation_token() -> String {
    sg_common::ANIMATION_TOKEN.to_string()
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            mesh_extension: default_mesh_extension(),
            animation_token: default_animation_token(),
            strict_animation: false,
        }
    }
}

impl LoaderConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml_string()?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =============================================================
    // Default value tests
    // =============================================================

    #[test]
    fn test_config_default() {
        let config = LoaderConfig::default();
        assert_eq!(config.root, PathBuf::from("."));
        assert_eq!(config.mesh_extension, "sgm");
        assert_eq!(config.animation_token, "sga");
        assert!(!config.strict_animation);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = LoaderConfig::from_toml_str("").unwrap();
        assert_eq!(config, LoaderConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let config = LoaderConfig::from_toml_str(
            r#"
            root = "assets/models"
            strict_animation = true
            "#,
        )
        .unwrap();
        assert_eq!(config.root, PathBuf::from("assets/models"));
        assert!(config.strict_animation);
        assert_eq!(config.mesh_extension, "sgm");
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            LoaderConfig::from_toml_str("strict_animation = \"yes\""),
            Err(ConfigError::Parse(_))
        ));
    }

    // =============================================================
    // File tests
    // =============================================================

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoaderConfig::load(&dir.path().join("sg.toml")).unwrap();
        assert_eq!(config, LoaderConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sg.toml");
        let config = LoaderConfig {
            root: PathBuf::from("data"),
            mesh_extension: "mesh".to_string(),
            animation_token: "anim".to_string(),
            strict_animation: true,
        };

        config.save(&path).unwrap();
        assert_eq!(LoaderConfig::load(&path).unwrap(), config);
    }
}
