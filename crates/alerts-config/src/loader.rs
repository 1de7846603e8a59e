//! Format-agnostic loading of desired-state files
//!
//! The format is detected from the file extension:
//! - `.toml` -> TOML
//! - `.json` -> JSON
//! - `.yaml`, `.yml` -> YAML

use std::fs;
use std::path::Path;

use crate::policy::AlertsConfig;
use crate::{Error, Result};

/// Serialization format of a configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Detect the format from a path's extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(Error::UnsupportedFormat { extension }),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }

    /// Parse content in this format
    pub fn parse(self, content: &str, path: &Path) -> Result<AlertsConfig> {
        let parsed = match self {
            Self::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        };

        parsed.map_err(|message| Error::ConfigParse {
            path: path.to_path_buf(),
            format: self.label().into(),
            message,
        })
    }
}

/// Load a configuration file without validating it
pub fn read_config(path: &Path) -> Result<AlertsConfig> {
    let format = ConfigFormat::from_path(path)?;
    if !path.exists() {
        return Err(Error::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let config = format.parse(&content, path)?;
    tracing::debug!(
        path = %path.display(),
        policies = config.policies.len(),
        "Loaded alerts configuration"
    );
    Ok(config)
}

/// Load and validate a configuration file
///
/// Validation happens before anything talks to the remote service, so an
/// invalid file never causes a partial synchronization.
pub fn load_config(path: &Path) -> Result<AlertsConfig> {
    let config = read_config(path)?;
    config.validate()?;
    Ok(config)
}
