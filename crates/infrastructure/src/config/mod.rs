//! Client configuration files.
//!
//! A config file is JSON (`.json`) or YAML (`.yaml`, `.yml`) holding the
//! fields of [`ClientConfig`]. Missing fields take their defaults.

use std::path::{Path, PathBuf};

use restcheck_domain::ClientConfig;
use thiserror::Error;

/// Errors raised while loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config {path}: {source}")]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The extension is not one of `json`, `yaml`, `yml`.
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(PathBuf),

    /// JSON content did not parse.
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML content did not parse.
    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Config file syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON
    Json,
    /// YAML
    Yaml,
}

impl ConfigFormat {
    /// Picks the format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Parses config text.
///
/// # Errors
///
/// Returns the parser error for malformed content.
pub fn parse_config(contents: &str, format: ConfigFormat) -> Result<ClientConfig, ConfigError> {
    let config = match format {
        ConfigFormat::Json => serde_json::from_str(contents)?,
        ConfigFormat::Yaml => serde_yaml::from_str(contents)?,
    };
    Ok(config)
}

/// Reads and parses a config file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, has an unknown extension or
/// does not parse.
pub async fn load_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    let format = ConfigFormat::from_path(path)?;
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let config = parse_config(&contents, format)?;
    tracing::debug!(path = %path.display(), base_url = %config.base_url, "loaded config");
    Ok(config)
}
