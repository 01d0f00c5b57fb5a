//! Configuration management for XWS.
//!
//! Parses `xws.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [storage]
//! type = "xwiki"
//! xwiki_url = "${XWIKI_URL:-http://localhost:8080}"
//! default_space = "JIO"
//! timeout_secs = 30
//! strict_content = false
//! ```
//!
//! ## Environment Variable Expansion
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `storage.xwiki_url`
//! - `storage.default_space`

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;
use xws_storage::StorageDescription;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "xws.toml";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override XWiki server URL.
    pub xwiki_url: Option<String>,
    /// Override default space.
    pub default_space: Option<String>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage backend configuration.
    pub storage: StorageConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Storage backend configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Registry type tag.
    #[serde(rename = "type")]
    pub storage_type: String,
    /// XWiki server URL (without `/xwiki/rest`).
    pub xwiki_url: Option<String>,
    /// Space used when a request does not name one.
    pub default_space: String,
    /// HTTP timeout in seconds.
    pub timeout_secs: u64,
    /// Fail on page content that is not a JSON object.
    pub strict_content: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_type: "xwiki".to_owned(),
            xwiki_url: None,
            default_space: "JIO".to_owned(),
            timeout_secs: 30,
            strict_content: false,
        }
    }
}

impl StorageConfig {
    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or has invalid format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.storage_type, "storage.type")?;
        require_non_empty(&self.default_space, "storage.default_space")?;
        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "storage.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        if let Some(url) = &self.xwiki_url {
            require_non_empty(url, "storage.xwiki_url")?;
            require_http_url(url, "storage.xwiki_url")?;
        }
        Ok(())
    }

    /// Registry description for this configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if `xwiki_url` is missing or any
    /// field is invalid.
    pub fn to_description(&self) -> Result<StorageDescription, ConfigError> {
        self.validate()?;
        let url = self.xwiki_url.as_deref().ok_or_else(|| {
            ConfigError::Validation("storage.xwiki_url is required".to_owned())
        })?;

        Ok(StorageDescription::new(self.storage_type.clone())
            .with_param("xwikiUrl", url)
            .with_param("defaultSpace", self.default_space.clone())
            .with_param("timeout", self.timeout_secs)
            .with_param("strictContent", self.strict_content))
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`storage.xwiki_url`").
        field: String,
        /// Error message (e.g., "${`XWIKI_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `xws.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// CLI settings are applied after loading, taking precedence over config
    /// file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(url) = &settings.xwiki_url {
            self.storage.xwiki_url = Some(url.clone());
        }
        if let Some(space) = &settings.default_space {
            self.storage.default_space.clone_from(space);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());
        config.storage.validate()?;

        Ok(config)
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref url) = self.storage.xwiki_url {
            self.storage.xwiki_url = Some(expand::expand_env(url, "storage.xwiki_url")?);
        }
        self.storage.default_space =
            expand::expand_env(&self.storage.default_space, "storage.default_space")?;
        Ok(())
    }
}
