//! TOML configuration file loading
//!
//! ```toml
//! [bridge]
//! frame_prefix = "plugin-"
//!
//! [logging]
//! level = "debug"
//!
//! [[plugins]]
//! name = "gallery"
//! veto = ["beforePublish"]
//! ```
//!
//! An explicitly named file must exist; the default file is optional.

use crate::bridge::api::BridgeSettings;
use crate::core::logging::LogFormat;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

static PLUGIN_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.-]+$").expect("plugin name pattern is valid")
});

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{message}")]
    NotFound { path: PathBuf, message: String },

    #[error("Error reading configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{message}")]
    Parse { path: PathBuf, message: String },

    #[error("{message}")]
    Invalid { message: String },
}

impl ConfigError {
    pub fn not_found(path: &Path) -> Self {
        ConfigError::NotFound {
            path: path.to_path_buf(),
            message: format!(
                "The specified configuration file does not exist: {}",
                path.display()
            ),
        }
    }

    pub fn invalid_plugin_name(name: &str) -> Self {
        ConfigError::Invalid {
            message: format!(
                "Invalid plugin name '{}': use letters, digits, '.', '_' or '-'",
                name
            ),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl crate::core::error_handling::ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        !matches!(self, ConfigError::Read { .. })
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ConfigError::NotFound { message, .. }
            | ConfigError::Parse { message, .. }
            | ConfigError::Invalid { message } => Some(message),
            ConfigError::Read { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: Option<String>,
    pub file: Option<PathBuf>,
}

/// A plugin the host starts with
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginEntry {
    pub name: String,

    /// Whether the plugin's frame is attached
    #[serde(default = "enabled")]
    pub loaded: bool,

    /// Whether the plugin has completed its readiness handshake
    #[serde(default = "enabled")]
    pub ready: bool,

    /// Events the plugin objects to
    #[serde(default)]
    pub veto: Vec<String>,
}

fn enabled() -> bool {
    true
}

/// Where a loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// No file was named and the default file does not exist
    Defaults,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "Loaded configuration from {}", path.display()),
            ConfigSource::Defaults => f.write_str("No configuration file, using defaults"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    pub bridge: BridgeSettings,
    pub logging: LoggingConfig,
    pub plugins: Vec<PluginEntry>,
}

impl BridgeConfig {
    /// `<config dir>/Framebridge/framebridge.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("Framebridge").join("framebridge.toml"))
    }

    /// Load the explicit file, else the default file if present, else defaults
    pub async fn load(explicit: Option<&Path>) -> ConfigResult<Self> {
        Ok(Self::load_with_source(explicit).await?.0)
    }

    /// Like [`load`](Self::load), also reporting where the values came from
    pub async fn load_with_source(
        explicit: Option<&Path>,
    ) -> ConfigResult<(Self, ConfigSource)> {
        let path = match explicit {
            Some(path) if !path.exists() => return Err(ConfigError::not_found(path)),
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => return Ok((Self::default(), ConfigSource::Defaults)),
            },
        };

        let contents =
            tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| ConfigError::Read {
                    path: path.clone(),
                    source,
                })?;
        let config = Self::parse(&contents, &path)?;
        Ok((config, ConfigSource::File(path)))
    }

    /// Parse and validate configuration text read from `path`
    pub fn parse(contents: &str, path: &Path) -> ConfigResult<Self> {
        let config: Self = toml::from_str(contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: format!("Error parsing configuration file {}: {}", path.display(), e),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.bridge.frame_prefix.is_empty() {
            return Err(ConfigError::Invalid {
                message: "bridge.frame_prefix must not be empty".to_string(),
            });
        }

        if let Some(format) = &self.logging.format {
            if LogFormat::from_str(format).is_err() {
                return Err(ConfigError::Invalid {
                    message: format!(
                        "Unknown log format '{}': expected text, ext or json",
                        format
                    ),
                });
            }
        }

        let mut seen = HashSet::new();
        for plugin in &self.plugins {
            if !PLUGIN_NAME.is_match(&plugin.name) {
                return Err(ConfigError::invalid_plugin_name(&plugin.name));
            }
            if !seen.insert(plugin.name.as_str()) {
                return Err(ConfigError::Invalid {
                    message: format!("Plugin '{}' is listed more than once", plugin.name),
                });
            }
            if let Some(event) = plugin.veto.iter().find(|event| event.trim().is_empty()) {
                return Err(ConfigError::Invalid {
                    message: format!(
                        "Plugin '{}' has an empty veto event '{}'",
                        plugin.name, event
                    ),
                });
            }
        }

        Ok(())
    }
}
