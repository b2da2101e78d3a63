//! Generator configuration

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// File name looked up by [`Config::discover`].
pub const CONFIG_FILE: &str = "sqlts.toml";

/// Options threaded through every stage of the pipeline.
///
/// The pipeline itself only reads `template`. Everything else belongs to the
/// resolver and the template, which see the whole record unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Nest generated names under a namespace matching the schema
    #[serde(default)]
    pub schema_as_namespace: bool,

    /// User template overriding the bundled default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,

    /// Interface name pattern, `${table}` is replaced by the table name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface_name_format: Option<String>,

    /// Source type → target type overrides
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub type_map: BTreeMap<String, String>,

    /// Anything else, forwarded untouched to resolvers and templates
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Config {
    /// Create a new configuration builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// The user template path, if one is set and non-empty.
    pub fn template_path(&self) -> Option<&Path> {
        self.template
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Parse a TOML configuration document.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).map_err(|e| Error::config(e.to_string()))
    }

    /// Parse a JSON configuration document.
    pub fn from_json_str(input: &str) -> Result<Self> {
        serde_json::from_str(input).map_err(|e| Error::config(e.to_string()))
    }

    /// Load configuration from a file (`.json` → JSON, otherwise TOML).
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read {}: {}", path.display(), e)))?;

        if path.extension().map(|e| e == "json").unwrap_or(false) {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// Look for `sqlts.toml` in the working directory, then in the user
    /// config directory. Falls back to defaults when neither exists.
    pub fn discover() -> Result<Self> {
        let local = PathBuf::from(CONFIG_FILE);
        if local.is_file() {
            tracing::debug!("Using config {}", local.display());
            return Self::load(&local);
        }

        if let Some(dir) = dirs::config_dir() {
            let global = dir.join("sqlts").join("config.toml");
            if global.is_file() {
                tracing::debug!("Using config {}", global.display());
                return Self::load(&global);
            }
        }

        Ok(Self::default())
    }
}

/// Builder for Config
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Nest output under schema namespaces
    pub fn schema_as_namespace(mut self, on: bool) -> Self {
        self.config.schema_as_namespace = on;
        self
    }

    /// Set the template path
    pub fn template(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.template = Some(path.into());
        self
    }

    /// Set the interface name pattern
    pub fn interface_name_format(mut self, format: impl Into<String>) -> Self {
        self.config.interface_name_format = Some(format.into());
        self
    }

    /// Map a source type to a target type
    pub fn map_type(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.config.type_map.insert(source.into(), target.into());
        self
    }

    /// Set a pass-through option
    pub fn option(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.config.extra.insert(key.into(), value.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Config {
        self.config
    }
}
