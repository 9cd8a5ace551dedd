//! Configuration loading and management

use crate::core::error::ConfigError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default listen address of the HTTP server
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Connection settings for the backend
#[derive(Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base url, e.g. `https://erp.example.com`
    pub url: String,

    /// Database name
    pub database: String,

    /// Login used for the single startup authentication
    pub username: String,

    /// Password or API key
    #[serde(default)]
    pub password: String,

    /// Transport timeout per HTTP request; none by default
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("url", &self.url)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"***")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

/// Complete configuration of the bridge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    pub remote: RemoteConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

impl BridgeConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file '{}'", path))?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Replace file values with `ERP_BRIDGE_*` environment variables
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Replace values with whatever `lookup` returns for the `ERP_BRIDGE_*` keys
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let targets: [(&str, &mut String); 5] = [
            ("ERP_BRIDGE_URL", &mut self.remote.url),
            ("ERP_BRIDGE_DATABASE", &mut self.remote.database),
            ("ERP_BRIDGE_USERNAME", &mut self.remote.username),
            ("ERP_BRIDGE_PASSWORD", &mut self.remote.password),
            ("ERP_BRIDGE_BIND", &mut self.server.bind),
        ];
        for (key, target) in targets {
            if let Some(value) = lookup(key) {
                tracing::debug!(key, "config value overridden from environment");
                *target = value;
            }
        }
    }

    /// Check the values needed to reach the backend
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("remote.url", &self.remote.url),
            ("remote.database", &self.remote.database),
            ("remote.username", &self.remote.username),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: field.to_string(),
                    context: "bridge configuration".to_string(),
                });
            }
        }

        if !(self.remote.url.starts_with("http://") || self.remote.url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "remote.url".to_string(),
                value: self.remote.url.clone(),
                message: "must start with http:// or https://".to_string(),
            });
        }

        if self.server.bind.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "server.bind".to_string(),
                context: "bridge configuration".to_string(),
            });
        }

        Ok(())
    }
}
