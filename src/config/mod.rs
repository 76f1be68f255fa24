//! Configuration management for modelgate
//!
//! Layers, lowest priority first:
//! 1. Built-in provider defaults
//! 2. Global config (`<config dir>/modelgate/config.json`)
//! 3. Project config (`./modelgate.json`), which replaces the global file when present
//! 4. Environment variables and CLI parameters (highest priority)

pub mod models;

use std::{
    fs,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use self::models::{ProviderOverride, ProviderSettings, ProviderType};
use crate::error::{GateError, Result};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Gateway listener settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Refuse to build adapters whose credential variable is unset
    #[serde(default)]
    pub require_credentials: bool,

    /// Per-provider endpoint and credential overrides, keyed by provider name
    #[serde(default)]
    pub providers: IndexMap<String, ProviderOverride>,
}

/// HTTP gateway settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind (host:port)
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Deadline for one `/chat` call; unset means no deadline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

fn default_bind() -> String {
    "0.0.0.0:8000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            request_timeout_secs: None,
        }
    }
}

impl Config {
    /// Load configuration from the project file, falling back to the global file
    ///
    /// # Errors
    ///
    /// Returns an error if a present configuration file cannot be read, parsed or validated
    pub fn load() -> Result<Self> {
        let project = Self::project_config_path();
        if project.exists() {
            return Self::load_from_path(&project);
        }
        Self::load_from_path(&Self::global_config_path())
    }

    /// Load configuration from a specific path; a missing file yields defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| GateError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let config: Self =
            serde_json::from_str(&contents).map_err(|e| GateError::ConfigParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        config.validate().map_err(|e| GateError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(config)
    }

    /// Get the configuration directory path
    #[must_use]
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("modelgate")
    }

    /// Get the global config file path
    #[must_use]
    pub fn global_config_path() -> PathBuf {
        Self::config_dir().join("config.json")
    }

    /// Get the project config file path in the current directory
    #[must_use]
    pub fn project_config_path() -> PathBuf {
        PathBuf::from("modelgate.json")
    }

    /// Check that every override names a registered provider
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Configuration`] for an unknown provider key
    pub fn validate(&self) -> Result<()> {
        for name in self.providers.keys() {
            name.parse::<ProviderType>()
                .map_err(|_| GateError::Configuration(format!("unknown provider override: {name}")))?;
        }
        Ok(())
    }

    /// Resolve the settings an adapter for `provider` is built with
    #[must_use]
    pub fn provider_settings(&self, provider: ProviderType) -> ProviderSettings {
        let mut settings = ProviderSettings::new(provider);
        settings.require_credentials = self.require_credentials;

        if let Some(overrides) = self.providers.get(provider.name()) {
            if let Some(base_url) = &overrides.base_url {
                settings = settings.with_base_url(base_url.as_str());
            }
            if let Some(env) = &overrides.api_key_env {
                settings.api_key_env.clone_from(env);
            }
        }

        settings
    }
}
