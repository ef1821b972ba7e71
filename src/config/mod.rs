//
//  bitbucket-ops
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Loading, saving and accessing `bbops` settings stored as TOML in the
//! platform configuration directory.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/bbops/config.toml` (honours `XDG_CONFIG_HOME`)
//! - **macOS**: `~/Library/Application Support/bbops/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\bbops\config\config.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! [credentials]
//! workspace = "acme"
//! username = "jdoe"
//!
//! [api]
//! base_url = "https://api.bitbucket.org/2.0"
//! timeout_secs = 30
//!
//! [batch]
//! continue_on_fail = false
//! ```
//!
//! The secret is never written here; it lives in the system keyring (see
//! [`KeyringStore`](crate::auth::KeyringStore)) or comes from `BBOPS_SECRET`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bitbucket_ops::config::Config;
//!
//! let mut config = Config::load()?;
//! config.set("credentials.workspace", "acme")?;
//! config.save()?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Submodules
//!
//! - [`file`]: Low-level configuration file I/O

mod file;

pub use file::*;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::api::{CLOUD_API_BASE, DEFAULT_TIMEOUT_SECS};

/// Global configuration for `bbops`.
///
/// Every section and key is optional in the file; missing values take their
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Default identity used when no flag or environment variable is given.
    #[serde(default)]
    pub credentials: CredentialConfig,

    /// API endpoint settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Batch run settings.
    #[serde(default)]
    pub batch: BatchConfig,
}

/// The non-secret part of the credential tuple.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CredentialConfig {
    /// Workspace slug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,

    /// Bitbucket username or Atlassian account email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// API endpoint settings.
///
/// # Default Values
///
/// | Field | Default |
/// |-------|---------|
/// | `base_url` | `https://api.bitbucket.org/2.0` |
/// | `timeout_secs` | `30` |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API base URL. Override only for proxies and tests.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    CLOUD_API_BASE.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Batch run settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Keep going past failing records instead of stopping at the first one.
    #[serde(default)]
    pub continue_on_fail: bool,
}

impl Config {
    /// Every key accepted by [`Config::get`] and [`Config::set`].
    pub const KEYS: [&'static str; 5] = [
        "credentials.workspace",
        "credentials.username",
        "api.base_url",
        "api.timeout_secs",
        "batch.continue_on_fail",
    ];

    /// Loads configuration from the default location.
    ///
    /// A missing file is not an error; defaults are returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !config_exists(path) {
            return Ok(Self::default());
        }
        let content = read_config_file(path)?;
        toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Saves the configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Saves the configuration to a specific file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        write_config_file(path, &content)
    }

    /// Returns the path to the configuration file.
    ///
    /// The file may not exist; this only returns where it would be.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", crate::APP_NAME)
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Gets a value by dotted key.
    ///
    /// Returns `None` for unknown keys and for unset optional values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bitbucket_ops::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.get("api.timeout_secs"), Some("30".to_string()));
    /// assert_eq!(config.get("credentials.workspace"), None);
    /// assert_eq!(config.get("unknown"), None);
    /// ```
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "credentials.workspace" => self.credentials.workspace.clone(),
            "credentials.username" => self.credentials.username.clone(),
            "api.base_url" => Some(self.api.base_url.clone()),
            "api.timeout_secs" => Some(self.api.timeout_secs.to_string()),
            "batch.continue_on_fail" => Some(self.batch.continue_on_fail.to_string()),
            _ => None,
        }
    }

    /// Sets a value by dotted key.
    ///
    /// Changes are only persisted when [`Config::save`] is called.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown keys and for values that do not parse
    /// (a non-numeric timeout, a non-boolean flag, an invalid slug).
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "credentials.workspace" => {
                if !crate::util::is_valid_slug(value) {
                    bail!("Invalid workspace slug '{}'", value);
                }
                self.credentials.workspace = Some(value.to_string());
            }
            "credentials.username" => {
                if value.trim().is_empty() {
                    bail!("Username cannot be empty");
                }
                self.credentials.username = Some(value.to_string());
            }
            "api.base_url" => {
                url::Url::parse(value)
                    .with_context(|| format!("Invalid base URL '{}'", value))?;
                self.api.base_url = value.to_string();
            }
            "api.timeout_secs" => {
                let secs: u64 = value
                    .parse()
                    .with_context(|| format!("Invalid timeout '{}'", value))?;
                if secs == 0 {
                    bail!("Timeout must be at least 1 second");
                }
                self.api.timeout_secs = secs;
            }
            "batch.continue_on_fail" => {
                self.batch.continue_on_fail = value
                    .parse()
                    .with_context(|| format!("Expected true or false, got '{}'", value))?;
            }
            _ => bail!(
                "Unknown config key '{}'. Valid keys: {}",
                key,
                Self::KEYS.join(", ")
            ),
        }
        Ok(())
    }
}
