//! Runtime configuration for the CLI and live context.
//!
//! Values come from an optional YAML file named by `CID_CONFIG`, then
//! `CID_STORE` overrides the store directory. Every field has a default, so
//! an absent file is not an error.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::context::Viewport;
use crate::origin::{OriginClassifier, DEFAULT_PROXY_SUFFIXES};

/// Environment variable naming a YAML configuration file.
pub const CONFIG_ENV: &str = "CID_CONFIG";
/// Environment variable overriding [`CidConfig::store_dir`].
pub const STORE_ENV: &str = "CID_STORE";

/// Configuration for a live [`crate::context::ServiceContext`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CidConfig {
    /// Host suffixes identifying proxy-served documents.
    pub proxy_suffixes: Vec<String>,
    /// Directory holding `storage.json` and `cookies.json`.
    pub store_dir: PathBuf,
    /// Viewport reported to the weak entropy fallback.
    pub viewport: Viewport,
}

impl Default for CidConfig {
    fn default() -> Self {
        Self {
            proxy_suffixes: DEFAULT_PROXY_SUFFIXES.iter().map(|s| (*s).to_string()).collect(),
            store_dir: PathBuf::from(".clientid"),
            viewport: Viewport::default(),
        }
    }
}

impl CidConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `CID_CONFIG` names a file that cannot be read or parsed.
    pub fn from_env() -> Result<Self, String> {
        let file = env::var(CONFIG_ENV).ok().map(PathBuf::from);
        let store = env::var(STORE_ENV).ok();
        Self::from_sources(file.as_deref(), store.as_deref())
    }

    /// Loads configuration from an optional file plus an optional store override.
    ///
    /// # Errors
    ///
    /// Returns an error if `file` cannot be read or is not valid YAML.
    pub fn from_sources(file: Option<&Path>, store_override: Option<&str>) -> Result<Self, String> {
        let mut config = match file {
            Some(path) => {
                let contents = std::fs::read_to_string(path)
                    .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
                serde_yaml::from_str(&contents)
                    .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?
            }
            None => Self::default(),
        };
        if let Some(dir) = store_override {
            config.store_dir = PathBuf::from(dir);
        }
        Ok(config)
    }

    /// Builds the origin classifier described by this configuration.
    #[must_use]
    pub fn classifier(&self) -> OriginClassifier {
        OriginClassifier::new(self.proxy_suffixes.clone())
    }
}
