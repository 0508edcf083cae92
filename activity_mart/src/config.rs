//! Run configuration: data roots, ledger path, store URL resolution.
//!
//! The run config is TOML. Unknown keys are rejected so a typo fails the
//! run up front instead of silently running with a default. The store URL
//! may live in the config or come from the `DATABASE_URL` environment
//! variable, config winning.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Errors related to resolving the run configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),
    /// A configured path is empty.
    #[error("{0} must not be empty")]
    EmptyPath(&'static str),
}

/// Pipeline run configuration, loaded from a TOML file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Root directory holding catalog source units.
    pub catalog_root: PathBuf,
    /// Root directory holding log-batch source units.
    pub events_root: PathBuf,
    /// Load-ledger file path, created on first open.
    #[serde(default = "default_ledger_path")]
    pub ledger_path: PathBuf,
    /// Store URL; when absent, `DATABASE_URL` must be set.
    pub database_url: Option<String>,
}

fn default_ledger_path() -> PathBuf {
    PathBuf::from("rejected_records.log")
}

impl RunConfig {
    /// Resolve the store URL from the config or the environment.
    pub fn database_url(&self) -> Result<String, ConfigError> {
        if let Some(url) = &self.database_url {
            return Ok(url.clone());
        }
        std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))
    }
}

/// Parse and validate a run config from a TOML string.
pub fn load_config_str(toml_str: &str) -> anyhow::Result<RunConfig> {
    let cfg: RunConfig = toml::from_str(toml_str).context("failed to parse run config TOML")?;
    validate(&cfg)?;
    Ok(cfg)
}

/// Read, parse, and validate a run config file.
pub fn load_config_path(path: impl AsRef<Path>) -> anyhow::Result<RunConfig> {
    let text = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("read run config {}", path.as_ref().display()))?;
    load_config_str(&text)
}

fn validate(cfg: &RunConfig) -> Result<(), ConfigError> {
    if cfg.catalog_root.as_os_str().is_empty() {
        return Err(ConfigError::EmptyPath("catalog_root"));
    }
    if cfg.events_root.as_os_str().is_empty() {
        return Err(ConfigError::EmptyPath("events_root"));
    }
    if cfg.ledger_path.as_os_str().is_empty() {
        return Err(ConfigError::EmptyPath("ledger_path"));
    }
    Ok(())
}
