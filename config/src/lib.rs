//! Configuration loading for notnull.
//!
//! The only setting is the process-wide violation policy:
//!
//! ```toml
//! [contract]
//! on_violation = "raise"   # terminate | raise | ignore
//! ```
//!
//! The file lives at `$NOTNULL_CONFIG` or `~/.notnull/config.toml`. The
//! `NOTNULL_ON_VIOLATION` environment variable overrides it.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use notnull_types::ViolationPolicy;

/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "NOTNULL_CONFIG";
/// Overrides the configured violation policy.
pub const POLICY_ENV: &str = "NOTNULL_ON_VIOLATION";

#[derive(Debug, Default, Deserialize)]
pub struct NotNullConfig {
    pub contract: Option<ContractConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContractConfig {
    /// What a run-time contract violation does. Default: terminate.
    pub on_violation: Option<ViolationPolicy>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

impl NotNullConfig {
    /// Load the config from [`config_path`]. A missing file is `Ok(None)`.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match Self::parse(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    #[must_use]
    pub fn policy(&self) -> Option<ViolationPolicy> {
        self.contract.as_ref().and_then(|contract| contract.on_violation)
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    match env::var_os(CONFIG_PATH_ENV) {
        Some(raw) if !raw.is_empty() => Some(PathBuf::from(raw)),
        _ => dirs::home_dir().map(|home| home.join(".notnull").join("config.toml")),
    }
}

/// The policy named by `NOTNULL_ON_VIOLATION`, if set and valid.
#[must_use]
pub fn policy_from_env() -> Option<ViolationPolicy> {
    let raw = env::var(POLICY_ENV).ok()?;
    parse_policy_override(&raw)
}

/// Parse an override value. Blank means "not set"; anything unrecognized is
/// logged and ignored so a typo falls back to the file or the default.
#[must_use]
pub fn parse_policy_override(raw: &str) -> Option<ViolationPolicy> {
    if raw.trim().is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(policy) => Some(policy),
        Err(err) => {
            tracing::warn!("Ignoring {POLICY_ENV}: {err}");
            None
        }
    }
}

/// Pick the effective policy: the override, then the config file, then the
/// default.
#[must_use]
pub fn resolve_policy(
    config: Option<&NotNullConfig>,
    override_policy: Option<ViolationPolicy>,
) -> ViolationPolicy {
    override_policy
        .or_else(|| config.and_then(NotNullConfig::policy))
        .unwrap_or_default()
}
