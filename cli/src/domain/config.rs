//! Domain types and validators for svcmgr configuration.
//!
//! Pure functions only; nothing here touches I/O.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::{ConfigError, LifecycleError};

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "cloud_controller.nb_api",
    "service_manager.bundle_location",
    "service_manager.ssh_key_location",
    "service_manager.design_uri",
    "service_manager.work_dir",
    "timeouts.http_secs",
    "timeouts.git_secs",
];

const DEFAULT_HTTP_SECS: u64 = 30;
const DEFAULT_GIT_SECS: u64 = 600;

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.svcmgr/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct SvcmgrConfig {
    pub cloud_controller: CloudControllerConfig,
    pub service_manager: ServiceManagerConfig,
    pub timeouts: TimeoutConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct CloudControllerConfig {
    /// Northbound API base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nb_api: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ServiceManagerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_key_location: Option<String>,
    /// Base URL of the stack details endpoint. Falls back to `nb_api`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub design_uri: Option<String>,
    /// Parent directory for scratch clones. System temp dir when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeoutConfig {
    #[serde(default = "default_http_secs")]
    pub http_secs: u64,
    #[serde(default = "default_git_secs")]
    pub git_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            http_secs: default_http_secs(),
            git_secs: default_git_secs(),
        }
    }
}

fn default_http_secs() -> u64 {
    DEFAULT_HTTP_SECS
}

fn default_git_secs() -> u64 {
    DEFAULT_GIT_SECS
}

/// Configuration with every required value present and normalised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub nb_api: String,
    pub design_uri: String,
    pub bundle_location: PathBuf,
    pub ssh_key_location: PathBuf,
    pub work_dir: Option<PathBuf>,
    pub http_timeout: Duration,
    pub git_timeout: Duration,
}

impl SvcmgrConfig {
    /// Check required values and normalise URLs.
    ///
    /// `~/` prefixes in paths are expanded against `home`.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Configuration`] naming every missing key,
    /// or the first timeout that is zero.
    pub fn resolve(&self, home: Option<&std::path::Path>) -> Result<ResolvedConfig, LifecycleError> {
        fn present(v: &Option<String>) -> Option<&str> {
            v.as_deref().map(str::trim).filter(|s| !s.is_empty())
        }

        let nb_api = present(&self.cloud_controller.nb_api);
        let bundle = present(&self.service_manager.bundle_location);
        let key = present(&self.service_manager.ssh_key_location);

        let missing: Vec<&str> = [
            ("cloud_controller.nb_api", nb_api.is_none()),
            ("service_manager.bundle_location", bundle.is_none()),
            ("service_manager.ssh_key_location", key.is_none()),
        ]
        .into_iter()
        .filter_map(|(k, absent)| absent.then_some(k))
        .collect();

        let (Some(nb_api), Some(bundle), Some(key)) = (nb_api, bundle, key) else {
            return Err(LifecycleError::Configuration(format!(
                "missing required setting(s): {}",
                missing.join(", ")
            )));
        };

        for (key, secs) in [
            ("timeouts.http_secs", self.timeouts.http_secs),
            ("timeouts.git_secs", self.timeouts.git_secs),
        ] {
            if secs == 0 {
                return Err(LifecycleError::Configuration(format!(
                    "{key} must be a positive number of seconds"
                )));
            }
        }

        let nb_api = scrub_trailing_slash(nb_api);
        let design_uri = present(&self.service_manager.design_uri)
            .map_or_else(|| nb_api.clone(), scrub_trailing_slash);

        Ok(ResolvedConfig {
            design_uri,
            nb_api,
            bundle_location: expand_home(bundle, home),
            ssh_key_location: expand_home(key, home),
            work_dir: present(&self.service_manager.work_dir).map(|w| expand_home(w, home)),
            http_timeout: Duration::from_secs(self.timeouts.http_secs),
            git_timeout: Duration::from_secs(self.timeouts.git_secs),
        })
    }

    /// Assign a dotted key.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for unknown keys or invalid values.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_config_key(key)?;
        validate_config_value(key, value)?;
        let text = Some(value.to_owned());
        match key {
            "cloud_controller.nb_api" => self.cloud_controller.nb_api = text,
            "service_manager.bundle_location" => self.service_manager.bundle_location = text,
            "service_manager.ssh_key_location" => self.service_manager.ssh_key_location = text,
            "service_manager.design_uri" => self.service_manager.design_uri = text,
            "service_manager.work_dir" => self.service_manager.work_dir = text,
            "timeouts.http_secs" => self.timeouts.http_secs = parse_secs(key, value)?,
            "timeouts.git_secs" => self.timeouts.git_secs = parse_secs(key, value)?,
            _ => {}
        }
        Ok(())
    }
}

fn scrub_trailing_slash(url: &str) -> String {
    url.trim_end_matches('/').to_owned()
}

fn expand_home(path: &str, home: Option<&std::path::Path>) -> PathBuf {
    match (path.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

fn parse_secs(key: &str, value: &str) -> Result<u64> {
    match value.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_owned(),
            value: value.to_owned(),
            expected: "a positive number of seconds".to_owned(),
        }
        .into()),
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    match key {
        "cloud_controller.nb_api" | "service_manager.design_uri" => {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                    expected: "an http:// or https:// URL".to_owned(),
                }
                .into());
            }
        }
        "timeouts.http_secs" | "timeouts.git_secs" => {
            parse_secs(key, value)?;
        }
        _ if value.trim().is_empty() => {
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
                expected: "a non-empty path".to_owned(),
            }
            .into());
        }
        _ => {}
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
