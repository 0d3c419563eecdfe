//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator. Callers classify failures with
//! `err.downcast_ref::<LifecycleError>()`.

use std::fmt;

use svcmgr_common::{LifecyclePhase, TransitionError};
use thiserror::Error;

// ── Lifecycle errors ──────────────────────────────────────────────────────────

/// Sub-step of bundle distribution that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistributionStep {
    Workspace,
    Clone,
    Overlay,
    Hooks,
    Add,
    Commit,
    Push,
}

impl fmt::Display for DistributionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Workspace => "workspace",
            Self::Clone => "clone",
            Self::Overlay => "overlay",
            Self::Hooks => "hooks",
            Self::Add => "add",
            Self::Commit => "commit",
            Self::Push => "push",
        };
        f.write_str(name)
    }
}

/// Failures of the provisioning/deployment pipeline.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unsupported SSH key in {path}: {reason}")]
    UnsupportedKeyType { path: String, reason: String },

    #[error("Provisioning failed: {0}")]
    Provisioning(String),

    #[error("Bundle distribution failed during {step}: {detail}")]
    Distribution {
        step: DistributionStep,
        detail: String,
    },

    #[error("Service instance init failed at {url}: {detail}")]
    RemoteInit { url: String, detail: String },

    #[error("Service instance at {host} was not initialised with token and tenant; deploy aborted")]
    Deployment { host: String },

    #[error("Service instance dispose failed at {url}: {detail}")]
    RemoteDispose { url: String, detail: String },

    #[error("{method} {url} failed: {detail}")]
    Transport {
        method: &'static str,
        url: String,
        status: Option<u16>,
        detail: String,
    },

    #[error("Invalid lifecycle transition: {from} -> {to}")]
    InvalidTransition {
        from: LifecyclePhase,
        to: LifecyclePhase,
    },
}

impl LifecycleError {
    /// Stable machine-readable code, used by `--json` error output.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration_error",
            Self::UnsupportedKeyType { .. } => "unsupported_key_type",
            Self::Provisioning(_) => "provisioning_error",
            Self::Distribution { .. } => "distribution_error",
            Self::RemoteInit { .. } => "remote_init_error",
            Self::Deployment { .. } => "deployment_error",
            Self::RemoteDispose { .. } => "remote_dispose_error",
            Self::Transport { .. } => "transport_error",
            Self::InvalidTransition { .. } => "invalid_transition",
        }
    }

    pub fn provisioning(msg: impl Into<String>) -> Self {
        Self::Provisioning(msg.into())
    }

    pub fn distribution(step: DistributionStep, detail: impl Into<String>) -> Self {
        Self::Distribution {
            step,
            detail: detail.into(),
        }
    }
}

impl From<TransitionError> for LifecycleError {
    fn from(err: TransitionError) -> Self {
        Self::InvalidTransition {
            from: err.from,
            to: err.to,
        }
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\nExpected: {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },
}

// ── Attribute header errors ───────────────────────────────────────────────────

/// Malformed `key="value", ...` attribute header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttributeHeaderError {
    #[error("attribute at offset {offset} has no '='")]
    MissingEquals { offset: usize },

    #[error("attribute at offset {offset} has an invalid key '{key}'")]
    InvalidKey { offset: usize, key: String },

    #[error("unterminated quoted value for '{key}'")]
    UnterminatedQuote { key: String },

    #[error("unexpected '{found}' after quoted value for '{key}'")]
    TrailingGarbage { key: String, found: char },
}
