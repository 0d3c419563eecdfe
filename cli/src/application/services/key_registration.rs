//! Application service: SSH key registration use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{CloudController, LocalFs};
use crate::domain::error::LifecycleError;
use crate::domain::ssh::parse_public_key;

/// Outcome of [`ensure_registered`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The controller already lists at least one key; nothing was sent.
    AlreadyRegistered { count: usize },
    /// The configured key was registered under `name`.
    Registered { name: String },
}

/// Make sure the controller holds a public key before any git push.
///
/// The list-then-register sequence is not atomic: two concurrent callers can
/// both observe an empty list and both register.
///
/// # Errors
///
/// - [`LifecycleError::Configuration`] if the key file cannot be read.
/// - [`LifecycleError::UnsupportedKeyType`] for DSA or malformed keys.
/// - Transport errors from the controller.
pub async fn ensure_registered(
    controller: &impl CloudController,
    fs: &impl LocalFs,
    key_path: &Path,
) -> Result<KeyOutcome> {
    let existing = controller
        .public_key_locations()
        .await
        .context("listing registered public keys")?;
    if !existing.is_empty() {
        tracing::debug!(count = existing.len(), "public key already registered");
        return Ok(KeyOutcome::AlreadyRegistered {
            count: existing.len(),
        });
    }

    let source = key_path.display().to_string();
    let content = fs.read_to_string(key_path).map_err(|e| {
        LifecycleError::Configuration(format!("cannot read SSH key file {source}: {e:#}"))
    })?;
    let key = parse_public_key(&source, &content)?;

    tracing::info!(key_name = %key.name, "registering public key");
    controller
        .register_public_key(&key)
        .await
        .context("registering public key")?;

    Ok(KeyOutcome::Registered { name: key.name })
}
