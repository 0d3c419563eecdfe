//! Application service: configuration use-cases.

use std::path::Path;

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::config::{ResolvedConfig, SvcmgrConfig};

/// Load configuration.
pub fn load_config(store: &impl ConfigStore) -> Result<SvcmgrConfig> {
    store.load()
}

/// Save configuration.
pub fn save_config(store: &impl ConfigStore, config: &SvcmgrConfig) -> Result<()> {
    store.save(config)
}

/// Validate and persist a single setting, returning the updated config.
///
/// # Errors
///
/// Returns an error if the key or value is invalid, or the file cannot be
/// read or written. Nothing is written on validation failure.
pub fn set_value(store: &impl ConfigStore, key: &str, value: &str) -> Result<SvcmgrConfig> {
    let mut config = store.load()?;
    config.set(key, value)?;
    store.save(&config)?;
    Ok(config)
}

/// Load configuration and check every required setting is present.
///
/// `home` expands `~/` prefixes in configured paths.
///
/// # Errors
///
/// Returns `LifecycleError::Configuration` listing missing settings.
pub fn load_resolved(store: &impl ConfigStore, home: Option<&Path>) -> Result<ResolvedConfig> {
    let config = store.load()?;
    Ok(config.resolve(home)?)
}
