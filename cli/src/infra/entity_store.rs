//! Infrastructure implementation of the `EntityStore` port.
//!
//! `EntityFileStore` provides async load/save using `tokio::task::spawn_blocking`
//! with atomic write (temp file + rename) so a crash mid-save never leaves a
//! truncated record behind.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use svcmgr_common::Entity;

use crate::application::ports::EntityStore;

/// Environment variable overriding the entity record location.
pub const ENTITY_ENV: &str = "SVCMGR_ENTITY";

/// On-disk wrapper around the entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRecord {
    pub entity: Entity,
    pub saved_at: DateTime<Utc>,
}

/// Entity record file: implements `EntityStore` for the infra layer.
pub struct EntityFileStore {
    path: PathBuf,
}

impl EntityFileStore {
    /// Create a store at `$SVCMGR_ENTITY`, or `~/.svcmgr/entity.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        if let Ok(val) = std::env::var(ENTITY_ENV) {
            return Ok(Self::with_path(PathBuf::from(val)));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(Self::with_path(home.join(".svcmgr").join("entity.json")))
    }

    /// Create a store with an explicit path.
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_sync(path: &Path) -> Result<Option<Entity>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading entity file {}", path.display()))?;
        let record: EntityRecord = serde_json::from_str(&content)
            .with_context(|| format!("parsing entity file {}", path.display()))?;
        Ok(Some(record.entity))
    }

    fn save_sync(path: &Path, entity: Entity) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
        let record = EntityRecord {
            entity,
            saved_at: Utc::now(),
        };
        let content = serde_json::to_string_pretty(&record).context("serializing entity")?;

        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, &content)
            .with_context(|| format!("writing temp file {}", temp_path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("setting permissions on {}", temp_path.display()))?;
        }

        std::fs::rename(&temp_path, path)
            .with_context(|| format!("finalizing entity file {}", path.display()))
    }
}

impl EntityStore for EntityFileStore {
    async fn load_async(&self) -> Result<Option<Entity>> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || Self::load_sync(&path))
            .await
            .context("entity load task panicked")?
    }

    async fn save_async(&self, entity: &Entity) -> Result<()> {
        let path = self.path.clone();
        let entity = entity.clone();
        tokio::task::spawn_blocking(move || Self::save_sync(&path, entity))
            .await
            .context("entity save task panicked")?
    }
}
