//! JSON output helpers and renderer.
//!
//! Every `--json` code path prints exactly one pretty-printed document on
//! stdout. Failures use the error object from [`format_error`].

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;
use svcmgr_common::Entity;

use crate::domain::config::SvcmgrConfig;
use crate::domain::stack::{RemoteState, StackDetails};

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// JSON document for a remote state report.
#[must_use]
pub fn remote_state_value(state: &RemoteState) -> serde_json::Value {
    match state {
        RemoteState::Ready(details) => json!({ "state": state.label(), "details": details }),
        RemoteState::Unknown(body) => json!({ "state": state.label(), "body": body }),
        RemoteState::NotDeployed | RemoteState::Deploying => json!({ "state": state.label() }),
    }
}

/// Machine-readable renderer.
pub struct JsonRenderer;

impl JsonRenderer {
    fn print(value: &serde_json::Value) -> Result<()> {
        println!(
            "{}",
            serde_json::to_string_pretty(value).context("JSON serialization failed")?
        );
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_entity(&self, entity: &Entity) -> Result<()> {
        Self::print(&serde_json::to_value(entity).context("serializing entity")?)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_details(&self, entity: &Entity, details: &StackDetails) -> Result<()> {
        Self::print(&json!({ "entity": entity, "stack": details }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_state(&self, state: &RemoteState) -> Result<()> {
        Self::print(&remote_state_value(state))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_config(&self, config: &SvcmgrConfig, path: &Path) -> Result<()> {
        Self::print(&json!({ "path": path.display().to_string(), "config": config }))
    }
}
