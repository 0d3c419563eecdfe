//! `svcmgr show`: print the recorded entity without contacting anything.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::commands::load_entity;

/// Run `svcmgr show`.
///
/// # Errors
///
/// Returns an error if no entity is recorded.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let entity = load_entity(app).await?;
    app.renderer().render_entity(&entity)?;
    Ok(ExitCode::SUCCESS)
}
