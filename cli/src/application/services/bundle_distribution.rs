//! Application service: bundle distribution use-case.
//!
//! Clones the container's repository into a scratch directory, overlays the
//! local bundle, installs the platform hooks and pushes the result.
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::Result;

use crate::application::ports::{LocalFs, VersionControl};
use crate::domain::error::{DistributionStep, LifecycleError};

/// Commit message of every bundle push.
pub const COMMIT_MESSAGE: &str = "deployment of SO for tenant X";

/// Hook scripts copied from `<bundle>/support/` into the platform hook dir.
pub const HOOK_SCRIPTS: &[&str] = &["build", "pre_start_python"];

const HOOKS_DIR: &str = ".openshift/action_hooks";

/// Where the bundle comes from and where scratch clones go.
#[derive(Debug, Clone)]
pub struct BundleLayout {
    pub bundle_dir: PathBuf,
    /// Parent of the scratch clone. System temp dir when `None`.
    pub work_dir: Option<PathBuf>,
}

/// Push the bundle to `repo_uri`.
///
/// The scratch directory is removed on every path, including failures.
///
/// # Errors
///
/// Returns [`LifecycleError::Distribution`] naming the sub-step that failed.
pub async fn distribute(
    vcs: &impl VersionControl,
    fs: &impl LocalFs,
    layout: &BundleLayout,
    repo_uri: &str,
) -> Result<()> {
    let workspace = scratch_dir(layout.work_dir.as_deref())?;
    let checkout = workspace.path().join("checkout");
    tracing::debug!(%repo_uri, dir = %checkout.display(), "cloning container repository");

    git_step(DistributionStep::Clone, vcs.clone_repo(repo_uri, &checkout).await)?;

    fs.copy_tree(&layout.bundle_dir, &checkout)
        .map_err(|e| LifecycleError::distribution(DistributionStep::Overlay, format!("{e:#}")))?;

    install_hooks(fs, &layout.bundle_dir, &checkout)
        .map_err(|e| LifecycleError::distribution(DistributionStep::Hooks, format!("{e:#}")))?;

    git_step(DistributionStep::Add, vcs.add_all(&checkout).await)?;
    git_step(
        DistributionStep::Commit,
        vcs.commit_all(&checkout, COMMIT_MESSAGE).await,
    )?;
    tracing::info!(%repo_uri, "pushing bundle; this blocks until the remote build finishes");
    git_step(DistributionStep::Push, vcs.push(&checkout).await)?;

    Ok(())
}

fn scratch_dir(parent: Option<&Path>) -> Result<tempfile::TempDir> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("svcmgr-bundle-");
    let dir = match parent {
        Some(p) => builder.tempdir_in(p),
        None => builder.tempdir(),
    };
    dir.map_err(|e| LifecycleError::distribution(DistributionStep::Workspace, e.to_string()).into())
}

fn install_hooks(fs: &impl LocalFs, bundle: &Path, checkout: &Path) -> Result<()> {
    let hooks = checkout.join(HOOKS_DIR);
    fs.create_dir_all(&hooks)?;
    let support = bundle.join("support");
    for script in HOOK_SCRIPTS {
        fs.copy_file(&support.join(script), &hooks.join(script))?;
    }
    fs.set_executable_all(&hooks)
}

fn git_step(step: DistributionStep, result: Result<Output>) -> Result<()> {
    let output = result.map_err(|e| LifecycleError::distribution(step, format!("{e:#}")))?;
    if !output.status.success() {
        return Err(LifecycleError::distribution(step, failure_detail(&output)).into());
    }
    Ok(())
}

fn failure_detail(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        format!("git exited with {}", output.status)
    } else {
        stderr.to_owned()
    }
}
