//! Infrastructure implementation of the `VersionControl` port over the
//! system `git` binary.

use std::path::Path;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::application::ports::{CommandRunner, VersionControl};
use crate::domain::error::LifecycleError;

/// `git` driven through a [`CommandRunner`]. Every sub-command is bounded by
/// `timeout`.
pub struct GitCli<R> {
    runner: R,
    timeout: Duration,
}

impl<R: CommandRunner> GitCli<R> {
    /// Build a client after checking that `git` can be executed.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Configuration`] if `git --version` cannot be
    /// run or fails.
    pub async fn probe(runner: R, timeout: Duration) -> Result<Self> {
        match runner.run("git", &["--version"]).await {
            Ok(out) if out.status.success() => {
                tracing::debug!(version = %String::from_utf8_lossy(&out.stdout).trim(), "git found");
                Ok(Self { runner, timeout })
            }
            Ok(out) => Err(LifecycleError::Configuration(format!(
                "git is not usable: `git --version` exited with {}",
                out.status
            ))
            .into()),
            Err(e) => Err(LifecycleError::Configuration(format!(
                "git is required but could not be run: {e:#}"
            ))
            .into()),
        }
    }

    async fn git_in(&self, repo: &Path, args: &[&str]) -> Result<Output> {
        let dir = repo.to_string_lossy();
        let mut full = vec!["-C", dir.as_ref()];
        full.extend_from_slice(args);
        self.runner.run_with_timeout("git", &full, self.timeout).await
    }
}

impl<R: CommandRunner> VersionControl for GitCli<R> {
    async fn clone_repo(&self, url: &str, dest: &Path) -> Result<Output> {
        let dest = dest.to_string_lossy();
        self.runner
            .run_with_timeout("git", &["clone", "--quiet", url, dest.as_ref()], self.timeout)
            .await
    }

    async fn add_all(&self, repo: &Path) -> Result<Output> {
        self.git_in(repo, &["add", "-A"]).await
    }

    async fn commit_all(&self, repo: &Path, message: &str) -> Result<Output> {
        self.git_in(repo, &["commit", "-a", "-m", message]).await
    }

    async fn push(&self, repo: &Path) -> Result<Output> {
        self.git_in(repo, &["push"]).await
    }
}
