//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and the shared types crate,
//! never from `crate::infra`, `crate::commands`, or `crate::output`.

use std::fmt;
use std::path::Path;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;
use svcmgr_common::Entity;

use crate::domain::{PublicKey, StackDetails, SvcmgrConfig};

// ── Value Types ───────────────────────────────────────────────────────────────

/// Tenant credentials forwarded to the service instance and the controller.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub tenant: String,
}

impl Credentials {
    #[must_use]
    pub fn new(token: impl Into<String>, tenant: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            tenant: tenant.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("tenant", &self.tenant)
            .finish()
    }
}

/// Status and body of a service endpoint call, unclassified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// ── Cloud Controller Ports ────────────────────────────────────────────────────

/// Container and key management on the cloud-resource controller.
///
/// Implementations report non-2xx responses and connection failures as
/// `LifecycleError::Transport`.
#[allow(async_fn_in_trait)]
pub trait CloudController {
    /// Locations of the public keys already registered.
    async fn public_key_locations(&self) -> Result<Vec<String>>;
    /// Register a public key.
    async fn register_public_key(&self, key: &PublicKey) -> Result<()>;
    /// Request a new app container named `name`. Returns the raw `Location`
    /// header, if any.
    async fn create_app(&self, name: &str) -> Result<Option<String>>;
    /// Raw `X-OCCI-Attribute` header of the resource at `path`, if any.
    async fn app_attribute_header(&self, path: &str) -> Result<Option<String>>;
    /// Release the container at `path`.
    async fn delete_app(&self, path: &str, creds: &Credentials) -> Result<()>;
}

/// Deployment details lookup on the design endpoint.
#[allow(async_fn_in_trait)]
pub trait StackInspector {
    async fn details(&self, stack_path: &str, creds: &Credentials) -> Result<StackDetails>;
}

// ── Service Endpoint Port ─────────────────────────────────────────────────────

/// HTTP control actions exposed by a running service instance.
///
/// Implementations return every response as an [`HttpReply`]; callers decide
/// what a status means. Only connection-level failures are errors.
#[allow(async_fn_in_trait)]
pub trait ServiceEndpoint {
    async fn init(&self, host: &str, creds: &Credentials) -> Result<HttpReply>;
    async fn deploy(&self, host: &str, creds: &Credentials) -> Result<HttpReply>;
    async fn dispose(&self, host: &str) -> Result<HttpReply>;
    async fn state(&self, host: &str, creds: &Credentials) -> Result<HttpReply>;
    /// URL of `path` (`action=init`, `state`, ...) on `host`.
    fn endpoint_url(&self, host: &str, path: &str) -> String;
}

// ── Version Control Port ──────────────────────────────────────────────────────

/// Git operations used to push a bundle. Each returns the raw process output;
/// callers check `status.success()`.
#[allow(async_fn_in_trait)]
pub trait VersionControl {
    async fn clone_repo(&self, url: &str, dest: &Path) -> Result<Output>;
    async fn add_all(&self, repo: &Path) -> Result<Output>;
    async fn commit_all(&self, repo: &Path, message: &str) -> Result<Output>;
    async fn push(&self, repo: &Path) -> Result<Output>;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait: no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Local filesystem operations needed to stage a bundle.
pub trait LocalFs {
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn copy_file(&self, from: &Path, to: &Path) -> Result<()>;
    /// Recursively copy `from` onto `to`, overwriting existing files.
    fn copy_tree(&self, from: &Path, to: &Path) -> Result<()>;
    /// Mark every regular file directly under `dir` as executable.
    fn set_executable_all(&self, dir: &Path) -> Result<()>;
}

// ── Persistence Ports ─────────────────────────────────────────────────────────

/// Loads and saves the configuration file.
pub trait ConfigStore {
    fn load(&self) -> Result<SvcmgrConfig>;
    fn save(&self, config: &SvcmgrConfig) -> Result<()>;
    fn path(&self) -> &Path;
}

/// Persists the entity between CLI invocations.
#[allow(async_fn_in_trait)]
pub trait EntityStore {
    /// Load the stored entity, returning `None` if none exists.
    async fn load_async(&self) -> Result<Option<Entity>>;
    /// Persist the given entity.
    async fn save_async(&self, entity: &Entity) -> Result<()>;
}
