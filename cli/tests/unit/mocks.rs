//! Shared mock infrastructure for unit tests.
//!
//! Every mock appends to a shared [`CallLog`] so tests can assert the order
//! in which ports were called across adapters.

#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;
use svcmgr_cli::application::ports::{
    CloudController, CommandRunner, Credentials, HttpReply, ProgressReporter, ServiceEndpoint,
    StackInspector, VersionControl,
};
use svcmgr_cli::domain::{PublicKey, StackDetails};

use crate::helpers::{err_output, ok_output};

pub type CallLog = Rc<RefCell<Vec<String>>>;

pub fn new_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn calls(log: &CallLog) -> Vec<String> {
    log.borrow().clone()
}

pub const REPO_URI: &str = "ssh://5f1e@srvinst0a.apps.example.org/~/git/srvinst0a.git/";
pub const HOST: &str = "srvinst0a.apps.example.org";
pub const APP_LOCATION: &str = "http://nb.example.org:8888/app/5f1e0c";

// ── Cloud controller ──────────────────────────────────────────────────────────

pub struct MockController {
    pub log: CallLog,
    pub keys: Vec<String>,
    pub location: Option<String>,
    pub attribute_header: Option<String>,
    pub fail_register: bool,
    pub fail_delete: bool,
}

impl MockController {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: Rc::clone(log),
            keys: vec!["/public_key/servicemanager".to_owned()],
            location: Some(APP_LOCATION.to_owned()),
            attribute_header: Some(format!(
                "occi.core.id=\"5f1e0c\", occi.app.repo=\"{REPO_URI}\", occi.app.name=\"srvinst0a\""
            )),
            fail_register: false,
            fail_delete: false,
        }
    }

    fn record(&self, call: String) {
        self.log.borrow_mut().push(call);
    }
}

impl CloudController for MockController {
    async fn public_key_locations(&self) -> Result<Vec<String>> {
        self.record("controller.public_key_locations".to_owned());
        Ok(self.keys.clone())
    }

    async fn register_public_key(&self, key: &PublicKey) -> Result<()> {
        self.record(format!("controller.register_public_key:{}", key.name));
        if self.fail_register {
            anyhow::bail!("register rejected");
        }
        Ok(())
    }

    async fn create_app(&self, name: &str) -> Result<Option<String>> {
        self.record(format!("controller.create_app:{name}"));
        Ok(self.location.clone())
    }

    async fn app_attribute_header(&self, path: &str) -> Result<Option<String>> {
        self.record(format!("controller.app_attribute_header:{path}"));
        Ok(self.attribute_header.clone())
    }

    async fn delete_app(&self, path: &str, creds: &Credentials) -> Result<()> {
        self.record(format!("controller.delete_app:{path}:{}", creds.tenant));
        if self.fail_delete {
            anyhow::bail!("delete rejected");
        }
        Ok(())
    }
}

// ── Stack inspector ───────────────────────────────────────────────────────────

pub struct MockStacks {
    pub log: CallLog,
    pub details: Option<StackDetails>,
}

impl MockStacks {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: Rc::clone(log),
            details: None,
        }
    }

    pub fn with_details(mut self, details: StackDetails) -> Self {
        self.details = Some(details);
        self
    }
}

impl StackInspector for MockStacks {
    async fn details(&self, stack_path: &str, _creds: &Credentials) -> Result<StackDetails> {
        self.log
            .borrow_mut()
            .push(format!("stacks.details:{stack_path}"));
        self.details
            .clone()
            .ok_or_else(|| anyhow::anyhow!("no stack details configured"))
    }
}

// ── Service endpoint ──────────────────────────────────────────────────────────

pub fn reply(status: u16, body: &str) -> HttpReply {
    HttpReply {
        status,
        body: body.to_owned(),
    }
}

pub struct MockEndpoint {
    pub log: CallLog,
    pub init: HttpReply,
    pub deploy: HttpReply,
    pub dispose: HttpReply,
    pub state: HttpReply,
    /// Every call fails at the connection level.
    pub unreachable: bool,
}

impl MockEndpoint {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: Rc::clone(log),
            init: reply(200, ""),
            deploy: reply(200, "stack-42"),
            dispose: reply(200, ""),
            state: reply(200, "Stack is not deployed atm."),
            unreachable: false,
        }
    }

    fn answer(&self, call: String, reply: &HttpReply) -> Result<HttpReply> {
        self.log.borrow_mut().push(call);
        if self.unreachable {
            anyhow::bail!("connection refused");
        }
        Ok(reply.clone())
    }
}

impl ServiceEndpoint for MockEndpoint {
    async fn init(&self, host: &str, creds: &Credentials) -> Result<HttpReply> {
        self.answer(format!("endpoint.init:{host}:{}", creds.tenant), &self.init)
    }

    async fn deploy(&self, host: &str, creds: &Credentials) -> Result<HttpReply> {
        self.answer(format!("endpoint.deploy:{host}:{}", creds.tenant), &self.deploy)
    }

    async fn dispose(&self, host: &str) -> Result<HttpReply> {
        self.answer(format!("endpoint.dispose:{host}"), &self.dispose)
    }

    async fn state(&self, host: &str, _creds: &Credentials) -> Result<HttpReply> {
        self.answer(format!("endpoint.state:{host}"), &self.state)
    }

    fn endpoint_url(&self, host: &str, path: &str) -> String {
        format!("http://{host}/{path}")
    }
}

// ── Version control ───────────────────────────────────────────────────────────

/// Records git calls. At `push` it snapshots the checkout so tests can check
/// what would have been pushed.
pub struct MockVcs {
    pub log: CallLog,
    /// Sub-command that exits non-zero (`clone`, `add`, `commit`, `push`).
    pub fail_on: Option<&'static str>,
    pub clone_dest: RefCell<Option<PathBuf>>,
    pub pushed: RefCell<Vec<PushedFile>>,
    pub commit_message: RefCell<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushedFile {
    pub path: String,
    pub executable: bool,
}

impl MockVcs {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: Rc::clone(log),
            fail_on: None,
            clone_dest: RefCell::new(None),
            pushed: RefCell::new(Vec::new()),
            commit_message: RefCell::new(None),
        }
    }

    pub fn failing_on(mut self, step: &'static str) -> Self {
        self.fail_on = Some(step);
        self
    }

    fn outcome(&self, step: &'static str) -> Output {
        self.log.borrow_mut().push(format!("git.{step}"));
        if self.fail_on == Some(step) {
            err_output(128, format!("fatal: {step} failed").as_bytes())
        } else {
            ok_output(b"")
        }
    }

    pub fn pushed_paths(&self) -> Vec<String> {
        self.pushed.borrow().iter().map(|f| f.path.clone()).collect()
    }
}

impl VersionControl for MockVcs {
    async fn clone_repo(&self, _url: &str, dest: &Path) -> Result<Output> {
        *self.clone_dest.borrow_mut() = Some(dest.to_path_buf());
        Ok(self.outcome("clone"))
    }

    async fn add_all(&self, _repo: &Path) -> Result<Output> {
        Ok(self.outcome("add"))
    }

    async fn commit_all(&self, _repo: &Path, message: &str) -> Result<Output> {
        *self.commit_message.borrow_mut() = Some(message.to_owned());
        Ok(self.outcome("commit"))
    }

    async fn push(&self, repo: &Path) -> Result<Output> {
        let mut files = Vec::new();
        snapshot(repo, repo, &mut files);
        files.sort_by(|a, b| a.path.cmp(&b.path));
        *self.pushed.borrow_mut() = files;
        Ok(self.outcome("push"))
    }
}

fn snapshot(root: &Path, dir: &Path, out: &mut Vec<PushedFile>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            snapshot(root, &path, out);
            continue;
        }
        let rel = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .to_string_lossy()
            .replace('\\', "/");
        out.push(PushedFile {
            path: rel,
            executable: is_executable(&path),
        });
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path).is_ok_and(|m| m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    true
}

// ── Command runner ────────────────────────────────────────────────────────────

/// Records every invocation and answers with a canned output.
pub struct RecordingRunner {
    pub invocations: RefCell<Vec<(String, Vec<String>, Option<Duration>)>>,
    pub output: fn() -> Result<Output>,
}

impl RecordingRunner {
    pub fn succeeding() -> Self {
        Self {
            invocations: RefCell::new(Vec::new()),
            output: || Ok(ok_output(b"git version 2.43.0\n")),
        }
    }

    pub fn exiting_non_zero() -> Self {
        Self {
            invocations: RefCell::new(Vec::new()),
            output: || Ok(err_output(127, b"git: command not found")),
        }
    }

    pub fn unspawnable() -> Self {
        Self {
            invocations: RefCell::new(Vec::new()),
            output: || Err(anyhow::anyhow!("failed to spawn git")),
        }
    }

    pub fn args_of(&self, index: usize) -> Vec<String> {
        self.invocations.borrow()[index].1.clone()
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.invocations.borrow_mut().push((
            program.to_owned(),
            args.iter().map(|a| (*a).to_owned()).collect(),
            None,
        ));
        (self.output)()
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        self.invocations.borrow_mut().push((
            program.to_owned(),
            args.iter().map(|a| (*a).to_owned()).collect(),
            Some(timeout),
        ));
        (self.output)()
    }
}

impl CommandRunner for &RecordingRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        (**self).run(program, args).await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        (**self).run_with_timeout(program, args, timeout).await
    }
}

// ── Progress reporter ─────────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingReporter {
    pub events: RefCell<Vec<String>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.events.borrow_mut().push(format!("step: {message}"));
    }

    fn success(&self, message: &str) {
        self.events.borrow_mut().push(format!("ok: {message}"));
    }

    fn warn(&self, message: &str) {
        self.events.borrow_mut().push(format!("warn: {message}"));
    }
}
