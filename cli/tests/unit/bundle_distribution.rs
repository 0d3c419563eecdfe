//! Tests for pushing a service bundle into a container repository.

use svcmgr_cli::application::services::bundle_distribution::{
    BundleLayout, COMMIT_MESSAGE, distribute,
};
use svcmgr_cli::domain::{DistributionStep, LifecycleError};
use svcmgr_cli::infra::fs::StdFs;

use crate::helpers::bundle_dir;
use crate::mocks::{MockVcs, REPO_URI, calls, new_log};

fn failed_step(err: &anyhow::Error) -> Option<DistributionStep> {
    match err.downcast_ref::<LifecycleError>() {
        Some(LifecycleError::Distribution { step, .. }) => Some(*step),
        _ => None,
    }
}

#[tokio::test]
async fn test_distribute_overlays_bundle_and_installs_hooks() {
    let log = new_log();
    let vcs = MockVcs::new(&log);
    let bundle = bundle_dir();
    let layout = BundleLayout {
        bundle_dir: bundle.path().to_path_buf(),
        work_dir: None,
    };

    distribute(&vcs, &StdFs, &layout, REPO_URI)
        .await
        .expect("distributed");

    assert_eq!(calls(&log), vec!["git.clone", "git.add", "git.commit", "git.push"]);
    assert_eq!(vcs.commit_message.borrow().as_deref(), Some(COMMIT_MESSAGE));

    let pushed = vcs.pushed.borrow();
    let paths: Vec<&str> = pushed.iter().map(|f| f.path.as_str()).collect();
    assert!(paths.contains(&"wsgi/so.py"), "{paths:?}");
    assert!(paths.contains(&"requirements.txt"), "{paths:?}");
    for hook in ["build", "pre_start_python"] {
        let path = format!(".openshift/action_hooks/{hook}");
        let file = pushed
            .iter()
            .find(|f| f.path == path)
            .unwrap_or_else(|| panic!("{path} not pushed: {paths:?}"));
        assert!(file.executable, "{path} is not executable");
    }
}

#[tokio::test]
async fn test_scratch_clone_is_removed_after_push() {
    let log = new_log();
    let vcs = MockVcs::new(&log);
    let bundle = bundle_dir();
    let work = tempfile::tempdir().expect("work dir");
    let layout = BundleLayout {
        bundle_dir: bundle.path().to_path_buf(),
        work_dir: Some(work.path().to_path_buf()),
    };

    distribute(&vcs, &StdFs, &layout, REPO_URI)
        .await
        .expect("distributed");

    let dest = vcs.clone_dest.borrow().clone().expect("clone called");
    assert!(dest.starts_with(work.path()), "{}", dest.display());
    assert!(!dest.exists());
    assert_eq!(std::fs::read_dir(work.path()).expect("list").count(), 0);
}

#[tokio::test]
async fn test_commit_failure_stops_before_push_and_cleans_up() {
    let log = new_log();
    let vcs = MockVcs::new(&log).failing_on("commit");
    let bundle = bundle_dir();
    let work = tempfile::tempdir().expect("work dir");
    let layout = BundleLayout {
        bundle_dir: bundle.path().to_path_buf(),
        work_dir: Some(work.path().to_path_buf()),
    };

    let err = distribute(&vcs, &StdFs, &layout, REPO_URI)
        .await
        .expect_err("commit fails");

    assert_eq!(failed_step(&err), Some(DistributionStep::Commit));
    assert!(err.to_string().contains("fatal: commit failed"));
    assert_eq!(calls(&log), vec!["git.clone", "git.add", "git.commit"]);
    assert_eq!(std::fs::read_dir(work.path()).expect("list").count(), 0);
}

#[tokio::test]
async fn test_clone_failure_is_reported_as_clone_step() {
    let log = new_log();
    let vcs = MockVcs::new(&log).failing_on("clone");
    let bundle = bundle_dir();
    let layout = BundleLayout {
        bundle_dir: bundle.path().to_path_buf(),
        work_dir: None,
    };

    let err = distribute(&vcs, &StdFs, &layout, REPO_URI)
        .await
        .expect_err("clone fails");

    assert_eq!(failed_step(&err), Some(DistributionStep::Clone));
    assert_eq!(calls(&log), vec!["git.clone"]);
}

#[tokio::test]
async fn test_missing_hook_script_fails_hooks_step() {
    let log = new_log();
    let vcs = MockVcs::new(&log);
    let bundle = bundle_dir();
    std::fs::remove_file(bundle.path().join("support").join("pre_start_python")).expect("rm");
    let layout = BundleLayout {
        bundle_dir: bundle.path().to_path_buf(),
        work_dir: None,
    };

    let err = distribute(&vcs, &StdFs, &layout, REPO_URI)
        .await
        .expect_err("hook missing");

    assert_eq!(failed_step(&err), Some(DistributionStep::Hooks));
    assert_eq!(calls(&log), vec!["git.clone"]);
}

#[tokio::test]
async fn test_missing_bundle_dir_fails_overlay_step() {
    let log = new_log();
    let vcs = MockVcs::new(&log);
    let layout = BundleLayout {
        bundle_dir: "/nonexistent/bundle".into(),
        work_dir: None,
    };

    let err = distribute(&vcs, &StdFs, &layout, REPO_URI)
        .await
        .expect_err("no bundle");

    assert_eq!(failed_step(&err), Some(DistributionStep::Overlay));
}

#[tokio::test]
async fn test_unusable_work_dir_fails_workspace_step() {
    let log = new_log();
    let vcs = MockVcs::new(&log);
    let bundle = bundle_dir();
    let layout = BundleLayout {
        bundle_dir: bundle.path().to_path_buf(),
        work_dir: Some("/nonexistent/work".into()),
    };

    let err = distribute(&vcs, &StdFs, &layout, REPO_URI)
        .await
        .expect_err("no work dir");

    assert_eq!(failed_step(&err), Some(DistributionStep::Workspace));
    assert!(calls(&log).is_empty());
}
