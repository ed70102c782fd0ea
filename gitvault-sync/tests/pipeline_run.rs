//! Full archive runs against a bare repository and a faked hosting service.

mod common;

use std::cell::{Cell, RefCell};
use std::fs;
use std::path::Path;
use std::time::Duration;

use tempfile::TempDir;

use common::{bare_remote, remote_tags, remote_tip};
use gitvault_core::{ArchiveTarget, Identity, Limits, PushOptions};
use gitvault_git::{GitCli, Repository};
use gitvault_hub::{HubError, RemoteHost, TokenInfo};
use gitvault_sync::{archive, SyncError, SyncState, TagAction};

/// Hosting service stand-in: "clone URL" is the bare repository's path, so
/// transport goes over the local filesystem.
struct FakeHost {
    clone_url: String,
    exists: Cell<bool>,
    tags: RefCell<Vec<String>>,
    default_branch: RefCell<Option<String>>,
}

impl FakeHost {
    fn new(bare: &Path) -> Self {
        Self {
            clone_url: bare.to_string_lossy().into_owned(),
            exists: Cell::new(false),
            tags: RefCell::new(Vec::new()),
            default_branch: RefCell::new(None),
        }
    }
}

impl RemoteHost for FakeHost {
    fn verify_token(&self) -> Result<TokenInfo, HubError> {
        Ok(TokenInfo {
            username: "tester".to_string(),
            scopes: vec!["repo".to_string()],
        })
    }

    fn authenticated_user(&self) -> Result<String, HubError> {
        Ok("tester".to_string())
    }

    fn repo_exists(&self, _owner: &str, _repo_name: &str) -> Result<bool, HubError> {
        Ok(self.exists.get())
    }

    fn get_or_create_repo(&self, _repo_name: &str) -> Result<String, HubError> {
        self.exists.set(true);
        Ok(self.clone_url.clone())
    }

    fn set_default_branch(&self, _repo_name: &str, branch: &str) -> Result<bool, HubError> {
        *self.default_branch.borrow_mut() = Some(branch.to_string());
        Ok(true)
    }

    fn list_tags(&self, _owner: &str, _repo_name: &str) -> Result<Vec<String>, HubError> {
        Ok(self.tags.borrow().clone())
    }

    fn authenticated_url(&self, clone_url: &str) -> String {
        clone_url.to_string()
    }
}

fn tiny_limits() -> Limits {
    Limits {
        max_file_bytes: 90,
        max_total_bytes: 360,
        max_batch_bytes: 300,
        chunk_part_bytes: 90,
    }
}

fn options() -> PushOptions {
    PushOptions {
        remote_name: "origin".to_string(),
        cooldown: Duration::ZERO,
    }
}

fn target(version: &str) -> ArchiveTarget {
    ArchiveTarget {
        name: "demo".to_string(),
        version: version.to_string(),
        channel: "pc".to_string(),
    }
}

#[test]
fn first_run_chunks_commits_pushes_and_tags() {
    let bare = bare_remote();
    let host = FakeHost::new(bare.path());
    let work = TempDir::new().unwrap();
    fs::write(work.path().join("small.bin"), vec![1u8; 10]).unwrap();
    fs::write(work.path().join("big.bin"), vec![2u8; 250]).unwrap();

    let repo = GitCli::open(work.path()).unwrap();
    let report = archive(
        &repo,
        &host,
        &target("1.0"),
        &tiny_limits(),
        &Identity::default(),
        &options(),
    )
    .unwrap();

    assert_eq!(report.sync_state, SyncState::NoRemote);
    assert_eq!(report.chunked_files, vec!["big.bin"]);
    assert_eq!(report.commits_created, report.commits_pushed);
    assert!(report.commits_created >= 1);
    assert_eq!(report.tag, "v1.0-pc");
    assert_eq!(report.tag_action, TagAction::Created);

    // The oversized file was replaced by its parts plus the restore marker.
    assert!(!work.path().join("big.bin").exists());
    assert_eq!(fs::metadata(work.path().join("big.bin.gc.001")).unwrap().len(), 90);
    assert_eq!(fs::metadata(work.path().join("big.bin.gc.002")).unwrap().len(), 90);
    assert_eq!(fs::metadata(work.path().join("big.bin.gc.003")).unwrap().len(), 70);
    assert!(work.path().join("GITVAULT_RESTORE.txt").exists());

    // Everything landed upstream.
    let head = repo.head().unwrap().unwrap();
    assert_eq!(remote_tip(bare.path()), Some(head.0));
    assert!(remote_tags(bare.path()).contains(&"v1.0-pc".to_string()));
    assert_eq!(host.default_branch.borrow().as_deref(), Some("platform/pc"));
    assert!(repo.status().unwrap().is_clean());
}

#[test]
fn rerun_without_changes_is_idempotent() {
    let bare = bare_remote();
    let host = FakeHost::new(bare.path());
    let work = TempDir::new().unwrap();
    fs::write(work.path().join("small.bin"), vec![1u8; 10]).unwrap();

    let repo = GitCli::open(work.path()).unwrap();
    let limits = tiny_limits();
    let identity = Identity::default();
    archive(&repo, &host, &target("1.0"), &limits, &identity, &options()).unwrap();

    host.tags.borrow_mut().push("v1.0-pc".to_string());
    let report =
        archive(&repo, &host, &target("1.0"), &limits, &identity, &options()).unwrap();

    assert_eq!(report.sync_state, SyncState::Equal);
    assert_eq!(report.commits_created, 0);
    assert_eq!(report.tag_action, TagAction::Unchanged);
}

#[test]
fn new_version_archives_incrementally_and_creates_its_tag() {
    let bare = bare_remote();
    let host = FakeHost::new(bare.path());
    let work = TempDir::new().unwrap();
    fs::write(work.path().join("small.bin"), vec![1u8; 10]).unwrap();

    let repo = GitCli::open(work.path()).unwrap();
    let limits = tiny_limits();
    let identity = Identity::default();
    archive(&repo, &host, &target("1.0"), &limits, &identity, &options()).unwrap();
    host.tags.borrow_mut().push("v1.0-pc".to_string());

    fs::write(work.path().join("small.bin"), vec![9u8; 20]).unwrap();
    let report =
        archive(&repo, &host, &target("1.1"), &limits, &identity, &options()).unwrap();

    assert_eq!(report.sync_state, SyncState::Equal);
    assert_eq!(report.commits_created, 1);
    assert_eq!(report.tag, "v1.1-pc");
    assert_eq!(report.tag_action, TagAction::Created);
    assert!(remote_tags(bare.path()).contains(&"v1.1-pc".to_string()));
}

#[test]
fn invalid_file_aborts_the_run_before_any_commit() {
    let bare = bare_remote();
    let host = FakeHost::new(bare.path());
    let work = TempDir::new().unwrap();
    fs::write(work.path().join("small.bin"), vec![1u8; 10]).unwrap();
    fs::write(work.path().join("huge.bin"), vec![2u8; 400]).unwrap();

    let repo = GitCli::open(work.path()).unwrap();
    let err = archive(
        &repo,
        &host,
        &target("1.0"),
        &tiny_limits(),
        &Identity::default(),
        &options(),
    )
    .unwrap_err();

    match err {
        SyncError::InvalidFiles(files) => {
            assert_eq!(files.len(), 1);
            assert_eq!(files[0].path, "huge.bin");
            assert_eq!(files[0].size, 400);
        }
        other => panic!("expected invalid-files error, got {other}"),
    }
    assert!(repo.head().unwrap().is_none());
    assert_eq!(remote_tip(bare.path()), None);
    assert!(work.path().join("huge.bin").exists(), "nothing was mutated");
}

#[test]
fn version_regression_aborts_before_touching_the_repository() {
    let bare = bare_remote();
    let host = FakeHost::new(bare.path());
    host.exists.set(true);
    host.tags.borrow_mut().push("v2.0-pc".to_string());

    let work = TempDir::new().unwrap();
    fs::write(work.path().join("small.bin"), vec![1u8; 10]).unwrap();

    let repo = GitCli::open(work.path()).unwrap();
    let err = archive(
        &repo,
        &host,
        &target("1.0"),
        &tiny_limits(),
        &Identity::default(),
        &options(),
    )
    .unwrap_err();

    assert!(matches!(err, SyncError::Regression { .. }));
    assert!(repo.head().unwrap().is_none());
    assert_eq!(remote_tip(bare.path()), None);
}

#[test]
fn regression_on_another_channel_does_not_block() {
    let bare = bare_remote();
    let host = FakeHost::new(bare.path());
    host.exists.set(true);
    host.tags.borrow_mut().push("v2.0-linux".to_string());

    let work = TempDir::new().unwrap();
    fs::write(work.path().join("small.bin"), vec![1u8; 10]).unwrap();

    let repo = GitCli::open(work.path()).unwrap();
    let report = archive(
        &repo,
        &host,
        &target("1.0"),
        &tiny_limits(),
        &Identity::default(),
        &options(),
    )
    .unwrap();
    assert_eq!(report.tag, "v1.0-pc");
}
