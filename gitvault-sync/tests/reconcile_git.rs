//! Sync-state scenarios against real repositories.

mod common;

use std::fs;

use tempfile::TempDir;

use common::{bare_remote, commit_file, open_repo, seed_remote, BRANCH};
use gitvault_git::Repository;
use gitvault_sync::{reconcile, SyncState};

#[test]
fn missing_remote_branch_is_no_remote() {
    let bare = bare_remote();
    let tmp = TempDir::new().unwrap();
    let repo = open_repo(tmp.path());
    let head = commit_file(&repo, "a.txt", b"1");

    let url = bare.path().to_string_lossy().into_owned();
    let state = reconcile(&repo, &url, BRANCH).unwrap();

    assert_eq!(state, SyncState::NoRemote);
    assert_eq!(repo.head().unwrap(), Some(head), "no action taken");
}

#[test]
fn matching_heads_are_equal() {
    let bare = bare_remote();
    let tmp = TempDir::new().unwrap();
    let repo = open_repo(tmp.path());
    let head = commit_file(&repo, "a.txt", b"1");
    let url = bare.path().to_string_lossy().into_owned();
    seed_remote(&repo, &url, &head);

    let state = reconcile(&repo, &url, BRANCH).unwrap();
    assert_eq!(state, SyncState::Equal);
    assert_eq!(repo.head().unwrap(), Some(head));
}

#[test]
fn unpushed_local_commits_are_ahead() {
    let bare = bare_remote();
    let tmp = TempDir::new().unwrap();
    let repo = open_repo(tmp.path());
    let first = commit_file(&repo, "a.txt", b"1");
    let url = bare.path().to_string_lossy().into_owned();
    seed_remote(&repo, &url, &first);
    let second = commit_file(&repo, "b.txt", b"2");

    let state = reconcile(&repo, &url, BRANCH).unwrap();
    assert_eq!(state, SyncState::Ahead);
    assert_eq!(repo.head().unwrap(), Some(second), "resume, no reset");
}

#[test]
fn behind_fast_forwards_to_the_remote_tip() {
    let bare = bare_remote();
    let tmp = TempDir::new().unwrap();
    let repo = open_repo(tmp.path());
    let first = commit_file(&repo, "a.txt", b"1");
    let second = commit_file(&repo, "b.txt", b"2");
    let url = bare.path().to_string_lossy().into_owned();
    seed_remote(&repo, &url, &second);
    repo.reset_hard(&first.0).unwrap();
    assert!(!tmp.path().join("b.txt").exists());

    let state = reconcile(&repo, &url, BRANCH).unwrap();
    assert_eq!(state, SyncState::Behind);
    assert_eq!(repo.head().unwrap(), Some(second));
    assert!(tmp.path().join("b.txt").exists(), "hard reset restores files");
}

#[test]
fn unrelated_histories_diverge_and_adopt_the_remote() {
    let bare = bare_remote();
    let url = bare.path().to_string_lossy().into_owned();

    let upstream_dir = TempDir::new().unwrap();
    let upstream = open_repo(upstream_dir.path());
    let remote_head = commit_file(&upstream, "a.txt", b"1");
    seed_remote(&upstream, &url, &remote_head);

    let local_dir = TempDir::new().unwrap();
    let local = open_repo(local_dir.path());
    commit_file(&local, "local.txt", b"mine");

    let state = reconcile(&local, &url, BRANCH).unwrap();
    assert_eq!(state, SyncState::Diverged);
    assert_eq!(local.head().unwrap(), Some(remote_head));
    assert!(
        local_dir.path().join("local.txt").exists(),
        "working tree survives the soft reset"
    );
}

#[test]
fn empty_local_repository_adopts_remote_history() {
    let bare = bare_remote();
    let url = bare.path().to_string_lossy().into_owned();

    let upstream_dir = TempDir::new().unwrap();
    let upstream = open_repo(upstream_dir.path());
    let remote_head = commit_file(&upstream, "a.txt", b"1");
    seed_remote(&upstream, &url, &remote_head);

    let local_dir = TempDir::new().unwrap();
    let local = open_repo(local_dir.path());
    fs::write(local_dir.path().join("data.bin"), b"untracked").unwrap();

    let state = reconcile(&local, &url, BRANCH).unwrap();
    assert_eq!(state, SyncState::Behind);
    assert_eq!(local.head().unwrap(), Some(remote_head));
    assert!(
        local_dir.path().join("data.bin").exists(),
        "working tree untouched"
    );
}

#[test]
fn ephemeral_sync_remote_does_not_linger() {
    let bare = bare_remote();
    let tmp = TempDir::new().unwrap();
    let repo = open_repo(tmp.path());
    commit_file(&repo, "a.txt", b"1");

    let url = bare.path().to_string_lossy().into_owned();
    reconcile(&repo, &url, BRANCH).unwrap();
    assert!(!repo.has_remote("gv-sync").unwrap());
}
