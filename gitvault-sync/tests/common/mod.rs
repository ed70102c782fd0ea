//! Shared helpers for git-backed integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

use gitvault_core::Identity;
use gitvault_git::{CommitId, GitCli, Repository};

pub const BRANCH: &str = "platform/pc";

pub fn identity() -> Identity {
    Identity {
        name: "Test User".to_string(),
        email: "test@example.com".to_string(),
    }
}

/// Open (initialising if needed) a repo on the test branch with a local
/// identity configured.
pub fn open_repo(dir: &Path) -> GitCli {
    let repo = GitCli::open(dir).expect("open");
    repo.set_identity(&identity()).expect("identity");
    repo.checkout_branch(BRANCH).expect("branch");
    repo
}

pub fn commit_file(repo: &GitCli, name: &str, content: &[u8]) -> CommitId {
    fs::write(repo.workdir().join(name), content).unwrap();
    repo.stage(&[name.to_string()]).unwrap();
    repo.commit(&format!("add {name}"), &identity()).unwrap()
}

/// A bare repository standing in for the hosted remote.
pub fn bare_remote() -> TempDir {
    let dir = TempDir::new().unwrap();
    let out = Command::new("git")
        .args(["init", "--bare"])
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert!(out.status.success());
    dir
}

/// Publish one commit to the bare remote's branch directly.
pub fn seed_remote(repo: &GitCli, url: &str, commit: &CommitId) {
    repo.push_ref(url, &format!("{commit}:refs/heads/{BRANCH}"), true)
        .unwrap();
}

/// The branch tip recorded in the bare remote, if any.
pub fn remote_tip(bare: &Path) -> Option<String> {
    let out = Command::new("git")
        .args(["rev-parse", "--verify", "--quiet", &format!("refs/heads/{BRANCH}")])
        .current_dir(bare)
        .output()
        .unwrap();
    out.status
        .success()
        .then(|| String::from_utf8_lossy(&out.stdout).trim().to_string())
}

/// Tags present in the bare remote.
pub fn remote_tags(bare: &Path) -> Vec<String> {
    let out = Command::new("git")
        .args(["tag", "--list"])
        .current_dir(bare)
        .output()
        .unwrap();
    String::from_utf8_lossy(&out.stdout)
        .lines()
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Subject line of the repo's current head commit.
pub fn head_subject(dir: &Path) -> String {
    let out = Command::new("git")
        .args(["log", "-1", "--format=%s"])
        .current_dir(dir)
        .output()
        .unwrap();
    String::from_utf8_lossy(&out.stdout).trim().to_string()
}
