//! `git`-binary implementation of [`Repository`].

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use gitvault_core::Identity;

use crate::error::GitError;
use crate::repo::{CommitId, Repository};
use crate::status::{parse_porcelain, RepoStatus};

/// Shell-out backend over the `git` binary in a fixed working directory.
#[derive(Debug)]
pub struct GitCli {
    work_dir: PathBuf,
}

impl GitCli {
    /// Open the repository at `work_dir`, initialising it when no `.git`
    /// directory exists yet.
    pub fn open(work_dir: impl Into<PathBuf>) -> Result<Self, GitError> {
        let repo = Self {
            work_dir: work_dir.into(),
        };
        if repo.work_dir.join(".git").exists() {
            repo.ensure_trusted()?;
        } else {
            info!("initialising new repository at {}", repo.work_dir.display());
            repo.git(&["init"])?;
        }
        Ok(repo)
    }

    /// Open the repository at `work_dir`, failing when there is none.
    /// Read-only callers use this so they never leave a `.git` behind.
    pub fn open_existing(work_dir: impl Into<PathBuf>) -> Result<Self, GitError> {
        let repo = Self {
            work_dir: work_dir.into(),
        };
        if !repo.work_dir.join(".git").exists() {
            return Err(GitError::NotARepository {
                path: repo.work_dir.clone(),
            });
        }
        repo.ensure_trusted()?;
        Ok(repo)
    }

    /// Repositories on foreign-owned mounts make git refuse every command
    /// with a "dubious ownership" error. Mark the directory safe and retry.
    fn ensure_trusted(&self) -> Result<(), GitError> {
        match self.git(&["rev-parse", "--git-dir"]) {
            Err(GitError::Command { ref stderr, .. }) if is_dubious_ownership(stderr) => {
                let dir = self.work_dir.display().to_string();
                info!("adding {dir} to safe.directory");
                self.git(&["config", "--global", "--add", "safe.directory", &dir])?;
                self.git(&["rev-parse", "--git-dir"])?;
                Ok(())
            }
            Err(e) => Err(e),
            Ok(_) => Ok(()),
        }
    }

    /// Run git with `args`; non-zero exit becomes [`GitError::Command`].
    /// Returns trimmed stdout.
    fn git(&self, args: &[&str]) -> Result<String, GitError> {
        Ok(self.git_raw(args)?.trim().to_string())
    }

    /// Like [`Self::git`] but keeps stdout byte-exact (porcelain `-z`).
    fn git_raw(&self, args: &[&str]) -> Result<String, GitError> {
        debug!("git {}", args.join(" "));
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.work_dir)
            .output()?;

        if !output.status.success() {
            return Err(GitError::Command {
                args: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Run git where a non-zero exit is an expected answer, not a failure.
    /// Returns `Some(stdout)` on success, `None` on exit code 1, and an
    /// error for anything else.
    fn git_query(&self, args: &[&str]) -> Result<Option<String>, GitError> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.work_dir)
            .output()?;

        match output.status.code() {
            Some(0) => Ok(Some(
                String::from_utf8_lossy(&output.stdout).trim().to_string(),
            )),
            Some(1) => Ok(None),
            _ => Err(GitError::Command {
                args: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }),
        }
    }
}

/// Matches git's refusal to touch a repository owned by another user.
fn is_dubious_ownership(stderr: &str) -> bool {
    stderr.contains("dubious ownership")
}

impl Repository for GitCli {
    fn workdir(&self) -> &Path {
        &self.work_dir
    }

    fn status(&self) -> Result<RepoStatus, GitError> {
        let raw = self.git_raw(&["status", "--porcelain", "-z"])?;
        parse_porcelain(&raw)
    }

    fn stage(&self, paths: &[String]) -> Result<(), GitError> {
        if paths.is_empty() {
            return Ok(());
        }
        let mut args: Vec<&str> = vec!["add", "-A", "--"];
        args.extend(paths.iter().map(String::as_str));
        self.git(&args)?;
        Ok(())
    }

    fn unstage_all(&self) -> Result<(), GitError> {
        // `git reset` needs a HEAD to reset to; a repo with no commits has
        // nothing staged worth keeping anyway.
        if self.head()?.is_some() {
            self.git(&["reset"])?;
        }
        Ok(())
    }

    fn commit(&self, message: &str, identity: &Identity) -> Result<CommitId, GitError> {
        let name_cfg = format!("user.name={}", identity.name);
        let email_cfg = format!("user.email={}", identity.email);
        let author = format!("{} <{}>", identity.name, identity.email);
        self.git(&[
            "-c", &name_cfg, "-c", &email_cfg, "commit", "-m", message, "--author", &author,
        ])?;
        let sha = self.git(&["rev-parse", "HEAD"])?;
        Ok(CommitId(sha))
    }

    fn head(&self) -> Result<Option<CommitId>, GitError> {
        self.resolve_ref("HEAD")
    }

    fn resolve_ref(&self, refname: &str) -> Result<Option<CommitId>, GitError> {
        Ok(self
            .git_query(&["rev-parse", "--verify", "--quiet", refname])?
            .filter(|s| !s.is_empty())
            .map(CommitId))
    }

    fn is_ancestor(&self, ancestor: &CommitId, descendant: &CommitId) -> Result<bool, GitError> {
        Ok(self
            .git_query(&["merge-base", "--is-ancestor", &ancestor.0, &descendant.0])?
            .is_some())
    }

    fn rev_list(&self, range: &str) -> Result<Vec<CommitId>, GitError> {
        let out = self.git(&["rev-list", "--reverse", range])?;
        Ok(out
            .lines()
            .filter(|l| !l.is_empty())
            .map(CommitId::from)
            .collect())
    }

    fn checkout_branch(&self, branch: &str) -> Result<(), GitError> {
        if self.head()?.is_none() {
            // Unborn HEAD: name the initial branch without a checkout.
            let target = format!("refs/heads/{branch}");
            self.git(&["symbolic-ref", "HEAD", &target])?;
        } else {
            self.git(&["checkout", "-B", branch])?;
        }
        Ok(())
    }

    fn reset_hard(&self, target: &str) -> Result<(), GitError> {
        self.git(&["reset", "--hard", target])?;
        Ok(())
    }

    fn reset_soft(&self, target: &str) -> Result<(), GitError> {
        self.git(&["reset", "--soft", target])?;
        Ok(())
    }

    fn has_remote(&self, name: &str) -> Result<bool, GitError> {
        let out = self.git(&["remote"])?;
        Ok(out.lines().any(|l| l == name))
    }

    fn create_remote(&self, name: &str, url: &str) -> Result<(), GitError> {
        self.git(&["remote", "add", name, url])?;
        Ok(())
    }

    fn delete_remote(&self, name: &str) -> Result<(), GitError> {
        self.git(&["remote", "remove", name])?;
        Ok(())
    }

    fn set_remote_url(&self, name: &str, url: &str) -> Result<(), GitError> {
        self.git(&["remote", "set-url", name, url])?;
        Ok(())
    }

    fn fetch(&self, remote: &str, branch: &str, depth: Option<u32>) -> Result<(), GitError> {
        let depth_arg = depth.map(|d| format!("--depth={d}"));
        let mut args = vec!["fetch"];
        if let Some(d) = depth_arg.as_deref() {
            args.push(d);
        }
        args.push(remote);
        args.push(branch);
        self.git(&args)?;
        Ok(())
    }

    fn push_ref(
        &self,
        remote: &str,
        refspec: &str,
        force_with_lease: bool,
    ) -> Result<(), GitError> {
        let mut args = vec!["push"];
        if force_with_lease {
            args.push("--force-with-lease");
        }
        args.push(remote);
        args.push(refspec);
        self.git(&args)?;
        Ok(())
    }

    fn list_tags(&self) -> Result<Vec<String>, GitError> {
        let out = self.git(&["tag", "--list"])?;
        Ok(out
            .lines()
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn tag_target(&self, tag: &str) -> Result<Option<CommitId>, GitError> {
        let peeled = format!("{tag}^{{commit}}");
        self.resolve_ref(&peeled)
    }

    fn create_tag(&self, tag: &str) -> Result<(), GitError> {
        self.git(&["tag", tag])?;
        Ok(())
    }

    fn delete_tag(&self, tag: &str) -> Result<(), GitError> {
        self.git(&["tag", "-d", tag])?;
        Ok(())
    }

    fn identity_configured(&self) -> Result<bool, GitError> {
        let name = self.git_query(&["config", "user.name"])?;
        let email = self.git_query(&["config", "user.email"])?;
        Ok(name.is_some() && email.is_some())
    }

    fn set_identity(&self, identity: &Identity) -> Result<(), GitError> {
        info!(
            "configuring local identity: {} <{}>",
            identity.name, identity.email
        );
        self.git(&["config", "user.name", &identity.name])?;
        self.git(&["config", "user.email", &identity.email])?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_gits_ownership_refusal() {
        let stderr = "fatal: detected dubious ownership in repository at '/mnt/share/repo'\n\
                      To add an exception for this directory, call:\n\n\
                      \tgit config --global --add safe.directory /mnt/share/repo";
        assert!(is_dubious_ownership(stderr));
    }

    #[test]
    fn other_failures_are_not_treated_as_ownership() {
        assert!(!is_dubious_ownership(
            "fatal: not a git repository (or any of the parent directories): .git"
        ));
        assert!(!is_dubious_ownership(""));
    }
}
