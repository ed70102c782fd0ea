//! The remote-host capability trait.

use crate::error::HubError;

/// What a token-backed host account looks like after verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub username: String,
    /// OAuth scopes granted to the token, as reported by the host.
    pub scopes: Vec<String>,
}

/// Repository provisioning and metadata operations on a hosting service.
///
/// The pipeline only ever needs a handful of REST calls; everything
/// commit-shaped goes through the local repository and plain `git` transport.
pub trait RemoteHost {
    /// Validate the token and report who it belongs to.
    fn verify_token(&self) -> Result<TokenInfo, HubError>;

    /// Login name of the token's owner.
    fn authenticated_user(&self) -> Result<String, HubError>;

    /// Whether `owner/repo_name` exists and is visible to the token.
    fn repo_exists(&self, owner: &str, repo_name: &str) -> Result<bool, HubError>;

    /// Return the clone URL of `repo_name` under the token's account,
    /// creating it as a private repository when absent.
    fn get_or_create_repo(&self, repo_name: &str) -> Result<String, HubError>;

    /// Change the repository's default branch. The branch must already exist
    /// on the remote. Returns `false` (after logging) when the host refuses.
    fn set_default_branch(&self, repo_name: &str, branch: &str) -> Result<bool, HubError>;

    /// Tag names on `owner/repo_name`, in whatever order the host returns.
    fn list_tags(&self, owner: &str, repo_name: &str) -> Result<Vec<String>, HubError>;

    /// Embed the token into a clone URL for one-shot authenticated transport.
    /// The result must never be logged or persisted.
    fn authenticated_url(&self, clone_url: &str) -> String;
}
