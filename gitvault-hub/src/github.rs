//! GitHub REST v3 client.

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::HubError;
use crate::host::{RemoteHost, TokenInfo};

const DEFAULT_API_BASE: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";

/// Minimal GitHub API client scoped to one access token.
pub struct GitHubClient {
    agent: ureq::Agent,
    token: String,
    api_base: String,
}

#[derive(Deserialize)]
struct UserResponse {
    login: String,
}

#[derive(Deserialize)]
struct RepoResponse {
    clone_url: String,
}

#[derive(Deserialize)]
struct TagEntry {
    name: String,
}

impl GitHubClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_api_base(token, DEFAULT_API_BASE)
    }

    /// Point the client at a different API root (GitHub Enterprise, tests).
    pub fn with_api_base(token: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
            token: token.into(),
            api_base: api_base.into(),
        }
    }

    fn request(&self, method: &str, path: &str) -> ureq::Request {
        let url = format!("{}{path}", self.api_base);
        self.agent
            .request(method, &url)
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Accept", "application/vnd.github+json")
            .set("X-GitHub-Api-Version", API_VERSION)
    }

    fn create_private_repo(&self, repo_name: &str) -> Result<String, HubError> {
        info!("creating private repository '{repo_name}'");
        let body = serde_json::json!({
            "name": repo_name,
            "private": true,
            "description": "Automated archive created by gitvault",
        });
        let repo: RepoResponse = self
            .request("POST", "/user/repos")
            .send_json(body)
            .map_err(|e| HubError::from_ureq(e, "create repository"))?
            .into_json()?;
        Ok(repo.clone_url)
    }
}

impl RemoteHost for GitHubClient {
    fn verify_token(&self) -> Result<TokenInfo, HubError> {
        let response = self
            .request("GET", "/user")
            .call()
            .map_err(|e| HubError::from_ureq(e, "verify token"))?;

        let scopes = response
            .header("X-OAuth-Scopes")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        let user: UserResponse = response.into_json()?;

        Ok(TokenInfo {
            username: user.login,
            scopes,
        })
    }

    fn authenticated_user(&self) -> Result<String, HubError> {
        let user: UserResponse = self
            .request("GET", "/user")
            .call()
            .map_err(|e| HubError::from_ureq(e, "get authenticated user"))?
            .into_json()?;
        Ok(user.login)
    }

    fn repo_exists(&self, owner: &str, repo_name: &str) -> Result<bool, HubError> {
        let path = format!("/repos/{owner}/{repo_name}");
        match self.request("GET", &path).call() {
            Ok(_) => Ok(true),
            Err(ureq::Error::Status(404, _)) => Ok(false),
            Err(e) => Err(HubError::from_ureq(e, "check repository existence")),
        }
    }

    fn get_or_create_repo(&self, repo_name: &str) -> Result<String, HubError> {
        let username = self.authenticated_user()?;
        if self.repo_exists(&username, repo_name)? {
            info!("repository '{repo_name}' already exists");
            Ok(format!("https://github.com/{username}/{repo_name}.git"))
        } else {
            self.create_private_repo(repo_name)
        }
    }

    fn set_default_branch(&self, repo_name: &str, branch: &str) -> Result<bool, HubError> {
        let username = self.authenticated_user()?;
        let path = format!("/repos/{username}/{repo_name}");
        let body = serde_json::json!({ "default_branch": branch });

        match self.request("PATCH", &path).send_json(body) {
            Ok(_) => {
                info!("default branch of '{repo_name}' set to '{branch}'");
                Ok(true)
            }
            Err(e) => {
                warn!("could not set default branch of '{repo_name}' to '{branch}': {e}");
                Ok(false)
            }
        }
    }

    fn list_tags(&self, owner: &str, repo_name: &str) -> Result<Vec<String>, HubError> {
        let path = format!("/repos/{owner}/{repo_name}/tags");
        let tags: Vec<TagEntry> = match self.request("GET", &path).call() {
            Ok(response) => response.into_json()?,
            Err(ureq::Error::Status(404, _)) => Vec::new(),
            Err(e) => return Err(HubError::from_ureq(e, "list tags")),
        };
        Ok(tags.into_iter().map(|t| t.name).collect())
    }

    fn authenticated_url(&self, clone_url: &str) -> String {
        clone_url.replacen("https://", &format!("https://{}@", self.token), 1)
    }
}
