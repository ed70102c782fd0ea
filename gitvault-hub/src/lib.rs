//! Hosting-service integration for gitvault.
//!
//! The archive pipeline needs a few provisioning calls that plain git cannot
//! do: create the remote repository, flip its default branch, read its tags
//! without a full fetch. [`RemoteHost`] names those calls; [`GitHubClient`]
//! implements them against the GitHub REST API with a personal access token.

pub mod error;
pub mod github;
pub mod host;

pub use error::HubError;
pub use github::GitHubClient;
pub use host::{RemoteHost, TokenInfo};
