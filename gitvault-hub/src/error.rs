//! Error type for the hub crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HubError {
    /// The token was rejected outright (HTTP 401).
    #[error("the access token is invalid or has expired")]
    InvalidToken,

    /// The token is valid but the request was refused (HTTP 403), usually
    /// rate limiting or an SSO-enforced organisation.
    #[error("access denied by the host (rate limit or SSO enforcement)")]
    Forbidden,

    /// Any other non-success response.
    #[error("api request '{context}' failed with status {status}: {message}")]
    Api {
        context: String,
        status: u16,
        message: String,
    },

    /// Connection-level failure (DNS, TLS, timeouts).
    #[error("transport failure: {0}")]
    Transport(String),

    /// A response body that did not decode as the expected JSON shape.
    #[error("failed to decode api response")]
    Decode(#[from] std::io::Error),
}

impl HubError {
    /// Translate a `ureq` error, tagging it with the request it came from.
    pub(crate) fn from_ureq(err: ureq::Error, context: &str) -> Self {
        match err {
            ureq::Error::Status(401, _) => HubError::InvalidToken,
            ureq::Error::Status(403, _) => HubError::Forbidden,
            ureq::Error::Status(status, response) => HubError::Api {
                context: context.to_string(),
                status,
                message: response.into_string().unwrap_or_default(),
            },
            ureq::Error::Transport(transport) => HubError::Transport(transport.to_string()),
        }
    }
}
