//! Error types for the CI aggregation pipeline.

use thiserror::Error;

/// Errors produced while querying the hosting platform or loading configuration.
///
/// Missing nested data (no branch, no check suites, no workflow run) is never
/// an error; those repos are skipped by the normalizer.
#[derive(Debug, Error)]
pub enum OrgCiError {
    /// The request never produced a usable HTTP response (connect, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The token was rejected.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The endpoint answered with a non-success status.
    #[error("GitHub API error: {message} (status: {status})")]
    Api { status: u16, message: String },

    /// The GraphQL response carried an `errors` array.
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// The query succeeded but returned no organization for the login.
    #[error("organization not found: {0}")]
    OrganizationNotFound(String),

    /// The response body could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// A configuration value is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for OrgCiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            OrgCiError::InvalidResponse(err.to_string())
        } else {
            OrgCiError::Transport(err.to_string())
        }
    }
}

/// Convenience result alias.
pub type OrgCiResult<T> = std::result::Result<T, OrgCiError>;
