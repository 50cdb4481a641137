use thiserror::Error;

/// Failure of a single provider call. Always caught at the call boundary and
/// turned into a `Failed` outcome for that source only.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

// Request URLs carry API keys in their query string, so they are stripped
// before the error is turned into a message.
impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        let e = e.without_url();
        if e.is_decode() {
            ProviderError::MalformedResponse(e.to_string())
        } else {
            ProviderError::Transport(e.to_string())
        }
    }
}

/// Request-level errors surfaced to whoever submitted the query.
#[derive(Debug, Error)]
pub enum GenieError {
    #[error("query must not be empty")]
    EmptyQuery,

    #[error("invalid search options: {0}")]
    InvalidOptions(String),

    #[error("Please provide all required API keys")]
    MissingCredentials,

    #[error("session not found: {0}")]
    SessionNotFound(uuid::Uuid),
}

pub type Result<T> = std::result::Result<T, GenieError>;
