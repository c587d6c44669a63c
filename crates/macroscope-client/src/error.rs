use thiserror::Error as ThisError;

/// What the user sees when a search cannot be run.
pub const SEARCH_FAILED_MESSAGE: &str = "Failed to search stocks. Please try again.";

#[derive(ThisError, Debug)]
pub enum ClientError {
    /// The request never produced a response: connect, timeout, or body read.
    #[error("network error calling {endpoint}: {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} answered {status}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
    },

    /// The payload cannot be used at all. Individual odd fields are coerced
    /// at the boundary and never end up here.
    #[error("malformed response from {endpoint}: {reason}")]
    MalformedData { endpoint: String, reason: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Worth offering the user a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Network { .. } | ClientError::Status { .. })
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
