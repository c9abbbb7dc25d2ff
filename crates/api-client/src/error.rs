use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response: connection refused, reset,
    /// DNS failure and the like.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("The API returned {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    Rejected { status: u16, message: Option<String> },

    #[error("Could not build the request: {0}")]
    InvalidRequest(String),

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),
}

impl ApiError {
    /// The server-supplied `error` text, when there is one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}
