use thiserror::Error;

/// Errors returned by the Cloudflare API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The platform answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    RemoteCall { status: u16, body: String },

    /// The request never got a response.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A success response did not have the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The request could not be built.
    #[error("Request error: {0}")]
    Request(String),
}

impl ApiError {
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    pub fn request(message: impl Into<String>) -> Self {
        Self::Request(message.into())
    }

    /// Any failed round trip is retried, whatever the status code.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RemoteCall { .. } | Self::Transport(_))
    }
}
