use thiserror::Error;
use workerform_cloudflare::ApiError;
use workerform_core::CoreError;

/// Errors surfaced to the caller of a provider operation.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Remote call failed: {0}")]
    RemoteCall(#[source] ApiError),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ProviderError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Get error category for logging/monitoring
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) => ErrorCategory::Validation,
            Self::Io(_) => ErrorCategory::Io,
            Self::RemoteCall(_) => ErrorCategory::Remote,
            Self::Decode(_) => ErrorCategory::Decode,
            Self::Serialization(_) => ErrorCategory::Serialization,
        }
    }
}

impl From<CoreError> for ProviderError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(message) => Self::Validation(message),
            CoreError::Io { .. } => Self::Io(err.to_string()),
            CoreError::Json(e) => Self::Serialization(e),
        }
    }
}

impl From<ApiError> for ProviderError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Decode(message) => Self::Decode(message),
            other => Self::RemoteCall(other),
        }
    }
}

/// Error categories for monitoring and classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Io,
    Remote,
    Decode,
    Serialization,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Io => write!(f, "io"),
            Self::Remote => write!(f, "remote"),
            Self::Decode => write!(f, "decode"),
            Self::Serialization => write!(f, "serialization"),
        }
    }
}

/// Convenience result type for provider operations
pub type Result<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_to_categories() {
        let err: ProviderError = CoreError::validation("mainModule not found").into();
        assert!(matches!(err, ProviderError::Validation(_)));
        assert_eq!(err.to_string(), "Validation error: mainModule not found");

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ProviderError = CoreError::io("/srv/worker", io).into();
        assert_eq!(err.category(), ErrorCategory::Io);
        assert!(err.to_string().contains("/srv/worker"));
    }

    #[test]
    fn test_api_errors_map_to_categories() {
        let err: ProviderError = ApiError::decode("consumer_id is missing").into();
        assert_eq!(err.category(), ErrorCategory::Decode);

        let err: ProviderError = ApiError::RemoteCall {
            status: 502,
            body: "bad gateway".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Remote);
        assert!(err.to_string().contains("HTTP 502"));
    }

    #[test]
    fn test_error_categories_display() {
        assert_eq!(ErrorCategory::Validation.to_string(), "validation");
        assert_eq!(ErrorCategory::Io.to_string(), "io");
        assert_eq!(ErrorCategory::Remote.to_string(), "remote");
        assert_eq!(ErrorCategory::Decode.to_string(), "decode");
        assert_eq!(ErrorCategory::Serialization.to_string(), "serialization");
    }
}
