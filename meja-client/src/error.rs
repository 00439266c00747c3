//! Client error types

use shared::error::ErrorCode;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with an error body
    #[error("API error {code} ({status}): {message}")]
    Api {
        status: u16,
        code: u16,
        message: String,
    },

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Local storage I/O failed
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Server error code, if the server produced one
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            ClientError::Api { code, .. } => ErrorCode::try_from(*code).ok(),
            _ => None,
        }
    }

    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_code() {
        let err = ClientError::Api {
            status: 409,
            code: ErrorCode::InsufficientStock.code(),
            message: "Only 2 left".into(),
        };
        assert_eq!(err.error_code(), Some(ErrorCode::InsufficientStock));
        assert!(!err.is_unauthorized());
        assert!(err.to_string().contains("Only 2 left"));

        let io = ClientError::from(std::io::Error::other("disk"));
        assert_eq!(io.error_code(), None);
        assert_eq!(io.status(), None);
    }
}
