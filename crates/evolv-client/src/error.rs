//! # Client Error Types
//!
//! Errors from calls to the storefront REST API.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Client Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Response            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Network        │  │  Rejected (4xx)         │ │
//! │  │                 │  │  Timeout        │  │  Server   (5xx)         │ │
//! │  │                 │  │                 │  │  Decode                 │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Rejected carries the server's message: "Promo code expired" is shown  │
//! │  to the customer as-is. Everything else gets a generic retry message.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Base URL or other setting is unusable.
    #[error("Invalid API configuration: {0}")]
    InvalidConfig(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Connection refused, DNS failure, TLS failure, reset.
    #[error("Network error: {0}")]
    Network(String),

    /// The request did not finish in time.
    #[error("Request timed out")]
    Timeout,

    // =========================================================================
    // Response Errors
    // =========================================================================
    /// The service refused the request (4xx).
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The service failed (5xx).
    #[error("Server error ({status})")]
    Server { status: u16 },

    /// The response body did not match the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Transport-level failures worth retrying later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClientError::Network(_) | ClientError::Timeout | ClientError::Server { .. }
        )
    }

    /// HTTP status of a response error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Rejected { status, .. } | ClientError::Server { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else if err.is_builder() {
            ClientError::InvalidConfig(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidConfig(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable() {
        assert!(ClientError::Timeout.is_retryable());
        assert!(ClientError::Server { status: 503 }.is_retryable());
        assert!(!ClientError::Rejected {
            status: 400,
            message: "bad code".to_string()
        }
        .is_retryable());
    }

    #[test]
    fn test_status() {
        assert_eq!(ClientError::Server { status: 502 }.status(), Some(502));
        assert_eq!(ClientError::Timeout.status(), None);
    }
}
