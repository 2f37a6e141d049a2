//! # API Error Type
//!
//! Unified error type for storefront commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Storefront                         │
//! │                                                                         │
//! │  UI                          Rust                                       │
//! │  ──                          ────                                       │
//! │                                                                         │
//! │  applyPromoCode('SAVE10')                                               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Rule violation? ─── CoreError::InvalidCode ──────┐             │  │
//! │  │         │                                         │             │  │
//! │  │         ▼                                         ▼             │  │
//! │  │  Service refused? ── ClientError::Rejected ───► ApiError ──────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  e.code    = "VALIDATION_ERROR"                                         │
//! │  e.message = "Promo code X is not valid: must be at least 3 characters" │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No error is fatal: every failure comes back as an `ApiError` the UI can
//! show next to the control that caused it.

use serde::Serialize;
use tracing::error;

use evolv_client::ClientError;
use evolv_core::CoreError;
use evolv_db::DbError;

use crate::state::ConfigError;

/// Message shown for transport failures. The request may be retried as is.
pub const NETWORK_MESSAGE: &str = "Could not reach the store. Please check your connection and try again.";

/// API error returned from storefront commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "Insufficient points: requested 51, available 50"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Bad input or a refused promo code / points amount. Shown inline.
    ValidationError,

    /// Timeout, refused connection, 5xx. Safe to retry.
    NetworkError,

    /// The order exists but is unpaid; payment may be retried.
    PaymentError,

    /// Local storage failed.
    StorageError,

    /// Product or cart line not found
    NotFound,

    /// Command not allowed at the current checkout stage
    CheckoutState,

    /// Anything else
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn payment(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::PaymentError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Maps a payment gateway failure. The order already exists, so every
    /// gateway error is a payment error regardless of its transport cause.
    pub fn from_gateway(err: ClientError) -> Self {
        match err {
            ClientError::Rejected { message, .. } => ApiError::payment(message),
            other if other.is_retryable() => ApiError::payment(NETWORK_MESSAGE),
            other => {
                error!(error = %other, "Payment gateway call failed");
                ApiError::payment("Payment could not be processed")
            }
        }
    }
}

/// Converts core rule violations to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ItemNotInCart { key } => ApiError::not_found("Cart item", &key),
            CoreError::InvalidTransition { .. } => {
                ApiError::new(ErrorCode::CheckoutState, err.to_string())
            }
            CoreError::InvalidDiscountAmount { amount } => {
                error!(%amount, "Promo service returned a negative discount");
                ApiError::internal("The promo service returned an invalid discount")
            }
            CoreError::QuantityTooLarge { .. }
            | CoreError::CartTooLarge { .. }
            | CoreError::EmptyCart
            | CoreError::InvalidCode { .. }
            | CoreError::InsufficientPoints { .. }
            | CoreError::InvalidAmount { .. }
            | CoreError::Validation(_) => ApiError::validation(err.to_string()),
        }
    }
}

/// Converts local storage errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        error!(error = %err, "Local storage failed");
        ApiError::new(ErrorCode::StorageError, "Local storage is unavailable")
    }
}

/// Converts service errors to API errors.
///
/// Payment gateway calls go through [`ApiError::from_gateway`] instead.
impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Rejected {
                status: 404,
                message,
            } => ApiError::new(ErrorCode::NotFound, message),
            ClientError::Rejected { message, .. } => ApiError::validation(message),
            ClientError::Network(_) | ClientError::Timeout | ClientError::Server { .. } => {
                ApiError::new(ErrorCode::NetworkError, NETWORK_MESSAGE)
            }
            ClientError::Decode(_) | ClientError::InvalidConfig(_) => {
                error!(error = %err, "Service call failed");
                ApiError::internal("Unexpected response from the store")
            }
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use evolv_core::ValidationError;

    #[test]
    fn test_serializes_screaming_code() {
        let json = serde_json::to_value(ApiError::payment("declined")).unwrap();
        assert_eq!(json["code"], "PAYMENT_ERROR");
        assert_eq!(json["message"], "declined");
    }

    #[test]
    fn test_core_error_mapping() {
        let err = ApiError::from(CoreError::InsufficientPoints {
            requested: 51,
            available: 50,
        });
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = ApiError::from(CoreError::transition("submitting", "submit an order"));
        assert_eq!(err.code, ErrorCode::CheckoutState);

        let err = ApiError::from(CoreError::ItemNotInCart {
            key: "whey-choc/6".to_string(),
        });
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = ApiError::from(CoreError::from(ValidationError::Negative {
            field: "quantity".to_string(),
        }));
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_client_error_mapping() {
        let err = ApiError::from(ClientError::Timeout);
        assert_eq!(err.code, ErrorCode::NetworkError);
        assert_eq!(err.message, NETWORK_MESSAGE);

        let err = ApiError::from(ClientError::Rejected {
            status: 400,
            message: "Promo code expired".to_string(),
        });
        assert_eq!(err, ApiError::validation("Promo code expired"));

        let err = ApiError::from(ClientError::Rejected {
            status: 404,
            message: "Product not found".to_string(),
        });
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_gateway_errors_are_payment_errors() {
        assert_eq!(
            ApiError::from_gateway(ClientError::Server { status: 502 }).code,
            ErrorCode::PaymentError
        );
        assert_eq!(
            ApiError::from_gateway(ClientError::Rejected {
                status: 400,
                message: "Card declined".to_string()
            }),
            ApiError::payment("Card declined")
        );
    }
}
