//! # Error Types
//!
//! Domain-specific error types for evolv-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  evolv-core errors (this file)                                         │
//! │  ├── CoreError        - Cart, discount and checkout rule violations    │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  evolv-db errors          └── DbError      - Local storage failures    │
//! │  evolv-client errors      └── ClientError  - REST API failures         │
//! │  storefront app errors    └── ApiError     - What the UI sees          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError ─┐                                  │
//! │        DbError, ClientError ────────┴──► ApiError → Frontend           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised by the cart, discount composer and
/// checkout state machine.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Line-item quantity would exceed the per-line cap.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: u64, max: u32 },

    /// Cart already holds the maximum number of distinct lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Updating a line that is not in the cart.
    #[error("{key} is not in the cart")]
    ItemNotInCart { key: String },

    /// Checkout attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// The promo code was rejected (locally or by the promo service).
    ///
    /// ## User Workflow
    /// ```text
    /// Enter "SAVE10" ──► apply_promo_code ──► promo service says 4xx
    ///                                               │
    ///                                               ▼
    ///                     InvalidCode { code: "SAVE10", reason: "expired" }
    ///                                               │
    ///                                               ▼
    ///                     Shown inline under the promo input
    /// ```
    #[error("Promo code {code} is not valid: {reason}")]
    InvalidCode { code: String, reason: String },

    /// Redeeming more points than the customer has.
    #[error("Insufficient points: requested {requested}, available {available}")]
    InsufficientPoints { requested: i64, available: u32 },

    /// Redeeming zero or a negative number of points.
    #[error("Points to redeem must be at least 1, got {requested}")]
    InvalidAmount { requested: i64 },

    /// The promo service granted a discount the storefront cannot use.
    #[error("Promo discount {amount} is invalid")]
    InvalidDiscountAmount { amount: Money },

    /// The checkout state machine does not allow `action` in `state`.
    #[error("Cannot {action} while checkout is {state}")]
    InvalidTransition { state: String, action: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates an InvalidTransition error.
    pub fn transition(state: impl ToString, action: impl Into<String>) -> Self {
        CoreError::InvalidTransition {
            state: state.to_string(),
            action: action.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before business logic runs, mostly from [`crate::validation`].
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed phone number or postal code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
