//! # Validation Module
//!
//! Input validation for the storefront.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (React)                                             │
//! │  └── Inline hints while typing                                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Storefront command (Rust)                                    │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: rules checked before any network call                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: REST backend                                                 │
//! │  └── Promo validity, stock, payment signature                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use evolv_core::validation::{normalize_promo_code, validate_pack_size};
//!
//! assert_eq!(normalize_promo_code("  save10 ").unwrap(), "SAVE10");
//! assert!(validate_pack_size(6).is_ok());
//! assert!(validate_pack_size(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::Address;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Shortest promo code the promo service ever issues.
pub const PROMO_CODE_MIN_LEN: usize = 3;

/// Longest promo code accepted.
pub const PROMO_CODE_MAX_LEN: usize = 32;

// =============================================================================
// Cart Inputs
// =============================================================================

/// Validates a product identifier.
///
/// ## Rules
/// - Must not be empty
/// - At most 64 characters
pub fn validate_product_id(product_id: &str) -> ValidationResult<()> {
    let product_id = product_id.trim();

    if product_id.is_empty() {
        return Err(ValidationError::Required {
            field: "product id".to_string(),
        });
    }

    if product_id.len() > 64 {
        return Err(ValidationError::TooLong {
            field: "product id".to_string(),
            max: 64,
        });
    }

    Ok(())
}

/// Validates a pack size (units per pack).
pub fn validate_pack_size(pack_size: u32) -> ValidationResult<()> {
    if pack_size == 0 {
        return Err(ValidationError::MustBePositive {
            field: "pack size".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Discount Inputs
// =============================================================================

/// Normalises a promo code for lookup: trims whitespace and upper-cases.
///
/// ## Rules
/// - 3 to 32 characters after trimming
/// - ASCII letters, digits, hyphens and underscores only
///
/// ## Example
/// ```rust
/// use evolv_core::validation::normalize_promo_code;
///
/// assert_eq!(normalize_promo_code("welcome-50").unwrap(), "WELCOME-50");
/// assert!(normalize_promo_code("").is_err());
/// assert!(normalize_promo_code("SAVE 10").is_err());
/// ```
pub fn normalize_promo_code(code: &str) -> ValidationResult<String> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "promo code".to_string(),
        });
    }

    if code.len() < PROMO_CODE_MIN_LEN {
        return Err(ValidationError::TooShort {
            field: "promo code".to_string(),
            min: PROMO_CODE_MIN_LEN,
        });
    }

    if code.len() > PROMO_CODE_MAX_LEN {
        return Err(ValidationError::TooLong {
            field: "promo code".to_string(),
            max: PROMO_CODE_MAX_LEN,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "promo code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(code.to_ascii_uppercase())
}

// =============================================================================
// Checkout Inputs
// =============================================================================

/// Validates a shipping or billing address.
///
/// ## Rules
/// - Name, first line, city, state, postal code and country are required
/// - Phone: 10 to 15 digits, optionally prefixed with `+`; spaces and
///   hyphens are ignored
/// - Postal code: 3 to 10 letters, digits or spaces
pub fn validate_address(address: &Address) -> ValidationResult<()> {
    require("full name", &address.full_name, 100)?;
    require("address line 1", &address.line1, 200)?;
    if let Some(line2) = &address.line2 {
        if line2.trim().len() > 200 {
            return Err(ValidationError::TooLong {
                field: "address line 2".to_string(),
                max: 200,
            });
        }
    }
    require("city", &address.city, 100)?;
    require("state", &address.state, 100)?;
    require("country", &address.country, 100)?;

    validate_phone(&address.phone)?;
    validate_postal_code(&address.postal_code)?;

    Ok(())
}

fn require(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.len() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    let digits = phone.strip_prefix('+').unwrap_or(phone);
    let mut count = 0;
    for c in digits.chars() {
        match c {
            '0'..='9' => count += 1,
            ' ' | '-' => {}
            _ => {
                return Err(ValidationError::InvalidFormat {
                    field: "phone".to_string(),
                    reason: "must contain only digits".to_string(),
                })
            }
        }
    }

    if !(10..=15).contains(&count) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must have 10 to 15 digits".to_string(),
        });
    }

    Ok(())
}

fn validate_postal_code(postal_code: &str) -> ValidationResult<()> {
    let postal_code = postal_code.trim();

    if postal_code.is_empty() {
        return Err(ValidationError::Required {
            field: "postal code".to_string(),
        });
    }

    let valid_chars = postal_code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == ' ');
    if !valid_chars || !(3..=10).contains(&postal_code.len()) {
        return Err(ValidationError::InvalidFormat {
            field: "postal code".to_string(),
            reason: "must be 3 to 10 letters or digits".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> Address {
        Address {
            full_name: "Asha Rao".to_string(),
            phone: "+91 98765-43210".to_string(),
            line1: "12 MG Road".to_string(),
            line2: None,
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            postal_code: "560001".to_string(),
            country: "India".to_string(),
        }
    }

    #[test]
    fn test_validate_product_inputs() {
        assert!(validate_product_id("whey-choc").is_ok());
        assert!(validate_product_id("   ").is_err());
        assert!(validate_pack_size(6).is_ok());
        assert!(validate_pack_size(0).is_err());
    }

    #[test]
    fn test_normalize_promo_code() {
        assert_eq!(normalize_promo_code(" save10\n").unwrap(), "SAVE10");
        assert!(matches!(
            normalize_promo_code("AB"),
            Err(ValidationError::TooShort { .. })
        ));
        assert!(matches!(
            normalize_promo_code(&"X".repeat(33)),
            Err(ValidationError::TooLong { .. })
        ));
        assert!(matches!(
            normalize_promo_code("10%OFF"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_validate_address() {
        assert!(validate_address(&address()).is_ok());

        let mut missing_city = address();
        missing_city.city = " ".to_string();
        assert!(matches!(
            validate_address(&missing_city),
            Err(ValidationError::Required { field }) if field == "city"
        ));

        let mut short_phone = address();
        short_phone.phone = "12345".to_string();
        assert!(validate_address(&short_phone).is_err());

        let mut letters_in_phone = address();
        letters_in_phone.phone = "98765ABCDE".to_string();
        assert!(validate_address(&letters_in_phone).is_err());

        let mut bad_postal = address();
        bad_postal.postal_code = "56#001".to_string();
        assert!(validate_address(&bad_postal).is_err());
    }
}
