//! # evolv-core: Pure Business Logic for the Evolv Storefront
//!
//! Cart, discounts, totals and checkout rules as plain data and functions.
//! Nothing in this crate touches the network, the disk or a clock-driven
//! runtime.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Evolv Storefront Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (React)                             │   │
//! │  │   Product page ──► Cart drawer ──► Checkout ──► Razorpay sheet  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 Storefront commands (apps/storefront)           │   │
//! │  │    add_to_cart, apply_promo_code, place_order, etc.             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ evolv-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐  ┌──────────┐  ┌─────────┐  ┌──────────────┐    │   │
//! │  │   │  cart   │  │ discount │  │ totals  │  │   checkout   │    │   │
//! │  │   │  Cart   │─►│ Composer │─►│ Order-  │─►│ OrderDraft   │    │   │
//! │  │   │         │  │          │  │ Totals  │  │ CheckoutFlow │    │   │
//! │  │   └─────────┘  └──────────┘  └─────────┘  └──────────────┘    │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │        evolv-db (cart persistence)   evolv-client (REST services)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money in paise with integer arithmetic
//! - [`types`] - Line items, discounts, addresses, payment methods
//! - [`cart`] - The cart and its invariants
//! - [`discount`] - Promo code / loyalty points exclusivity
//! - [`totals`] - Subtotal, shipping, tax and total
//! - [`checkout`] - Order payload and checkout state machine
//! - [`validation`] - Input rules checked before any network call
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use evolv_core::{Cart, CartLineItem, DiscountComposer, Money};
//! use evolv_core::totals::{calculate_totals, PricingPolicy, TotalsScope};
//!
//! let mut cart = Cart::new();
//! cart.add_item(CartLineItem {
//!     product_id: "A".to_string(),
//!     name: "Chocolate Whey Shake".to_string(),
//!     pack_size: 6,
//!     quantity: 1,
//!     unit_price: Money::from_rupees(799),
//!     image_ref: None,
//! })
//! .unwrap();
//!
//! let mut discounts = DiscountComposer::new();
//! discounts.apply_points(50, 120).unwrap();
//!
//! let totals = calculate_totals(
//!     cart.items(),
//!     &PricingPolicy::default(),
//!     discounts.discount_amount(),
//!     TotalsScope::CartPreview,
//! );
//! // 799 + 50 shipping − 50 points
//! assert_eq!(totals.total, Money::from_rupees(799));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod checkout;
pub mod discount;
pub mod error;
pub mod money;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::Cart;
pub use checkout::{CheckoutFlow, CheckoutStage, CheckoutStatus, OrderDraft, PendingOrder};
pub use discount::{ActiveDiscount, DiscountComposer, PromoOutcome, PromoRequest};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use totals::{OrderTotals, PricingPolicy, TotalsScope};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum packs of one line item.
///
/// Catches fat-finger entries (990 instead of 9) before they reach the
/// order service.
pub const MAX_ITEM_QUANTITY: u32 = 99;

/// Maximum distinct lines in one cart.
pub const MAX_LINE_ITEMS: usize = 50;

/// Highest unit price a cart line accepts (₹10,00,000 per pack).
///
/// A catalog price above this is treated as bad data rather than summed.
pub const MAX_UNIT_PRICE: Money = Money::from_rupees(1_000_000);
