//! # Storefront Commands
//!
//! Everything the UI can ask of the storefront.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── cart.rs      ◄─── cart_items, add_to_cart, update_quantity,
//! │                     remove_item, clear_cart, cart_totals
//! ├── discount.rs  ◄─── promo codes, Evolv points, loyalty balance
//! └── checkout.rs  ◄─── checkout_totals, place_order, confirm_payment,
//!                       report_payment_failure, retry_payment, checkout_status
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  UI                                                                     │
//! │  ──                                                                     │
//! │  addToCart({ productId: 'whey-choc', packSize: 6 })                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  pub async fn add_to_cart(                                              │
//! │      store: &Storefront,      ◄── the session                          │
//! │      product_id: &str,        ◄── from the caller                      │
//! │      pack_size: u32,                                                    │
//! │      quantity: Option<i64>,   ◄── optional, defaults to 1              │
//! │  ) -> Result<CartResponse, ApiError>                                    │
//! │         │                                                               │
//! │         │ (JSON serialization, camelCase)                               │
//! │         ▼                                                               │
//! │  UI receives: { items, itemCount, totals } or { code, message }         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cart;
pub mod checkout;
pub mod discount;

pub use cart::{
    add_to_cart, cart_items, cart_totals, clear_cart, remove_item, update_quantity, CartResponse,
};
pub use checkout::{
    checkout_status, checkout_totals, confirm_payment, place_order, report_payment_failure,
    retry_payment, PlaceOrderRequest, PlaceOrderResponse,
};
pub use discount::{
    apply_evolv_points, apply_promo_code, points_redemption, promo_code, refresh_loyalty_balance,
    remove_evolv_points, remove_promo_code, DiscountResponse, PromoResponse,
};
