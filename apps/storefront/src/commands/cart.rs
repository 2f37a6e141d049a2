//! # Cart Commands
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │────►│  Order   │       │
//! │  │  Cart    │     │          │     │  Page    │     │ Created  │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │       ▲                │                                  │             │
//! │       │           add_to_cart                        place_order        │
//! │       │           update_quantity                   (checkout.rs)       │
//! │       │           remove_item                             │             │
//! │       │                │                                  │             │
//! │       └──── clear_cart ┘◄─────────── cart cleared ────────┘             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every successful mutation is saved to local storage before returning.

use serde::Serialize;
use tracing::debug;

use evolv_core::cart::checked_quantity;
use evolv_core::validation::validate_product_id;
use evolv_core::{CartLineItem, CoreError, LineKey, OrderTotals, TotalsScope};

use crate::error::ApiError;
use crate::Storefront;

/// Cart contents with preview totals (no tax yet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartLineItem>,
    /// Packs across all lines (the cart badge).
    pub item_count: u32,
    pub totals: OrderTotals,
}

impl CartResponse {
    fn current(store: &Storefront) -> Self {
        let (items, item_count) = store
            .cart()
            .with_cart(|c| (c.items().to_vec(), c.total_quantity()));
        CartResponse {
            items,
            item_count,
            totals: store.totals(TotalsScope::CartPreview),
        }
    }
}

/// Gets the current cart contents.
pub fn cart_items(store: &Storefront) -> CartResponse {
    debug!("cart_items command");
    CartResponse::current(store)
}

/// Totals for the cart drawer: subtotal, shipping and discount, no tax.
pub fn cart_totals(store: &Storefront) -> OrderTotals {
    debug!("cart_totals command");
    store.totals(TotalsScope::CartPreview)
}

/// Adds a pack of a product to the cart.
///
/// ## Behavior
/// - Same product and pack size already in cart: quantity increases
/// - Otherwise: added as a new line
/// - Name, image and pack price are "frozen" from the catalog at this moment
///
/// ```text
/// add_to_cart("whey-choc", 6, 1)
///        │
///        ▼
/// CatalogService::product ──► active? pack of 6 offered?
///        │
///        ▼
/// Cart::add_item { unit_price: ₹799.00, ... } ──► save ──► CartResponse
/// ```
pub async fn add_to_cart(
    store: &Storefront,
    product_id: &str,
    pack_size: u32,
    quantity: Option<i64>,
) -> Result<CartResponse, ApiError> {
    let quantity = quantity.unwrap_or(1);
    debug!(product_id = %product_id, pack_size, quantity, "add_to_cart command");

    validate_product_id(product_id).map_err(CoreError::from)?;
    let quantity = checked_quantity(quantity)?;

    let product = store.services().catalog.product(product_id).await?;
    if !product.is_active {
        return Err(ApiError::validation(format!(
            "{} is not available right now",
            product.name
        )));
    }
    let pack = product.pack(pack_size).ok_or_else(|| {
        ApiError::validation(format!(
            "{} is not sold in packs of {}",
            product.name, pack_size
        ))
    })?;

    let item = CartLineItem {
        product_id: product.id.clone(),
        name: product.name.clone(),
        pack_size,
        quantity,
        unit_price: pack.price,
        image_ref: product.image_ref.clone(),
    };
    store
        .cart()
        .with_cart_mut(|c| c.add_item(item).map(|_| ()))?;
    store.cart().persist().await;

    Ok(CartResponse::current(store))
}

/// Sets the quantity of a cart line.
///
/// ## Behavior
/// - Quantity 0: removes the line
/// - Negative or above the cap: error, cart unchanged
pub async fn update_quantity(
    store: &Storefront,
    product_id: &str,
    pack_size: u32,
    quantity: i64,
) -> Result<CartResponse, ApiError> {
    debug!(product_id = %product_id, pack_size, quantity, "update_quantity command");

    let key = LineKey::new(product_id, pack_size);
    store
        .cart()
        .with_cart_mut(|c| c.update_quantity(&key, quantity))?;
    store.cart().persist().await;

    Ok(CartResponse::current(store))
}

/// Removes a cart line. Removing a line that is not there is not an error.
pub async fn remove_item(store: &Storefront, product_id: &str, pack_size: u32) -> CartResponse {
    debug!(product_id = %product_id, pack_size, "remove_item command");

    let key = LineKey::new(product_id, pack_size);
    if store.cart().with_cart_mut(|c| c.remove_item(&key)) {
        store.cart().persist().await;
    }

    CartResponse::current(store)
}

/// Empties the cart. Discounts are left alone.
pub async fn clear_cart(store: &Storefront) -> CartResponse {
    debug!("clear_cart command");

    store.cart().with_cart_mut(|c| c.clear());
    store.cart().persist().await;

    CartResponse::current(store)
}
