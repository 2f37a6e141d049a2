//! # Service Traits
//!
//! One trait per external collaborator. The storefront holds them as
//! `Arc<dyn ...>` so tests can swap in fakes.
//!
//! ## Checkout Handshake
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  OrderService::create_order(draft)        ──► CreatedOrder { id }      │
//! │        │                                                                │
//! │        ▼  (online payment only)                                         │
//! │  PaymentGateway::create_payment(order id) ──► GatewayOrder             │
//! │        │                                                                │
//! │        ▼  UI opens the Razorpay sheet, customer pays                    │
//! │        │                                                                │
//! │  PaymentGateway::verify_payment(order id, PaymentConfirmation)          │
//! │        └──► verified: true / false                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use evolv_core::{Money, OrderDraft, Tier};

use crate::error::ClientResult;

// =============================================================================
// Results
// =============================================================================

/// A product as the catalog sells it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    pub id: String,
    pub name: String,
    /// First product image, used as the cart thumbnail.
    pub image_ref: Option<String>,
    pub packs: Vec<CatalogPack>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPack {
    pub size: u32,
    pub price: Money,
}

impl CatalogProduct {
    /// The pack offered in `size` units, if any.
    pub fn pack(&self, size: u32) -> Option<&CatalogPack> {
        self.packs.iter().find(|pack| pack.size == size)
    }
}

/// A promo code the promo service accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoValidation {
    pub discount_amount: Money,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyBalance {
    pub points: u32,
    pub tier: Tier,
}

/// The order record the order service created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedOrder {
    pub order_id: String,
    pub order_number: Option<String>,
    pub total: Money,
    pub points_earned: u32,
    pub new_tier: Option<Tier>,
}

/// What the UI needs to open the payment sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayOrder {
    pub razorpay_order_id: String,
    pub amount: Money,
    pub currency: String,
    pub key_id: String,
}

/// What the payment sheet hands back after the customer pays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmation {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

// =============================================================================
// Traits
// =============================================================================

#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn product(&self, product_id: &str) -> ClientResult<CatalogProduct>;
}

#[async_trait]
pub trait PromoService: Send + Sync {
    /// Validates `code` against the current subtotal. A refused code comes
    /// back as `ClientError::Rejected` with the server's reason.
    async fn validate(&self, code: &str, subtotal: Money) -> ClientResult<PromoValidation>;
}

#[async_trait]
pub trait LoyaltyService: Send + Sync {
    async fn balance(&self) -> ClientResult<LoyaltyBalance>;
}

#[async_trait]
pub trait OrderService: Send + Sync {
    /// Creates the order. `draft.idempotency_key` is sent with the request.
    async fn create_order(&self, draft: &OrderDraft) -> ClientResult<CreatedOrder>;
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_payment(&self, order_id: &str) -> ClientResult<GatewayOrder>;

    async fn verify_payment(
        &self,
        order_id: &str,
        confirmation: &PaymentConfirmation,
    ) -> ClientResult<bool>;
}
