//! # Wire DTOs
//!
//! JSON shapes of the REST API. The API speaks decimal rupees
//! (`"subtotal": 799.0`); everything past this module is integer paise.
//!
//! ```text
//! JSON 63.92 ──► Decimal ──► × 100, round half away from zero ──► Money(6392)
//! Money(6392) ──► Decimal::new(6392, 2) ──► JSON 63.92
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use evolv_core::{Address, CartLineItem, Money, OrderDraft, PaymentMethod, Tier};

use crate::error::{ClientError, ClientResult};

// =============================================================================
// Money Conversion
// =============================================================================

pub fn money_to_decimal(money: Money) -> Decimal {
    Decimal::new(money.paise(), 2)
}

pub fn decimal_to_money(amount: Decimal) -> ClientResult<Money> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|paise| paise.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|paise| paise.to_i64())
        .map(Money::from_paise)
        .ok_or_else(|| ClientError::Decode(format!("amount out of range: {}", amount)))
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub packs: Vec<PackDto>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PackDto {
    pub size: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Promo
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct PromoValidateRequest<'a> {
    pub code: &'a str,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoValidateResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_amount: Decimal,
    #[serde(default)]
    pub description: String,
}

// =============================================================================
// Loyalty
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct LoyaltyBalanceDto {
    pub points: u32,
    #[serde(default)]
    pub tier: Option<Tier>,
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDto {
    pub product_id: String,
    pub name: String,
    pub pack_size: u32,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl From<&CartLineItem> for OrderItemDto {
    fn from(item: &CartLineItem) -> Self {
        OrderItemDto {
            product_id: item.product_id.clone(),
            name: item.name.clone(),
            pack_size: item.pack_size,
            quantity: item.quantity,
            price: money_to_decimal(item.unit_price),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentDto {
    pub method: PaymentMethod,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItemDto>,
    pub shipping_address: Address,
    pub billing_address: Address,
    pub payment: PaymentDto,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping_cost: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evolv_points_to_redeem: Option<u32>,
}

impl From<&OrderDraft> for CreateOrderRequest {
    fn from(draft: &OrderDraft) -> Self {
        CreateOrderRequest {
            items: draft.items.iter().map(OrderItemDto::from).collect(),
            shipping_address: draft.shipping_address.clone(),
            billing_address: draft.billing_address.clone(),
            payment: PaymentDto {
                method: draft.payment_method,
            },
            subtotal: money_to_decimal(draft.totals.subtotal),
            shipping_cost: money_to_decimal(draft.totals.shipping_cost),
            tax: money_to_decimal(draft.totals.tax),
            total: money_to_decimal(draft.totals.total),
            promo_code: draft.promo_code.clone(),
            evolv_points_to_redeem: draft.evolv_points_to_redeem,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub order: OrderSummaryDto,
    #[serde(default)]
    pub points_earned: u32,
    #[serde(default)]
    pub new_tier: Option<Tier>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummaryDto {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub order_number: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

// =============================================================================
// Payments
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayOrderRequest<'a> {
    pub order_id: &'a str,
}

/// Razorpay amounts are integer paise, unlike the rest of the API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayOrderResponse {
    pub razorpay_order_id: String,
    pub amount: i64,
    pub currency: String,
    pub key_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentRequest<'a> {
    pub order_id: &'a str,
    pub razorpay_order_id: &'a str,
    pub razorpay_payment_id: &'a str,
    pub razorpay_signature: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyPaymentResponse {
    pub verified: bool,
}

// =============================================================================
// Errors
// =============================================================================

/// Error body the API returns with 4xx/5xx. Older endpoints use `error`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.message.or(self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_decimal_conversion() {
        assert_eq!(money_to_decimal(Money::from_paise(83292)).to_string(), "832.92");
        assert_eq!(
            decimal_to_money(Decimal::new(6392, 2)).unwrap(),
            Money::from_paise(6392)
        );
        // Sub-paisa amounts round half away from zero
        assert_eq!(decimal_to_money(Decimal::new(12345, 3)).unwrap().paise(), 1235);
    }

    #[test]
    fn test_float_amounts_parse() {
        let body: PromoValidateResponse =
            serde_json::from_str(r#"{"discountAmount": 80, "description": "₹80 off"}"#).unwrap();
        assert_eq!(decimal_to_money(body.discount_amount).unwrap(), Money::from_rupees(80));

        let pack: PackDto = serde_json::from_str(r#"{"size": 6, "price": 63.92}"#).unwrap();
        assert_eq!(decimal_to_money(pack.price).unwrap(), Money::from_paise(6392));
    }

    #[test]
    fn test_error_body_message() {
        let body: ErrorBody = serde_json::from_str(r#"{"error": "expired"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("expired"));
    }
}
