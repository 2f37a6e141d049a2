//! # Domain Types
//!
//! Core domain types used throughout the storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────────┐   ┌─────────────────┐  │
//! │  │  CartLineItem   │   │ PromoCodeApplication │   │ PointsRedemption│  │
//! │  │  ─────────────  │   │  ──────────────────  │   │  ─────────────  │  │
//! │  │  product_id ┐   │   │  code                │   │  points         │  │
//! │  │  pack_size  ┘key│   │  discount_amount     │   │  discount_amount│  │
//! │  │  quantity ≥ 1   │   │  description         │   │  (= points × ₹1)│  │
//! │  │  unit_price     │   └──────────────────────┘   └─────────────────┘  │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │  PaymentMethod  │   │      Tier       │       │
//! │  │  bps (u32)      │   │  Razorpay       │   │  Bronze         │       │
//! │  │  800 = 8%       │   │  CashOnDelivery │   │  Silver / Gold  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

/// Loyalty points redeem at one rupee each.
pub const POINT_VALUE: Money = Money::from_rupees(1);

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 800 bps = 8%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Cart Line Item
// =============================================================================

/// Identity of a cart line: the same product in two pack sizes is two lines.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineKey {
    pub product_id: String,
    pub pack_size: u32,
}

impl LineKey {
    pub fn new(product_id: impl Into<String>, pack_size: u32) -> Self {
        LineKey {
            product_id: product_id.into(),
            pack_size,
        }
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (pack of {})", self.product_id, self.pack_size)
    }
}

/// An item in the shopping cart.
///
/// ## Price Freezing
/// `unit_price` is the price of one pack at the moment the item was added.
/// Later catalog price changes do not touch lines already in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// Catalog product identifier.
    pub product_id: String,

    /// Product name at time of adding (frozen).
    #[serde(default)]
    pub name: String,

    /// Units per pack (e.g. 6 for a six-bottle pack).
    pub pack_size: u32,

    /// Number of packs. Always at least 1 while the line exists.
    pub quantity: u32,

    /// Price of one pack at time of adding (frozen).
    pub unit_price: Money,

    /// Product image shown in the cart drawer.
    #[serde(default)]
    pub image_ref: Option<String>,
}

impl CartLineItem {
    /// Returns the key identifying this line.
    pub fn key(&self) -> LineKey {
        LineKey::new(self.product_id.clone(), self.pack_size)
    }

    /// Checks whether this line is identified by `key`.
    pub fn matches(&self, key: &LineKey) -> bool {
        self.product_id == key.product_id && self.pack_size == key.pack_size
    }

    /// Calculates the line total (unit price × quantity).
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Discounts
// =============================================================================

/// A promo code accepted by the promo validation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PromoCodeApplication {
    /// Normalised (trimmed, upper-case) code.
    pub code: String,
    /// Fixed discount granted by the code.
    pub discount_amount: Money,
    /// Merchant-facing description, e.g. "10% off your first order".
    pub description: String,
}

/// A redemption of loyalty ("Evolv") points against the order.
///
/// Constructed only through [`PointsRedemption::new`], which keeps
/// `discount_amount == points × ₹1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PointsRedemption {
    points_to_redeem: u32,
    discount_amount: Money,
}

impl PointsRedemption {
    pub fn new(points_to_redeem: u32) -> Self {
        PointsRedemption {
            points_to_redeem,
            discount_amount: POINT_VALUE.multiply_quantity(points_to_redeem),
        }
    }

    pub fn points_to_redeem(&self) -> u32 {
        self.points_to_redeem
    }

    pub fn discount_amount(&self) -> Money {
        self.discount_amount
    }
}

// =============================================================================
// Checkout Types
// =============================================================================

/// A postal address for shipping or billing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub full_name: String,
    pub phone: String,
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

/// How the customer pays for the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Online payment through the Razorpay payment sheet.
    Razorpay,
    /// Pay the courier on delivery.
    #[serde(rename = "cod")]
    CashOnDelivery,
}

impl PaymentMethod {
    /// Online methods need the three-step gateway handshake after the order
    /// is created; cash on delivery is finalised immediately.
    pub fn requires_online_payment(&self) -> bool {
        matches!(self, PaymentMethod::Razorpay)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Razorpay => write!(f, "razorpay"),
            PaymentMethod::CashOnDelivery => write!(f, "cod"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "razorpay" | "online" | "card" | "upi" => Ok(PaymentMethod::Razorpay),
            "cod" | "cash" | "cash_on_delivery" => Ok(PaymentMethod::CashOnDelivery),
            _ => Err(crate::error::ValidationError::NotAllowed {
                field: "payment method".to_string(),
                allowed: vec!["razorpay".to_string(), "cod".to_string()],
            }),
        }
    }
}

// =============================================================================
// Loyalty
// =============================================================================

/// Loyalty membership level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Bronze,
    Silver,
    Gold,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Bronze => write!(f, "bronze"),
            Tier::Silver => write!(f, "silver"),
            Tier::Gold => write!(f, "gold"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(800);
        assert_eq!(rate.bps(), 800);
        assert!((rate.percentage() - 8.0).abs() < 0.001);
    }

    #[test]
    fn test_points_redemption_is_one_rupee_per_point() {
        let redemption = PointsRedemption::new(50);
        assert_eq!(redemption.points_to_redeem(), 50);
        assert_eq!(redemption.discount_amount(), Money::from_rupees(50));
    }

    #[test]
    fn test_line_item_serializes_camel_case() {
        let item = CartLineItem {
            product_id: "A".to_string(),
            name: "Chocolate Whey Shake".to_string(),
            pack_size: 6,
            quantity: 2,
            unit_price: Money::from_rupees(799),
            image_ref: None,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["productId"], "A");
        assert_eq!(json["packSize"], 6);
        assert_eq!(json["unitPrice"], 79900);
        assert_eq!(item.line_total(), Money::from_rupees(1598));
    }

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!("cod".parse::<PaymentMethod>().unwrap(), PaymentMethod::CashOnDelivery);
        assert_eq!("Razorpay".parse::<PaymentMethod>().unwrap(), PaymentMethod::Razorpay);
        assert!("cheque".parse::<PaymentMethod>().is_err());
        assert_eq!(
            serde_json::to_string(&PaymentMethod::CashOnDelivery).unwrap(),
            "\"cod\""
        );
    }

    #[test]
    fn test_tier_default() {
        assert_eq!(Tier::default(), Tier::Bronze);
        assert_eq!(serde_json::to_string(&Tier::Gold).unwrap(), "\"gold\"");
    }
}
