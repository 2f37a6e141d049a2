//! # Order Totals
//!
//! One pure calculator shared by the cart drawer and the checkout page.
//!
//! ## Calculation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      calculate_totals()                                 │
//! │                                                                         │
//! │  line items ──► subtotal = Σ unit_price × quantity                     │
//! │                     │                                                   │
//! │                     ├──► shipping = 0 if subtotal ≥ ₹1000 else ₹50     │
//! │                     │                 (0 for an empty cart)            │
//! │                     │                                                   │
//! │                     ├──► tax = subtotal × 8%, half-up                  │
//! │                     │          (Checkout scope only, 0 in CartPreview) │
//! │                     │                                                   │
//! │  active discount ───┴──► total = max(0, subtotal + shipping + tax      │
//! │                                           − discount)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Worked Example
//! ```rust
//! use evolv_core::totals::{calculate_totals, PricingPolicy, TotalsScope};
//! use evolv_core::{CartLineItem, Money};
//!
//! let items = vec![CartLineItem {
//!     product_id: "A".to_string(),
//!     name: "Chocolate Whey Shake".to_string(),
//!     pack_size: 6,
//!     quantity: 1,
//!     unit_price: Money::from_rupees(799),
//!     image_ref: None,
//! }];
//! let policy = PricingPolicy::default();
//! let discount = Money::from_rupees(80);
//!
//! let preview = calculate_totals(&items, &policy, discount, TotalsScope::CartPreview);
//! assert_eq!(preview.total, Money::from_rupees(769));
//!
//! let checkout = calculate_totals(&items, &policy, discount, TotalsScope::Checkout);
//! assert_eq!(checkout.tax, Money::from_paise(6392));
//! assert_eq!(checkout.total, Money::from_paise(83292));
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{CartLineItem, TaxRate};

/// Default free-shipping threshold (₹1000).
pub const DEFAULT_FREE_SHIPPING_THRESHOLD: Money = Money::from_rupees(1000);

/// Default flat shipping fee below the threshold (₹50).
pub const DEFAULT_FLAT_SHIPPING_FEE: Money = Money::from_rupees(50);

/// Default tax rate (8%).
pub const DEFAULT_TAX_RATE: TaxRate = TaxRate::from_bps(800);

// =============================================================================
// Pricing Policy
// =============================================================================

/// Shipping and tax parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPolicy {
    /// Orders at or above this subtotal ship free.
    pub free_shipping_threshold: Money,
    pub flat_shipping_fee: Money,
    pub tax_rate: TaxRate,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        PricingPolicy {
            free_shipping_threshold: DEFAULT_FREE_SHIPPING_THRESHOLD,
            flat_shipping_fee: DEFAULT_FLAT_SHIPPING_FEE,
            tax_rate: DEFAULT_TAX_RATE,
        }
    }
}

impl PricingPolicy {
    /// Shipping cost for a given subtotal.
    ///
    /// ```rust
    /// use evolv_core::totals::PricingPolicy;
    /// use evolv_core::Money;
    ///
    /// let policy = PricingPolicy::default();
    /// assert_eq!(policy.shipping_for(Money::from_rupees(999)), Money::from_rupees(50));
    /// assert_eq!(policy.shipping_for(Money::from_rupees(1000)), Money::zero());
    /// ```
    pub fn shipping_for(&self, subtotal: Money) -> Money {
        if subtotal.is_zero() || subtotal >= self.free_shipping_threshold {
            Money::zero()
        } else {
            self.flat_shipping_fee
        }
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Which screen the totals are for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TotalsScope {
    /// The cart drawer: tax is not shown yet.
    CartPreview,
    /// The checkout page and the submitted order: tax included.
    Checkout,
}

/// Derived order amounts. Recomputed on every change, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub subtotal: Money,
    pub shipping_cost: Money,
    pub tax: Money,
    pub discount: Money,
    pub total: Money,
}

/// Computes order totals.
///
/// `discount` is the active discount amount (zero when none). The total is
/// floored at zero; a discount larger than the order never becomes a refund.
pub fn calculate_totals(
    items: &[CartLineItem],
    policy: &PricingPolicy,
    discount: Money,
    scope: TotalsScope,
) -> OrderTotals {
    let subtotal: Money = items.iter().map(CartLineItem::line_total).sum();
    let shipping_cost = policy.shipping_for(subtotal);
    let tax = match scope {
        TotalsScope::CartPreview => Money::zero(),
        TotalsScope::Checkout => subtotal.calculate_tax(policy.tax_rate),
    };
    let total = (subtotal + shipping_cost + tax - discount).floor_at_zero();

    OrderTotals {
        subtotal,
        shipping_cost,
        tax,
        discount,
        total,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: u32, paise: i64) -> CartLineItem {
        CartLineItem {
            product_id: "A".to_string(),
            name: "Vanilla Shake".to_string(),
            pack_size: 6,
            quantity,
            unit_price: Money::from_paise(paise),
            image_ref: None,
        }
    }

    #[test]
    fn test_preview_with_promo() {
        let totals = calculate_totals(
            &[item(1, 79900)],
            &PricingPolicy::default(),
            Money::from_rupees(80),
            TotalsScope::CartPreview,
        );

        assert_eq!(totals.subtotal, Money::from_rupees(799));
        assert_eq!(totals.shipping_cost, Money::from_rupees(50));
        assert_eq!(totals.tax, Money::zero());
        assert_eq!(totals.total, Money::from_rupees(769));
    }

    #[test]
    fn test_checkout_adds_tax() {
        let totals = calculate_totals(
            &[item(1, 79900)],
            &PricingPolicy::default(),
            Money::from_rupees(80),
            TotalsScope::Checkout,
        );

        assert_eq!(totals.tax, Money::from_major_minor(63, 92));
        assert_eq!(totals.total, Money::from_major_minor(832, 92));
    }

    #[test]
    fn test_total_never_negative() {
        // subtotal 100 (free shipping threshold lowered) + tax 8 − discount 500
        let policy = PricingPolicy {
            free_shipping_threshold: Money::from_rupees(100),
            ..PricingPolicy::default()
        };
        let totals = calculate_totals(
            &[item(1, 10000)],
            &policy,
            Money::from_rupees(500),
            TotalsScope::Checkout,
        );

        assert_eq!(totals.shipping_cost, Money::zero());
        assert_eq!(totals.tax, Money::from_rupees(8));
        assert_eq!(totals.discount, Money::from_rupees(500));
        assert_eq!(totals.total, Money::zero());
    }

    #[test]
    fn test_free_shipping_boundary() {
        let policy = PricingPolicy::default();

        let below = calculate_totals(&[item(1, 99900)], &policy, Money::zero(), TotalsScope::CartPreview);
        assert_eq!(below.shipping_cost, Money::from_rupees(50));

        let at = calculate_totals(&[item(1, 100000)], &policy, Money::zero(), TotalsScope::CartPreview);
        assert_eq!(at.shipping_cost, Money::zero());
    }

    #[test]
    fn test_empty_cart_is_all_zero() {
        let totals = calculate_totals(&[], &PricingPolicy::default(), Money::zero(), TotalsScope::Checkout);
        assert_eq!(totals.subtotal, Money::zero());
        assert_eq!(totals.shipping_cost, Money::zero());
        assert_eq!(totals.total, Money::zero());
    }

    #[test]
    fn test_multiple_lines_and_quantities() {
        let items = vec![item(2, 79900), item(3, 14900)];
        let totals = calculate_totals(&items, &PricingPolicy::default(), Money::zero(), TotalsScope::Checkout);

        // 1598 + 447 = 2045, free shipping, tax 163.60
        assert_eq!(totals.subtotal, Money::from_rupees(2045));
        assert_eq!(totals.shipping_cost, Money::zero());
        assert_eq!(totals.tax, Money::from_major_minor(163, 60));
        assert_eq!(totals.total, Money::from_major_minor(2208, 60));
    }
}
