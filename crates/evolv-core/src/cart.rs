//! # Cart
//!
//! The shopping cart: line items keyed by `(product_id, pack_size)`.
//!
//! ## Cart Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cart Operations                                  │
//! │                                                                         │
//! │  UI Action              Cart Method            Effect                   │
//! │  ─────────              ───────────            ──────                   │
//! │                                                                         │
//! │  "Add to cart" ───────► add_item() ──────────► merge or append line    │
//! │                                                                         │
//! │  +/- stepper ─────────► update_quantity() ───► replace qty (0 removes) │
//! │                                                                         │
//! │  Trash icon ──────────► remove_item() ───────► drop line (no-op if gone)│
//! │                                                                         │
//! │  Order placed ────────► remove_ordered() ────► drop what was ordered   │
//! │                                                                         │
//! │  "Clear cart" ────────► clear() ─────────────► empty cart              │
//! │                                                                         │
//! │  App start ───────────► from_items() ────────► rebuild from storage    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by [`LineKey`]; adding an existing key merges quantities
//! - Every line has `1 <= quantity <= MAX_ITEM_QUANTITY`
//! - At most [`MAX_LINE_ITEMS`] lines
//! - Every unit price is within `0..=MAX_UNIT_PRICE`, so the subtotal of a
//!   full cart fits in an `i64`
//!
//! Persistence is not this module's concern: the storefront saves
//! [`Cart::items`] after every successful mutation.

use serde::Serialize;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{CartLineItem, LineKey};
use crate::validation::{validate_pack_size, validate_product_id};
use crate::{MAX_ITEM_QUANTITY, MAX_LINE_ITEMS, MAX_UNIT_PRICE};

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Rebuilds a cart from a stored item list.
    ///
    /// Strict: any line breaking a cart invariant (zero quantity, duplicate
    /// key, negative price, too many lines) rejects the whole list. The
    /// caller decides whether to fall back to an empty cart.
    pub fn from_items(items: Vec<CartLineItem>) -> CoreResult<Self> {
        if items.len() > MAX_LINE_ITEMS {
            return Err(CoreError::CartTooLarge { max: MAX_LINE_ITEMS });
        }

        for (index, item) in items.iter().enumerate() {
            check_line(item)?;
            if item.quantity == 0 {
                return Err(ValidationError::MustBePositive {
                    field: "quantity".to_string(),
                }
                .into());
            }
            if item.quantity > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: item.quantity as u64,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            if items[..index].iter().any(|other| other.key() == item.key()) {
                return Err(ValidationError::InvalidFormat {
                    field: "cart".to_string(),
                    reason: format!("duplicate line {}", item.key()),
                }
                .into());
            }
        }

        Ok(Cart { items })
    }

    /// Adds a line or increases the quantity of an existing one.
    ///
    /// ## Behavior
    /// - Same `(product_id, pack_size)` already present: quantity increases
    ///   by exactly `item.quantity`; price and name of the existing line stay
    /// - Otherwise: the line is appended
    ///
    /// Returns the resulting line.
    pub fn add_item(&mut self, item: CartLineItem) -> CoreResult<&CartLineItem> {
        check_line(&item)?;
        if item.quantity == 0 {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            }
            .into());
        }

        let key = item.key();
        if let Some(index) = self.position(&key) {
            let line = &mut self.items[index];
            let new_qty = line.quantity as u64 + item.quantity as u64;
            if new_qty > MAX_ITEM_QUANTITY as u64 {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            line.quantity = new_qty as u32;
            return Ok(&self.items[index]);
        }

        if item.quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: item.quantity as u64,
                max: MAX_ITEM_QUANTITY,
            });
        }

        if self.items.len() >= MAX_LINE_ITEMS {
            return Err(CoreError::CartTooLarge { max: MAX_LINE_ITEMS });
        }

        self.items.push(item);
        Ok(&self.items[self.items.len() - 1])
    }

    /// Replaces the quantity of a line.
    ///
    /// ## Behavior
    /// - `0`: same as [`Cart::remove_item`] (no error if the line is absent)
    /// - negative: rejected, nothing changes
    /// - above the cap: `QuantityTooLarge`, nothing changes
    /// - key not in cart: `ItemNotInCart`
    pub fn update_quantity(&mut self, key: &LineKey, quantity: i64) -> CoreResult<()> {
        if quantity == 0 {
            self.remove_item(key);
            return Ok(());
        }

        let quantity = checked_quantity(quantity)?;

        match self.items.iter_mut().find(|line| line.matches(key)) {
            Some(line) => {
                line.quantity = quantity;
                Ok(())
            }
            None => Err(CoreError::ItemNotInCart {
                key: key.to_string(),
            }),
        }
    }

    /// Removes a line. Returns `false` if it was not in the cart.
    pub fn remove_item(&mut self, key: &LineKey) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|line| !line.matches(key));
        self.items.len() != initial_len
    }

    /// Removes all lines.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Takes the lines of a placed order out of the cart.
    ///
    /// Each ordered quantity is subtracted from the matching line; a line
    /// that reaches zero is dropped. Lines added while the order was being
    /// submitted, and extra packs merged into an ordered line, stay.
    ///
    /// Returns the number of lines removed.
    pub fn remove_ordered(&mut self, ordered: &[CartLineItem]) -> usize {
        let initial_len = self.items.len();
        for ordered_line in ordered {
            let key = ordered_line.key();
            if let Some(line) = self.items.iter_mut().find(|line| line.matches(&key)) {
                line.quantity = line.quantity.saturating_sub(ordered_line.quantity);
            }
        }
        self.items.retain(|line| line.quantity > 0);
        initial_len - self.items.len()
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Looks up a line by key.
    pub fn get(&self, key: &LineKey) -> Option<&CartLineItem> {
        self.items.iter().find(|line| line.matches(key))
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Total number of packs across all lines (the cart badge).
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }

    /// Σ unit price × quantity.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, key: &LineKey) -> Option<usize> {
        self.items.iter().position(|line| line.matches(key))
    }
}

/// Validates a quantity entered by the user and narrows it to `u32`.
///
/// ## Rules
/// - Negative: `Negative`
/// - Above [`MAX_ITEM_QUANTITY`]: `QuantityTooLarge`
///
/// Zero passes; whether it means "remove" or "rejected" is up to the caller.
///
/// ```rust
/// use evolv_core::cart::checked_quantity;
/// use evolv_core::CoreError;
///
/// assert_eq!(checked_quantity(99).unwrap(), 99);
/// assert!(matches!(
///     checked_quantity(100),
///     Err(CoreError::QuantityTooLarge { requested: 100, max: 99 })
/// ));
/// ```
pub fn checked_quantity(quantity: i64) -> CoreResult<u32> {
    if quantity < 0 {
        return Err(ValidationError::Negative {
            field: "quantity".to_string(),
        }
        .into());
    }
    if quantity > MAX_ITEM_QUANTITY as i64 {
        return Err(CoreError::QuantityTooLarge {
            requested: quantity as u64,
            max: MAX_ITEM_QUANTITY,
        });
    }
    Ok(quantity as u32)
}

/// Checks the parts of a line that do not depend on the rest of the cart.
fn check_line(item: &CartLineItem) -> CoreResult<()> {
    validate_product_id(&item.product_id)?;
    validate_pack_size(item.pack_size)?;
    if item.unit_price.is_negative() {
        return Err(ValidationError::Negative {
            field: "unit price".to_string(),
        }
        .into());
    }
    if item.unit_price > MAX_UNIT_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "unit price".to_string(),
            min: 0,
            max: MAX_UNIT_PRICE.paise(),
        }
        .into());
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: &str, pack_size: u32, quantity: u32, rupees: i64) -> CartLineItem {
        CartLineItem {
            product_id: product_id.to_string(),
            name: format!("Shake {}", product_id),
            pack_size,
            quantity,
            unit_price: Money::from_rupees(rupees),
            image_ref: None,
        }
    }

    #[test]
    fn test_add_item() {
        let mut cart = Cart::new();
        cart.add_item(line("A", 6, 2, 799)).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.subtotal(), Money::from_rupees(1598));
    }

    #[test]
    fn test_add_same_key_merges_quantity() {
        let mut cart = Cart::new();
        cart.add_item(line("A", 6, 2, 799)).unwrap();
        let merged = cart.add_item(line("A", 6, 3, 749)).unwrap();

        assert_eq!(merged.quantity, 5);
        // First price wins: prices are frozen when the line is created
        assert_eq!(merged.unit_price, Money::from_rupees(799));
        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn test_pack_sizes_are_separate_lines() {
        let mut cart = Cart::new();
        cart.add_item(line("A", 6, 1, 799)).unwrap();
        cart.add_item(line("A", 12, 1, 1499)).unwrap();

        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.subtotal(), Money::from_rupees(2298));
    }

    #[test]
    fn test_add_rejects_zero_quantity() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.add_item(line("A", 6, 0, 799)),
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_quantity_cap() {
        let mut cart = Cart::new();
        cart.add_item(line("A", 6, 90, 799)).unwrap();

        let err = cart.add_item(line("A", 6, 10, 799)).unwrap_err();
        assert!(matches!(err, CoreError::QuantityTooLarge { requested: 100, max: 99 }));
        assert_eq!(cart.get(&LineKey::new("A", 6)).unwrap().quantity, 90);

        assert!(matches!(
            cart.add_item(line("B", 6, 100, 799)),
            Err(CoreError::QuantityTooLarge { requested: 100, .. })
        ));
        assert!(matches!(
            cart.update_quantity(&LineKey::new("A", 6), 100),
            Err(CoreError::QuantityTooLarge { requested: 100, .. })
        ));
        assert!(matches!(
            checked_quantity(i64::MAX),
            Err(CoreError::QuantityTooLarge { .. })
        ));
    }

    #[test]
    fn test_unit_price_cap() {
        let mut cart = Cart::new();
        let mut huge = line("A", 6, 3, 0);
        huge.unit_price = Money::from_paise(i64::MAX / 2);

        assert!(matches!(
            cart.add_item(huge.clone()),
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
        assert!(cart.is_empty());
        assert!(Cart::from_items(vec![huge]).is_err());

        // A full cart at the most expensive allowed price still sums
        let mut priciest = line("A", 6, MAX_ITEM_QUANTITY, 0);
        priciest.unit_price = MAX_UNIT_PRICE;
        let full: Vec<_> = (0..MAX_LINE_ITEMS)
            .map(|i| CartLineItem {
                product_id: format!("P{}", i),
                ..priciest.clone()
            })
            .collect();
        let cart = Cart::from_items(full).unwrap();
        assert_eq!(
            cart.subtotal().paise(),
            MAX_UNIT_PRICE.paise() * MAX_ITEM_QUANTITY as i64 * MAX_LINE_ITEMS as i64
        );
    }

    #[test]
    fn test_remove_ordered_keeps_later_additions() {
        let mut cart = Cart::new();
        cart.add_item(line("A", 6, 2, 799)).unwrap();
        cart.add_item(line("B", 6, 1, 699)).unwrap();
        let ordered = cart.items().to_vec();

        // Added while the order was in flight
        cart.add_item(line("A", 6, 1, 799)).unwrap();
        cart.add_item(line("C", 12, 1, 1499)).unwrap();

        assert_eq!(cart.remove_ordered(&ordered), 1);
        assert_eq!(cart.get(&LineKey::new("A", 6)).unwrap().quantity, 1);
        assert!(cart.get(&LineKey::new("B", 6)).is_none());
        assert_eq!(cart.get(&LineKey::new("C", 12)).unwrap().quantity, 1);

        // A line removed meanwhile is simply absent
        let mut cart = Cart::new();
        assert_eq!(cart.remove_ordered(&ordered), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_line_cap() {
        let mut cart = Cart::new();
        for i in 0..MAX_LINE_ITEMS {
            cart.add_item(line(&format!("P{}", i), 6, 1, 100)).unwrap();
        }
        assert!(matches!(
            cart.add_item(line("ONE-MORE", 6, 1, 100)),
            Err(CoreError::CartTooLarge { .. })
        ));
        // Merging into an existing line is still allowed
        assert!(cart.add_item(line("P0", 6, 1, 100)).is_ok());
    }

    #[test]
    fn test_update_quantity() {
        let mut cart = Cart::new();
        let key = LineKey::new("A", 6);
        cart.add_item(line("A", 6, 1, 799)).unwrap();

        cart.update_quantity(&key, 4).unwrap();
        assert_eq!(cart.get(&key).unwrap().quantity, 4);

        assert!(matches!(
            cart.update_quantity(&key, -1),
            Err(CoreError::Validation(ValidationError::Negative { .. }))
        ));
        assert_eq!(cart.get(&key).unwrap().quantity, 4);

        cart.update_quantity(&key, 0).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_missing_line() {
        let mut cart = Cart::new();
        let key = LineKey::new("GHOST", 6);

        assert!(matches!(
            cart.update_quantity(&key, 2),
            Err(CoreError::ItemNotInCart { .. })
        ));
        // Zero behaves like remove and is a no-op on an absent line
        assert!(cart.update_quantity(&key, 0).is_ok());
    }

    #[test]
    fn test_remove_item() {
        let mut cart = Cart::new();
        cart.add_item(line("A", 6, 1, 799)).unwrap();
        cart.add_item(line("B", 6, 1, 699)).unwrap();

        assert!(cart.remove_item(&LineKey::new("A", 6)));
        assert!(!cart.remove_item(&LineKey::new("A", 6)));
        assert_eq!(cart.line_count(), 1);

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Money::zero());
    }

    #[test]
    fn test_no_sequence_leaves_non_positive_quantity() {
        let mut cart = Cart::new();
        let a = LineKey::new("A", 6);
        let b = LineKey::new("B", 12);
        let ops: Vec<Box<dyn Fn(&mut Cart)>> = vec![
            Box::new(|c: &mut Cart| {
                let _ = c.add_item(line("A", 6, 3, 799));
            }),
            Box::new(|c: &mut Cart| {
                let _ = c.update_quantity(&LineKey::new("A", 6), -2);
            }),
            Box::new(|c: &mut Cart| {
                let _ = c.add_item(line("B", 12, 0, 1499));
            }),
            Box::new(|c: &mut Cart| {
                let _ = c.add_item(line("B", 12, 1, 1499));
            }),
            Box::new(|c: &mut Cart| {
                let _ = c.update_quantity(&LineKey::new("B", 12), 0);
            }),
            Box::new(|c: &mut Cart| {
                let _ = c.update_quantity(&LineKey::new("A", 6), 1);
            }),
            Box::new(|c: &mut Cart| {
                let _ = c.remove_item(&LineKey::new("A", 6));
            }),
            Box::new(|c: &mut Cart| {
                let _ = c.update_quantity(&LineKey::new("A", 6), 5);
            }),
        ];

        for op in &ops {
            op(&mut cart);
            assert!(cart.items().iter().all(|l| l.quantity >= 1));
        }
        assert!(cart.get(&a).is_none());
        assert!(cart.get(&b).is_none());
    }

    #[test]
    fn test_from_items_rejects_broken_lists() {
        assert!(Cart::from_items(vec![line("A", 6, 1, 799), line("B", 6, 2, 699)]).is_ok());
        assert!(Cart::from_items(vec![line("A", 6, 0, 799)]).is_err());
        assert!(Cart::from_items(vec![line("A", 6, 1, 799), line("A", 6, 2, 799)]).is_err());
        assert!(Cart::from_items(vec![line("A", 0, 1, 799)]).is_err());
        assert!(Cart::from_items(vec![line("A", 6, 1, -5)]).is_err());
    }
}
