//! # Discount State
//!
//! The active discount plus the customer's last known loyalty balance.
//!
//! ## Promo Round Trip
//! ```text
//! with_discounts_mut(begin_promo) ──► PromoRequest { code, generation }
//!        │  lock released
//!        ▼
//! PromoService::validate(code, subtotal)          (async, no lock held)
//!        │
//!        ▼
//! with_discounts_mut(complete_promo) ──► Applied | Stale
//! ```
//!
//! Anything that touches the discount in between (another promo, points,
//! removal) bumps the generation, and the late response is dropped.

use std::sync::Mutex;

use evolv_client::LoyaltyBalance;
use evolv_core::DiscountComposer;

use super::lock;

#[derive(Debug, Default)]
pub struct DiscountState {
    composer: Mutex<DiscountComposer>,
    balance: Mutex<Option<LoyaltyBalance>>,
}

impl DiscountState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_discounts<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&DiscountComposer) -> R,
    {
        let composer = lock(&self.composer);
        f(&composer)
    }

    pub fn with_discounts_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut DiscountComposer) -> R,
    {
        let mut composer = lock(&self.composer);
        f(&mut composer)
    }

    /// Last balance fetched from the loyalty service, if any.
    pub fn balance(&self) -> Option<LoyaltyBalance> {
        *lock(&self.balance)
    }

    pub fn set_balance(&self, balance: LoyaltyBalance) {
        *lock(&self.balance) = Some(balance);
    }

    /// Forgets the balance so the next redemption fetches a fresh one.
    pub fn invalidate_balance(&self) {
        *lock(&self.balance) = None;
    }
}
