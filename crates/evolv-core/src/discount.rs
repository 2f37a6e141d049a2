//! # Discount Composer
//!
//! Holds the single discount that applies to the cart: either one promo
//! code or one loyalty-point redemption, never both.
//!
//! ## Exclusivity
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Discount Composer State                              │
//! │                                                                         │
//! │                      ┌──────────────┐                                   │
//! │        ┌────────────►│     None     │◄─────────────┐                    │
//! │        │ remove_promo└──────┬───────┘ remove_points│                    │
//! │        │                    │                      │                    │
//! │        │      promo applied │ apply_points         │                    │
//! │        │           ┌────────┴────────┐             │                    │
//! │        │           ▼                 ▼             │                    │
//! │  ┌─────┴──────────────┐     ┌────────────────────┐ │                    │
//! │  │ Promo(application) │◄───►│ Points(redemption) │─┘                    │
//! │  └────────────────────┘     └────────────────────┘                      │
//! │      applying one kind replaces the other                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stale Promo Responses
//! Promo codes are validated by a remote service. Applying a code is split
//! in two so the network call happens outside any lock:
//!
//! ```text
//! begin_promo("save10") ──► PromoRequest { code: "SAVE10", generation: 7 }
//!          │
//!          ▼  (await promo service)
//! complete_promo(request, ₹80, "...")
//!          │
//!          ├── generation still 7 ──► Applied
//!          └── something else happened meanwhile (apply/remove) ──► Stale
//! ```

use serde::Serialize;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{PointsRedemption, PromoCodeApplication};
use crate::validation::normalize_promo_code;

// =============================================================================
// Active Discount
// =============================================================================

/// The discount currently applied to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ActiveDiscount {
    Promo(PromoCodeApplication),
    Points(PointsRedemption),
}

impl ActiveDiscount {
    /// Amount subtracted from the order total.
    pub fn amount(&self) -> Money {
        match self {
            ActiveDiscount::Promo(promo) => promo.discount_amount,
            ActiveDiscount::Points(points) => points.discount_amount(),
        }
    }
}

/// An in-flight promo validation.
///
/// Created by [`DiscountComposer::begin_promo`]; hand it back to
/// [`DiscountComposer::complete_promo`] once the promo service answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoRequest {
    code: String,
    generation: u64,
}

impl PromoRequest {
    /// The normalised code to send to the promo service.
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Result of completing a promo validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromoOutcome {
    Applied(PromoCodeApplication),
    /// A newer apply/remove happened while the request was in flight; the
    /// response was dropped and the discount is unchanged.
    Stale,
}

// =============================================================================
// Discount Composer
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct DiscountComposer {
    active: Option<ActiveDiscount>,
    generation: u64,
}

impl DiscountComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts applying a promo code.
    ///
    /// The code is trimmed, upper-cased and format-checked here; a code that
    /// fails the local check never reaches the promo service.
    pub fn begin_promo(&mut self, code: &str) -> CoreResult<PromoRequest> {
        let code = normalize_promo_code(code).map_err(|e| CoreError::InvalidCode {
            code: code.trim().to_string(),
            reason: e.to_string(),
        })?;

        self.generation += 1;
        Ok(PromoRequest {
            code,
            generation: self.generation,
        })
    }

    /// Finishes a promo validation the service accepted.
    ///
    /// On success the promo replaces whatever discount was active,
    /// including a points redemption.
    pub fn complete_promo(
        &mut self,
        request: PromoRequest,
        discount_amount: Money,
        description: impl Into<String>,
    ) -> CoreResult<PromoOutcome> {
        if request.generation != self.generation {
            return Ok(PromoOutcome::Stale);
        }

        if discount_amount.is_negative() {
            return Err(CoreError::InvalidDiscountAmount {
                amount: discount_amount,
            });
        }

        let application = PromoCodeApplication {
            code: request.code,
            discount_amount,
            description: description.into(),
        };
        self.active = Some(ActiveDiscount::Promo(application.clone()));
        Ok(PromoOutcome::Applied(application))
    }

    /// Checks whether a response for `request` would still be applied.
    pub fn is_current(&self, request: &PromoRequest) -> bool {
        request.generation == self.generation
    }

    /// Redeems loyalty points against the order.
    ///
    /// ## Rules
    /// - `points >= 1` (`InvalidAmount` otherwise)
    /// - `points <= available` (`InsufficientPoints` otherwise)
    /// - Replaces an active promo code
    ///
    /// ```rust
    /// use evolv_core::discount::DiscountComposer;
    /// use evolv_core::Money;
    ///
    /// let mut discounts = DiscountComposer::new();
    /// assert!(discounts.apply_points(51, 50).is_err());
    ///
    /// let redemption = discounts.apply_points(50, 50).unwrap();
    /// assert_eq!(redemption.discount_amount(), Money::from_rupees(50));
    /// ```
    pub fn apply_points(&mut self, points: i64, available: u32) -> CoreResult<PointsRedemption> {
        if points < 1 {
            return Err(CoreError::InvalidAmount { requested: points });
        }
        if points > available as i64 {
            return Err(CoreError::InsufficientPoints {
                requested: points,
                available,
            });
        }

        let redemption = PointsRedemption::new(points as u32);
        self.generation += 1;
        self.active = Some(ActiveDiscount::Points(redemption.clone()));
        Ok(redemption)
    }

    /// Clears the promo code. Never touches a points redemption.
    ///
    /// Returns whether a promo was removed. Also invalidates any in-flight
    /// promo request.
    pub fn remove_promo(&mut self) -> bool {
        self.generation += 1;
        if matches!(self.active, Some(ActiveDiscount::Promo(_))) {
            self.active = None;
            return true;
        }
        false
    }

    /// Clears the points redemption. Never touches a promo code.
    pub fn remove_points(&mut self) -> bool {
        self.generation += 1;
        if matches!(self.active, Some(ActiveDiscount::Points(_))) {
            self.active = None;
            return true;
        }
        false
    }

    /// Drops the discount a placed order used, if it is still the active one.
    ///
    /// A discount applied or replaced while the order was being submitted
    /// was not part of that order and stays. In-flight promo requests are
    /// left alone. Returns whether the discount was dropped.
    pub fn consume(&mut self, ordered: Option<&ActiveDiscount>) -> bool {
        match ordered {
            Some(ordered) if self.active.as_ref() == Some(ordered) => {
                self.active = None;
                true
            }
            _ => false,
        }
    }

    pub fn active(&self) -> Option<&ActiveDiscount> {
        self.active.as_ref()
    }

    pub fn promo(&self) -> Option<&PromoCodeApplication> {
        match &self.active {
            Some(ActiveDiscount::Promo(promo)) => Some(promo),
            _ => None,
        }
    }

    pub fn points(&self) -> Option<&PointsRedemption> {
        match &self.active {
            Some(ActiveDiscount::Points(points)) => Some(points),
            _ => None,
        }
    }

    /// Discount amount to subtract from the total (zero when none).
    pub fn discount_amount(&self) -> Money {
        self.active
            .as_ref()
            .map(ActiveDiscount::amount)
            .unwrap_or_default()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
