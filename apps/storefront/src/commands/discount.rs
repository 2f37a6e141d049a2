//! # Discount Commands
//!
//! Promo codes and Evolv points. At most one of the two is active; applying
//! one replaces the other.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  apply_promo_code("save10")                                             │
//! │     1. begin_promo ──► "SAVE10", generation 7        (lock, sync)       │
//! │     2. PromoService::validate("SAVE10", ₹799)        (no lock, async)   │
//! │     3. complete_promo(generation 7)                  (lock, sync)       │
//! │          generation still 7 ──► Applied                                 │
//! │          generation moved   ──► Superseded (response dropped)           │
//! │                                                                         │
//! │  apply_evolv_points(50)                                                 │
//! │     balance cached? ── no ──► LoyaltyService::balance                   │
//! │     apply_points(50, available) ──► Points replaces any promo           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::{debug, info, warn};

use evolv_client::LoyaltyBalance;
use evolv_core::{
    ActiveDiscount, CoreError, OrderTotals, PointsRedemption, PromoCodeApplication, PromoOutcome,
    TotalsScope,
};

use crate::error::ApiError;
use crate::Storefront;

/// The active discount with the cart totals it produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountResponse {
    pub active: Option<ActiveDiscount>,
    pub totals: OrderTotals,
}

impl DiscountResponse {
    fn current(store: &Storefront) -> Self {
        DiscountResponse {
            active: store.discounts().with_discounts(|d| d.active().cloned()),
            totals: store.totals(TotalsScope::CartPreview),
        }
    }
}

/// Result of a promo code round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum PromoResponse {
    Applied {
        promo: PromoCodeApplication,
        totals: OrderTotals,
    },
    /// The discount changed while the code was being validated; the
    /// response was dropped.
    Superseded,
}

// =============================================================================
// Promo Codes
// =============================================================================

pub fn promo_code(store: &Storefront) -> Option<PromoCodeApplication> {
    debug!("promo_code command");
    store.discounts().with_discounts(|d| d.promo().cloned())
}

/// Validates a promo code with the promo service and applies it.
///
/// The code is trimmed and upper-cased first; malformed codes fail without
/// a network call. A refused code leaves the current discount untouched.
pub async fn apply_promo_code(store: &Storefront, code: &str) -> Result<PromoResponse, ApiError> {
    debug!(code = %code, "apply_promo_code command");

    let request = store
        .discounts()
        .with_discounts_mut(|d| d.begin_promo(code))?;
    let subtotal = store.cart().with_cart(|c| c.subtotal());

    let validation = match store
        .services()
        .promo
        .validate(request.code(), subtotal)
        .await
    {
        Ok(validation) => validation,
        Err(e) => {
            if !store.discounts().with_discounts(|d| d.is_current(&request)) {
                warn!(code = %request.code(), "Dropping promo error for a superseded request");
                return Ok(PromoResponse::Superseded);
            }
            return Err(e.into());
        }
    };

    let outcome = store.discounts().with_discounts_mut(|d| {
        d.complete_promo(request, validation.discount_amount, validation.description)
    })?;

    match outcome {
        PromoOutcome::Applied(promo) => {
            info!(code = %promo.code, discount = %promo.discount_amount, "Promo code applied");
            Ok(PromoResponse::Applied {
                promo,
                totals: store.totals(TotalsScope::CartPreview),
            })
        }
        PromoOutcome::Stale => {
            warn!("Dropping promo response for a superseded request");
            Ok(PromoResponse::Superseded)
        }
    }
}

/// Removes the promo code. Points, if redeemed, stay.
pub fn remove_promo_code(store: &Storefront) -> DiscountResponse {
    debug!("remove_promo_code command");
    store.discounts().with_discounts_mut(|d| d.remove_promo());
    DiscountResponse::current(store)
}

// =============================================================================
// Evolv Points
// =============================================================================

pub fn points_redemption(store: &Storefront) -> Option<PointsRedemption> {
    debug!("points_redemption command");
    store.discounts().with_discounts(|d| d.points().cloned())
}

/// Fetches the customer's points balance and caches it for redemptions.
pub async fn refresh_loyalty_balance(store: &Storefront) -> Result<LoyaltyBalance, ApiError> {
    debug!("refresh_loyalty_balance command");

    let balance = store.services().loyalty.balance().await?;
    store.discounts().set_balance(balance);
    debug!(points = balance.points, tier = %balance.tier, "Loyalty balance refreshed");
    Ok(balance)
}

/// Redeems `points` Evolv points (1 point = ₹1) against the order.
///
/// Checked against the cached balance, fetched first if there is none.
pub async fn apply_evolv_points(store: &Storefront, points: i64) -> Result<DiscountResponse, ApiError> {
    debug!(points, "apply_evolv_points command");

    if points < 1 {
        return Err(CoreError::InvalidAmount { requested: points }.into());
    }

    let balance = match store.discounts().balance() {
        Some(balance) => balance,
        None => refresh_loyalty_balance(store).await?,
    };

    let redemption = store
        .discounts()
        .with_discounts_mut(|d| d.apply_points(points, balance.points))?;
    info!(
        points = redemption.points_to_redeem(),
        discount = %redemption.discount_amount(),
        "Evolv points redeemed"
    );

    Ok(DiscountResponse::current(store))
}

/// Cancels the points redemption. A promo code, if applied, stays.
pub fn remove_evolv_points(store: &Storefront) -> DiscountResponse {
    debug!("remove_evolv_points command");
    store.discounts().with_discounts_mut(|d| d.remove_points());
    DiscountResponse::current(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::commands::cart::add_to_cart;
    use crate::error::ErrorCode;
    use crate::testing::{storefront, FakeApi};
    use evolv_core::Money;

    #[tokio::test]
    async fn test_promo_preview_total() {
        let (store, _api) = storefront(FakeApi::new()).await;
        add_to_cart(&store, "whey-choc", 6, None).await.unwrap();

        let response = apply_promo_code(&store, "  save10 ").await.unwrap();
        match response {
            PromoResponse::Applied { promo, totals } => {
                assert_eq!(promo.code, "SAVE10");
                assert_eq!(promo.discount_amount, Money::from_rupees(80));
                assert_eq!(totals.subtotal, Money::from_rupees(799));
                assert_eq!(totals.shipping_cost, Money::from_rupees(50));
                assert_eq!(totals.discount, Money::from_rupees(80));
                assert_eq!(totals.total, Money::from_rupees(769));
            }
            other => panic!("expected Applied, got {:?}", other),
        }
        assert_eq!(promo_code(&store).unwrap().code, "SAVE10");
    }

    #[tokio::test]
    async fn test_refused_code_keeps_current_discount() {
        let (store, _api) = storefront(FakeApi::new()).await;
        add_to_cart(&store, "whey-choc", 6, None).await.unwrap();
        apply_promo_code(&store, "SAVE10").await.unwrap();

        let err = apply_promo_code(&store, "EXPIRED").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "Promo code expired");
        assert_eq!(promo_code(&store).unwrap().code, "SAVE10");

        // Malformed codes never reach the service
        let err = apply_promo_code(&store, "x!").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_stale_promo_response_is_dropped() {
        let api = FakeApi::new().with_slow_promo("SLOW50");
        let (store, api) = storefront(api).await;
        add_to_cart(&store, "whey-choc", 6, None).await.unwrap();
        let store = Arc::new(store);

        let pending = tokio::spawn({
            let store = Arc::clone(&store);
            async move { apply_promo_code(&store, "SLOW50").await }
        });

        // While the service is still thinking, the customer redeems points
        api.promo_started().await;
        apply_evolv_points(&store, 50).await.unwrap();
        api.release_promo();

        let response = pending.await.unwrap().unwrap();
        assert_eq!(response, PromoResponse::Superseded);
        assert!(promo_code(&store).is_none());
        assert_eq!(points_redemption(&store).unwrap().points_to_redeem(), 50);
    }

    #[tokio::test]
    async fn test_points_and_promo_are_exclusive() {
        let (store, _api) = storefront(FakeApi::new()).await;
        add_to_cart(&store, "whey-choc", 6, None).await.unwrap();

        apply_promo_code(&store, "SAVE10").await.unwrap();
        let response = apply_evolv_points(&store, 100).await.unwrap();
        assert!(matches!(response.active, Some(ActiveDiscount::Points(_))));
        assert!(promo_code(&store).is_none());
        assert_eq!(response.totals.discount, Money::from_rupees(100));

        // Removing the (absent) promo keeps the points
        let response = remove_promo_code(&store);
        assert!(matches!(response.active, Some(ActiveDiscount::Points(_))));

        let response = remove_evolv_points(&store);
        assert!(response.active.is_none());
        assert_eq!(response.totals.discount, Money::zero());
    }

    #[tokio::test]
    async fn test_insufficient_points() {
        let api = FakeApi::new().with_points(50);
        let (store, _api) = storefront(api).await;

        let err = apply_evolv_points(&store, 51).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(points_redemption(&store).is_none());

        let err = apply_evolv_points(&store, 0).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        apply_evolv_points(&store, 50).await.unwrap();
        assert_eq!(
            points_redemption(&store).unwrap().discount_amount(),
            Money::from_rupees(50)
        );
    }

    #[tokio::test]
    async fn test_balance_is_cached() {
        let api = FakeApi::new().with_points(200);
        let (store, api) = storefront(api).await;

        let balance = refresh_loyalty_balance(&store).await.unwrap();
        assert_eq!(balance.points, 200);

        apply_evolv_points(&store, 10).await.unwrap();
        apply_evolv_points(&store, 20).await.unwrap();
        assert_eq!(api.balance_calls(), 1);
    }
}
