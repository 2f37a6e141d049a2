//! # Checkout Commands
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout Flow                                        │
//! │                                                                         │
//! │  place_order(address, method)                                           │
//! │     │  build draft (empty cart / bad address rejected here)             │
//! │     ▼                                                                   │
//! │  Idle ──► Submitting ──► OrderService::create_order ──┬──► OrderFailed  │
//! │                                                       │    (→ Idle)     │
//! │                                                       ▼                 │
//! │              ordered lines + discount removed ◄── OrderCreated          │
//! │                                                       │                 │
//! │            cash on delivery ◄─────────────────────────┤                 │
//! │            PaymentComplete                            ▼ Razorpay        │
//! │                                   PaymentGateway::create_payment        │
//! │                                                       │                 │
//! │                                                PaymentPending           │
//! │                                                       │                 │
//! │  confirm_payment(sheet result) ──► verify ──┬──► PaymentComplete        │
//! │  report_payment_failure(reason) ────────────┴──► PaymentFailed (→ Idle) │
//! │                                                       │                 │
//! │  retry_payment ◄── order still pending ◄──────────────┘                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use evolv_client::{CreatedOrder, GatewayOrder, PaymentConfirmation};
use evolv_core::checkout::build_order_draft;
use evolv_core::{
    Address, CheckoutStage, CheckoutStatus, CoreError, OrderTotals, PaymentMethod, PendingOrder,
    TotalsScope,
};

use crate::error::ApiError;
use crate::Storefront;

/// What the checkout form submits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub shipping_address: Address,
    /// Defaults to the shipping address.
    #[serde(default)]
    pub billing_address: Option<Address>,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderResponse {
    pub order: CreatedOrder,
    pub stage: CheckoutStage,
    /// Present for online payment: opens the Razorpay sheet.
    pub payment: Option<GatewayOrder>,
}

/// Totals for the checkout page, tax included.
pub fn checkout_totals(store: &Storefront) -> OrderTotals {
    debug!("checkout_totals command");
    store.totals(TotalsScope::Checkout)
}

pub fn checkout_status(store: &Storefront) -> CheckoutStatus {
    debug!("checkout_status command");
    store.checkout().with_flow(|f| f.status())
}

/// Submits the order.
///
/// ## Errors
/// - `VALIDATION_ERROR`: empty cart, bad address (before any network call),
///   or the order service refused the order
/// - `CHECKOUT_STATE`: a submission or payment is already in progress
/// - `NETWORK_ERROR`: the order service could not be reached
/// - `PAYMENT_ERROR`: the order exists but the payment could not be
///   started; use [`retry_payment`]
pub async fn place_order(
    store: &Storefront,
    request: PlaceOrderRequest,
) -> Result<PlaceOrderResponse, ApiError> {
    debug!(payment_method = %request.payment_method, "place_order command");

    let cart = store.cart().snapshot();
    let (draft, ordered_discount) = store.discounts().with_discounts(|d| {
        build_order_draft(
            &cart,
            d,
            store.pricing(),
            request.shipping_address,
            request.billing_address,
            request.payment_method,
        )
        .map(|draft| (draft, d.active().cloned()))
    })?;

    store.checkout().with_flow_mut(|f| f.begin_submit())?;
    info!(
        idempotency_key = %draft.idempotency_key,
        total = %draft.totals.total,
        lines = draft.items.len(),
        "Submitting order"
    );

    let order = match store.services().orders.create_order(&draft).await {
        Ok(order) => order,
        Err(e) => {
            let err = ApiError::from(e);
            warn!(error = %err, "Order submission failed");
            store
                .checkout()
                .with_flow_mut(|f| f.order_failed(err.message.clone()))?;
            return Err(err);
        }
    };

    let stage = store.checkout().with_flow_mut(|f| {
        f.order_created(PendingOrder {
            order_id: order.order_id.clone(),
            payment_method: draft.payment_method,
            total: order.total,
        })
    })?;
    info!(order_id = %order.order_id, stage = %stage, "Order created");

    // Only what went into this order leaves the session; lines and discounts
    // changed while the request was in flight stay for the next order
    let removed = store
        .cart()
        .with_cart_mut(|c| c.remove_ordered(&draft.items));
    let consumed = store
        .discounts()
        .with_discounts_mut(|d| d.consume(ordered_discount.as_ref()));
    store.discounts().invalidate_balance();
    store.cart().persist().await;
    debug!(
        lines_removed = removed,
        discount_consumed = consumed,
        "Ordered items taken out of the cart"
    );

    let payment = if stage == CheckoutStage::OrderCreated {
        Some(start_payment(store).await?)
    } else {
        None
    };

    Ok(PlaceOrderResponse {
        order,
        stage: store.checkout().with_flow(|f| f.stage()),
        payment,
    })
}

/// Verifies the result the Razorpay sheet handed back.
///
/// A signature the gateway does not accept fails the payment; the order
/// stays pending for [`retry_payment`].
pub async fn confirm_payment(
    store: &Storefront,
    confirmation: PaymentConfirmation,
) -> Result<CheckoutStatus, ApiError> {
    debug!(razorpay_order_id = %confirmation.razorpay_order_id, "confirm_payment command");

    let order = store.checkout().with_flow(|f| match f.stage() {
        CheckoutStage::PaymentPending => f
            .pending_order()
            .cloned()
            .ok_or_else(|| CoreError::transition(f.stage(), "confirm a payment")),
        stage => Err(CoreError::transition(stage, "confirm a payment")),
    })?;

    let failure = match store
        .services()
        .payments
        .verify_payment(&order.order_id, &confirmation)
        .await
    {
        Ok(true) => None,
        Ok(false) => Some(ApiError::payment("Payment could not be verified")),
        Err(e) => Some(ApiError::from_gateway(e)),
    };

    if let Some(err) = failure {
        warn!(order_id = %order.order_id, error = %err, "Payment failed");
        store
            .checkout()
            .with_flow_mut(|f| f.payment_failed(err.message.clone()))?;
        return Err(err);
    }

    let order = store.checkout().with_flow_mut(|f| f.payment_succeeded())?;
    info!(order_id = %order.order_id, total = %order.total, "Payment complete");
    Ok(checkout_status(store))
}

/// The customer closed the payment sheet or the gateway reported a failure.
pub fn report_payment_failure(
    store: &Storefront,
    reason: &str,
) -> Result<CheckoutStatus, ApiError> {
    debug!(reason = %reason, "report_payment_failure command");

    store.checkout().with_flow_mut(|f| f.payment_failed(reason))?;
    warn!(reason = %reason, "Payment failed");
    Ok(checkout_status(store))
}

/// Starts a new payment attempt for the order left pending by a failed
/// payment. No new order is created.
pub async fn retry_payment(store: &Storefront) -> Result<GatewayOrder, ApiError> {
    debug!("retry_payment command");
    start_payment(store).await
}

/// OrderCreated (or Idle with a pending order) → PaymentPending, then asks
/// the gateway for a payment order.
async fn start_payment(store: &Storefront) -> Result<GatewayOrder, ApiError> {
    let order = store.checkout().with_flow_mut(|f| f.begin_payment())?;

    match store.services().payments.create_payment(&order.order_id).await {
        Ok(gateway) => {
            info!(
                order_id = %order.order_id,
                razorpay_order_id = %gateway.razorpay_order_id,
                "Payment started"
            );
            Ok(gateway)
        }
        Err(e) => {
            let err = ApiError::from_gateway(e);
            warn!(order_id = %order.order_id, error = %err, "Could not start payment");
            store
                .checkout()
                .with_flow_mut(|f| f.payment_failed(err.message.clone()))?;
            Err(err)
        }
    }
}
