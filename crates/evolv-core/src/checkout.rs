//! # Checkout
//!
//! Order payload assembly and the checkout state machine.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Checkout State Machine                             │
//! │                                                                         │
//! │   ┌──────┐ begin_submit ┌────────────┐ order_failed  ┌─────────────┐   │
//! │   │ Idle │─────────────►│ Submitting │──────────────►│ OrderFailed │   │
//! │   └──────┘              └─────┬──────┘               └──────┬──────┘   │
//! │     ▲  ▲                      │ order_created               │ → Idle   │
//! │     │  │                      ▼                                        │
//! │     │  │   cash on     ┌──────────────┐                               │
//! │     │  │   delivery ◄──│ OrderCreated │                               │
//! │     │  │      │        └──────┬───────┘                               │
//! │     │  │      │               │ begin_payment                         │
//! │     │  │      │               ▼                                        │
//! │     │  │      │       ┌────────────────┐ payment_failed ┌────────────┐ │
//! │     │  │      │       │ PaymentPending │───────────────►│PaymentFailed│ │
//! │     │  │      │       └───────┬────────┘                └─────┬──────┘ │
//! │     │  │      │               │ payment_succeeded             │        │
//! │     │  │      ▼               ▼                               │        │
//! │     │  │   ┌─────────────────────┐                            │        │
//! │     │  └───│   PaymentComplete   │         → Idle (order kept │        │
//! │     │      └─────────────────────┘           pending) ◄───────┘        │
//! │     └──── retry: Idle + pending order ── begin_payment ──►             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `OrderFailed` and `PaymentFailed` are not resting states: the flow drops
//! back to `Idle` immediately and records the failure. Nothing retries on
//! its own.

use serde::Serialize;
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::Cart;
use crate::discount::{ActiveDiscount, DiscountComposer};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::totals::{calculate_totals, OrderTotals, PricingPolicy, TotalsScope};
use crate::types::{Address, CartLineItem, PaymentMethod};
use crate::validation::validate_address;

// =============================================================================
// Order Draft
// =============================================================================

/// Everything the order service needs to create an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub items: Vec<CartLineItem>,
    pub shipping_address: Address,
    pub billing_address: Address,
    pub payment_method: PaymentMethod,
    pub totals: OrderTotals,
    pub promo_code: Option<String>,
    pub evolv_points_to_redeem: Option<u32>,
    /// Sent as the `Idempotency-Key` header; fresh for every submission.
    #[ts(type = "string")]
    pub idempotency_key: Uuid,
}

/// Builds the order payload from the current cart and discount.
///
/// ## Checks (before any network call)
/// - The cart is not empty
/// - Shipping address (and billing address, if given) is valid
///
/// Billing defaults to the shipping address. Totals use the checkout scope,
/// so tax is included.
pub fn build_order_draft(
    cart: &Cart,
    discounts: &DiscountComposer,
    policy: &PricingPolicy,
    shipping_address: Address,
    billing_address: Option<Address>,
    payment_method: PaymentMethod,
) -> CoreResult<OrderDraft> {
    if cart.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    validate_address(&shipping_address)?;
    let billing_address = match billing_address {
        Some(billing) => {
            validate_address(&billing)?;
            billing
        }
        None => shipping_address.clone(),
    };

    let totals = calculate_totals(
        cart.items(),
        policy,
        discounts.discount_amount(),
        TotalsScope::Checkout,
    );

    let (promo_code, evolv_points_to_redeem) = match discounts.active() {
        Some(ActiveDiscount::Promo(promo)) => (Some(promo.code.clone()), None),
        Some(ActiveDiscount::Points(points)) => (None, Some(points.points_to_redeem())),
        None => (None, None),
    };

    Ok(OrderDraft {
        items: cart.items().to_vec(),
        shipping_address,
        billing_address,
        payment_method,
        totals,
        promo_code,
        evolv_points_to_redeem,
        idempotency_key: Uuid::new_v4(),
    })
}

// =============================================================================
// Checkout State
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStage {
    Idle,
    Submitting,
    OrderCreated,
    PaymentPending,
    PaymentComplete,
    PaymentFailed,
    OrderFailed,
}

impl fmt::Display for CheckoutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckoutStage::Idle => "idle",
            CheckoutStage::Submitting => "submitting",
            CheckoutStage::OrderCreated => "order created",
            CheckoutStage::PaymentPending => "payment pending",
            CheckoutStage::PaymentComplete => "payment complete",
            CheckoutStage::PaymentFailed => "payment failed",
            CheckoutStage::OrderFailed => "order failed",
        };
        f.write_str(name)
    }
}

/// An order the order service created, awaiting (or past) payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PendingOrder {
    pub order_id: String,
    pub payment_method: PaymentMethod,
    pub total: Money,
}

/// The most recent failure, kept until the next submission or payment
/// attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutFailure {
    /// `OrderFailed` or `PaymentFailed`.
    pub stage: CheckoutStage,
    pub message: String,
}

/// Snapshot of the checkout flow for the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutStatus {
    pub stage: CheckoutStage,
    pub pending_order: Option<PendingOrder>,
    pub last_error: Option<CheckoutFailure>,
}

/// Checkout state machine.
///
/// Every transition checks the current stage and fails with
/// `InvalidTransition` instead of silently doing nothing.
#[derive(Debug, Clone)]
pub struct CheckoutFlow {
    stage: CheckoutStage,
    pending_order: Option<PendingOrder>,
    last_error: Option<CheckoutFailure>,
}

impl Default for CheckoutFlow {
    fn default() -> Self {
        CheckoutFlow {
            stage: CheckoutStage::Idle,
            pending_order: None,
            last_error: None,
        }
    }
}

impl CheckoutFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> CheckoutStage {
        self.stage
    }

    pub fn pending_order(&self) -> Option<&PendingOrder> {
        self.pending_order.as_ref()
    }

    pub fn last_error(&self) -> Option<&CheckoutFailure> {
        self.last_error.as_ref()
    }

    pub fn status(&self) -> CheckoutStatus {
        CheckoutStatus {
            stage: self.stage,
            pending_order: self.pending_order.clone(),
            last_error: self.last_error.clone(),
        }
    }

    /// Idle/PaymentComplete → Submitting.
    ///
    /// A new submission abandons an order still waiting for payment.
    pub fn begin_submit(&mut self) -> CoreResult<()> {
        match self.stage {
            CheckoutStage::Idle | CheckoutStage::PaymentComplete => {
                self.stage = CheckoutStage::Submitting;
                self.pending_order = None;
                self.last_error = None;
                Ok(())
            }
            stage => Err(CoreError::transition(stage, "submit an order")),
        }
    }

    /// Submitting → OrderFailed → Idle.
    pub fn order_failed(&mut self, message: impl Into<String>) -> CoreResult<()> {
        self.require_stage(CheckoutStage::Submitting, "fail an order")?;
        self.last_error = Some(CheckoutFailure {
            stage: CheckoutStage::OrderFailed,
            message: message.into(),
        });
        self.stage = CheckoutStage::Idle;
        Ok(())
    }

    /// Submitting → OrderCreated, or straight to PaymentComplete for cash
    /// on delivery.
    pub fn order_created(&mut self, order: PendingOrder) -> CoreResult<CheckoutStage> {
        self.require_stage(CheckoutStage::Submitting, "record a created order")?;
        self.stage = if order.payment_method.requires_online_payment() {
            CheckoutStage::OrderCreated
        } else {
            CheckoutStage::PaymentComplete
        };
        self.pending_order = Some(order);
        Ok(self.stage)
    }

    /// OrderCreated → PaymentPending, or a retry from Idle while an order
    /// is still pending.
    pub fn begin_payment(&mut self) -> CoreResult<PendingOrder> {
        let retry_allowed = self.stage == CheckoutStage::Idle
            && self
                .pending_order
                .as_ref()
                .is_some_and(|order| order.payment_method.requires_online_payment());
        if self.stage != CheckoutStage::OrderCreated && !retry_allowed {
            return Err(CoreError::transition(self.stage, "start a payment"));
        }

        let order = match &self.pending_order {
            Some(order) => order.clone(),
            None => return Err(CoreError::transition(self.stage, "start a payment")),
        };
        self.stage = CheckoutStage::PaymentPending;
        self.last_error = None;
        Ok(order)
    }

    /// PaymentPending → PaymentComplete.
    pub fn payment_succeeded(&mut self) -> CoreResult<PendingOrder> {
        self.require_stage(CheckoutStage::PaymentPending, "confirm a payment")?;
        let order = self
            .pending_order
            .clone()
            .ok_or_else(|| CoreError::transition(self.stage, "confirm a payment"))?;
        self.stage = CheckoutStage::PaymentComplete;
        Ok(order)
    }

    /// PaymentPending → PaymentFailed → Idle. The order stays pending so
    /// payment can be retried without creating a second order.
    pub fn payment_failed(&mut self, message: impl Into<String>) -> CoreResult<()> {
        self.require_stage(CheckoutStage::PaymentPending, "fail a payment")?;
        self.last_error = Some(CheckoutFailure {
            stage: CheckoutStage::PaymentFailed,
            message: message.into(),
        });
        self.stage = CheckoutStage::Idle;
        Ok(())
    }

    fn require_stage(&self, stage: CheckoutStage, action: &str) -> CoreResult<()> {
        if self.stage == stage {
            Ok(())
        } else {
            Err(CoreError::transition(self.stage, action))
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
