//! # Checkout State

use std::sync::Mutex;

use evolv_core::CheckoutFlow;

use super::lock;

/// The checkout state machine for this session.
#[derive(Debug, Default)]
pub struct CheckoutState {
    flow: Mutex<CheckoutFlow>,
}

impl CheckoutState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flow<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&CheckoutFlow) -> R,
    {
        let flow = lock(&self.flow);
        f(&flow)
    }

    pub fn with_flow_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut CheckoutFlow) -> R,
    {
        let mut flow = lock(&self.flow);
        f(&mut flow)
    }
}
