//! # State Module
//!
//! Session state owned by the [`Storefront`](crate::Storefront).
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────┐          │
//! │  │  CartState   │  │  DiscountState   │  │  CheckoutState   │          │
//! │  │              │  │                  │  │                  │          │
//! │  │  Mutex<Cart> │  │  Mutex<Discount  │  │  Mutex<Checkout  │          │
//! │  │  + repository│  │    Composer>     │  │    Flow>         │          │
//! │  │  (SQLite)    │  │  + points cache  │  │                  │          │
//! │  └──────────────┘  └──────────────────┘  └──────────────────┘          │
//! │                                                                         │
//! │  ┌──────────────────┐                                                   │
//! │  │ StorefrontConfig │  read-only after startup                         │
//! │  └──────────────────┘                                                   │
//! │                                                                         │
//! │  LOCKING:                                                              │
//! │  • std Mutex, held only for synchronous mutations                      │
//! │  • never held across .await                                            │
//! │  • a poisoned lock is recovered; every mutation leaves valid state     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod checkout;
mod config;
mod discount;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use cart::CartState;
pub use checkout::CheckoutState;
pub use config::{
    default_config_path, ApiSection, ConfigError, PricingSection, StorageSection,
    StorefrontConfig, CONFIG_FILE_NAME, IN_MEMORY_DATABASE,
};
pub use discount::DiscountState;

/// Locks `mutex`, recovering the data if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
