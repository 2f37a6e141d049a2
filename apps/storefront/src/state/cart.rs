//! # Cart State
//!
//! The session cart plus its durable copy.
//!
//! ## Save After Every Mutation
//! ```text
//! command ──► with_cart_mut(|c| c.add_item(..)) ──► persist()
//!                    │ (std Mutex, sync)                │ (async, SQLite)
//!                    ▼                                  ▼
//!               in-memory Cart                snapshot ──► CartRepository::save
//! ```
//!
//! A failed save is logged and the in-memory cart stays authoritative for
//! the session. Saves are serialised and each one snapshots the cart after
//! taking the save lock, so the last write always holds the latest cart.

use std::sync::Mutex;

use tokio::sync::Mutex as AsyncMutex;
use tracing::{info, warn};

use evolv_core::Cart;
use evolv_db::{CartLoad, CartRepository};

use super::lock;

#[derive(Debug)]
pub struct CartState {
    cart: Mutex<Cart>,
    repository: CartRepository,
    save_lock: AsyncMutex<()>,
}

impl CartState {
    /// Restores the saved cart, falling back to an empty one.
    pub async fn restore(repository: CartRepository) -> Self {
        let cart = match repository.load().await {
            CartLoad::Restored(cart) => {
                info!(lines = cart.line_count(), "Restored saved cart");
                cart
            }
            // The repository already logged the reason
            load => load.into_cart(),
        };

        CartState {
            cart: Mutex::new(cart),
            repository,
            save_lock: AsyncMutex::new(()),
        }
    }

    /// Executes a function with read access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = lock(&self.cart);
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    ///
    /// Call [`CartState::persist`] afterwards if the cart changed.
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = lock(&self.cart);
        f(&mut cart)
    }

    pub fn snapshot(&self) -> Cart {
        self.with_cart(Cart::clone)
    }

    /// Writes the current cart to local storage.
    pub async fn persist(&self) {
        let _guard = self.save_lock.lock().await;
        let snapshot = self.snapshot();

        if let Err(e) = self.repository.save(&snapshot).await {
            warn!(error = %e, "Could not save cart, keeping it in memory only");
        }
    }
}
