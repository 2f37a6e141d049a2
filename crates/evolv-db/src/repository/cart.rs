//! # Cart Repository
//!
//! Saves the cart after every mutation and restores it once at startup.
//!
//! ## Load Outcomes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          CartRepository::load()                         │
//! │                                                                         │
//! │  local_storage["cart"]                                                  │
//! │       │                                                                 │
//! │       ├── missing ─────────────────────────────────► CartLoad::Empty    │
//! │       │                                                                 │
//! │       ├── read error / bad JSON / unknown version ─┐                    │
//! │       │   items breaking cart invariants ──────────┴─► Recovered       │
//! │       │                                              (empty cart,       │
//! │       │                                               warn! logged)     │
//! │       │                                                                 │
//! │       └── valid envelope ──────────────────────────► Restored(cart)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The user never sees a storage failure; at worst they get an empty cart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use evolv_core::{Cart, CartLineItem};

use crate::error::{DbError, DbResult};
use crate::repository::local_storage::LocalStorage;

/// Storage key of the cart envelope.
pub const CART_KEY: &str = "cart";

/// Version written into every envelope. Unknown versions are discarded.
pub const CART_FORMAT_VERSION: u32 = 1;

/// On-disk form of the cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCart {
    version: u32,
    items: Vec<CartLineItem>,
    saved_at: DateTime<Utc>,
}

/// What [`CartRepository::load`] found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartLoad {
    /// A saved cart was read back.
    Restored(Cart),
    /// Nothing was saved yet.
    Empty,
    /// Saved data was unusable and was replaced by an empty cart.
    Recovered { reason: String },
}

impl CartLoad {
    /// The cart to start the session with.
    pub fn into_cart(self) -> Cart {
        match self {
            CartLoad::Restored(cart) => cart,
            CartLoad::Empty | CartLoad::Recovered { .. } => Cart::new(),
        }
    }
}

/// Repository for the persisted cart.
#[derive(Debug, Clone)]
pub struct CartRepository {
    storage: LocalStorage,
}

impl CartRepository {
    pub fn new(storage: LocalStorage) -> Self {
        CartRepository { storage }
    }

    /// Writes the full item list.
    pub async fn save(&self, cart: &Cart) -> DbResult<()> {
        let envelope = StoredCart {
            version: CART_FORMAT_VERSION,
            items: cart.items().to_vec(),
            saved_at: Utc::now(),
        };
        let json = serde_json::to_string(&envelope).map_err(|e| DbError::corrupt(CART_KEY, e))?;

        self.storage.set(CART_KEY, &json).await?;
        debug!(lines = cart.line_count(), "Cart saved");
        Ok(())
    }

    /// Reads the saved cart. Never fails: any problem becomes
    /// [`CartLoad::Recovered`].
    pub async fn load(&self) -> CartLoad {
        let raw = match self.storage.get(CART_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return CartLoad::Empty,
            Err(e) => return recovered(e.to_string()),
        };

        let envelope: StoredCart = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(e) => return recovered(format!("unreadable cart data: {}", e)),
        };

        if envelope.version != CART_FORMAT_VERSION {
            return recovered(format!("unknown cart format version {}", envelope.version));
        }

        match Cart::from_items(envelope.items) {
            Ok(cart) => {
                debug!(lines = cart.line_count(), saved_at = %envelope.saved_at, "Cart restored");
                CartLoad::Restored(cart)
            }
            Err(e) => recovered(format!("invalid cart contents: {}", e)),
        }
    }

    /// Removes the saved cart entirely.
    pub async fn delete(&self) -> DbResult<()> {
        self.storage.remove(CART_KEY).await?;
        Ok(())
    }
}

fn recovered(reason: String) -> CartLoad {
    warn!(reason = %reason, "Discarding saved cart, starting with an empty one");
    CartLoad::Recovered { reason }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use evolv_core::{LineKey, Money};
    use std::collections::HashMap;

    fn line(product_id: &str, pack_size: u32, quantity: u32, rupees: i64) -> CartLineItem {
        CartLineItem {
            product_id: product_id.to_string(),
            name: format!("Shake {}", product_id),
            pack_size,
            quantity,
            unit_price: Money::from_rupees(rupees),
            image_ref: Some(format!("/images/{}.png", product_id)),
        }
    }

    fn keyed(items: &[CartLineItem]) -> HashMap<LineKey, CartLineItem> {
        items.iter().map(|item| (item.key(), item.clone())).collect()
    }

    async fn repo() -> (Database, CartRepository) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.carts();
        (db, repo)
    }

    #[tokio::test]
    async fn test_nothing_saved_is_empty() {
        let (_db, repo) = repo().await;
        assert_eq!(repo.load().await, CartLoad::Empty);
    }

    #[tokio::test]
    async fn test_save_and_restore() {
        let (_db, repo) = repo().await;
        let mut cart = Cart::new();
        cart.add_item(line("A", 6, 2, 799)).unwrap();
        cart.add_item(line("A", 12, 1, 1499)).unwrap();
        cart.add_item(line("B", 6, 3, 699)).unwrap();

        repo.save(&cart).await.unwrap();

        match repo.load().await {
            CartLoad::Restored(restored) => {
                assert_eq!(keyed(restored.items()), keyed(cart.items()));
            }
            other => panic!("expected restored cart, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_latest_save_wins() {
        let (_db, repo) = repo().await;
        let mut cart = Cart::new();
        cart.add_item(line("A", 6, 1, 799)).unwrap();
        repo.save(&cart).await.unwrap();

        cart.clear();
        repo.save(&cart).await.unwrap();

        let restored = repo.load().await.into_cart();
        assert!(restored.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_data_recovers_to_empty() {
        let (db, repo) = repo().await;
        db.local_storage().set(CART_KEY, "{not json").await.unwrap();

        let load = repo.load().await;
        assert!(matches!(load, CartLoad::Recovered { .. }));
        assert!(load.into_cart().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_version_recovers_to_empty() {
        let (db, repo) = repo().await;
        let json = r#"{"version":99,"items":[],"savedAt":"2026-01-01T00:00:00Z"}"#;
        db.local_storage().set(CART_KEY, json).await.unwrap();

        match repo.load().await {
            CartLoad::Recovered { reason } => assert!(reason.contains("version 99")),
            other => panic!("expected recovery, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_items_recover_to_empty() {
        let (db, repo) = repo().await;
        let json = r#"{
            "version": 1,
            "items": [{"productId":"A","packSize":6,"quantity":0,"unitPrice":79900}],
            "savedAt": "2026-01-01T00:00:00Z"
        }"#;
        db.local_storage().set(CART_KEY, json).await.unwrap();

        assert!(matches!(repo.load().await, CartLoad::Recovered { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let (_db, repo) = repo().await;
        let mut cart = Cart::new();
        cart.add_item(line("A", 6, 1, 799)).unwrap();
        repo.save(&cart).await.unwrap();

        repo.delete().await.unwrap();
        assert_eq!(repo.load().await, CartLoad::Empty);
    }
}
