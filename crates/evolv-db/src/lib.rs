//! # evolv-db: Local Storage for the Evolv Storefront
//!
//! Durable client-side storage on SQLite via sqlx. Today it holds one
//! thing that matters: the cart, so a customer's picks survive a restart.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Data Flow                             │
//! │                                                                         │
//! │  Storefront command (add_to_cart)                                      │
//! │       │  mutate Cart in memory, then save                              │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     evolv-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│ LocalStorage   │    │  (embedded)  │  │   │
//! │  │   │  SqlitePool   │    │ CartRepository │    │ 001_local_   │  │   │
//! │  │   │               │    │                │    │  storage.sql │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  storefront.db in the platform data directory                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use evolv_db::{CartLoad, Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("storefront.db")).await?;
//! let cart = db.carts().load().await.into_cart();
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::cart::{CartLoad, CartRepository};
pub use repository::local_storage::LocalStorage;
