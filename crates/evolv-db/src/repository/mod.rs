//! # Repositories
//!
//! ```text
//! Database ──► local_storage() ──► LocalStorage   (key/value table)
//!          └─► carts() ──────────► CartRepository (the "cart" key)
//! ```

pub mod cart;
pub mod local_storage;
