//! # Evolv Storefront
//!
//! The storefront session: cart, discount and checkout state wired to
//! local storage and the storefront REST API.
//!
//! ## Module Organization
//! ```text
//! evolv_storefront/
//! ├── lib.rs          ◄─── You are here (exports, logging setup)
//! ├── storefront.rs   ◄─── Storefront: state + injected services
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── cart.rs     ◄─── Cart + save-after-mutation
//! │   ├── discount.rs ◄─── Discount composer + loyalty balance
//! │   ├── checkout.rs ◄─── Checkout state machine
//! │   └── config.rs   ◄─── StorefrontConfig (TOML + EVOLV_* env)
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── cart.rs     ◄─── Cart manipulation
//! │   ├── discount.rs ◄─── Promo codes and Evolv points
//! │   └── checkout.rs ◄─── Order submission and payment
//! └── error.rs        ◄─── ApiError returned by every command
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init_tracing()            RUST_LOG or "info,evolv=debug,sqlx=warn"  │
//! │  2. StorefrontConfig::load()  defaults → storefront.toml → EVOLV_* env  │
//! │  3. Storefront::connect()     SQLite + migrations, REST client          │
//! │  4. saved cart restored       (corrupt data → empty cart, warning)      │
//! │  5. commands::*               the UI drives the session                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod state;
mod storefront;

#[cfg(test)]
mod testing;

use tracing_subscriber::EnvFilter;

pub use error::{ApiError, ErrorCode};
pub use storefront::{Services, Storefront};

/// Default log filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info,evolv=debug,sqlx=warn";

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=evolv_storefront=trace` - Trace the storefront only
/// - Default: [`DEFAULT_LOG_FILTER`]
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
