//! # evolv-client: REST Clients for the Evolv Storefront
//!
//! Typed access to the services the storefront consumes. Amounts cross the
//! wire as decimal rupees and come out of this crate as [`Money`] paise.
//!
//! ## Module Organization
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          evolv-client                                   │
//! │                                                                         │
//! │  services.rs   traits: CatalogService, PromoService, LoyaltyService,   │
//! │                        OrderService, PaymentGateway                    │
//! │       ▲                                                                 │
//! │       │ implements                                                      │
//! │  http.rs       HttpClient (reqwest)                                    │
//! │       │                                                                 │
//! │       ├── config.rs   ApiConfig (base URL, timeout, bearer token)      │
//! │       ├── dto.rs      JSON shapes + Decimal ⇄ Money                    │
//! │       └── error.rs    ClientError                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`Money`]: evolv_core::Money

pub mod config;
mod dto;
pub mod error;
pub mod http;
pub mod services;

pub use config::ApiConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use services::{
    CatalogPack, CatalogProduct, CatalogService, CreatedOrder, GatewayOrder, LoyaltyBalance,
    LoyaltyService, OrderService, PaymentConfirmation, PaymentGateway, PromoService,
    PromoValidation,
};
