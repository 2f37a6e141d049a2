//! # Storefront
//!
//! One shopping session: cart, discount and checkout state, the services
//! they talk to, and the pricing rules. Commands take `&Storefront`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Storefront                                     │
//! │                                                                         │
//! │  CartState ──► DiscountState ──► totals ──► CheckoutState               │
//! │      │               │                           │                      │
//! │      ▼               ▼                           ▼                      │
//! │  CartRepository  PromoService              OrderService                 │
//! │  (SQLite)        LoyaltyService            PaymentGateway               │
//! │                                                                         │
//! │  CatalogService: prices and images for add_to_cart                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tracing::info;

use evolv_client::{
    CatalogService, HttpClient, LoyaltyService, OrderService, PaymentGateway, PromoService,
};
use evolv_core::totals::calculate_totals;
use evolv_core::{DiscountComposer, OrderTotals, PricingPolicy, TotalsScope};
use evolv_db::{CartRepository, Database, DbConfig};

use crate::error::ApiError;
use crate::state::{CartState, CheckoutState, DiscountState, StorefrontConfig, IN_MEMORY_DATABASE};

/// The external services a storefront calls.
#[derive(Clone)]
pub struct Services {
    pub catalog: Arc<dyn CatalogService>,
    pub promo: Arc<dyn PromoService>,
    pub loyalty: Arc<dyn LoyaltyService>,
    pub orders: Arc<dyn OrderService>,
    pub payments: Arc<dyn PaymentGateway>,
}

impl Services {
    /// Every service backed by one REST client.
    pub fn http(client: HttpClient) -> Self {
        let client = Arc::new(client);
        Services {
            catalog: client.clone(),
            promo: client.clone(),
            loyalty: client.clone(),
            orders: client.clone(),
            payments: client,
        }
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct Storefront {
    cart: CartState,
    discounts: DiscountState,
    checkout: CheckoutState,
    services: Services,
    pricing: PricingPolicy,
}

impl Storefront {
    /// Builds a storefront, restoring the saved cart from `repository`.
    pub async fn new(
        repository: CartRepository,
        services: Services,
        pricing: PricingPolicy,
    ) -> Self {
        Storefront {
            cart: CartState::restore(repository).await,
            discounts: DiscountState::new(),
            checkout: CheckoutState::new(),
            services,
            pricing,
        }
    }

    /// Opens local storage and the REST client described by `config`.
    ///
    /// ## Startup Sequence
    /// 1. Resolve the database path (platform data dir unless configured)
    /// 2. Open SQLite, run migrations
    /// 3. Build the REST client
    /// 4. Restore the saved cart
    pub async fn connect(config: &StorefrontConfig) -> Result<Self, ApiError> {
        let db_path = config.database_path()?;
        let db_config = if db_path.as_os_str() == IN_MEMORY_DATABASE {
            DbConfig::in_memory()
        } else {
            DbConfig::new(db_path.clone())
        };
        let db = Database::new(db_config).await?;
        info!(path = %db_path.display(), "Local storage ready");

        let client = HttpClient::new(config.api_config()?)?;
        info!(api = %client.config().base_url(), "API client ready");

        Ok(Storefront::new(db.carts(), Services::http(client), config.pricing_policy()).await)
    }

    pub fn cart(&self) -> &CartState {
        &self.cart
    }

    pub fn discounts(&self) -> &DiscountState {
        &self.discounts
    }

    pub fn checkout(&self) -> &CheckoutState {
        &self.checkout
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn pricing(&self) -> &PricingPolicy {
        &self.pricing
    }

    /// Totals for the current cart and discount.
    pub fn totals(&self, scope: TotalsScope) -> OrderTotals {
        let discount = self
            .discounts
            .with_discounts(DiscountComposer::discount_amount);
        self.cart
            .with_cart(|cart| calculate_totals(cart.items(), &self.pricing, discount, scope))
    }
}
