//! In-process fakes for the storefront services.

use std::collections::HashMap;
use std::ops::Deref;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use evolv_client::{
    CatalogPack, CatalogProduct, CatalogService, ClientError, ClientResult, CreatedOrder,
    GatewayOrder, LoyaltyBalance, LoyaltyService, OrderService, PaymentConfirmation,
    PaymentGateway, PromoService, PromoValidation,
};
use evolv_core::{Address, Money, OrderDraft, PricingPolicy, Tier};
use evolv_db::{Database, DbConfig};

use crate::storefront::{Services, Storefront};

pub struct FakeApi {
    products: Mutex<HashMap<String, CatalogProduct>>,
    slow_promo: Option<String>,
    promo_started: Notify,
    promo_release: Notify,
    points: u32,
    fail_orders: bool,
    slow_orders: bool,
    order_started: Notify,
    order_release: Notify,
    orders: Mutex<Vec<OrderDraft>>,
    payments: AtomicUsize,
    balance_calls: AtomicUsize,
}

impl FakeApi {
    pub fn new() -> Self {
        let products = [
            CatalogProduct {
                id: "whey-choc".to_string(),
                name: "Chocolate Whey Shake".to_string(),
                image_ref: Some("/img/choc.png".to_string()),
                packs: vec![
                    CatalogPack {
                        size: 6,
                        price: Money::from_rupees(799),
                    },
                    CatalogPack {
                        size: 12,
                        price: Money::from_paise(149950),
                    },
                ],
                is_active: true,
            },
            CatalogProduct {
                id: "retired-bar".to_string(),
                name: "Peanut Protein Bar".to_string(),
                image_ref: None,
                packs: vec![CatalogPack {
                    size: 6,
                    price: Money::from_rupees(499),
                }],
                is_active: false,
            },
        ];

        FakeApi {
            products: Mutex::new(products.into_iter().map(|p| (p.id.clone(), p)).collect()),
            slow_promo: None,
            promo_started: Notify::new(),
            promo_release: Notify::new(),
            points: 500,
            fail_orders: false,
            slow_orders: false,
            order_started: Notify::new(),
            order_release: Notify::new(),
            orders: Mutex::new(Vec::new()),
            payments: AtomicUsize::new(0),
            balance_calls: AtomicUsize::new(0),
        }
    }

    /// `code` is accepted for ₹50 off, but only after [`FakeApi::release_promo`].
    pub fn with_slow_promo(mut self, code: &str) -> Self {
        self.slow_promo = Some(code.to_string());
        self
    }

    pub fn with_points(mut self, points: u32) -> Self {
        self.points = points;
        self
    }

    /// Order creation answers 503.
    pub fn with_failing_orders(mut self) -> Self {
        self.fail_orders = true;
        self
    }

    /// Order creation waits for [`FakeApi::release_order`].
    pub fn with_slow_orders(mut self) -> Self {
        self.slow_orders = true;
        self
    }

    pub fn set_price(&self, product_id: &str, size: u32, price: Money) {
        let mut products = self.products.lock().unwrap();
        let product = products.get_mut(product_id).unwrap();
        for pack in product.packs.iter_mut().filter(|p| p.size == size) {
            pack.price = price;
        }
    }

    /// Resolves once the slow promo validation is in flight.
    pub async fn promo_started(&self) {
        self.promo_started.notified().await;
    }

    pub fn release_promo(&self) {
        self.promo_release.notify_one();
    }

    /// Resolves once a slow order request is in flight.
    pub async fn order_started(&self) {
        self.order_started.notified().await;
    }

    pub fn release_order(&self) {
        self.order_release.notify_one();
    }

    pub fn last_order(&self) -> Option<OrderDraft> {
        self.orders.lock().unwrap().last().cloned()
    }

    pub fn orders_created(&self) -> usize {
        self.orders.lock().unwrap().len()
    }

    pub fn payments_started(&self) -> usize {
        self.payments.load(Ordering::SeqCst)
    }

    pub fn balance_calls(&self) -> usize {
        self.balance_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogService for FakeApi {
    async fn product(&self, product_id: &str) -> ClientResult<CatalogProduct> {
        self.products
            .lock()
            .unwrap()
            .get(product_id)
            .cloned()
            .ok_or_else(|| ClientError::Rejected {
                status: 404,
                message: "Product not found".to_string(),
            })
    }
}

#[async_trait]
impl PromoService for FakeApi {
    async fn validate(&self, code: &str, _subtotal: Money) -> ClientResult<PromoValidation> {
        if self.slow_promo.as_deref() == Some(code) {
            self.promo_started.notify_one();
            self.promo_release.notified().await;
            return Ok(PromoValidation {
                discount_amount: Money::from_rupees(50),
                description: "₹50 off".to_string(),
            });
        }

        match code {
            "SAVE10" => Ok(PromoValidation {
                discount_amount: Money::from_rupees(80),
                description: "₹80 off".to_string(),
            }),
            "EXPIRED" => Err(ClientError::Rejected {
                status: 400,
                message: "Promo code expired".to_string(),
            }),
            _ => Err(ClientError::Rejected {
                status: 400,
                message: "Invalid promo code".to_string(),
            }),
        }
    }
}

#[async_trait]
impl LoyaltyService for FakeApi {
    async fn balance(&self) -> ClientResult<LoyaltyBalance> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        Ok(LoyaltyBalance {
            points: self.points,
            tier: Tier::Silver,
        })
    }
}

#[async_trait]
impl OrderService for FakeApi {
    async fn create_order(&self, draft: &OrderDraft) -> ClientResult<CreatedOrder> {
        if self.fail_orders {
            return Err(ClientError::Server { status: 503 });
        }
        if self.slow_orders {
            self.order_started.notify_one();
            self.order_release.notified().await;
        }

        let mut orders = self.orders.lock().unwrap();
        orders.push(draft.clone());
        Ok(CreatedOrder {
            order_id: format!("ord_{}", orders.len()),
            order_number: Some(format!("EV-{:04}", orders.len())),
            total: draft.totals.total,
            points_earned: 0,
            new_tier: None,
        })
    }
}

#[async_trait]
impl PaymentGateway for FakeApi {
    async fn create_payment(&self, _order_id: &str) -> ClientResult<GatewayOrder> {
        let n = self.payments.fetch_add(1, Ordering::SeqCst) + 1;
        let amount = self
            .last_order()
            .map(|draft| draft.totals.total)
            .unwrap_or_default();
        Ok(GatewayOrder {
            razorpay_order_id: "order_rzp_1".to_string(),
            amount,
            currency: "INR".to_string(),
            key_id: format!("rzp_test_key_{}", n),
        })
    }

    async fn verify_payment(
        &self,
        _order_id: &str,
        confirmation: &PaymentConfirmation,
    ) -> ClientResult<bool> {
        Ok(confirmation.razorpay_signature == "good-signature")
    }
}

// =============================================================================
// Test Storefront
// =============================================================================

/// A storefront over an in-memory database, kept so the session can be
/// reopened against the same storage.
pub struct TestStore {
    store: Storefront,
    db: Database,
}

impl TestStore {
    /// A fresh session over the same local storage, as after a restart.
    pub async fn reopen(&self, api: Arc<FakeApi>) -> TestStore {
        let store = Storefront::new(self.db.carts(), services(api), PricingPolicy::default()).await;
        TestStore {
            store,
            db: self.db.clone(),
        }
    }
}

impl Deref for TestStore {
    type Target = Storefront;

    fn deref(&self) -> &Storefront {
        &self.store
    }
}

fn services(api: Arc<FakeApi>) -> Services {
    Services {
        catalog: api.clone(),
        promo: api.clone(),
        loyalty: api.clone(),
        orders: api.clone(),
        payments: api,
    }
}

pub async fn storefront(api: FakeApi) -> (TestStore, Arc<FakeApi>) {
    let api = Arc::new(api);
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let store = Storefront::new(db.carts(), services(api.clone()), PricingPolicy::default()).await;
    (TestStore { store, db }, api)
}

pub fn address() -> Address {
    Address {
        full_name: "Asha Rao".to_string(),
        phone: "+91 98765-43210".to_string(),
        line1: "12 MG Road".to_string(),
        line2: Some("Flat 4B".to_string()),
        city: "Bengaluru".to_string(),
        state: "Karnataka".to_string(),
        postal_code: "560001".to_string(),
        country: "India".to_string(),
    }
}
