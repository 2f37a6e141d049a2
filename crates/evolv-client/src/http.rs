//! # HTTP Client
//!
//! `reqwest` implementation of every service trait against the storefront
//! REST API.
//!
//! ## Request Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  build request ──► + Authorization: Bearer (if configured)             │
//! │                ──► + Idempotency-Key (order creation only)             │
//! │                ──► send (timeout from ApiConfig)                       │
//! │                          │                                              │
//! │        ┌─────────────────┼──────────────────┬─────────────────┐        │
//! │        ▼                 ▼                  ▼                 ▼        │
//! │     2xx: decode     4xx: Rejected      5xx: Server     no response:    │
//! │     JSON body       { message from       { status }    Network/Timeout │
//! │                       error body }                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use evolv_core::{Money, OrderDraft};

use crate::config::ApiConfig;
use crate::dto::{
    decimal_to_money, money_to_decimal, CreateOrderRequest, CreateOrderResponse, ErrorBody,
    GatewayOrderRequest, GatewayOrderResponse, LoyaltyBalanceDto, ProductDto,
    PromoValidateRequest, PromoValidateResponse, VerifyPaymentRequest, VerifyPaymentResponse,
};
use crate::error::{ClientError, ClientResult};
use crate::services::{
    CatalogPack, CatalogProduct, CatalogService, CreatedOrder, GatewayOrder, LoyaltyBalance,
    LoyaltyService, OrderService, PaymentConfirmation, PaymentGateway, PromoService,
    PromoValidation,
};

/// Header carrying the per-submission idempotency key.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// REST client for the storefront API. Cheap to clone.
#[derive(Debug, Clone)]
pub struct HttpClient {
    config: ApiConfig,
    http: Client,
}

impl HttpClient {
    pub fn new(config: ApiConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::InvalidConfig(e.to_string()))?;
        Ok(HttpClient { config, http })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn get(&self, path: &str) -> ClientResult<RequestBuilder> {
        Ok(self.authorize(self.http.get(self.config.endpoint(path)?)))
    }

    fn post(&self, path: &str) -> ClientResult<RequestBuilder> {
        Ok(self.authorize(self.http.post(self.config.endpoint(path)?)))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends the request and decodes a 2xx JSON body.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().path().to_string();

        if status.is_success() {
            debug!(%status, path = %url, "API request succeeded");
            return response
                .json::<T>()
                .await
                .map_err(|e| ClientError::Decode(e.to_string()));
        }

        let text = response.text().await.unwrap_or_default();
        if status.is_server_error() {
            warn!(%status, path = %url, "API server error");
            return Err(ClientError::Server {
                status: status.as_u16(),
            });
        }

        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| default_message(status));
        debug!(%status, path = %url, %message, "API request rejected");
        Err(ClientError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

fn default_message(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Request rejected")
        .to_string()
}

// =============================================================================
// Service Implementations
// =============================================================================

#[async_trait]
impl CatalogService for HttpClient {
    async fn product(&self, product_id: &str) -> ClientResult<CatalogProduct> {
        let path = format!("products/{}", product_id);
        let dto: ProductDto = self.send(self.get(&path)?).await?;

        let packs = dto
            .packs
            .into_iter()
            .map(|pack| -> ClientResult<CatalogPack> {
                Ok(CatalogPack {
                    size: pack.size,
                    price: decimal_to_money(pack.price)?,
                })
            })
            .collect::<ClientResult<Vec<_>>>()?;

        Ok(CatalogProduct {
            id: dto.id,
            name: dto.name,
            image_ref: dto.images.into_iter().next(),
            packs,
            is_active: dto.is_active,
        })
    }
}

#[async_trait]
impl PromoService for HttpClient {
    async fn validate(&self, code: &str, subtotal: Money) -> ClientResult<PromoValidation> {
        let body = PromoValidateRequest {
            code,
            subtotal: money_to_decimal(subtotal),
        };
        let dto: PromoValidateResponse = self.send(self.post("promo/validate")?.json(&body)).await?;

        Ok(PromoValidation {
            discount_amount: decimal_to_money(dto.discount_amount)?,
            description: dto.description,
        })
    }
}

#[async_trait]
impl LoyaltyService for HttpClient {
    async fn balance(&self) -> ClientResult<LoyaltyBalance> {
        let dto: LoyaltyBalanceDto = self.send(self.get("loyalty/balance")?).await?;
        Ok(LoyaltyBalance {
            points: dto.points,
            tier: dto.tier.unwrap_or_default(),
        })
    }
}

#[async_trait]
impl OrderService for HttpClient {
    async fn create_order(&self, draft: &OrderDraft) -> ClientResult<CreatedOrder> {
        let body = CreateOrderRequest::from(draft);
        let request = self
            .post("orders")?
            .header(IDEMPOTENCY_KEY_HEADER, draft.idempotency_key.to_string())
            .json(&body);

        let dto: CreateOrderResponse = self.send(request).await?;
        Ok(CreatedOrder {
            order_id: dto.order.id,
            order_number: dto.order.order_number,
            total: decimal_to_money(dto.order.total)?,
            points_earned: dto.points_earned,
            new_tier: dto.new_tier,
        })
    }
}

#[async_trait]
impl PaymentGateway for HttpClient {
    async fn create_payment(&self, order_id: &str) -> ClientResult<GatewayOrder> {
        let body = GatewayOrderRequest { order_id };
        let dto: GatewayOrderResponse = self
            .send(self.post("payments/razorpay/order")?.json(&body))
            .await?;

        Ok(GatewayOrder {
            razorpay_order_id: dto.razorpay_order_id,
            amount: Money::from_paise(dto.amount),
            currency: dto.currency,
            key_id: dto.key_id,
        })
    }

    async fn verify_payment(
        &self,
        order_id: &str,
        confirmation: &PaymentConfirmation,
    ) -> ClientResult<bool> {
        let body = VerifyPaymentRequest {
            order_id,
            razorpay_order_id: &confirmation.razorpay_order_id,
            razorpay_payment_id: &confirmation.razorpay_payment_id,
            razorpay_signature: &confirmation.razorpay_signature,
        };
        let dto: VerifyPaymentResponse = self
            .send(self.post("payments/razorpay/verify")?.json(&body))
            .await?;
        Ok(dto.verified)
    }
}
