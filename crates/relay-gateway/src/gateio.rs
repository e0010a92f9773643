//! Gate.io spot REST gateway (APIv4).
//!
//! Signed-request scheme per APIv4: every private call carries `KEY`,
//! `Timestamp` and `SIGN` headers, where the signature is
//! `hex(HMAC-SHA512(secret, "METHOD\nPATH\nQUERY\nhex(SHA512(body))\nts"))`.

use std::time::Duration;

use hmac::{Hmac, Mac};
use reqwest::{Client, Method, StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use tracing::{debug, warn};

use relay_core::{OrderType, Quantity};

use crate::error::{GatewayError, GatewayResult};
use crate::gateway::{BoxFuture, CreatedOrder, ExchangeGateway, FillSnapshot, OrderRequest};

type HmacSha512 = Hmac<Sha512>;

const API_PREFIX: &str = "/api/v4";
const DEFAULT_BASE_URL: &str = "https://api.gateio.ws";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Gateway construction parameters.
#[derive(Debug, Clone)]
pub struct GateIoConfig {
    pub api_key: String,
    pub api_secret: String,
    /// Host override for the sandbox environment.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl GateIoConfig {
    pub fn new(api_key: String, api_secret: String) -> Self {
        Self {
            api_key,
            api_secret,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

/// Wire payload for `POST /spot/orders`.
#[derive(Debug, Serialize)]
struct SpotOrderPayload {
    currency_pair: String,
    #[serde(rename = "type")]
    order_type: String,
    side: String,
    amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    price: Option<String>,
    time_in_force: String,
    text: String,
}

/// Subset of the spot order response the relay consumes.
#[derive(Debug, Deserialize)]
struct SpotOrderResponse {
    id: String,
    status: String,
    amount: Decimal,
    left: Decimal,
}

/// Error body shape returned by APIv4 on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    label: String,
    #[serde(default)]
    message: String,
}

/// Production gateway over the Gate.io spot REST API.
pub struct GateIoGateway {
    http: Client,
    config: GateIoConfig,
}

impl GateIoGateway {
    /// Build the gateway. Fails when credentials are blank.
    pub fn new(config: GateIoConfig) -> GatewayResult<Self> {
        if config.api_key.is_empty() || config.api_secret.is_empty() {
            return Err(GatewayError::MissingCredentials);
        }

        let http = Client::builder()
            .user_agent(concat!("webhook-relay/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Http(e.to_string()))?;

        Ok(Self { http, config })
    }

    /// APIv4 request signature.
    fn sign(&self, method: &Method, path: &str, query: &str, body: &str, timestamp: &str) -> String {
        let body_hash = hex::encode(Sha512::digest(body.as_bytes()));
        let payload = format!("{method}\n{path}\n{query}\n{body_hash}\n{timestamp}");

        let mut mac = HmacSha512::new_from_slice(self.config.api_secret.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    async fn signed_request(
        &self,
        method: Method,
        path: &str,
        query: &str,
        body: String,
    ) -> GatewayResult<SpotOrderResponse> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let sign = self.sign(&method, path, query, &body, &timestamp);

        let mut url = format!("{}{}", self.config.base_url, path);
        if !query.is_empty() {
            url.push('?');
            url.push_str(query);
        }

        let mut request = self
            .http
            .request(method, &url)
            .header("KEY", &self.config.api_key)
            .header("Timestamp", &timestamp)
            .header("SIGN", sign)
            .header("Accept", "application/json");
        if !body.is_empty() {
            request = request.header("Content-Type", "application/json").body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Http(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(Self::rejection(status, &text));
        }

        serde_json::from_str(&text).map_err(|e| GatewayError::Parse(e.to_string()))
    }

    /// Map a non-2xx response into a rejection with the exchange's label.
    fn rejection(status: StatusCode, body: &str) -> GatewayError {
        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(err) if !err.label.is_empty() => GatewayError::Rejected {
                label: err.label,
                message: err.message,
            },
            _ => GatewayError::Rejected {
                label: status.as_u16().to_string(),
                message: body.chars().take(256).collect(),
            },
        }
    }

    fn snapshot(response: &SpotOrderResponse) -> FillSnapshot {
        FillSnapshot {
            filled: Quantity::new(response.amount - response.left),
            remaining: Quantity::new(response.left),
            status: response.status.clone(),
        }
    }

    fn payload(request: &OrderRequest) -> SpotOrderPayload {
        // Market orders must be ioc/fok on Gate.io spot; limit orders rest.
        let time_in_force = match request.order_type {
            OrderType::Market => "ioc",
            OrderType::Limit => "gtc",
        };

        SpotOrderPayload {
            currency_pair: request.symbol.clone(),
            order_type: request.order_type.as_str().to_string(),
            side: request.side.as_str().to_string(),
            amount: request.quantity.to_string(),
            price: request.price.map(|p| p.to_string()),
            time_in_force: time_in_force.to_string(),
            text: request.client_order_id.to_string(),
        }
    }
}

impl ExchangeGateway for GateIoGateway {
    fn create_order(&self, request: OrderRequest) -> BoxFuture<'_, GatewayResult<CreatedOrder>> {
        Box::pin(async move {
            let path = format!("{API_PREFIX}/spot/orders");
            let body = serde_json::to_string(&Self::payload(&request))
                .map_err(|e| GatewayError::Parse(e.to_string()))?;

            debug!(
                symbol = %request.symbol,
                side = %request.side,
                order_type = %request.order_type,
                quantity = %request.quantity,
                "Submitting spot order"
            );

            let response = self.signed_request(Method::POST, &path, "", body).await?;

            Ok(CreatedOrder {
                order_id: response.id,
                status: response.status,
            })
        })
    }

    fn fetch_order(
        &self,
        order_id: String,
        symbol: String,
    ) -> BoxFuture<'_, GatewayResult<FillSnapshot>> {
        Box::pin(async move {
            let path = format!("{API_PREFIX}/spot/orders/{order_id}");
            let query = format!("currency_pair={symbol}");

            let response = self
                .signed_request(Method::GET, &path, &query, String::new())
                .await
                .map_err(|e| {
                    warn!(order_id = %order_id, error = %e, "fetch_order failed");
                    e
                })?;

            Ok(Self::snapshot(&response))
        })
    }
}
