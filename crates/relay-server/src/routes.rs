//! Webhook HTTP surface.
//!
//! `POST /webhook` takes a trading alert and answers with the final
//! `OrderRecord` as JSON on any pipeline completion, FAILED included.
//! 400 is reserved for payloads the pipeline never sees: invalid JSON,
//! missing required fields, unknown action or order type.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use relay_core::{normalize_symbol, Alert, OrderSide, OrderType, Price, Quantity};
use relay_pipeline::SubmissionPipeline;

/// Shared application state for axum handlers.
#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<SubmissionPipeline>,
}

impl AppState {
    pub fn new(pipeline: Arc<SubmissionPipeline>) -> Self {
        Self { pipeline }
    }
}

/// Create the axum router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(webhook))
        .route("/health", get(health))
        .with_state(state)
}

/// Raw webhook payload before field-level validation.
#[derive(Debug, Deserialize)]
struct AlertPayload {
    symbol: String,
    /// BUY or SELL, case-insensitive.
    action: String,
    quantity: Decimal,
    /// market or limit. Defaults to market.
    #[serde(default)]
    order_type: Option<String>,
    #[serde(default)]
    price: Option<Decimal>,
    #[serde(default)]
    client_id: Option<String>,
}

impl AlertPayload {
    /// Map the wire payload onto a domain alert.
    ///
    /// Only field-shape problems (unknown action/order type) error
    /// here; constraint violations like a missing limit price are the
    /// pipeline's validation step, so they produce a FAILED record
    /// rather than a 400.
    fn into_alert(self) -> Result<Alert, String> {
        let action = OrderSide::from_str(&self.action).map_err(|e| e.to_string())?;
        let order_type = match self.order_type.as_deref() {
            None => OrderType::Market,
            Some(s) => OrderType::from_str(s).map_err(|e| e.to_string())?,
        };

        Ok(Alert {
            symbol: normalize_symbol(&self.symbol),
            action,
            quantity: Quantity::new(self.quantity),
            order_type,
            price: self.price.map(Price::new),
            client_id: self.client_id,
        })
    }
}

/// `POST /webhook`.
///
/// The body is parsed by hand so every malformed payload maps to 400,
/// not to the framework's default rejection status.
async fn webhook(State(state): State<AppState>, body: String) -> Response {
    let payload: AlertPayload = match serde_json::from_str(&body) {
        Ok(p) => p,
        Err(e) => {
            debug!(error = %e, "Rejecting malformed webhook payload");
            return bad_request(format!("invalid payload: {e}"));
        }
    };

    let alert = match payload.into_alert() {
        Ok(alert) => alert,
        Err(e) => {
            debug!(error = %e, "Rejecting webhook payload with bad fields");
            return bad_request(e);
        }
    };

    let record = state.pipeline.submit(alert).await;
    (StatusCode::OK, Json(record)).into_response()
}

/// `GET /health`.
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use relay_core::OrderStatus;
    use relay_gateway::{CreatedOrder, FillSnapshot, MockGateway};
    use relay_ledger::CsvLedger;
    use relay_notifier::Notifier;
    use relay_pipeline::{PipelineConfig, RecordingSleeper, SystemClock};
    use rust_decimal_macros::dec;
    use tower::ServiceExt;

    struct TestServer {
        router: Router,
        gateway: Arc<MockGateway>,
        _dir: tempfile::TempDir,
    }

    fn test_server() -> TestServer {
        let dir = tempfile::tempdir().unwrap();
        let gateway = Arc::new(MockGateway::new());
        let pipeline = SubmissionPipeline::new(
            gateway.clone(),
            Arc::new(CsvLedger::open(dir.path().join("orders.csv")).unwrap()),
            Arc::new(Notifier::disabled()),
            PipelineConfig::default(),
            Arc::new(SystemClock),
            Arc::new(RecordingSleeper::new()),
        );
        let router = create_router(AppState::new(Arc::new(pipeline)));
        TestServer {
            router,
            gateway,
            _dir: dir,
        }
    }

    fn post_webhook(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/webhook")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_valid_market_alert_returns_record() {
        let server = test_server();
        server.gateway.push_create_result(Ok(CreatedOrder {
            order_id: "42".into(),
            status: "closed".into(),
        }));
        server.gateway.push_fetch_result(Ok(FillSnapshot {
            filled: Quantity::new(dec!(0.001)),
            remaining: Quantity::ZERO,
            status: "closed".into(),
        }));

        let response = server
            .router
            .oneshot(post_webhook(
                r#"{"symbol":"BTC_USDT","action":"BUY","quantity":0.001,"order_type":"market"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "FILLED");
        assert_eq!(json["order_id"], "42");
        assert_eq!(json["symbol"], "BTC_USDT");
    }

    #[tokio::test]
    async fn test_unknown_action_is_400_before_pipeline() {
        let server = test_server();

        let response = server
            .router
            .oneshot(post_webhook(
                r#"{"symbol":"BTC_USDT","action":"HOLD","quantity":1}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(server.gateway.create_call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_field_is_400() {
        let server = test_server();

        let response = server
            .router
            .oneshot(post_webhook(r#"{"symbol":"BTC_USDT","action":"BUY"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_json_is_400() {
        let server = test_server();

        let response = server
            .router
            .oneshot(post_webhook("{not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_limit_without_price_is_200_failed() {
        let server = test_server();

        let response = server
            .router
            .oneshot(post_webhook(
                r#"{"symbol":"BTC_USDT","action":"SELL","quantity":1,"order_type":"limit"}"#,
            ))
            .await
            .unwrap();

        // Constraint violations go through the pipeline and come back
        // as FAILED records, not HTTP errors.
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "FAILED");
        assert!(json["error"]
            .as_str()
            .unwrap()
            .starts_with("validation error:"));
        assert_eq!(server.gateway.create_call_count(), 0);
    }

    #[tokio::test]
    async fn test_symbol_normalized_in_response() {
        let server = test_server();
        server.gateway.push_create_result(Ok(CreatedOrder {
            order_id: "7".into(),
            status: "closed".into(),
        }));
        server.gateway.push_fetch_result(Ok(FillSnapshot {
            filled: Quantity::new(dec!(1)),
            remaining: Quantity::ZERO,
            status: "closed".into(),
        }));

        let response = server
            .router
            .oneshot(post_webhook(
                r#"{"symbol":"eth/usdt","action":"buy","quantity":1}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["symbol"], "ETH_USDT");
        assert_ne!(json["status"], serde_json::json!(OrderStatus::Failed));
    }

    #[tokio::test]
    async fn test_health() {
        let server = test_server();
        let response = server
            .router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
