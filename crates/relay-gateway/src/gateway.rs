//! The exchange gateway trait and its test double.

use std::collections::VecDeque;
use std::pin::Pin;

use relay_core::{ClientOrderId, OrderSide, OrderType, Price, Quantity};

use crate::error::GatewayResult;

/// Boxed future alias used for the gateway trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// One order submission, as handed to the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    /// Exchange pair, e.g. `BTC_USDT`.
    pub symbol: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub quantity: Quantity,
    /// Present iff `order_type` is limit.
    pub price: Option<Price>,
    /// Idempotency id; identical across retries of one attempt.
    pub client_order_id: ClientOrderId,
}

/// The exchange's answer to a successful order creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedOrder {
    /// Exchange-assigned order id.
    pub order_id: String,
    /// Raw exchange status string ("open", "closed", ...).
    pub status: String,
}

/// Fill state of an order as reported by the exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillSnapshot {
    pub filled: Quantity,
    pub remaining: Quantity,
    /// Raw exchange status string.
    pub status: String,
}

/// Capability set consumed by the submission pipeline.
///
/// Abstracting the exchange behind a trait keeps the pipeline testable
/// without network access and without real time delays.
pub trait ExchangeGateway: Send + Sync {
    /// Submit an order. One call per submission attempt.
    fn create_order(&self, request: OrderRequest) -> BoxFuture<'_, GatewayResult<CreatedOrder>>;

    /// Fetch the fill state of an existing order.
    fn fetch_order(
        &self,
        order_id: String,
        symbol: String,
    ) -> BoxFuture<'_, GatewayResult<FillSnapshot>>;
}

/// Scripted gateway for tests.
///
/// Results are queued per method and popped in order; when a queue runs
/// dry the last scripted result is replayed. Every call is recorded for
/// call-count assertions.
#[derive(Debug, Default)]
pub struct MockGateway {
    create_results: parking_lot::Mutex<VecDeque<GatewayResult<CreatedOrder>>>,
    fetch_results: parking_lot::Mutex<VecDeque<GatewayResult<FillSnapshot>>>,
    create_calls: parking_lot::Mutex<Vec<OrderRequest>>,
    fetch_calls: parking_lot::Mutex<Vec<String>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a result for the next `create_order` call.
    pub fn push_create_result(&self, result: GatewayResult<CreatedOrder>) {
        self.create_results.lock().push_back(result);
    }

    /// Queue a result for the next `fetch_order` call.
    pub fn push_fetch_result(&self, result: GatewayResult<FillSnapshot>) {
        self.fetch_results.lock().push_back(result);
    }

    /// Number of `create_order` calls observed.
    pub fn create_call_count(&self) -> usize {
        self.create_calls.lock().len()
    }

    /// Number of `fetch_order` calls observed.
    pub fn fetch_call_count(&self) -> usize {
        self.fetch_calls.lock().len()
    }

    /// Recorded `create_order` requests.
    pub fn create_calls(&self) -> Vec<OrderRequest> {
        self.create_calls.lock().clone()
    }

    fn pop_or_replay<T: Clone>(queue: &parking_lot::Mutex<VecDeque<T>>) -> Option<T> {
        let mut q = queue.lock();
        if q.len() > 1 {
            q.pop_front()
        } else {
            q.front().cloned()
        }
    }
}

impl ExchangeGateway for MockGateway {
    fn create_order(&self, request: OrderRequest) -> BoxFuture<'_, GatewayResult<CreatedOrder>> {
        self.create_calls.lock().push(request);
        let result = Self::pop_or_replay(&self.create_results)
            .expect("MockGateway: no create_order result scripted");
        Box::pin(async move { result })
    }

    fn fetch_order(
        &self,
        order_id: String,
        _symbol: String,
    ) -> BoxFuture<'_, GatewayResult<FillSnapshot>> {
        self.fetch_calls.lock().push(order_id);
        let result = Self::pop_or_replay(&self.fetch_results)
            .expect("MockGateway: no fetch_order result scripted");
        Box::pin(async move { result })
    }
}
