//! Persisted order record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::alert::Alert;
use crate::decimal::{Price, Quantity};
use crate::order::{OrderSide, OrderStatus, OrderType};

/// One row of the order ledger.
///
/// Written exactly once per pipeline invocation, never mutated. The
/// webhook response body is this record serialized as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// UTC time the record was finalized.
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub action: OrderSide,
    pub order_type: OrderType,
    /// Requested quantity from the alert.
    pub quantity: Quantity,
    pub price: Option<Price>,
    /// Exchange order id; absent when every submission attempt failed.
    pub order_id: Option<String>,
    pub filled: Quantity,
    pub remaining: Quantity,
    pub status: OrderStatus,
    pub error: Option<String>,
}

impl OrderRecord {
    /// Record for an alert that never produced an exchange order.
    ///
    /// Covers both validation failures and exhausted submission retries.
    pub fn failed(alert: &Alert, timestamp: DateTime<Utc>, error: String) -> Self {
        Self {
            timestamp,
            symbol: alert.symbol.clone(),
            action: alert.action,
            order_type: alert.order_type,
            quantity: alert.quantity,
            price: alert.price,
            order_id: None,
            filled: Quantity::ZERO,
            remaining: alert.quantity,
            status: OrderStatus::Failed,
            error: Some(error),
        }
    }

    /// Record for an order that reached the exchange.
    #[allow(clippy::too_many_arguments)]
    pub fn settled(
        alert: &Alert,
        timestamp: DateTime<Utc>,
        order_id: String,
        filled: Quantity,
        remaining: Quantity,
        status: OrderStatus,
        error: Option<String>,
    ) -> Self {
        Self {
            timestamp,
            symbol: alert.symbol.clone(),
            action: alert.action,
            order_type: alert.order_type,
            quantity: alert.quantity,
            price: alert.price,
            order_id: Some(order_id),
            filled,
            remaining,
            status,
            error,
        }
    }
}
