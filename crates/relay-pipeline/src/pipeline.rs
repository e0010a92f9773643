//! The submission pipeline.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use relay_core::{Alert, ClientOrderId, OrderRecord, OrderStatus, Quantity};
use relay_gateway::{CreatedOrder, ExchangeGateway, GatewayError, OrderRequest};
use relay_ledger::CsvLedger;
use relay_notifier::Notifier;

use crate::clock::Clock;
use crate::sleeper::Sleeper;

/// Pipeline tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Submission attempt cap. Default: 3.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Pause between submission attempts (seconds). Default: 2.
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
    /// Fill-status poll cap. Default: 5.
    #[serde(default = "default_poll_max_attempts")]
    pub poll_max_attempts: u32,
    /// Pause between polls (seconds). Default: 1.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_secs() -> u64 {
    2
}

fn default_poll_max_attempts() -> u32 {
    5
}

fn default_poll_interval_secs() -> u64 {
    1
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_delay_secs: default_retry_delay_secs(),
            poll_max_attempts: default_poll_max_attempts(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

impl PipelineConfig {
    fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

/// Outcome of the poll loop, before the record is assembled.
struct PollOutcome {
    filled: Quantity,
    remaining: Quantity,
    status: OrderStatus,
    error: Option<String>,
}

/// The order submission pipeline.
///
/// `submit` never returns an error: validation failures and exhausted
/// retries become FAILED records, poll trouble degrades to OPEN, and
/// ledger/notifier faults are logged and swallowed.
pub struct SubmissionPipeline {
    gateway: Arc<dyn ExchangeGateway>,
    ledger: Arc<CsvLedger>,
    notifier: Arc<Notifier>,
    config: PipelineConfig,
    clock: Arc<dyn Clock>,
    sleeper: Arc<dyn Sleeper>,
}

impl SubmissionPipeline {
    pub fn new(
        gateway: Arc<dyn ExchangeGateway>,
        ledger: Arc<CsvLedger>,
        notifier: Arc<Notifier>,
        config: PipelineConfig,
        clock: Arc<dyn Clock>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            gateway,
            ledger,
            notifier,
            config,
            clock,
            sleeper,
        }
    }

    /// Run one alert through the pipeline.
    ///
    /// The returned record has already been appended to the ledger and
    /// pushed to the notifier.
    pub async fn submit(&self, alert: Alert) -> OrderRecord {
        let record = self.execute(&alert).await;

        info!(
            symbol = %record.symbol,
            status = %record.status,
            order_id = record.order_id.as_deref().unwrap_or(""),
            filled = %record.filled,
            "Order attempt finished"
        );

        if let Err(e) = self.ledger.append(&record) {
            warn!(error = %e, "Ledger append failed; continuing");
        }
        self.notifier.notify(&record).await;

        record
    }

    async fn execute(&self, alert: &Alert) -> OrderRecord {
        if let Err(e) = alert.validate() {
            debug!(symbol = %alert.symbol, error = %e, "Alert rejected before submission");
            return OrderRecord::failed(
                alert,
                self.clock.now(),
                format!("validation error: {e}"),
            );
        }

        // One client order id for all retries of this attempt, so a
        // retried submission cannot double-place on the exchange.
        let client_order_id = alert
            .client_id
            .clone()
            .map(ClientOrderId::from_string)
            .unwrap_or_default();

        let request = OrderRequest {
            symbol: alert.symbol.clone(),
            side: alert.action,
            order_type: alert.order_type,
            quantity: alert.quantity,
            price: alert.price,
            client_order_id,
        };

        let created = match self.submit_with_retry(request).await {
            Ok(created) => created,
            Err(e) => {
                return OrderRecord::failed(alert, self.clock.now(), e.to_string());
            }
        };

        let outcome = self.poll_fill(&created, alert).await;

        OrderRecord::settled(
            alert,
            self.clock.now(),
            created.order_id,
            outcome.filled,
            outcome.remaining,
            outcome.status,
            outcome.error,
        )
    }

    /// Attempt order creation up to `max_retries` times.
    ///
    /// Every gateway error is treated as transient; the retry policy
    /// does not distinguish rejections from network faults.
    async fn submit_with_retry(&self, request: OrderRequest) -> Result<CreatedOrder, GatewayError> {
        let mut last_error = GatewayError::Http("no submission attempt made".to_string());

        for attempt in 1..=self.config.max_retries.max(1) {
            match self.gateway.create_order(request.clone()).await {
                Ok(created) => {
                    debug!(
                        order_id = %created.order_id,
                        attempt,
                        "Order accepted by exchange"
                    );
                    return Ok(created);
                }
                Err(e) => {
                    warn!(
                        symbol = %request.symbol,
                        attempt,
                        max_retries = self.config.max_retries,
                        error = %e,
                        "Order submission attempt failed"
                    );
                    last_error = e;
                    if attempt < self.config.max_retries {
                        self.sleeper.sleep(self.config.retry_delay()).await;
                    }
                }
            }
        }

        Err(last_error)
    }

    /// Poll fill status up to `poll_max_attempts` times.
    ///
    /// Classification at the bound: full fill FILLED (returns early),
    /// some fill PARTIAL, no fill OPEN. Fetch errors do not abort the
    /// loop; if the last poll errored the record is OPEN with the error
    /// noted, since the order may still be live on the exchange. The
    /// resting remainder is never cancelled here.
    async fn poll_fill(&self, created: &CreatedOrder, alert: &Alert) -> PollOutcome {
        let mut filled = Quantity::ZERO;
        let mut remaining = alert.quantity;
        let mut last_error: Option<GatewayError> = None;

        for attempt in 1..=self.config.poll_max_attempts.max(1) {
            match self
                .gateway
                .fetch_order(created.order_id.clone(), alert.symbol.clone())
                .await
            {
                Ok(snapshot) => {
                    last_error = None;
                    filled = snapshot.filled;
                    remaining = snapshot.remaining;

                    if filled >= alert.quantity {
                        return PollOutcome {
                            filled,
                            remaining,
                            status: OrderStatus::Filled,
                            error: None,
                        };
                    }
                    debug!(
                        order_id = %created.order_id,
                        attempt,
                        filled = %filled,
                        remaining = %remaining,
                        exchange_status = %snapshot.status,
                        "Order not yet fully filled"
                    );
                }
                Err(e) => {
                    warn!(
                        order_id = %created.order_id,
                        attempt,
                        error = %e,
                        "Fill-status poll failed"
                    );
                    last_error = Some(e);
                }
            }

            if attempt < self.config.poll_max_attempts {
                self.sleeper.sleep(self.config.poll_interval()).await;
            }
        }

        let status = if filled.is_positive() {
            OrderStatus::Partial
        } else {
            OrderStatus::Open
        };

        PollOutcome {
            filled,
            remaining,
            status,
            error: last_error.map(|e| e.to_string()),
        }
    }
}
