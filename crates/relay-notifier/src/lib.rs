//! Best-effort push of finalized order records to a remote observer.
//!
//! Fire-and-forget: one POST, a short timeout, no retry. Failures are
//! logged and discarded; they never influence the pipeline's result or
//! the ledger.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use relay_core::OrderRecord;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Remote notifier. A no-op when no URL is configured.
pub struct Notifier {
    http: Client,
    url: Option<String>,
}

impl Notifier {
    /// Build a notifier targeting `url`; `None` disables notification.
    pub fn new(url: Option<String>, timeout_secs: Option<u64>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(
                timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ))
            .build()
            .unwrap_or_default();

        Self { http, url }
    }

    /// Disabled notifier.
    pub fn disabled() -> Self {
        Self::new(None, None)
    }

    pub fn is_enabled(&self) -> bool {
        self.url.is_some()
    }

    /// Push `record` to the configured endpoint, swallowing any failure.
    pub async fn notify(&self, record: &OrderRecord) {
        let Some(url) = self.url.as_deref() else {
            return;
        };

        let result = self.http.post(url).json(record).send().await;
        match result {
            Ok(response) if response.status().is_success() => {
                debug!(
                    status = %record.status,
                    order_id = record.order_id.as_deref().unwrap_or(""),
                    "Notified remote endpoint"
                );
            }
            Ok(response) => {
                warn!(
                    http_status = response.status().as_u16(),
                    "Remote notify returned non-success status"
                );
            }
            Err(e) => {
                warn!(error = %e, "Failed to notify remote endpoint");
            }
        }
    }
}
