//! Application wiring.

use std::sync::Arc;

use tracing::info;

use relay_gateway::{ExchangeGateway, GateIoConfig, GateIoGateway};
use relay_ledger::CsvLedger;
use relay_notifier::Notifier;
use relay_pipeline::{SubmissionPipeline, SystemClock, TokioSleeper};

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::routes::{create_router, AppState};

/// The assembled relay: gateway, pipeline, ledger, notifier, router.
pub struct Application {
    config: AppConfig,
    router: axum::Router,
}

impl Application {
    /// Build all components from the loaded configuration.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        config.validate()?;

        let gateway_config = GateIoConfig::new(config.api_key.clone(), config.api_secret.clone())
            .with_base_url(config.base_url.clone());
        let gateway: Arc<dyn ExchangeGateway> = Arc::new(GateIoGateway::new(gateway_config)?);

        let ledger = Arc::new(CsvLedger::open(&config.ledger_path)?);
        let notifier = Arc::new(Notifier::new(
            config.remote_notify_url.clone(),
            Some(config.notify_timeout_secs),
        ));

        if !notifier.is_enabled() {
            info!("REMOTE_NOTIFY_URL unset, remote notification disabled");
        }

        let pipeline = Arc::new(SubmissionPipeline::new(
            gateway,
            ledger,
            notifier,
            config.pipeline.clone(),
            Arc::new(SystemClock),
            Arc::new(TokioSleeper),
        ));

        let router = create_router(AppState::new(pipeline));

        Ok(Self { config, router })
    }

    /// Serve the webhook endpoint until the process is stopped.
    pub async fn run(self) -> AppResult<()> {
        let listener = tokio::net::TcpListener::bind(&self.config.listen_addr).await?;
        info!(addr = %self.config.listen_addr, "Webhook relay listening");

        axum::serve(listener, self.router).await?;
        Ok(())
    }
}
