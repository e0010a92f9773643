//! Sleep abstraction for the retry and poll pauses.
//!
//! The pipeline's only suspension points besides network calls are
//! timed waits. Routing them through a trait lets tests run the retry
//! and poll loops without real delay while still asserting the
//! durations the pipeline asked for.

use std::time::Duration;

use relay_gateway::BoxFuture;

/// Trait for pausing between attempts.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration) -> BoxFuture<'_, ()>;
}

/// Production sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> BoxFuture<'_, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// Test sleeper that records requested durations and returns at once.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    slept: parking_lot::Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Durations requested so far, in order.
    pub fn slept(&self) -> Vec<Duration> {
        self.slept.lock().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) -> BoxFuture<'_, ()> {
        self.slept.lock().push(duration);
        Box::pin(std::future::ready(()))
    }
}
