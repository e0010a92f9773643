//! Order submission pipeline.
//!
//! One invocation per inbound alert: validate, submit with retry, poll
//! for fill status, write the ledger row, notify the remote observer.
//! The pipeline never fails toward its caller; every path resolves into
//! an `OrderRecord`.

pub mod clock;
pub mod pipeline;
pub mod sleeper;

pub use clock::{Clock, SystemClock};
pub use pipeline::{PipelineConfig, SubmissionPipeline};
pub use sleeper::{RecordingSleeper, Sleeper, TokioSleeper};
