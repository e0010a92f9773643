//! Append-only CSV order ledger.

pub mod error;
pub mod ledger;

pub use error::{LedgerError, LedgerResult};
pub use ledger::{CsvLedger, CSV_HEADER};
