//! CSV file writer for order records.
//!
//! Append-only, one row per record, header written when the file is
//! created. Each append is a single locked write of one complete line,
//! so concurrent appends interleave at row granularity and no row is
//! ever torn.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::info;

use relay_core::OrderRecord;

use crate::error::LedgerResult;

/// Column names, in `OrderRecord` field order.
pub const CSV_HEADER: &str =
    "timestamp,symbol,action,order_type,quantity,price,order_id,filled,remaining,status,error";

/// Append-only CSV ledger.
pub struct CsvLedger {
    path: PathBuf,
    file: Mutex<File>,
}

impl CsvLedger {
    /// Open (or create) the ledger file at `path`.
    ///
    /// The header row is written when the file is new or empty.
    pub fn open(path: impl AsRef<Path>) -> LedgerResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;

        if file.metadata()?.len() == 0 {
            file.write_all(CSV_HEADER.as_bytes())?;
            file.write_all(b"\n")?;
            info!(path = %path.display(), "Created order ledger");
        }

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Append one record as one CSV row.
    pub fn append(&self, record: &OrderRecord) -> LedgerResult<()> {
        let mut row = String::with_capacity(160);
        let fields = [
            record.timestamp.to_rfc3339(),
            record.symbol.clone(),
            record.action.to_string(),
            record.order_type.to_string(),
            record.quantity.to_string(),
            record.price.map(|p| p.to_string()).unwrap_or_default(),
            record.order_id.clone().unwrap_or_default(),
            record.filled.to_string(),
            record.remaining.to_string(),
            record.status.to_string(),
            record.error.clone().unwrap_or_default(),
        ];
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                row.push(',');
            }
            push_csv_field(&mut row, field);
        }
        row.push('\n');

        // One write_all under the lock per row keeps appends atomic
        // relative to each other.
        let mut file = self.file.lock();
        file.write_all(row.as_bytes())?;
        Ok(())
    }

    /// Ledger file location.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Append `field` to `row`, quoting when it contains a separator,
/// quote or newline.
fn push_csv_field(row: &mut String, field: &str) {
    if field.contains([',', '"', '\n']) {
        row.push('"');
        for c in field.chars() {
            if c == '"' {
                row.push('"');
            }
            row.push(c);
        }
        row.push('"');
    } else {
        row.push_str(field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use relay_core::{Alert, OrderRecord, OrderSide, OrderStatus, Quantity};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn sample_record(error: Option<&str>) -> OrderRecord {
        let alert = Alert::market("BTC_USDT", OrderSide::Buy, Quantity::new(dec!(0.001)));
        match error {
            Some(e) => OrderRecord::failed(&alert, Utc::now(), e.to_string()),
            None => OrderRecord::settled(
                &alert,
                Utc::now(),
                "42".to_string(),
                Quantity::new(dec!(0.001)),
                Quantity::ZERO,
                OrderStatus::Filled,
                None,
            ),
        }
    }

    #[test]
    fn test_header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.csv");

        {
            let ledger = CsvLedger::open(&path).unwrap();
            ledger.append(&sample_record(None)).unwrap();
        }
        // Reopen: header must not repeat.
        {
            let ledger = CsvLedger::open(&path).unwrap();
            ledger.append(&sample_record(None)).unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        assert!(lines[1].contains("BTC_USDT"));
        assert!(lines[2].contains("FILLED"));
    }

    #[test]
    fn test_failed_record_row_has_empty_order_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.csv");
        let ledger = CsvLedger::open(&path).unwrap();
        ledger
            .append(&sample_record(Some("connection refused")))
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let row = content.lines().nth(1).unwrap();
        assert!(row.contains(",,")); // empty price and order_id columns
        assert!(row.contains("FAILED"));
        assert!(row.contains("connection refused"));
    }

    #[test]
    fn test_error_with_comma_is_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.csv");
        let ledger = CsvLedger::open(&path).unwrap();
        ledger
            .append(&sample_record(Some(r#"rejected: "bad symbol", try again"#)))
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let row = content.lines().nth(1).unwrap();
        assert!(row.ends_with(r#""rejected: ""bad symbol"", try again""#));
    }

    #[test]
    fn test_concurrent_appends_produce_one_row_each() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.csv");
        let ledger = Arc::new(CsvLedger::open(&path).unwrap());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                std::thread::spawn(move || ledger.append(&sample_record(None)).unwrap())
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 17); // header + 16 rows
        let expected_commas = CSV_HEADER.matches(',').count();
        for row in &lines[1..] {
            assert_eq!(row.matches(',').count(), expected_commas, "torn row: {row}");
        }
    }
}
