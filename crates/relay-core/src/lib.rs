//! Core domain types for the webhook order relay.
//!
//! This crate provides fundamental types used throughout the relay:
//! - `Price`, `Quantity`: Precision-safe numeric types
//! - `Alert`: Validated inbound trading instruction
//! - `OrderRecord`: The one row persisted per order attempt
//! - `OrderSide`, `OrderType`, `OrderStatus`: Trading enums

pub mod alert;
pub mod decimal;
pub mod error;
pub mod order;
pub mod record;

pub use alert::{normalize_symbol, Alert};
pub use decimal::{Price, Quantity};
pub use error::{CoreError, Result};
pub use order::{ClientOrderId, OrderSide, OrderStatus, OrderType};
pub use record::OrderRecord;
