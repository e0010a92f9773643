//! Exchange gateway for the webhook order relay.
//!
//! Wraps the capability set the pipeline needs from an exchange:
//! create an order, fetch an order by id. The `ExchangeGateway` trait
//! is the seam; `GateIoGateway` is the production implementation over
//! the Gate.io spot REST API, and `MockGateway` is the scripted test
//! double.

pub mod error;
pub mod gateio;
pub mod gateway;

pub use error::{GatewayError, GatewayResult};
pub use gateio::{GateIoConfig, GateIoGateway};
pub use gateway::{BoxFuture, CreatedOrder, ExchangeGateway, FillSnapshot, MockGateway, OrderRequest};
