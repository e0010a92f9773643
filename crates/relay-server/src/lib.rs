//! Webhook endpoint and application wiring.

pub mod app;
pub mod config;
pub mod error;
pub mod routes;

pub use app::Application;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
