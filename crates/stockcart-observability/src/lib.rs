//! Logging and request correlation for StockCart.
//!
//! This crate provides:
//! - `LoggingConfig` / `init` - process-wide `tracing` subscriber setup
//! - `RequestId` - identifier carried on every event of one request
//! - `request_span` - the span one cart operation runs in

mod logging;
mod request;

pub use logging::*;
pub use request::*;
