//! Prometheus metrics and structured logging for pairdesk.
//!
//! - Prometheus counters for submission outcomes and gate ticks
//! - Structured logging with tracing (JSON in production)

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use metrics::Metrics;
