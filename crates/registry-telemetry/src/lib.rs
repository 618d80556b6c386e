//! # Registry Telemetry
//!
//! Structured logging for risk registry processes. The registry crates emit
//! `tracing` spans and events; this crate installs the subscriber that
//! renders them.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use registry_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> Result<(), registry_telemetry::TelemetryError> {
//!     init_telemetry(&TelemetryConfig::from_env())?;
//!     // Registry spans and events are now rendered.
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `risk-registry` | Service name in logs |
//! | `RR_LOG_LEVEL` | `info` | Log level filter |
//! | `RR_JSON_LOGS` | `false` | JSON formatted output |
//! | `RR_CONSOLE_OUTPUT` | `true` | Write to stdout |
//! | `RR_NETWORK` | `devnet` | Deployment label |

mod config;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::init_tracing;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Global subscriber already installed: {0}")]
    AlreadyInitialized(String),
}

/// Initialize logging for a registry process.
///
/// Call once at startup. A second call returns
/// [`TelemetryError::AlreadyInitialized`].
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    init_tracing(config)
}

/// Span carrying the registry network name.
///
/// ```rust,ignore
/// let _span = registry_span!("sync", network = "mainnet").entered();
/// ```
#[macro_export]
macro_rules! registry_span {
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}
