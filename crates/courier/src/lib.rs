//! # Courier
//!
//! **A JSON HTTP driver for testing web applications.**
//!
//! Courier drives an application the way an acceptance test would, but
//! speaks JSON instead of HTML:
//!
//! - `visit`, `get`, `post`, `put` and `delete` against a base URL
//! - Strict variants (`get_strict`, ...) that fail on 4xx/5xx responses
//! - Redirects followed up to a limit, or captured as-is
//! - The last response kept for inspection: status, headers, raw source, and
//!   the body decoded once as JSON
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use courier::prelude::*;
//! use serde_json::json;
//!
//! fn main() -> Result<(), courier::Error> {
//!     let config = courier::load_config(Some("courier.toml"))?;
//!     courier::init_logging(&config)?;
//!
//!     let mut driver = JsonDriver::new(config.driver)?;
//!     driver.post("/users", &json!({"name": "ada"}), &Headers::new())?;
//!     assert_eq!(driver.status_code()?, 201);
//!     Ok(())
//! }
//! ```
//!
//! ## Request Flow
//!
//! ```text
//! verb(path, params, headers) → Request → Transport ─┐
//!                                   ↑                │ 3xx + Location
//!                                   └── next hop ────┘ (bounded)
//!                                                    ↓
//!                           accessors ← cached Response
//! ```

#![doc(html_root_url = "https://docs.rs/courier/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use std::path::Path;

use thiserror::Error;

// Re-export core types
pub use courier_core as core;

// Re-export configuration types
pub use courier_config as config;

// Re-export telemetry
pub use courier_telemetry as telemetry;

// Re-export the driver
pub use courier_driver as driver;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "COURIER";

/// Errors from setting up a driver session.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] courier_config::ConfigError),

    /// Logging could not be initialised.
    #[error(transparent)]
    Telemetry(#[from] courier_telemetry::TelemetryError),

    /// A driver operation failed.
    #[error(transparent)]
    Driver(#[from] courier_core::DriverError),
}

/// Loads configuration: defaults, then `.env`, then `path` if it exists,
/// then `COURIER__*` environment overrides.
pub fn load_config(path: Option<impl AsRef<Path>>) -> Result<courier_config::CourierConfig, Error> {
    let mut loader = courier_config::ConfigLoader::new()
        .with_defaults()
        .with_dotenv()?;
    if let Some(path) = path {
        loader = loader.with_optional_file(path)?;
    }
    Ok(loader.with_env_prefix(ENV_PREFIX).load()?)
}

/// Installs the global log subscriber described by `config.logging`.
pub fn init_logging(config: &courier_config::CourierConfig) -> Result<(), Error> {
    courier_telemetry::init_logging(&config.logging.to_log_config())?;
    courier_telemetry::metrics::describe_metrics();
    Ok(())
}

/// Builds a driver over HTTP from a loaded configuration.
pub fn connect(config: &courier_config::CourierConfig) -> Result<courier_driver::JsonDriver, Error> {
    Ok(courier_driver::JsonDriver::new(config.driver.clone())?)
}

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust,ignore
/// use courier::prelude::*;
/// ```
pub mod prelude {
    pub use courier_core::{DriverError, DriverResult, Headers, Request, Response, Transport, Verb};

    pub use courier_config::{ConfigLoader, CourierConfig, DriverConfig};

    pub use courier_driver::{HttpTransport, JsonDriver, JsonDriverBuilder, RedirectPolicy};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_without_file() {
        let config = load_config(None::<&str>).unwrap();
        assert!(config.driver.max_redirects <= courier_config::MAX_REDIRECT_LIMIT);
    }

    #[test]
    fn test_connect_rejects_bad_base_url() {
        let mut config = courier_config::CourierConfig::default();
        config.driver.base_url = "nope".to_string();
        assert!(matches!(connect(&config), Err(Error::Driver(_))));
    }

    #[test]
    fn test_error_is_transparent() {
        let err: Error = courier_core::DriverError::NoResponse.into();
        assert_eq!(err.to_string(), courier_core::DriverError::NoResponse.to_string());
    }
}
