//! Typed configuration system for Courier.
//!
//! This crate provides a strongly-typed configuration for the JSON test
//! driver with support for:
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Configuration File Format
//!
//! ```toml
//! [driver]
//! base_url = "http://127.0.0.1:9292"
//! follow_redirects = true
//! max_redirects = 5
//! timeout_ms = 30000
//! allowed_redirect_hosts = ["auth.example.test"]
//!
//! [driver.default_headers]
//! "User-Agent" = "courier"
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "pretty"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden via environment variables using the format
//! `PREFIX__SECTION__KEY`, for example:
//!
//! - `COURIER__DRIVER__BASE_URL=http://127.0.0.1:3000`
//! - `COURIER__DRIVER__FOLLOW_REDIRECTS=false`
//! - `COURIER__LOGGING__FORMAT=json`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::{CourierConfig, CourierConfigBuilder};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{DriverConfig, LogFormat, LoggingConfig, MAX_REDIRECT_LIMIT};
