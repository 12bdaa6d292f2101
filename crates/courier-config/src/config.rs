//! Main configuration types.
//!
//! This module provides the top-level [`CourierConfig`] struct and its builder.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, DriverConfig, LogFormat, LoggingConfig};

/// Complete Courier configuration.
///
/// This is the root configuration type that contains all configuration sections.
/// Use [`ConfigLoader`](crate::ConfigLoader) to load configuration from files
/// and environment variables.
///
/// # Example
///
/// ```
/// use courier_config::CourierConfig;
///
/// let config = CourierConfig::default();
/// assert_eq!(config.driver.base_url, "http://127.0.0.1:9292");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct CourierConfig {
    /// Driver configuration.
    #[serde(default)]
    pub driver: DriverConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CourierConfig {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```
    /// use courier_config::{CourierConfig, DriverConfig};
    ///
    /// let config = CourierConfig::builder()
    ///     .driver(DriverConfig::new("http://127.0.0.1:3000"))
    ///     .build();
    ///
    /// assert_eq!(config.driver.base_url, "http://127.0.0.1:3000");
    /// ```
    #[must_use]
    pub fn builder() -> CourierConfigBuilder {
        CourierConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when the `[driver]` section fails
    /// [`DriverConfig::validate`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.driver.validate()
    }

    /// Create a development configuration preset.
    ///
    /// Pretty debug-level logs with source locations.
    ///
    /// # Example
    ///
    /// ```
    /// use courier_config::CourierConfig;
    ///
    /// let config = CourierConfig::development();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.include_location = true;
        config
    }

    /// Create a CI configuration preset.
    ///
    /// JSON info-level logs for log collectors.
    ///
    /// # Example
    ///
    /// ```
    /// use courier_config::{CourierConfig, LogFormat};
    ///
    /// let config = CourierConfig::ci();
    /// assert_eq!(config.logging.format, LogFormat::Json);
    /// ```
    #[must_use]
    pub fn ci() -> Self {
        let mut config = Self::default();
        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config
    }
}

/// Builder for [`CourierConfig`].
#[derive(Debug, Default)]
pub struct CourierConfigBuilder {
    driver: Option<DriverConfig>,
    logging: Option<LoggingConfig>,
}

impl CourierConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the driver configuration.
    #[must_use]
    pub fn driver(mut self, driver: DriverConfig) -> Self {
        self.driver = Some(driver);
        self
    }

    /// Set the logging configuration.
    #[must_use]
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Build the configuration.
    ///
    /// Any unset sections will use their default values.
    #[must_use]
    pub fn build(self) -> CourierConfig {
        CourierConfig {
            driver: self.driver.unwrap_or_default(),
            logging: self.logging.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    pub fn build_validated(self) -> Result<CourierConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
