//! Configuration errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a [`CourierConfig`](crate::CourierConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("config file {} does not exist", path.display())]
    NotFound {
        /// Requested path.
        path: PathBuf,
    },

    /// The configuration file exists but could not be read.
    #[error("cannot read config file {}", path.display())]
    Read {
        /// Requested path.
        path: PathBuf,
        /// I/O failure.
        #[source]
        source: io::Error,
    },

    /// Only `.toml` and `.json` are understood.
    #[error("unsupported config format {format:?} (expected toml or json)")]
    UnsupportedFormat {
        /// The extension or format name given.
        format: String,
    },

    /// Malformed TOML, or TOML with unknown keys.
    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    /// Malformed JSON, or JSON with unknown keys.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A value parsed but is not acceptable.
    #[error("{field}: {reason}")]
    InvalidValue {
        /// Dotted field path, e.g. `driver.base_url`.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A `.env` file exists but could not be loaded.
    #[error("cannot load .env file")]
    Dotenv(#[source] dotenvy::Error),

    /// An environment override could not be parsed.
    #[error("{var}: {reason}")]
    InvalidEnv {
        /// Variable name.
        var: String,
        /// What was expected.
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub(crate) fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Creates an [`InvalidValue`](Self::InvalidValue) error.
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_env(var: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEnv {
            var: var.into(),
            reason: reason.into(),
        }
    }
}
