//! Layered configuration loading.
//!
//! Later layers win: built-in defaults (or a preset), then a TOML/JSON file,
//! then `PREFIX__SECTION__KEY` environment variables.

use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::{ConfigError, CourierConfig, LogFormat};

/// Builds a [`CourierConfig`] from layered sources.
///
/// # Example
///
/// ```no_run
/// use courier_config::ConfigLoader;
///
/// # fn main() -> Result<(), courier_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_defaults()
///     .with_file("courier.toml")?
///     .with_env_prefix("COURIER")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config: CourierConfig,
    env_prefix: Option<String>,
}

/// Formats a configuration document can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
}

impl Format {
    fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name.to_ascii_lowercase().as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::unsupported_format(name)),
        }
    }

    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(extension) => Self::from_name(extension),
            None => Err(ConfigError::unsupported_format(path.display().to_string())),
        }
    }

    fn parse(self, content: &str) -> Result<CourierConfig, ConfigError> {
        Ok(match self {
            Self::Toml => toml::from_str(content)?,
            Self::Json => serde_json::from_str(content)?,
        })
    }
}

impl ConfigLoader {
    /// Creates a loader holding the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets to the default configuration.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = CourierConfig::default();
        self
    }

    /// Resets to the development preset.
    ///
    /// # Example
    ///
    /// ```
    /// use courier_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_development()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = CourierConfig::development();
        self
    }

    /// Resets to the CI preset.
    #[must_use]
    pub fn with_ci(mut self) -> Self {
        self.config = CourierConfig::ci();
        self
    }

    /// Replaces the configuration with the contents of `path`.
    ///
    /// The format follows the extension: `.toml` or `.json`. Sections missing
    /// from the file take their defaults; unknown keys are rejected.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::not_found(path));
        }

        let format = Format::from_path(path)?;
        let content = fs::read_to_string(path).map_err(|e| ConfigError::read(path, e))?;
        self.config = format.parse(&content)?;
        Ok(self)
    }

    /// Like [`with_file`](Self::with_file), but a missing file is skipped.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Replaces the configuration with an in-memory document.
    ///
    /// `format` is `"toml"` or `"json"`.
    ///
    /// # Example
    ///
    /// ```
    /// use courier_config::ConfigLoader;
    ///
    /// let toml = r#"
    ///     [driver]
    ///     base_url = "http://127.0.0.1:3000"
    /// "#;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string(toml, "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.driver.base_url, "http://127.0.0.1:3000");
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = Format::from_name(format)?.parse(content)?;
        Ok(self)
    }

    /// Enables environment overrides named `{prefix}__SECTION__KEY`.
    ///
    /// With prefix `"COURIER"`:
    /// - `COURIER__DRIVER__BASE_URL=http://127.0.0.1:3000`
    /// - `COURIER__DRIVER__ALLOWED_REDIRECT_HOSTS=auth.test,cdn.test`
    /// - `COURIER__LOGGING__LEVEL=debug`
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Loads `.env` from the working directory (or a parent) into the process
    /// environment. A missing file is skipped; a malformed one is an error.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        skip_missing(dotenvy::dotenv())?;
        Ok(self)
    }

    /// Like [`with_dotenv`](Self::with_dotenv), reading `path` instead.
    pub fn with_dotenv_path<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        skip_missing(dotenvy::from_path(path.as_ref()))?;
        Ok(self)
    }

    /// Applies environment overrides, validates, and returns the result.
    pub fn load(mut self) -> Result<CourierConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            for (key, value) in env::vars().filter(|(key, _)| key.starts_with(&prefix)) {
                self.apply_env_var(&key, &value, &prefix)?;
            }
        }

        self.config.validate()?;
        Ok(self.config)
    }

    /// Returns the configuration as layered so far, without env overrides
    /// or validation.
    #[must_use]
    pub fn load_unvalidated(self) -> CourierConfig {
        self.config
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        // COURIER_HOME shares the prefix but is not ours.
        let Some(path) = key.strip_prefix(prefix).and_then(|k| k.strip_prefix("__")) else {
            return Ok(());
        };
        let Some((section, field)) = path.split_once("__") else {
            return Ok(());
        };

        let driver = &mut self.config.driver;
        let logging = &mut self.config.logging;

        match (section, field) {
            ("DRIVER", "BASE_URL") => driver.base_url = value.to_string(),
            ("DRIVER", "FOLLOW_REDIRECTS") => driver.follow_redirects = env_bool(key, value)?,
            ("DRIVER", "MAX_REDIRECTS") => driver.max_redirects = env_number(key, value)?,
            ("DRIVER", "TIMEOUT_MS") => driver.timeout_ms = env_number(key, value)?,
            ("DRIVER", "ALLOWED_REDIRECT_HOSTS") => {
                driver.allowed_redirect_hosts = value
                    .split(',')
                    .map(str::trim)
                    .filter(|host| !host.is_empty())
                    .map(String::from)
                    .collect();
            }
            ("LOGGING", "ENABLED") => logging.enabled = env_bool(key, value)?,
            ("LOGGING", "LEVEL") => logging.level = value.to_string(),
            ("LOGGING", "FORMAT") => {
                logging.format = match value.to_ascii_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => return Err(ConfigError::invalid_env(key, "expected json or pretty")),
                };
            }
            ("LOGGING", "INCLUDE_LOCATION") => logging.include_location = env_bool(key, value)?,
            _ => {}
        }

        Ok(())
    }
}

fn skip_missing<T>(result: Result<T, dotenvy::Error>) -> Result<(), ConfigError> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(ConfigError::Dotenv(e)),
    }
}

fn env_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    parse_bool(value).ok_or_else(|| ConfigError::invalid_env(key, "expected a boolean"))
}

fn env_number<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid_env(key, "expected a non-negative integer"))
}

/// Accepts `true/false`, `1/0`, `yes/no`, `on/off` in any case.
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_loader_new() {
        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(config.driver.base_url, "http://127.0.0.1:9292");
    }

    #[test]
    fn test_loader_with_development() {
        let config = ConfigLoader::new().with_development().load().unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_loader_with_ci() {
        let config = ConfigLoader::new().with_ci().load().unwrap();
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_loader_with_string_toml() {
        let toml = r#"
            [driver]
            base_url = "http://127.0.0.1:3000"
            follow_redirects = false
            max_redirects = 3

            [driver.default_headers]
            "User-Agent" = "courier-tests"

            [logging]
            level = "warn"
            format = "json"
        "#;

        let config = ConfigLoader::new()
            .with_string(toml, "toml")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.driver.base_url, "http://127.0.0.1:3000");
        assert!(!config.driver.follow_redirects);
        assert_eq!(config.driver.max_redirects, 3);
        assert_eq!(
            config.driver.default_headers.get("User-Agent").map(String::as_str),
            Some("courier-tests")
        );
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_loader_with_string_json() {
        let json = r#"{"driver": {"base_url": "http://127.0.0.1:3000"}}"#;

        let config = ConfigLoader::new()
            .with_string(json, "json")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.driver.base_url, "http://127.0.0.1:3000");
        assert!(config.driver.follow_redirects);
    }

    #[test]
    fn test_loader_with_unknown_format() {
        let result = ConfigLoader::new().with_string("", "yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_loader_rejects_unknown_section() {
        let result = ConfigLoader::new().with_string("[server]\nport = 1", "toml");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_loader_with_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[driver]\nbase_url = \"http://localhost:8080\"").unwrap();

        let config = ConfigLoader::new()
            .with_file(file.path())
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.driver.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_loader_with_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"driver": {{"max_redirects": 2}}}}"#).unwrap();

        let config = ConfigLoader::new()
            .with_file(file.path())
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.driver.max_redirects, 2);
    }

    #[test]
    fn test_loader_rejects_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let result = ConfigLoader::new().with_file(file.path());
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_loader_with_file_not_found() {
        let result = ConfigLoader::new().with_file("/nonexistent/courier.toml");
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }

    #[test]
    fn test_loader_with_optional_file_not_found() {
        let config = ConfigLoader::new()
            .with_optional_file("/nonexistent/courier.toml")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.driver.base_url, "http://127.0.0.1:9292");
    }

    #[test]
    fn test_load_validates() {
        let result = ConfigLoader::new()
            .with_string("[driver]\ntimeout_ms = 0", "toml")
            .unwrap()
            .load();
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_load_unvalidated() {
        let config = ConfigLoader::new()
            .with_string("[driver]\ntimeout_ms = 0", "toml")
            .unwrap()
            .load_unvalidated();
        assert_eq!(config.driver.timeout_ms, 0);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("on"), Some(true));
        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool("no"), Some(false));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn test_dotenv_missing_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let result = ConfigLoader::new().with_dotenv_path(dir.path().join(".env"));
        assert!(result.is_ok());
    }

    #[test]
    fn test_dotenv_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "COURIER_DOTENV_TEST='never closed").unwrap();

        let result = ConfigLoader::new().with_dotenv_path(file.path());
        assert!(matches!(result, Err(ConfigError::Dotenv(_))));
    }

    // Env overrides go through apply_env_var; tests don't touch the process env.

    #[test]
    fn test_apply_env_var_driver() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_var("TEST__DRIVER__BASE_URL", "http://10.0.0.1:9000", "TEST")
            .unwrap();
        loader
            .apply_env_var("TEST__DRIVER__FOLLOW_REDIRECTS", "off", "TEST")
            .unwrap();
        loader
            .apply_env_var("TEST__DRIVER__MAX_REDIRECTS", "7", "TEST")
            .unwrap();
        loader
            .apply_env_var("TEST__DRIVER__TIMEOUT_MS", "1500", "TEST")
            .unwrap();

        let driver = &loader.config.driver;
        assert_eq!(driver.base_url, "http://10.0.0.1:9000");
        assert!(!driver.follow_redirects);
        assert_eq!(driver.max_redirects, 7);
        assert_eq!(driver.timeout_ms, 1500);
    }

    #[test]
    fn test_apply_env_var_allowed_hosts() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_var(
                "TEST__DRIVER__ALLOWED_REDIRECT_HOSTS",
                "auth.test, cdn.test,,",
                "TEST",
            )
            .unwrap();
        assert_eq!(
            loader.config.driver.allowed_redirect_hosts,
            vec!["auth.test", "cdn.test"]
        );
    }

    #[test]
    fn test_apply_env_var_logging() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_var("TEST__LOGGING__LEVEL", "trace", "TEST")
            .unwrap();
        loader
            .apply_env_var("TEST__LOGGING__FORMAT", "JSON", "TEST")
            .unwrap();
        loader
            .apply_env_var("TEST__LOGGING__ENABLED", "0", "TEST")
            .unwrap();
        assert_eq!(loader.config.logging.level, "trace");
        assert_eq!(loader.config.logging.format, LogFormat::Json);
        assert!(!loader.config.logging.enabled);
    }

    #[test]
    fn test_apply_env_var_invalid_integer() {
        let mut loader = ConfigLoader::new();
        let result = loader.apply_env_var("TEST__DRIVER__MAX_REDIRECTS", "many", "TEST");
        assert!(matches!(result, Err(ConfigError::InvalidEnv { .. })));
    }

    #[test]
    fn test_apply_env_var_invalid_format() {
        let mut loader = ConfigLoader::new();
        let result = loader.apply_env_var("TEST__LOGGING__FORMAT", "xml", "TEST");
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_env_var_ignores_foreign_keys() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TESTING_HOME", "/tmp", "TEST").unwrap();
        loader.apply_env_var("TEST__UNKNOWN__KEY", "x", "TEST").unwrap();
        assert_eq!(loader.config, CourierConfig::default());
    }
}
