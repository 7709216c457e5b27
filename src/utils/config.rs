// src/utils/config.rs
//! Layered configuration
//!
//! Sources, later ones overriding earlier ones:
//!
//! 1. built-in defaults
//! 2. `intercept.{toml,yaml,json}` in the working directory (optional)
//! 3. environment variables prefixed `INTERCEPT__`, e.g.
//!    `INTERCEPT__LOGGING__LEVEL=debug` or `INTERCEPT__PROXY__MODE=interface`

use crate::interception::ProxyOptions;
use crate::utils::errors::{ProxyError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Base name of the optional configuration file
pub const CONFIG_FILE_NAME: &str = "intercept";

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "INTERCEPT";

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Factory configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FactoryConfig {
    /// Options used when a caller passes none
    pub proxy: ProxyOptions,

    /// Interceptor kinds declared per type name
    pub declarations: HashMap<String, Vec<String>>,

    pub logging: LoggingConfig,
}

impl FactoryConfig {
    /// Load from the optional default file and the environment
    pub fn load() -> Result<Self> {
        Self::build(config::File::with_name(CONFIG_FILE_NAME).required(false))
    }

    /// Load from a specific file (format from its extension) and the environment
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ProxyError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        Self::build(config::File::from(path).required(true))
    }

    fn build<S>(file: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let config: FactoryConfig = settings.try_deserialize()?;
        config.validate()?;

        debug!(
            "Loaded configuration with {} declared types",
            config.declarations.len()
        );
        Ok(config)
    }

    /// Check declarations and proxy options
    pub fn validate(&self) -> Result<()> {
        for (type_name, kinds) in &self.declarations {
            if type_name.trim().is_empty() {
                return Err(ProxyError::Config(
                    "declaration with empty type name".to_string(),
                ));
            }
            if kinds.iter().any(|k| k.trim().is_empty()) {
                return Err(ProxyError::Config(format!(
                    "empty interceptor kind declared for {}",
                    type_name
                )));
            }
        }

        self.proxy
            .validate()
            .map_err(|e| ProxyError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interception::{ConfiguredDeclarations, InterceptorKind, MetadataSource, ProxyMode};
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = FactoryConfig::default();
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
        assert_eq!(config.proxy.mode, ProxyMode::Subclass);
        assert!(config.declarations.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let file = write_config(
            r#"
            [proxy]
            mode = "interface"
            excluded_methods = ["describe"]

            [declarations]
            Calculator = ["logging", "timing"]

            [logging]
            level = "debug"
            "#,
        );

        let config = FactoryConfig::from_file(file.path()).unwrap();

        assert_eq!(config.proxy.mode, ProxyMode::Interface);
        assert_eq!(config.proxy.excluded_methods, vec!["describe"]);
        assert_eq!(config.logging.level, "debug");

        let declarations = ConfiguredDeclarations::new(&config.declarations);
        assert_eq!(
            declarations.declared_kinds("Calculator"),
            vec![InterceptorKind::from("logging"), InterceptorKind::from("timing")]
        );
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config(
            r#"
            [logging]
            json = true
            "#,
        );

        let config = FactoryConfig::from_file(file.path()).unwrap();
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.proxy, ProxyOptions::default());
    }

    #[test]
    fn test_missing_file() {
        let result = FactoryConfig::from_file("/nonexistent/intercept.toml");
        assert!(matches!(result, Err(ProxyError::Config(_))));
    }

    #[test]
    fn test_empty_kind_rejected() {
        let file = write_config(
            r#"
            [declarations]
            Calculator = ["logging", " "]
            "#,
        );

        assert!(matches!(
            FactoryConfig::from_file(file.path()),
            Err(ProxyError::Config(_))
        ));
    }

    #[test]
    fn test_duplicate_additional_interface_rejected() {
        let mut config = FactoryConfig::default();
        config.proxy = ProxyOptions::default()
            .with_interface("Audited")
            .with_interface("Audited");

        assert!(matches!(config.validate(), Err(ProxyError::Config(_))));
    }
}
