//! Configuration for the pmsl tool
//!
//! Layers, later ones winning:
//! 1. built-in defaults
//! 2. a TOML file: explicit path, else `PMSL_CONFIG_PATH`, else `./pmsl.toml` if present
//! 3. inline TOML passed to the builder
//! 4. environment variables, e.g. `PMSL_LOGGING__LEVEL=debug`
//!
//! ```toml
//! [generate]
//! prefix = "ctx."
//!
//! [generate.symbols]
//! count = "state.count"
//!
//! [logging]
//! level = "info"
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use config::{ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "PMSL_CONFIG_PATH";

const DEFAULT_CONFIG_FILE: &str = "pmsl.toml";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub generate: GenerateConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Name resolution used by `pmsl generate`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GenerateConfig {
    /// Prepended to every variable name without an explicit rename
    #[serde(default)]
    pub prefix: Option<String>,
    /// Explicit variable renames
    #[serde(default)]
    pub symbols: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default tracing filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config_path: Option<PathBuf>,
    inline: Option<String>,
}

impl ConfigBuilder {
    /// Config file to load instead of the default search
    pub fn config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    /// TOML layered over the config file
    pub fn inline_toml(mut self, source: impl Into<String>) -> Self {
        self.inline = Some(source.into());
        self
    }

    pub fn build(self) -> Result<Config, ConfigError> {
        let mut builder =
            config::Config::builder().set_default("logging.level", DEFAULT_LOG_LEVEL)?;

        let explicit = self
            .config_path
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));
        builder = match &explicit {
            Some(path) => builder.add_source(File::from(path.as_path()).required(true)),
            None => builder
                .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Toml).required(false)),
        };

        if let Some(source) = &self.inline {
            builder = builder.add_source(File::from_str(source, FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix("PMSL")
                .prefix_separator("_")
                .separator("__"),
        );

        let config: Config = builder.build()?.try_deserialize()?;
        debug!(
            path = ?explicit,
            symbols = config.generate.symbols.len(),
            "loaded configuration"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::builder()
            .inline_toml("")
            .build()
            .expect("Should load");
        assert_eq!(config.logging.level, "info");
        assert!(config.generate.prefix.is_none());
        assert!(config.generate.symbols.is_empty());
    }

    #[test]
    fn test_inline_toml() {
        let config = Config::builder()
            .inline_toml(
                r#"
                [generate]
                prefix = "ctx."

                [generate.symbols]
                count = "state.count"

                [logging]
                level = "debug"
                "#,
            )
            .build()
            .expect("Should load");
        assert_eq!(config.generate.prefix.as_deref(), Some("ctx."));
        assert_eq!(
            config.generate.symbols.get("count").map(String::as_str),
            Some("state.count")
        );
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = Config::builder()
            .config_path(Some(PathBuf::from("/nonexistent/pmsl.toml")))
            .build();
        assert!(result.is_err());
    }
}
