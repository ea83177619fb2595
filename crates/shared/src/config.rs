//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Period-end behaviour.
    #[serde(default)]
    pub period_end: PeriodEndSettings,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "ledgerclose=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

/// Switches for the period-end engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PeriodEndSettings {
    /// Run year-end in the same transaction as the final month-end.
    ///
    /// When false, closing the final period only sets the provisional
    /// year-end flag and a separate year-end run is required.
    #[serde(default = "default_true")]
    pub auto_year_end: bool,
    /// Treat a pending revaluation as critical instead of informational.
    #[serde(default)]
    pub strict_revaluation: bool,
    /// Generate the stewardship batch for foreign cost centres at month-end.
    #[serde(default = "default_true")]
    pub stewardship: bool,
}

fn default_true() -> bool {
    true
}

impl Default for PeriodEndSettings {
    fn default() -> Self {
        Self {
            auto_year_end: true,
            strict_revaluation: false,
            stewardship: true,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration, optionally layering an explicit file on top of
    /// the `config/` defaults. Environment variables always win.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load_from(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false));

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        let config = builder
            .add_source(config::Environment::with_prefix("LEDGERCLOSE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("LEDGERCLOSE__DATABASE__URL", Some("postgres://localhost/books")),
                ("LEDGERCLOSE__PERIOD_END__AUTO_YEAR_END", Some("false")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "postgres://localhost/books");
                assert_eq!(config.database.max_connections, 10);
                assert!(!config.period_end.auto_year_end);
                assert!(config.period_end.stewardship);
                assert_eq!(config.logging.filter, "ledgerclose=info");
            },
        );
    }

    #[test]
    fn test_missing_database_url_fails() {
        temp_env::with_var_unset("LEDGERCLOSE__DATABASE__URL", || {
            assert!(AppConfig::load().is_err());
        });
    }

    #[test]
    fn test_period_end_defaults() {
        let settings = PeriodEndSettings::default();
        assert!(settings.auto_year_end);
        assert!(!settings.strict_revaluation);
        assert!(settings.stewardship);
    }
}
