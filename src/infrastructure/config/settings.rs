//! Application settings loading and validation.
//!
//! Settings are loaded from a TOML file. `RISKWARDEN_DATABASE` overrides the
//! database path.
//!
//! # Example
//!
//! ```no_run
//! use riskwarden::infrastructure::config::settings::Settings;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::load("riskwarden.toml")?;
//!     settings.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use super::storage::StorageConfig;
use crate::error::{ConfigError, Result};

/// Environment variable overriding [`Settings::database`].
pub const DATABASE_ENV: &str = "RISKWARDEN_DATABASE";

/// Main application settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    /// Path to SQLite database file.
    ///
    /// Defaults to "riskwarden.db" in the current directory.
    #[serde(default = "default_database_path")]
    pub database: String,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Result retention and window policy.
    #[serde(default)]
    pub storage: StorageConfig,
}

fn default_database_path() -> String {
    "riskwarden.db".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: default_database_path(),
            logging: LoggingConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut settings: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        settings.apply_env_overrides();
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is
    /// malformed, or validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Settings used when no file is given, with environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an override makes the settings invalid.
    pub fn from_env() -> Result<Self> {
        let mut settings = Self::default();
        settings.apply_env_overrides();
        settings.validate()?;
        Ok(settings)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(database) = std::env::var(DATABASE_ENV) {
            self.database = database;
        }
    }

    /// Validate settings values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }
        self.logging.validate()?;
        self.storage.validate()?;
        Ok(())
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Render as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the settings cannot be encoded.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| {
            ConfigError::InvalidValue {
                field: "settings",
                reason: e.to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::storage::ExposureWindowMode;

    #[test]
    fn empty_file_uses_defaults() {
        let settings = Settings::parse_toml("").unwrap();
        assert_eq!(settings.storage.stored_result_limit, 2);
        assert_eq!(settings.storage.exposure_windows, ExposureWindowMode::Discard);
        assert_eq!(settings.logging, LoggingConfig::default());
    }

    #[test]
    fn parses_storage_section() {
        let settings = Settings::parse_toml(
            r#"
            [storage]
            stored_result_limit = 5
            exposure_windows = "retain"
            legacy_snapshot = "legacy.json"
            "#,
        )
        .unwrap();
        assert_eq!(settings.storage.stored_result_limit, 5);
        assert_eq!(settings.storage.exposure_windows, ExposureWindowMode::Retain);
        assert_eq!(
            settings.storage.legacy_snapshot.as_deref(),
            Some(Path::new("legacy.json"))
        );
    }

    #[test]
    fn zero_limit_is_rejected() {
        let err = Settings::parse_toml("[storage]\nstored_result_limit = 0\n").unwrap_err();
        assert!(err.to_string().contains("storage.stored_result_limit"));
    }

    #[test]
    fn unknown_window_mode_is_a_parse_error() {
        let err = Settings::parse_toml("[storage]\nexposure_windows = \"keep\"\n").unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Config(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn renders_back_to_toml() {
        let settings = Settings::default();
        let rendered = settings.to_toml().unwrap();
        assert!(rendered.contains("stored_result_limit = 2"));
        assert!(rendered.contains("exposure_windows = \"discard\""));
    }
}
