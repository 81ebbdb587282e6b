//! Startup configuration for cielterm
//!
//! Both provider API keys are read from the process environment exactly
//! once, at startup, so a missing secret fails fast instead of surfacing
//! mid-search. A `.env` file in the working directory is honored.

use thiserror::Error;

/// Environment variable holding the OpenWeatherMap API key
pub const OPENWEATHER_KEY_VAR: &str = "OPENWEATHER_API_KEY";

/// Environment variable holding the IQAir (AirVisual) API key
pub const IQAIR_KEY_VAR: &str = "IQAIR_API_KEY";

/// Errors raised during startup configuration and client construction
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is unset or blank
    #[error("missing required environment variable {0}")]
    MissingEnvVar(&'static str),

    /// A client was handed an empty API key
    #[error("API key must not be empty")]
    EmptyApiKey,

    /// The HTTP client could not be initialized
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Validated startup configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenWeatherMap API key
    pub openweather_api_key: String,
    /// IQAir API key
    pub iqair_api_key: String,
}

impl Config {
    /// Loads and validates the configuration from the environment
    ///
    /// Loads `.env` first if present. Fails on the first missing or blank
    /// key; this is the single validation point for secrets.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            openweather_api_key: read_key(OPENWEATHER_KEY_VAR)?,
            iqair_api_key: read_key(IQAIR_KEY_VAR)?,
        })
    }
}

/// Reads one environment variable, rejecting unset and blank values
fn read_key(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnvVar(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable name so tests stay parallel-safe.

    #[test]
    fn test_read_key_present() {
        std::env::set_var("CIELTERM_TEST_KEY_PRESENT", "abc123");
        let err = read_key("CIELTERM_TEST_KEY_PRESENT");
        assert_eq!(err.unwrap(), "abc123");
    }

    #[test]
    fn test_read_key_missing() {
        std::env::remove_var("CIELTERM_TEST_KEY_MISSING");
        let result = read_key("CIELTERM_TEST_KEY_MISSING");
        assert!(matches!(
            result,
            Err(ConfigError::MissingEnvVar("CIELTERM_TEST_KEY_MISSING"))
        ));
    }

    #[test]
    fn test_read_key_blank_is_rejected() {
        std::env::set_var("CIELTERM_TEST_KEY_BLANK", "   ");
        let result = read_key("CIELTERM_TEST_KEY_BLANK");
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
    }

    #[test]
    fn test_config_error_message_names_variable() {
        let err = ConfigError::MissingEnvVar(OPENWEATHER_KEY_VAR);
        assert!(err.to_string().contains("OPENWEATHER_API_KEY"));
    }
}
