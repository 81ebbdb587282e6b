//! Command-line interface parsing for cielterm
//!
//! This module handles parsing of CLI arguments using clap, including an
//! optional initial city to search on startup and a --no-cache switch.

use clap::Parser;
use thiserror::Error;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The city argument was present but blank
    #[error("City name must not be empty")]
    EmptyCity,
}

/// cielterm - weather, forecasts and air quality in the terminal
#[derive(Parser, Debug)]
#[command(name = "cielterm")]
#[command(about = "Terminal dashboard for weather, 5-day forecasts and air quality")]
#[command(version)]
pub struct Cli {
    /// City to search as soon as the dashboard opens
    ///
    /// Examples:
    ///   cielterm              # Open with an empty search bar
    ///   cielterm Paris        # Open and search for Paris immediately
    pub city: Option<String>,

    /// Disable the in-memory result cache (every search hits the APIs)
    #[arg(long)]
    pub no_cache: bool,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// City to search immediately, if one was given
    pub initial_city: Option<String>,
    /// Whether search results are memoized between searches
    pub cache_enabled: bool,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            initial_city: None,
            cache_enabled: true,
        }
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Errors
    /// Fails with `CliError::EmptyCity` if a city argument was given but
    /// contains only whitespace.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let initial_city = match &cli.city {
            None => None,
            Some(city) => {
                let trimmed = city.trim();
                if trimmed.is_empty() {
                    return Err(CliError::EmptyCity);
                }
                Some(trimmed.to_string())
            }
        };

        Ok(Self {
            initial_city,
            cache_enabled: !cli.no_cache,
        })
    }
}
