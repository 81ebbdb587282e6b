//! One-shot data acquisition for a city search
//!
//! Orchestrates a single interaction: current weather first, then the
//! forecast and air-quality lookups concurrently using the coordinates
//! from that same current-weather response. Weather-side failures abort
//! the search; air-quality failures degrade to an unavailable marker.

use tracing::{debug, warn};

use crate::cache::CacheStore;
use crate::config::{Config, ConfigError};
use crate::data::{
    aggregate_daily, normalize, AirQuality, AirQualityApiClient, ApiError, CitySnapshot,
    WeatherApiClient,
};

/// Cache operation name for whole-search snapshots
const SNAPSHOT_OP: &str = "city_snapshot";

/// Owns the API clients and the result cache for the app's lifetime
#[derive(Clone)]
pub struct Fetcher {
    weather: WeatherApiClient,
    air: AirQualityApiClient,
    cache: Option<CacheStore>,
}

impl Fetcher {
    /// Builds the clients from the validated configuration
    ///
    /// # Errors
    /// Fails if either client rejects its key or cannot build its HTTP
    /// client.
    pub fn new(config: &Config, cache_enabled: bool) -> Result<Self, ConfigError> {
        Ok(Self {
            weather: WeatherApiClient::new(config.openweather_api_key.clone())?,
            air: AirQualityApiClient::new(config.iqair_api_key.clone())?,
            cache: cache_enabled.then(CacheStore::new),
        })
    }

    /// Assembles a fetcher from pre-built parts (for tests)
    pub fn with_clients(
        weather: WeatherApiClient,
        air: AirQualityApiClient,
        cache: Option<CacheStore>,
    ) -> Self {
        Self {
            weather,
            air,
            cache,
        }
    }

    /// Runs one search and returns the complete snapshot for a city
    ///
    /// No retries, no cancellation: each call either completes or fails
    /// within its HTTP timeout. Results are memoized by city name when the
    /// cache is enabled.
    pub async fn city_snapshot(&self, city: &str) -> Result<CitySnapshot, ApiError> {
        let key = CacheStore::key(SNAPSHOT_OP, city);
        if let Some(cache) = &self.cache {
            if let Some(snapshot) = cache.get::<CitySnapshot>(&key) {
                debug!(city, "serving snapshot from cache");
                return Ok(snapshot);
            }
        }

        let current = self.weather.current_weather(city).await?;

        // Both follow-up lookups depend only on the coordinates of the
        // current-weather response; neither depends on the other.
        let coords = current.coords;
        let (forecast_payload, air_result) =
            tokio::join!(self.weather.forecast(coords), self.air.by_coordinates(coords));

        let samples = normalize(&forecast_payload?)?;
        let daily = aggregate_daily(&samples);

        let air = match air_result {
            Ok(air) => air,
            Err(err) => {
                // Expected partial-data condition: the dashboard is still
                // useful without the AQI gauge.
                warn!(city, error = %err, "air quality lookup failed");
                AirQuality::Unavailable
            }
        };

        let snapshot = CitySnapshot {
            current,
            samples,
            daily,
            air,
        };

        if let Some(cache) = &self.cache {
            cache.put(&key, &snapshot);
        }

        Ok(snapshot)
    }
}

/// Renders a search failure as a user-facing message
///
/// Distinguishes an unknown city from an unreachable or broken service;
/// this is the only place errors are turned into display text.
pub fn user_message(city: &str, err: &ApiError) -> String {
    if err.is_not_found() {
        return format!("Ville inconnue : « {} »", city);
    }
    match err {
        ApiError::Network(_) => format!("Service météo injoignable ({})", err),
        ApiError::UpstreamHttp { status, .. } => {
            format!("Service météo indisponible (HTTP {})", status)
        }
        ApiError::UpstreamApi { message } => format!("Erreur du service : {}", message),
        ApiError::MalformedResponse(_) => "Réponse du service illisible".to_string(),
    }
}
