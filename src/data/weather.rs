//! OpenWeatherMap API client
//!
//! Fetches current weather by city name and the 5-day / 3-hourly forecast
//! by coordinates. Responses come back in metric units with French
//! descriptions, matching the dashboard's locale.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::request::{get_json, ApiError};
use super::{Coordinates, CurrentWeather};
use crate::config::ConfigError;

/// Base URL for the OpenWeatherMap API
const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Request timeout; a hung upstream must not block an interaction forever
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the OpenWeatherMap current-weather and forecast endpoints
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl WeatherApiClient {
    /// Creates a client for the given API key
    ///
    /// # Errors
    /// Fails with `ConfigError::EmptyApiKey` if the key is blank, or if
    /// the HTTP client cannot be initialized.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            http,
            api_key,
            base_url: OPENWEATHER_BASE_URL.to_string(),
        })
    }

    /// Overrides the base URL (for tests against a mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetches current weather for a city by name
    ///
    /// An unknown city surfaces as the provider's 404, reported as
    /// `ApiError::UpstreamHttp`. One outbound call per invocation; no
    /// client-side caching.
    pub async fn current_weather(&self, city: &str) -> Result<CurrentWeather, ApiError> {
        debug!(city, "fetching current weather");
        let url = format!("{}/weather", self.base_url);
        let payload = get_json(
            &self.http,
            &url,
            &[
                ("q", city.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
                ("lang", "fr".to_string()),
            ],
        )
        .await?;

        parse_current(payload)
    }

    /// Fetches the raw 5-day / 3-hourly forecast payload for coordinates
    ///
    /// Returns the raw JSON body; reshaping into samples is the forecast
    /// processor's job (see [`crate::data::forecast::normalize`]).
    pub async fn forecast(&self, coords: Coordinates) -> Result<serde_json::Value, ApiError> {
        debug!(
            latitude = coords.latitude,
            longitude = coords.longitude,
            "fetching forecast"
        );
        let url = format!("{}/forecast", self.base_url);
        get_json(
            &self.http,
            &url,
            &[
                ("lat", coords.latitude.to_string()),
                ("lon", coords.longitude.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
                ("lang", "fr".to_string()),
            ],
        )
        .await
    }
}

/// Parses a current-weather payload into the domain model
fn parse_current(payload: serde_json::Value) -> Result<CurrentWeather, ApiError> {
    let raw: RawCurrent =
        serde_json::from_value(payload).map_err(|e| ApiError::MalformedResponse(e.to_string()))?;

    let condition = raw
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::MalformedResponse("weather array is empty".to_string()))?;

    Ok(CurrentWeather {
        city: raw.name,
        country: raw.sys.country,
        temperature: raw.main.temp,
        feels_like: raw.main.feels_like,
        humidity: raw.main.humidity,
        wind_speed: raw.wind.speed,
        description: condition.description,
        icon: condition.icon,
        coords: Coordinates {
            latitude: raw.coord.lat,
            longitude: raw.coord.lon,
        },
    })
}

/// Wire shape of the current-weather response
#[derive(Debug, Deserialize)]
struct RawCurrent {
    coord: RawCoord,
    weather: Vec<RawCondition>,
    main: RawMain,
    wind: RawWind,
    name: String,
    sys: RawSys,
}

#[derive(Debug, Deserialize)]
struct RawCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct RawCondition {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct RawMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct RawWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct RawSys {
    country: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sample current-weather response, shaped like the provider's
    const VALID_CURRENT: &str = r#"{
        "coord": {"lon": 2.3488, "lat": 48.8534},
        "weather": [{"id": 800, "main": "Clear", "description": "ciel dégagé", "icon": "01d"}],
        "main": {"temp": 20.0, "feels_like": 19.5, "humidity": 50},
        "wind": {"speed": 5.0},
        "name": "Paris",
        "sys": {"country": "FR"}
    }"#;

    #[test]
    fn test_client_rejects_empty_api_key() {
        assert!(matches!(
            WeatherApiClient::new(""),
            Err(ConfigError::EmptyApiKey)
        ));
        assert!(matches!(
            WeatherApiClient::new("   "),
            Err(ConfigError::EmptyApiKey)
        ));
    }

    #[test]
    fn test_client_accepts_non_empty_api_key() {
        assert!(WeatherApiClient::new("une-fausse-cle-api").is_ok());
    }

    #[test]
    fn test_parse_current_valid_response() {
        let payload: serde_json::Value =
            serde_json::from_str(VALID_CURRENT).expect("sample should parse");
        let weather = parse_current(payload).expect("should parse current weather");

        assert_eq!(weather.city, "Paris");
        assert_eq!(weather.country, "FR");
        assert!((weather.temperature - 20.0).abs() < 0.01);
        assert!((weather.feels_like - 19.5).abs() < 0.01);
        assert_eq!(weather.humidity, 50);
        assert!((weather.wind_speed - 5.0).abs() < 0.01);
        assert_eq!(weather.description, "ciel dégagé");
        assert_eq!(weather.icon, "01d");
        assert!((weather.coords.latitude - 48.8534).abs() < 0.0001);
        assert!((weather.coords.longitude - 2.3488).abs() < 0.0001);
    }

    #[test]
    fn test_parse_current_missing_main_is_malformed() {
        let payload = serde_json::json!({
            "coord": {"lon": 2.3488, "lat": 48.8534},
            "weather": [{"description": "ciel dégagé", "icon": "01d"}],
            "wind": {"speed": 5.0},
            "name": "Paris",
            "sys": {"country": "FR"}
        });

        let result = parse_current(payload);
        assert!(matches!(result, Err(ApiError::MalformedResponse(_))));
    }

    #[test]
    fn test_parse_current_empty_weather_array_is_malformed() {
        let payload = serde_json::json!({
            "coord": {"lon": 2.3488, "lat": 48.8534},
            "weather": [],
            "main": {"temp": 20.0, "feels_like": 19.5, "humidity": 50},
            "wind": {"speed": 5.0},
            "name": "Paris",
            "sys": {"country": "FR"}
        });

        match parse_current(payload) {
            Err(ApiError::MalformedResponse(msg)) => {
                assert!(msg.contains("weather array"));
            }
            other => panic!("Expected MalformedResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_with_base_url_override() {
        let client = WeatherApiClient::new("key")
            .expect("client should build")
            .with_base_url("http://127.0.0.1:9999");
        assert_eq!(client.base_url, "http://127.0.0.1:9999");
    }
}
