//! IQAir (AirVisual) API client
//!
//! Fetches the nearest-station air quality reading for coordinates or for
//! an administrative (city, state, country) triple. The provider wraps
//! results in an envelope whose `status` field can signal failure inside
//! an HTTP 200 response; that case is surfaced as `ApiError::UpstreamApi`.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::request::{get_json, ApiError};
use super::{AirQuality, AirQualityReading, Coordinates};
use crate::config::ConfigError;

/// Base URL for the AirVisual API
const AIRVISUAL_BASE_URL: &str = "http://api.airvisual.com/v2";

/// Request timeout, same rationale as the weather client
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the AirVisual nearest-station and by-city endpoints
#[derive(Debug, Clone)]
pub struct AirQualityApiClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl AirQualityApiClient {
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
            base_url: AIRVISUAL_BASE_URL.to_string(),
        })
    }

    /// Overrides the base URL (for tests against a mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetches the nearest-station reading for coordinates
    ///
    /// This is the preferred lookup: name matching on the by-city endpoint
    /// is ambiguous upstream, coordinates are not.
    pub async fn by_coordinates(&self, coords: Coordinates) -> Result<AirQuality, ApiError> {
        debug!(
            latitude = coords.latitude,
            longitude = coords.longitude,
            "fetching air quality by coordinates"
        );
        let url = format!("{}/nearest_city", self.base_url);
        let payload = get_json(
            &self.http,
            &url,
            &[
                ("lat", coords.latitude.to_string()),
                ("lon", coords.longitude.to_string()),
                ("key", self.api_key.clone()),
            ],
        )
        .await?;

        parse_envelope(payload)
    }

    /// Fetches a reading for an administrative (city, state, country) triple
    pub async fn by_city(
        &self,
        city: &str,
        state: &str,
        country: &str,
    ) -> Result<AirQuality, ApiError> {
        debug!(city, state, country, "fetching air quality by city");
        let url = format!("{}/city", self.base_url);
        let payload = get_json(
            &self.http,
            &url,
            &[
                ("city", city.to_string()),
                ("state", state.to_string()),
                ("country", country.to_string()),
                ("key", self.api_key.clone()),
            ],
        )
        .await?;

        parse_envelope(payload)
    }
}

/// Parses the provider envelope into a reading or the unavailable marker
///
/// A non-"success" status is an application-level failure even though the
/// HTTP call succeeded. A success envelope without pollution data means
/// the location is not covered, which is not an error.
fn parse_envelope(payload: serde_json::Value) -> Result<AirQuality, ApiError> {
    let envelope: RawEnvelope =
        serde_json::from_value(payload).map_err(|e| ApiError::MalformedResponse(e.to_string()))?;

    if envelope.status != "success" {
        let message = envelope
            .data
            .as_ref()
            .and_then(|d| d.get("message"))
            .and_then(|m| m.as_str())
            .map_or_else(|| envelope.status.clone(), str::to_string);
        return Err(ApiError::UpstreamApi { message });
    }

    let data = match envelope.data {
        Some(data) => data,
        None => return Ok(AirQuality::Unavailable),
    };
    let body: RawData =
        serde_json::from_value(data).map_err(|e| ApiError::MalformedResponse(e.to_string()))?;

    let pollution = body.current.and_then(|c| c.pollution);
    match pollution {
        Some(RawPollution {
            aqius: Some(aqi),
            mainus,
        }) => Ok(AirQuality::Reading(AirQualityReading {
            aqi,
            main_pollutant: mainus.unwrap_or_else(|| "n/a".to_string()),
        })),
        _ => Ok(AirQuality::Unavailable),
    }
}

/// Outer provider envelope; `data` is left untyped because its shape
/// differs between success and failure responses
#[derive(Debug, Deserialize)]
struct RawEnvelope {
    status: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawData {
    #[serde(default)]
    current: Option<RawCurrent>,
}

#[derive(Debug, Deserialize)]
struct RawCurrent {
    #[serde(default)]
    pollution: Option<RawPollution>,
}

#[derive(Debug, Deserialize)]
struct RawPollution {
    #[serde(default)]
    aqius: Option<u32>,
    #[serde(default)]
    mainus: Option<String>,
}
