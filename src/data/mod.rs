//! Core data models for cielterm
//!
//! This module contains the data types used throughout the application
//! for representing current weather, forecast samples, daily summaries,
//! and air quality readings.

pub mod air_quality;
pub mod forecast;
pub mod request;
pub mod weather;

pub use air_quality::AirQualityApiClient;
pub use forecast::{aggregate_daily, normalize};
pub use request::ApiError;
pub use weather::WeatherApiClient;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Geographic coordinates of a city, as reported by the weather provider
///
/// The coordinates returned by the current-weather call are the ones used
/// for the forecast and air-quality lookups of the same search. Mixing
/// coordinates across searches is a defect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

/// Current weather conditions for a city
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// City name as resolved by the provider
    pub city: String,
    /// ISO country code
    pub country: String,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Feels-like temperature in Celsius
    pub feels_like: f64,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,
    /// Wind speed in m/s, as reported by the provider
    pub wind_speed: f64,
    /// Localized sky description (e.g. "ciel dégagé")
    pub description: String,
    /// Provider icon code (e.g. "01d")
    pub icon: String,
    /// Coordinates of the resolved city
    pub coords: Coordinates,
}

impl CurrentWeather {
    /// Wind speed converted to km/h, for display only
    pub fn wind_speed_kmh(&self) -> f64 {
        self.wind_speed * 3.6
    }
}

/// One 3-hour forecast slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    /// Provider-local timestamp of the slot
    pub timestamp: NaiveDateTime,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Feels-like temperature in Celsius
    pub feels_like: f64,
    /// Localized sky description
    pub description: String,
    /// Provider icon code
    pub icon: String,
}

/// Per-day forecast summary derived from the 3-hourly samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    /// Calendar date (provider-local day boundary)
    pub date: NaiveDate,
    /// Lowest sample temperature of the day in Celsius
    pub temp_min: f64,
    /// Highest sample temperature of the day in Celsius
    pub temp_max: f64,
    /// Most frequent icon code among the day's samples
    pub icon: String,
}

/// Air quality for a location, or an explicit unavailable marker
///
/// The air-quality provider does not cover every location. Absence of
/// data is an expected condition and is modelled explicitly rather than
/// with a default reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AirQuality {
    /// A reading from the nearest monitoring station
    Reading(AirQualityReading),
    /// No data available for this location
    Unavailable,
}

/// A single air-quality reading (US EPA standard)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQualityReading {
    /// Air Quality Index, US standard; stored unclamped
    pub aqi: u32,
    /// Dominant pollutant code (e.g. "p2" for PM2.5)
    pub main_pollutant: String,
}

/// US EPA air quality bands, used for labelling and coloring the gauge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AqiLevel {
    Good,
    Moderate,
    UnhealthySensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiLevel {
    /// Maps an AQI value onto its US EPA band
    pub fn from_aqi(aqi: u32) -> Self {
        match aqi {
            0..=50 => Self::Good,
            51..=100 => Self::Moderate,
            101..=150 => Self::UnhealthySensitive,
            151..=200 => Self::Unhealthy,
            201..=300 => Self::VeryUnhealthy,
            _ => Self::Hazardous,
        }
    }

    /// Human-readable label for the band
    pub fn label(self) -> &'static str {
        match self {
            Self::Good => "Bonne",
            Self::Moderate => "Modérée",
            Self::UnhealthySensitive => "Nocive pour les groupes sensibles",
            Self::Unhealthy => "Nocive",
            Self::VeryUnhealthy => "Très nocive",
            Self::Hazardous => "Dangereuse",
        }
    }
}

/// The complete result of one city search
///
/// Treated as an immutable snapshot once constructed; the cache stores a
/// serialized copy and hands back fresh deserializations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitySnapshot {
    /// Current conditions
    pub current: CurrentWeather,
    /// 3-hourly forecast samples in chronological order
    pub samples: Vec<ForecastSample>,
    /// Per-day summaries in ascending date order
    pub daily: Vec<DailySummary>,
    /// Air quality reading or unavailable marker
    pub air: AirQuality,
}
