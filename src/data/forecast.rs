//! Forecast processing
//!
//! Reshapes the raw 5-day forecast payload into flat 3-hourly samples and
//! aggregates those samples into per-day summaries for the forecast strip.

use chrono::NaiveDateTime;
use serde::Deserialize;
use std::collections::BTreeMap;

use super::request::ApiError;
use super::{DailySummary, ForecastSample};

/// Timestamp format used by the provider's `dt_txt` field (provider-local)
const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Flattens a raw forecast payload into chronologically ordered samples
///
/// Every sample must carry its timestamp, temperatures and at least one
/// weather condition; any missing piece fails the whole payload rather
/// than producing partial records.
pub fn normalize(payload: &serde_json::Value) -> Result<Vec<ForecastSample>, ApiError> {
    let raw: RawForecast = serde_json::from_value(payload.clone())
        .map_err(|e| ApiError::MalformedResponse(e.to_string()))?;

    raw.list
        .into_iter()
        .map(|entry| {
            let timestamp = NaiveDateTime::parse_from_str(&entry.dt_txt, DT_TXT_FORMAT)
                .map_err(|_| {
                    ApiError::MalformedResponse(format!("invalid timestamp: {}", entry.dt_txt))
                })?;

            let condition = entry.weather.into_iter().next().ok_or_else(|| {
                ApiError::MalformedResponse("weather array is empty".to_string())
            })?;

            Ok(ForecastSample {
                timestamp,
                temperature: entry.main.temp,
                feels_like: entry.main.feels_like,
                description: condition.description,
                icon: condition.icon,
            })
        })
        .collect()
}

/// Aggregates samples into one summary per calendar date
///
/// Grouping uses the provider-local date component of each timestamp, so
/// day boundaries match what the provider reports for the queried
/// location. Only dates actually present in the input appear; there is no
/// gap-filling. The result ascends by date regardless of input order.
pub fn aggregate_daily(samples: &[ForecastSample]) -> Vec<DailySummary> {
    let mut by_date: BTreeMap<chrono::NaiveDate, Vec<&ForecastSample>> = BTreeMap::new();
    for sample in samples {
        by_date.entry(sample.timestamp.date()).or_default().push(sample);
    }

    by_date
        .into_iter()
        .map(|(date, mut day)| {
            // Chronological order inside the day keeps the icon tie-break
            // independent of the input order.
            day.sort_by_key(|s| s.timestamp);

            let mut temp_min = f64::INFINITY;
            let mut temp_max = f64::NEG_INFINITY;
            for sample in &day {
                temp_min = temp_min.min(sample.temperature);
                temp_max = temp_max.max(sample.temperature);
            }

            DailySummary {
                date,
                temp_min,
                temp_max,
                icon: dominant_icon(&day),
            }
        })
        .collect()
}

/// Picks the most frequent icon; ties go to the earliest-seen icon
fn dominant_icon(day: &[&ForecastSample]) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for sample in day {
        match counts.iter_mut().find(|(icon, _)| *icon == sample.icon) {
            Some(entry) => entry.1 += 1,
            None => counts.push((&sample.icon, 1)),
        }
    }

    let mut best_icon = "";
    let mut best_count = 0;
    for (icon, count) in counts {
        if count > best_count {
            best_icon = icon;
            best_count = count;
        }
    }
    best_icon.to_string()
}

/// Wire shape of the forecast payload
#[derive(Debug, Deserialize)]
struct RawForecast {
    list: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    dt_txt: String,
    main: RawMain,
    weather: Vec<RawCondition>,
}

#[derive(Debug, Deserialize)]
struct RawMain {
    temp: f64,
    feels_like: f64,
}

#[derive(Debug, Deserialize)]
struct RawCondition {
    description: String,
    icon: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_entry(dt_txt: &str, temp: f64, icon: &str) -> serde_json::Value {
        serde_json::json!({
            "dt_txt": dt_txt,
            "main": {"temp": temp, "feels_like": temp - 1.0},
            "weather": [{"description": "ciel dégagé", "icon": icon}]
        })
    }

    fn sample(dt_txt: &str, temp: f64, icon: &str) -> ForecastSample {
        ForecastSample {
            timestamp: NaiveDateTime::parse_from_str(dt_txt, DT_TXT_FORMAT).unwrap(),
            temperature: temp,
            feels_like: temp - 1.0,
            description: "ciel dégagé".to_string(),
            icon: icon.to_string(),
        }
    }

    #[test]
    fn test_normalize_extracts_flat_samples() {
        let payload = serde_json::json!({
            "list": [
                sample_entry("2024-01-01 12:00:00", 10.0, "01d"),
                sample_entry("2024-01-01 15:00:00", 12.5, "02d"),
            ]
        });

        let samples = normalize(&payload).expect("should normalize");
        assert_eq!(samples.len(), 2);
        assert_eq!(
            samples[0].timestamp,
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap()
        );
        assert!((samples[0].temperature - 10.0).abs() < 0.01);
        assert!((samples[0].feels_like - 9.0).abs() < 0.01);
        assert_eq!(samples[0].description, "ciel dégagé");
        assert_eq!(samples[1].icon, "02d");
    }

    #[test]
    fn test_normalize_preserves_chronological_order() {
        let payload = serde_json::json!({
            "list": [
                sample_entry("2024-01-01 00:00:00", 8.0, "01n"),
                sample_entry("2024-01-01 03:00:00", 7.5, "01n"),
                sample_entry("2024-01-01 06:00:00", 7.0, "02d"),
            ]
        });

        let samples = normalize(&payload).expect("should normalize");
        for pair in samples.windows(2) {
            assert!(pair[0].timestamp < pair[1].timestamp);
        }
    }

    #[test]
    fn test_normalize_missing_list_is_malformed() {
        let payload = serde_json::json!({"cod": "200", "cnt": 0});
        assert!(matches!(
            normalize(&payload),
            Err(ApiError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_normalize_entry_missing_main_is_malformed() {
        let payload = serde_json::json!({
            "list": [
                {"dt_txt": "2024-01-01 12:00:00", "weather": [{"description": "x", "icon": "01d"}]}
            ]
        });
        assert!(matches!(
            normalize(&payload),
            Err(ApiError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_normalize_bad_timestamp_is_malformed() {
        let payload = serde_json::json!({
            "list": [sample_entry("2024-01-01T12:00:00Z", 10.0, "01d")]
        });

        match normalize(&payload) {
            Err(ApiError::MalformedResponse(msg)) => {
                assert!(msg.contains("timestamp"));
            }
            other => panic!("Expected MalformedResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_normalize_empty_weather_is_malformed() {
        let payload = serde_json::json!({
            "list": [
                {"dt_txt": "2024-01-01 12:00:00", "main": {"temp": 1.0, "feels_like": 0.0}, "weather": []}
            ]
        });
        assert!(matches!(
            normalize(&payload),
            Err(ApiError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_single_sample_roundtrip() {
        let payload = serde_json::json!({
            "list": [{
                "dt_txt": "2024-01-01 12:00:00",
                "main": {"temp": 10, "feels_like": 9},
                "weather": [{"description": "clear", "icon": "01d"}]
            }]
        });

        let samples = normalize(&payload).expect("should normalize");
        let daily = aggregate_daily(&samples);

        assert_eq!(daily.len(), 1);
        let summary = &daily[0];
        assert_eq!(summary.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!((summary.temp_min - 10.0).abs() < 0.01);
        assert!((summary.temp_max - 10.0).abs() < 0.01);
        assert_eq!(summary.icon, "01d");
    }

    #[test]
    fn test_aggregate_one_summary_per_distinct_date() {
        // 40 samples spanning 5 distinct dates, 8 slots per day
        let mut samples = Vec::new();
        for day in 1..=5 {
            for slot in 0..8 {
                let dt = format!("2024-01-0{} {:02}:00:00", day, slot * 3);
                samples.push(sample(&dt, 5.0 + day as f64 + slot as f64, "01d"));
            }
        }
        assert_eq!(samples.len(), 40);

        let daily = aggregate_daily(&samples);
        assert_eq!(daily.len(), 5);
        for summary in &daily {
            assert!(summary.temp_min <= summary.temp_max);
        }
        for pair in daily.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
    }

    #[test]
    fn test_aggregate_is_input_order_insensitive() {
        let ordered = vec![
            sample("2024-01-01 06:00:00", 4.0, "02d"),
            sample("2024-01-01 12:00:00", 9.0, "01d"),
            sample("2024-01-01 18:00:00", 6.0, "01d"),
            sample("2024-01-02 12:00:00", 11.0, "10d"),
        ];
        let mut shuffled = ordered.clone();
        shuffled.reverse();
        shuffled.swap(0, 2);

        assert_eq!(aggregate_daily(&ordered), aggregate_daily(&shuffled));
    }

    #[test]
    fn test_aggregate_tie_break_uses_earliest_icon() {
        // Two icons with equal counts; the chronologically first wins,
        // whatever the input order.
        let ordered = vec![
            sample("2024-01-01 06:00:00", 4.0, "02d"),
            sample("2024-01-01 12:00:00", 9.0, "01d"),
        ];
        let reversed: Vec<_> = ordered.iter().rev().cloned().collect();

        assert_eq!(aggregate_daily(&ordered)[0].icon, "02d");
        assert_eq!(aggregate_daily(&reversed)[0].icon, "02d");
    }

    #[test]
    fn test_aggregate_mode_icon_wins_over_minority() {
        let samples = vec![
            sample("2024-01-01 06:00:00", 4.0, "10d"),
            sample("2024-01-01 09:00:00", 6.0, "01d"),
            sample("2024-01-01 12:00:00", 9.0, "01d"),
            sample("2024-01-01 15:00:00", 8.0, "01d"),
        ];

        assert_eq!(aggregate_daily(&samples)[0].icon, "01d");
    }

    #[test]
    fn test_aggregate_no_gap_filling() {
        // Jan 1 and Jan 3 present, Jan 2 absent; only two summaries
        let samples = vec![
            sample("2024-01-01 12:00:00", 5.0, "01d"),
            sample("2024-01-03 12:00:00", 7.0, "01d"),
        ];

        let daily = aggregate_daily(&samples);
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(daily[1].date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
    }

    #[test]
    fn test_aggregate_empty_input() {
        assert!(aggregate_daily(&[]).is_empty());
    }
}
