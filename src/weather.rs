//! Weather provider and WMO condition code translation.
//!
//! Production lookups go to the Open-Meteo forecast API; the trait
//! exists so the checkpoint pipeline can be exercised with canned
//! forecasts in tests.

use crate::config::WeatherConfig;
use crate::models::{Coordinate, WeatherObservation};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Timelike, Utc};
use reqwest::Client;
use std::time::Duration;

/// One hour of forecast data for a single coordinate
#[derive(Debug, Clone, PartialEq)]
pub struct HourSample {
    pub time: DateTime<Utc>,
    pub temperature_c: f32,
    pub weather_code: u16,
}

/// Hourly weather lookup for a coordinate on a given date
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn hourly_forecast(
        &self,
        coordinate: Coordinate,
        date: NaiveDate,
    ) -> Result<Vec<HourSample>>;
}

/// Pick the observation for the hour containing `at`.
///
/// Returns `None` when the forecast has no sample for that hour; the
/// caller substitutes a degraded observation.
#[must_use]
pub fn observation_at(samples: &[HourSample], at: DateTime<Utc>) -> Option<WeatherObservation> {
    let wanted = at
        .with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))?;
    samples
        .iter()
        .find(|s| s.time == wanted)
        .map(|s| WeatherObservation::new(s.temperature_c, condition_from_code(s.weather_code)))
}

/// Convert a WMO weather code to a human-readable condition label.
/// Codes outside the known set yield a generic label, never an error.
#[must_use]
pub fn condition_from_code(code: u16) -> String {
    let label = match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        other => return format!("condition (code {other})"),
    };
    label.to_string()
}

/// Open-Meteo forecast API client
pub struct OpenMeteoWeather {
    client: Client,
    base_url: String,
}

impl OpenMeteoWeather {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_seconds)))
            .user_agent("routecast/0.1.0")
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoWeather {
    async fn hourly_forecast(
        &self,
        coordinate: Coordinate,
        date: NaiveDate,
    ) -> Result<Vec<HourSample>> {
        let url = format!(
            "{}/forecast?latitude={}&longitude={}&hourly=temperature_2m,weathercode&timezone=UTC&start_date={}&end_date={}",
            self.base_url,
            coordinate.latitude,
            coordinate.longitude,
            date.format("%Y-%m-%d"),
            date.format("%Y-%m-%d"),
        );

        let response = self.client.get(url).send().await?;
        let response: openmeteo::ForecastResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse Open-Meteo forecast response")?;

        Ok(response.into_samples())
    }
}

/// Open-Meteo API response structures and conversion utilities
mod openmeteo {
    use super::HourSample;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub hourly: Option<HourlyData>,
    }

    #[derive(Debug, Deserialize)]
    pub struct HourlyData {
        pub time: Vec<String>,
        #[serde(rename = "temperature_2m")]
        pub temperature: Option<Vec<f32>>,
        #[serde(rename = "weathercode")]
        pub weather_code: Option<Vec<u16>>,
    }

    impl ForecastResponse {
        /// Flatten the column-oriented payload into per-hour samples.
        /// Hours with an unparsable time or a missing temperature are dropped.
        pub fn into_samples(self) -> Vec<HourSample> {
            let Some(hourly) = self.hourly else {
                return Vec::new();
            };

            let mut samples = Vec::with_capacity(hourly.time.len());
            for (i, raw_time) in hourly.time.iter().enumerate() {
                let Ok(time) =
                    chrono::NaiveDateTime::parse_from_str(raw_time, "%Y-%m-%dT%H:%M")
                else {
                    continue;
                };

                let Some(temperature_c) = hourly
                    .temperature
                    .as_ref()
                    .and_then(|temps| temps.get(i))
                    .copied()
                else {
                    continue;
                };

                let weather_code = hourly
                    .weather_code
                    .as_ref()
                    .and_then(|codes| codes.get(i))
                    .copied()
                    .unwrap_or(0);

                samples.push(HourSample {
                    time: time.and_utc(),
                    temperature_c,
                    weather_code,
                });
            }
            samples
        }
    }
}
