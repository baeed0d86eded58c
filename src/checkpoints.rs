//! Checkpoint interpolation along a resolved route.
//!
//! Walks the route's duration axis at a fixed interval and maps each
//! time offset onto the route geometry, producing checkpoints enriched
//! with a reverse-geocoded place name and the predicted weather at the
//! estimated arrival time. Checkpoints are enriched strictly one at a
//! time: the reverse geocoder is a shared public service with a rate
//! limit, and a fixed delay before each call keeps us under it.

use crate::geocoding::Geocoder;
use crate::models::{Checkpoint, Coordinate, RouteResult, WeatherObservation};
use crate::weather::{WeatherProvider, observation_at};
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::warn;

pub struct CheckpointInterpolator<'a> {
    geocoder: &'a dyn Geocoder,
    weather: &'a dyn WeatherProvider,
    /// Seconds of travel time between checkpoints
    interval_seconds: u64,
    /// Pause before each reverse-geocode call
    reverse_delay: Duration,
}

impl<'a> CheckpointInterpolator<'a> {
    #[must_use]
    pub fn new(
        geocoder: &'a dyn Geocoder,
        weather: &'a dyn WeatherProvider,
        interval_seconds: u64,
        reverse_delay: Duration,
    ) -> Self {
        Self {
            geocoder,
            weather,
            interval_seconds,
            reverse_delay,
        }
    }

    /// Produce the ordered checkpoint sequence for a route.
    ///
    /// The first checkpoint is at offset 0 and the last lands exactly
    /// at the route's total duration. Enrichment failures degrade the
    /// individual checkpoint, never the sequence; the result is never
    /// empty.
    pub async fn interpolate(
        &self,
        route: &RouteResult,
        departure: DateTime<Utc>,
    ) -> Vec<Checkpoint> {
        let duration = route.total_duration_seconds;
        if route.path.is_empty() || duration <= 0.0 {
            return vec![self.synthetic_checkpoint(route, departure)];
        }

        let interval = self.interval_seconds as f64;
        let last_index = route.path.len() - 1;
        let mut checkpoints = Vec::new();
        let mut offset = 0.0_f64;

        loop {
            let progress = offset / duration;
            let path_index =
                ((progress * last_index as f64).floor() as usize).min(last_index);
            let coordinate = route.path[path_index];
            let timestamp =
                departure + chrono::Duration::milliseconds((offset * 1000.0).round() as i64);
            let distance_from_start_km =
                (route.total_distance_meters * progress / 1000.0).floor() as u64;

            let place_name = self.place_name_for(coordinate).await;
            let weather = self.weather_for(coordinate, timestamp).await;

            checkpoints.push(Checkpoint {
                timestamp,
                coordinate,
                distance_from_start_km,
                place_name,
                weather,
            });

            if offset >= duration {
                break;
            }
            // Clamp the final step so the last checkpoint lands exactly
            // on the route's total duration instead of overshooting.
            offset = (offset + interval).min(duration);
        }

        checkpoints
    }

    /// Single placeholder checkpoint for routes without usable
    /// geometry or duration; the response always has at least one.
    fn synthetic_checkpoint(&self, route: &RouteResult, departure: DateTime<Utc>) -> Checkpoint {
        let coordinate = route.path.first().copied().unwrap_or(Coordinate::new(0.0, 0.0));
        Checkpoint {
            timestamp: departure,
            coordinate,
            distance_from_start_km: 0,
            place_name: coordinate.to_string(),
            weather: WeatherObservation::unavailable(),
        }
    }

    async fn place_name_for(&self, coordinate: Coordinate) -> String {
        if !self.reverse_delay.is_zero() {
            tokio::time::sleep(self.reverse_delay).await;
        }
        match self.geocoder.reverse(coordinate).await {
            Ok(Some(name)) => name,
            Ok(None) => coordinate.to_string(),
            Err(e) => {
                warn!(%coordinate, error = %e, "Reverse geocoding failed, using coordinates as name");
                coordinate.to_string()
            }
        }
    }

    async fn weather_for(
        &self,
        coordinate: Coordinate,
        timestamp: DateTime<Utc>,
    ) -> WeatherObservation {
        match self
            .weather
            .hourly_forecast(coordinate, timestamp.date_naive())
            .await
        {
            Ok(samples) => observation_at(&samples, timestamp)
                .unwrap_or_else(WeatherObservation::unavailable),
            Err(e) => {
                warn!(%coordinate, error = %e, "Weather lookup failed, marking unavailable");
                WeatherObservation::unavailable()
            }
        }
    }
}
