//! Checkpoint and route forecast models

use super::{Coordinate, WeatherObservation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A sampled point along the route, tagged with the estimated arrival
/// time and the predicted weather at that time.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Checkpoint {
    /// Estimated arrival time at this point
    pub timestamp: DateTime<Utc>,
    /// Position on the route geometry
    pub coordinate: Coordinate,
    /// Whole kilometers traveled from the origin
    pub distance_from_start_km: u64,
    /// Reverse-geocoded place name, or a coordinate placeholder
    pub place_name: String,
    /// Predicted weather at arrival time
    pub weather: WeatherObservation,
}

/// The assembled forecast for one trip.
///
/// This is both the payload returned to callers and the value
/// serialized into the cache; its field set is the storage contract.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ForecastResult {
    /// Full route geometry, start to end
    pub route_geometry: Vec<Coordinate>,
    /// Checkpoints ordered by increasing timestamp; never empty
    pub checkpoints: Vec<Checkpoint>,
    /// Routing provider that produced the route
    pub provider: String,
    /// Total driving distance in meters
    pub total_distance_meters: f64,
    /// Total driving duration in seconds
    pub total_duration_seconds: f64,
}

impl ForecastResult {
    /// Estimated arrival time, taken from the last checkpoint.
    #[must_use]
    pub fn arrival_time(&self) -> Option<DateTime<Utc>> {
        self.checkpoints.last().map(|c| c.timestamp)
    }
}
