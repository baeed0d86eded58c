//! Resolved route model shared by all routing providers

use super::Coordinate;
use serde::{Deserialize, Serialize};

/// A driving route as reported by one routing provider.
///
/// All providers normalize into this shape: an ordered start-to-end
/// geometry plus totals. The path has at least one point whenever a
/// provider reports success.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RouteResult {
    /// Route geometry, start to end
    pub path: Vec<Coordinate>,
    /// Total driving distance in meters
    pub total_distance_meters: f64,
    /// Total driving duration in seconds
    pub total_duration_seconds: f64,
    /// Identity of the provider that produced this route
    pub provider: String,
}

impl RouteResult {
    #[must_use]
    pub fn new(
        path: Vec<Coordinate>,
        total_distance_meters: f64,
        total_duration_seconds: f64,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            path,
            total_distance_meters,
            total_duration_seconds,
            provider: provider.into(),
        }
    }
}
