//! Trip requests, coordinates and the normalized cache identity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Geographic coordinate in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// An incoming trip forecast request, created per call
#[derive(Debug, Clone)]
pub struct TripRequest {
    /// Free-text origin, as typed by the traveler
    pub origin: String,
    /// Free-text destination
    pub destination: String,
    /// Departure time; absent means "now"
    pub departure: Option<DateTime<Utc>>,
}

impl TripRequest {
    #[must_use]
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        departure: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            departure,
        }
    }
}

/// Cache identity for a trip request.
///
/// Two requests map to the same key iff their trimmed, lowercased
/// origin and destination and their departure hour are identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedKey {
    pub origin: String,
    pub destination: String,
    /// Departure timestamp truncated to hour granularity
    pub hour_bucket: String,
}

impl NormalizedKey {
    /// Normalize a trip request into its cache identity.
    ///
    /// A missing departure time resolves to the current time at call
    /// time, so near-simultaneous "leave now" requests for the same
    /// endpoints share a key within the hour.
    #[must_use]
    pub fn from_request(request: &TripRequest) -> Self {
        let departure = request.departure.unwrap_or_else(Utc::now);
        Self {
            origin: normalize_place(&request.origin),
            destination: normalize_place(&request.destination),
            hour_bucket: departure.format("%Y-%m-%dT%H").to_string(),
        }
    }

    /// Flat string form used as the cache store key.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!("{}|{}|{}", self.origin, self.destination, self.hour_bucket)
    }
}

fn normalize_place(text: &str) -> String {
    text.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_at(origin: &str, destination: &str, departure: &str) -> TripRequest {
        let when = departure.parse::<DateTime<Utc>>().ok();
        TripRequest::new(origin, destination, when)
    }

    #[test]
    fn test_normalization_is_case_and_whitespace_insensitive() {
        let a = NormalizedKey::from_request(&request_at(
            "  São Paulo ",
            "Rio de Janeiro",
            "2024-06-01T08:15:00Z",
        ));
        let b = NormalizedKey::from_request(&request_at(
            "são paulo",
            "RIO DE JANEIRO",
            "2024-06-01T08:59:59Z",
        ));
        assert_eq!(a, b);
        assert_eq!(a.origin, "são paulo");
    }

    #[test]
    fn test_hour_bucket_truncates_minutes_and_seconds() {
        let key = NormalizedKey::from_request(&request_at("a", "b", "2024-06-01T08:45:33Z"));
        assert_eq!(key.hour_bucket, "2024-06-01T08");
    }

    #[test]
    fn test_changing_any_component_changes_the_key() {
        let key =
            NormalizedKey::from_request(&request_at("lyon", "paris", "2024-06-01T08:00:00Z"));

        let other_origin = NormalizedKey::from_request(&request_at(
            "marseille",
            "paris",
            "2024-06-01T08:00:00Z",
        ));
        let other_destination =
            NormalizedKey::from_request(&request_at("lyon", "lille", "2024-06-01T08:00:00Z"));
        let other_hour =
            NormalizedKey::from_request(&request_at("lyon", "paris", "2024-06-01T09:00:00Z"));

        assert_ne!(key, other_origin);
        assert_ne!(key, other_destination);
        assert_ne!(key, other_hour);
    }

    #[test]
    fn test_missing_departure_uses_current_hour() {
        let before = Utc::now().format("%Y-%m-%dT%H").to_string();
        let key = NormalizedKey::from_request(&TripRequest::new("a", "b", None));
        let after = Utc::now().format("%Y-%m-%dT%H").to_string();
        // The call could straddle an hour boundary; accept either side.
        assert!(key.hour_bucket == before || key.hour_bucket == after);
    }

    #[test]
    fn test_cache_key_contains_all_components() {
        let key =
            NormalizedKey::from_request(&request_at("lyon", "paris", "2024-06-01T08:00:00Z"));
        assert_eq!(key.cache_key(), "lyon|paris|2024-06-01T08");
    }
}
