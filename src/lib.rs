//! Routecast - along-route weather forecasting
//!
//! This library turns an (origin, destination, optional departure
//! time) request into a sequence of along-route checkpoints, each
//! annotated with the predicted weather at the time the traveler is
//! expected to be there. Routes come from a cascade of routing
//! providers tried in priority order; results are cached with a
//! time-bounded key derived from the normalized request.

pub mod cache;
pub mod checkpoints;
pub mod config;
pub mod error;
pub mod forecast;
pub mod geocoding;
pub mod models;
pub mod routing;
pub mod weather;

// Re-export core types for public API
pub use cache::ForecastCache;
pub use checkpoints::CheckpointInterpolator;
pub use config::RoutecastConfig;
pub use error::RoutecastError;
pub use forecast::ForecastService;
pub use geocoding::{Geocoder, HttpGeocoder};
pub use models::{
    Checkpoint, Coordinate, ForecastResult, NormalizedKey, RouteResult, TripRequest,
    WeatherObservation,
};
pub use routing::RoutingProvider;
pub use weather::{OpenMeteoWeather, WeatherProvider, condition_from_code};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, RoutecastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
