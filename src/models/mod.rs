//! Data models for the Routecast application
//!
//! This module contains the core domain models organized by concern:
//! - Location: geographic coordinates and trip requests
//! - Route: resolved route geometry and totals
//! - Weather: per-checkpoint weather observations
//! - Forecast: the assembled route forecast returned to callers

pub mod forecast;
pub mod location;
pub mod route;
pub mod weather;

// Re-export all public types for convenient access
pub use forecast::{Checkpoint, ForecastResult};
pub use location::{Coordinate, NormalizedKey, TripRequest};
pub use route::RouteResult;
pub use weather::WeatherObservation;
