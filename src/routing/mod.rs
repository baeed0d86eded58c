//! Routing providers and the resolution cascade.
//!
//! Each provider adapter translates one upstream routing API into the
//! common [`RouteResult`] shape. The cascade tries providers in
//! priority order and returns the first success; adding, removing or
//! reordering providers is a configuration change, not a code change.

use crate::RoutecastError;
use crate::config::RoutingConfig;
use crate::models::{Coordinate, RouteResult};
use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

pub mod graphhopper;
pub mod openrouteservice;
pub mod osrm;

pub use graphhopper::GraphHopperProvider;
pub use openrouteservice::OpenRouteServiceProvider;
pub use osrm::OsrmProvider;

/// A single routing backend able to resolve a driving route
#[async_trait]
pub trait RoutingProvider: Send + Sync {
    /// Stable provider identity, recorded on successful routes
    fn name(&self) -> &'static str;

    /// Whether this provider has the credentials it needs. An
    /// unconfigured provider is skipped by the cascade without
    /// counting as a network failure.
    fn is_configured(&self) -> bool {
        true
    }

    /// One routing attempt; no retries within a provider.
    async fn route(&self, origin: Coordinate, destination: Coordinate) -> Result<RouteResult>;
}

/// Build the default provider list in cascade priority order:
/// the public OSRM instance first, then the key-gated providers.
pub fn default_providers(config: &RoutingConfig) -> Result<Vec<Box<dyn RoutingProvider>>> {
    Ok(vec![
        Box::new(OsrmProvider::new(config)?),
        Box::new(GraphHopperProvider::new(config)?),
        Box::new(OpenRouteServiceProvider::new(config)?),
    ])
}

/// Try providers in order, returning the first successful route.
///
/// Provider failures are logged and swallowed; only exhausting the
/// whole list is an error.
pub async fn resolve_route(
    providers: &[Box<dyn RoutingProvider>],
    origin: Coordinate,
    destination: Coordinate,
) -> std::result::Result<RouteResult, RoutecastError> {
    for provider in providers {
        if !provider.is_configured() {
            debug!(provider = provider.name(), "Provider not configured, skipping");
            continue;
        }

        match provider.route(origin, destination).await {
            Ok(route) if route.path.is_empty() => {
                warn!(
                    provider = provider.name(),
                    "Provider returned a route without geometry, trying next"
                );
            }
            Ok(route) => {
                debug!(
                    provider = provider.name(),
                    distance_m = route.total_distance_meters,
                    duration_s = route.total_duration_seconds,
                    "Route resolved"
                );
                return Ok(route);
            }
            Err(e) => {
                warn!(provider = provider.name(), error = %e, "Provider failed, trying next");
            }
        }
    }

    Err(RoutecastError::route_unavailable(
        origin.to_string(),
        destination.to_string(),
    ))
}

/// Convert an ordered `[longitude, latitude]` pair sequence, the
/// geometry encoding shared by all upstream APIs, into coordinates.
#[must_use]
pub fn path_from_lonlat(pairs: &[[f64; 2]]) -> Vec<Coordinate> {
    pairs
        .iter()
        .map(|[lon, lat]| Coordinate::new(*lat, *lon))
        .collect()
}
