//! OSRM routing adapter.
//!
//! Talks to the public OSRM demo server by default. No credential is
//! required, which makes this the first provider in the cascade.

use super::{RoutingProvider, path_from_lonlat};
use crate::config::RoutingConfig;
use crate::models::{Coordinate, RouteResult};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub struct OsrmProvider {
    client: Client,
    base_url: String,
}

impl OsrmProvider {
    pub fn new(config: &RoutingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_seconds)))
            .user_agent("routecast/0.1.0")
            .build()?;
        Ok(Self {
            client,
            base_url: config.osrm_base_url.clone(),
        })
    }
}

#[async_trait]
impl RoutingProvider for OsrmProvider {
    fn name(&self) -> &'static str {
        "osrm"
    }

    async fn route(&self, origin: Coordinate, destination: Coordinate) -> Result<RouteResult> {
        // OSRM takes lon,lat pairs in the path segment.
        let url = format!(
            "{}/route/v1/driving/{},{};{},{}?overview=full&geometries=geojson",
            self.base_url,
            origin.longitude,
            origin.latitude,
            destination.longitude,
            destination.latitude,
        );

        let response = self.client.get(url).send().await?;
        let response: ApiResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse OSRM response")?;

        if response.code != "Ok" {
            return Err(anyhow!("OSRM returned status '{}'", response.code));
        }

        let route = response
            .routes
            .into_iter()
            .next()
            .ok_or(anyhow!("No routes in OSRM response"))?;

        Ok(RouteResult::new(
            path_from_lonlat(&route.geometry.coordinates),
            route.distance,
            route.duration,
            self.name(),
        ))
    }
}

#[derive(Debug, serde::Deserialize)]
struct ApiResponse {
    code: String,
    #[serde(default)]
    routes: Vec<RouteEntry>,
}

#[derive(Debug, serde::Deserialize)]
struct RouteEntry {
    distance: f64,
    duration: f64,
    geometry: Geometry,
}

#[derive(Debug, serde::Deserialize)]
struct Geometry {
    coordinates: Vec<[f64; 2]>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_successful_response() {
        let raw = r#"{
            "code": "Ok",
            "routes": [{
                "distance": 430000.0,
                "duration": 21600.0,
                "geometry": {
                    "coordinates": [[-43.1729, -22.9068], [-46.6333, -23.5505]]
                }
            }]
        }"#;
        let parsed: ApiResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.code, "Ok");
        assert_eq!(parsed.routes[0].distance, 430000.0);
        assert_eq!(parsed.routes[0].geometry.coordinates.len(), 2);
    }

    #[test]
    fn test_parse_error_response_without_routes() {
        let raw = r#"{"code": "NoRoute"}"#;
        let parsed: ApiResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.code, "NoRoute");
        assert!(parsed.routes.is_empty());
    }
}
