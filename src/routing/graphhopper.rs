//! GraphHopper routing adapter, gated on an API key.

use super::{RoutingProvider, path_from_lonlat};
use crate::config::RoutingConfig;
use crate::models::{Coordinate, RouteResult};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub struct GraphHopperProvider {
    client: Client,
    api_key: Option<String>,
}

impl GraphHopperProvider {
    pub fn new(config: &RoutingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_seconds)))
            .user_agent("routecast/0.1.0")
            .build()?;
        Ok(Self {
            client,
            api_key: config
                .graphhopper_api_key
                .clone()
                .filter(|k| !k.is_empty()),
        })
    }
}

#[async_trait]
impl RoutingProvider for GraphHopperProvider {
    fn name(&self) -> &'static str {
        "graphhopper"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn route(&self, origin: Coordinate, destination: Coordinate) -> Result<RouteResult> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(anyhow!("GraphHopper API key not configured"))?;
        let url = format!(
            "https://graphhopper.com/api/1/route?point={},{}&point={},{}&profile=car&points_encoded=false&key={}",
            origin.latitude,
            origin.longitude,
            destination.latitude,
            destination.longitude,
            api_key,
        );

        let response = self.client.get(url).send().await?;
        let response: ApiResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse GraphHopper response")?;

        let path = response
            .paths
            .into_iter()
            .next()
            .ok_or(anyhow!("No paths in GraphHopper response"))?;

        Ok(RouteResult::new(
            path_from_lonlat(&path.points.coordinates),
            path.distance,
            // GraphHopper reports travel time in milliseconds.
            path.time as f64 / 1000.0,
            self.name(),
        ))
    }
}

#[derive(Debug, serde::Deserialize)]
struct ApiResponse {
    #[serde(default)]
    paths: Vec<PathResponse>,
}

#[derive(Debug, serde::Deserialize)]
struct PathResponse {
    distance: f64,
    time: u64,
    points: Points,
}

#[derive(Debug, serde::Deserialize)]
struct Points {
    coordinates: Vec<[f64; 2]>,
}
