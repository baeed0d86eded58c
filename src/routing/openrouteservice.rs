//! OpenRouteService routing adapter, gated on an API key.

use super::{RoutingProvider, path_from_lonlat};
use crate::config::RoutingConfig;
use crate::models::{Coordinate, RouteResult};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub struct OpenRouteServiceProvider {
    client: Client,
    api_key: Option<String>,
}

impl OpenRouteServiceProvider {
    pub fn new(config: &RoutingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_seconds)))
            .user_agent("routecast/0.1.0")
            .build()?;
        Ok(Self {
            client,
            api_key: config
                .openrouteservice_api_key
                .clone()
                .filter(|k| !k.is_empty()),
        })
    }
}

#[async_trait]
impl RoutingProvider for OpenRouteServiceProvider {
    fn name(&self) -> &'static str {
        "openrouteservice"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn route(&self, origin: Coordinate, destination: Coordinate) -> Result<RouteResult> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(anyhow!("OpenRouteService API key not configured"))?;
        let url = format!(
            "https://api.openrouteservice.org/v2/directions/driving-car?api_key={}&start={},{}&end={},{}",
            api_key,
            origin.longitude,
            origin.latitude,
            destination.longitude,
            destination.latitude,
        );

        let response = self.client.get(url).send().await?;
        let response: ApiResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse OpenRouteService response")?;

        let feature = response
            .features
            .into_iter()
            .next()
            .ok_or(anyhow!("No features in OpenRouteService response"))?;

        Ok(RouteResult::new(
            path_from_lonlat(&feature.geometry.coordinates),
            feature.properties.summary.distance,
            feature.properties.summary.duration,
            self.name(),
        ))
    }
}

#[derive(Debug, serde::Deserialize)]
struct ApiResponse {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, serde::Deserialize)]
struct Feature {
    properties: Properties,
    geometry: Geometry,
}

#[derive(Debug, serde::Deserialize)]
struct Properties {
    summary: Summary,
}

#[derive(Debug, serde::Deserialize)]
struct Summary {
    distance: f64,
    duration: f64,
}

#[derive(Debug, serde::Deserialize)]
struct Geometry {
    coordinates: Vec<[f64; 2]>,
}
