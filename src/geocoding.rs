//! Forward and reverse geocoding collaborator.
//!
//! Forward lookups use the Open-Meteo geocoding API (no API key
//! required); reverse lookups use a Nominatim instance. Nominatim is a
//! shared public service with a strict rate limit, so callers that
//! reverse-geocode in a loop interpose a delay between calls (see the
//! checkpoint interpolator).

use crate::config::GeocodingConfig;
use crate::models::Coordinate;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Place-text to coordinate resolution and back
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve free-form place text to a coordinate. `None` means the
    /// service answered but found nothing.
    async fn forward(&self, place: &str) -> Result<Option<Coordinate>>;

    /// Resolve a coordinate to a human-readable place name.
    async fn reverse(&self, coordinate: Coordinate) -> Result<Option<String>>;
}

/// Production geocoder: Open-Meteo for forward, Nominatim for reverse
pub struct HttpGeocoder {
    client: Client,
    base_url: String,
    nominatim_base_url: String,
}

impl HttpGeocoder {
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_seconds)))
            .user_agent("routecast/0.1.0")
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            nominatim_base_url: config.nominatim_base_url.clone(),
        })
    }
}

#[async_trait]
impl Geocoder for HttpGeocoder {
    async fn forward(&self, place: &str) -> Result<Option<Coordinate>> {
        debug!("Geocoding place text: {}", place);
        let url = format!(
            "{}/search?name={}&count=1&language=en&format=json",
            self.base_url,
            urlencoding::encode(place)
        );

        let response = self.client.get(url).send().await?;
        let response: api::GeocodingResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse geocoding response")?;

        let coordinate = response
            .results
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(|hit| Coordinate::new(hit.latitude, hit.longitude));

        if let Some(found) = coordinate {
            debug!("Resolved '{}' to ({})", place, found);
        }
        Ok(coordinate)
    }

    async fn reverse(&self, coordinate: Coordinate) -> Result<Option<String>> {
        debug!("Reverse geocoding {}", coordinate);
        let url = format!(
            "{}/reverse?lat={}&lon={}&format=jsonv2&zoom=10",
            self.nominatim_base_url, coordinate.latitude, coordinate.longitude
        );

        let response = self.client.get(url).send().await?;
        let response: api::ReverseResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse reverse geocoding response")?;

        Ok(response.place_name())
    }
}

/// Upstream response structures
mod api {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct GeocodingResponse {
        pub results: Option<Vec<GeocodingHit>>,
    }

    #[derive(Debug, Deserialize)]
    pub struct GeocodingHit {
        pub latitude: f64,
        pub longitude: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct ReverseResponse {
        pub name: Option<String>,
        pub display_name: Option<String>,
    }

    impl ReverseResponse {
        /// Prefer the short name; fall back to the full display name.
        pub fn place_name(self) -> Option<String> {
            self.name
                .filter(|n| !n.is_empty())
                .or(self.display_name)
                .filter(|n| !n.is_empty())
        }
    }
}
