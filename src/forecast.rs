//! Forecast orchestration: the one entry point composing the cache,
//! geocoder, routing cascade and checkpoint interpolator into a single
//! request/response cycle.
//!
//! The pipeline is strictly sequential by design; see the checkpoint
//! interpolator for the rate-limit reasoning. Concurrent requests for
//! the same key during a miss are not deduplicated: each proceeds
//! independently and the cache write is last-one-wins.

use crate::cache::ForecastCache;
use crate::config::RoutecastConfig;
use crate::geocoding::{Geocoder, HttpGeocoder};
use crate::models::{Coordinate, ForecastResult, NormalizedKey, TripRequest};
use crate::routing::{self, RoutingProvider};
use crate::weather::{OpenMeteoWeather, WeatherProvider};
use crate::{CheckpointInterpolator, RoutecastError};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct ForecastService {
    config: RoutecastConfig,
    cache: ForecastCache,
    geocoder: Arc<dyn Geocoder>,
    weather: Arc<dyn WeatherProvider>,
    providers: Vec<Box<dyn RoutingProvider>>,
}

impl ForecastService {
    /// Wire up the production collaborators from configuration.
    pub fn from_config(config: RoutecastConfig) -> anyhow::Result<Self> {
        let cache = ForecastCache::open(
            config.cache_path(),
            Duration::from_secs(config.cache.ttl_seconds),
        )?;
        let geocoder: Arc<dyn Geocoder> = Arc::new(HttpGeocoder::new(&config.geocoding)?);
        let weather: Arc<dyn WeatherProvider> = Arc::new(OpenMeteoWeather::new(&config.weather)?);
        let providers = routing::default_providers(&config.routing)?;
        Ok(Self::new(config, cache, geocoder, weather, providers))
    }

    /// Assemble a service from explicit collaborators.
    #[must_use]
    pub fn new(
        config: RoutecastConfig,
        cache: ForecastCache,
        geocoder: Arc<dyn Geocoder>,
        weather: Arc<dyn WeatherProvider>,
        providers: Vec<Box<dyn RoutingProvider>>,
    ) -> Self {
        Self {
            config,
            cache,
            geocoder,
            weather,
            providers,
        }
    }

    /// Compute the along-route weather forecast for a trip request.
    ///
    /// # Errors
    /// Returns [`RoutecastError::LocationNotFound`] when either
    /// endpoint fails to geocode and [`RoutecastError::RouteUnavailable`]
    /// when every routing provider fails. Per-checkpoint enrichment
    /// failures and cache write failures degrade instead of erroring.
    #[tracing::instrument(name = "compute_forecast", skip(self))]
    pub async fn compute_forecast(
        &self,
        request: TripRequest,
    ) -> Result<ForecastResult, RoutecastError> {
        // Resolve "leave now" once so the cache key and checkpoint
        // timestamps agree on the departure time.
        let departure = request.departure.unwrap_or_else(Utc::now);
        let resolved = TripRequest {
            departure: Some(departure),
            ..request.clone()
        };
        let key = NormalizedKey::from_request(&resolved);

        match self.cache.get(&key).await {
            Ok(Some(cached)) => {
                info!(key = %key.cache_key(), "Serving forecast from cache");
                return Ok(cached);
            }
            Ok(None) => debug!(key = %key.cache_key(), "Cache miss"),
            Err(e) => warn!(error = %e, "Cache lookup failed, treating as miss"),
        }

        let origin = self.geocode_endpoint(&request.origin).await?;
        let destination = self.geocode_endpoint(&request.destination).await?;

        let route = routing::resolve_route(&self.providers, origin, destination).await?;
        info!(
            provider = %route.provider,
            distance_m = route.total_distance_meters,
            duration_s = route.total_duration_seconds,
            "Route resolved"
        );

        let interpolator = CheckpointInterpolator::new(
            self.geocoder.as_ref(),
            self.weather.as_ref(),
            self.config.checkpoint.interval_seconds,
            Duration::from_millis(self.config.geocoding.reverse_delay_ms),
        );
        let checkpoints = interpolator.interpolate(&route, departure).await;

        let result = ForecastResult {
            route_geometry: route.path,
            checkpoints,
            provider: route.provider,
            total_distance_meters: route.total_distance_meters,
            total_duration_seconds: route.total_duration_seconds,
        };

        // Caching is an optimization; a failed write never fails the request.
        if let Err(e) = self.cache.put(&key, &result).await {
            warn!(error = %e, "Failed to persist forecast to cache");
        }

        Ok(result)
    }

    async fn geocode_endpoint(&self, place: &str) -> Result<Coordinate, RoutecastError> {
        match self.geocoder.forward(place).await {
            Ok(Some(coordinate)) => Ok(coordinate),
            Ok(None) => Err(RoutecastError::location_not_found(place)),
            Err(e) => Err(RoutecastError::api(format!(
                "Geocoding '{place}' failed: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RouteResult;
    use crate::weather::HourSample;
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MapGeocoder;

    #[async_trait]
    impl Geocoder for MapGeocoder {
        async fn forward(&self, place: &str) -> Result<Option<Coordinate>> {
            match place.trim().to_lowercase().as_str() {
                "rio de janeiro" => Ok(Some(Coordinate::new(-22.9068, -43.1729))),
                "são paulo" => Ok(Some(Coordinate::new(-23.5505, -46.6333))),
                _ => Ok(None),
            }
        }

        async fn reverse(&self, coordinate: Coordinate) -> Result<Option<String>> {
            Ok(Some(format!("Near {:.1}", coordinate.latitude)))
        }
    }

    struct FlatWeather;

    #[async_trait]
    impl WeatherProvider for FlatWeather {
        async fn hourly_forecast(
            &self,
            _coordinate: Coordinate,
            date: NaiveDate,
        ) -> Result<Vec<HourSample>> {
            Ok((0..24)
                .map(|hour| HourSample {
                    time: date.and_hms_opt(hour, 0, 0).unwrap().and_utc(),
                    temperature_c: 20.0,
                    weather_code: 0,
                })
                .collect())
        }
    }

    struct CountingProvider {
        name: &'static str,
        succeed: bool,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl RoutingProvider for CountingProvider {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn route(
            &self,
            origin: Coordinate,
            destination: Coordinate,
        ) -> Result<RouteResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.succeed {
                anyhow::bail!("provider down");
            }
            Ok(RouteResult::new(
                vec![origin, destination],
                430_000.0,
                21_600.0,
                self.name,
            ))
        }
    }

    fn service_with(
        label: &str,
        providers: Vec<Box<dyn RoutingProvider>>,
    ) -> ForecastService {
        let mut config = RoutecastConfig::default();
        config.geocoding.reverse_delay_ms = 0;
        let dir = std::env::temp_dir().join(format!(
            "routecast-service-test-{label}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        let cache = ForecastCache::open(dir, Duration::from_secs(3600)).unwrap();
        ForecastService::new(
            config,
            cache,
            Arc::new(MapGeocoder),
            Arc::new(FlatWeather),
            providers,
        )
    }

    fn trip() -> TripRequest {
        TripRequest::new(
            "Rio de Janeiro",
            "São Paulo",
            "2024-06-01T08:00:00Z".parse().ok(),
        )
    }

    #[tokio::test]
    async fn test_full_pipeline_assembles_forecast() {
        let calls = Arc::new(AtomicUsize::new(0));
        let service = service_with(
            "pipeline",
            vec![Box::new(CountingProvider {
                name: "osrm",
                succeed: true,
                calls: Arc::clone(&calls),
            })],
        );

        let result = service.compute_forecast(trip()).await.unwrap();
        assert_eq!(result.provider, "osrm");
        assert_eq!(result.checkpoints.len(), 7);
        assert_eq!(result.route_geometry.len(), 2);
        assert_eq!(result.total_distance_meters, 430_000.0);
        assert_eq!(
            result.arrival_time(),
            "2024-06-01T14:00:00Z".parse().ok()
        );
    }

    #[tokio::test]
    async fn test_repeated_request_is_served_from_cache() {
        let calls = Arc::new(AtomicUsize::new(0));
        let service = service_with(
            "cached",
            vec![Box::new(CountingProvider {
                name: "osrm",
                succeed: true,
                calls: Arc::clone(&calls),
            })],
        );

        let first = service.compute_forecast(trip()).await.unwrap();
        // Different surface text, same normalized key.
        let second = service
            .compute_forecast(TripRequest::new(
                "  RIO DE JANEIRO ",
                "são paulo",
                "2024-06-01T08:45:00Z".parse().ok(),
            ))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.checkpoints.len(), second.checkpoints.len());
        assert_eq!(first.provider, second.provider);
    }

    #[tokio::test]
    async fn test_unknown_origin_is_location_not_found() {
        let service = service_with(
            "unknown-origin",
            vec![Box::new(CountingProvider {
                name: "osrm",
                succeed: true,
                calls: Arc::new(AtomicUsize::new(0)),
            })],
        );

        let err = service
            .compute_forecast(TripRequest::new("Atlantis", "São Paulo", None))
            .await
            .unwrap_err();
        assert!(matches!(err, RoutecastError::LocationNotFound { .. }));
        assert!(err.to_string().contains("Atlantis"));
    }

    #[tokio::test]
    async fn test_provider_exhaustion_is_route_unavailable() {
        let service = service_with(
            "exhausted",
            vec![
                Box::new(CountingProvider {
                    name: "first",
                    succeed: false,
                    calls: Arc::new(AtomicUsize::new(0)),
                }),
                Box::new(CountingProvider {
                    name: "second",
                    succeed: false,
                    calls: Arc::new(AtomicUsize::new(0)),
                }),
            ],
        );

        let err = service.compute_forecast(trip()).await.unwrap_err();
        assert!(matches!(err, RoutecastError::RouteUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_fallback_provider_identity_is_recorded() {
        let service = service_with(
            "fallback",
            vec![
                Box::new(CountingProvider {
                    name: "first",
                    succeed: false,
                    calls: Arc::new(AtomicUsize::new(0)),
                }),
                Box::new(CountingProvider {
                    name: "second",
                    succeed: true,
                    calls: Arc::new(AtomicUsize::new(0)),
                }),
            ],
        );

        let result = service.compute_forecast(trip()).await.unwrap();
        assert_eq!(result.provider, "second");
    }
}
