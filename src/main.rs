//! Thin process bootstrap: load configuration, wire the forecast
//! service and run one request from the command line. The HTTP layer
//! lives outside this crate.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use routecast::{ForecastService, RoutecastConfig, TripRequest};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = RoutecastConfig::load()?;
    init_tracing(&config);

    let mut args = std::env::args().skip(1);
    let origin = args
        .next()
        .ok_or(anyhow!("Usage: routecast <origin> <destination> [departure RFC3339]"))?;
    let destination = args
        .next()
        .ok_or(anyhow!("Usage: routecast <origin> <destination> [departure RFC3339]"))?;
    let departure = args
        .next()
        .map(|raw| {
            raw.parse::<DateTime<Utc>>()
                .with_context(|| format!("Invalid departure time '{raw}', expected RFC3339"))
        })
        .transpose()?;

    let service = ForecastService::from_config(config)?;
    let request = TripRequest::new(origin, destination, departure);

    match service.compute_forecast(request).await {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e.user_message());
            Err(e.into())
        }
    }
}

fn init_tracing(config: &RoutecastConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));

    if config.logging.format == "json" {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
