//! TTL-bounded forecast cache backed by an embedded fjall keyspace.
//!
//! Entries are immutable once written and lookups are read-only, so
//! no locking is needed beyond what the store provides. A write for an
//! existing key replaces the prior entry, which preserves the
//! newest-wins lookup contract. Expired entries are treated as misses
//! and removed on read.

use crate::models::{ForecastResult, NormalizedKey};
use anyhow::{Result, anyhow};
use fjall::Keyspace;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::task;

#[derive(Serialize, Deserialize)]
struct StoredEntry {
    value: ForecastResult,
    expires_at: u64, // Unix timestamp (seconds)
}

pub struct ForecastCache {
    store: Keyspace,
    ttl: Duration,
}

fn get_from_store(store: Keyspace, key: Vec<u8>) -> anyhow::Result<Option<Vec<u8>>> {
    Ok(store.get(key)?.map(|v| v.to_vec()))
}

impl ForecastCache {
    /// Open (or create) the cache database at the given path.
    pub fn open(path: impl AsRef<Path>, ttl: Duration) -> Result<Self> {
        let db = fjall::Database::builder(&path).open()?;
        let items = db.keyspace("forecasts", fjall::KeyspaceCreateOptions::default)?;
        Ok(ForecastCache { store: items, ttl })
    }

    /// Stores a forecast under its normalized key with the configured TTL.
    #[tracing::instrument(name = "put_cache", level = "debug", skip(self, value))]
    pub async fn put(&self, key: &NormalizedKey, value: &ForecastResult) -> Result<()> {
        let store = self.store.clone();
        let key = key.cache_key().into_bytes();
        let expires_at = SystemTime::now()
            .checked_add(self.ttl)
            .ok_or(anyhow!("TTL overflow"))?
            .duration_since(UNIX_EPOCH)?
            .as_secs();
        let entry = StoredEntry {
            value: value.clone(),
            expires_at,
        };
        let bytes = postcard::to_stdvec(&entry)?;

        let _ = task::spawn_blocking(move || store.insert(key, bytes)).await?;
        Ok(())
    }

    /// Retrieves a forecast if it exists and has not expired.
    /// Returns `None` for cache misses or expired entries.
    #[tracing::instrument(name = "query_cache", level = "debug", skip(self))]
    pub async fn get(&self, key: &NormalizedKey) -> Result<Option<ForecastResult>> {
        let store = self.store.clone();
        let key_bytes = key.cache_key().into_bytes();

        let maybe_bytes: Option<Vec<u8>> =
            task::spawn_blocking(move || get_from_store(store, key_bytes)).await??;

        if let Some(bytes) = maybe_bytes {
            let entry: StoredEntry = postcard::from_bytes(&bytes)?;
            let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

            if now < entry.expires_at {
                tracing::debug!("Key found and still fresh");
                Ok(Some(entry.value))
            } else {
                tracing::debug!("Key found but expired");
                self.remove(key).await?;
                Ok(None)
            }
        } else {
            tracing::debug!("Key not found");
            Ok(None)
        }
    }

    /// Manually removes a key from the cache.
    pub async fn remove(&self, key: &NormalizedKey) -> Result<()> {
        let key = key.cache_key().into_bytes();
        let store = self.store.clone();
        let _ = task::spawn_blocking(move || store.remove(key)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinate, TripRequest};

    fn temp_cache_dir(label: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "routecast-cache-test-{label}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    fn sample_key(origin: &str) -> NormalizedKey {
        NormalizedKey::from_request(&TripRequest::new(
            origin,
            "são paulo",
            "2024-06-01T08:00:00Z".parse().ok(),
        ))
    }

    fn sample_result() -> ForecastResult {
        ForecastResult {
            route_geometry: vec![Coordinate::new(-22.9, -43.2)],
            checkpoints: Vec::new(),
            provider: "osrm".to_string(),
            total_distance_meters: 430_000.0,
            total_duration_seconds: 21_600.0,
        }
    }

    #[tokio::test]
    async fn test_put_then_get_roundtrip() {
        let cache = ForecastCache::open(
            temp_cache_dir("roundtrip"),
            Duration::from_secs(3600),
        )
        .unwrap();
        let key = sample_key("rio de janeiro");

        cache.put(&key, &sample_result()).await.unwrap();
        let fetched = cache.get(&key).await.unwrap().unwrap();
        assert_eq!(fetched.provider, "osrm");
        assert_eq!(fetched.total_distance_meters, 430_000.0);
    }

    #[tokio::test]
    async fn test_missing_key_is_a_miss() {
        let cache =
            ForecastCache::open(temp_cache_dir("miss"), Duration::from_secs(3600)).unwrap();
        let fetched = cache.get(&sample_key("nowhere")).await.unwrap();
        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn test_expired_entry_is_a_miss() {
        // Zero TTL: the entry is already at its expiry the moment it lands.
        let cache =
            ForecastCache::open(temp_cache_dir("expired"), Duration::from_secs(0)).unwrap();
        let key = sample_key("rio de janeiro");

        cache.put(&key, &sample_result()).await.unwrap();
        let fetched = cache.get(&key).await.unwrap();
        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn test_newer_write_wins() {
        let cache =
            ForecastCache::open(temp_cache_dir("newest"), Duration::from_secs(3600)).unwrap();
        let key = sample_key("rio de janeiro");

        cache.put(&key, &sample_result()).await.unwrap();
        let mut newer = sample_result();
        newer.provider = "graphhopper".to_string();
        cache.put(&key, &newer).await.unwrap();

        let fetched = cache.get(&key).await.unwrap().unwrap();
        assert_eq!(fetched.provider, "graphhopper");
    }
}
