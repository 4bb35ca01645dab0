//! Current-weather lookups cached per restaurant.
//!
//! A cached payload is served until its TTL lapses. Failed lookups are
//! never cached, and concurrent misses for the same restaurant each call
//! the provider.

use super::restaurants::RestaurantRepository;
use crate::common::{Coordinates, Error, Keys, Result, WeatherConfig};
use crate::store::KvStore;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Source of weather payloads for a coordinate pair.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self, at: Coordinates) -> Result<Value>;
}

/// OpenWeatherMap `data/2.5/weather` client
pub struct OpenWeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    units: String,
}

impl OpenWeatherClient {
    pub fn new(config: &WeatherConfig) -> Self {
        if config.api_key.is_none() {
            tracing::warn!("No weather API key configured; lookups will be rejected upstream");
        }
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone().unwrap_or_default(),
            units: config.units.clone(),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current(&self, at: Coordinates) -> Result<Value> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("units", self.units.clone()),
                ("lat", at.lat.to_string()),
                ("lon", at.lng.to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(status = status.as_u16(), "Weather lookup failed");
            return Err(Error::Upstream("Failed to fetch weather data".into()));
        }

        Ok(response.json::<Value>().await?)
    }
}

#[derive(Clone)]
pub struct WeatherCache {
    store: Arc<dyn KvStore>,
    keys: Keys,
    restaurants: RestaurantRepository,
    provider: Arc<dyn WeatherProvider>,
    ttl: Duration,
}

impl WeatherCache {
    pub fn new(
        store: Arc<dyn KvStore>,
        keys: Keys,
        restaurants: RestaurantRepository,
        provider: Arc<dyn WeatherProvider>,
        ttl: Duration,
    ) -> Self {
        Self {
            store,
            keys,
            restaurants,
            provider,
            ttl,
        }
    }

    /// Weather payload for a restaurant, from cache when fresh.
    pub async fn fetch(&self, restaurant_id: &str) -> Result<Value> {
        let key = self.keys.weather(restaurant_id);

        if let Some(cached) = self.store.get(&key).await? {
            match serde_json::from_str(&cached) {
                Ok(payload) => {
                    tracing::debug!(restaurant_id, "Cache hit");
                    return Ok(payload);
                }
                Err(e) => {
                    tracing::warn!(restaurant_id, error = %e, "Discarding unreadable cached weather");
                }
            }
        }

        let location = self.restaurants.location(restaurant_id).await?;
        let payload = self.provider.current(location).await?;

        self.store
            .set(&key, &serde_json::to_string(&payload)?, Some(self.ttl))
            .await?;

        tracing::debug!(restaurant_id, ttl_secs = self.ttl.as_secs(), "Cached weather");
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ids::SequentialIds;
    use crate::catalog::index::IndexMaintainer;
    use crate::store::MemStore;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl WeatherProvider for CountingProvider {
        async fn current(&self, at: Coordinates) -> Result<Value> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail {
                return Err(Error::Upstream("Failed to fetch weather data".into()));
            }
            Ok(json!({ "lat": at.lat, "lon": at.lng, "call": n }))
        }
    }

    async fn setup(provider: Arc<CountingProvider>) -> (WeatherCache, String) {
        let store: Arc<dyn KvStore> = Arc::new(MemStore::new());
        let keys = Keys::default();
        let index = IndexMaintainer::new(store.clone(), keys.clone());
        let restaurants = RestaurantRepository::new(
            store.clone(),
            keys.clone(),
            Arc::new(SequentialIds::new("x")),
            index,
        );
        let id = restaurants
            .create("Trattoria", "40.0,-73.0", &[])
            .await
            .unwrap()
            .id;
        let cache = WeatherCache::new(
            store,
            keys,
            restaurants,
            provider,
            Duration::from_secs(3600),
        );
        (cache, id)
    }

    #[tokio::test(start_paused = true)]
    async fn test_hit_within_ttl_and_refresh_after() {
        let provider = Arc::new(CountingProvider::default());
        let (cache, id) = setup(provider.clone()).await;

        let first = cache.fetch(&id).await.unwrap();
        assert_eq!(first["lat"], 40.0);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(1800)).await;
        let second = cache.fetch(&id).await.unwrap();
        assert_eq!(second, first);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(1801)).await;
        let third = cache.fetch(&id).await.unwrap();
        assert_eq!(third["call"], 2);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let provider = Arc::new(CountingProvider {
            fail: true,
            ..Default::default()
        });
        let (cache, id) = setup(provider.clone()).await;

        assert!(matches!(cache.fetch(&id).await, Err(Error::Upstream(_))));
        assert!(matches!(cache.fetch(&id).await, Err(Error::Upstream(_))));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unknown_restaurant() {
        let provider = Arc::new(CountingProvider::default());
        let (cache, _) = setup(provider.clone()).await;

        assert!(matches!(cache.fetch("ghost").await, Err(Error::NotFound(_))));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_hides_api_key() {
        let client = OpenWeatherClient::new(&WeatherConfig {
            base_url: "http://127.0.0.1:1/weather".to_string(),
            api_key: Some("SECRETKEY123".to_string()),
            ..WeatherConfig::default()
        });

        let err = client
            .current(Coordinates::parse("1,1").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));
        assert_eq!(err.public_message(), "Failed to fetch weather data");
        assert!(!err.to_string().contains("SECRETKEY123"));
    }
}
