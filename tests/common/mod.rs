//! Shared helpers for the HTTP integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use restaurant_kv::catalog::{Catalog, SequentialIds, WeatherProvider};
use restaurant_kv::common::{Coordinates, Keys};
use restaurant_kv::store::MemStore;
use restaurant_kv::{Result, Server};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

pub const WEATHER_TTL: Duration = Duration::from_secs(3600);

/// Weather provider that counts calls and can be switched to failing
#[derive(Default)]
pub struct FakeWeather {
    pub calls: AtomicUsize,
    pub failing: AtomicBool,
}

impl FakeWeather {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherProvider for FakeWeather {
    async fn current(&self, at: Coordinates) -> Result<Value> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.failing.load(Ordering::SeqCst) {
            return Err(restaurant_kv::Error::Upstream(
                "Failed to fetch weather data".into(),
            ));
        }
        Ok(json!({
            "coord": { "lat": at.lat, "lon": at.lng },
            "main": { "temp": 71.5 },
            "fetch": n,
        }))
    }
}

pub struct TestApp {
    pub router: Router,
    pub weather: Arc<FakeWeather>,
}

impl TestApp {
    pub fn new() -> Self {
        let weather = Arc::new(FakeWeather::default());
        let catalog = Catalog::new(
            Arc::new(MemStore::new()),
            Keys::new("test"),
            Arc::new(SequentialIds::new("id")),
            weather.clone(),
            WEATHER_TTL,
        );
        Self {
            router: Server::router(catalog, 64 * 1024),
            weather,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    /// Create a restaurant and return its id.
    pub async fn restaurant(&self, name: &str, location: &str, cuisines: &[&str]) -> String {
        let (status, body) = self
            .post(
                "/restaurants",
                json!({ "name": name, "location": location, "cuisines": cuisines }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["data"]["id"].as_str().unwrap().to_string()
    }

    /// Post a review and return its id.
    pub async fn review(&self, restaurant_id: &str, rating: f64, text: &str) -> String {
        let (status, body) = self
            .post(
                &format!("/restaurants/{}/reviews", restaurant_id),
                json!({ "rating": rating, "text": text }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["data"]["id"].as_str().unwrap().to_string()
    }
}
