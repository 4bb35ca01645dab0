//! Restaurant catalog built on key-value primitives
//!
//! - `restaurants`: restaurant hashes, existence checks, view counter
//! - `index`: cuisine sets and the rating-ranked sorted set
//! - `reviews`: review lists, review hashes, running average
//! - `weather`: TTL cache around the weather lookup
//!
//! Multi-key writes are plain sequences of single-key commands. There is no
//! transaction and no rollback, so readers can observe a half-applied write.

pub mod ids;
pub mod index;
pub mod models;
pub mod restaurants;
pub mod reviews;
pub mod weather;

pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use index::IndexMaintainer;
pub use models::{NewRestaurant, NewReview, Restaurant, RestaurantDetails, Review};
pub use restaurants::RestaurantRepository;
pub use reviews::ReviewLedger;
pub use weather::{OpenWeatherClient, WeatherCache, WeatherProvider};

use crate::common::{Keys, Result};
use crate::store::KvStore;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// All catalog components wired to one store.
#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn KvStore>,
    pub restaurants: RestaurantRepository,
    pub index: IndexMaintainer,
    pub reviews: ReviewLedger,
    pub weather: WeatherCache,
}

impl Catalog {
    pub fn new(
        store: Arc<dyn KvStore>,
        keys: Keys,
        ids: Arc<dyn IdGenerator>,
        provider: Arc<dyn WeatherProvider>,
        weather_ttl: Duration,
    ) -> Self {
        let index = IndexMaintainer::new(store.clone(), keys.clone());
        let restaurants =
            RestaurantRepository::new(store.clone(), keys.clone(), ids.clone(), index.clone());
        let reviews = ReviewLedger::new(
            store.clone(),
            keys.clone(),
            ids,
            restaurants.clone(),
            index.clone(),
        );
        let weather = WeatherCache::new(
            store.clone(),
            keys,
            restaurants.clone(),
            provider,
            weather_ttl,
        );
        Self {
            store,
            restaurants,
            index,
            reviews,
            weather,
        }
    }

    pub async fn create_restaurant(
        &self,
        name: &str,
        location: &str,
        cuisines: &[String],
    ) -> Result<Restaurant> {
        self.restaurants.create(name, location, cuisines).await
    }

    pub async fn get_restaurant(&self, id: &str) -> Result<RestaurantDetails> {
        self.restaurants.get(id).await
    }

    /// Restaurant records ranked by average rating.
    pub async fn top_rated(&self, offset: u64, count: u64) -> Result<Vec<Restaurant>> {
        let ids = self.index.list_top_rated(offset, count).await?;
        self.restaurants.get_many(&ids).await
    }

    pub async fn list_cuisines(&self) -> Result<Vec<String>> {
        self.index.list_cuisines().await
    }

    /// Names of the restaurants serving `cuisine`.
    pub async fn restaurants_for_cuisine(&self, cuisine: &str) -> Result<Vec<String>> {
        let ids = self.index.restaurants_for_cuisine(cuisine).await?;
        self.restaurants.names(&ids).await
    }

    pub async fn add_review(&self, restaurant_id: &str, rating: f64, text: &str) -> Result<Review> {
        self.reviews.add_review(restaurant_id, rating, text).await
    }

    pub async fn list_reviews(
        &self,
        restaurant_id: &str,
        offset: u64,
        count: u64,
    ) -> Result<Vec<Review>> {
        self.reviews.list_reviews(restaurant_id, offset, count).await
    }

    pub async fn remove_review(&self, restaurant_id: &str, review_id: &str) -> Result<()> {
        self.reviews.remove_review(restaurant_id, review_id).await
    }

    pub async fn weather(&self, restaurant_id: &str) -> Result<Value> {
        self.weather.fetch(restaurant_id).await
    }

    /// Round-trip to the store.
    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await
    }
}
