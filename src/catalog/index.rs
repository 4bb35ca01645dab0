//! Secondary indexes built from sets and a sorted set.
//!
//! - a global set of cuisine names
//! - one inverted set per cuisine: cuisine → restaurant ids
//! - one forward set per restaurant: restaurant id → cuisine names
//! - one sorted set ranking every restaurant by its average rating
//!
//! Only this module writes these keys.

use crate::common::{index_range, Keys, Result};
use crate::store::KvStore;
use futures_util::future::try_join_all;
use std::sync::Arc;

#[derive(Clone)]
pub struct IndexMaintainer {
    store: Arc<dyn KvStore>,
    keys: Keys,
}

impl IndexMaintainer {
    pub fn new(store: Arc<dyn KvStore>, keys: Keys) -> Self {
        Self { store, keys }
    }

    /// Register cuisine memberships and a zero score for a new restaurant.
    ///
    /// The writes are independent; a failure part way leaves the earlier
    /// ones in place.
    pub async fn on_create(&self, id: &str, cuisines: &[String]) -> Result<()> {
        let all_key = self.keys.cuisines();
        let forward_key = self.keys.restaurant_cuisines(id);
        let rating_key = self.keys.restaurants_by_rating();

        let memberships = cuisines.iter().map(|cuisine| {
            let (all_key, forward_key) = (&all_key, &forward_key);
            async move {
                let inverted_key = self.keys.cuisine(cuisine);
                tokio::try_join!(
                    self.store.sadd(all_key, cuisine),
                    self.store.sadd(&inverted_key, id),
                    self.store.sadd(forward_key, cuisine),
                )
            }
        });

        tokio::try_join!(
            try_join_all(memberships),
            self.store.zadd(&rating_key, id, 0.0),
        )?;

        tracing::debug!(restaurant_id = id, cuisines = cuisines.len(), "Indexed restaurant");
        Ok(())
    }

    /// Overwrite the restaurant's rank score.
    pub async fn on_rating_change(&self, id: &str, score: f64) -> Result<()> {
        self.store
            .zadd(&self.keys.restaurants_by_rating(), id, score)
            .await
    }

    /// Restaurant ids by descending score over `[offset, offset + count - 1]`.
    ///
    /// The order among equal scores is up to the backend and must not be
    /// relied on.
    pub async fn list_top_rated(&self, offset: u64, count: u64) -> Result<Vec<String>> {
        let Some((start, stop)) = index_range(offset, count) else {
            return Ok(Vec::new());
        };
        self.store
            .zrevrange(&self.keys.restaurants_by_rating(), start, stop)
            .await
    }

    pub async fn score(&self, id: &str) -> Result<Option<f64>> {
        self.store
            .zscore(&self.keys.restaurants_by_rating(), id)
            .await
    }

    /// Cuisine names attached to one restaurant
    pub async fn cuisines_for(&self, id: &str) -> Result<Vec<String>> {
        self.store
            .smembers(&self.keys.restaurant_cuisines(id))
            .await
    }

    /// Every cuisine name ever registered
    pub async fn list_cuisines(&self) -> Result<Vec<String>> {
        self.store.smembers(&self.keys.cuisines()).await
    }

    /// Restaurant ids carrying `cuisine`
    pub async fn restaurants_for_cuisine(&self, cuisine: &str) -> Result<Vec<String>> {
        self.store.smembers(&self.keys.cuisine(cuisine)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;

    fn maintainer() -> IndexMaintainer {
        IndexMaintainer::new(Arc::new(MemStore::new()), Keys::default())
    }

    #[tokio::test]
    async fn test_on_create_registers_everything() {
        let index = maintainer();
        index
            .on_create("x1", &["italian".to_string(), "pizza".to_string()])
            .await
            .unwrap();

        assert_eq!(index.list_cuisines().await.unwrap(), vec!["italian", "pizza"]);
        assert_eq!(index.restaurants_for_cuisine("italian").await.unwrap(), vec!["x1"]);
        assert_eq!(index.restaurants_for_cuisine("pizza").await.unwrap(), vec!["x1"]);
        assert_eq!(index.cuisines_for("x1").await.unwrap(), vec!["italian", "pizza"]);
        assert_eq!(index.score("x1").await.unwrap(), Some(0.0));
    }

    #[tokio::test]
    async fn test_rating_change_overwrites() {
        let index = maintainer();
        index.on_create("x1", &[]).await.unwrap();
        index.on_rating_change("x1", 4.0).await.unwrap();
        index.on_rating_change("x1", 3.5).await.unwrap();
        assert_eq!(index.score("x1").await.unwrap(), Some(3.5));
    }

    #[tokio::test]
    async fn test_list_top_rated_window() {
        let index = maintainer();
        for (id, score) in [("a", 2.0), ("b", 4.5), ("c", 3.0), ("d", 1.0)] {
            index.on_create(id, &[]).await.unwrap();
            index.on_rating_change(id, score).await.unwrap();
        }

        assert_eq!(index.list_top_rated(0, 2).await.unwrap(), vec!["b", "c"]);
        assert_eq!(index.list_top_rated(2, 2).await.unwrap(), vec!["a", "d"]);
        assert!(index.list_top_rated(4, 2).await.unwrap().is_empty());
        assert!(index.list_top_rated(0, 0).await.unwrap().is_empty());
        assert!(index.list_top_rated(u64::MAX, 10).await.unwrap().is_empty());
        assert!(index.list_top_rated(i64::MAX as u64, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_cuisine_is_empty() {
        let index = maintainer();
        assert!(index.restaurants_for_cuisine("nope").await.unwrap().is_empty());
    }
}
