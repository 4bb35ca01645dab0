//! Restaurant records: one hash per restaurant.

use super::ids::IdGenerator;
use super::index::IndexMaintainer;
use super::models::{restaurant_fields as fields, Restaurant, RestaurantDetails};
use crate::common::{Coordinates, Error, Keys, Result};
use crate::store::KvStore;
use futures_util::future::try_join_all;
use std::sync::Arc;

#[derive(Clone)]
pub struct RestaurantRepository {
    store: Arc<dyn KvStore>,
    keys: Keys,
    ids: Arc<dyn IdGenerator>,
    index: IndexMaintainer,
}

impl RestaurantRepository {
    pub fn new(
        store: Arc<dyn KvStore>,
        keys: Keys,
        ids: Arc<dyn IdGenerator>,
        index: IndexMaintainer,
    ) -> Self {
        Self {
            store,
            keys,
            ids,
            index,
        }
    }

    /// Write the base record, then register it with the indexes.
    ///
    /// `location` is stored as given once it parses as coordinates.
    ///
    /// No rollback: if indexing fails the record stays without its
    /// cuisine memberships or rank entry.
    pub async fn create(
        &self,
        name: &str,
        location: &str,
        cuisines: &[String],
    ) -> Result<Restaurant> {
        Coordinates::parse(location)?;

        let id = self.ids.next_id();
        let record = Restaurant {
            id: id.clone(),
            name: name.to_string(),
            location: location.to_string(),
            view_count: 0,
            total_stars: 0.0,
            avg_stars: 0.0,
        };

        self.store
            .hset(
                &self.keys.restaurant(&id),
                &[
                    (fields::ID, record.id.clone()),
                    (fields::NAME, record.name.clone()),
                    (fields::LOCATION, record.location.clone()),
                ],
            )
            .await?;
        self.index.on_create(&id, cuisines).await?;

        tracing::info!(restaurant_id = %id, name, "Restaurant created");
        Ok(record)
    }

    pub async fn exists(&self, id: &str) -> Result<bool> {
        self.store.exists(&self.keys.restaurant(id)).await
    }

    /// Fail with NotFound unless the restaurant exists.
    pub async fn ensure_exists(&self, id: &str) -> Result<()> {
        if self.exists(id).await? {
            Ok(())
        } else {
            Err(Error::not_found("Restaurant not found"))
        }
    }

    /// Count a view, then return the record with its cuisines.
    pub async fn get(&self, id: &str) -> Result<RestaurantDetails> {
        // Without the gate the increment would create a stray hash.
        self.ensure_exists(id).await?;

        let key = self.keys.restaurant(id);
        self.store.hincrby(&key, fields::VIEW_COUNT, 1).await?;

        let (hash, cuisines) =
            tokio::try_join!(self.store.hgetall(&key), self.index.cuisines_for(id))?;
        let restaurant =
            Restaurant::from_hash(hash)?.ok_or_else(|| Error::not_found("Restaurant not found"))?;

        Ok(RestaurantDetails {
            restaurant,
            cuisines,
        })
    }

    /// Records for `ids` in the given order; ids without a record are skipped.
    pub async fn get_many(&self, ids: &[String]) -> Result<Vec<Restaurant>> {
        let hashes = try_join_all(ids.iter().map(|id| {
            let key = self.keys.restaurant(id);
            async move { self.store.hgetall(&key).await }
        }))
        .await?;

        let mut out = Vec::with_capacity(hashes.len());
        for hash in hashes {
            if let Some(r) = Restaurant::from_hash(hash)? {
                out.push(r);
            }
        }
        Ok(out)
    }

    /// Names for `ids` in the given order; ids without a record are skipped.
    pub async fn names(&self, ids: &[String]) -> Result<Vec<String>> {
        let names = try_join_all(ids.iter().map(|id| {
            let key = self.keys.restaurant(id);
            async move { self.store.hget(&key, fields::NAME).await }
        }))
        .await?;
        Ok(names.into_iter().flatten().collect())
    }

    /// Stored coordinates of a restaurant.
    pub async fn location(&self, id: &str) -> Result<Coordinates> {
        let raw = self
            .store
            .hget(&self.keys.restaurant(id), fields::LOCATION)
            .await?
            .ok_or_else(|| Error::not_found("Restaurant not found"))?;
        Coordinates::parse(&raw)
            .map_err(|_| Error::Internal(format!("restaurant {} has invalid location", id)))
    }

    /// Add `rating` to the running total, returning the new total.
    pub async fn add_stars(&self, id: &str, rating: f64) -> Result<f64> {
        self.store
            .hincrbyfloat(&self.keys.restaurant(id), fields::TOTAL_STARS, rating)
            .await
    }

    pub async fn set_avg_stars(&self, id: &str, avg: f64) -> Result<()> {
        self.store
            .hset(
                &self.keys.restaurant(id),
                &[(fields::AVG_STARS, avg.to_string())],
            )
            .await
    }
}
