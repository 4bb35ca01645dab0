//! Review ledger
//!
//! Each restaurant has a list of review ids (most recent first) and each
//! review a detail hash. Every new review bumps the restaurant's running
//! `totalStars`, and the average is derived from that total over the list
//! length.
//!
//! The total and the length are two separate atomic counters read from
//! two separate replies. Two writers on the same restaurant can interleave
//! between them, so a stored average is an approximation that settles
//! once writes stop, not a snapshot.
//!
//! Removing a review does not touch `totalStars` or the average; both
//! drift from the surviving reviews after a removal.

use super::ids::IdGenerator;
use super::index::IndexMaintainer;
use super::models::Review;
use super::restaurants::RestaurantRepository;
use crate::common::{average_stars, index_range, timestamp_now_millis, Error, Keys, Result};
use crate::store::KvStore;
use futures_util::future::try_join_all;
use std::sync::Arc;

#[derive(Clone)]
pub struct ReviewLedger {
    store: Arc<dyn KvStore>,
    keys: Keys,
    ids: Arc<dyn IdGenerator>,
    restaurants: RestaurantRepository,
    index: IndexMaintainer,
}

impl ReviewLedger {
    pub fn new(
        store: Arc<dyn KvStore>,
        keys: Keys,
        ids: Arc<dyn IdGenerator>,
        restaurants: RestaurantRepository,
        index: IndexMaintainer,
    ) -> Self {
        Self {
            store,
            keys,
            ids,
            restaurants,
            index,
        }
    }

    /// Append a review and refresh the restaurant's average and rank.
    pub async fn add_review(&self, restaurant_id: &str, rating: f64, text: &str) -> Result<Review> {
        self.restaurants.ensure_exists(restaurant_id).await?;

        let review = Review {
            id: self.ids.next_id(),
            restaurant_id: restaurant_id.to_string(),
            rating,
            text: text.to_string(),
            timestamp: timestamp_now_millis(),
        };

        let list_key = self.keys.reviews(restaurant_id);
        let details_key = self.keys.review_details(&review.id);
        let details = review.to_fields();

        let (count, (), total) = tokio::try_join!(
            self.store.lpush(&list_key, &review.id),
            self.store.hset(&details_key, &details),
            self.restaurants.add_stars(restaurant_id, rating),
        )?;

        let avg = average_stars(total, count);
        tokio::try_join!(
            self.restaurants.set_avg_stars(restaurant_id, avg),
            self.index.on_rating_change(restaurant_id, avg),
        )?;

        tracing::info!(
            restaurant_id,
            review_id = %review.id,
            rating,
            review_count = count,
            avg_stars = avg,
            "Review added"
        );
        Ok(review)
    }

    /// Reviews at list positions `[offset, offset + count - 1]`, newest first.
    ///
    /// Positions shift when earlier reviews are removed, so a page is not a
    /// stable cursor. Ids whose details have vanished are skipped.
    pub async fn list_reviews(
        &self,
        restaurant_id: &str,
        offset: u64,
        count: u64,
    ) -> Result<Vec<Review>> {
        self.restaurants.ensure_exists(restaurant_id).await?;
        let Some((start, stop)) = index_range(offset, count) else {
            return Ok(Vec::new());
        };

        let ids = self
            .store
            .lrange(&self.keys.reviews(restaurant_id), start, stop)
            .await?;

        let hashes = try_join_all(ids.iter().map(|id| {
            let key = self.keys.review_details(id);
            async move { self.store.hgetall(&key).await }
        }))
        .await?;

        let mut reviews = Vec::with_capacity(hashes.len());
        for hash in hashes {
            if let Some(review) = Review::from_hash(hash)? {
                reviews.push(review);
            }
        }
        Ok(reviews)
    }

    /// Drop every occurrence of `review_id` from the list and delete its
    /// details. NotFound when neither existed.
    pub async fn remove_review(&self, restaurant_id: &str, review_id: &str) -> Result<()> {
        self.restaurants.ensure_exists(restaurant_id).await?;

        let list_key = self.keys.reviews(restaurant_id);
        let details_key = self.keys.review_details(review_id);
        let (removed, deleted) = tokio::try_join!(
            self.store.lrem(&list_key, review_id),
            self.store.del(&details_key),
        )?;

        if removed == 0 && !deleted {
            return Err(Error::not_found("Review not found"));
        }

        tracing::info!(restaurant_id, review_id, "Review deleted");
        Ok(())
    }
}
