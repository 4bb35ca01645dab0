//! Records stored in hashes, and the inputs that create them.

use crate::common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Hash field names of a restaurant record
pub mod restaurant_fields {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const LOCATION: &str = "location";
    pub const VIEW_COUNT: &str = "viewCount";
    pub const TOTAL_STARS: &str = "totalStars";
    pub const AVG_STARS: &str = "avgStars";
}

/// Hash field names of a review record
pub mod review_fields {
    pub const ID: &str = "id";
    pub const RESTAURANT_ID: &str = "restaurantId";
    pub const RATING: &str = "rating";
    pub const TEXT: &str = "text";
    pub const TIMESTAMP: &str = "timestamp";
}

fn required(map: &mut HashMap<String, String>, field: &str, record: &str) -> Result<String> {
    map.remove(field)
        .ok_or_else(|| Error::Internal(format!("{} record missing field {}", record, field)))
}

fn numeric<T: std::str::FromStr + Default>(
    map: &HashMap<String, String>,
    field: &str,
    record: &str,
) -> Result<T> {
    match map.get(field) {
        Some(v) => v
            .parse()
            .map_err(|_| Error::Internal(format!("{} field {} is not numeric", record, field))),
        None => Ok(T::default()),
    }
}

/// Restaurant record as stored in its hash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    /// `"lat,lng"`
    pub location: String,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub total_stars: f64,
    #[serde(default)]
    pub avg_stars: f64,
}

impl Restaurant {
    /// Decode a hash; an empty hash means the record does not exist.
    pub fn from_hash(mut map: HashMap<String, String>) -> Result<Option<Self>> {
        use restaurant_fields::*;
        if map.is_empty() {
            return Ok(None);
        }
        let view_count = numeric(&map, VIEW_COUNT, "restaurant")?;
        let total_stars = numeric(&map, TOTAL_STARS, "restaurant")?;
        let avg_stars = numeric(&map, AVG_STARS, "restaurant")?;
        Ok(Some(Self {
            id: required(&mut map, ID, "restaurant")?,
            name: required(&mut map, NAME, "restaurant")?,
            location: required(&mut map, LOCATION, "restaurant")?,
            view_count,
            total_stars,
            avg_stars,
        }))
    }
}

/// Restaurant record merged with its cuisine names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantDetails {
    #[serde(flatten)]
    pub restaurant: Restaurant,
    pub cuisines: Vec<String>,
}

/// A single review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub restaurant_id: String,
    pub rating: f64,
    pub text: String,
    /// Creation time, Unix milliseconds
    pub timestamp: i64,
}

impl Review {
    pub fn to_fields(&self) -> Vec<(&'static str, String)> {
        use review_fields::*;
        vec![
            (ID, self.id.clone()),
            (RESTAURANT_ID, self.restaurant_id.clone()),
            (RATING, self.rating.to_string()),
            (TEXT, self.text.clone()),
            (TIMESTAMP, self.timestamp.to_string()),
        ]
    }

    pub fn from_hash(mut map: HashMap<String, String>) -> Result<Option<Self>> {
        use review_fields::*;
        if map.is_empty() {
            return Ok(None);
        }
        let rating = numeric(&map, RATING, "review")?;
        let timestamp = numeric(&map, TIMESTAMP, "review")?;
        Ok(Some(Self {
            id: required(&mut map, ID, "review")?,
            restaurant_id: required(&mut map, RESTAURANT_ID, "review")?,
            rating,
            text: map.remove(TEXT).unwrap_or_default(),
            timestamp,
        }))
    }
}

/// Body of a restaurant creation request
#[derive(Debug, Clone, Deserialize)]
pub struct NewRestaurant {
    pub name: String,
    pub location: String,
    pub cuisines: Vec<String>,
}

/// Body of a review submission
#[derive(Debug, Clone, Deserialize)]
pub struct NewReview {
    pub rating: f64,
    pub text: String,
}
