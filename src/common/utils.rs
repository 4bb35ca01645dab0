//! Utility functions for restaurant-kv

use serde::{Deserialize, Serialize};

/// Current Unix timestamp (milliseconds)
pub fn timestamp_now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Round to one decimal place, halves away from zero
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Average of a running sum over a count, rounded to one decimal.
///
/// Returns 0 for an empty count.
pub fn average_stars(total: f64, count: u64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    round_to_tenth(total / count as f64)
}

/// A latitude/longitude pair stored as `"lat,lng"`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Parse a `"lat,lng"` string, checking the geographic ranges.
    pub fn parse(s: &str) -> crate::Result<Self> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| crate::Error::validation("location must be \"lat,lng\""))?;

        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| crate::Error::validation(format!("invalid latitude: {}", lat.trim())))?;
        let lng: f64 = lng
            .trim()
            .parse()
            .map_err(|_| crate::Error::validation(format!("invalid longitude: {}", lng.trim())))?;

        if !(-90.0..=90.0).contains(&lat) {
            return Err(crate::Error::validation("latitude out of range"));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(crate::Error::validation("longitude out of range"));
        }

        Ok(Self { lat, lng })
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Debug keeps the decimal point: 40.0 rather than 40
        write!(f, "{:?},{:?}", self.lat, self.lng)
    }
}

/// Zero-based offset of 1-based `page` of `limit`, saturating on overflow.
pub fn page_offset(page: u64, limit: u64) -> u64 {
    page.saturating_sub(1).saturating_mul(limit)
}

/// Inclusive store range `[start, stop]` covering `count` items from `offset`.
///
/// `None` when nothing can be in the window: `count` is zero, or `offset`
/// lies past the last addressable index. Both bounds are never negative,
/// so they are never read as positions from the end.
pub fn index_range(offset: u64, count: u64) -> Option<(i64, i64)> {
    if count == 0 {
        return None;
    }
    let start = i64::try_from(offset).ok()?;
    let span = i64::try_from(count - 1).unwrap_or(i64::MAX);
    Some((start, start.saturating_add(span)))
}
