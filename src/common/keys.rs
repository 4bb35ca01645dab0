//! Key naming scheme
//!
//! Every structure lives under a single prefix so several deployments can
//! share one store.

#[derive(Debug, Clone)]
pub struct Keys {
    prefix: String,
}

impl Keys {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn key(&self, parts: &[&str]) -> String {
        let mut out = self.prefix.clone();
        for part in parts {
            out.push(':');
            out.push_str(part);
        }
        out
    }

    /// Hash holding the restaurant record
    pub fn restaurant(&self, id: &str) -> String {
        self.key(&["restaurants", id])
    }

    /// List of review ids, most recent first
    pub fn reviews(&self, restaurant_id: &str) -> String {
        self.key(&["reviews", restaurant_id])
    }

    /// Hash holding one review
    pub fn review_details(&self, review_id: &str) -> String {
        self.key(&["review_details", review_id])
    }

    /// Set of every known cuisine name
    pub fn cuisines(&self) -> String {
        self.key(&["cuisines"])
    }

    /// Inverted set: cuisine name → restaurant ids
    pub fn cuisine(&self, name: &str) -> String {
        self.key(&["cuisine", name])
    }

    /// Forward set: restaurant id → cuisine names
    pub fn restaurant_cuisines(&self, id: &str) -> String {
        self.key(&["restaurant_cuisines", id])
    }

    /// Sorted set ranking restaurants by average rating
    pub fn restaurants_by_rating(&self) -> String {
        self.key(&["restaurants_by_rating"])
    }

    pub fn weather(&self, id: &str) -> String {
        self.key(&["weather", id])
    }
}

impl Default for Keys {
    fn default() -> Self {
        Self::new("bites")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        let keys = Keys::new("app");
        assert_eq!(keys.restaurant("x1"), "app:restaurants:x1");
        assert_eq!(keys.reviews("x1"), "app:reviews:x1");
        assert_eq!(keys.review_details("r9"), "app:review_details:r9");
        assert_eq!(keys.cuisines(), "app:cuisines");
        assert_eq!(keys.cuisine("thai"), "app:cuisine:thai");
        assert_eq!(keys.restaurant_cuisines("x1"), "app:restaurant_cuisines:x1");
        assert_eq!(keys.restaurants_by_rating(), "app:restaurants_by_rating");
        assert_eq!(keys.weather("x1"), "app:weather:x1");
    }

    #[test]
    fn test_forward_and_inverted_sets_do_not_collide() {
        let keys = Keys::default();
        assert_ne!(keys.cuisine("x1"), keys.restaurant_cuisines("x1"));
    }
}
