//! Request validation, applied before anything reaches the catalog.

use crate::catalog::{NewRestaurant, NewReview};
use crate::common::{Coordinates, Error, Result};
use serde::Deserialize;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;
pub const MIN_RATING: f64 = 1.0;
pub const MAX_RATING: f64 = 5.0;

/// Path identifiers must be present and non-blank.
pub fn path_id<'a>(id: &'a str, what: &str) -> Result<&'a str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(Error::MissingId(format!("{} ID is required", what)));
    }
    Ok(id)
}

/// Checked restaurant creation input
#[derive(Debug, Clone)]
pub struct ValidRestaurant {
    pub name: String,
    /// As sent; checked to parse as coordinates
    pub location: String,
    pub cuisines: Vec<String>,
}

pub fn restaurant(input: NewRestaurant) -> Result<ValidRestaurant> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(Error::validation("name is required"));
    }

    Coordinates::parse(&input.location)?;

    if input.cuisines.is_empty() {
        return Err(Error::validation("at least one cuisine is required"));
    }
    let mut cuisines = Vec::with_capacity(input.cuisines.len());
    for cuisine in &input.cuisines {
        let cuisine = cuisine.trim();
        if cuisine.is_empty() {
            return Err(Error::validation("cuisine names must not be empty"));
        }
        if cuisine.chars().any(|c| c.is_control()) {
            return Err(Error::validation("cuisine names must not contain control characters"));
        }
        if !cuisines.iter().any(|c: &String| c == cuisine) {
            cuisines.push(cuisine.to_string());
        }
    }

    Ok(ValidRestaurant {
        name: name.to_string(),
        location: input.location,
        cuisines,
    })
}

pub fn review(input: &NewReview) -> Result<()> {
    if !input.rating.is_finite() || !(MIN_RATING..=MAX_RATING).contains(&input.rating) {
        return Err(Error::validation(format!(
            "rating must be between {} and {}",
            MIN_RATING, MAX_RATING
        )));
    }
    if input.text.trim().is_empty() {
        return Err(Error::validation("text is required"));
    }
    Ok(())
}

/// `?page=&limit=` as sent by the client
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PageQuery {
    /// Zero-based `(offset, count)` for the requested page.
    pub fn window(&self) -> Result<(u64, u64)> {
        let page = self.page.unwrap_or(DEFAULT_PAGE);
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        if page == 0 {
            return Err(Error::validation("page must be at least 1"));
        }
        if limit == 0 || limit > MAX_LIMIT {
            return Err(Error::validation(format!(
                "limit must be between 1 and {}",
                MAX_LIMIT
            )));
        }
        Ok((crate::common::page_offset(page, limit), limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_restaurant(name: &str, location: &str, cuisines: &[&str]) -> NewRestaurant {
        NewRestaurant {
            name: name.to_string(),
            location: location.to_string(),
            cuisines: cuisines.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn test_valid_restaurant() {
        let v = restaurant(new_restaurant(" Roma ", "40.0,-73.0", &["italian", " italian", "pizza"]))
            .unwrap();
        assert_eq!(v.name, "Roma");
        assert_eq!(v.cuisines, vec!["italian", "pizza"]);
        assert_eq!(v.location, "40.0,-73.0");
    }

    #[test]
    fn test_invalid_restaurant() {
        assert!(restaurant(new_restaurant("", "40,-73", &["x"])).is_err());
        assert!(restaurant(new_restaurant("A", "somewhere", &["x"])).is_err());
        assert!(restaurant(new_restaurant("A", "40,-73", &[])).is_err());
        assert!(restaurant(new_restaurant("A", "40,-73", &[" "])).is_err());
    }

    #[test]
    fn test_review_rules() {
        let ok = NewReview {
            rating: 4.5,
            text: "good".into(),
        };
        assert!(review(&ok).is_ok());

        for rating in [0.0, 5.5, f64::NAN] {
            let bad = NewReview {
                rating,
                text: "x".into(),
            };
            assert!(matches!(review(&bad), Err(Error::Validation(_))));
        }
        let empty = NewReview {
            rating: 3.0,
            text: "  ".into(),
        };
        assert!(review(&empty).is_err());
    }

    #[test]
    fn test_page_window() {
        assert_eq!(PageQuery::default().window().unwrap(), (0, 10));
        let q = PageQuery {
            page: Some(3),
            limit: Some(5),
        };
        assert_eq!(q.window().unwrap(), (10, 5));
        let zero = PageQuery {
            page: Some(0),
            limit: None,
        };
        assert!(zero.window().is_err());
        let huge = PageQuery {
            page: None,
            limit: Some(1000),
        };
        assert!(huge.window().is_err());
        let far = PageQuery {
            page: Some(u64::MAX),
            limit: Some(10),
        };
        assert_eq!(far.window().unwrap(), (u64::MAX, 10));
    }

    #[test]
    fn test_path_id() {
        assert_eq!(path_id("abc", "Restaurant").unwrap(), "abc");
        assert!(matches!(path_id("  ", "Restaurant"), Err(Error::MissingId(_))));
    }
}
