//! HTTP API
//!
//! - `GET    /restaurants?page&limit`            top rated restaurants
//! - `POST   /restaurants`                       create a restaurant
//! - `GET    /restaurants/:id`                   one restaurant (counts a view)
//! - `GET    /restaurants/:id/weather`           current weather, cached
//! - `GET    /restaurants/:id/reviews?page&limit` reviews, newest first
//! - `POST   /restaurants/:id/reviews`           add a review
//! - `DELETE /restaurants/:id/reviews/:review_id` remove a review
//! - `GET    /cuisines`                          every cuisine name
//! - `GET    /cuisines/:cuisine`                 restaurant names for a cuisine

use super::responses::{success, success_with, ApiResponse};
use super::validate::{self, PageQuery};
use crate::catalog::{Catalog, NewRestaurant, NewReview, Restaurant, RestaurantDetails, Review};
use crate::common::{Error, Result};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
    Json, Router,
};
use serde_json::{json, Value};

/// Shared state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
}

/// Creates the HTTP router with all public endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route(
            "/restaurants",
            get(list_restaurants).post(create_restaurant),
        )
        .route("/restaurants/:restaurant_id", get(get_restaurant))
        .route(
            "/restaurants/:restaurant_id/weather",
            get(restaurant_weather),
        )
        .route(
            "/restaurants/:restaurant_id/reviews",
            get(list_reviews).post(add_review),
        )
        .route(
            "/restaurants/:restaurant_id/reviews/:review_id",
            delete(remove_review),
        )
        .route("/cuisines", get(list_cuisines))
        .route("/cuisines/:cuisine", get(cuisine_restaurants))
        .with_state(state)
}

fn rejected(e: impl std::fmt::Display) -> Error {
    Error::validation(e.to_string())
}

fn page(query: std::result::Result<Query<PageQuery>, QueryRejection>) -> Result<(u64, u64)> {
    let Query(query) = query.map_err(rejected)?;
    query.window()
}

async fn root() -> &'static str {
    "Hello World!"
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.catalog.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "version": env!("CARGO_PKG_VERSION"),
            })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Store health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unhealthy", "error": e.public_message() })),
            )
        }
    }
}

async fn list_restaurants(
    State(state): State<AppState>,
    query: std::result::Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Restaurant>>>> {
    let (offset, count) = page(query)?;
    let restaurants = state.catalog.top_rated(offset, count).await?;
    Ok(success(restaurants))
}

async fn create_restaurant(
    State(state): State<AppState>,
    payload: std::result::Result<Json<NewRestaurant>, JsonRejection>,
) -> Result<Json<ApiResponse<Restaurant>>> {
    let Json(input) = payload.map_err(rejected)?;
    let valid = validate::restaurant(input)?;
    let restaurant = state
        .catalog
        .create_restaurant(&valid.name, &valid.location, &valid.cuisines)
        .await?;
    Ok(success_with(restaurant, "Restaurant added successfully"))
}

async fn get_restaurant(
    State(state): State<AppState>,
    Path(restaurant_id): Path<String>,
) -> Result<Json<ApiResponse<RestaurantDetails>>> {
    let id = validate::path_id(&restaurant_id, "Restaurant")?;
    let details = state.catalog.get_restaurant(id).await?;
    Ok(success(details))
}

async fn restaurant_weather(
    State(state): State<AppState>,
    Path(restaurant_id): Path<String>,
) -> Result<Json<ApiResponse<Value>>> {
    let id = validate::path_id(&restaurant_id, "Restaurant")?;
    let payload = state.catalog.weather(id).await?;
    Ok(success(payload))
}

async fn add_review(
    State(state): State<AppState>,
    Path(restaurant_id): Path<String>,
    payload: std::result::Result<Json<NewReview>, JsonRejection>,
) -> Result<Json<ApiResponse<Review>>> {
    let id = validate::path_id(&restaurant_id, "Restaurant")?;
    let Json(input) = payload.map_err(rejected)?;
    validate::review(&input)?;
    let review = state
        .catalog
        .add_review(id, input.rating, input.text.trim())
        .await?;
    Ok(success_with(review, "Review added successfully"))
}

async fn list_reviews(
    State(state): State<AppState>,
    Path(restaurant_id): Path<String>,
    query: std::result::Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Review>>>> {
    let id = validate::path_id(&restaurant_id, "Restaurant")?;
    let (offset, count) = page(query)?;
    let reviews = state.catalog.list_reviews(id, offset, count).await?;
    Ok(success(reviews))
}

async fn remove_review(
    State(state): State<AppState>,
    Path((restaurant_id, review_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<String>>> {
    let id = validate::path_id(&restaurant_id, "Restaurant")?;
    let review_id = validate::path_id(&review_id, "Review")?;
    state.catalog.remove_review(id, review_id).await?;
    Ok(success_with(review_id.to_string(), "Review deleted"))
}

async fn list_cuisines(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<String>>>> {
    Ok(success(state.catalog.list_cuisines().await?))
}

async fn cuisine_restaurants(
    State(state): State<AppState>,
    Path(cuisine): Path<String>,
) -> Result<Json<ApiResponse<Vec<String>>>> {
    let cuisine = validate::path_id(&cuisine, "Cuisine")?;
    Ok(success(state.catalog.restaurants_for_cuisine(cuisine).await?))
}
