//! # restaurant-kv
//!
//! Restaurants and reviews served from a key-value store, with no
//! relational queries. Secondary indexes are emulated with the store's
//! primitives:
//! - a sorted set ranks restaurants by average rating
//! - cuisine sets act as inverted indexes
//! - a running star total keeps the average current on every review
//! - weather lookups are cached in TTL'd strings
//!
//! ## Architecture
//!
//! ```text
//!   HTTP (axum)
//!        │
//! ┌──────▼──────────────────────────────────────────┐
//! │ Catalog                                         │
//! │  RestaurantRepository ──► IndexMaintainer       │
//! │  ReviewLedger ──────────► IndexMaintainer       │
//! │  WeatherCache ──────────► WeatherProvider (HTTP)│
//! └──────┬──────────────────────────────────────────┘
//!        │ KvStore
//!   ┌────▼─────┐   ┌──────────┐
//!   │ Redis    │ or│ MemStore │
//!   └──────────┘   └──────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! WEATHER_API_KEY=... restaurant-kv serve --bind 0.0.0.0:3000 --redis-url redis://127.0.0.1:6379
//! ```

pub mod api;
pub mod catalog;
pub mod common;
pub mod store;

// Re-export commonly used types
pub use api::Server;
pub use catalog::Catalog;
pub use common::{AppConfig, Error, Result};
pub use store::KvStore;

/// Current version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
