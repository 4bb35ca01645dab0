//! Common utilities and types shared across restaurant-kv

pub mod config;
pub mod error;
pub mod keys;
pub mod tracing_middleware;
pub mod utils;

pub use config::{AppConfig, ServerConfig, StoreBackend, StoreConfig, WeatherConfig};
pub use error::{Error, Result};
pub use keys::Keys;
pub use utils::{average_stars, index_range, page_offset, round_to_tenth, timestamp_now_millis, Coordinates};
