//! Configuration for restaurant-kv

use crate::common::Result;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Environment variable prefix, e.g. `RESTAURANT_KV__STORE__URL`
pub const ENV_PREFIX: &str = "RESTAURANT_KV";

/// Global configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub weather: WeatherConfig,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            store: StoreConfig::default(),
            weather: WeatherConfig::default(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for HTTP API
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,

    /// Maximum accepted request body
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3000))
}
fn default_body_limit() -> usize {
    64 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Redis,
}

/// Key-value store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_backend")]
    pub backend: StoreBackend,

    /// `redis://host:port` or `rediss://host:port`
    #[serde(default = "default_store_url")]
    pub url: String,

    #[serde(default = "default_pool_size")]
    pub pool_size: usize,

    /// Prefix prepended to every key
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

fn default_backend() -> StoreBackend {
    StoreBackend::Redis
}
fn default_store_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}
fn default_pool_size() -> usize {
    4
}
fn default_key_prefix() -> String {
    "bites".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            url: default_store_url(),
            pool_size: default_pool_size(),
            key_prefix: default_key_prefix(),
        }
    }
}

/// Weather lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_weather_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_units")]
    pub units: String,

    /// Lifetime of a cached weather payload
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

fn default_weather_url() -> String {
    "https://api.openweathermap.org/data/2.5/weather".to_string()
}
fn default_units() -> String {
    "imperial".to_string()
}
fn default_cache_ttl() -> u64 {
    60 * 60
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_url(),
            api_key: None,
            units: default_units(),
            cache_ttl_secs: default_cache_ttl(),
        }
    }
}

impl WeatherConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl AppConfig {
    /// Load config from an optional TOML file, then environment overrides.
    ///
    /// Without an explicit path, `restaurant-kv.toml` in the working
    /// directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => config::File::from(p.to_path_buf()).required(true),
            None => config::File::with_name("restaurant-kv").required(false),
        };

        let settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let conf: AppConfig = settings.try_deserialize()?;
        conf.validate()?;
        Ok(conf)
    }

    pub fn validate(&self) -> Result<()> {
        if self.store.pool_size == 0 {
            return Err(crate::Error::InvalidConfig(
                "store.pool_size must be at least 1".into(),
            ));
        }
        if self.weather.cache_ttl_secs == 0 {
            return Err(crate::Error::InvalidConfig(
                "weather.cache_ttl_secs must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let conf = AppConfig::default();
        assert_eq!(conf.server.bind_addr.port(), 3000);
        assert_eq!(conf.store.backend, StoreBackend::Redis);
        assert_eq!(conf.weather.cache_ttl(), Duration::from_secs(3600));
        assert_eq!(conf.weather.units, "imperial");
        assert_eq!(conf.log_level, "info");
        assert!(conf.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
log_level = "debug"

[server]
bind_addr = "127.0.0.1:8080"

[store]
backend = "memory"
key_prefix = "test"

[weather]
cache_ttl_secs = 120
"#
        )
        .unwrap();

        let conf = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(conf.log_level, "debug");
        assert_eq!(conf.server.bind_addr.port(), 8080);
        assert_eq!(conf.store.backend, StoreBackend::Memory);
        assert_eq!(conf.store.key_prefix, "test");
        assert_eq!(conf.store.pool_size, 4);
        assert_eq!(conf.weather.cache_ttl_secs, 120);
    }

    #[test]
    fn test_rejects_zero_ttl() {
        let mut conf = AppConfig::default();
        conf.weather.cache_ttl_secs = 0;
        assert!(conf.validate().is_err());
    }
}
