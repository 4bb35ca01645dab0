//! Key-value store adapter
//!
//! A uniform async interface over the five primitive types (strings,
//! hashes, sets, sorted sets, lists). Every method is atomic for the single
//! key it touches. Nothing here spans keys: a caller that issues several
//! calls must tolerate a later call failing after earlier ones landed.
//!
//! Ranges follow Redis conventions: indices are zero-based, `stop` is
//! inclusive, negative values count from the end.

pub mod memory;
pub mod redis;

pub use memory::MemStore;
pub use redis::RedisStore;

use crate::common::{Result, StoreBackend, StoreConfig};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

#[async_trait]
pub trait KvStore: Send + Sync {
    // === Strings ===
    async fn get(&self, key: &str) -> Result<Option<String>>;
    /// Set a string; `ttl` of `None` stores it without expiry.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()>;

    // === Hashes ===
    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>>;
    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>>;
    async fn hset(&self, key: &str, fields: &[(&str, String)]) -> Result<()>;
    async fn hincrby(&self, key: &str, field: &str, by: i64) -> Result<i64>;
    async fn hincrbyfloat(&self, key: &str, field: &str, by: f64) -> Result<f64>;

    // === Sets ===
    /// Returns whether the member was newly added.
    async fn sadd(&self, key: &str, member: &str) -> Result<bool>;
    async fn smembers(&self, key: &str) -> Result<Vec<String>>;

    // === Sorted sets ===
    /// Insert or overwrite the member's score.
    async fn zadd(&self, key: &str, member: &str, score: f64) -> Result<()>;
    /// Members by descending score over `[start, stop]`.
    async fn zrevrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>>;
    async fn zscore(&self, key: &str, member: &str) -> Result<Option<f64>>;

    // === Lists ===
    /// Push to the head, returning the new length.
    async fn lpush(&self, key: &str, value: &str) -> Result<u64>;
    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>>;
    /// Remove every occurrence of `value`, returning how many were removed.
    async fn lrem(&self, key: &str, value: &str) -> Result<u64>;

    // === Keys ===
    async fn exists(&self, key: &str) -> Result<bool>;
    /// Returns whether the key existed.
    async fn del(&self, key: &str) -> Result<bool>;
    async fn ping(&self) -> Result<()>;
}

/// Open a fresh backend for `config`.
pub async fn connect(config: &StoreConfig) -> Result<Arc<dyn KvStore>> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory store");
            Ok(Arc::new(MemStore::new()))
        }
        StoreBackend::Redis => Ok(Arc::new(RedisStore::connect(config).await?)),
    }
}

static SHARED: OnceCell<Arc<dyn KvStore>> = OnceCell::const_new();

/// Process-wide store, connected on first use and kept for the process
/// lifetime.
///
/// Callers racing on first use all wait on the same initialization; a
/// failed attempt leaves the cell empty and the next caller retries.
/// The config of whichever caller initializes first wins.
pub async fn shared_store(config: &StoreConfig) -> Result<Arc<dyn KvStore>> {
    SHARED
        .get_or_try_init(|| connect(config))
        .await
        .map(Arc::clone)
}

/// Resolve a Redis-style inclusive range against a collection of `len`.
pub(crate) fn resolve_range(len: usize, start: i64, stop: i64) -> Option<(usize, usize)> {
    let len = len as i64;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
    if len == 0 || start > stop || start >= len {
        return None;
    }
    Some((start as usize, stop as usize))
}
