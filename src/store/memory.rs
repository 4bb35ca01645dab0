//! In-process store
//!
//! Mirrors the Redis semantics the service relies on: typed values per
//! key, WRONGTYPE errors, empty collections disappear, and string TTLs.
//! Expiry is measured on tokio's clock so tests can pause and advance it.

use super::{resolve_range, KvStore};
use crate::common::{Error, Result};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
enum Value {
    Str(String),
    Hash(HashMap<String, String>),
    Set(BTreeSet<String>),
    ZSet(HashMap<String, f64>),
    List(VecDeque<String>),
}

impl Value {
    fn is_empty(&self) -> bool {
        match self {
            Value::Str(_) => false,
            Value::Hash(h) => h.is_empty(),
            Value::Set(s) => s.is_empty(),
            Value::ZSet(z) => z.is_empty(),
            Value::List(l) => l.is_empty(),
        }
    }
}

#[derive(Debug)]
struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

impl Entry {
    fn new(value: Value) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

fn wrong_type(key: &str) -> Error {
    Error::Store(format!(
        "WRONGTYPE Operation against a key holding the wrong kind of value: {}",
        key
    ))
}

/// In-memory store
#[derive(Default)]
pub struct MemStore {
    map: Mutex<HashMap<String, Entry>>,
}

macro_rules! typed_mut {
    ($map:expr, $key:expr, $variant:ident, $init:expr) => {{
        let entry = $map
            .entry($key.to_string())
            .or_insert_with(|| Entry::new(Value::$variant($init)));
        match &mut entry.value {
            Value::$variant(inner) => inner,
            _ => return Err(wrong_type($key)),
        }
    }};
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the map, dropping the key first if it has expired.
    fn live(&self, key: &str) -> MutexGuard<'_, HashMap<String, Entry>> {
        let mut map = self.map.lock().unwrap_or_else(|e| e.into_inner());
        if map.get(key).is_some_and(|e| e.is_expired(Instant::now())) {
            map.remove(key);
        }
        map
    }

    fn drop_if_empty(map: &mut HashMap<String, Entry>, key: &str) {
        if map.get(key).is_some_and(|e| e.value.is_empty()) {
            map.remove(key);
        }
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        let now = Instant::now();
        let map = self.map.lock().unwrap_or_else(|e| e.into_inner());
        map.values().filter(|e| !e.is_expired(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KvStore for MemStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let map = self.live(key);
        match map.get(key).map(|e| &e.value) {
            None => Ok(None),
            Some(Value::Str(s)) => Ok(Some(s.clone())),
            Some(_) => Err(wrong_type(key)),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        let mut map = self.live(key);
        map.insert(
            key.to_string(),
            Entry {
                value: Value::Str(value.to_string()),
                expires_at: ttl.map(|d| Instant::now() + d),
            },
        );
        Ok(())
    }

    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>> {
        let map = self.live(key);
        match map.get(key).map(|e| &e.value) {
            None => Ok(HashMap::new()),
            Some(Value::Hash(h)) => Ok(h.clone()),
            Some(_) => Err(wrong_type(key)),
        }
    }

    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>> {
        let map = self.live(key);
        match map.get(key).map(|e| &e.value) {
            None => Ok(None),
            Some(Value::Hash(h)) => Ok(h.get(field).cloned()),
            Some(_) => Err(wrong_type(key)),
        }
    }

    async fn hset(&self, key: &str, fields: &[(&str, String)]) -> Result<()> {
        let mut map = self.live(key);
        let hash = typed_mut!(map, key, Hash, HashMap::new());
        for (field, value) in fields {
            hash.insert(field.to_string(), value.clone());
        }
        Self::drop_if_empty(&mut map, key);
        Ok(())
    }

    async fn hincrby(&self, key: &str, field: &str, by: i64) -> Result<i64> {
        let mut map = self.live(key);
        let hash = typed_mut!(map, key, Hash, HashMap::new());
        let current: i64 = match hash.get(field) {
            Some(v) => v
                .parse()
                .map_err(|_| Error::Store("ERR hash value is not an integer".into()))?,
            None => 0,
        };
        let next = current
            .checked_add(by)
            .ok_or_else(|| Error::Store("ERR increment or decrement would overflow".into()))?;
        hash.insert(field.to_string(), next.to_string());
        Ok(next)
    }

    async fn hincrbyfloat(&self, key: &str, field: &str, by: f64) -> Result<f64> {
        let mut map = self.live(key);
        let hash = typed_mut!(map, key, Hash, HashMap::new());
        let current: f64 = match hash.get(field) {
            Some(v) => v
                .parse()
                .map_err(|_| Error::Store("ERR hash value is not a float".into()))?,
            None => 0.0,
        };
        let next = current + by;
        if !next.is_finite() {
            return Err(Error::Store(
                "ERR increment would produce NaN or Infinity".into(),
            ));
        }
        hash.insert(field.to_string(), next.to_string());
        Ok(next)
    }

    async fn sadd(&self, key: &str, member: &str) -> Result<bool> {
        let mut map = self.live(key);
        let set = typed_mut!(map, key, Set, BTreeSet::new());
        Ok(set.insert(member.to_string()))
    }

    async fn smembers(&self, key: &str) -> Result<Vec<String>> {
        let map = self.live(key);
        match map.get(key).map(|e| &e.value) {
            None => Ok(Vec::new()),
            Some(Value::Set(s)) => Ok(s.iter().cloned().collect()),
            Some(_) => Err(wrong_type(key)),
        }
    }

    async fn zadd(&self, key: &str, member: &str, score: f64) -> Result<()> {
        if score.is_nan() {
            return Err(Error::Store("ERR value is not a valid float".into()));
        }
        let mut map = self.live(key);
        let zset = typed_mut!(map, key, ZSet, HashMap::new());
        zset.insert(member.to_string(), score);
        Ok(())
    }

    async fn zrevrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>> {
        let map = self.live(key);
        let zset = match map.get(key).map(|e| &e.value) {
            None => return Ok(Vec::new()),
            Some(Value::ZSet(z)) => z,
            Some(_) => return Err(wrong_type(key)),
        };

        // Equal scores fall back to reverse lexicographic member order,
        // as Redis does for REV ranges.
        let mut ranked: Vec<(&String, f64)> = zset.iter().map(|(m, s)| (m, *s)).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| b.0.cmp(a.0)));

        Ok(match resolve_range(ranked.len(), start, stop) {
            Some((from, to)) => ranked[from..=to].iter().map(|(m, _)| (*m).clone()).collect(),
            None => Vec::new(),
        })
    }

    async fn zscore(&self, key: &str, member: &str) -> Result<Option<f64>> {
        let map = self.live(key);
        match map.get(key).map(|e| &e.value) {
            None => Ok(None),
            Some(Value::ZSet(z)) => Ok(z.get(member).copied()),
            Some(_) => Err(wrong_type(key)),
        }
    }

    async fn lpush(&self, key: &str, value: &str) -> Result<u64> {
        let mut map = self.live(key);
        let list = typed_mut!(map, key, List, VecDeque::new());
        list.push_front(value.to_string());
        Ok(list.len() as u64)
    }

    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>> {
        let map = self.live(key);
        let list = match map.get(key).map(|e| &e.value) {
            None => return Ok(Vec::new()),
            Some(Value::List(l)) => l,
            Some(_) => return Err(wrong_type(key)),
        };
        Ok(match resolve_range(list.len(), start, stop) {
            Some((from, to)) => list.range(from..=to).cloned().collect(),
            None => Vec::new(),
        })
    }

    async fn lrem(&self, key: &str, value: &str) -> Result<u64> {
        let mut map = self.live(key);
        let removed = match map.get_mut(key).map(|e| &mut e.value) {
            None => 0,
            Some(Value::List(list)) => {
                let before = list.len();
                list.retain(|v| v != value);
                (before - list.len()) as u64
            }
            Some(_) => return Err(wrong_type(key)),
        };
        Self::drop_if_empty(&mut map, key);
        Ok(removed)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.live(key).contains_key(key))
    }

    async fn del(&self, key: &str) -> Result<bool> {
        Ok(self.live(key).remove(key).is_some())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
