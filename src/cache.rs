use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;

pub const CACHE_DURATION: chrono::Duration = chrono::Duration::minutes(5);

/// Collections a cached query depends on. Writes invalidate by tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CacheTag {
    Rounds,
    Players,
    Courses,
}

#[derive(Clone)]
struct CacheEntry {
    value: Value,
    tags: Vec<CacheTag>,
    cached_time: DateTime<Utc>,
}

#[derive(Clone)]
pub struct QueryCache {
    map: Arc<RwLock<HashMap<String, CacheEntry>>>,
    ttl: chrono::Duration,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(CACHE_DURATION)
    }
}

impl QueryCache {
    #[must_use]
    pub fn new(ttl: chrono::Duration) -> Self {
        Self {
            map: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Fresh cached value for `key`, if any. Entries that no longer deserialize count as misses.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let map = self.map.read().await;
        let entry = map.get(key)?;
        if Utc::now() - entry.cached_time >= self.ttl {
            return None;
        }
        serde_json::from_value(entry.value.clone()).ok()
    }

    pub async fn put<T: Serialize>(&self, key: &str, tags: &[CacheTag], value: &T) {
        match serde_json::to_value(value) {
            Ok(value) => {
                let entry = CacheEntry {
                    value,
                    tags: tags.to_vec(),
                    cached_time: Utc::now(),
                };
                self.map.write().await.insert(key.to_string(), entry);
            }
            Err(e) => tracing::warn!(key, error = %e, "value not cacheable"),
        }
    }

    /// Returns the cached value or runs `load` and caches a successful result.
    ///
    /// # Errors
    ///
    /// Propagates the loader's error; failures are never cached.
    pub async fn get_or_load<T, E, F, Fut>(
        &self,
        key: &str,
        tags: &[CacheTag],
        load: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(hit) = self.get(key).await {
            tracing::trace!(key, "cache hit");
            return Ok(hit);
        }
        let value = load().await?;
        self.put(key, tags, &value).await;
        Ok(value)
    }

    /// Drops every entry carrying any of `tags`; returns how many went.
    pub async fn invalidate(&self, tags: &[CacheTag]) -> usize {
        let mut map = self.map.write().await;
        let before = map.len();
        map.retain(|_, entry| !entry.tags.iter().any(|t| tags.contains(t)));
        let removed = before - map.len();
        tracing::debug!(?tags, removed, "cache invalidated");
        removed
    }

    pub async fn len(&self) -> usize {
        self.map.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.map.read().await.is_empty()
    }
}
