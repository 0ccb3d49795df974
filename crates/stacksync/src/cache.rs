//! Time-to-live cache of fetched payloads.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use crate::content::{CacheKey, ContentEntry};

/// How long a fetched payload may be served without a network call.
pub const CACHE_TTL: Duration = Duration::from_millis(5_000);

/// The last payload fetched for a key.
#[derive(Debug, Clone)]
pub struct CacheRecord {
    pub key: CacheKey,
    pub payload: Vec<ContentEntry>,
    pub fetched_at: Instant,
}

impl CacheRecord {
    /// Time elapsed since the payload was fetched.
    pub fn age(&self) -> Duration {
        self.fetched_at.elapsed()
    }

    /// Whether the record may still be served without a network call.
    pub fn is_fresh(&self) -> bool {
        self.age() < CACHE_TTL
    }
}

/// Shared key → payload cache.
///
/// Cheap to clone; clones share the same storage. Each operation takes the
/// lock once and releases it before returning, so concurrent fetches that
/// complete after a [`clear`](Self::clear) simply repopulate their key.
#[derive(Debug, Clone, Default)]
pub struct TtlCache {
    records: Arc<RwLock<HashMap<CacheKey, CacheRecord>>>,
}

impl TtlCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record for `key` if it is still fresh.
    pub async fn get(&self, key: &CacheKey) -> Option<CacheRecord> {
        let records = self.records.read().await;
        records.get(key).filter(|r| r.is_fresh()).cloned()
    }

    /// Returns the record for `key` regardless of age.
    pub async fn get_stale(&self, key: &CacheKey) -> Option<CacheRecord> {
        let records = self.records.read().await;
        records.get(key).cloned()
    }

    /// Store a payload under `key`, stamped with the current time.
    pub async fn put(&self, key: CacheKey, payload: Vec<ContentEntry>) {
        let record = CacheRecord {
            key: key.clone(),
            payload,
            fetched_at: Instant::now(),
        };
        self.records.write().await.insert(key, record);
    }

    /// Remove every record.
    pub async fn clear(&self) {
        let mut records = self.records.write().await;
        let removed = records.len();
        records.clear();
        debug!(removed, "Cache cleared");
    }

    /// Number of stored records, fresh or stale.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
