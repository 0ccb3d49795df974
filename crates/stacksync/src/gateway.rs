//! Remote content gateway: cache-aware, failure-tolerant fetches.

use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use crate::cache::TtlCache;
use crate::content::{CacheKey, ContentEntry, ContentTypeQuery};
use crate::source::ContentSource;
use crate::types::{ContentTypeUid, EntryUid};

/// Wraps a [`ContentSource`] with the shared [`TtlCache`].
///
/// The gateway never returns an error. Transport and API failures degrade
/// to the last cached payload for the key (however old), or `None`; a
/// response without entries is `None`. Fetches with `skip_cache` never touch
/// the cache, so their failures are always `None`.
#[derive(Clone)]
pub struct Gateway {
    source: Arc<dyn ContentSource>,
    cache: TtlCache,
}

impl Gateway {
    /// Create a gateway over a source and a shared cache.
    pub fn new(source: Arc<dyn ContentSource>, cache: TtlCache) -> Self {
        Self { source, cache }
    }

    /// The shared cache.
    pub fn cache(&self) -> &TtlCache {
        &self.cache
    }

    /// Fetch the entries for a query.
    ///
    /// A fresh cache record is served without a network call unless
    /// `skip_cache` is set. Successful non-skipping fetches rewrite the record.
    #[instrument(skip(self, query), fields(content_type = %query.content_type))]
    pub async fn fetch(
        &self,
        query: &ContentTypeQuery,
        skip_cache: bool,
    ) -> Option<Vec<ContentEntry>> {
        let key = query.cache_key();

        if !skip_cache && let Some(record) = self.cache.get(&key).await {
            debug!(%key, "Serving from cache");
            return Some(record.payload);
        }

        debug!(%key, skip_cache, "Fetching from Delivery API");
        match self.source.entries(query).await {
            Ok(Some(entries)) => {
                if !skip_cache {
                    self.cache.put(key, entries.clone()).await;
                }
                info!(count = entries.len(), "Fetched entries");
                Some(entries)
            }
            Ok(None) => {
                warn!("No entries found");
                None
            }
            Err(err) => {
                error!(error = %err, "Failed to fetch entries");
                self.fallback(&key, skip_cache).await
            }
        }
    }

    /// Fetch a single entry by UID, with the same caching and degradation
    /// rules as [`fetch`](Self::fetch).
    #[instrument(skip(self))]
    pub async fn fetch_entry(
        &self,
        content_type: &ContentTypeUid,
        uid: &EntryUid,
        skip_cache: bool,
    ) -> Option<ContentEntry> {
        let key = CacheKey::for_entry(content_type, uid);

        if !skip_cache && let Some(record) = self.cache.get(&key).await {
            debug!(%key, "Serving entry from cache");
            return record.payload.into_iter().next();
        }

        match self.source.entry(content_type, uid).await {
            Ok(Some(entry)) => {
                if !skip_cache {
                    self.cache.put(key, vec![entry.clone()]).await;
                }
                info!("Fetched entry");
                Some(entry)
            }
            Ok(None) => {
                warn!("Entry not found in response");
                None
            }
            Err(err) => {
                error!(error = %err, "Failed to fetch entry");
                self.fallback(&key, skip_cache)
                    .await
                    .and_then(|payload| payload.into_iter().next())
            }
        }
    }

    /// Stale payload for a failed fetch. A caller bypassing the cache wants
    /// what the remote holds now, so it gets nothing rather than old data.
    async fn fallback(&self, key: &CacheKey, skip_cache: bool) -> Option<Vec<ContentEntry>> {
        if skip_cache {
            return None;
        }
        let record = self.cache.get_stale(key).await?;
        warn!(%key, age_ms = record.age().as_millis() as u64, "Serving stale cache after failure");
        Some(record.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedSource;
    use serde_json::json;
    use std::time::Duration;

    fn query() -> ContentTypeQuery {
        ContentTypeQuery::new(ContentTypeUid::new("feature_card").unwrap())
    }

    fn setup() -> (Arc<ScriptedSource>, Gateway) {
        let source = Arc::new(ScriptedSource::new());
        let gateway = Gateway::new(source.clone(), TtlCache::new());
        (source, gateway)
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_cache_skips_network() {
        let (source, gateway) = setup();
        source.set("feature_card", json!([{"title": "CMS"}]));

        assert_eq!(gateway.fetch(&query(), false).await.unwrap().len(), 1);
        tokio::time::advance(Duration::from_millis(4_000)).await;
        assert_eq!(gateway.fetch(&query(), false).await.unwrap().len(), 1);
        assert_eq!(source.calls("feature_card"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_cache_refetches() {
        let (source, gateway) = setup();
        source.set("feature_card", json!([{"title": "CMS"}]));

        gateway.fetch(&query(), false).await;
        tokio::time::advance(Duration::from_millis(5_000)).await;
        gateway.fetch(&query(), false).await;
        assert_eq!(source.calls("feature_card"), 2);
    }

    #[tokio::test]
    async fn skip_cache_neither_reads_nor_writes() {
        let (source, gateway) = setup();
        source.set("feature_card", json!([{"title": "CMS"}]));

        gateway.fetch(&query(), false).await;
        gateway.fetch(&query(), true).await;
        assert_eq!(source.calls("feature_card"), 2);

        gateway.cache().clear().await;
        gateway.fetch(&query(), true).await;
        assert!(gateway.cache().is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_falls_back_to_stale_cache() {
        let (source, gateway) = setup();
        source.set("feature_card", json!([{"title": "CMS"}]));
        gateway.fetch(&query(), false).await;

        tokio::time::advance(Duration::from_secs(60)).await;
        source.fail("feature_card");
        let entries = gateway.fetch(&query(), false).await.unwrap();
        assert_eq!(entries[0].str_field("title"), Some("CMS"));
    }

    #[tokio::test]
    async fn failure_with_skip_cache_ignores_stale_record() {
        let (source, gateway) = setup();
        source.set("feature_card", json!([{"title": "CMS"}]));
        gateway.fetch(&query(), false).await;

        source.fail("feature_card");
        assert!(gateway.fetch(&query(), true).await.is_none());
        assert_eq!(gateway.cache().len().await, 1);
    }

    #[tokio::test]
    async fn failure_without_cache_is_none() {
        let (source, gateway) = setup();
        source.fail("feature_card");
        assert!(gateway.fetch(&query(), false).await.is_none());
    }

    #[tokio::test]
    async fn missing_entries_is_none_and_not_cached() {
        let (source, gateway) = setup();
        source.set_missing("feature_card");
        assert!(gateway.fetch(&query(), false).await.is_none());
        assert!(gateway.cache().is_empty().await);
    }

    #[tokio::test]
    async fn entry_fetch_is_cached_under_its_own_key() {
        let (source, gateway) = setup();
        source.set("hero_section", json!([{"uid": "blt1", "title": "Hero"}]));
        let ct = ContentTypeUid::new("hero_section").unwrap();
        let uid = EntryUid::new("blt1").unwrap();

        let entry = gateway.fetch_entry(&ct, &uid, false).await.unwrap();
        assert_eq!(entry.uid(), Some("blt1"));
        gateway.fetch_entry(&ct, &uid, false).await;
        assert_eq!(source.calls("hero_section"), 1);
        assert!(
            gateway
                .cache()
                .get(&CacheKey::for_entry(&ct, &uid))
                .await
                .is_some()
        );
    }
}
