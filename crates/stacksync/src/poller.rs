//! Change-detection poller.
//!
//! Each cycle re-fetches a representative entry of every tracked content
//! type straight from the source, fingerprints it, and compares with the
//! last known fingerprint. Any difference clears the cache and requests a
//! full reload.

use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use crate::config::SyncConfig;
use crate::content::{ContentEntry, ContentKind, SiteContent};
use crate::fingerprint::{Fingerprint, FingerprintTable, Observation};
use crate::normalize::first;
use crate::schedule::TaskHandle;
use crate::types::EntryUid;

/// Content types checked by every cycle, in check order.
pub const TRACKED_KINDS: [ContentKind; 6] = [
    ContentKind::HeroSection,
    ContentKind::FeatureCard,
    ContentKind::BlogPost,
    ContentKind::CtaSection,
    ContentKind::FooterSection,
    ContentKind::NavigationMenu,
];

/// Sent when a cycle detects remote changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadRequest {
    pub changed: Vec<ContentKind>,
}

/// Outcome of one check cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// Types seen for the first time.
    pub seeded: Vec<ContentKind>,
    /// Types whose fingerprint changed.
    pub changed: Vec<ContentKind>,
    /// Types that could not be checked this cycle.
    pub unavailable: Vec<ContentKind>,
}

impl CheckReport {
    pub fn has_changes(&self) -> bool {
        !self.changed.is_empty()
    }
}

/// Detects remote changes by fingerprinting.
#[derive(Clone)]
pub struct ChangePoller {
    content: SiteContent,
    fingerprints: FingerprintTable,
    tracked: Vec<ContentKind>,
    hero_entry: Option<EntryUid>,
    reload: Option<mpsc::UnboundedSender<ReloadRequest>>,
}

impl ChangePoller {
    /// Create a poller over the default tracked types.
    pub fn new(content: SiteContent, fingerprints: FingerprintTable) -> Self {
        Self {
            content,
            fingerprints,
            tracked: TRACKED_KINDS.to_vec(),
            hero_entry: None,
            reload: None,
        }
    }

    /// Check a custom set of content types instead of the defaults.
    pub fn with_tracked(mut self, tracked: impl Into<Vec<ContentKind>>) -> Self {
        self.tracked = tracked.into();
        self
    }

    /// Fingerprint this hero entry instead of the first one listed.
    pub fn with_hero_entry(mut self, uid: EntryUid) -> Self {
        self.hero_entry = Some(uid);
        self
    }

    /// Where reload requests are sent when a cycle detects changes.
    pub fn with_reload_channel(mut self, tx: mpsc::UnboundedSender<ReloadRequest>) -> Self {
        self.reload = Some(tx);
        self
    }

    pub fn fingerprints(&self) -> &FingerprintTable {
        &self.fingerprints
    }

    /// Run one check cycle; returns whether any tracked type changed.
    pub async fn check_for_updates(&self) -> bool {
        self.check_cycle().await.has_changes()
    }

    /// Run one check cycle and report per type.
    ///
    /// Types are checked sequentially and independently: a type that cannot
    /// be fetched is logged and counts as unchanged. On changes the cache is
    /// cleared before this returns, and a reload is requested.
    #[instrument(skip(self))]
    pub async fn check_cycle(&self) -> CheckReport {
        info!("Checking for content updates");
        let mut report = CheckReport::default();

        for &kind in &self.tracked {
            let Some(entry) = self.representative(kind).await else {
                warn!(content_type = %kind, "Could not check content type for updates");
                report.unavailable.push(kind);
                continue;
            };

            let fingerprint = Fingerprint::of(&entry);
            match self
                .fingerprints
                .observe(&kind.content_type(), fingerprint.clone())
                .await
            {
                Observation::First => {
                    debug!(content_type = %kind, "Stored initial fingerprint");
                    report.seeded.push(kind);
                }
                Observation::Unchanged => {}
                Observation::Changed { previous } => {
                    info!(
                        content_type = %kind,
                        previous = %previous,
                        current = %fingerprint,
                        "Changes detected"
                    );
                    report.changed.push(kind);
                }
            }
        }

        if report.has_changes() {
            self.content.gateway().cache().clear().await;
            info!(changed = ?report.changed, "Content updated remotely, cache cleared");
            self.request_reload(&report.changed);
        } else {
            debug!("No changes detected");
        }

        report
    }

    /// Arm periodic polling: one check after the initial delay, then one per
    /// poll interval. Returns `None` when auto refresh is disabled or the
    /// configuration is invalid.
    pub fn start_auto_refresh(&self, config: &SyncConfig) -> Option<TaskHandle> {
        if !config.auto_refresh_enabled {
            info!("Auto refresh disabled; use a manual check or force refresh instead");
            return None;
        }
        if let Err(err) = config.validate() {
            error!(error = %err, "Auto refresh not started");
            return None;
        }

        info!(
            interval_ms = config.poll_interval_ms,
            "Auto refresh enabled"
        );
        let poller = self.clone();
        Some(TaskHandle::spawn_periodic(
            "change-poller",
            Some(config.initial_check_delay()),
            config.poll_interval(),
            move || {
                let poller = poller.clone();
                async move {
                    poller.check_for_updates().await;
                }
            },
        ))
    }

    /// Fetch the entry whose fingerprint stands for a whole content type,
    /// always bypassing the cache.
    async fn representative(&self, kind: ContentKind) -> Option<ContentEntry> {
        match kind {
            ContentKind::BlogPost => first(self.content.get_blog_posts(1, true).await),
            ContentKind::HeroSection => {
                self.content
                    .get_hero_section(true, self.hero_entry.as_ref())
                    .await
            },
            _ => first(self.content.list(kind, true).await),
        }
    }

    fn request_reload(&self, changed: &[ContentKind]) {
        if let Some(tx) = &self.reload {
            let request = ReloadRequest {
                changed: changed.to_vec(),
            };
            if tx.send(request).is_err() {
                warn!("Reload listener is gone; reload request dropped");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::TtlCache;
    use crate::gateway::Gateway;
    use crate::testing::ScriptedSource;
    use serde_json::json;
    use std::sync::Arc;

    struct Fixture {
        source: Arc<ScriptedSource>,
        cache: TtlCache,
        poller: ChangePoller,
        reloads: mpsc::UnboundedReceiver<ReloadRequest>,
    }

    fn fixture() -> Fixture {
        let source = Arc::new(ScriptedSource::new());
        let cache = TtlCache::new();
        let content = SiteContent::new(Gateway::new(source.clone(), cache.clone()));
        let (tx, reloads) = mpsc::unbounded_channel();
        let poller = ChangePoller::new(content, FingerprintTable::new()).with_reload_channel(tx);
        for kind in TRACKED_KINDS {
            source.set(
                kind.uid_str(),
                json!([{"uid": format!("{kind}-1"), "title": "t", "updated_at": "2024-01-01T00:00:00Z"}]),
            );
        }
        Fixture {
            source,
            cache,
            poller,
            reloads,
        }
    }

    #[tokio::test]
    async fn first_cycle_seeds_without_reload() {
        let mut f = fixture();
        let report = f.poller.check_cycle().await;
        assert_eq!(report.seeded.len(), TRACKED_KINDS.len());
        assert!(!report.has_changes());
        assert!(f.reloads.try_recv().is_err());
    }

    #[tokio::test]
    async fn identical_content_reports_no_change() {
        let f = fixture();
        assert!(!f.poller.check_for_updates().await);
        assert!(!f.poller.check_for_updates().await);
    }

    #[tokio::test]
    async fn updated_at_change_is_detected() {
        let mut f = fixture();
        f.poller.check_for_updates().await;
        let key = ContentKind::FeatureCard.query().cache_key();
        f.cache.put(key, Vec::new()).await;

        f.source.set(
            "feature_card",
            json!([{"uid": "feature_card-1", "title": "t", "updated_at": "2024-06-01T00:00:00Z"}]),
        );
        let report = f.poller.check_cycle().await;
        assert_eq!(report.changed, vec![ContentKind::FeatureCard]);
        assert!(f.cache.is_empty().await);
        assert_eq!(
            f.reloads.try_recv().unwrap(),
            ReloadRequest {
                changed: vec![ContentKind::FeatureCard]
            }
        );

        // The new fingerprint is now the baseline.
        assert!(!f.poller.check_for_updates().await);
    }

    #[tokio::test]
    async fn checks_always_bypass_the_cache() {
        let f = fixture();
        f.poller.check_for_updates().await;
        f.poller.check_for_updates().await;
        assert_eq!(f.source.calls("hero_section"), 2);
        assert_eq!(f.source.calls("navigation_menu"), 2);
        assert!(f.cache.is_empty().await);
    }

    #[tokio::test]
    async fn failing_type_does_not_abort_cycle() {
        let f = fixture();
        f.poller.check_for_updates().await;

        f.source.fail("hero_section");
        f.source.set(
            "footer_section",
            json!([{"uid": "footer_section-1", "section_title": "Company", "updated_at": "2025-01-01T00:00:00Z"}]),
        );
        let report = f.poller.check_cycle().await;
        assert_eq!(report.unavailable, vec![ContentKind::HeroSection]);
        assert_eq!(report.changed, vec![ContentKind::FooterSection]);
    }

    #[tokio::test]
    async fn failed_check_never_reads_the_cache() {
        let mut f = fixture();
        let v1 = json!([{"uid": "feature_card-1", "title": "t", "updated_at": "v1"}]);
        let v2 = json!([{"uid": "feature_card-1", "title": "t", "updated_at": "v2"}]);

        f.source.set("feature_card", v1);
        f.poller.content.list(ContentKind::FeatureCard, false).await;
        f.source.set("feature_card", v2);
        f.poller.check_cycle().await;

        f.source.fail("feature_card");
        let report = f.poller.check_cycle().await;
        assert!(report.changed.is_empty());
        assert_eq!(report.unavailable, vec![ContentKind::FeatureCard]);
        assert_eq!(f.cache.len().await, 1);
        assert!(f.reloads.try_recv().is_err());
    }

    #[tokio::test]
    async fn pinned_hero_changes_are_detected() {
        let f = fixture();
        let hero = |title: &str| {
            json!([
                {"uid": "h1", "title": "first", "updated_at": "2024-01-01T00:00:00Z"},
                {"uid": "h2", "title": title, "updated_at": "2024-01-01T00:00:00Z"}
            ])
        };
        f.source.set("hero_section", hero("before"));
        let poller = f.poller.clone().with_hero_entry(EntryUid::new("h2").unwrap());

        poller.check_cycle().await;
        f.source.set("hero_section", hero("after"));
        let report = poller.check_cycle().await;
        assert_eq!(report.changed, vec![ContentKind::HeroSection]);
    }

    #[tokio::test]
    async fn posts_are_checked_with_limit_one() {
        let f = fixture();
        f.poller.check_for_updates().await;
        assert_eq!(f.source.last_limit("blog_post"), Some(1));
    }

    #[tokio::test]
    async fn auto_refresh_disabled_by_default() {
        let f = fixture();
        let config = SyncConfig::new(crate::DeliveryCredentials::new("k", "t"));
        assert!(f.poller.start_auto_refresh(&config).is_none());
    }

    #[tokio::test]
    async fn auto_refresh_refuses_zero_interval() {
        let f = fixture();
        let mut config = SyncConfig::new(crate::DeliveryCredentials::new("k", "t"));
        config.auto_refresh_enabled = true;
        config.poll_interval_ms = 0;
        assert!(f.poller.start_auto_refresh(&config).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn auto_refresh_runs_initial_and_periodic_checks() {
        let f = fixture();
        let mut config = SyncConfig::new(crate::DeliveryCredentials::new("k", "t"));
        config.auto_refresh_enabled = true;

        let handle = f.poller.start_auto_refresh(&config).unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2_100)).await;
        assert_eq!(f.source.calls("cta_section"), 1);
        tokio::time::sleep(std::time::Duration::from_secs(3)).await;
        assert_eq!(f.source.calls("cta_section"), 2);
        handle.stop().await;
    }
}
