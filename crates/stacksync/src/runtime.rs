//! Runtime wiring.
//!
//! [`SyncRuntime`] owns one cache and one fingerprint table and shares them
//! between the content accessors, the change poller and the render
//! orchestrator. Background work (polling, periodic re-render, reload
//! handling) runs as [`TaskHandle`]s that are stopped together.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info, instrument};

use crate::Result;
use crate::cache::TtlCache;
use crate::config::SyncConfig;
use crate::content::SiteContent;
use crate::delivery::DeliveryClient;
use crate::fingerprint::FingerprintTable;
use crate::gateway::Gateway;
use crate::poller::{ChangePoller, CheckReport, ReloadRequest};
use crate::render::{RegionSink, RenderOrchestrator, RenderReport};
use crate::schedule::TaskHandle;
use crate::source::ContentSource;
use crate::types::EntryUid;

/// The assembled sync core.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use stacksync::{SyncConfig, SyncRuntime};
/// use stacksync::render::{Region, RegionSink, RegionView};
///
/// struct Stdout;
///
/// #[async_trait::async_trait]
/// impl RegionSink for Stdout {
///     async fn commit(&self, region: Region, view: RegionView) -> stacksync::Result<()> {
///         println!("{region}: {} entries", view.entry_count());
///         Ok(())
///     }
/// }
///
/// # async fn example() -> stacksync::Result<()> {
/// let config = SyncConfig::from_env()?;
/// let mut runtime = SyncRuntime::connect(config, Arc::new(Stdout))?;
/// runtime.start().await;
/// // ...
/// runtime.stop().await;
/// # Ok(())
/// # }
/// ```
pub struct SyncRuntime {
    config: SyncConfig,
    content: SiteContent,
    poller: ChangePoller,
    orchestrator: RenderOrchestrator,
    reload_rx: Option<mpsc::UnboundedReceiver<ReloadRequest>>,
    tasks: Vec<TaskHandle>,
}

impl SyncRuntime {
    /// Assemble a runtime over an arbitrary content source.
    pub fn new(
        config: SyncConfig,
        source: Arc<dyn ContentSource>,
        sink: Arc<dyn RegionSink>,
    ) -> Self {
        let cache = TtlCache::new();
        let fingerprints = FingerprintTable::new();
        let content = SiteContent::new(Gateway::new(source, cache));

        let (reload_tx, reload_rx) = mpsc::unbounded_channel();
        let poller =
            ChangePoller::new(content.clone(), fingerprints.clone()).with_reload_channel(reload_tx);
        let orchestrator = RenderOrchestrator::new(content.clone(), fingerprints, sink)
            .with_blog_post_limit(config.blog_post_limit);

        Self {
            config,
            content,
            poller,
            orchestrator,
            reload_rx: Some(reload_rx),
            tasks: Vec::new(),
        }
    }

    /// Render and watch this hero entry instead of the first one listed.
    pub fn with_hero_entry(mut self, uid: EntryUid) -> Self {
        self.poller = self.poller.with_hero_entry(uid.clone());
        self.orchestrator = self.orchestrator.with_hero_entry(uid);
        self
    }

    /// Assemble a runtime talking to the Delivery API described by `config`.
    pub fn connect(config: SyncConfig, sink: Arc<dyn RegionSink>) -> Result<Self> {
        let client = DeliveryClient::from_config(&config)?;
        Ok(Self::new(config, Arc::new(client), sink))
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// The content accessors, sharing this runtime's cache.
    pub fn content(&self) -> &SiteContent {
        &self.content
    }

    pub fn cache(&self) -> &TtlCache {
        self.content.gateway().cache()
    }

    pub fn fingerprints(&self) -> &FingerprintTable {
        self.poller.fingerprints()
    }

    pub fn orchestrator(&self) -> &RenderOrchestrator {
        &self.orchestrator
    }

    pub fn poller(&self) -> &ChangePoller {
        &self.poller
    }

    /// Render every region.
    pub async fn render_all(&self, force_refresh: bool) -> RenderReport {
        self.orchestrator.render_all(force_refresh).await
    }

    /// Clear the cache and fingerprints, then re-render everything.
    pub async fn force_refresh(&self) -> RenderReport {
        self.orchestrator.force_refresh().await
    }

    /// Run one change-detection cycle now.
    pub async fn check_for_updates(&self) -> bool {
        self.poller.check_for_updates().await
    }

    /// Run one change-detection cycle now and report per type.
    pub async fn check_cycle(&self) -> CheckReport {
        self.poller.check_cycle().await
    }

    /// Arm periodic change polling if enabled in the configuration.
    ///
    /// Returns whether a poller task is now running.
    pub fn start_auto_refresh(&mut self) -> bool {
        if self.is_running("change-poller") {
            return true;
        }
        match self.poller.start_auto_refresh(&self.config) {
            Some(task) => {
                self.tasks.push(task);
                true
            }
            None => false,
        }
    }

    /// Arm the fixed-cadence forced re-render.
    pub fn start_periodic_render(&mut self) {
        if self.is_running("periodic-render") {
            return;
        }
        if let Err(err) = self.config.validate() {
            error!(error = %err, "Periodic render not started");
            return;
        }
        let task = self
            .orchestrator
            .start_periodic_render(self.config.render_interval());
        self.tasks.push(task);
    }

    /// Honour reload requests from the poller: after the configured delay,
    /// every region is re-rendered with a forced refresh.
    ///
    /// The reload channel can only be consumed once; later calls are no-ops.
    pub fn start_reload_listener(&mut self) {
        let Some(rx) = self.reload_rx.take() else {
            return;
        };
        let orchestrator = self.orchestrator.clone();
        let delay = self.config.reload_delay();
        self.tasks.push(TaskHandle::spawn_listener(
            "reload-listener",
            rx,
            move |request: ReloadRequest| {
                let orchestrator = orchestrator.clone();
                async move {
                    info!(changed = ?request.changed, ?delay, "Reloading after remote changes");
                    tokio::time::sleep(delay).await;
                    orchestrator.render_all(true).await;
                }
            },
        ));
    }

    /// Initial render, then every background task the configuration enables.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> RenderReport {
        let report = self.render_all(false).await;
        self.start_reload_listener();
        if self.config.periodic_render_enabled {
            self.start_periodic_render();
        }
        self.start_auto_refresh();
        info!(tasks = ?self.running_tasks(), "Sync runtime started");
        report
    }

    /// Stop every background task, waiting for in-progress work to finish.
    pub async fn stop(&mut self) {
        for task in self.tasks.drain(..) {
            task.stop().await;
        }
        info!("Sync runtime stopped");
    }

    /// Names of the background tasks currently armed.
    pub fn running_tasks(&self) -> Vec<&'static str> {
        self.tasks
            .iter()
            .filter(|t| !t.is_finished())
            .map(|t| t.name())
            .collect()
    }

    fn is_running(&self, name: &str) -> bool {
        self.tasks
            .iter()
            .any(|t| t.name() == name && !t.is_finished())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DeliveryCredentials;
    use crate::render::{Region, RegionView};
    use crate::testing::ScriptedSource;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct CountingSink {
        commits: AtomicUsize,
    }

    #[async_trait]
    impl RegionSink for CountingSink {
        async fn commit(&self, _region: Region, _view: RegionView) -> Result<()> {
            self.commits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn config() -> SyncConfig {
        SyncConfig::new(DeliveryCredentials::new("key", "token"))
    }

    fn source() -> Arc<ScriptedSource> {
        let source = Arc::new(ScriptedSource::new());
        source.set("hero_section", json!([{"uid": "h1", "title": "Old"}]));
        source.set("feature_card", json!([{"title": "A", "order": 1}]));
        source
    }

    #[tokio::test(start_paused = true)]
    async fn default_start_arms_render_and_reload_only() {
        let sink = Arc::new(CountingSink::default());
        let mut runtime = SyncRuntime::new(config(), source(), sink.clone());

        let report = runtime.start().await;
        assert!(report.is_complete());
        assert_eq!(sink.commits.load(Ordering::SeqCst), 6);

        let mut tasks = runtime.running_tasks();
        tasks.sort_unstable();
        assert_eq!(tasks, vec!["periodic-render", "reload-listener"]);

        runtime.stop().await;
        assert!(runtime.running_tasks().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn detected_change_triggers_delayed_forced_render() {
        let source = source();
        let sink = Arc::new(CountingSink::default());
        let mut config = config();
        config.periodic_render_enabled = false;
        let mut runtime = SyncRuntime::new(config, source.clone(), sink.clone());

        runtime.start().await;
        assert!(!runtime.check_for_updates().await);
        let commits = sink.commits.load(Ordering::SeqCst);

        source.set("hero_section", json!([{"uid": "h1", "title": "New"}]));
        assert!(runtime.check_for_updates().await);
        assert!(runtime.cache().is_empty().await);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(sink.commits.load(Ordering::SeqCst), commits);
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(sink.commits.load(Ordering::SeqCst), commits + 6);

        runtime.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn auto_refresh_only_when_enabled() {
        let mut runtime =
            SyncRuntime::new(config(), source(), Arc::new(CountingSink::default()));
        assert!(!runtime.start_auto_refresh());

        let mut enabled = config();
        enabled.auto_refresh_enabled = true;
        let mut runtime =
            SyncRuntime::new(enabled, source(), Arc::new(CountingSink::default()));
        assert!(runtime.start_auto_refresh());
        assert!(runtime.start_auto_refresh());
        assert_eq!(runtime.running_tasks(), vec!["change-poller"]);

        tokio::time::sleep(Duration::from_millis(2_100)).await;
        assert_eq!(runtime.fingerprints().len().await, 2);
        runtime.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn zero_intervals_arm_no_timers() {
        let mut config = config();
        config.auto_refresh_enabled = true;
        config.render_interval_ms = 0;
        let mut runtime =
            SyncRuntime::new(config, source(), Arc::new(CountingSink::default()));

        let report = runtime.start().await;
        assert!(report.is_complete());
        assert_eq!(runtime.running_tasks(), vec!["reload-listener"]);
        runtime.stop().await;
    }

    #[tokio::test]
    async fn pinned_hero_is_rendered_and_watched() {
        let source = source();
        source.set(
            "hero_section",
            json!([{"uid": "h1", "title": "One"}, {"uid": "h2", "title": "Two"}]),
        );
        let sink = Arc::new(CountingSink::default());
        let runtime = SyncRuntime::new(config(), source.clone(), sink)
            .with_hero_entry(EntryUid::new("h2").unwrap());

        runtime.render_all(false).await;
        assert!(!runtime.check_for_updates().await);
        source.set(
            "hero_section",
            json!([{"uid": "h1", "title": "One"}, {"uid": "h2", "title": "Two, edited"}]),
        );
        assert!(runtime.check_for_updates().await);
    }
}
