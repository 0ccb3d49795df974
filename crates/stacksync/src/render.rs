//! Render orchestration.
//!
//! The orchestrator fans out one fetch-normalize-project operation per
//! content region, joins them, and commits each region's view to a
//! [`RegionSink`] independently. A failing region is logged and reported;
//! it never prevents the others from committing.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::join_all;
use serde::Serialize;
use tracing::{debug, error, info, instrument};

use crate::Result;
use crate::content::{ContentEntry, SiteContent};
use crate::fingerprint::FingerprintTable;
use crate::schedule::TaskHandle;
use crate::types::EntryUid;

/// A content region of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Navigation,
    Hero,
    Features,
    Posts,
    Cta,
    Footer,
}

impl Region {
    /// Every region, in page order.
    pub const ALL: [Region; 6] = [
        Region::Navigation,
        Region::Hero,
        Region::Features,
        Region::Posts,
        Region::Cta,
        Region::Footer,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Region::Navigation => "navigation",
            Region::Hero => "hero",
            Region::Features => "features",
            Region::Posts => "posts",
            Region::Cta => "cta",
            Region::Footer => "footer",
        }
    }

    fn placeholder(&self) -> &'static str {
        match self {
            Region::Navigation => "No navigation items available",
            Region::Hero => "No hero content available",
            Region::Features => "No feature cards available",
            Region::Posts => "No blog posts available",
            Region::Cta => "No call to action available",
            Region::Footer => "No footer sections available",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The projected content of one region, ready for templating.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum RegionView {
    Navigation(Vec<ContentEntry>),
    /// The hero entry, plus company logos when it carries a `badge_label`.
    Hero {
        hero: ContentEntry,
        logos: Vec<ContentEntry>,
    },
    Features(Vec<ContentEntry>),
    Posts(Vec<ContentEntry>),
    Cta(ContentEntry),
    Footer(Vec<ContentEntry>),
    /// Shown instead of an empty or broken layout when a region has no content.
    Placeholder { message: String },
}

impl RegionView {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, RegionView::Placeholder { .. })
    }

    /// Number of entries in the view (logos included for the hero).
    pub fn entry_count(&self) -> usize {
        match self {
            RegionView::Navigation(e)
            | RegionView::Features(e)
            | RegionView::Posts(e)
            | RegionView::Footer(e) => e.len(),
            RegionView::Hero { logos, .. } => 1 + logos.len(),
            RegionView::Cta(_) => 1,
            RegionView::Placeholder { .. } => 0,
        }
    }
}

/// The presentation layer.
///
/// Implementations replace a region's content with `view` atomically:
/// either the whole view is shown or the previous content stays.
#[async_trait]
pub trait RegionSink: Send + Sync {
    async fn commit(&self, region: Region, view: RegionView) -> Result<()>;
}

/// Outcome of one [`RenderOrchestrator::render_all`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub committed: Vec<Region>,
    pub failed: Vec<(Region, String)>,
}

impl RenderReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Coordinates fetching and committing every content region.
#[derive(Clone)]
pub struct RenderOrchestrator {
    content: SiteContent,
    fingerprints: FingerprintTable,
    sink: Arc<dyn RegionSink>,
    blog_post_limit: u32,
    hero_entry: Option<EntryUid>,
}

impl RenderOrchestrator {
    pub fn new(
        content: SiteContent,
        fingerprints: FingerprintTable,
        sink: Arc<dyn RegionSink>,
    ) -> Self {
        Self {
            content,
            fingerprints,
            sink,
            blog_post_limit: 100,
            hero_entry: None,
        }
    }

    /// Number of posts shown by the posts region.
    pub fn with_blog_post_limit(mut self, limit: u32) -> Self {
        self.blog_post_limit = limit;
        self
    }

    /// Pin the hero region to a specific entry.
    pub fn with_hero_entry(mut self, uid: EntryUid) -> Self {
        self.hero_entry = Some(uid);
        self
    }

    /// Render every region concurrently.
    ///
    /// With `force_refresh` the cache is cleared before any fetch is issued.
    #[instrument(skip(self))]
    pub async fn render_all(&self, force_refresh: bool) -> RenderReport {
        info!("Rendering content");
        if force_refresh {
            self.content.gateway().cache().clear().await;
        }

        let outcomes = join_all(Region::ALL.map(|region| async move {
            (region, self.render_region(region).await)
        }))
        .await;

        let mut report = RenderReport::default();
        for (region, outcome) in outcomes {
            match outcome {
                Ok(()) => report.committed.push(region),
                Err(err) => {
                    error!(%region, error = %err, "Failed to render region");
                    report.failed.push((region, err.to_string()));
                }
            }
        }

        info!(
            committed = report.committed.len(),
            failed = report.failed.len(),
            "Render finished"
        );
        report
    }

    /// Forget all cached content and fingerprints, then re-render everything.
    pub async fn force_refresh(&self) -> RenderReport {
        info!("Force refreshing all content");
        self.content.gateway().cache().clear().await;
        self.fingerprints.clear().await;
        self.render_all(true).await
    }

    /// Re-render every region (forcing a refresh) on a fixed cadence,
    /// independent of change polling.
    pub fn start_periodic_render(&self, interval: Duration) -> TaskHandle {
        let orchestrator = self.clone();
        TaskHandle::spawn_periodic("periodic-render", None, interval, move || {
            let orchestrator = orchestrator.clone();
            async move {
                orchestrator.render_all(true).await;
            }
        })
    }

    /// Fetch, project and commit one region.
    pub async fn render_region(&self, region: Region) -> Result<()> {
        let view = self.project(region).await;
        debug!(%region, entries = view.entry_count(), "Committing region");
        self.sink.commit(region, view).await
    }

    async fn project(&self, region: Region) -> RegionView {
        let view = match region {
            Region::Navigation => {
                non_empty(self.content.get_navigation_menu(false).await).map(RegionView::Navigation)
            }
            Region::Hero => match self
                .content
                .get_hero_section(false, self.hero_entry.as_ref())
                .await
            {
                Some(hero) => {
                    let logos = if hero.non_empty("badge_label").is_some() {
                        self.content.get_company_logos(false).await
                    } else {
                        Vec::new()
                    };
                    Some(RegionView::Hero { hero, logos })
                }
                None => None,
            },
            Region::Features => {
                non_empty(self.content.get_feature_cards(false).await).map(RegionView::Features)
            }
            Region::Posts => non_empty(
                self.content
                    .get_blog_posts(self.blog_post_limit, false)
                    .await,
            )
            .map(RegionView::Posts),
            Region::Cta => self.content.get_cta_section(false).await.map(RegionView::Cta),
            Region::Footer => {
                non_empty(self.content.get_footer_sections(false).await).map(RegionView::Footer)
            }
        };

        view.unwrap_or_else(|| RegionView::Placeholder {
            message: region.placeholder().to_string(),
        })
    }
}

fn non_empty(entries: Vec<ContentEntry>) -> Option<Vec<ContentEntry>> {
    (!entries.is_empty()).then_some(entries)
}
