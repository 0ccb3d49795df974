//! Per content type accessors.

use tracing::debug;

use crate::gateway::Gateway;
use crate::normalize::{first, normalize};
use crate::types::EntryUid;

use super::entry::ContentEntry;
use super::kind::ContentKind;

/// Accessors between the core and the presentation layer.
///
/// Each accessor fetches through the gateway (honouring the TTL cache unless
/// `skip_cache` is set), normalizes, and projects. An empty result means no
/// content could be obtained.
#[derive(Clone)]
pub struct SiteContent {
    gateway: Gateway,
}

impl SiteContent {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Fetch and normalize every entry of a kind.
    pub async fn list(&self, kind: ContentKind, skip_cache: bool) -> Vec<ContentEntry> {
        self.list_with_limit(kind, None, skip_cache).await
    }

    /// Like [`list`](Self::list), overriding the request limit.
    pub async fn list_with_limit(
        &self,
        kind: ContentKind,
        limit: Option<u32>,
        skip_cache: bool,
    ) -> Vec<ContentEntry> {
        let mut query = kind.query();
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        let raw = self.gateway.fetch(&query, skip_cache).await.unwrap_or_default();
        let raw_count = raw.len();
        let entries = normalize(raw, &kind.rules());
        if entries.len() != raw_count {
            debug!(
                content_type = %kind,
                dropped = raw_count - entries.len(),
                "Dropped duplicate entries"
            );
        }
        entries
    }

    pub async fn get_navigation_menu(&self, skip_cache: bool) -> Vec<ContentEntry> {
        self.list(ContentKind::NavigationMenu, skip_cache).await
    }

    /// The hero section: the pinned entry when `entry_uid` is given,
    /// otherwise the first entry of the type.
    pub async fn get_hero_section(
        &self,
        skip_cache: bool,
        entry_uid: Option<&EntryUid>,
    ) -> Option<ContentEntry> {
        match entry_uid {
            Some(uid) => {
                let ct = ContentKind::HeroSection.content_type();
                self.gateway.fetch_entry(&ct, uid, skip_cache).await
            }
            None => first(self.list(ContentKind::HeroSection, skip_cache).await),
        }
    }

    pub async fn get_feature_cards(&self, skip_cache: bool) -> Vec<ContentEntry> {
        self.list(ContentKind::FeatureCard, skip_cache).await
    }

    /// The most recent `limit` blog posts.
    pub async fn get_blog_posts(&self, limit: u32, skip_cache: bool) -> Vec<ContentEntry> {
        self.list_with_limit(ContentKind::BlogPost, Some(limit), skip_cache)
            .await
    }

    pub async fn get_company_logos(&self, skip_cache: bool) -> Vec<ContentEntry> {
        self.list(ContentKind::CompanyLogo, skip_cache).await
    }

    pub async fn get_cta_section(&self, skip_cache: bool) -> Option<ContentEntry> {
        first(self.list(ContentKind::CtaSection, skip_cache).await)
    }

    pub async fn get_footer_sections(&self, skip_cache: bool) -> Vec<ContentEntry> {
        self.list(ContentKind::FooterSection, skip_cache).await
    }
}
