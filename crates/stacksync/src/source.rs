//! The network seam of the core.

use async_trait::async_trait;

use crate::Result;
use crate::content::{ContentEntry, ContentTypeQuery};
use crate::types::{ContentTypeUid, EntryUid};

/// A remote source of content entries.
///
/// [`DeliveryClient`](crate::DeliveryClient) implements this against the
/// Contentstack Delivery API. The [`Gateway`](crate::Gateway) layers caching
/// and failure degradation on top, so implementations should simply report
/// what happened.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch the entries matching a query.
    ///
    /// `Ok(None)` means the response had no `entries` field.
    async fn entries(&self, query: &ContentTypeQuery) -> Result<Option<Vec<ContentEntry>>>;

    /// Fetch a single entry by UID.
    ///
    /// `Ok(None)` means the response had no `entry` field.
    async fn entry(&self, content_type: &ContentTypeUid, uid: &EntryUid)
    -> Result<Option<ContentEntry>>;
}
