//! Content type queries and the cache keys derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{ContentTypeUid, EntryUid};

/// Page size used when a query does not set a limit.
///
/// The Delivery API caps a single page at 100 entries.
pub const DEFAULT_LIMIT: u32 = 100;

/// Sort direction for ordered queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// The wire form used inside the ordering parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A query against the entries of one content type.
///
/// # Example
///
/// ```
/// use stacksync::{ContentTypeQuery, ContentTypeUid, SortDirection};
///
/// let query = ContentTypeQuery::new(ContentTypeUid::new("blog_post").unwrap())
///     .order_by("publish_date", SortDirection::Desc)
///     .limit(3);
/// assert_eq!(query.ordering_param().as_deref(), Some("publish_date[desc]"));
/// assert_eq!(query.effective_limit(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentTypeQuery {
    pub content_type: ContentTypeUid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_direction: Option<SortDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
}

impl ContentTypeQuery {
    /// An unordered query with the default page size.
    pub fn new(content_type: ContentTypeUid) -> Self {
        Self {
            content_type,
            order_by: None,
            sort_direction: None,
            limit: None,
            skip: None,
        }
    }

    /// Order results by a field.
    pub fn order_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by = Some(field.into());
        self.sort_direction = Some(direction);
        self
    }

    /// Limit the page size.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skip a number of entries.
    pub fn skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }

    /// The page size sent to the server.
    pub fn effective_limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    /// The `<field>[<direction>]` ordering parameter, emitted only when both
    /// an order field and a direction are set.
    pub fn ordering_param(&self) -> Option<String> {
        match (&self.order_by, self.sort_direction) {
            (Some(field), Some(direction)) if !field.is_empty() => {
                Some(format!("{}[{}]", field, direction))
            }
            _ => None,
        }
    }

    /// The cache key for this query.
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::for_query(self)
    }
}

/// Key of a [`CacheRecord`](crate::cache::CacheRecord).
///
/// Derived from the content type plus every query parameter that changes
/// the response, so two queries share a record iff they request the same
/// page in the same order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for an entries query.
    pub fn for_query(query: &ContentTypeQuery) -> Self {
        let mut key = format!("{}?limit={}", query.content_type, query.effective_limit());
        if let Some(skip) = query.skip {
            key.push_str(&format!("&skip={}", skip));
        }
        if let Some(ordering) = query.ordering_param() {
            key.push('&');
            key.push_str(&ordering);
        }
        Self(key)
    }

    /// Key for a UID-scoped entry fetch.
    pub fn for_entry(content_type: &ContentTypeUid, uid: &EntryUid) -> Self {
        Self(format!("{}/{}", content_type, uid))
    }

    /// Returns the key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
