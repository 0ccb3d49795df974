//! Content entries, queries, and the site's content types.
//!
//! [`SiteContent`] is the inbound seam: one accessor per content type that
//! fetches through the [`Gateway`](crate::Gateway) and returns normalized
//! entries.

mod entry;
mod kind;
mod query;
mod site;

pub use entry::ContentEntry;
pub use kind::ContentKind;
pub use query::{CacheKey, ContentTypeQuery, DEFAULT_LIMIT, SortDirection};
pub use site::SiteContent;
