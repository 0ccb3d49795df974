//! stacksync - Contentstack content sync and caching core
//!
//! This library fetches entries from the Contentstack Delivery API, keeps a
//! short-lived cache in front of it, normalizes what comes back, detects
//! remote changes by fingerprinting, and drives per-region re-renders.
//! Everything is reachable from a [`SyncRuntime`]; the pieces can also be
//! used on their own.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use stacksync::{DeliveryClient, Gateway, SiteContent, SyncConfig, TtlCache};
//!
//! # async fn example() -> Result<(), stacksync::Error> {
//! let config = SyncConfig::from_env()?;
//! let client = DeliveryClient::from_config(&config)?;
//! let content = SiteContent::new(Gateway::new(Arc::new(client), TtlCache::new()));
//!
//! for post in content.get_blog_posts(5, false).await {
//!     println!("{}", post.str_field("title").unwrap_or("(untitled)"));
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod content;
pub mod delivery;
pub mod error;
pub mod fingerprint;
pub mod gateway;
pub mod normalize;
pub mod poller;
pub mod render;
pub mod runtime;
pub mod schedule;
pub mod source;
pub mod types;

#[cfg(test)]
mod testing;

// Re-export primary types at crate root for convenience
pub use cache::TtlCache;
pub use config::{DeliveryCredentials, SyncConfig};
pub use content::{ContentEntry, ContentKind, ContentTypeQuery, SiteContent, SortDirection};
pub use delivery::DeliveryClient;
pub use error::Error;
pub use fingerprint::{Fingerprint, FingerprintTable};
pub use gateway::Gateway;
pub use poller::ChangePoller;
pub use render::{RegionSink, RenderOrchestrator};
pub use runtime::SyncRuntime;
pub use source::ContentSource;
pub use types::{ContentTypeUid, DeliveryUrl, EntryUid};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
