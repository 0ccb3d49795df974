//! Validated identifier types.
//!
//! These types enforce Delivery API invariants at construction time,
//! so request paths and cache keys are never built from malformed input.

mod content_type;
mod delivery_url;
mod entry_uid;

pub use content_type::ContentTypeUid;
pub use delivery_url::DeliveryUrl;
pub use entry_uid::EntryUid;
