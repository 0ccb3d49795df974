//! Contentstack Delivery API client.
//!
//! This module provides the HTTP client that backs the
//! [`ContentSource`](crate::ContentSource) seam in production.

mod client;
mod endpoints;

pub use client::DeliveryClient;
pub use endpoints::{EntriesResponse, EntryResponse};
