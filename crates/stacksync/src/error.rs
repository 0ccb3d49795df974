//! Error types for the stacksync library.
//!
//! This module provides a unified error type with explicit variants for
//! transport, Delivery API, input validation, configuration and render errors.
//!
//! Most of these never reach callers of the high-level accessors: the
//! gateway degrades transport and API failures to stale-or-empty content.
//! They surface through the lower-level [`ContentSource`](crate::ContentSource)
//! seam and through configuration and identifier constructors.

use std::fmt;
use thiserror::Error;

/// The unified error type for stacksync operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (DNS, TLS, connection, timeout, body decoding).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Non-success responses from the Delivery API.
    #[error("delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    /// Input validation errors (content type UID, entry UID, base URL).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Configuration errors (missing credentials, unknown region).
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A region could not be committed to the presentation layer.
    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Response body could not be decoded.
    #[error("invalid response body: {message}")]
    Decode { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else if err.is_decode() {
            TransportError::Decode {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(TransportError::from(err))
    }
}

/// A non-2xx response from the Delivery API.
#[derive(Debug)]
pub struct DeliveryError {
    /// HTTP status code.
    pub status: u16,
    /// Contentstack error code (if present).
    pub code: Option<i64>,
    /// Error message from the server.
    pub message: Option<String>,
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(code) = self.code {
            write!(f, " [{}]", code)?;
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for DeliveryError {}

impl DeliveryError {
    /// Create a new delivery error.
    pub fn new(status: u16, code: Option<i64>, message: Option<String>) -> Self {
        Self {
            status,
            code,
            message,
        }
    }

    /// Check if the server rejected the API key or delivery token.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401 || self.status == 403
    }

    /// Check if the content type or entry does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid content type UID.
    #[error("invalid content type '{value}': {reason}")]
    ContentType { value: String, reason: String },

    /// Invalid entry UID.
    #[error("invalid entry UID '{value}': {reason}")]
    EntryUid { value: String, reason: String },

    /// Invalid Delivery API base URL.
    #[error("invalid delivery URL '{value}': {reason}")]
    DeliveryUrl { value: String, reason: String },
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required setting was not provided.
    #[error("missing setting: {name}")]
    Missing { name: &'static str },

    /// The region has no known Delivery API host.
    #[error("unknown region '{region}'")]
    UnknownRegion { region: String },

    /// A background task interval was zero.
    #[error("{name} must be greater than zero")]
    ZeroInterval { name: &'static str },
}

/// Errors raised by a [`RegionSink`](crate::render::RegionSink).
#[derive(Debug, Error)]
#[error("region '{region}' could not be committed: {message}")]
pub struct RenderError {
    /// The region that failed.
    pub region: &'static str,
    /// What went wrong.
    pub message: String,
}

impl RenderError {
    /// Create a new render error for a region.
    pub fn new(region: &'static str, message: impl Into<String>) -> Self {
        Self {
            region,
            message: message.into(),
        }
    }
}
