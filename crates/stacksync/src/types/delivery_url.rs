//! Delivery API base URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{ConfigError, Error, InvalidInputError};
use crate::types::{ContentTypeUid, EntryUid};

/// A validated Contentstack Delivery API base URL.
///
/// This type ensures the URL is absolute, uses HTTPS (or HTTP for localhost),
/// and is normalized for endpoint construction.
///
/// # Example
///
/// ```
/// use stacksync::{ContentTypeUid, DeliveryUrl};
///
/// let base = DeliveryUrl::for_region("us").unwrap();
/// let ct = ContentTypeUid::new("blog_post").unwrap();
/// assert_eq!(base.entries_url(&ct),
///            "https://cdn.contentstack.io/v3/content_types/blog_post/entries");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeliveryUrl(Url);

impl DeliveryUrl {
    /// Create a new Delivery URL from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not valid or doesn't meet requirements.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| InvalidInputError::DeliveryUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        Ok(Self(url))
    }

    /// Returns the Delivery API base URL for a Contentstack region.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownRegion`] for regions without a known CDN host.
    pub fn for_region(region: &str) -> Result<Self, Error> {
        let base = match region.to_ascii_lowercase().as_str() {
            "us" | "na" | "aws-na" => "https://cdn.contentstack.io/v3",
            "eu" | "aws-eu" => "https://eu-cdn.contentstack.com/v3",
            "azure-na" => "https://azure-na-cdn.contentstack.com/v3",
            "azure-eu" => "https://azure-eu-cdn.contentstack.com/v3",
            "gcp-na" => "https://gcp-na-cdn.contentstack.com/v3",
            _ => {
                return Err(ConfigError::UnknownRegion {
                    region: region.to_string(),
                }
                .into());
            }
        };
        Self::new(base)
    }

    /// Returns the entries endpoint for a content type.
    pub fn entries_url(&self, content_type: &ContentTypeUid) -> String {
        format!("{}/content_types/{}/entries", self.base(), content_type)
    }

    /// Returns the single-entry endpoint for a content type and entry UID.
    pub fn entry_url(&self, content_type: &ContentTypeUid, uid: &EntryUid) -> String {
        format!("{}/{}", self.entries_url(content_type), uid)
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the host string.
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    fn base(&self) -> &str {
        // The URL crate always adds a trailing slash to root paths
        self.0.as_str().trim_end_matches('/')
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        if url.cannot_be_a_base() {
            return Err(InvalidInputError::DeliveryUrl {
                value: original.to_string(),
                reason: "must be an absolute URL".to_string(),
            }
            .into());
        }

        let scheme = url.scheme();
        let is_localhost = url
            .host_str()
            .is_some_and(|h| h == "localhost" || h == "127.0.0.1" || h == "[::1]");

        if scheme != "https" && !(scheme == "http" && is_localhost) {
            return Err(InvalidInputError::DeliveryUrl {
                value: original.to_string(),
                reason: "must use HTTPS (HTTP allowed only for localhost)".to_string(),
            }
            .into());
        }

        if url.host_str().is_none() {
            return Err(InvalidInputError::DeliveryUrl {
                value: original.to_string(),
                reason: "must have a host".to_string(),
            }
            .into());
        }

        if url.query().is_some() {
            return Err(InvalidInputError::DeliveryUrl {
                value: original.to_string(),
                reason: "must not carry a query string".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl fmt::Display for DeliveryUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base())
    }
}

impl FromStr for DeliveryUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for DeliveryUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for DeliveryUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DeliveryUrl::new(&s).map_err(serde::de::Error::custom)
    }
}
