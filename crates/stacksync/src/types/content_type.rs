//! Content type UID type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// Maximum length Contentstack accepts for a content type UID.
const MAX_LEN: usize = 64;

/// A validated Contentstack content type UID.
///
/// Content type UIDs name a schema of entries, e.g. `blog_post`. They appear
/// in request paths and cache keys, so the format is checked up front.
///
/// # Example
///
/// ```
/// use stacksync::ContentTypeUid;
///
/// let ct = ContentTypeUid::new("blog_post").unwrap();
/// assert_eq!(ct.as_str(), "blog_post");
/// assert!(ContentTypeUid::new("Blog Post").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentTypeUid(String);

impl ContentTypeUid {
    /// Create a new content type UID, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is empty, too long, does not start
    /// with a lowercase letter, or contains characters outside `[a-z0-9_]`.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Wrap a built-in UID whose format is checked by tests.
    pub(crate) fn known(s: &'static str) -> Self {
        debug_assert!(Self::validate(s).is_ok(), "invalid built-in content type {s}");
        Self(s.to_string())
    }

    /// Returns the UID string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), Error> {
        let invalid = |reason: String| -> Error {
            InvalidInputError::ContentType {
                value: s.to_string(),
                reason,
            }
            .into()
        };

        let Some(first) = s.chars().next() else {
            return Err(invalid("cannot be empty".to_string()));
        };

        if s.len() > MAX_LEN {
            return Err(invalid(format!(
                "exceeds maximum length of {} characters",
                MAX_LEN
            )));
        }

        if !first.is_ascii_lowercase() {
            return Err(invalid("must start with a lowercase letter".to_string()));
        }

        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_'))
        {
            return Err(invalid(format!("contains invalid character '{}'", c)));
        }

        Ok(())
    }
}

impl fmt::Display for ContentTypeUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ContentTypeUid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ContentTypeUid {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ContentTypeUid> for String {
    fn from(ct: ContentTypeUid) -> Self {
        ct.0
    }
}

impl AsRef<str> for ContentTypeUid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
