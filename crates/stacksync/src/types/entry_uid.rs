//! Entry UID type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// A validated entry UID (e.g. `bltc322285692a26776`).
///
/// Entry UIDs are opaque to the core; validation only rejects values that
/// would break the request path.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntryUid(String);

impl EntryUid {
    /// Create a new entry UID.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is empty or contains whitespace,
    /// `/`, `?` or `#`.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Returns the UID string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), Error> {
        if s.is_empty() {
            return Err(InvalidInputError::EntryUid {
                value: s.to_string(),
                reason: "cannot be empty".to_string(),
            }
            .into());
        }

        for c in s.chars() {
            if c.is_whitespace() || c == '/' || c == '?' || c == '#' {
                return Err(InvalidInputError::EntryUid {
                    value: s.to_string(),
                    reason: format!("contains invalid character '{}'", c.escape_default()),
                }
                .into());
            }
        }

        Ok(())
    }
}

impl fmt::Display for EntryUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryUid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for EntryUid {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<EntryUid> for String {
    fn from(uid: EntryUid) -> Self {
        uid.0
    }
}

impl AsRef<str> for EntryUid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
