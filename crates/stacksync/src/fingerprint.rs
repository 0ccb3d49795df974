//! Content fingerprints for change detection.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::content::ContentEntry;
use crate::types::ContentTypeUid;

/// Fields whose first non-empty value is the entry's display title.
const TITLE_FIELDS: [&str; 3] = ["title", "menu_label", "section_title"];

/// An opaque, comparable summary of an entry.
///
/// Two fingerprints are equal iff their string forms are equal; nothing
/// else about their structure is assumed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

#[derive(Serialize)]
struct FingerprintFields<'a> {
    uid: Option<&'a str>,
    time: Option<String>,
    version: Option<String>,
    title: &'a str,
    updated: Option<&'a str>,
}

impl Fingerprint {
    /// Derive the fingerprint of a representative entry.
    ///
    /// Covers the UID, the publish time (falling back to `updated_at`, then
    /// the version token), the version token, the display title and
    /// `updated_at`.
    pub fn of(entry: &ContentEntry) -> Self {
        let version = entry.version();
        let time = entry
            .publish_time()
            .or_else(|| entry.updated_at())
            .map(str::to_string)
            .or_else(|| version.clone());
        let title = TITLE_FIELDS
            .iter()
            .find_map(|f| entry.non_empty(f))
            .unwrap_or("");

        let fields = FingerprintFields {
            uid: entry.uid(),
            time,
            version,
            title,
            updated: entry.updated_at(),
        };
        // Serializing a struct of strings cannot fail.
        Self(serde_json::to_string(&fields).unwrap_or_default())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of comparing a fresh fingerprint with the stored one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    /// No fingerprint was stored yet; it is now.
    First,
    /// Same as the stored fingerprint.
    Unchanged,
    /// Differs from the stored fingerprint, which has been replaced.
    Changed { previous: Fingerprint },
}

/// Last known fingerprint per tracked content type.
///
/// Cheap to clone; clones share the same table. [`observe`](Self::observe)
/// compares and stores under a single write guard, so overlapping check
/// cycles resolve as last write wins.
#[derive(Debug, Clone, Default)]
pub struct FingerprintTable {
    records: Arc<RwLock<HashMap<ContentTypeUid, Fingerprint>>>,
}

impl FingerprintTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare `fingerprint` with the stored one for `content_type` and
    /// store it unless unchanged.
    pub async fn observe(
        &self,
        content_type: &ContentTypeUid,
        fingerprint: Fingerprint,
    ) -> Observation {
        let mut records = self.records.write().await;
        match records.get(content_type) {
            None => {
                records.insert(content_type.clone(), fingerprint);
                Observation::First
            }
            Some(stored) if *stored == fingerprint => Observation::Unchanged,
            Some(_) => {
                let previous = records
                    .insert(content_type.clone(), fingerprint)
                    .unwrap_or_else(|| Fingerprint(String::new()));
                Observation::Changed { previous }
            }
        }
    }

    pub async fn get(&self, content_type: &ContentTypeUid) -> Option<Fingerprint> {
        self.records.read().await.get(content_type).cloned()
    }

    /// Forget every fingerprint; the next check of each type starts UNSEEN.
    pub async fn clear(&self) {
        self.records.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
