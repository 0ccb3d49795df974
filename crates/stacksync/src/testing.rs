//! In-memory content source for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::Result;
use crate::content::{ContentEntry, ContentTypeQuery};
use crate::error::{DeliveryError, Error};
use crate::source::ContentSource;
use crate::types::{ContentTypeUid, EntryUid};

#[derive(Debug, Clone)]
enum Scripted {
    Entries(Vec<ContentEntry>),
    Missing,
    Failing,
}

/// A [`ContentSource`] whose responses are set per content type.
///
/// Unscripted content types answer with an empty entry list.
#[derive(Debug, Default)]
pub(crate) struct ScriptedSource {
    responses: Mutex<HashMap<String, Scripted>>,
    calls: Mutex<HashMap<String, usize>>,
    limits: Mutex<HashMap<String, u32>>,
}

impl ScriptedSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Answer `content_type` with the entries in a JSON array.
    pub(crate) fn set(&self, content_type: &str, entries: Value) {
        let entries: Vec<ContentEntry> = serde_json::from_value(entries).unwrap();
        self.script(content_type, Scripted::Entries(entries));
    }

    /// Answer `content_type` with a body lacking `entries`.
    pub(crate) fn set_missing(&self, content_type: &str) {
        self.script(content_type, Scripted::Missing);
    }

    /// Answer `content_type` with a server error.
    pub(crate) fn fail(&self, content_type: &str) {
        self.script(content_type, Scripted::Failing);
    }

    pub(crate) fn calls(&self, content_type: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(content_type)
            .copied()
            .unwrap_or(0)
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    pub(crate) fn last_limit(&self, content_type: &str) -> Option<u32> {
        self.limits.lock().unwrap().get(content_type).copied()
    }

    fn script(&self, content_type: &str, scripted: Scripted) {
        self.responses
            .lock()
            .unwrap()
            .insert(content_type.to_string(), scripted);
    }

    fn respond(&self, content_type: &ContentTypeUid) -> Result<Option<Vec<ContentEntry>>> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(content_type.to_string())
            .or_default() += 1;

        let scripted = self
            .responses
            .lock()
            .unwrap()
            .get(content_type.as_str())
            .cloned()
            .unwrap_or(Scripted::Entries(Vec::new()));

        match scripted {
            Scripted::Entries(entries) => Ok(Some(entries)),
            Scripted::Missing => Ok(None),
            Scripted::Failing => Err(Error::Delivery(DeliveryError::new(
                500,
                None,
                Some("scripted failure".to_string()),
            ))),
        }
    }
}

#[async_trait]
impl ContentSource for ScriptedSource {
    async fn entries(&self, query: &ContentTypeQuery) -> Result<Option<Vec<ContentEntry>>> {
        self.limits
            .lock()
            .unwrap()
            .insert(query.content_type.to_string(), query.effective_limit());
        let entries = self.respond(&query.content_type)?;
        Ok(entries.map(|mut e| {
            e.truncate(query.effective_limit() as usize);
            e
        }))
    }

    async fn entry(
        &self,
        content_type: &ContentTypeUid,
        uid: &EntryUid,
    ) -> Result<Option<ContentEntry>> {
        let entries = self.respond(content_type)?;
        Ok(entries.and_then(|e| e.into_iter().find(|e| e.uid() == Some(uid.as_str()))))
    }
}
