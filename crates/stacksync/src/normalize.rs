//! Normalization pipeline: dedup by natural key, then order.
//!
//! Everything here is pure. The same raw sequence always yields the same
//! output, and normalizing an already normalized sequence is a no-op.

use std::cmp::Reverse;
use std::collections::HashSet;

use crate::content::ContentEntry;

/// Separator between composite key parts.
const KEY_SEPARATOR: char = '\u{1f}';

/// The field(s) identifying semantic duplicates within a content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NaturalKey {
    /// All listed fields together form the key.
    Composite(&'static [&'static str]),
    /// The first listed field with a non-empty value is the key.
    FirstOf(&'static [&'static str]),
}

impl NaturalKey {
    /// Extract the key of an entry. Entries without any key field have no
    /// key and are never treated as duplicates.
    pub fn extract(&self, entry: &ContentEntry) -> Option<String> {
        match self {
            NaturalKey::Composite(fields) => {
                let parts: Vec<Option<String>> = fields.iter().map(|f| entry.scalar(f)).collect();
                if parts.iter().all(Option::is_none) {
                    return None;
                }
                let key = parts
                    .into_iter()
                    .map(Option::unwrap_or_default)
                    .collect::<Vec<_>>()
                    .join(&KEY_SEPARATOR.to_string());
                Some(key)
            }
            NaturalKey::FirstOf(fields) => fields
                .iter()
                .filter_map(|f| entry.scalar(f))
                .find(|v| !v.is_empty()),
        }
    }
}

/// How a normalized sequence is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortRule {
    /// Keep input order.
    Unordered,
    /// Ascending by the integer `order` field (missing counts as 0).
    OrderAscending,
    /// Most recent first by a date field (missing or unparseable counts as epoch 0).
    DateDescending(&'static str),
}

/// Per content type normalization rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeRules {
    pub natural_key: NaturalKey,
    pub sort: SortRule,
}

/// Deduplicate then stably sort raw entries.
pub fn normalize(raw: Vec<ContentEntry>, rules: &NormalizeRules) -> Vec<ContentEntry> {
    let mut entries = dedupe(raw, &rules.natural_key);
    sort(&mut entries, rules.sort);
    entries
}

/// Drop every entry whose natural key was already seen; first occurrence wins.
pub fn dedupe(raw: Vec<ContentEntry>, key: &NaturalKey) -> Vec<ContentEntry> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .filter(|entry| match key.extract(entry) {
            Some(k) => seen.insert(k),
            None => true,
        })
        .collect()
}

/// Stable sort by the given rule.
pub fn sort(entries: &mut [ContentEntry], rule: SortRule) {
    match rule {
        SortRule::Unordered => {}
        SortRule::OrderAscending => entries.sort_by_key(ContentEntry::order),
        SortRule::DateDescending(field) => entries.sort_by_key(|e| {
            Reverse(
                e.date_field(field)
                    .map(|d| d.timestamp_millis())
                    .unwrap_or(0),
            )
        }),
    }
}

/// Single-entry projection: the first normalized entry, if any.
pub fn first(entries: Vec<ContentEntry>) -> Option<ContentEntry> {
    entries.into_iter().next()
}
