//! Terminal presentation of rendered regions.

use async_trait::async_trait;
use colored::Colorize;
use serde_json::json;

use stacksync::render::{Region, RegionSink, RegionView};
use stacksync::ContentEntry;

/// Prints each committed region as one line (or one JSON object).
#[derive(Debug, Clone, Copy)]
pub struct ConsoleSink {
    json: bool,
}

impl ConsoleSink {
    pub fn new(json: bool) -> Self {
        Self { json }
    }
}

#[async_trait]
impl RegionSink for ConsoleSink {
    async fn commit(&self, region: Region, view: RegionView) -> stacksync::Result<()> {
        if self.json {
            let line = json!({ "region": region, "view": view });
            println!("{line}");
        } else {
            println!("{:<12} {}", region.name().bold(), describe(&view));
        }
        Ok(())
    }
}

fn describe(view: &RegionView) -> String {
    match view {
        RegionView::Placeholder { message } => message.dimmed().to_string(),
        RegionView::Hero { hero, logos } if logos.is_empty() => title_of(hero),
        RegionView::Hero { hero, logos } => {
            format!("{} (+{} logos)", title_of(hero), logos.len())
        }
        RegionView::Cta(entry) => title_of(entry),
        RegionView::Navigation(entries) => {
            let labels: Vec<_> = entries
                .iter()
                .filter_map(|e| e.non_empty("menu_label"))
                .collect();
            labels.join(" | ")
        }
        RegionView::Features(entries)
        | RegionView::Posts(entries)
        | RegionView::Footer(entries) => format!("{} entries", entries.len()),
    }
}

/// Best-effort display title for an entry.
pub fn title_of(entry: &ContentEntry) -> String {
    ["title", "menu_label", "section_title", "company_name"]
        .iter()
        .find_map(|field| entry.non_empty(field))
        .or_else(|| entry.uid())
        .unwrap_or("(untitled)")
        .to_string()
}
