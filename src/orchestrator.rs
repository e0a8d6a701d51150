// src/orchestrator.rs
//! One full run: seed the shared ledger, then crawl every category
//! against it in configured order.

use crate::config::WatchConfig;
use crate::fetch::SearchClient;
use crate::notify::WebhookNotifier;
use crate::pipeline::{run_category, CategoryStats};
use crate::rotation::{hour_seed, rotate_locations};
use crate::store::{CategorySheet, DedupeLedger};
use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub categories: usize,
    pub locations_visited: usize,
    pub pages_fetched: usize,
    pub cards_seen: usize,
    pub new_postings: usize,
}

impl RunSummary {
    fn absorb(&mut self, stats: &CategoryStats) {
        self.locations_visited += stats.locations_visited;
        self.pages_fetched += stats.pages_fetched;
        self.cards_seen += stats.cards_seen;
        self.new_postings += stats.new_postings;
    }
}

pub struct Orchestrator {
    config: WatchConfig,
    source: SearchClient,
    notifier: WebhookNotifier,
}

impl Orchestrator {
    pub fn new(config: WatchConfig) -> Result<Self> {
        let source = SearchClient::new()?;
        let notifier = WebhookNotifier::new(config.webhook_url.clone())?;
        Ok(Self {
            config,
            source,
            notifier,
        })
    }

    /// Run every category once. Failures are isolated per unit of work: a
    /// category whose sheet cannot be read still gets crawled, it just
    /// contributes nothing to the ledger seed.
    pub async fn run(&self) -> RunSummary {
        let mut ledger = DedupeLedger::new();
        let mut sheets = Vec::with_capacity(self.config.categories.len());
        for category in &self.config.categories {
            let sheet = CategorySheet::open(&self.config.data_dir, &category.sheet);
            if let Err(e) = sheet.ensure_header() {
                warn!("Could not prepare sheet for {}: {}", category.name, e);
            }
            match sheet.job_ids() {
                Ok(ids) => ledger.extend(ids),
                Err(e) => warn!("Could not seed ledger from {}: {}", category.name, e),
            }
            sheets.push(sheet);
        }
        info!("Ledger seeded with {} known postings", ledger.len());

        let locations = rotate_locations(
            &self.config.locations,
            self.config.crawl.locations_per_run,
            hour_seed(),
        );
        info!(
            "Visiting {} of {} locations this run",
            locations.len(),
            self.config.locations.len()
        );

        let mut summary = RunSummary::default();
        for (category, sheet) in self.config.categories.iter().zip(&sheets) {
            info!("Checking category {}", category.name);
            let stats = run_category(
                category,
                &locations,
                &self.config.crawl,
                &self.source,
                &self.notifier,
                sheet,
                &mut ledger,
            )
            .await;
            summary.categories += 1;
            summary.absorb(&stats);
        }
        info!(
            "Run complete: {} new postings across {} categories",
            summary.new_postings, summary.categories
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_absorbs_category_stats() {
        let mut summary = RunSummary::default();
        summary.absorb(&CategoryStats {
            locations_visited: 2,
            pages_fetched: 5,
            cards_seen: 40,
            new_postings: 3,
        });
        summary.absorb(&CategoryStats {
            locations_visited: 1,
            pages_fetched: 1,
            cards_seen: 10,
            new_postings: 0,
        });
        assert_eq!(summary.locations_visited, 3);
        assert_eq!(summary.pages_fetched, 6);
        assert_eq!(summary.cards_seen, 50);
        assert_eq!(summary.new_postings, 3);
    }
}
