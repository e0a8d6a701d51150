// src/pipeline.rs
//! Per-category crawl loop: rotate locations, paginate, parse, dedupe,
//! classify, then notify and persist new matches.

use crate::classify::{country_of, title_matches};
use crate::config::{Category, CrawlSettings};
use crate::fetch::JobSource;
use crate::identity::{canonical_url, job_id};
use crate::notify::Notifier;
use crate::parse::parse_cards;
use crate::store::{CategorySheet, DedupeLedger};
use crate::types::{Country, JobPosting, SearchQuery, UNKNOWN_LOCATION};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{error, info};

#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryStats {
    pub locations_visited: usize,
    pub pages_fetched: usize,
    pub cards_seen: usize,
    pub new_postings: usize,
}

/// Crawl one category across the given locations against the shared
/// ledger. Fetch failures and empty pages end pagination for that
/// location only; nothing here aborts the run.
pub async fn run_category<S, N>(
    category: &Category,
    locations: &[String],
    settings: &CrawlSettings,
    source: &S,
    notifier: &N,
    sheet: &CategorySheet,
    ledger: &mut DedupeLedger,
) -> CategoryStats
where
    S: JobSource,
    N: Notifier,
{
    let mut stats = CategoryStats::default();
    // Guards against one page query returning the same card twice, on top
    // of the shared ledger. Holds ids and title::company pairs.
    let mut seen_this_run: HashSet<String> = HashSet::new();
    let or_keywords = category.keywords.join(" OR ");

    for location in locations {
        stats.locations_visited += 1;
        let query = SearchQuery {
            keywords: or_keywords.clone(),
            location: location.clone(),
            time_window: settings.time_window.token().to_string(),
        };

        for page in 0..settings.pages_per_location {
            stats.pages_fetched += 1;
            let html = match source.fetch_page(&query, page).await {
                Some(html) => html,
                None => break,
            };
            let cards = parse_cards(&html);
            if cards.is_empty() {
                break;
            }
            stats.cards_seen += cards.len();

            for card in cards {
                let id = job_id(&card.url);
                let pair_key =
                    format!("{}::{}", card.title.to_lowercase(), card.company.to_lowercase());
                if ledger.contains(&id)
                    || seen_this_run.contains(&id)
                    || seen_this_run.contains(&pair_key)
                {
                    continue;
                }
                seen_this_run.insert(id.clone());
                seen_this_run.insert(pair_key);

                // Non-matching cards stay out of the persistent ledger so
                // they can be reconsidered if keyword sets change.
                if !title_matches(&card.title, &category.keywords) {
                    continue;
                }
                let location_text = card
                    .location
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_LOCATION.to_string());
                let country = country_of(&location_text);
                if settings.us_only && country != Country::UnitedStates {
                    continue;
                }

                let posting = JobPosting {
                    id,
                    url: canonical_url(&card.url),
                    title: card.title,
                    company: card.company,
                    location: location_text,
                    country,
                    category: category.name.clone(),
                    scraped_at: Utc::now(),
                };

                // Notification first, but best-effort: a delivery failure
                // must never block persistence or dedupe.
                let subject = format!("New {} job", category.name);
                let body = format!(
                    "{} at {} — {}\n{}",
                    posting.title, posting.company, posting.location, posting.url
                );
                notifier.send(&subject, &body, &category.recipients).await;

                if let Err(e) = sheet.append_posting(&posting) {
                    error!(
                        "Failed to persist {} to {}: {}",
                        posting.id,
                        sheet.path().display(),
                        e
                    );
                }
                ledger.insert(posting.id.clone());
                stats.new_postings += 1;
                info!(
                    "New {} posting: {} at {} ({})",
                    category.name, posting.title, posting.company, posting.id
                );
            }
        }
    }
    stats
}
