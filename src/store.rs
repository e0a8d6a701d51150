// src/store.rs
//! Per-category CSV ledger sheets and the shared in-memory dedupe set.

use crate::types::JobPosting;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const SHEET_HEADER: [&str; 8] = [
    "Job ID",
    "Job URL",
    "Title",
    "Company",
    "Location",
    "Category",
    "Country",
    "Scraped-At",
];

/// One category's durable region: a CSV file with a fixed header followed
/// by data rows, newest first.
pub struct CategorySheet {
    path: PathBuf,
}

impl CategorySheet {
    pub fn open(data_dir: &Path, sheet: &str) -> Self {
        Self {
            path: data_dir.join(format!("{}.csv", sheet)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the sheet if missing, and rewrite the header row when it does
    /// not match the expected schema. Existing data rows are preserved.
    pub fn ensure_header(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        if !self.path.exists() {
            let mut writer = csv::Writer::from_path(&self.path)
                .with_context(|| format!("Failed to create {}", self.path.display()))?;
            writer.write_record(SHEET_HEADER)?;
            writer.flush()?;
            info!("Created ledger sheet {}", self.path.display());
            return Ok(());
        }

        let records = self.read_all()?;
        let header_ok = records
            .first()
            .map(|record| record.iter().eq(SHEET_HEADER.iter().copied()))
            .unwrap_or(false);
        if !header_ok {
            // A mismatched first row may be a stale header from an older
            // schema; keeping it would surface header cells as job ids.
            let stale_header = records.first().map(looks_like_header).unwrap_or(false);
            let data_rows = if stale_header {
                &records[1..]
            } else {
                &records[..]
            };
            let mut writer = csv::WriterBuilder::new()
                .flexible(true)
                .from_path(&self.path)
                .with_context(|| format!("Failed to rewrite {}", self.path.display()))?;
            writer.write_record(SHEET_HEADER)?;
            for record in data_rows {
                writer.write_record(record)?;
            }
            writer.flush()?;
            info!("Repaired header of {}", self.path.display());
        }
        Ok(())
    }

    /// All persisted job identifiers, in sheet order (newest first).
    pub fn job_ids(&self) -> Result<Vec<String>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        Ok(self
            .read_all()?
            .iter()
            .skip(1)
            .filter_map(|record| record.get(0))
            .filter(|id| !id.is_empty())
            .map(|id| id.to_string())
            .collect())
    }

    /// Insert a posting row directly below the header, keeping the sheet
    /// ordered newest-first.
    pub fn append_posting(&self, posting: &JobPosting) -> Result<()> {
        self.ensure_header()?;
        let existing = self.read_all()?;
        let scraped_at = posting.scraped_at.to_rfc3339();

        let mut writer = csv::Writer::from_path(&self.path)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        writer.write_record(SHEET_HEADER)?;
        writer.write_record([
            posting.id.as_str(),
            posting.url.as_str(),
            posting.title.as_str(),
            posting.company.as_str(),
            posting.location.as_str(),
            posting.category.as_str(),
            posting.country.as_str(),
            scraped_at.as_str(),
        ])?;
        for record in existing.iter().skip(1) {
            writer.write_record(record)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<csv::StringRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let mut records = Vec::new();
        for record in reader.records() {
            records.push(record.with_context(|| format!("Bad row in {}", self.path.display()))?);
        }
        Ok(records)
    }
}

// Data rows always start with an identifier (numeric or url- prefixed),
// never with a column label.
fn looks_like_header(record: &csv::StringRecord) -> bool {
    record
        .get(0)
        .map(|cell| SHEET_HEADER.contains(&cell))
        .unwrap_or(false)
}

/// Identifier set shared by all categories within one orchestrator run,
/// seeded from the union of every category's persisted ids.
#[derive(Debug, Default)]
pub struct DedupeLedger {
    ids: HashSet<String>,
}

impl DedupeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn insert(&mut self, id: String) -> bool {
        self.ids.insert(id)
    }

    pub fn extend<I: IntoIterator<Item = String>>(&mut self, ids: I) {
        self.ids.extend(ids);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
