// src/config.rs
//! Configuration loaded once at process start and passed by reference into
//! the orchestrator; no component does ambient lookups.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[derive(Debug, Clone, Deserialize)]
pub struct WatchConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default)]
    pub crawl: CrawlSettings,
    pub locations: Vec<String>,
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrawlSettings {
    #[serde(default = "default_pages_per_location")]
    pub pages_per_location: usize,
    #[serde(default = "default_locations_per_run")]
    pub locations_per_run: usize,
    #[serde(default)]
    pub time_window: TimeWindow,
    #[serde(default = "default_true")]
    pub us_only: bool,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            pages_per_location: default_pages_per_location(),
            locations_per_run: default_locations_per_run(),
            time_window: TimeWindow::default(),
            us_only: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeWindow {
    #[default]
    LastHour,
    LastDay,
    LastWeek,
}

impl TimeWindow {
    /// Token understood by the search endpoint's f_TPR parameter.
    pub fn token(&self) -> &'static str {
        match self {
            TimeWindow::LastHour => "r3600",
            TimeWindow::LastDay => "r86400",
            TimeWindow::LastWeek => "r604800",
        }
    }
}

/// A named keyword/recipient/sheet grouping. Static for the run.
#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub name: String,
    pub sheet: String,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub recipients: Vec<String>,
}

impl WatchConfig {
    pub fn load() -> Result<Self> {
        let path =
            std::env::var("JOBWATCH_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(Path::new(&path))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let mut config: WatchConfig =
            serde_yaml::from_str(&content).context("Failed to parse configuration")?;
        config.apply_env_overrides();
        config.validate()?;
        info!(
            "Loaded {} categories and {} locations from {}",
            config.categories.len(),
            config.locations.len(),
            path.display()
        );
        Ok(config)
    }

    /// Secrets and recipient lists can be supplied via the environment
    /// instead of the config file.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("JOBWATCH_WEBHOOK_URL") {
            if !url.trim().is_empty() {
                self.webhook_url = Some(url);
            }
        }
        for category in &mut self.categories {
            if let Ok(raw) = std::env::var(recipients_env_key(&category.name)) {
                category.recipients = parse_recipients(&raw);
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            anyhow::bail!("No categories configured");
        }
        let mut sheets = HashSet::new();
        for category in &self.categories {
            if category.name.trim().is_empty() {
                anyhow::bail!("Category with empty name");
            }
            if category.keywords.is_empty() {
                anyhow::bail!("Category '{}' has no keywords", category.name);
            }
            if category.sheet.trim().is_empty() {
                anyhow::bail!("Category '{}' has no sheet name", category.name);
            }
            if !sheets.insert(category.sheet.as_str()) {
                anyhow::bail!(
                    "Sheet '{}' is used by more than one category",
                    category.sheet
                );
            }
        }
        if self.crawl.pages_per_location == 0 {
            anyhow::bail!("pages_per_location must be at least 1");
        }
        if self.crawl.locations_per_run == 0 {
            anyhow::bail!("locations_per_run must be at least 1");
        }
        if self.locations.is_empty() {
            warn!("No locations configured; runs will fetch nothing");
        }
        Ok(())
    }
}

/// Comma-separated recipient list, blanks dropped.
pub fn parse_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|r| r.trim())
        .filter(|r| !r.is_empty())
        .map(|r| r.to_string())
        .collect()
}

fn recipients_env_key(category_name: &str) -> String {
    let mut key = String::from("JOBWATCH_RECIPIENTS_");
    for c in category_name.chars() {
        key.push(if c.is_ascii_alphanumeric() {
            c.to_ascii_uppercase()
        } else {
            '_'
        });
    }
    key
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_pages_per_location() -> usize {
    4
}

fn default_locations_per_run() -> usize {
    5
}

fn default_true() -> bool {
    true
}
