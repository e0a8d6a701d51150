// src/types.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel used when a result card carries no location element.
pub const UNKNOWN_LOCATION: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Country {
    UnitedStates,
    Other,
}

impl Country {
    pub fn as_str(&self) -> &'static str {
        match self {
            Country::UnitedStates => "United States",
            Country::Other => "Other",
        }
    }
}

impl std::fmt::Display for Country {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One result-card fragment as extracted from the search markup.
/// Field absence is explicit; the pipeline decides what to do with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobCard {
    pub url: String,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
}

/// A fully classified posting. Built once by the pipeline, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct JobPosting {
    pub id: String,
    pub url: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub country: Country,
    pub category: String,
    pub scraped_at: DateTime<Utc>,
}

/// Ephemeral query sent to the search endpoint. The page offset is
/// computed by the fetcher, not stored here.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub keywords: String,
    pub location: String,
    pub time_window: String,
}
