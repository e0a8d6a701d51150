// src/identity.rs
//! Stable job identity from heterogeneous listing URLs.

use lazy_static::lazy_static;
use regex::Regex;
use sha2::{Digest, Sha256};

lazy_static! {
    // Numeric listing id in the path after the view marker, with or
    // without a title slug: /jobs/view/4012345678 or
    // /jobs/view/devops-engineer-at-acme-4012345678
    static ref VIEW_PATH_RE: Regex =
        Regex::new(r"/jobs/view/(?:[^/?#]*-)?(\d+)").unwrap();

    // Numeric id carried in a known query parameter.
    static ref QUERY_ID_RE: Regex =
        Regex::new(r"(?i)[?&](?:currentJobId|jobId|jk)=(\d+)").unwrap();
}

/// Strip query and fragment; this is the URL stored and displayed.
pub fn canonical_url(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .split(['?', '#'])
        .next()
        .unwrap_or(trimmed)
        .to_string()
}

/// Derive a stable identifier from a raw listing URL. Total: when no
/// structured id is present the canonical URL is hashed instead, so two
/// URLs differing only in tracking parameters still collapse to one id.
pub fn job_id(raw_url: &str) -> String {
    if let Some(captures) = VIEW_PATH_RE.captures(raw_url) {
        return captures[1].to_string();
    }
    if let Some(captures) = QUERY_ID_RE.captures(raw_url) {
        return captures[1].to_string();
    }
    let digest = Sha256::digest(canonical_url(raw_url).as_bytes());
    let hex = format!("{:x}", digest);
    format!("url-{}", &hex[..16])
}
