// src/classify.rs
use crate::types::Country;

/// Case-insensitive substring containment against the category keywords.
/// Deliberately unanchored: "sre" also matches inside longer tokens, which
/// trades some false positives for never missing minor title variants.
pub fn title_matches(title: &str, keywords: &[String]) -> bool {
    let title = title.to_lowercase();
    keywords
        .iter()
        .any(|keyword| title.contains(&keyword.to_lowercase()))
}

pub fn country_of(location: &str) -> Country {
    let location = location.to_lowercase();
    if location.contains("united states") || location.contains("usa") {
        Country::UnitedStates
    } else {
        Country::Other
    }
}
