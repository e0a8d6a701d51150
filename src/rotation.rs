// src/rotation.rs
use chrono::{Timelike, Utc};

/// Select a bounded, contiguous circular window of the location list.
///
/// With the default hour seed, repeated runs within the same hour visit the
/// same subset while successive hours walk the full list, which bounds
/// outbound request volume without permanently skipping any location.
pub fn rotate_locations(all: &[String], size: usize, seed: usize) -> Vec<String> {
    if all.is_empty() {
        return Vec::new();
    }
    if size >= all.len() {
        return all.to_vec();
    }
    let start = seed % all.len();
    all.iter().cycle().skip(start).take(size).cloned().collect()
}

/// Default rotation seed: the current UTC hour.
pub fn hour_seed() -> usize {
    Utc::now().hour() as usize
}
