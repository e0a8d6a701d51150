// src/fetch.rs
//! Paginated search fetching with bounded retry/backoff.

use crate::types::SearchQuery;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

pub const SEARCH_ENDPOINT: &str =
    "https://www.linkedin.com/jobs-guest/jobs/api/seeMoreJobPostings/search";
pub const PAGE_SIZE: usize = 25;

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);
const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_START: Duration = Duration::from_millis(600);

// Browser-like header set; the guest endpoint blocks bare clients.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
const REFERER: &str = "https://www.linkedin.com/jobs/search/";

/// Source of raw search result pages. `None` means "no more pages for this
/// query": the caller stops paginating but the run continues.
#[async_trait]
pub trait JobSource: Send + Sync {
    async fn fetch_page(&self, query: &SearchQuery, page: usize) -> Option<String>;
}

pub struct SearchClient {
    client: reqwest::Client,
    endpoint: String,
}

impl SearchClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: SEARCH_ENDPOINT.to_string(),
        })
    }

    #[cfg(test)]
    fn with_endpoint(endpoint: String) -> Result<Self> {
        let mut client = Self::new()?;
        client.endpoint = endpoint;
        Ok(client)
    }
}

pub(crate) fn retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

#[async_trait]
impl JobSource for SearchClient {
    async fn fetch_page(&self, query: &SearchQuery, page: usize) -> Option<String> {
        let start = (page * PAGE_SIZE).to_string();
        let mut backoff = BACKOFF_START;

        for attempt in 1..=MAX_ATTEMPTS {
            let response = self
                .client
                .get(&self.endpoint)
                .header(reqwest::header::ACCEPT, ACCEPT)
                .header(reqwest::header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE)
                .header(reqwest::header::REFERER, REFERER)
                .query(&[
                    ("keywords", query.keywords.as_str()),
                    ("location", query.location.as_str()),
                    ("f_TPR", query.time_window.as_str()),
                    ("sortBy", "DD"),
                    ("start", start.as_str()),
                ])
                .send()
                .await;

            match response {
                Ok(resp) => {
                    let status = resp.status();
                    if retryable_status(status.as_u16()) {
                        warn!(
                            "Transient {} for '{}' page {} (attempt {}/{})",
                            status, query.location, page, attempt, MAX_ATTEMPTS
                        );
                    } else if !status.is_success() {
                        debug!(
                            "Non-success {} for '{}' page {}, stopping pagination",
                            status, query.location, page
                        );
                        return None;
                    } else {
                        match resp.text().await {
                            Ok(body) if !body.trim().is_empty() => return Some(body),
                            Ok(_) => {
                                debug!("Empty body for '{}' page {}", query.location, page);
                                return None;
                            }
                            Err(e) => {
                                warn!(
                                    "Failed to read body for '{}' page {}: {}",
                                    query.location, page, e
                                );
                            }
                        }
                    }
                }
                Err(e) => {
                    warn!(
                        "Request error for '{}' page {} (attempt {}/{}): {}",
                        query.location, page, attempt, MAX_ATTEMPTS, e
                    );
                }
            }

            if attempt < MAX_ATTEMPTS {
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
        }

        warn!(
            "Giving up on '{}' page {} after {} attempts",
            query.location, page, MAX_ATTEMPTS
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        for status in [429, 500, 502, 503, 504] {
            assert!(retryable_status(status), "{} should be retryable", status);
        }
        for status in [200, 301, 400, 401, 403, 404] {
            assert!(!retryable_status(status), "{} should not be retryable", status);
        }
    }

    #[test]
    fn test_page_offsets_use_fixed_page_size() {
        let offsets: Vec<usize> = (0..4).map(|page| page * PAGE_SIZE).collect();
        assert_eq!(offsets, vec![0, 25, 50, 75]);
    }

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    // Minimal HTTP stub answering each connection with the next queued
    // status, counting how many requests actually arrive.
    async fn spawn_stub_server(statuses: Vec<u16>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        tokio::spawn(async move {
            for status in statuses {
                let (mut socket, _) = match listener.accept().await {
                    Ok(accepted) => accepted,
                    Err(_) => return,
                };
                counter.fetch_add(1, Ordering::SeqCst);
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let response = if status == 200 {
                    let body = "<html>ok</html>";
                    format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    )
                } else {
                    format!(
                        "HTTP/1.1 {} Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                        status
                    )
                };
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });
        (format!("http://{}", addr), hits)
    }

    fn query() -> SearchQuery {
        SearchQuery {
            keywords: "sre".to_string(),
            location: "Austin, TX".to_string(),
            time_window: "r3600".to_string(),
        }
    }

    #[tokio::test]
    async fn test_transient_failures_are_retried_until_success() {
        let (endpoint, hits) = spawn_stub_server(vec![503, 503, 200]).await;
        let client = SearchClient::with_endpoint(endpoint).unwrap();
        let body = client.fetch_page(&query(), 0).await;
        assert_eq!(body.as_deref(), Some("<html>ok</html>"));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retries_are_bounded_then_pagination_stops() {
        let (endpoint, hits) = spawn_stub_server(vec![503, 503, 503, 503]).await;
        let client = SearchClient::with_endpoint(endpoint).unwrap();
        assert!(client.fetch_page(&query(), 0).await.is_none());
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_status_fails_after_single_attempt() {
        let (endpoint, hits) = spawn_stub_server(vec![404, 404, 404]).await;
        let client = SearchClient::with_endpoint(endpoint).unwrap();
        assert!(client.fetch_page(&query(), 0).await.is_none());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
