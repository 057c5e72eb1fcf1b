//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the shared HTTP client with the configured timeout
//! - Building per-site header maps from profile configuration
//! - GET requests, with failures classified into [`FetchError`]
//!
//! There is no retry logic here; retry policy belongs to the caller.

use crate::config::CrawlerConfig;
use crate::crawler::parser::Document;
use crate::FetchError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

/// Builds the HTTP client shared by every fetch in a run
///
/// # Arguments
///
/// * `config` - The crawler configuration, providing the request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(config.request_timeout())
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds the header map sent with every request for one site.
///
/// Entries that do not form a legal header name/value pair are skipped;
/// config validation rejects those at load time, so a skip here only happens
/// for configs that bypassed validation.
pub fn profile_headers(headers: &BTreeMap<String, String>) -> HeaderMap {
    let mut map = HeaderMap::new();

    for (name, value) in headers {
        let name = match HeaderName::from_bytes(name.as_bytes()) {
            Ok(name) => name,
            Err(_) => {
                tracing::debug!("Skipping invalid header name '{}'", name);
                continue;
            }
        };
        let value = match HeaderValue::from_str(value) {
            Ok(value) => value,
            Err(_) => {
                tracing::debug!("Skipping invalid value for header '{}'", name);
                continue;
            }
        };
        map.insert(name, value);
    }

    map
}

/// Fetches one page and parses it into a queryable [`Document`]
///
/// Performs exactly one outbound GET per call and never retries. Network
/// failure, timeout, a non-2xx status, and an unreadable body each map to
/// their own [`FetchError`] variant carrying the URL.
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `url` - Absolute URL to fetch
/// * `headers` - Headers sent with the request
///
/// # Returns
///
/// * `Ok(Document)` - Parsed page; ownership transfers to the caller
/// * `Err(FetchError)` - The classified failure
pub async fn fetch_page(
    client: &Client,
    url: &Url,
    headers: &HeaderMap,
) -> Result<Document, FetchError> {
    let response = client
        .get(url.clone())
        .headers(headers.clone())
        .send()
        .await
        .map_err(|e| classify_send_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(|e| {
        if e.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Body {
                url: url.to_string(),
                source: e,
            }
        }
    })?;

    Ok(Document::parse(&body))
}

fn classify_send_error(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrawlerConfig;

    fn test_crawler_config() -> CrawlerConfig {
        CrawlerConfig {
            request_timeout_ms: 30_000,
            max_pages_per_site: None,
        }
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&test_crawler_config());
        assert!(client.is_ok());
    }

    #[test]
    fn test_profile_headers_valid() {
        let mut headers = BTreeMap::new();
        headers.insert("User-Agent".to_string(), "Mozilla/5.0".to_string());
        headers.insert("Accept-Language".to_string(), "en-US".to_string());

        let map = profile_headers(&headers);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("user-agent").unwrap(), "Mozilla/5.0");
    }

    #[test]
    fn test_profile_headers_skips_invalid() {
        let mut headers = BTreeMap::new();
        headers.insert("bad header".to_string(), "value".to_string());
        headers.insert("X-Ok".to_string(), "fine".to_string());
        headers.insert("X-Bad-Value".to_string(), "line\nbreak".to_string());

        let map = profile_headers(&headers);
        assert_eq!(map.len(), 1);
        assert!(map.get("x-ok").is_some());
    }

    // Fetch behavior (status classification, timeouts) is covered by the
    // wiremock integration tests.
}
