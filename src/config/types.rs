use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Main configuration structure for storyharvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub output: OutputConfig,
    #[serde(default, rename = "site")]
    pub sites: Vec<SiteProfile>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Timeout applied to every HTTP request (milliseconds)
    #[serde(rename = "request-timeout-ms", default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Maximum listing pages fetched per site; absent means unlimited
    #[serde(rename = "max-pages-per-site", default)]
    pub max_pages_per_site: Option<u32>,
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

impl CrawlerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path the collected stories are written to as a JSON array
    #[serde(rename = "stories-path")]
    pub stories_path: String,
}

/// Declarative description of one crawl target.
///
/// Selector fields are opaque strings. Whether a selector is valid is only
/// decided at runtime by whether it matches anything; an unparseable selector
/// matches nothing.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteProfile {
    /// Name identifying this site in logs and diagnostics
    pub name: String,

    /// First listing page, and the base every relative link resolves against
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Request headers sent with every fetch for this site
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Politeness delay after each article request (milliseconds)
    #[serde(rename = "delay-ms")]
    pub delay_ms: u64,

    /// Container holding the article links on a listing page
    #[serde(rename = "listing-selector")]
    pub listing_selector: String,

    /// Article links within the listing container
    #[serde(rename = "link-selector")]
    pub link_selector: String,

    /// Article title element on an article page
    #[serde(rename = "title-selector")]
    pub title_selector: String,

    /// Article body element on an article page
    #[serde(rename = "content-selector")]
    pub content_selector: String,

    /// Regions removed from article pages before extraction (ads, nav, sidebars)
    #[serde(rename = "exclude-selectors", default)]
    pub exclude_selectors: Vec<String>,

    /// "Next page" link on a listing page; absent means no pagination
    #[serde(rename = "pagination-selector", default)]
    pub pagination_selector: Option<String>,
}

impl SiteProfile {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}
