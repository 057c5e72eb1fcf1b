//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives the full traversal for each configured site:
//! fetch listing, extract links, fetch each article with the politeness
//! delay, follow pagination, repeat until exhausted. Failures stop at the
//! site boundary; one site's failure never prevents the others from
//! completing.

use crate::config::{Config, CrawlerConfig, SiteProfile};
use crate::crawler::extractor::{
    extract_article_links, extract_content, next_page_url, ArticleRecord, ListingLinks,
};
use crate::crawler::fetcher::{build_http_client, fetch_page, profile_headers};
use crate::crawler::parser::Document;
use crate::output::ResultSink;
use crate::HarvestError;
use reqwest::header::HeaderMap;
use reqwest::Client;
use std::collections::HashSet;
use url::Url;

/// Traversal phases for one site.
///
/// The listing loop is an explicit state machine rather than a single
/// mutable current-URL variable: each phase names what the crawler is doing
/// and carries exactly the data that phase needs.
enum CrawlPhase {
    /// Fetching a listing page
    FetchingListing(Url),
    /// Scanning the fetched listing for article links and the next-page link
    ExtractingLinks(Document),
    /// Fetching the discovered articles one by one
    FetchingArticles { links: Vec<Url>, next: Option<Url> },
    /// Deciding whether the crawl continues to another listing page
    FollowingPagination { next: Option<Url> },
    /// Terminal
    Done,
}

/// Crawls one site profile from its base URL until pagination runs out.
///
/// Never fails: every failure mode ends as a logged skip or a logged early
/// stop, and the worst outcome is an empty record list.
struct SiteCrawler<'a> {
    client: &'a Client,
    crawler: &'a CrawlerConfig,
    profile: &'a SiteProfile,
    headers: HeaderMap,
    base: Url,
    visited: HashSet<String>,
    listing_fetches: u32,
    records: Vec<ArticleRecord>,
}

impl<'a> SiteCrawler<'a> {
    fn new(
        client: &'a Client,
        crawler: &'a CrawlerConfig,
        profile: &'a SiteProfile,
        base: Url,
    ) -> Self {
        Self {
            client,
            crawler,
            profile,
            headers: profile_headers(&profile.headers),
            base,
            visited: HashSet::new(),
            listing_fetches: 0,
            records: Vec::new(),
        }
    }

    async fn run(mut self) -> Vec<ArticleRecord> {
        let mut phase = CrawlPhase::FetchingListing(self.base.clone());

        loop {
            phase = match phase {
                CrawlPhase::FetchingListing(url) => self.fetch_listing(url).await,
                CrawlPhase::ExtractingLinks(listing) => self.extract_links(listing),
                CrawlPhase::FetchingArticles { links, next } => {
                    self.fetch_articles(links, next).await
                }
                CrawlPhase::FollowingPagination { next } => self.follow_pagination(next),
                CrawlPhase::Done => break,
            };
        }

        self.records
    }

    async fn fetch_listing(&mut self, url: Url) -> CrawlPhase {
        if let Some(cap) = self.crawler.max_pages_per_site {
            if self.listing_fetches >= cap {
                tracing::warn!(
                    "Site '{}': reached listing page cap of {}, stopping",
                    self.profile.name,
                    cap
                );
                return CrawlPhase::Done;
            }
        }

        self.visited.insert(url.to_string());
        self.listing_fetches += 1;

        match fetch_page(self.client, &url, &self.headers).await {
            Ok(listing) => CrawlPhase::ExtractingLinks(listing),
            Err(e) => {
                // Records collected from earlier pages are kept.
                tracing::error!(
                    "Site '{}': listing fetch failed, ending crawl: {}",
                    self.profile.name,
                    e
                );
                CrawlPhase::Done
            }
        }
    }

    fn extract_links(&mut self, listing: Document) -> CrawlPhase {
        // The listing document is released at the end of this phase, before
        // any article fetch, so the next-page link is located now and
        // carried forward to the pagination phase.
        let next = next_page_url(
            &listing,
            self.profile.pagination_selector.as_deref(),
            &self.base,
        );

        match extract_article_links(
            &listing,
            &self.profile.listing_selector,
            &self.profile.link_selector,
            &self.base,
        ) {
            ListingLinks::Found(links) => CrawlPhase::FetchingArticles { links, next },
            ListingLinks::NoListing => {
                tracing::warn!(
                    "Site '{}': no article list found for selector '{}'",
                    self.profile.name,
                    self.profile.listing_selector
                );
                CrawlPhase::FollowingPagination { next }
            }
        }
    }

    async fn fetch_articles(&mut self, links: Vec<Url>, next: Option<Url>) -> CrawlPhase {
        for link in links {
            if let Some(record) = self.fetch_article(&link).await {
                self.records.push(record);
            }

            // Politeness delay after every attempt, success or failure.
            tokio::time::sleep(self.profile.delay()).await;
        }

        CrawlPhase::FollowingPagination { next }
    }

    async fn fetch_article(&self, url: &Url) -> Option<ArticleRecord> {
        match fetch_page(self.client, url, &self.headers).await {
            Ok(mut doc) => extract_content(&mut doc, url, self.profile),
            Err(e) => {
                tracing::warn!("Site '{}': skipping article: {}", self.profile.name, e);
                None
            }
        }
    }

    fn follow_pagination(&mut self, next: Option<Url>) -> CrawlPhase {
        match next {
            Some(url) if self.visited.contains(url.as_str()) => {
                tracing::warn!(
                    "Site '{}': pagination points back to already-fetched {}, stopping",
                    self.profile.name,
                    url
                );
                CrawlPhase::Done
            }
            Some(url) => CrawlPhase::FetchingListing(url),
            None => CrawlPhase::Done,
        }
    }
}

/// Crawls one site, returning whatever records it produced.
async fn crawl_site(
    client: &Client,
    crawler: &CrawlerConfig,
    profile: &SiteProfile,
) -> Vec<ArticleRecord> {
    let base = match Url::parse(&profile.base_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::error!(
                "Site '{}': unusable base URL '{}': {}",
                profile.name,
                profile.base_url,
                e
            );
            return Vec::new();
        }
    };

    SiteCrawler::new(client, crawler, profile, base).run().await
}

/// Runs the full crawl over every configured site
///
/// Sites are crawled sequentially in declaration order, sharing one HTTP
/// client, and each site's records are appended to the sink in the order
/// they were produced.
///
/// # Arguments
///
/// * `config` - The loaded run configuration
///
/// # Returns
///
/// * `Ok(ResultSink)` - The ordered run-level record collection
/// * `Err(HarvestError)` - Setup failed before any site was crawled
pub async fn run_crawl(config: &Config) -> Result<ResultSink, HarvestError> {
    let client = build_http_client(&config.crawler)?;
    let mut sink = ResultSink::new();

    for profile in &config.sites {
        tracing::info!("Crawling site '{}' at {}", profile.name, profile.base_url);
        let records = crawl_site(&client, &config.crawler, profile).await;
        tracing::info!(
            "Site '{}': collected {} stories",
            profile.name,
            records.len()
        );
        sink.append(records);
    }

    tracing::info!("Successfully collected {} stories", sink.len());
    Ok(sink)
}
