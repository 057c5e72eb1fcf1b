//! Listing, content, and pagination extraction
//!
//! Three selector-driven operations over a parsed page:
//! - article link discovery inside the listing container
//! - title/body extraction from an article page, after exclusions
//! - locating the "next page" link
//!
//! All three treat a missing match as an expected condition with a defined
//! fallback, never as an error that aborts a crawl.

use crate::config::SiteProfile;
use crate::crawler::parser::Document;
use serde::{Deserialize, Serialize};
use url::Url;

/// One successfully extracted article.
///
/// Emitted only when both title and body extraction succeed; there are no
/// partially-filled records. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    pub content: String,
    pub url: String,
}

/// Outcome of scanning a listing page for article links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingLinks {
    /// The listing container matched; zero or more article URLs in document order.
    Found(Vec<Url>),
    /// Nothing matched the listing selector. Expected and non-fatal.
    NoListing,
}

/// Finds the article links on a listing page.
///
/// Looks inside the first element matching `listing_selector` for elements
/// matching `link_selector`; every `href` found is resolved against `base`
/// (relative links become absolute, absolute links pass through) and
/// collected in document order. Elements without an `href` are silently
/// skipped.
pub fn extract_article_links(
    doc: &Document,
    listing_selector: &str,
    link_selector: &str,
    base: &Url,
) -> ListingLinks {
    match doc.hrefs_within(listing_selector, link_selector, base) {
        Some(urls) => ListingLinks::Found(urls),
        None => ListingLinks::NoListing,
    }
}

/// Pulls title and body text out of a fetched article page.
///
/// Subtrees matching the profile's exclusion selectors are removed first, so
/// their text can never leak into the result; removal mutates only this
/// in-memory document. Extraction is deterministic: the same page bytes
/// always produce the same record.
///
/// Returns `None`, with a warning naming the URL and the selector that
/// failed, when either the title or the content element is missing. This is
/// the most common recoverable failure and must not abort the site's crawl.
pub fn extract_content(
    doc: &mut Document,
    article_url: &Url,
    profile: &SiteProfile,
) -> Option<ArticleRecord> {
    doc.strip(&profile.exclude_selectors);

    let title = doc.first_text(&profile.title_selector);
    let content = doc.first_text(&profile.content_selector);

    if title.is_none() {
        tracing::warn!(
            "No title found for {} (selector '{}')",
            article_url,
            profile.title_selector
        );
    }
    if content.is_none() {
        tracing::warn!(
            "No content found for {} (selector '{}')",
            article_url,
            profile.content_selector
        );
    }

    match (title, content) {
        (Some(title), Some(content)) => Some(ArticleRecord {
            title,
            content,
            url: article_url.to_string(),
        }),
        _ => None,
    }
}

/// Locates the "next page" link on a listing page.
///
/// Returns `None` when the selector is not configured, nothing matches it,
/// or no match carries a resolvable `href`. `None` is the pagination
/// terminal condition.
pub fn next_page_url(
    doc: &Document,
    pagination_selector: Option<&str>,
    base: &Url,
) -> Option<Url> {
    let selector = pagination_selector?;
    doc.first_href(selector, base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn base_url() -> Url {
        Url::parse("https://example.com/stories").unwrap()
    }

    fn test_profile() -> SiteProfile {
        SiteProfile {
            name: "websiteA".to_string(),
            base_url: "https://example.com/stories".to_string(),
            headers: BTreeMap::new(),
            delay_ms: 0,
            listing_selector: "div.article-list".to_string(),
            link_selector: "a.article-link".to_string(),
            title_selector: "h1.article-title".to_string(),
            content_selector: "div.article-content".to_string(),
            exclude_selectors: vec!["div.ad-section".to_string(), "aside.sidebar".to_string()],
            pagination_selector: Some("a.next-page".to_string()),
        }
    }

    const ARTICLE_PAGE: &str = r#"<html><body>
        <aside class="sidebar">related stories</aside>
        <h1 class="article-title">The   Title</h1>
        <div class="article-content">
            <p>First paragraph.</p>
            <div class="ad-section">BUY NOW</div>
            <p>Second paragraph.</p>
        </div>
    </body></html>"#;

    #[test]
    fn test_extract_links_in_document_order() {
        let doc = Document::parse(
            r#"<html><body><div class="article-list">
            <a class="article-link" href="/articles/a">A</a>
            <a class="article-link" href="/articles/b">B</a>
            <a class="article-link" href="https://example.com/articles/c">C</a>
            </div></body></html>"#,
        );

        let links = extract_article_links(&doc, "div.article-list", "a.article-link", &base_url());
        let ListingLinks::Found(urls) = links else {
            panic!("expected links");
        };
        let urls: Vec<_> = urls.iter().map(|u| u.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/articles/a",
                "https://example.com/articles/b",
                "https://example.com/articles/c",
            ]
        );
    }

    #[test]
    fn test_extract_links_skips_missing_href() {
        let doc = Document::parse(
            r#"<html><body><div class="article-list">
            <a class="article-link">no href</a>
            <a class="article-link" href="/articles/a">A</a>
            </div></body></html>"#,
        );

        let links = extract_article_links(&doc, "div.article-list", "a.article-link", &base_url());
        assert_eq!(
            links,
            ListingLinks::Found(vec![Url::parse("https://example.com/articles/a").unwrap()])
        );
    }

    #[test]
    fn test_extract_links_no_listing() {
        let doc = Document::parse(r#"<html><body><p>nothing here</p></body></html>"#);
        let links = extract_article_links(&doc, "div.article-list", "a.article-link", &base_url());
        assert_eq!(links, ListingLinks::NoListing);
    }

    #[test]
    fn test_extract_content_strips_exclusions() {
        let mut doc = Document::parse(ARTICLE_PAGE);
        let url = Url::parse("https://example.com/articles/a").unwrap();
        let record = extract_content(&mut doc, &url, &test_profile()).unwrap();

        assert_eq!(record.title, "The Title");
        assert_eq!(record.content, "First paragraph. Second paragraph.");
        assert_eq!(record.url, "https://example.com/articles/a");
        assert!(!record.content.contains("BUY NOW"));
        assert!(!record.content.contains("related stories"));
    }

    #[test]
    fn test_extract_content_missing_title() {
        let mut doc = Document::parse(
            r#"<html><body><div class="article-content"><p>body</p></div></body></html>"#,
        );
        let url = Url::parse("https://example.com/articles/a").unwrap();
        assert!(extract_content(&mut doc, &url, &test_profile()).is_none());
    }

    #[test]
    fn test_extract_content_missing_body() {
        let mut doc = Document::parse(
            r#"<html><body><h1 class="article-title">Title only</h1></body></html>"#,
        );
        let url = Url::parse("https://example.com/articles/a").unwrap();
        assert!(extract_content(&mut doc, &url, &test_profile()).is_none());
    }

    #[test]
    fn test_extract_content_excluded_content_element_yields_none() {
        // The exclusion pass runs before extraction, so a content element
        // inside an excluded region counts as missing.
        let mut doc = Document::parse(
            r#"<html><body>
            <h1 class="article-title">Title</h1>
            <aside class="sidebar"><div class="article-content">hidden</div></aside>
            </body></html>"#,
        );
        let url = Url::parse("https://example.com/articles/a").unwrap();
        assert!(extract_content(&mut doc, &url, &test_profile()).is_none());
    }

    #[test]
    fn test_extraction_is_deterministic_on_same_bytes() {
        let url = Url::parse("https://example.com/articles/a").unwrap();
        let profile = test_profile();

        let mut first = Document::parse(ARTICLE_PAGE);
        let mut second = Document::parse(ARTICLE_PAGE);
        let a = extract_content(&mut first, &url, &profile).unwrap();
        let b = extract_content(&mut second, &url, &profile).unwrap();
        assert_eq!(a, b);

        // Running extraction again over the already-stripped document also
        // yields the identical record.
        let c = extract_content(&mut first, &url, &profile).unwrap();
        assert_eq!(a, c);
    }

    #[test]
    fn test_next_page_url_found() {
        let doc = Document::parse(
            r#"<html><body><a class="next-page" href="/stories?page=2">Next</a></body></html>"#,
        );
        let next = next_page_url(&doc, Some("a.next-page"), &base_url()).unwrap();
        assert_eq!(next.as_str(), "https://example.com/stories?page=2");
    }

    #[test]
    fn test_next_page_url_absent() {
        let doc = Document::parse(r#"<html><body><p>last page</p></body></html>"#);
        assert!(next_page_url(&doc, Some("a.next-page"), &base_url()).is_none());
    }

    #[test]
    fn test_next_page_url_unconfigured() {
        let doc = Document::parse(
            r#"<html><body><a class="next-page" href="/stories?page=2">Next</a></body></html>"#,
        );
        assert!(next_page_url(&doc, None, &base_url()).is_none());
    }

    #[test]
    fn test_next_page_url_match_without_href() {
        let doc = Document::parse(r#"<html><body><span class="next-page">Next</span></body></html>"#);
        assert!(next_page_url(&doc, Some(".next-page"), &base_url()).is_none());
    }
}
