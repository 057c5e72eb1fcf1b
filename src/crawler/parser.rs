//! Selector-driven document querying
//!
//! This module wraps a parsed HTML page behind a small query surface:
//! find-first / find-all over opaque selector strings, destructive removal
//! of excluded subtrees, and text extraction with whitespace cleanup.
//!
//! Selector strings are runtime configuration, never compiled logic. An
//! unparseable selector is not an error anywhere in the crate; it simply
//! matches nothing.

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// A fetched page parsed into a queryable tree.
///
/// Owned by the fetch that produced it and discarded once the data needed
/// from it has been extracted; never cached or shared.
///
/// # Example
///
/// ```
/// use storyharvest::crawler::Document;
///
/// let doc = Document::parse("<html><body><h1 class='t'>Hello</h1></body></html>");
/// assert_eq!(doc.first_text("h1.t"), Some("Hello".to_string()));
/// assert_eq!(doc.first_text("h2"), None);
/// ```
#[derive(Debug)]
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses an HTML body. HTML parsing is error-tolerant and never fails.
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    fn compile(raw: &str) -> Option<Selector> {
        match Selector::parse(raw) {
            Ok(selector) => Some(selector),
            Err(e) => {
                tracing::debug!("Selector '{}' does not parse, treating as no match: {:?}", raw, e);
                None
            }
        }
    }

    fn first(&self, selector: &str) -> Option<ElementRef<'_>> {
        let selector = Self::compile(selector)?;
        self.html.select(&selector).next()
    }

    /// Whether any element matches `selector`.
    pub fn has_match(&self, selector: &str) -> bool {
        self.first(selector).is_some()
    }

    /// Visible text of the first element matching `selector`, tags stripped
    /// and whitespace collapsed.
    pub fn first_text(&self, selector: &str) -> Option<String> {
        self.first(selector).map(element_text)
    }

    /// Resolved `href` of the first element matching `selector` that carries
    /// one, or `None`.
    pub fn first_href(&self, selector: &str, base: &Url) -> Option<Url> {
        let selector = Self::compile(selector)?;
        self.html
            .select(&selector)
            .find_map(|element| resolve_href(element, base))
    }

    /// Resolved `href`s, in document order, of elements matching
    /// `link_selector` inside the first element matching `container_selector`.
    ///
    /// Returns `None` when no container matches; elements without an `href`,
    /// and hrefs that fail to resolve, are silently skipped.
    pub fn hrefs_within(
        &self,
        container_selector: &str,
        link_selector: &str,
        base: &Url,
    ) -> Option<Vec<Url>> {
        let container = self.first(container_selector)?;
        let links = match Self::compile(link_selector) {
            Some(selector) => selector,
            None => return Some(Vec::new()),
        };

        Some(
            container
                .select(&links)
                .filter_map(|element| resolve_href(element, base))
                .collect(),
        )
    }

    /// Removes every subtree matching any of `selectors` from the document.
    ///
    /// Destructive to this in-memory document only; detached subtrees are
    /// unreachable from any later query.
    pub fn strip(&mut self, selectors: &[String]) {
        for raw in selectors {
            let selector = match Self::compile(raw) {
                Some(selector) => selector,
                None => continue,
            };

            let ids: Vec<_> = self.html.select(&selector).map(|el| el.id()).collect();
            for id in ids {
                if let Some(mut node) = self.html.tree.get_mut(id) {
                    node.detach();
                }
            }
        }
    }
}

/// Collects an element's text nodes into one cleaned string.
pub fn element_text(element: ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<Vec<_>>().join(" "))
}

/// Trims the input and collapses every run of whitespace (newlines included)
/// into a single space.
///
/// # Example
///
/// ```
/// use storyharvest::crawler::clean_text;
///
/// assert_eq!(clean_text("  a\n  story \t here "), "a story here");
/// ```
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn resolve_href(element: ElementRef<'_>, base: &Url) -> Option<Url> {
    let href = element.value().attr("href")?.trim();
    if href.is_empty() {
        return None;
    }
    base.join(href).ok()
}
