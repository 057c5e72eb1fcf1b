use crate::config::types::{Config, CrawlerConfig, OutputConfig, SiteProfile};
use crate::ConfigError;
use reqwest::header::{HeaderName, HeaderValue};
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    validate_sites(&config.sites)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.request_timeout_ms < 1 || config.request_timeout_ms > 600_000 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-ms must be between 1 and 600000, got {}",
            config.request_timeout_ms
        )));
    }

    if let Some(cap) = config.max_pages_per_site {
        if cap < 1 {
            return Err(ConfigError::Validation(format!(
                "max-pages-per-site must be >= 1 when set, got {}",
                cap
            )));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.stories_path.is_empty() {
        return Err(ConfigError::Validation(
            "stories-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the configured site profiles
///
/// Selector strings are deliberately not checked here: selector validity is a
/// runtime question, decided only by whether a match is found on a real page.
fn validate_sites(sites: &[SiteProfile]) -> Result<(), ConfigError> {
    if sites.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[site]] must be configured".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for site in sites {
        if site.name.is_empty() {
            return Err(ConfigError::Validation(
                "site name cannot be empty".to_string(),
            ));
        }

        if !seen.insert(site.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate site name '{}'",
                site.name
            )));
        }

        let url = Url::parse(&site.base_url).map_err(|e| {
            ConfigError::InvalidUrl(format!(
                "Invalid base-url '{}' for site '{}': {}",
                site.base_url, site.name, e
            ))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "base-url for site '{}' must use http or https, got '{}'",
                site.name,
                url.scheme()
            )));
        }

        validate_headers(site)?;
    }

    Ok(())
}

/// Validates that header entries form legal header name/value pairs
fn validate_headers(site: &SiteProfile) -> Result<(), ConfigError> {
    for (name, value) in &site.headers {
        HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
            ConfigError::Validation(format!(
                "invalid header name '{}' for site '{}'",
                name, site.name
            ))
        })?;

        HeaderValue::from_str(value).map_err(|_| {
            ConfigError::Validation(format!(
                "invalid value for header '{}' for site '{}'",
                name, site.name
            ))
        })?;
    }

    Ok(())
}
