//! DuckDuckGo scraping provider (primary tier).
//!
//! Uses the HTML-only endpoint, which needs no JavaScript and no API key.

use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use url::Url;

use crate::provider::SearchProvider;
use crate::types::{BridgeError, BridgeResult, SearchRecord};

/// Default HTML endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                          AppleWebKit/537.36 (KHTML, like Gecko) \
                          Chrome/131.0.0.0 Safari/537.36";

/// Scrapes DuckDuckGo's HTML results page.
#[derive(Clone)]
pub struct DuckDuckGoProvider {
    client: reqwest::Client,
    endpoint: String,
    safe_search: bool,
}

impl DuckDuckGoProvider {
    /// Create a provider against the public endpoint.
    pub fn new(safe_search: bool) -> BridgeResult<Self> {
        Self::with_endpoint(DEFAULT_ENDPOINT, safe_search)
    }

    /// Create a provider against a custom endpoint (used by tests).
    pub fn with_endpoint(endpoint: impl Into<String>, safe_search: bool) -> BridgeResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| BridgeError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            safe_search,
        })
    }

    fn safe_search_param(&self) -> &'static str {
        if self.safe_search {
            "1"
        } else {
            "-2"
        }
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    async fn search(&self, query: &str, limit: usize) -> BridgeResult<Vec<SearchRecord>> {
        tracing::debug!(query, "DuckDuckGo search");

        let params = [("q", query), ("kp", self.safe_search_param())];

        let html = self
            .client
            .post(&self.endpoint)
            .form(&params)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| BridgeError::Http(format!("DuckDuckGo request failed: {e}")))?
            .error_for_status()
            .map_err(|e| BridgeError::Http(format!("DuckDuckGo HTTP error: {e}")))?
            .text()
            .await
            .map_err(|e| BridgeError::Http(format!("DuckDuckGo response read failed: {e}")))?;

        tracing::trace!(bytes = html.len(), "DuckDuckGo response received");

        parse_results(&html, limit)
    }
}

/// Extract the real target from DuckDuckGo's `/l/?uddg=` redirect wrapper.
pub fn unwrap_redirect(href: &str) -> Option<String> {
    let full = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    };

    let parsed = Url::parse(&full).ok()?;

    let is_redirect = parsed
        .host_str()
        .is_some_and(|h| h == "duckduckgo.com" || h.ends_with(".duckduckgo.com"))
        && parsed.path().starts_with("/l/");

    if is_redirect {
        parsed
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, value)| value.into_owned())
    } else {
        Some(full)
    }
}

/// Parse a results page into at most `limit` records. Ads are skipped.
pub fn parse_results(html: &str, limit: usize) -> BridgeResult<Vec<SearchRecord>> {
    let document = Html::parse_document(html);

    let result_sel = selector(
        ".result.results_links.results_links_deep:not(.result--ad), .web-result:not(.result--ad)",
    )?;
    let title_sel = selector(".result__a")?;
    let snippet_sel = selector(".result__snippet")?;

    let mut records = Vec::new();

    for element in document.select(&result_sel) {
        if records.len() >= limit {
            break;
        }

        let Some(anchor) = element.select(&title_sel).next() else {
            continue;
        };

        let title = collapse_whitespace(&anchor.text().collect::<String>());
        if title.is_empty() {
            continue;
        }

        let Some(link) = anchor.value().attr("href").and_then(unwrap_redirect) else {
            continue;
        };

        let snippet = element
            .select(&snippet_sel)
            .next()
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .filter(|s| !s.is_empty());

        records.push(SearchRecord {
            title: Some(title),
            link: Some(link),
            snippet,
        });
    }

    tracing::debug!(count = records.len(), "DuckDuckGo results parsed");
    Ok(records)
}

fn selector(css: &str) -> BridgeResult<Selector> {
    Selector::parse(css).map_err(|e| BridgeError::Parse(format!("invalid selector {css}: {e:?}")))
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html><body>
<div class="result results_links results_links_deep result--ad">
    <a class="result__a" href="https://ads.example/buy">Sponsored thing</a>
    <div class="result__snippet">Buy now</div>
</div>
<div class="result results_links results_links_deep web-result">
    <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.rust-lang.org%2F&amp;rut=abc">
        Rust Programming
        Language
    </a>
    <div class="result__snippet">A language empowering everyone.</div>
</div>
<div class="result results_links results_links_deep web-result">
    <a class="result__a" href="https://doc.rust-lang.org/book/">The Book</a>
</div>
<div class="result results_links results_links_deep web-result">
    <a class="result__a" href="https://crates.io/">crates.io</a>
    <div class="result__snippet">The Rust community's crate registry</div>
</div>
</body></html>"#;

    #[test]
    fn test_unwrap_redirect() {
        let href = "//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Fpage&rut=abc";
        assert_eq!(unwrap_redirect(href).as_deref(), Some("https://example.com/page"));
    }

    #[test]
    fn test_unwrap_direct_link() {
        assert_eq!(
            unwrap_redirect("https://example.com/direct").as_deref(),
            Some("https://example.com/direct")
        );
    }

    #[test]
    fn test_unwrap_invalid() {
        assert!(unwrap_redirect("not-a-url").is_none());
    }

    #[test]
    fn test_parse_skips_ads_and_unwraps() {
        let records = parse_results(PAGE, 10).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].title.as_deref(), Some("Rust Programming Language"));
        assert_eq!(records[0].link.as_deref(), Some("https://www.rust-lang.org/"));
        assert!(records.iter().all(|r| r.link.as_deref() != Some("https://ads.example/buy")));
    }

    #[test]
    fn test_missing_snippet_is_none() {
        let records = parse_results(PAGE, 10).unwrap();
        assert_eq!(records[1].snippet, None);
        assert_eq!(
            records[2].snippet.as_deref(),
            Some("The Rust community's crate registry")
        );
    }

    #[test]
    fn test_parse_respects_limit() {
        assert_eq!(parse_results(PAGE, 2).unwrap().len(), 2);
        assert!(parse_results(PAGE, 0).unwrap().is_empty());
    }

    #[test]
    fn test_parse_empty_page() {
        assert!(parse_results("<html><body></body></html>", 10)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_safe_search_param() {
        assert_eq!(DuckDuckGoProvider::new(true).unwrap().safe_search_param(), "1");
        assert_eq!(DuckDuckGoProvider::new(false).unwrap().safe_search_param(), "-2");
    }
}
