//! ClinicalTrials.gov API client for study searches.
//!
//! Pages are fetched with a blocking client and returned as raw JSON; shaping
//! the studies into records is left to the normalizer.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::Url;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, RETRY_AFTER, USER_AGENT};
use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};
use trials_model::{KeyPath, StudiesPath};

use crate::error::{FetchError, Result};
use crate::query::SearchQuery;

/// Studies endpoint of the v2 API.
pub const DEFAULT_BASE_URL: &str = "https://clinicaltrials.gov/api/v2/studies";

/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fallback wait when a rate-limited response has no usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// User agent string for API requests.
const USER_AGENT_VALUE: &str = concat!("trial-search/", env!("CARGO_PKG_VERSION"));

/// Studies gathered across one or more pages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResponse {
    /// Where each page keeps its study list.
    pub studies_path: StudiesPath,
    /// Raw study objects in API order.
    pub studies: Vec<Value>,
    /// Total matches reported by the first page.
    pub total_count: Option<u64>,
    /// Token for the page after the last one fetched.
    pub next_page_token: Option<String>,
    /// Number of pages requested.
    pub pages_fetched: u32,
    /// A page that did not carry a study list, kept for diagnosis.
    pub malformed_page: Option<Value>,
}

impl SearchResponse {
    /// Empty response whose pages carry their studies at `studies_path`.
    #[must_use]
    pub fn new(studies_path: StudiesPath) -> Self {
        Self {
            studies_path,
            ..Self::default()
        }
    }

    /// Appends one raw page. Returns false when the page had no study list.
    ///
    /// `totalCount` and `nextPageToken` are read next to the study list,
    /// falling back to the top of the page.
    pub fn push_page(&mut self, page: Value) -> bool {
        self.pages_fetched += 1;
        let Some(Value::Array(studies)) = self.studies_path.key_path().lookup(&page) else {
            warn!(path = %self.studies_path, "response page has no study list");
            self.next_page_token = None;
            self.malformed_page = Some(page);
            return false;
        };
        self.studies.extend(studies.iter().cloned());
        if self.total_count.is_none() {
            self.total_count = self.page_field(&page, "totalCount").and_then(Value::as_u64);
        }
        self.next_page_token = self
            .page_field(&page, "nextPageToken")
            .and_then(Value::as_str)
            .map(str::to_string);
        true
    }

    fn page_field<'a>(&self, page: &'a Value, key: &str) -> Option<&'a Value> {
        let segments = self.studies_path.key_path().segments();
        let parent = &segments[..segments.len().saturating_sub(1)];
        KeyPath::new(parent.iter().map(String::as_str).chain([key]))
            .lookup(page)
            .or_else(|| page.get(key))
    }

    /// True when more pages are available.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.next_page_token.is_some()
    }

    /// Single response document holding every study at the studies path.
    ///
    /// When nothing was collected and a page was malformed, that page is
    /// returned unchanged so callers can inspect it.
    #[must_use]
    pub fn into_document(self) -> Value {
        if self.studies.is_empty()
            && let Some(page) = self.malformed_page
        {
            return page;
        }
        let mut document = Value::Array(self.studies);
        for segment in self.studies_path.key_path().segments().iter().rev() {
            let mut node = Map::new();
            node.insert(segment.clone(), document);
            document = Value::Object(node);
        }
        if let Some(total) = self.total_count {
            document["totalCount"] = json!(total);
        }
        if let Some(token) = self.next_page_token {
            document["nextPageToken"] = json!(token);
        }
        document
    }
}

/// Client for the ClinicalTrials.gov studies API.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    client: Client,
    base_url: Url,
    studies_path: StudiesPath,
}

impl RegistryClient {
    /// Creates a client for the public API.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a client for a different studies endpoint (mirrors, tests).
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| FetchError::InvalidQuery(format!("invalid base URL {base_url}: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| FetchError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            studies_path: StudiesPath::default(),
        })
    }

    /// Reads each page's study list at `path` instead of `studies`.
    #[must_use]
    pub fn with_studies_path(mut self, path: StudiesPath) -> Self {
        self.studies_path = path;
        self
    }

    /// Full request URL for one page of `query`.
    #[must_use]
    pub fn page_url(&self, query: &SearchQuery) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().extend_pairs(query.params());
        url
    }

    /// Fetches a single page and returns the raw JSON document.
    pub fn fetch_page(&self, query: &SearchQuery) -> Result<Value> {
        query.validate()?;
        let url = self.page_url(query);
        debug!(%url, "fetching studies page");
        let response = self.client.get(url).send()?;
        handle_response(response)
    }

    /// Runs a search, following `nextPageToken` up to `max_pages`.
    pub fn search(&self, query: &SearchQuery) -> Result<SearchResponse> {
        query.validate()?;
        let mut result = SearchResponse::new(self.studies_path.clone());
        let mut page_query = query.clone();
        loop {
            let page = self.fetch_page(&page_query)?;
            if !result.push_page(page) || !result.has_more() {
                break;
            }
            if result.pages_fetched >= query.max_pages {
                debug!(pages = result.pages_fetched, "page limit reached");
                break;
            }
            page_query = page_query.page_token(result.next_page_token.clone());
        }
        info!(
            studies = result.studies.len(),
            pages = result.pages_fetched,
            total = ?result.total_count,
            "search complete"
        );
        Ok(result)
    }
}

/// Checks the status and parses the body of a studies response.
fn handle_response(response: Response) -> Result<Value> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_retry_after)
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
        return Err(FetchError::RateLimited { retry_after });
    }

    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        let message = if body.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        } else {
            body
        };
        return Err(FetchError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let body = response.text()?;
    let value: Value = serde_json::from_str(&body)?;
    Ok(value)
}

/// Seconds form of a `Retry-After` header value.
fn parse_retry_after(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::StudyStatus;

    #[test]
    fn test_client_creation() {
        assert!(RegistryClient::new().is_ok());
        assert!(RegistryClient::with_base_url("not a url").is_err());
    }

    #[test]
    fn page_url_encodes_params() {
        let client = RegistryClient::new().unwrap();
        let query = SearchQuery::new()
            .term("lung cancer")
            .status(StudyStatus::Recruiting);
        let url = client.page_url(&query);
        assert_eq!(url.host_str(), Some("clinicaltrials.gov"));
        assert_eq!(url.path(), "/api/v2/studies");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("query.term".to_string(), "lung cancer".to_string())));
        assert!(pairs.contains(&("filter.overallStatus".to_string(), "RECRUITING".to_string())));
    }

    #[test]
    fn retry_after_seconds() {
        assert_eq!(parse_retry_after(" 120 "), Some(120));
        assert_eq!(parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT"), None);
    }
}
