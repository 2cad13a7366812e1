//! Search query types for the studies endpoint.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FetchError, Result};

/// Default number of studies per page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page size the API accepts.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Overall recruitment status of a study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StudyStatus {
    ActiveNotRecruiting,
    Completed,
    EnrollingByInvitation,
    NotYetRecruiting,
    Recruiting,
    Suspended,
    Terminated,
    Withdrawn,
    Available,
    NoLongerAvailable,
    TemporarilyNotAvailable,
    ApprovedForMarketing,
    Withheld,
    Unknown,
}

impl StudyStatus {
    /// All statuses.
    pub const ALL: [StudyStatus; 14] = [
        Self::ActiveNotRecruiting,
        Self::Completed,
        Self::EnrollingByInvitation,
        Self::NotYetRecruiting,
        Self::Recruiting,
        Self::Suspended,
        Self::Terminated,
        Self::Withdrawn,
        Self::Available,
        Self::NoLongerAvailable,
        Self::TemporarilyNotAvailable,
        Self::ApprovedForMarketing,
        Self::Withheld,
        Self::Unknown,
    ];

    /// API enum value (e.g. `ACTIVE_NOT_RECRUITING`).
    #[must_use]
    pub const fn as_api_str(self) -> &'static str {
        match self {
            Self::ActiveNotRecruiting => "ACTIVE_NOT_RECRUITING",
            Self::Completed => "COMPLETED",
            Self::EnrollingByInvitation => "ENROLLING_BY_INVITATION",
            Self::NotYetRecruiting => "NOT_YET_RECRUITING",
            Self::Recruiting => "RECRUITING",
            Self::Suspended => "SUSPENDED",
            Self::Terminated => "TERMINATED",
            Self::Withdrawn => "WITHDRAWN",
            Self::Available => "AVAILABLE",
            Self::NoLongerAvailable => "NO_LONGER_AVAILABLE",
            Self::TemporarilyNotAvailable => "TEMPORARILY_NOT_AVAILABLE",
            Self::ApprovedForMarketing => "APPROVED_FOR_MARKETING",
            Self::Withheld => "WITHHELD",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for StudyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_api_str())
    }
}

impl FromStr for StudyStatus {
    type Err = FetchError;

    /// Accepts API values and display forms such as `Active, not recruiting`.
    fn from_str(s: &str) -> Result<Self> {
        let mut key = String::with_capacity(s.len());
        for ch in s.trim().chars() {
            if ch.is_ascii_alphanumeric() {
                key.push(ch.to_ascii_uppercase());
            } else if !key.is_empty() && !key.ends_with('_') {
                key.push('_');
            }
        }
        let key = key.trim_end_matches('_');
        Self::ALL
            .into_iter()
            .find(|status| status.as_api_str() == key)
            .ok_or_else(|| FetchError::InvalidQuery(format!("unknown study status: {s}")))
    }
}

/// Parameters of a study search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text search (`query.term`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    /// Condition or disease (`query.cond`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    /// Site location, e.g. a country (`query.locn`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Allowed overall statuses (`filter.overallStatus`).
    #[serde(default)]
    pub statuses: Vec<StudyStatus>,
    /// Studies per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Continuation token from a previous page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
    /// Upper bound on pages fetched by one search.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_max_pages() -> u32 {
    1
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            term: None,
            condition: None,
            location: None,
            statuses: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
            page_token: None,
            max_pages: default_max_pages(),
        }
    }
}

impl SearchQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn term(mut self, term: impl Into<String>) -> Self {
        self.term = Some(term.into());
        self
    }

    #[must_use]
    pub fn condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: StudyStatus) -> Self {
        if !self.statuses.contains(&status) {
            self.statuses.push(status);
        }
        self
    }

    #[must_use]
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    #[must_use]
    pub fn page_token(mut self, token: Option<String>) -> Self {
        self.page_token = token;
        self
    }

    /// Checks limits the API would reject.
    ///
    /// # Errors
    ///
    /// [`FetchError::InvalidQuery`] for an out-of-range page size or a zero
    /// page limit.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(FetchError::InvalidQuery(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            )));
        }
        if self.max_pages == 0 {
            return Err(FetchError::InvalidQuery(
                "max pages must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Query-string parameters for one page request.
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("format", "json".to_string())];
        let text_params = [
            ("query.term", &self.term),
            ("query.cond", &self.condition),
            ("query.locn", &self.location),
        ];
        for (name, value) in text_params {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                params.push((name, value.to_string()));
            }
        }
        if !self.statuses.is_empty() {
            let joined = self
                .statuses
                .iter()
                .map(|status| status.as_api_str())
                .collect::<Vec<_>>()
                .join(",");
            params.push(("filter.overallStatus", joined));
        }
        params.push(("pageSize", self.page_size.to_string()));
        match &self.page_token {
            Some(token) => params.push(("pageToken", token.clone())),
            None => params.push(("countTotal", "true".to_string())),
        }
        params
    }
}
