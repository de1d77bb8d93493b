//! Types shared by the search client and the search server.
//!
//! `SearchRequest` and `Offer` are the two wire messages exchanged over the
//! `/search` WebSocket; `Job` is the record the server indexes.

use serde::{Deserialize, Serialize};

/// Endpoint the client connects to unless configured otherwise.
pub const DEFAULT_SEARCH_URL: &str = "ws://localhost:8080/search";

/// Location used when the user leaves the location field blank.
pub const DEFAULT_LOCATION: &str = "London";

/// A scraped job listing as stored in `data/jobs.json`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Job {
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(default)]
    pub description: String,
    /// Comma separated list, e.g. "rust, tokio, postgres".
    #[serde(default)]
    pub skills: String,
    pub salary_min: Option<i64>,
    #[serde(default)]
    pub url: String,
}

impl Job {
    /// Individual skills, trimmed and lowercased.
    pub fn skill_list(&self) -> Vec<String> {
        self.skills
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// The one message a client sends per connection.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub location: String,
}

impl SearchRequest {
    /// Builds a request, substituting [`DEFAULT_LOCATION`] for a blank location.
    pub fn new(query: impl Into<String>, location: impl AsRef<str>) -> Self {
        let location = location.as_ref();
        let location = if location.trim().is_empty() {
            DEFAULT_LOCATION.to_string()
        } else {
            location.to_string()
        };

        Self {
            query: query.into(),
            location,
        }
    }
}

/// One search hit pushed by the server.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Offer {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub skills: String,
    /// Any JSON number; integers and decimals are both accepted.
    #[serde(default)]
    pub salary_min: Option<f64>,
    /// Share of the query found in the offer's skills, 0 to 100.
    #[serde(rename = "match", default)]
    pub match_percent: f64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
}

impl Offer {
    /// Minimum salary, with a missing value read as 0.
    pub fn salary(&self) -> f64 {
        self.salary_min.unwrap_or(0.0)
    }
}
