//! Common types for search results
//!
//! These are the payloads exchanged with the search, summary and suggestion
//! services, plus the small enums that name result categories.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result category understood by the search API (`type=` parameter)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    Web,
    Images,
    News,
    Videos,
}

impl ResultType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultType::Web => "web",
            ResultType::Images => "images",
            ResultType::News => "news",
            ResultType::Videos => "videos",
        }
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tab selected by the user, independent of the query
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    All,
    Images,
    News,
    Videos,
}

impl Tab {
    /// All tabs in display order
    pub const ALL: [Tab; 4] = [Tab::All, Tab::Images, Tab::News, Tab::Videos];

    /// The result type whose list this tab shows
    pub fn result_type(&self) -> ResultType {
        match self {
            Tab::All => ResultType::Web,
            Tab::Images => ResultType::Images,
            Tab::News => ResultType::News,
            Tab::Videos => ResultType::Videos,
        }
    }

    /// Capitalized label ("All", "Images", ...)
    pub fn label(&self) -> &'static str {
        match self {
            Tab::All => "All",
            Tab::Images => "Images",
            Tab::News => "News",
            Tab::Videos => "Videos",
        }
    }
}

/// A single search result. Identity is `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultItem {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    /// Identifier of the adapter or site that produced the result
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_link: Option<String>,
}

impl ResultItem {
    /// Label shown under the title: the display link if present, else the source
    pub fn source_label(&self) -> &str {
        self.display_link.as_deref().unwrap_or(&self.source)
    }
}

/// One page of results as returned by `GET /search`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub results: Vec<ResultItem>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl SearchPage {
    /// The continuation cursor, with an empty string treated as absent
    pub fn next(&self) -> Option<String> {
        self.next_cursor.clone().filter(|c| !c.is_empty())
    }
}

/// Thumbnail block of a summary lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub source: String,
}

/// Summary lookup response (`GET <summary-service>/<title>`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub extract: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<Thumbnail>,
}

impl Summary {
    /// Whether the lookup carries a usable, non-empty extract
    pub fn has_extract(&self) -> bool {
        self.extract.as_deref().is_some_and(|e| !e.trim().is_empty())
    }

    pub fn thumb(&self) -> Option<&str> {
        self.thumbnail.as_ref().map(|t| t.source.as_str())
    }
}

/// An autocomplete entry. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

impl Suggestion {
    /// A bare suggestion with no enrichment
    pub fn plain(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            img: None,
            desc: None,
        }
    }
}
