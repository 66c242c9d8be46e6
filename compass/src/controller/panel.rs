//! Knowledge panel resolution
//!
//! The panel comes from a summary lookup keyed by the literal query. When the
//! lookup has nothing, it is derived from the first web result if that result
//! carries a thumbnail. The lookup always wins when both are available.

use compass_common::FetchResult;
use serde::Serialize;

use super::{Command, QuerySubscriber};
use crate::types::{ResultItem, Summary};

/// Content shown in the panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelData {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extract: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb: Option<String>,
}

impl PanelData {
    fn from_summary(summary: Summary) -> Self {
        Self {
            thumb: summary.thumb().map(str::to_string),
            title: summary.title,
            description: summary.description,
            extract: summary.extract,
        }
    }

    fn from_result(item: &ResultItem) -> Self {
        Self {
            title: item.title.clone(),
            description: Some(item.source_label().to_string()),
            extract: item.snippet.clone(),
            thumb: item.thumb.clone(),
        }
    }
}

/// The resolved panel
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum KnowledgePanel {
    LookedUp(PanelData),
    DerivedFromResult(PanelData),
    #[default]
    None,
}

impl KnowledgePanel {
    pub fn data(&self) -> Option<&PanelData> {
        match self {
            KnowledgePanel::LookedUp(data) | KnowledgePanel::DerivedFromResult(data) => Some(data),
            KnowledgePanel::None => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, KnowledgePanel::None)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum Lookup {
    #[default]
    Idle,
    Pending,
    Found(PanelData),
    Missing,
}

/// Tracks the summary lookup for the current query
#[derive(Debug, Default)]
pub struct PanelResolver {
    lookup: Lookup,
    /// Query the current lookup belongs to
    query: String,
    seq: u64,
}

impl PanelResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.lookup == Lookup::Pending
    }

    /// Start a lookup for `query`. A found panel for the same query stays
    /// visible until the new lookup lands.
    pub fn request(&mut self, query: &str) -> Option<Command> {
        if query.is_empty() {
            return None;
        }

        if self.query != query || !matches!(self.lookup, Lookup::Found(_)) {
            self.lookup = Lookup::Pending;
        }
        self.query = query.to_string();
        self.seq += 1;

        Some(Command::LookupSummary {
            query: query.to_string(),
            seq: self.seq,
        })
    }

    /// Apply a lookup result. Failures degrade to "no panel" silently.
    pub fn complete(&mut self, seq: u64, result: FetchResult<Option<Summary>>) {
        if seq != self.seq {
            tracing::debug!(seq, latest = self.seq, "discarding stale summary");
            return;
        }

        self.lookup = match result {
            Ok(Some(summary)) if summary.has_extract() => Lookup::Found(PanelData::from_summary(summary)),
            Ok(_) => Lookup::Missing,
            Err(e) => {
                tracing::debug!(error = %e, "summary lookup failed");
                Lookup::Missing
            }
        };
    }

    /// Forget the lookup (query changed)
    pub fn reset(&mut self) {
        self.lookup = Lookup::Idle;
        self.query.clear();
        self.seq += 1;
    }

    /// Apply the precedence rule against the current web results
    pub fn resolve(&self, web: &[ResultItem]) -> KnowledgePanel {
        if let Lookup::Found(data) = &self.lookup {
            return KnowledgePanel::LookedUp(data.clone());
        }

        match web.first() {
            Some(first) if first.thumb.is_some() => {
                KnowledgePanel::DerivedFromResult(PanelData::from_result(first))
            }
            _ => KnowledgePanel::None,
        }
    }
}

impl QuerySubscriber for PanelResolver {
    fn query_changed(&mut self, _query: &str) {
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Thumbnail;
    use compass_common::FetchError;

    fn result(title: &str, thumb: Option<&str>) -> ResultItem {
        ResultItem {
            title: title.to_string(),
            url: format!("https://{}.example", title.to_lowercase()),
            snippet: Some(format!("About {}", title)),
            source: "duckduckgo".to_string(),
            thumb: thumb.map(str::to_string),
            display_link: Some("example.com".to_string()),
        }
    }

    fn summary(extract: Option<&str>) -> Summary {
        Summary {
            title: "Paris".into(),
            description: Some("Capital of France".into()),
            extract: extract.map(str::to_string),
            thumbnail: Some(Thumbnail {
                source: "https://img/paris.jpg".into(),
            }),
        }
    }

    fn lookup_seq(cmd: Option<Command>) -> u64 {
        match cmd {
            Some(Command::LookupSummary { seq, .. }) => seq,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_lookup_wins_over_fallback() {
        let mut panel = PanelResolver::new();
        let seq = lookup_seq(panel.request("Paris"));
        panel.complete(seq, Ok(Some(summary(Some("Paris is the capital...")))));

        let resolved = panel.resolve(&[result("Paris", Some("https://thumb"))]);
        match resolved {
            KnowledgePanel::LookedUp(data) => {
                assert_eq!(data.title, "Paris");
                assert_eq!(data.thumb.as_deref(), Some("https://img/paris.jpg"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_empty_extract_falls_back_to_first_result() {
        let mut panel = PanelResolver::new();
        let seq = lookup_seq(panel.request("Paris"));
        panel.complete(seq, Ok(Some(summary(Some("")))));

        let resolved = panel.resolve(&[result("Paris", Some("https://thumb")), result("Other", None)]);
        assert_eq!(
            resolved,
            KnowledgePanel::DerivedFromResult(PanelData {
                title: "Paris".into(),
                description: Some("example.com".into()),
                extract: Some("About Paris".into()),
                thumb: Some("https://thumb".into()),
            })
        );
    }

    #[test]
    fn test_no_thumbnail_means_no_panel() {
        let mut panel = PanelResolver::new();
        let seq = lookup_seq(panel.request("Paris"));
        panel.complete(seq, Ok(None));
        assert!(panel.resolve(&[result("Paris", None)]).is_none());
        assert!(panel.resolve(&[]).is_none());
    }

    #[test]
    fn test_failed_lookup_degrades_silently() {
        let mut panel = PanelResolver::new();
        let seq = lookup_seq(panel.request("Paris"));
        panel.complete(seq, Err(FetchError::Unavailable("offline".into())));
        assert!(!panel.is_pending());
        assert!(matches!(
            panel.resolve(&[result("Paris", Some("https://thumb"))]),
            KnowledgePanel::DerivedFromResult(_)
        ));
    }

    #[test]
    fn test_stale_lookup_is_ignored() {
        let mut panel = PanelResolver::new();
        let old = lookup_seq(panel.request("Paris"));
        panel.reset();
        lookup_seq(panel.request("Rome"));
        panel.complete(old, Ok(Some(summary(Some("Paris is...")))));
        assert!(panel.is_pending());
        assert!(panel.resolve(&[]).is_none());
    }

    #[test]
    fn test_same_query_keeps_found_panel_while_refreshing() {
        let mut panel = PanelResolver::new();
        let seq = lookup_seq(panel.request("Paris"));
        panel.complete(seq, Ok(Some(summary(Some("Paris is...")))));
        panel.request("Paris");
        assert!(matches!(panel.resolve(&[]), KnowledgePanel::LookedUp(_)));
    }

    #[test]
    fn test_empty_query_issues_no_lookup() {
        let mut panel = PanelResolver::new();
        assert!(panel.request("").is_none());
    }
}
