//! Result fetch coordinator for the paged tabs (web, news, videos)
//!
//! Each result type owns its list, pager, loading flag and a request sequence
//! number. A completion is applied only if it carries the sequence number of the
//! most recently issued request for its type; anything older is discarded.

use compass_common::FetchResult;
use std::collections::HashSet;

use super::pager::PagerState;
use super::{Command, QuerySubscriber};
use crate::types::{ResultItem, ResultType, SearchPage};

/// Outcome of applying a search completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The list was replaced with `count` items
    Applied { count: usize },
    /// The request failed; the list is untouched
    Failed(String),
    /// A newer request for the same type was issued since
    Stale,
}

/// One paged list
#[derive(Debug, Clone, Default)]
pub struct ResultList {
    items: Vec<ResultItem>,
    pager: PagerState,
    loading: bool,
    seq: u64,
}

impl ResultList {
    pub fn items(&self) -> &[ResultItem] {
        &self.items
    }

    pub fn pager(&self) -> &PagerState {
        &self.pager
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    fn reset(&mut self) {
        self.items.clear();
        self.pager.reset();
        self.loading = false;
        self.seq += 1;
    }
}

/// Keep the first occurrence of every URL
fn dedup_by_url(items: Vec<ResultItem>) -> Vec<ResultItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.url.clone()))
        .collect()
}

/// Owns the web, news and videos lists
#[derive(Debug, Default)]
pub struct ResultFetchCoordinator {
    web: ResultList,
    news: ResultList,
    videos: ResultList,
}

impl ResultFetchCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn web(&self) -> &ResultList {
        &self.web
    }

    pub fn news(&self) -> &ResultList {
        &self.news
    }

    pub fn videos(&self) -> &ResultList {
        &self.videos
    }

    /// The list for a paged type. Images are not handled here.
    pub fn list(&self, kind: ResultType) -> Option<&ResultList> {
        match kind {
            ResultType::Web => Some(&self.web),
            ResultType::News => Some(&self.news),
            ResultType::Videos => Some(&self.videos),
            ResultType::Images => None,
        }
    }

    fn list_mut(&mut self, kind: ResultType) -> Option<&mut ResultList> {
        match kind {
            ResultType::Web => Some(&mut self.web),
            ResultType::News => Some(&mut self.news),
            ResultType::Videos => Some(&mut self.videos),
            ResultType::Images => None,
        }
    }

    /// Issue a request for the current cursor of `kind`
    pub fn request(&mut self, kind: ResultType, query: &str) -> Option<Command> {
        if query.is_empty() {
            return None;
        }
        let list = self.list_mut(kind)?;
        list.seq += 1;
        list.loading = true;

        tracing::info!(%kind, page = list.pager.page(), "fetching results");

        Some(Command::Search {
            kind,
            query: query.to_string(),
            cursor: list.pager.cursor().map(str::to_string),
            seq: list.seq,
        })
    }

    /// Apply a completion. The list is replaced wholesale on success.
    pub fn complete(
        &mut self,
        kind: ResultType,
        seq: u64,
        result: FetchResult<SearchPage>,
    ) -> Completion {
        let Some(list) = self.list_mut(kind) else {
            return Completion::Stale;
        };

        if seq != list.seq {
            tracing::debug!(%kind, seq, latest = list.seq, "discarding stale search response");
            return Completion::Stale;
        }

        list.loading = false;

        match result {
            Ok(page) => {
                let next = page.next();
                list.items = dedup_by_url(page.results);
                list.pager.set_next(next);
                Completion::Applied {
                    count: list.items.len(),
                }
            }
            Err(e) => {
                tracing::warn!(%kind, error = %e, "search request failed");
                Completion::Failed(e.to_string())
            }
        }
    }

    /// Step forward. True if the cursor moved (a refetch is due).
    pub fn advance(&mut self, kind: ResultType) -> bool {
        self.list_mut(kind).is_some_and(|l| l.pager.advance())
    }

    /// Step back. True if the cursor moved (a refetch is due).
    pub fn retreat(&mut self, kind: ResultType) -> bool {
        self.list_mut(kind).is_some_and(|l| l.pager.retreat())
    }

    /// Forget every list, cursor and in-flight request (query changed)
    pub fn reset(&mut self) {
        self.web.reset();
        self.news.reset();
        self.videos.reset();
    }

    pub fn any_loading(&self) -> bool {
        self.web.loading || self.news.loading || self.videos.loading
    }
}

impl QuerySubscriber for ResultFetchCoordinator {
    fn query_changed(&mut self, _query: &str) {
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compass_common::FetchError;

    fn item(url: &str) -> ResultItem {
        ResultItem {
            title: url.to_string(),
            url: url.to_string(),
            snippet: None,
            source: "test".to_string(),
            thumb: None,
            display_link: None,
        }
    }

    fn page(urls: &[&str], next: Option<&str>) -> SearchPage {
        SearchPage {
            results: urls.iter().map(|u| item(u)).collect(),
            next_cursor: next.map(str::to_string),
        }
    }

    fn seq_of(cmd: Option<Command>) -> u64 {
        match cmd {
            Some(Command::Search { seq, .. }) => seq,
            other => panic!("expected search command, got {:?}", other),
        }
    }

    #[test]
    fn test_request_sets_loading_and_uses_cursor() {
        let mut c = ResultFetchCoordinator::new();
        let cmd = c.request(ResultType::Web, "Paris");
        match cmd {
            Some(Command::Search { kind, query, cursor, .. }) => {
                assert_eq!(kind, ResultType::Web);
                assert_eq!(query, "Paris");
                assert_eq!(cursor, None);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(c.list(ResultType::Web).unwrap().is_loading());
        assert!(c.any_loading());
    }

    #[test]
    fn test_empty_query_issues_nothing() {
        let mut c = ResultFetchCoordinator::new();
        assert!(c.request(ResultType::News, "").is_none());
        assert!(!c.any_loading());
    }

    #[test]
    fn test_images_are_not_coordinated_here() {
        let mut c = ResultFetchCoordinator::new();
        assert!(c.request(ResultType::Images, "cats").is_none());
        assert!(c.list(ResultType::Images).is_none());
    }

    #[test]
    fn test_success_replaces_list_and_sets_next() {
        let mut c = ResultFetchCoordinator::new();
        let seq = seq_of(c.request(ResultType::Web, "q"));
        let outcome = c.complete(ResultType::Web, seq, Ok(page(&["a", "b"], Some("c2"))));
        assert_eq!(outcome, Completion::Applied { count: 2 });

        let seq = seq_of(c.request(ResultType::Web, "q"));
        c.complete(ResultType::Web, seq, Ok(page(&["c"], None)));

        let web = c.list(ResultType::Web).unwrap();
        assert_eq!(web.items().len(), 1);
        assert_eq!(web.items()[0].url, "c");
        assert!(!web.pager().can_advance());
        assert!(!web.is_loading());
    }

    #[test]
    fn test_failure_keeps_previous_list() {
        let mut c = ResultFetchCoordinator::new();
        let seq = seq_of(c.request(ResultType::News, "q"));
        c.complete(ResultType::News, seq, Ok(page(&["a"], None)));

        let seq = seq_of(c.request(ResultType::News, "q"));
        let outcome = c.complete(
            ResultType::News,
            seq,
            Err(FetchError::Unavailable("down".into())),
        );
        assert_eq!(outcome, Completion::Failed("service unavailable: down".into()));

        let news = c.list(ResultType::News).unwrap();
        assert_eq!(news.items().len(), 1);
        assert!(!news.is_loading());
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut c = ResultFetchCoordinator::new();
        let first = seq_of(c.request(ResultType::Web, "q"));
        let second = seq_of(c.request(ResultType::Web, "q"));

        // Newer response lands first
        c.complete(ResultType::Web, second, Ok(page(&["new"], Some("n2"))));
        let outcome = c.complete(ResultType::Web, first, Ok(page(&["old"], Some("o2"))));

        assert_eq!(outcome, Completion::Stale);
        let web = c.list(ResultType::Web).unwrap();
        assert_eq!(web.items()[0].url, "new");
        assert_eq!(web.pager().next_cursor(), Some("n2"));
    }

    #[test]
    fn test_superseded_request_keeps_loading_until_latest_lands() {
        let mut c = ResultFetchCoordinator::new();
        let first = seq_of(c.request(ResultType::Videos, "q"));
        let second = seq_of(c.request(ResultType::Videos, "q"));

        c.complete(ResultType::Videos, first, Ok(page(&["old"], None)));
        assert!(c.list(ResultType::Videos).unwrap().is_loading());

        c.complete(ResultType::Videos, second, Ok(page(&["new"], None)));
        assert!(!c.list(ResultType::Videos).unwrap().is_loading());
    }

    #[test]
    fn test_types_are_independent() {
        let mut c = ResultFetchCoordinator::new();
        let web = seq_of(c.request(ResultType::Web, "q"));
        let news = seq_of(c.request(ResultType::News, "q"));
        c.complete(ResultType::News, news, Ok(page(&["n"], None)));
        c.complete(ResultType::Web, web, Ok(page(&["w"], None)));

        assert_eq!(c.list(ResultType::Web).unwrap().items()[0].url, "w");
        assert_eq!(c.list(ResultType::News).unwrap().items()[0].url, "n");
    }

    #[test]
    fn test_reset_invalidates_in_flight_requests() {
        let mut c = ResultFetchCoordinator::new();
        let seq = seq_of(c.request(ResultType::Web, "old"));
        c.reset();
        assert!(!c.any_loading());
        assert_eq!(
            c.complete(ResultType::Web, seq, Ok(page(&["a"], None))),
            Completion::Stale
        );
        assert!(c.list(ResultType::Web).unwrap().items().is_empty());
    }

    #[test]
    fn test_duplicate_urls_are_collapsed() {
        let mut c = ResultFetchCoordinator::new();
        let seq = seq_of(c.request(ResultType::Web, "q"));
        c.complete(ResultType::Web, seq, Ok(page(&["a", "b", "a"], None)));
        assert_eq!(c.list(ResultType::Web).unwrap().items().len(), 2);
    }

    #[test]
    fn test_advance_and_retreat_drive_cursor() {
        let mut c = ResultFetchCoordinator::new();
        assert!(!c.advance(ResultType::Web));

        let seq = seq_of(c.request(ResultType::Web, "q"));
        c.complete(ResultType::Web, seq, Ok(page(&["a"], Some("c2"))));
        assert!(c.advance(ResultType::Web));

        match c.request(ResultType::Web, "q") {
            Some(Command::Search { cursor, .. }) => assert_eq!(cursor.as_deref(), Some("c2")),
            other => panic!("unexpected {:?}", other),
        }

        assert!(c.retreat(ResultType::Web));
        assert_eq!(c.list(ResultType::Web).unwrap().pager().cursor(), None);
    }
}
