//! Result retrieval and view-state controller
//!
//! [`SearchController`] owns the query and one component per concern:
//!
//! - [`results`]: paged web/news/videos lists
//! - [`images`]: infinite image scroll
//! - [`autocomplete`]: debounced suggestions
//! - [`panel`]: knowledge panel lookup and fallback
//!
//! Every operation is synchronous and returns the [`Command`]s it wants
//! executed. Completions come back as [`Event`]s through [`SearchController::apply`].
//! The [`view`] projection is recomputed on demand.

pub mod autocomplete;
pub mod images;
pub mod pager;
pub mod panel;
pub mod results;
pub mod view;

use std::ops::{Deref, DerefMut};

use compass_common::FetchResult;
use tokio::sync::watch;

use crate::navigation;
use crate::types::{ResultType, SearchPage, Suggestion, Summary, Tab};
use autocomplete::Autocomplete;
use images::{ImageFeed, ImagesCompletion, ScrollMetrics, SentinelGeometry, Trigger};
use panel::{KnowledgePanel, PanelResolver};
use results::{Completion, ResultFetchCoordinator};
use view::{ImagesView, ListView, ViewState};

// ============================================================================
// Commands and Events
// ============================================================================

/// Side effects requested by the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch one page of `kind`
    Search {
        kind: ResultType,
        query: String,
        cursor: Option<String>,
        seq: u64,
    },
    /// Summary lookup for the knowledge panel
    LookupSummary { query: String, seq: u64 },
    /// Cancel any pending debounce timer and start a new one
    ScheduleSuggestions { generation: u64 },
    /// Fetch and enrich suggestion titles
    FetchSuggestions { input: String, generation: u64 },
    /// Cancel the pending debounce timer
    CancelSuggestions,
    /// Hand a path to the router
    Navigate { path: String },
}

/// Completions fed back into the controller
#[derive(Debug)]
pub enum Event {
    SearchCompleted {
        kind: ResultType,
        seq: u64,
        result: FetchResult<SearchPage>,
    },
    SummaryCompleted {
        seq: u64,
        result: FetchResult<Option<Summary>>,
    },
    DebounceElapsed {
        generation: u64,
    },
    SuggestionsFetched {
        generation: u64,
        result: FetchResult<Vec<Suggestion>>,
    },
}

/// Thresholds for the two scroll signals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollThresholds {
    pub look_ahead: f64,
    pub sentinel_margin: f64,
}

impl Default for ScrollThresholds {
    fn default() -> Self {
        Self {
            look_ahead: 1500.0,
            sentinel_margin: 1000.0,
        }
    }
}

impl From<&crate::config::UiConfig> for ScrollThresholds {
    fn from(ui: &crate::config::UiConfig) -> Self {
        Self {
            look_ahead: ui.scroll_look_ahead,
            sentinel_margin: ui.sentinel_margin,
        }
    }
}

// ============================================================================
// Query subscription
// ============================================================================

/// A component whose state is derived from the current query
pub trait QuerySubscriber {
    /// The query moved to `query`; drop everything derived from the old one
    fn query_changed(&mut self, query: &str);
}

/// A component together with its own receiver on the shared query
#[derive(Debug)]
pub struct Subscribed<T> {
    inner: T,
    query: watch::Receiver<String>,
}

impl<T: QuerySubscriber> Subscribed<T> {
    pub fn new(inner: T, query: watch::Receiver<String>) -> Self {
        Self { inner, query }
    }

    /// Catch up with the shared query. Returns true if the component was reset.
    pub fn sync(&mut self) -> bool {
        if !self.query.has_changed().unwrap_or(false) {
            return false;
        }
        let query = self.query.borrow_and_update().clone();
        self.inner.query_changed(&query);
        true
    }
}

impl<T> Deref for Subscribed<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T> DerefMut for Subscribed<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.inner
    }
}

// ============================================================================
// Controller
// ============================================================================

/// Top-level controller for one search page
pub struct SearchController {
    /// Single source of truth for every result set
    query: watch::Sender<String>,
    tab: Tab,
    results: Subscribed<ResultFetchCoordinator>,
    images: Subscribed<ImageFeed>,
    panel: Subscribed<PanelResolver>,
    autocomplete: Autocomplete,
    error: Option<String>,
    thresholds: ScrollThresholds,
    mounted: bool,
}

impl Default for SearchController {
    fn default() -> Self {
        Self::new(ScrollThresholds::default())
    }
}

impl SearchController {
    pub fn new(thresholds: ScrollThresholds) -> Self {
        let (query, _) = watch::channel(String::new());
        Self {
            results: Subscribed::new(ResultFetchCoordinator::new(), query.subscribe()),
            images: Subscribed::new(ImageFeed::new(), query.subscribe()),
            panel: Subscribed::new(PanelResolver::new(), query.subscribe()),
            query,
            tab: Tab::All,
            autocomplete: Autocomplete::new(),
            error: None,
            thresholds,
            mounted: false,
        }
    }

    pub fn query(&self) -> String {
        self.query.borrow().clone()
    }

    /// Observe query changes
    pub fn subscribe_query(&self) -> watch::Receiver<String> {
        self.query.subscribe()
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn results(&self) -> &ResultFetchCoordinator {
        &self.results
    }

    pub fn images(&self) -> &ImageFeed {
        &self.images
    }

    pub fn autocomplete(&self) -> &Autocomplete {
        &self.autocomplete
    }

    // ------------------------------------------------------------------------
    // Lifecycle and location
    // ------------------------------------------------------------------------

    /// Mount at `path` (e.g. `/search?q=Paris`)
    pub fn mount(&mut self, path: &str) -> Vec<Command> {
        self.mounted = true;
        if self.tab == Tab::Images {
            self.images.attach();
        }
        self.location_changed(path)
    }

    /// Tear down: listeners go away and the debounce timer is canceled
    pub fn unmount(&mut self) -> Vec<Command> {
        self.mounted = false;
        self.images.detach();
        vec![Command::CancelSuggestions]
    }

    /// The router moved to `path`
    pub fn location_changed(&mut self, path: &str) -> Vec<Command> {
        let q = navigation::query_from_path(path);
        self.autocomplete.sync_input(&q);
        self.set_query(q)
    }

    fn set_query(&mut self, q: String) -> Vec<Command> {
        let changed = self.query.send_if_modified(|current| {
            if *current == q {
                false
            } else {
                *current = q;
                true
            }
        });

        if !changed {
            return Vec::new();
        }

        let query = self.query();
        tracing::info!(%query, "query changed");

        self.results.sync();
        self.images.sync();
        self.panel.sync();
        self.error = None;

        self.refresh_active()
    }

    /// Requests the active tab needs for the current query and cursors
    fn refresh_active(&mut self) -> Vec<Command> {
        let query = self.query();
        if query.is_empty() {
            return Vec::new();
        }

        match self.tab {
            Tab::All => [
                self.results.request(ResultType::Web, &query),
                self.panel.request(&query),
            ]
            .into_iter()
            .flatten()
            .collect(),
            Tab::News | Tab::Videos => self
                .results
                .request(self.tab.result_type(), &query)
                .into_iter()
                .collect(),
            Tab::Images => self.images.poll(&query).into_iter().collect(),
        }
    }

    // ------------------------------------------------------------------------
    // Tabs and paging
    // ------------------------------------------------------------------------

    pub fn select_tab(&mut self, tab: Tab) -> Vec<Command> {
        if tab == self.tab {
            return Vec::new();
        }

        if tab == Tab::Images && self.mounted {
            self.images.attach();
        } else {
            self.images.detach();
        }

        self.tab = tab;
        self.refresh_active()
    }

    /// "Next" on the active paged tab
    pub fn next_page(&mut self) -> Vec<Command> {
        let kind = self.tab.result_type();
        if self.tab == Tab::Images || !self.results.advance(kind) {
            return Vec::new();
        }
        let query = self.query();
        self.results.request(kind, &query).into_iter().collect()
    }

    /// "Previous" on the active paged tab
    pub fn prev_page(&mut self) -> Vec<Command> {
        let kind = self.tab.result_type();
        if self.tab == Tab::Images || !self.results.retreat(kind) {
            return Vec::new();
        }
        let query = self.query();
        self.results.request(kind, &query).into_iter().collect()
    }

    // ------------------------------------------------------------------------
    // Images
    // ------------------------------------------------------------------------

    /// Scroll listener callback
    pub fn scrolled(&mut self, metrics: ScrollMetrics) -> Vec<Command> {
        if !metrics.near_end(self.thresholds.look_ahead) {
            return Vec::new();
        }
        self.trigger_images(Trigger::Scroll)
    }

    /// Visibility observer callback for the sentinel after the grid
    pub fn sentinel_visible(&mut self, intersecting: bool) -> Vec<Command> {
        if !intersecting {
            return Vec::new();
        }
        self.trigger_images(Trigger::Sentinel)
    }

    /// Sentinel callback for hosts that report geometry instead of intersection
    pub fn sentinel_moved(&mut self, geometry: SentinelGeometry) -> Vec<Command> {
        let intersecting = geometry.intersects(self.thresholds.sentinel_margin);
        self.sentinel_visible(intersecting)
    }

    fn trigger_images(&mut self, trigger: Trigger) -> Vec<Command> {
        if self.tab != Tab::Images || !self.images.trigger(trigger) {
            return Vec::new();
        }
        let query = self.query();
        self.images.poll(&query).into_iter().collect()
    }

    pub fn open_image(&mut self, url: &str) -> bool {
        self.images.open(url)
    }

    pub fn close_image(&mut self) {
        self.images.close();
    }

    // ------------------------------------------------------------------------
    // Search input
    // ------------------------------------------------------------------------

    /// A keystroke in the search input
    pub fn input(&mut self, value: &str) -> Vec<Command> {
        vec![self.autocomplete.on_input(value)]
    }

    /// Submit the input box
    pub fn submit(&mut self) -> Vec<Command> {
        let term = self.autocomplete.input().trim().to_string();
        let mut commands = vec![self.autocomplete.dismiss()];
        if !term.is_empty() {
            commands.push(Command::Navigate {
                path: navigation::search_path(&term),
            });
        }
        commands
    }

    /// Pick the suggestion at `index`
    pub fn select_suggestion(&mut self, index: usize) -> Vec<Command> {
        let Some(title) = self.autocomplete.title_at(index) else {
            return Vec::new();
        };
        vec![
            self.autocomplete.dismiss(),
            Command::Navigate {
                path: navigation::search_path(&title),
            },
        ]
    }

    /// Pointer pressed somewhere; `inside_search` is whether it hit the search region
    pub fn pointer_down(&mut self, inside_search: bool) -> Vec<Command> {
        if inside_search || self.autocomplete.suggestions().is_empty() {
            return Vec::new();
        }
        vec![self.autocomplete.dismiss()]
    }

    /// The clear button
    pub fn clear_input(&mut self) -> Vec<Command> {
        vec![self.autocomplete.clear()]
    }

    // ------------------------------------------------------------------------
    // Completions
    // ------------------------------------------------------------------------

    pub fn apply(&mut self, event: Event) -> Vec<Command> {
        match event {
            Event::SearchCompleted {
                kind: ResultType::Images,
                seq,
                result,
            } => {
                match self.images.complete(seq, result) {
                    ImagesCompletion::Failed(message) => self.error = Some(message),
                    ImagesCompletion::Appended { .. } => self.error = None,
                    ImagesCompletion::NoImages | ImagesCompletion::Stale => {}
                }
                if self.tab != Tab::Images {
                    return Vec::new();
                }
                let query = self.query();
                self.images.poll(&query).into_iter().collect()
            }
            Event::SearchCompleted { kind, seq, result } => {
                match self.results.complete(kind, seq, result) {
                    Completion::Failed(message) => self.error = Some(message),
                    Completion::Applied { .. } => self.error = None,
                    Completion::Stale => {}
                }
                Vec::new()
            }
            Event::SummaryCompleted { seq, result } => {
                self.panel.complete(seq, result);
                Vec::new()
            }
            Event::DebounceElapsed { generation } => self
                .autocomplete
                .on_debounce_elapsed(generation)
                .into_iter()
                .collect(),
            Event::SuggestionsFetched { generation, result } => {
                self.autocomplete.on_suggestions(generation, result);
                Vec::new()
            }
        }
    }

    // ------------------------------------------------------------------------
    // Projection
    // ------------------------------------------------------------------------

    pub fn view(&self) -> ViewState {
        let panel = if self.tab == Tab::All {
            self.panel.resolve(self.results.web().items())
        } else {
            KnowledgePanel::None
        };

        ViewState {
            query: self.query(),
            input: self.autocomplete.input().to_string(),
            tab: self.tab,
            any_loading: self.results.any_loading() || self.images.is_loading(),
            error: self.error.clone(),
            suggestions: self.autocomplete.suggestions().to_vec(),
            web: ListView::project(self.results.web(), ResultType::Web),
            news: ListView::project(self.results.news(), ResultType::News),
            videos: ListView::project(self.results.videos(), ResultType::Videos),
            images: ImagesView::project(&self.images),
            panel,
        }
    }
}
