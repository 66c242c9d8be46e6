//! Infinite scroll for the image grid
//!
//! Items accumulate across pages for one query. A fetch is pending whenever a
//! cursor is set and more results exist: the initial load, and every
//! continuation cursor adopted from a page. The two scroll signals (scroll
//! position and sentinel visibility) only arm a continuation when no cursor is
//! known, e.g. after a failed page. Both go through the same guard: nothing is
//! armed while a fetch is pending or in flight, or once the result set is
//! exhausted.

use compass_common::FetchResult;
use serde::Serialize;
use std::collections::HashSet;

use super::{Command, QuerySubscriber};
use crate::types::{ResultItem, ResultType, SearchPage};

/// Viewport measurements reported by the scroll listener
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScrollMetrics {
    pub viewport_height: f64,
    pub scroll_y: f64,
    pub document_height: f64,
}

impl ScrollMetrics {
    /// Viewport bottom plus `look_ahead` has reached the end of the document
    pub fn near_end(&self, look_ahead: f64) -> bool {
        self.viewport_height + self.scroll_y + look_ahead >= self.document_height
    }
}

/// Position of the sentinel element that follows the grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentinelGeometry {
    /// Document offset of the sentinel
    pub top: f64,
    pub viewport_top: f64,
    pub viewport_height: f64,
}

impl SentinelGeometry {
    /// Whether the sentinel intersects the viewport grown by `margin` above and below
    pub fn intersects(&self, margin: f64) -> bool {
        let lower = self.viewport_top - margin;
        let upper = self.viewport_top + self.viewport_height + margin;
        self.top >= lower && self.top <= upper
    }
}

/// Which signal armed a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Scroll,
    Sentinel,
}

/// Outcome of an image page completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagesCompletion {
    Appended { added: usize },
    NoImages,
    Failed(String),
    Stale,
}

/// Accumulated image results for the current query
#[derive(Debug)]
pub struct ImageFeed {
    /// Cursor of the next page to fetch. `None` is the initial load,
    /// `Some("")` a continuation requested before any cursor was known.
    cursor: Option<String>,
    items: Vec<ResultItem>,
    has_more: bool,
    /// A fetch for `cursor` is wanted
    pending: bool,
    loading: bool,
    /// The first page came back empty
    no_images: bool,
    seq: u64,
    /// Scroll and sentinel listeners are registered
    listening: bool,
    selected: Option<String>,
}

impl Default for ImageFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageFeed {
    pub fn new() -> Self {
        Self {
            cursor: None,
            items: Vec::new(),
            has_more: true,
            pending: true,
            loading: false,
            no_images: false,
            seq: 0,
            listening: false,
            selected: None,
        }
    }

    pub fn items(&self) -> &[ResultItem] {
        &self.items
    }

    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn no_images(&self) -> bool {
        self.no_images
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// The item open in the detail view
    pub fn selected(&self) -> Option<&ResultItem> {
        let url = self.selected.as_deref()?;
        self.items.iter().find(|i| i.url == url)
    }

    /// New query: empty grid, initial load pending, detail view closed.
    /// Listener registration is tied to the tab, not the query.
    pub fn reset(&mut self) {
        let listening = self.listening;
        let seq = self.seq + 1;
        *self = Self::new();
        self.listening = listening;
        self.seq = seq;
    }

    /// Register the scroll and sentinel listeners. Idempotent.
    pub fn attach(&mut self) {
        if !self.listening {
            tracing::debug!("attaching image scroll listeners");
            self.listening = true;
        }
    }

    /// Deregister the listeners. Idempotent.
    pub fn detach(&mut self) {
        if self.listening {
            tracing::debug!("detaching image scroll listeners");
            self.listening = false;
        }
    }

    /// Issue the pending fetch, if any is allowed
    pub fn poll(&mut self, query: &str) -> Option<Command> {
        if query.is_empty() || !self.has_more || self.loading || !self.pending {
            return None;
        }

        self.pending = false;
        self.loading = true;
        self.seq += 1;

        tracing::info!(cursor = ?self.cursor, loaded = self.items.len(), "fetching images");

        Some(Command::Search {
            kind: ResultType::Images,
            query: query.to_string(),
            cursor: self.cursor.clone(),
            seq: self.seq,
        })
    }

    /// A scroll or visibility signal asked for more. Returns true if a fetch was armed.
    ///
    /// A `None` cursor becomes the `""` continuation so it is not mistaken for
    /// the initial load.
    pub fn trigger(&mut self, trigger: Trigger) -> bool {
        if !self.listening || self.loading || !self.has_more || self.pending {
            return false;
        }

        if self.cursor.is_none() {
            self.cursor = Some(String::new());
        }
        self.pending = true;
        tracing::debug!(?trigger, cursor = ?self.cursor, "image fetch armed");
        true
    }

    /// Apply a page. Items are appended, never replaced.
    pub fn complete(&mut self, seq: u64, result: FetchResult<SearchPage>) -> ImagesCompletion {
        if seq != self.seq {
            tracing::debug!(seq, latest = self.seq, "discarding stale image response");
            return ImagesCompletion::Stale;
        }

        self.loading = false;

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(error = %e, "image request failed");
                return ImagesCompletion::Failed(e.to_string());
            }
        };

        let next = page.next();
        let outcome = if page.results.is_empty() {
            self.has_more = false;
            if self.items.is_empty() {
                self.no_images = true;
            }
            ImagesCompletion::NoImages
        } else {
            let mut seen: HashSet<String> = self.items.iter().map(|i| i.url.clone()).collect();
            let before = self.items.len();
            self.items.extend(
                page.results
                    .into_iter()
                    .filter(|item| seen.insert(item.url.clone())),
            );
            ImagesCompletion::Appended {
                added: self.items.len() - before,
            }
        };

        if self.has_more {
            self.has_more = next.is_some();
        }
        self.cursor = next;
        // An adopted cursor is fetched straight away
        self.pending = self.has_more;

        outcome
    }

    /// Open the detail view for an item of the grid
    pub fn open(&mut self, url: &str) -> bool {
        if self.items.iter().any(|i| i.url == url) {
            self.selected = Some(url.to_string());
            true
        } else {
            false
        }
    }

    pub fn close(&mut self) {
        self.selected = None;
    }
}

impl QuerySubscriber for ImageFeed {
    fn query_changed(&mut self, _query: &str) {
        self.reset();
    }
}
