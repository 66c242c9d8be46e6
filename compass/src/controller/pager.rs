//! Cursor-based pager for the web, news and videos lists
//!
//! The server hands out opaque cursors; the pager keeps a stack of the cursors
//! already visited so it can walk back. Invariant: `prev.len() == page - 1`.

use serde::Serialize;

/// Pagination state for one result type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagerState {
    /// Cursor of the page currently shown; `None` is the first page
    cursor: Option<String>,
    /// Cursors of earlier pages, oldest first. The first page is stored as `""`.
    prev: Vec<String>,
    /// Cursor of the following page, known only once the current page is fetched
    next: Option<String>,
    page: u32,
}

impl Default for PagerState {
    fn default() -> Self {
        Self::new()
    }
}

impl PagerState {
    pub fn new() -> Self {
        Self {
            cursor: None,
            prev: Vec::new(),
            next: None,
            page: 1,
        }
    }

    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub fn next_cursor(&self) -> Option<&str> {
        self.next.as_deref()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn can_advance(&self) -> bool {
        self.next.is_some()
    }

    pub fn can_retreat(&self) -> bool {
        !self.prev.is_empty()
    }

    /// Record the continuation cursor of the page just fetched
    pub fn set_next(&mut self, next: Option<String>) {
        self.next = next.filter(|c| !c.is_empty());
    }

    /// Move to the next page. Returns false (and changes nothing) without a known next cursor.
    pub fn advance(&mut self) -> bool {
        let Some(next) = self.next.take() else {
            return false;
        };

        let current = self.cursor.replace(next).unwrap_or_default();
        self.prev.push(current);
        self.page += 1;
        true
    }

    /// Move to the previous page. Returns false (and changes nothing) on the first page.
    pub fn retreat(&mut self) -> bool {
        let Some(previous) = self.prev.pop() else {
            return false;
        };

        self.cursor = Some(previous).filter(|c| !c.is_empty());
        self.next = None;
        self.page -= 1;
        true
    }

    /// Back to the first page with nothing fetched
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
