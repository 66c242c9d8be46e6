//! Routing capability
//!
//! The controller never routes by itself: it asks a [`Navigator`] to move to
//! `/search?q=<query>` and reads the query back from whatever path the host
//! reports.

use std::sync::Mutex;
use url::{form_urlencoded, Url};

/// Opaque routing capability
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Path of the results page for `query`
pub fn search_path(query: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
    format!("/search?q={}", encoded)
}

/// The `q` parameter of a path such as `/search?q=Paris`, empty if absent
pub fn query_from_path(path: &str) -> String {
    let Ok(base) = Url::parse("http://localhost/") else {
        return String::new();
    };

    match base.join(path) {
        Ok(url) => url
            .query_pairs()
            .find(|(k, _)| k == "q")
            .map(|(_, v)| v.into_owned())
            .unwrap_or_default(),
        Err(e) => {
            tracing::debug!(path, error = %e, "unparseable location");
            String::new()
        }
    }
}

/// In-memory navigation history
#[derive(Debug, Default)]
pub struct History {
    entries: Mutex<Vec<String>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths visited so far, oldest first
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    pub fn current(&self) -> Option<String> {
        self.entries().last().cloned()
    }
}

impl Navigator for History {
    fn navigate(&self, path: &str) {
        tracing::info!(path, "navigate");
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(path.to_string());
        }
    }
}
