//! Remote service backends
//!
//! The controller only depends on the request/response contracts below.
//! HTTP implementations live in the submodules; tests substitute in-process
//! implementations.

use async_trait::async_trait;
use compass_common::FetchResult;
use std::sync::Arc;

use crate::types::{ResultType, SearchPage, Summary};

pub mod compass;
pub mod wikipedia;

pub use self::compass::CompassApi;
pub use self::wikipedia::Wikipedia;

/// Trait for the typed search service
///
/// `GET <base>/search?type=..&q=..&cursor=..` → `{results, next_cursor}`.
/// `cursor` is `None` (or empty) for the first page.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Get the name of this backend
    fn name(&self) -> &str;

    /// Fetch one page of results of the given type
    async fn search(
        &self,
        kind: ResultType,
        query: &str,
        cursor: Option<&str>,
    ) -> FetchResult<SearchPage>;
}

/// Trait for the summary lookup used by the knowledge panel and suggestion enrichment
#[async_trait]
pub trait SummaryBackend: Send + Sync {
    /// Look up the summary for a literal title. `Ok(None)` means "no such page".
    async fn summary(&self, title: &str) -> FetchResult<Option<Summary>>;
}

/// Trait for the suggestion title list
#[async_trait]
pub trait SuggestBackend: Send + Sync {
    /// Ordered candidate titles for a partial input
    async fn titles(&self, input: &str) -> FetchResult<Vec<String>>;
}

/// The set of services a runtime talks to
#[derive(Clone)]
pub struct Services {
    pub search: Arc<dyn SearchBackend>,
    pub summary: Arc<dyn SummaryBackend>,
    pub suggest: Arc<dyn SuggestBackend>,
}

impl Services {
    /// Build the HTTP services described by the configuration
    pub fn from_config(config: &crate::config::Config) -> FetchResult<Self> {
        let search = CompassApi::new(&config.search)?;
        let wikipedia = Arc::new(Wikipedia::new(&config.knowledge, &config.search.user_agent)?);

        if !search.is_available() {
            tracing::warn!("Search backend '{}' has no base URL configured", search.name());
        }

        Ok(Self {
            search: Arc::new(search),
            summary: wikipedia.clone(),
            suggest: wikipedia,
        })
    }
}
