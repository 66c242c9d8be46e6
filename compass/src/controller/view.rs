//! Render-facing projection
//!
//! Everything a renderer needs is derived here from component state on every
//! call; nothing in this module holds state of its own.

use serde::Serialize;
use url::Url;

use super::images::ImageFeed;
use super::panel::KnowledgePanel;
use super::results::ResultList;
use crate::types::{ResultItem, ResultType, Suggestion, Tab};

/// Thumbnail used for videos without one
pub const PLACEHOLDER_THUMB: &str = "/placeholder.jpg";

/// Skeleton cards shown while an image page loads
pub const IMAGE_SKELETONS: usize = 10;

/// Favicon service URL for a result, `None` when the result URL has no host
pub fn favicon_url(result_url: &str) -> Option<String> {
    let parsed = Url::parse(result_url).ok()?;
    let host = parsed.host_str()?;
    Some(format!(
        "https://www.google.com/s2/favicons?domain={}&sz=64",
        host
    ))
}

/// Rewrite a leading `http:` to `https:`
pub fn upgrade_https(src: &str) -> String {
    match src.strip_prefix("http:") {
        Some(rest) => format!("https:{}", rest),
        None => src.to_string(),
    }
}

/// One row of a paged list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    pub source_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb: Option<String>,
}

impl ResultRow {
    fn project(item: &ResultItem, kind: ResultType) -> Self {
        let (favicon, thumb) = match kind {
            ResultType::Web => (favicon_url(&item.url), None),
            ResultType::Videos => (
                None,
                Some(item.thumb.clone().unwrap_or_else(|| PLACEHOLDER_THUMB.to_string())),
            ),
            ResultType::News | ResultType::Images => (None, item.thumb.clone()),
        };

        Self {
            title: item.title.clone(),
            url: item.url.clone(),
            snippet: item.snippet.clone(),
            source_label: item.source_label().to_string(),
            favicon,
            thumb,
        }
    }
}

/// Pager controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PagerView {
    pub page: u32,
    pub can_prev: bool,
    pub can_next: bool,
}

/// A paged list (web, news, videos)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListView {
    pub rows: Vec<ResultRow>,
    pub loading: bool,
    pub no_results: bool,
    pub pager: PagerView,
}

impl ListView {
    pub(crate) fn project(list: &ResultList, kind: ResultType) -> Self {
        let pager = list.pager();
        Self {
            rows: list
                .items()
                .iter()
                .map(|item| ResultRow::project(item, kind))
                .collect(),
            loading: list.is_loading(),
            no_results: !list.is_loading() && list.items().is_empty(),
            pager: PagerView {
                page: pager.page(),
                can_prev: pager.can_retreat(),
                can_next: pager.can_advance(),
            },
        }
    }
}

/// One card of the image grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageCard {
    pub title: String,
    pub url: String,
    /// Thumbnail if present, else the image itself, upgraded to https
    pub src: String,
    /// Source to try when `src` fails to load
    pub fallback_src: String,
    pub source_label: String,
    pub selected: bool,
}

impl ImageCard {
    fn project(item: &ResultItem, selected: bool) -> Self {
        Self {
            title: item.title.clone(),
            url: item.url.clone(),
            src: upgrade_https(item.thumb.as_deref().unwrap_or(&item.url)),
            fallback_src: upgrade_https(&item.url),
            source_label: item.source_label().to_string(),
            selected,
        }
    }
}

/// The image grid and its detail view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImagesView {
    pub cards: Vec<ImageCard>,
    pub loading: bool,
    pub skeletons: usize,
    pub no_results: bool,
    /// The first page for the query came back empty
    pub no_images: bool,
    pub end_of_results: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer: Option<ImageCard>,
}

impl ImagesView {
    pub(crate) fn project(feed: &ImageFeed) -> Self {
        let selected_url = feed.selected().map(|i| i.url.as_str());
        let cards: Vec<ImageCard> = feed
            .items()
            .iter()
            .map(|item| ImageCard::project(item, Some(item.url.as_str()) == selected_url))
            .collect();
        let viewer = cards.iter().find(|c| c.selected).cloned();

        Self {
            loading: feed.is_loading(),
            skeletons: if feed.is_loading() { IMAGE_SKELETONS } else { 0 },
            no_results: !feed.is_loading() && feed.items().is_empty(),
            no_images: feed.no_images(),
            end_of_results: !feed.has_more() && !feed.items().is_empty(),
            viewer,
            cards,
        }
    }
}

/// Everything the renderer needs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub query: String,
    pub input: String,
    pub tab: Tab,
    /// Drives the global progress indicator
    pub any_loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub suggestions: Vec<Suggestion>,
    pub web: ListView,
    pub news: ListView,
    pub videos: ListView,
    pub images: ImagesView,
    /// Only populated on the "all" tab
    pub panel: KnowledgePanel,
}

impl ViewState {
    /// The paged list shown by the active tab, if it has one
    pub fn active_list(&self) -> Option<&ListView> {
        match self.tab {
            Tab::All => Some(&self.web),
            Tab::News => Some(&self.news),
            Tab::Videos => Some(&self.videos),
            Tab::Images => None,
        }
    }
}
