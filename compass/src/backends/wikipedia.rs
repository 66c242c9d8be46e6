//! Wikipedia backend
//!
//! Summary lookups go through the REST API
//! (`/api/rest_v1/page/summary/<title>`), suggestion titles through the
//! MediaWiki opensearch action, whose response is
//! `[input, [titles...], [descriptions...], [urls...]]`.

use async_trait::async_trait;
use compass_common::{FetchError, FetchResult};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

use super::{SuggestBackend, SummaryBackend};
use crate::config::KnowledgeConfig;
use crate::types::Summary;

/// Wikipedia summary + opensearch client
pub struct Wikipedia {
    client: Client,
    summary_url: String,
    suggest_url: String,
    suggest_limit: usize,
}

impl Wikipedia {
    pub fn new(config: &KnowledgeConfig, user_agent: &str) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            summary_url: config.summary_url.trim_end_matches('/').to_string(),
            suggest_url: config.suggest_url.clone(),
            suggest_limit: config.suggest_limit,
        })
    }

    /// `<summary_url>/<title>` with the title as a single encoded path segment
    pub fn summary_request_url(&self, title: &str) -> FetchResult<Url> {
        let mut url = Url::parse(&self.summary_url)?;
        url.path_segments_mut()
            .map_err(|_| FetchError::Unavailable("summary URL cannot carry a path".into()))?
            .push(title);
        Ok(url)
    }

    pub fn suggest_request_url(&self, input: &str) -> FetchResult<Url> {
        let mut url = Url::parse(&self.suggest_url)?;
        url.query_pairs_mut()
            .append_pair("origin", "*")
            .append_pair("action", "opensearch")
            .append_pair("limit", &self.suggest_limit.to_string())
            .append_pair("format", "json")
            .append_pair("search", input);
        Ok(url)
    }
}

/// Extract the title list (index 1) from an opensearch response
pub fn parse_opensearch(value: &serde_json::Value) -> FetchResult<Vec<String>> {
    let array = value
        .as_array()
        .ok_or_else(|| FetchError::Decode("opensearch response is not an array".into()))?;

    Ok(array
        .get(1)
        .and_then(|titles| titles.as_array())
        .map(|titles| {
            titles
                .iter()
                .filter_map(|t| t.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default())
}

#[async_trait]
impl SummaryBackend for Wikipedia {
    async fn summary(&self, title: &str) -> FetchResult<Option<Summary>> {
        let url = self.summary_request_url(title)?;
        let response = self.client.get(url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                service: "wikipedia".to_string(),
                status,
                body,
            });
        }

        let summary: Summary = response.json().await?;
        Ok(Some(summary))
    }
}

#[async_trait]
impl SuggestBackend for Wikipedia {
    async fn titles(&self, input: &str) -> FetchResult<Vec<String>> {
        let url = self.suggest_request_url(input)?;
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                service: "opensearch".to_string(),
                status,
                body,
            });
        }

        let value: serde_json::Value = response.json().await?;
        parse_opensearch(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wiki() -> Wikipedia {
        Wikipedia::new(&KnowledgeConfig::default(), "compass-test").unwrap()
    }

    #[test]
    fn test_summary_url_encodes_title_as_segment() {
        let url = wiki().summary_request_url("AC/DC band").unwrap();
        assert_eq!(
            url.as_str(),
            "https://en.wikipedia.org/api/rest_v1/page/summary/AC%2FDC%20band"
        );
    }

    #[test]
    fn test_suggest_url_parameters() {
        let url = wiki().suggest_request_url("dog").unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("action".into(), "opensearch".into())));
        assert!(pairs.contains(&("limit".into(), "8".into())));
        assert!(pairs.contains(&("search".into(), "dog".into())));
    }

    #[test]
    fn test_parse_opensearch_titles() {
        let value = json!(["dog", ["Dog", "Dogecoin"], ["", ""], ["u1", "u2"]]);
        assert_eq!(parse_opensearch(&value).unwrap(), vec!["Dog", "Dogecoin"]);
    }

    #[test]
    fn test_parse_opensearch_missing_titles() {
        assert!(parse_opensearch(&json!(["dog"])).unwrap().is_empty());
        assert!(parse_opensearch(&json!({"error": "x"})).is_err());
    }
}
