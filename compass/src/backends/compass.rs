//! Compass search API backend
//!
//! Implements [`SearchBackend`] against the Compass aggregation service.
//! `GET <base>/search?type=<web|images|news|videos>&q=<query>[&cursor=<opaque>]`

use async_trait::async_trait;
use compass_common::{FetchError, FetchResult};
use reqwest::Client;
use std::time::Duration;
use url::Url;

use super::SearchBackend;
use crate::config::SearchApiConfig;
use crate::types::{ResultType, SearchPage};

/// HTTP client for the Compass search API
pub struct CompassApi {
    client: Client,
    base_url: String,
}

impl CompassApi {
    pub fn new(config: &SearchApiConfig) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Check if a base URL is configured
    pub fn is_available(&self) -> bool {
        !self.base_url.is_empty()
    }

    /// Build the request URL. The cursor is omitted for the first page.
    pub fn request_url(
        &self,
        kind: ResultType,
        query: &str,
        cursor: Option<&str>,
    ) -> FetchResult<Url> {
        let mut url = Url::parse(&format!("{}/search", self.base_url))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("type", kind.as_str());
            pairs.append_pair("q", query);
            if let Some(cursor) = cursor.filter(|c| !c.is_empty()) {
                pairs.append_pair("cursor", cursor);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl SearchBackend for CompassApi {
    fn name(&self) -> &str {
        "compass"
    }

    async fn search(
        &self,
        kind: ResultType,
        query: &str,
        cursor: Option<&str>,
    ) -> FetchResult<SearchPage> {
        if !self.is_available() {
            return Err(FetchError::Unavailable("search base URL not configured".into()));
        }

        let url = self.request_url(kind, query, cursor)?;
        tracing::debug!(%url, "search request");

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                service: self.name().to_string(),
                status,
                body,
            });
        }

        let page: SearchPage = response.json().await?;
        Ok(page)
    }
}
