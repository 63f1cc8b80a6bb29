//! regulations.gov record counts.
//!
//! Three read-only calls are needed per run: the docket record itself (for
//! its title) and the total number of documents and comments filed under it.

use crate::config::Config;
use crate::error::{DocketStatsError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Page size requested from the list endpoints; only `meta` is read.
const COUNT_PAGE_SIZE: &str = "5";

/// Docket metadata returned by the record API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocketInfo {
    pub title: Option<String>,
}

/// Source of authoritative record counts.
#[async_trait]
pub trait RecordCounts: Sync {
    /// Fetch the docket record. Fails if the docket does not exist.
    async fn docket(&self, docket_id: &str) -> Result<DocketInfo>;

    /// Total documents filed under the docket.
    async fn documents_total(&self, docket_id: &str) -> Result<u64>;

    /// Total comments filed under the docket.
    async fn comments_total(&self, docket_id: &str) -> Result<u64>;
}

#[derive(Debug, Deserialize)]
struct DocketResponse {
    data: DocketData,
}

#[derive(Debug, Deserialize)]
struct DocketData {
    #[serde(default)]
    attributes: DocketAttributes,
}

#[derive(Debug, Default, Deserialize)]
struct DocketAttributes {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    meta: ListMeta,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListMeta {
    total_elements: Option<u64>,
}

/// HTTP client for the regulations.gov v4 API.
#[derive(Debug, Clone)]
pub struct RegulationsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RegulationsClient {
    /// Create a client against `base_url` (e.g. `https://api.regulations.gov/v4`).
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("docket-stats/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Create a client from resolved configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.api_base_url.clone(),
            config.api_key.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Base URL requests are issued against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, "querying record API");

        let response = self
            .http
            .get(&url)
            .query(query)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(DocketStatsError::Api { status, url, body });
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn list_total(&self, path: &str, docket_id: &str) -> Result<u64> {
        let response: ListResponse = self
            .get_json(
                path,
                &[("filter[docketId]", docket_id), ("page[size]", COUNT_PAGE_SIZE)],
            )
            .await?;
        Ok(response.meta.total_elements.unwrap_or(0))
    }
}

#[async_trait]
impl RecordCounts for RegulationsClient {
    async fn docket(&self, docket_id: &str) -> Result<DocketInfo> {
        let response: DocketResponse = self.get_json(&format!("dockets/{docket_id}"), &[]).await?;
        Ok(DocketInfo {
            title: response.data.attributes.title,
        })
    }

    async fn documents_total(&self, docket_id: &str) -> Result<u64> {
        self.list_total("documents", docket_id).await
    }

    async fn comments_total(&self, docket_id: &str) -> Result<u64> {
        self.list_total("comments", docket_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_docket_title() {
        let body = r#"{"data":{"id":"EPA-2020-0001","attributes":{"title":"Sample Rule","docketType":"Rulemaking"}}}"#;
        let parsed: DocketResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.data.attributes.title.as_deref(), Some("Sample Rule"));
    }

    #[test]
    fn test_parse_docket_without_title() {
        let parsed: DocketResponse =
            serde_json::from_str(r#"{"data":{"id":"X","attributes":{}}}"#).unwrap();
        assert!(parsed.data.attributes.title.is_none());

        let parsed: DocketResponse = serde_json::from_str(r#"{"data":{"id":"X"}}"#).unwrap();
        assert!(parsed.data.attributes.title.is_none());
    }

    #[test]
    fn test_docket_without_data_is_rejected() {
        assert!(serde_json::from_str::<DocketResponse>(r#"{"meta":{}}"#).is_err());
    }

    #[test]
    fn test_parse_list_total() {
        let parsed: ListResponse =
            serde_json::from_str(r#"{"data":[],"meta":{"totalElements":500,"pageSize":5}}"#)
                .unwrap();
        assert_eq!(parsed.meta.total_elements, Some(500));
    }

    #[test]
    fn test_missing_meta_defaults() {
        let parsed: ListResponse = serde_json::from_str(r#"{"data":[]}"#).unwrap();
        assert_eq!(parsed.meta.total_elements, None);
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client =
            RegulationsClient::new("http://localhost/v4/", "k", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost/v4");
    }
}
