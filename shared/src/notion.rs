//! Notion API client used to read and update the habits database.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Config, Error, Result};

/// Database descriptor, reduced to the fields we use.
#[derive(Debug, Clone, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub data_sources: Vec<DataSourceRef>,
}

/// Entry of a database's data source list.
#[derive(Debug, Clone, Deserialize)]
pub struct DataSourceRef {
    #[serde(default)]
    pub id: Option<String>,
}

/// Result page of a data source query.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResults {
    #[serde(default)]
    pub results: Vec<PageRef>,
}

/// A page (record) returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct PageRef {
    pub id: String,
}

/// Filter matching records whose date property equals a calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayFilter {
    pub property: String,
    pub date: DateEquals,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateEquals {
    pub equals: String,
}

impl DayFilter {
    pub fn new(property: impl Into<String>, day: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            date: DateEquals { equals: day.into() },
        }
    }
}

/// Checkbox property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Checkbox {
    pub checkbox: bool,
}

/// Property name to checkbox value, written in one update call.
pub type CheckboxProperties = BTreeMap<String, Checkbox>;

#[derive(Debug, Serialize)]
struct QueryBody<'a> {
    filter: &'a DayFilter,
}

#[derive(Debug, Serialize)]
struct UpdateBody<'a> {
    properties: &'a CheckboxProperties,
}

/// Error object returned by the API on failure.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<String>,
    message: Option<String>,
}

/// Operations the webhook needs from the Notion API.
#[async_trait]
pub trait NotionApi: Send + Sync {
    /// Retrieve a database descriptor.
    async fn retrieve_database(&self, database_id: &str) -> Result<Database>;

    /// Query a data source with a day filter.
    async fn query_data_source(&self, data_source_id: &str, filter: &DayFilter)
        -> Result<QueryResults>;

    /// Write checkbox properties on a page.
    async fn update_page(&self, page_id: &str, properties: &CheckboxProperties) -> Result<()>;
}

/// HTTP client for the Notion API.
pub struct NotionClient {
    http_client: reqwest::Client,
    base_url: String,
    token: String,
    notion_version: String,
}

impl NotionClient {
    /// Create a new Notion client.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        notion_version: impl Into<String>,
    ) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            notion_version: notion_version.into(),
        }
    }

    /// Create a client from configuration and an already resolved token.
    pub fn from_config(config: &Config, token: impl Into<String>) -> Self {
        Self::new(&config.notion_api_base_url, token, &config.notion_version)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.token)
            .header("Notion-Version", &self.notion_version)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, action: &str) -> Result<T> {
        let response = self.authorize(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(ApiErrorBody {
                    code,
                    message: Some(message),
                }) => match code {
                    Some(code) => format!("{}: {}", code, message),
                    None => message,
                },
                _ => body,
            };
            debug!(status = status.as_u16(), %message, "Failed to {}", action);
            return Err(Error::Remote {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl NotionApi for NotionClient {
    async fn retrieve_database(&self, database_id: &str) -> Result<Database> {
        debug!(database_id, "Retrieving database");
        let request = self
            .http_client
            .get(self.url(&format!("databases/{}", database_id)));
        self.send(request, "retrieve database").await
    }

    async fn query_data_source(
        &self,
        data_source_id: &str,
        filter: &DayFilter,
    ) -> Result<QueryResults> {
        debug!(data_source_id, day = %filter.date.equals, "Querying data source");
        let request = self
            .http_client
            .post(self.url(&format!("data_sources/{}/query", data_source_id)))
            .json(&QueryBody { filter });
        self.send(request, "query data source").await
    }

    async fn update_page(&self, page_id: &str, properties: &CheckboxProperties) -> Result<()> {
        debug!(page_id, count = properties.len(), "Updating page");
        let request = self
            .http_client
            .patch(self.url(&format!("pages/{}", page_id)))
            .json(&UpdateBody { properties });
        self.send::<serde_json::Value>(request, "update page")
            .await
            .map(|_| ())
    }
}
