// src/api/client.rs
//! reqwest-backed Notion API client.
//!
//! Handles authentication, retries and pagination. Parsing lives in
//! `parser`, conversion in `notion_client_adapter`.

use super::pagination::fetch_all_pages;
use super::parser::{parse_blocks_pagination, parse_empty_response, parse_page_response};
use super::WorkspaceClient;
use crate::constants::{NOTION_API_BASE_URL, NOTION_API_VERSION, NOTION_MAX_RESULT_PAGES};
use crate::error::AppError;
use crate::error_recovery::{retry_with_backoff, RetryPolicy};
use crate::model::{Block, Record};
use crate::types::{ApiKey, NotionId, PageId};
use reqwest::{header, Client, Response};
use serde::Serialize;

/// A thin wrapper around reqwest Client for Notion API requests.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl NotionHttpClient {
    /// Creates a new HTTP client with Notion API authentication.
    pub fn new(api_key: &ApiKey) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(api_key)?)
            .build()?;
        Ok(Self {
            client,
            base_url: NOTION_API_BASE_URL.to_string(),
            retry: RetryPolicy::default(),
        })
    }

    /// Points the client at another API root, such as a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn create_headers(api_key: &ApiKey) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = api_key.bearer();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid API token format: {}", e))
            })?,
        );

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_static(NOTION_API_VERSION),
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    /// Makes a GET request to the specified endpoint.
    pub async fn get(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<Response, AppError> {
        let url = self.url(endpoint);
        log::debug!("GET {} {:?}", url, query);
        Ok(self.client.get(url).query(query).send().await?)
    }

    /// Makes a PATCH request with JSON body to the specified endpoint.
    pub async fn patch<T: Serialize>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<Response, AppError> {
        let url = self.url(endpoint);
        log::debug!("PATCH {}", url);
        Ok(self.client.patch(url).json(body).send().await?)
    }

    async fn fetch_children_page(
        &self,
        endpoint: &str,
        page_size: usize,
        cursor: Option<String>,
    ) -> Result<super::responses::PaginatedResponse<Block>, AppError> {
        let mut query = vec![("page_size", page_size.to_string())];
        if let Some(cursor) = cursor {
            query.push(("start_cursor", cursor));
        }
        retry_with_backoff(
            || async {
                let response = self.get(endpoint, &query).await?;
                parse_blocks_pagination(extract_response_text(response).await?)
            },
            self.retry,
        )
        .await
    }
}

#[async_trait::async_trait]
impl WorkspaceClient for NotionHttpClient {
    async fn get_record(&self, id: &PageId) -> Result<Record, AppError> {
        let endpoint = format!("pages/{}", id.to_dashed());
        retry_with_backoff(
            || async {
                let response = self.get(&endpoint, &[]).await?;
                parse_page_response(extract_response_text(response).await?)
            },
            self.retry,
        )
        .await
    }

    async fn get_block_children(&self, id: &NotionId) -> Result<Vec<Block>, AppError> {
        let endpoint = format!("blocks/{}/children", id.to_hyphenated());
        let result = fetch_all_pages(
            |page_size, cursor| {
                let endpoint = endpoint.clone();
                async move { self.fetch_children_page(&endpoint, page_size, cursor).await }
            },
            NOTION_MAX_RESULT_PAGES,
        )
        .await?;
        log::debug!(
            "Fetched {} blocks under {} in {} page(s)",
            result.items.len(),
            id,
            result.pages_fetched
        );
        Ok(result.items)
    }

    async fn update_url_property(
        &self,
        id: &PageId,
        property: &str,
        url: &str,
    ) -> Result<(), AppError> {
        let endpoint = format!("pages/{}", id.to_dashed());
        let body = url_property_patch(property, url);
        retry_with_backoff(
            || async {
                let response = self.patch(&endpoint, &body).await?;
                parse_empty_response(extract_response_text(response).await?)
            },
            self.retry,
        )
        .await
    }
}

/// Request body that sets one URL property on a page.
pub fn url_property_patch(property: &str, url: &str) -> serde_json::Value {
    let mut properties = serde_json::Map::new();
    properties.insert(property.to_string(), serde_json::json!({ "url": url }));
    serde_json::json!({ "properties": properties })
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
}

/// Extracts the response body as text with metadata.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}
