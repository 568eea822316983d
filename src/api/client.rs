use crate::api::{ApiError, SearchApi};
use crate::config::ClientConfig;
use crate::models::{
    HealthStatus, ResultsSummary, SearchList, SearchRequest, SearchResponse, SearchResults,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// HTTP client for the discount comparison backend
pub struct SearchApiClient {
    client: Client,
    base_url: Url,
}

impl SearchApiClient {
    /// Create a client pointed at the default local backend
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with custom settings
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve path segments against the base URL, encoding each one
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|e| {
            warn!("Request to backend failed: {}", e);
            ApiError::Network(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Backend returned status: {}", status);
            return Err(ApiError::from_status(status, &body));
        }

        debug!("Received {} bytes", body.len());

        serde_json::from_str(&body).map_err(|source| {
            warn!("Could not decode backend response: {}", source);
            ApiError::Decode { source }
        })
    }
}

#[async_trait]
impl SearchApi for SearchApiClient {
    async fn create_search(&self, request: &SearchRequest) -> Result<SearchResponse, ApiError> {
        let url = self.endpoint(&["api", "search"])?;
        debug!("POST {}", url);
        self.send(self.client.post(url).json(request)).await
    }

    async fn create_mock_search(&self) -> Result<SearchResponse, ApiError> {
        let url = self.endpoint(&["api", "mock", "search"])?;
        debug!("POST {}", url);
        self.send(self.client.post(url)).await
    }

    async fn get_results(&self, search_id: &str) -> Result<SearchResults, ApiError> {
        let url = self.endpoint(&["api", "results", search_id])?;
        debug!("GET {}", url);
        self.send(self.client.get(url)).await
    }

    async fn get_results_summary(&self, search_id: &str) -> Result<ResultsSummary, ApiError> {
        let url = self.endpoint(&["api", "results", search_id, "summary"])?;
        debug!("GET {}", url);
        self.send(self.client.get(url)).await
    }

    async fn list_searches(&self, limit: u32) -> Result<SearchList, ApiError> {
        let url = self.endpoint(&["api", "searches"])?;
        debug!("GET {}?limit={}", url, limit);
        self.send(self.client.get(url).query(&[("limit", limit)])).await
    }

    async fn health_check(&self) -> Result<HealthStatus, ApiError> {
        let url = self.endpoint(&["health"])?;
        debug!("GET {}", url);
        self.send(self.client.get(url)).await
    }
}
