use crate::api::ApiError;
use crate::models::{
    HealthStatus, ResultsSummary, SearchList, SearchRequest, SearchResponse, SearchResults,
};
use async_trait::async_trait;

/// Operations offered by the discount comparison backend.
///
/// Every call is a single request/response round trip: no retries, no caching.
#[async_trait]
pub trait SearchApi: Send + Sync {
    /// Start a search job for the given parameters
    async fn create_search(&self, request: &SearchRequest) -> Result<SearchResponse, ApiError>;

    /// Start a demo search whose results are available immediately
    async fn create_mock_search(&self) -> Result<SearchResponse, ApiError>;

    /// Fetch every result quoted for a search
    async fn get_results(&self, search_id: &str) -> Result<SearchResults, ApiError>;

    async fn get_results_summary(&self, search_id: &str) -> Result<ResultsSummary, ApiError>;

    async fn list_searches(&self, limit: u32) -> Result<SearchList, ApiError>;

    async fn health_check(&self) -> Result<HealthStatus, ApiError>;
}
