//! Client for comparing hotel discount rates (AARP, AAA, senior, ...)
//! served by the discount comparison backend.

pub mod api;
pub mod config;
pub mod controller;
pub mod form;
pub mod models;
pub mod results;

pub use api::{ApiError, SearchApi, SearchApiClient, DEFAULT_SEARCH_LIMIT};
pub use config::{ClientConfig, ConfigError};
pub use controller::{ControllerState, SearchController, SearchMode, SearchOutcome, View};
pub use form::SearchForm;
pub use models::{
    HealthStatus, ResultItem, ResultsSummary, SearchList, SearchRequest, SearchResponse,
    SearchResults,
};
pub use results::{format_price, ResultsView};
