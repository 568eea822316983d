use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Discount programs the form offers by default
pub const DEFAULT_DISCOUNT_TYPES: [&str; 3] = ["aarp", "aaa", "senior"];

/// Discount type the backend uses for the undiscounted baseline rate
pub const BASELINE_DISCOUNT_TYPE: &str = "none";

/// Parameters for a new hotel discount search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// City, address or hotel name
    pub location: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    /// Discount program identifiers (aarp, aaa, senior, ...)
    pub discount_types: Vec<String>,
}

/// Returned by the backend when a search job is created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub search_id: String,
    pub status: String,
    pub message: String,
}

/// One quoted rate for one hotel under one discount type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
    pub result_id: String,
    pub hotel_name: String,
    pub hotel_chain: String,
    pub discount_type: String,
    pub original_price: Option<f64>,
    pub discounted_price: Option<f64>,
    pub taxes: f64,
    pub fees: f64,
    /// `None` when the offer is unavailable
    pub total_price: Option<f64>,
    pub currency: String,
    pub available: bool,
    pub scraped_at: NaiveDateTime,
}

/// Snapshot of a search and every rate quoted for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub search_id: String,
    pub status: String,
    pub location: String,
    /// Echoed as stored by the backend, which does not validate the format
    pub check_in: String,
    pub check_out: String,
    pub guests: u32,
    pub result_count: usize,
    pub results: Vec<ResultItem>,
}

impl SearchResults {
    /// Whether the advertised count matches the rows actually returned
    pub fn is_consistent(&self) -> bool {
        self.result_count == self.results.len()
    }
}

/// Cheapest available offer as reported by the summary endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestDeal {
    pub hotel: String,
    pub discount_type: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelRate {
    pub discount_type: String,
    pub total_price: Option<f64>,
    pub available: bool,
}

/// Backend-side aggregation of a search.
///
/// While a search has no results yet the backend only sends
/// `search_id`, `status` and `message`; the remaining fields default.
/// Hotels keep the order the backend listed them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsSummary {
    pub search_id: String,
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub total_results: usize,
    #[serde(default)]
    pub hotels_compared: usize,
    #[serde(default)]
    pub best_deal: Option<BestDeal>,
    #[serde(default)]
    pub by_hotel: IndexMap<String, Vec<HotelRate>>,
}

/// One entry of the recent searches listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRecord {
    pub search_id: String,
    pub location: String,
    pub check_in: String,
    pub check_out: String,
    pub guests: u32,
    pub status: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchList {
    pub count: usize,
    pub searches: Vec<SearchRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}
