pub mod client;
pub mod error;
pub mod traits;

pub use client::SearchApiClient;
pub use error::ApiError;
pub use traits::SearchApi;

/// Number of searches `list_searches` asks for when the caller has no preference
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;
