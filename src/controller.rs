use crate::api::{ApiError, SearchApi};
use crate::models::{SearchRequest, SearchResults};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Message shown when a failure carries no text of its own
pub const FALLBACK_ERROR: &str = "Failed to fetch results";

/// Which backend endpoint starts a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// `POST /api/search` with the submitted parameters
    #[default]
    Live,
    /// `POST /api/mock/search`, which ignores the parameters and answers instantly
    Mock,
}

/// Loading, error and results flags. They are loosely coupled; use
/// [`ControllerState::view`] to decide what to show.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControllerState {
    pub loading: bool,
    pub error: Option<String>,
    pub results: Option<SearchResults>,
}

/// The single thing to display for a given state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View<'a> {
    Idle,
    Loading,
    Error(&'a str),
    Results(&'a SearchResults),
}

impl ControllerState {
    pub fn view(&self) -> View<'_> {
        if self.loading {
            View::Loading
        } else if let Some(error) = &self.error {
            View::Error(error)
        } else if let Some(results) = &self.results {
            View::Results(results)
        } else {
            View::Idle
        }
    }
}

/// How a submitted search ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The outcome was written to the controller state
    Applied,
    /// A newer search started meanwhile; this one's outcome was dropped
    Superseded,
}

/// Runs searches against the backend and owns what the client displays.
///
/// Every search takes a token when it starts. Only the holder of the latest
/// token may write its outcome, so a slow earlier search can never overwrite
/// a newer one.
pub struct SearchController<A> {
    api: A,
    mode: SearchMode,
    state: Mutex<ControllerState>,
    latest_token: AtomicU64,
}

impl<A: SearchApi> SearchController<A> {
    pub fn new(api: A, mode: SearchMode) -> Self {
        Self {
            api,
            mode,
            state: Mutex::new(ControllerState::default()),
            latest_token: AtomicU64::new(0),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub async fn state(&self) -> ControllerState {
        self.state.lock().await.clone()
    }

    /// Create a search, then fetch its results.
    ///
    /// A failure at either step records its message and clears the loading
    /// flag; results from an earlier search stay as they were.
    pub async fn handle_search(&self, request: &SearchRequest) -> SearchOutcome {
        // Tokens are handed out under the state lock so they follow the
        // order in which searches mark themselves as loading
        let token = {
            let mut state = self.state.lock().await;
            state.loading = true;
            state.error = None;
            self.latest_token.fetch_add(1, Ordering::SeqCst) + 1
        };

        info!("Searching {} from {} to {}", request.location, request.check_in, request.check_out);
        let outcome = self.run(request).await;

        let mut state = self.state.lock().await;
        if self.latest_token.load(Ordering::SeqCst) != token {
            info!("Discarding outcome of superseded search #{}", token);
            return SearchOutcome::Superseded;
        }

        state.loading = false;
        match outcome {
            Ok(results) => {
                if !results.is_consistent() {
                    warn!(
                        "Search {} reports {} results but returned {}",
                        results.search_id,
                        results.result_count,
                        results.results.len()
                    );
                }
                info!("✅ Received {} results", results.results.len());
                state.results = Some(results);
            }
            Err(e) => {
                warn!("Search failed: {}", e);
                let message = e.to_string();
                state.error = Some(if message.is_empty() {
                    FALLBACK_ERROR.to_string()
                } else {
                    message
                });
            }
        }

        SearchOutcome::Applied
    }

    async fn run(&self, request: &SearchRequest) -> Result<SearchResults, ApiError> {
        let created = match self.mode {
            SearchMode::Live => self.api.create_search(request).await?,
            SearchMode::Mock => self.api.create_mock_search().await?,
        };
        debug!("Search {} created: {}", created.search_id, created.message);

        self.api.get_results(&created.search_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HealthStatus, ResultsSummary, SearchList, SearchResponse};
    use crate::results::tests::{item, snapshot};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Notify;

    #[derive(Default)]
    struct MockApi {
        fail_create: Option<String>,
        fail_results: HashMap<String, String>,
        /// Search ids whose results wait for the paired `Notify`
        gates: HashMap<String, Arc<Notify>>,
        entered: Arc<Notify>,
        calls: Mutex<Vec<String>>,
    }

    fn server_error(message: &str) -> ApiError {
        ApiError::Status {
            status: 500,
            message: message.to_string(),
        }
    }

    #[async_trait]
    impl SearchApi for MockApi {
        async fn create_search(&self, request: &SearchRequest) -> Result<SearchResponse, ApiError> {
            self.calls.lock().await.push(format!("create:{}", request.location));
            if let Some(message) = &self.fail_create {
                return Err(server_error(message));
            }
            Ok(SearchResponse {
                search_id: format!("search-{}", request.location),
                status: "pending".to_string(),
                message: format!("Search initiated for {}", request.location),
            })
        }

        async fn create_mock_search(&self) -> Result<SearchResponse, ApiError> {
            self.calls.lock().await.push("create_mock".to_string());
            Ok(SearchResponse {
                search_id: "search-mock".to_string(),
                status: "completed".to_string(),
                message: "Mock search created with 12 results".to_string(),
            })
        }

        async fn get_results(&self, search_id: &str) -> Result<SearchResults, ApiError> {
            self.calls.lock().await.push(format!("results:{}", search_id));
            if let Some(gate) = self.gates.get(search_id) {
                self.entered.notify_one();
                gate.notified().await;
            }
            if let Some(message) = self.fail_results.get(search_id) {
                return Err(server_error(message));
            }

            let mut results = snapshot(vec![
                item("1", "Hilton Midtown", "none", Some(278.0), true),
                item("2", "Hilton Midtown", "aarp", Some(252.7), true),
            ]);
            results.search_id = search_id.to_string();
            results.location = search_id.trim_start_matches("search-").to_string();
            Ok(results)
        }

        async fn get_results_summary(&self, _search_id: &str) -> Result<ResultsSummary, ApiError> {
            unimplemented!()
        }

        async fn list_searches(&self, _limit: u32) -> Result<SearchList, ApiError> {
            unimplemented!()
        }

        async fn health_check(&self) -> Result<HealthStatus, ApiError> {
            unimplemented!()
        }
    }

    fn request(location: &str) -> SearchRequest {
        SearchRequest {
            location: location.to_string(),
            check_in: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2025, 7, 3).unwrap(),
            guests: 2,
            discount_types: vec!["aarp".to_string(), "aaa".to_string(), "senior".to_string()],
        }
    }

    #[test]
    fn test_starts_idle() {
        let controller = SearchController::new(MockApi::default(), SearchMode::Live);
        let state = tokio_test::block_on(controller.state());

        assert_eq!(state, ControllerState::default());
        assert_eq!(state.view(), View::Idle);
    }

    #[tokio::test]
    async fn test_success_stores_results() {
        let controller = SearchController::new(MockApi::default(), SearchMode::Live);

        let outcome = controller.handle_search(&request("Boston")).await;
        assert_eq!(outcome, SearchOutcome::Applied);

        let state = controller.state().await;
        assert!(!state.loading);
        assert_eq!(state.error, None);
        let results = state.results.as_ref().unwrap();
        assert_eq!(results.search_id, "search-Boston");
        assert!(matches!(state.view(), View::Results(_)));

        let calls = controller.api().calls.lock().await.clone();
        assert_eq!(calls, vec!["create:Boston", "results:search-Boston"]);
    }

    #[tokio::test]
    async fn test_mock_mode_uses_instant_search() {
        let controller = SearchController::new(MockApi::default(), SearchMode::Mock);

        controller.handle_search(&request("Boston")).await;

        let calls = controller.api().calls.lock().await.clone();
        assert_eq!(calls, vec!["create_mock", "results:search-mock"]);
        assert_eq!(controller.state().await.results.unwrap().search_id, "search-mock");
    }

    #[tokio::test]
    async fn test_create_failure_skips_results_call() {
        let api = MockApi {
            fail_create: Some("Failed to create search: db locked".to_string()),
            ..MockApi::default()
        };
        let controller = SearchController::new(api, SearchMode::Live);

        controller.handle_search(&request("Boston")).await;

        let state = controller.state().await;
        assert!(!state.loading);
        assert_eq!(
            state.error.as_deref(),
            Some("Request failed with status code 500: Failed to create search: db locked")
        );
        assert_eq!(state.results, None);

        let calls = controller.api().calls.lock().await.clone();
        assert_eq!(calls, vec!["create:Boston"]);
    }

    #[tokio::test]
    async fn test_results_failure_keeps_previous_results() {
        let api = MockApi {
            fail_results: HashMap::from([("search-Chicago".to_string(), "boom".to_string())]),
            ..MockApi::default()
        };
        let controller = SearchController::new(api, SearchMode::Live);

        controller.handle_search(&request("Boston")).await;
        let previous = controller.state().await.results;
        assert!(previous.is_some());

        controller.handle_search(&request("Chicago")).await;

        let state = controller.state().await;
        assert!(!state.loading);
        assert_eq!(
            state.error.as_deref(),
            Some("Request failed with status code 500: boom")
        );
        assert_eq!(state.results, previous);
        assert_eq!(
            state.view(),
            View::Error("Request failed with status code 500: boom")
        );
    }

    #[tokio::test]
    async fn test_new_search_clears_error() {
        let api = MockApi {
            fail_results: HashMap::from([("search-Chicago".to_string(), "boom".to_string())]),
            ..MockApi::default()
        };
        let controller = SearchController::new(api, SearchMode::Live);

        controller.handle_search(&request("Chicago")).await;
        assert!(controller.state().await.error.is_some());

        controller.handle_search(&request("Boston")).await;
        let state = controller.state().await;
        assert_eq!(state.error, None);
        assert_eq!(state.results.unwrap().location, "Boston");
    }

    #[tokio::test]
    async fn test_loading_while_in_flight() {
        let gate = Arc::new(Notify::new());
        let api = MockApi {
            gates: HashMap::from([("search-Boston".to_string(), gate.clone())]),
            ..MockApi::default()
        };
        let entered = api.entered.clone();
        let controller = Arc::new(SearchController::new(api, SearchMode::Live));

        let running = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.handle_search(&request("Boston")).await })
        };

        entered.notified().await;
        let state = controller.state().await;
        assert!(state.loading);
        assert_eq!(state.view(), View::Loading);

        gate.notify_one();
        assert_eq!(running.await.unwrap(), SearchOutcome::Applied);
        assert!(!controller.state().await.loading);
    }

    #[tokio::test]
    async fn test_stale_search_cannot_overwrite_newer_one() {
        let gate = Arc::new(Notify::new());
        let api = MockApi {
            gates: HashMap::from([("search-Boston".to_string(), gate.clone())]),
            ..MockApi::default()
        };
        let entered = api.entered.clone();
        let controller = Arc::new(SearchController::new(api, SearchMode::Live));

        let slow = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.handle_search(&request("Boston")).await })
        };
        entered.notified().await;

        let outcome = controller.handle_search(&request("Chicago")).await;
        assert_eq!(outcome, SearchOutcome::Applied);

        gate.notify_one();
        assert_eq!(slow.await.unwrap(), SearchOutcome::Superseded);

        let state = controller.state().await;
        assert!(!state.loading);
        assert_eq!(state.results.unwrap().location, "Chicago");
    }

    #[tokio::test]
    async fn test_search_waiting_on_state_lock_takes_a_later_token() {
        let controller = Arc::new(SearchController::new(MockApi::default(), SearchMode::Live));

        // Hold the state so the first search parks before it can start
        let guard = controller.state.lock().await;
        let first = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.handle_search(&request("Boston")).await })
        };
        tokio::task::yield_now().await;
        assert_eq!(controller.latest_token.load(Ordering::SeqCst), 0);

        let second = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.handle_search(&request("Chicago")).await })
        };
        tokio::task::yield_now().await;
        drop(guard);

        let first = first.await.unwrap();
        let second = second.await.unwrap();
        assert!(first == SearchOutcome::Applied || second == SearchOutcome::Applied);

        let state = controller.state().await;
        assert!(!state.loading);
        assert!(matches!(state.view(), View::Results(_)));
    }

    #[tokio::test]
    async fn test_search_starved_of_budget_never_leaves_loading_set() {
        for units in [0, 64, 127, 128, 129, 256] {
            let controller = Arc::new(SearchController::new(MockApi::default(), SearchMode::Live));

            let starved = {
                let controller = controller.clone();
                tokio::spawn(async move {
                    for _ in 0..units {
                        tokio::task::consume_budget().await;
                    }
                    controller.handle_search(&request("Boston")).await
                })
            };
            tokio::task::yield_now().await;

            controller.handle_search(&request("Chicago")).await;
            starved.await.unwrap();

            let state = controller.state().await;
            assert!(!state.loading, "loading left set after {} budget units", units);
            assert!(matches!(state.view(), View::Results(_)));
        }
    }

    #[tokio::test]
    async fn test_stale_failure_does_not_clear_newer_loading() {
        let slow_gate = Arc::new(Notify::new());
        let fast_gate = Arc::new(Notify::new());
        let api = MockApi {
            fail_results: HashMap::from([("search-Boston".to_string(), "timeout".to_string())]),
            gates: HashMap::from([
                ("search-Boston".to_string(), slow_gate.clone()),
                ("search-Chicago".to_string(), fast_gate.clone()),
            ]),
            ..MockApi::default()
        };
        let entered = api.entered.clone();
        let controller = Arc::new(SearchController::new(api, SearchMode::Live));

        let first = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.handle_search(&request("Boston")).await })
        };
        entered.notified().await;

        let second = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.handle_search(&request("Chicago")).await })
        };
        entered.notified().await;

        slow_gate.notify_one();
        assert_eq!(first.await.unwrap(), SearchOutcome::Superseded);

        let state = controller.state().await;
        assert!(state.loading);
        assert_eq!(state.error, None);

        fast_gate.notify_one();
        assert_eq!(second.await.unwrap(), SearchOutcome::Applied);
        assert_eq!(controller.state().await.results.unwrap().location, "Chicago");
    }
}
