//! Trait seam between the desk and the platform API.
//!
//! The submission controller only sees `TradeApi`, so it can be driven by the
//! REST client in production and by `MockTradeApi` in tests.

use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pairdesk_core::{
    AskRequest, BidRequest, Plan, SubmissionKind, SubmissionRequest, SubmissionResult,
    TradeRecord, UserProfile,
};
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::error::{ApiError, ApiResult};

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Platform operations used by the desk.
pub trait TradeApi: Send + Sync {
    /// `POST bid`.
    fn create_bid(&self, request: BidRequest) -> BoxFuture<'_, ApiResult<SubmissionResult>>;

    /// `POST ask`.
    fn create_ask(&self, request: AskRequest) -> BoxFuture<'_, ApiResult<SubmissionResult>>;

    /// `GET plans`.
    fn fetch_plans(&self) -> BoxFuture<'_, ApiResult<Vec<Plan>>>;

    /// `GET dashboard`.
    fn fetch_profile(&self) -> BoxFuture<'_, ApiResult<UserProfile>>;

    /// `GET bids` or `GET asks`.
    fn fetch_history(&self, kind: SubmissionKind) -> BoxFuture<'_, ApiResult<Vec<TradeRecord>>>;

    /// Dispatch a built request to its endpoint.
    fn submit(&self, request: SubmissionRequest) -> BoxFuture<'_, ApiResult<SubmissionResult>> {
        match request {
            SubmissionRequest::Bid(bid) => self.create_bid(bid),
            SubmissionRequest::Ask(ask) => self.create_ask(ask),
        }
    }
}

/// Arc wrapper for TradeApi trait objects.
pub type DynTradeApi = Arc<dyn TradeApi>;

/// What the mock answers to the next submission.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Server answered with this payload.
    Respond(SubmissionResult),
    /// Transport failure with this description.
    TransportError(String),
}

/// In-memory `TradeApi` for testing.
#[derive(Debug)]
pub struct MockTradeApi {
    /// Recorded submissions for verification.
    submissions: Mutex<Vec<SubmissionRequest>>,
    next_response: Mutex<MockResponse>,
    plans: Mutex<Vec<Plan>>,
    profile: Mutex<Option<UserProfile>>,
    history: Mutex<Vec<TradeRecord>>,
    /// When set, submissions wait for `release()` before answering.
    hold: Mutex<Option<Arc<Notify>>>,
    /// Fail every fetch with a transport error.
    fetch_fails: AtomicBool,
}

impl Default for MockTradeApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTradeApi {
    /// Create a mock that accepts every submission.
    pub fn new() -> Self {
        Self {
            submissions: Mutex::new(Vec::new()),
            next_response: Mutex::new(MockResponse::Respond(SubmissionResult::accepted("ok"))),
            plans: Mutex::new(Vec::new()),
            profile: Mutex::new(None),
            history: Mutex::new(Vec::new()),
            hold: Mutex::new(None),
            fetch_fails: AtomicBool::new(false),
        }
    }

    /// Set the response returned to submissions.
    pub fn set_next_response(&self, response: MockResponse) {
        *self.next_response.lock() = response;
    }

    pub fn set_plans(&self, plans: Vec<Plan>) {
        *self.plans.lock() = plans;
    }

    pub fn set_profile(&self, profile: UserProfile) {
        *self.profile.lock() = Some(profile);
    }

    pub fn set_history(&self, records: Vec<TradeRecord>) {
        *self.history.lock() = records;
    }

    pub fn set_fetch_fails(&self, fails: bool) {
        self.fetch_fails.store(fails, Ordering::SeqCst);
    }

    /// Make subsequent submissions wait until `release()` is called.
    pub fn hold_submissions(&self) {
        *self.hold.lock() = Some(Arc::new(Notify::new()));
    }

    /// Let one held submission answer.
    pub fn release(&self) {
        if let Some(notify) = self.hold.lock().as_ref() {
            notify.notify_one();
        }
    }

    /// Recorded submissions.
    pub fn submissions(&self) -> Vec<SubmissionRequest> {
        self.submissions.lock().clone()
    }

    /// Number of submissions that reached the API.
    pub fn call_count(&self) -> usize {
        self.submissions.lock().len()
    }

    fn fetch_error(&self) -> Option<ApiError> {
        self.fetch_fails
            .load(Ordering::SeqCst)
            .then(|| ApiError::HttpClient("mock fetch failure".to_string()))
    }

    async fn answer(&self, request: SubmissionRequest) -> ApiResult<SubmissionResult> {
        self.submissions.lock().push(request);

        let hold = self.hold.lock().clone();
        if let Some(notify) = hold {
            notify.notified().await;
        }

        let response = self.next_response.lock().clone();
        match response {
            MockResponse::Respond(result) => Ok(result),
            MockResponse::TransportError(reason) => Err(ApiError::HttpClient(reason)),
        }
    }
}

impl TradeApi for MockTradeApi {
    fn create_bid(&self, request: BidRequest) -> BoxFuture<'_, ApiResult<SubmissionResult>> {
        Box::pin(self.answer(SubmissionRequest::Bid(request)))
    }

    fn create_ask(&self, request: AskRequest) -> BoxFuture<'_, ApiResult<SubmissionResult>> {
        Box::pin(self.answer(SubmissionRequest::Ask(request)))
    }

    fn fetch_plans(&self) -> BoxFuture<'_, ApiResult<Vec<Plan>>> {
        Box::pin(async move {
            match self.fetch_error() {
                Some(e) => Err(e),
                None => Ok(self.plans.lock().clone()),
            }
        })
    }

    fn fetch_profile(&self) -> BoxFuture<'_, ApiResult<UserProfile>> {
        Box::pin(async move {
            if let Some(e) = self.fetch_error() {
                return Err(e);
            }
            self.profile
                .lock()
                .clone()
                .ok_or_else(|| ApiError::Rejected("Unauthorized".to_string()))
        })
    }

    fn fetch_history(&self, _kind: SubmissionKind) -> BoxFuture<'_, ApiResult<Vec<TradeRecord>>> {
        Box::pin(async move {
            match self.fetch_error() {
                Some(e) => Err(e),
                None => Ok(self.history.lock().clone()),
            }
        })
    }
}
