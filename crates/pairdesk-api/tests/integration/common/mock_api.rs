//! Mock platform API for integration tests.
//!
//! Serves the bid/ask endpoints under `/api/` and:
//! - records every request (path, bearer header, JSON body)
//! - answers submissions with a configurable status and body
//! - serves canned plans, profile and history

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// A request the mock received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

struct MockState {
    requests: Mutex<Vec<RecordedRequest>>,
    submission_status: Mutex<StatusCode>,
    submission_body: Mutex<String>,
    plans: Mutex<Value>,
    profile: Mutex<Value>,
    history: Mutex<Value>,
}

impl MockState {
    fn record(&self, path: &str, headers: &HeaderMap, body: Option<Value>) {
        let authorization = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.requests.lock().push(RecordedRequest {
            path: path.to_string(),
            authorization,
            body,
        });
    }

    fn submission_response(&self) -> Response {
        let status = *self.submission_status.lock();
        let body = self.submission_body.lock().clone();
        (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
    }
}

/// A mock platform API server.
pub struct MockApiServer {
    addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    state: Arc<MockState>,
}

impl MockApiServer {
    /// Start a new mock server on an available port.
    pub async fn start() -> Self {
        let state = Arc::new(MockState {
            requests: Mutex::new(Vec::new()),
            submission_status: Mutex::new(StatusCode::OK),
            submission_body: Mutex::new(json!({"success": true, "message": "ok"}).to_string()),
            plans: Mutex::new(json!({"data": []})),
            profile: Mutex::new(json!({"success": false, "message": "Unauthorized"})),
            history: Mutex::new(json!({"data": {"data": []}})),
        });

        let app = Router::new()
            .route("/api/bid", post(post_bid))
            .route("/api/ask", post(post_ask))
            .route("/api/plans", get(get_plans))
            .route("/api/dashboard", get(get_dashboard))
            .route("/api/bids", get(get_bids))
            .route("/api/asks", get(get_asks))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx,
            state,
        }
    }

    /// Base URL of the mock API (with trailing slash, as deployments configure it).
    pub fn base_url(&self) -> String {
        format!("http://{}/api/", self.addr)
    }

    /// Answer submissions with this status and raw body.
    pub fn set_submission_response(&self, status: StatusCode, body: impl Into<String>) {
        *self.state.submission_status.lock() = status;
        *self.state.submission_body.lock() = body.into();
    }

    pub fn set_plans(&self, body: Value) {
        *self.state.plans.lock() = body;
    }

    pub fn set_profile(&self, body: Value) {
        *self.state.profile.lock() = body;
    }

    pub fn set_history(&self, body: Value) {
        *self.state.history.lock() = body;
    }

    /// All received requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().clone()
    }

    /// Shutdown the server.
    pub fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
    }
}

async fn post_bid(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record("/bid", &headers, Some(body));
    state.submission_response()
}

async fn post_ask(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record("/ask", &headers, Some(body));
    state.submission_response()
}

async fn get_plans(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Json<Value> {
    state.record("/plans", &headers, None);
    let body = state.plans.lock().clone();
    Json(body)
}

async fn get_dashboard(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Json<Value> {
    state.record("/dashboard", &headers, None);
    let body = state.profile.lock().clone();
    Json(body)
}

async fn get_bids(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Json<Value> {
    state.record("/bids", &headers, None);
    let body = state.history.lock().clone();
    Json(body)
}

async fn get_asks(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Json<Value> {
    state.record("/asks", &headers, None);
    let body = state.history.lock().clone();
    Json(body)
}
