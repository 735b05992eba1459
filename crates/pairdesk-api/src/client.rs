//! HTTP client for the platform REST API.
//!
//! Every request carries `Authorization: Bearer <token>` when the configured
//! token accessor yields one. No retry and no timeout override: a call either
//! resolves with the server's answer or fails at the transport layer.

use crate::config::ApiConfig;
use crate::envelope::{Envelope, Page};
use crate::error::{ApiError, ApiResult};
use crate::trade_api::{BoxFuture, TradeApi};
use pairdesk_core::{
    AskRequest, BidRequest, Plan, SubmissionKind, SubmissionResult, TradeRecord, UserProfile,
};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Client for the bid/ask platform API.
#[derive(Debug, Clone)]
pub struct RestClient {
    /// HTTP client.
    client: Client,
    config: ApiConfig,
}

impl RestClient {
    /// Create a new REST client.
    pub fn new(config: ApiConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("pairdesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.config.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => {
                debug!("No bearer token available, sending unauthenticated request");
                request
            }
        }
    }

    /// `POST` a bid or ask body and read `{ success, message }`.
    ///
    /// A JSON body is honoured whatever the status code, but a non-2xx status
    /// is never reported as success.
    async fn post_submission<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<SubmissionResult> {
        let url = self.config.endpoint(path);
        info!(url = %url, "Posting submission");

        let response = self
            .authorize(self.client.post(&url))
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::HttpClient(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::HttpClient(format!("Failed to read response: {e}")))?;

        match serde_json::from_str::<SubmissionResult>(&text) {
            Ok(mut result) => {
                if !status.is_success() {
                    warn!(%status, message = ?result.message, "Submission answered with error status");
                    result.success = false;
                }
                info!(success = result.success, message = ?result.message, "Submission answered");
                Ok(result)
            }
            Err(e) if status.is_success() => Err(ApiError::UnexpectedResponse(format!(
                "Failed to parse submission response: {e}"
            ))),
            Err(_) => Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            }),
        }
    }

    /// `GET` an enveloped payload.
    async fn get_envelope<T: DeserializeOwned>(&self, path: &str) -> ApiResult<Envelope<T>> {
        let url = self.config.endpoint(path);
        debug!(url = %url, "Fetching");

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| ApiError::HttpClient(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| ApiError::HttpClient(format!("Failed to read response: {e}")))?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Submit a bid.
    pub async fn create_bid(&self, request: &BidRequest) -> ApiResult<SubmissionResult> {
        info!(plan_id = request.plan_id, amount = %request.amount, "Creating bid");
        self.post_submission("bid", request).await
    }

    /// Submit an ask.
    pub async fn create_ask(&self, request: &AskRequest) -> ApiResult<SubmissionResult> {
        info!(
            source = %request.bal_source,
            amount = %request.amount,
            "Creating ask"
        );
        self.post_submission("ask", request).await
    }

    /// Fetch the active plan set.
    pub async fn fetch_plans(&self) -> ApiResult<Vec<Plan>> {
        let envelope: Envelope<Vec<Plan>> = self.get_envelope("plans").await?;
        if !envelope.is_success() {
            return Err(ApiError::Rejected(
                envelope
                    .message
                    .unwrap_or_else(|| "Failed to fetch plan".to_string()),
            ));
        }
        let plans = envelope.data.unwrap_or_default();
        info!(count = plans.len(), "Fetched plans");
        Ok(plans)
    }

    /// Fetch the signed-in user.
    pub async fn fetch_profile(&self) -> ApiResult<UserProfile> {
        let envelope: Envelope<UserProfile> = self.get_envelope("dashboard").await?;
        if !envelope.is_success() {
            return Err(ApiError::Rejected(
                envelope
                    .message
                    .unwrap_or_else(|| "Unauthorized".to_string()),
            ));
        }
        envelope
            .data
            .ok_or_else(|| ApiError::UnexpectedResponse("dashboard response has no data".into()))
    }

    /// Fetch submitted bids or asks (first page).
    pub async fn fetch_history(&self, kind: SubmissionKind) -> ApiResult<Vec<TradeRecord>> {
        let path = match kind {
            SubmissionKind::Bid => "bids",
            SubmissionKind::Ask => "asks",
        };
        let envelope: Envelope<Page<TradeRecord>> = self.get_envelope(path).await?;
        let records = envelope.data.map(|page| page.data).unwrap_or_default();
        debug!(kind = %kind, count = records.len(), "Fetched history");
        Ok(records)
    }
}

impl TradeApi for RestClient {
    fn create_bid(&self, request: BidRequest) -> BoxFuture<'_, ApiResult<SubmissionResult>> {
        Box::pin(async move { RestClient::create_bid(self, &request).await })
    }

    fn create_ask(&self, request: AskRequest) -> BoxFuture<'_, ApiResult<SubmissionResult>> {
        Box::pin(async move { RestClient::create_ask(self, &request).await })
    }

    fn fetch_plans(&self) -> BoxFuture<'_, ApiResult<Vec<Plan>>> {
        Box::pin(RestClient::fetch_plans(self))
    }

    fn fetch_profile(&self) -> BoxFuture<'_, ApiResult<UserProfile>> {
        Box::pin(RestClient::fetch_profile(self))
    }

    fn fetch_history(&self, kind: SubmissionKind) -> BoxFuture<'_, ApiResult<Vec<TradeRecord>>> {
        Box::pin(RestClient::fetch_history(self, kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds_with_config() {
        let client = RestClient::new(ApiConfig::anonymous("http://127.0.0.1:1/api/")).unwrap();
        assert_eq!(client.config().endpoint("plans"), "http://127.0.0.1:1/api/plans");
    }

    #[tokio::test]
    async fn test_transport_failure_is_http_client_error() {
        // Port 1 is reserved; the connection is refused immediately.
        let client = RestClient::new(ApiConfig::anonymous("http://127.0.0.1:1")).unwrap();
        let err = client.fetch_plans().await.unwrap_err();
        assert!(err.is_transport(), "unexpected error: {err}");
    }
}
