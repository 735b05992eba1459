//! Submission controller for the bid and ask flows.
//!
//! A submission runs through:
//! 1. Gate check (window open)
//! 2. Amount check (present and positive)
//! 3. Plan check (bid only)
//! 4. Exactly one `TradeApi` call
//! 5. One notice, and an amount reset on success
//!
//! Phase transitions: `Idle -> Validating -> (Rejected | Submitting) ->
//! (Succeeded | Failed) -> Idle`. A second `submit()` while one is in flight
//! returns `SubmissionOutcome::Busy` without touching the API.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, info, warn};

use pairdesk_api::{ApiResult, DynTradeApi};
use pairdesk_core::{
    Amount, AskRequest, BidRequest, FundingSource, Plan, SubmissionKind, SubmissionRequest,
    SubmissionResult, TimeGate, UserProfile,
};
use pairdesk_telemetry::Metrics;

use crate::notifier::{Notice, Notifier};

/// Shown when `GET plans` fails.
pub const PLAN_LOAD_FAILED: &str = "Failed to load plan.";

/// Fixed notices for one flow.
#[derive(Debug, Clone, Copy)]
struct FlowMessages {
    window_prefix: &'static str,
    window_suffix: &'static str,
    succeeded: &'static str,
    rejected: &'static str,
    network_error: &'static str,
}

impl FlowMessages {
    fn for_kind(kind: SubmissionKind) -> Self {
        match kind {
            SubmissionKind::Bid => Self {
                window_prefix: "Bidding is only allowed between ",
                window_suffix: "",
                succeeded: "Bid Successful",
                rejected: "Failed to submit bid.",
                network_error: "An error occurred during bidding.",
            },
            SubmissionKind::Ask => Self {
                window_prefix: "Ask requests are allowed only between ",
                window_suffix: ".",
                succeeded: "Ask request successfully created!",
                rejected: "Failed to create ask request.",
                network_error: "An error occurred while processing the request.",
            },
        }
    }
}

/// Controller phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Validating,
    Rejected,
    Submitting,
    Succeeded,
    Failed,
}

/// Local precondition failure. No request was sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("{notice}")]
    WindowClosed { notice: String },

    #[error("Please enter a valid amount.")]
    InvalidAmount,

    #[error("No active plan available.")]
    NoActivePlan,
}

impl Rejection {
    /// Metrics outcome label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::WindowClosed { .. } => "rejected_window_closed",
            Self::InvalidAmount => "rejected_invalid_amount",
            Self::NoActivePlan => "rejected_no_plan",
        }
    }
}

/// Result of one `submit()` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Rejected(Rejection),
    Succeeded { message: String },
    Failed { message: String },
    /// Another submission from this controller is still in flight.
    Busy,
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    /// Message shown to the user, if any.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Rejected(rejection) => Some(rejection.to_string()),
            Self::Succeeded { message } | Self::Failed { message } => Some(message.clone()),
            Self::Busy => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Rejected(rejection) => rejection.label(),
            Self::Succeeded { .. } => "succeeded",
            Self::Failed { .. } => "failed",
            Self::Busy => "busy",
        }
    }
}

#[derive(Debug, Default)]
struct SubmissionForm {
    amount: String,
    source: FundingSource,
    plan: Option<Plan>,
    profile: Option<UserProfile>,
}

/// Clears the in-flight flag and returns the phase to `Idle` on every exit path.
struct InFlightGuard<'a> {
    submitting: &'a AtomicBool,
    phase: &'a Mutex<SubmissionPhase>,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(submitting: &'a AtomicBool, phase: &'a Mutex<SubmissionPhase>) -> Option<Self> {
        submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { submitting, phase })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        *self.phase.lock() = SubmissionPhase::Idle;
        self.submitting.store(false, Ordering::Release);
    }
}

/// Drives one bid or ask view.
pub struct SubmissionController {
    kind: SubmissionKind,
    gate: TimeGate,
    api: DynTradeApi,
    notifier: Arc<dyn Notifier>,
    messages: FlowMessages,
    submitting: AtomicBool,
    phase: Mutex<SubmissionPhase>,
    form: Mutex<SubmissionForm>,
}

impl SubmissionController {
    pub fn new(
        kind: SubmissionKind,
        gate: TimeGate,
        api: DynTradeApi,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            kind,
            gate,
            api,
            notifier,
            messages: FlowMessages::for_kind(kind),
            submitting: AtomicBool::new(false),
            phase: Mutex::new(SubmissionPhase::Idle),
            form: Mutex::new(SubmissionForm::default()),
        }
    }

    pub fn bid(gate: TimeGate, api: DynTradeApi, notifier: Arc<dyn Notifier>) -> Self {
        Self::new(SubmissionKind::Bid, gate, api, notifier)
    }

    pub fn ask(gate: TimeGate, api: DynTradeApi, notifier: Arc<dyn Notifier>) -> Self {
        Self::new(SubmissionKind::Ask, gate, api, notifier)
    }

    pub fn kind(&self) -> SubmissionKind {
        self.kind
    }

    pub fn gate(&self) -> &TimeGate {
        &self.gate
    }

    pub fn phase(&self) -> SubmissionPhase {
        *self.phase.lock()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    // ---- form ----

    /// Replace the amount field with free text. Validated on submit.
    pub fn set_amount(&self, text: impl Into<String>) {
        self.form.lock().amount = text.into();
    }

    /// Fill the amount field from a preset.
    pub fn select_preset(&self, amount: Amount) {
        self.form.lock().amount = amount.to_string();
    }

    pub fn amount_text(&self) -> String {
        self.form.lock().amount.clone()
    }

    pub fn set_source(&self, source: FundingSource) {
        self.form.lock().source = source;
    }

    pub fn source(&self) -> FundingSource {
        self.form.lock().source
    }

    pub fn plan(&self) -> Option<Plan> {
        self.form.lock().plan.clone()
    }

    pub fn set_plan(&self, plan: Option<Plan>) {
        self.form.lock().plan = plan;
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.form.lock().profile.clone()
    }

    pub fn set_profile(&self, profile: Option<UserProfile>) {
        self.form.lock().profile = profile;
    }

    /// Fetch plans and keep the first one as the active plan.
    ///
    /// An empty list clears the plan without a notice; a failed fetch notifies
    /// `"Failed to load plan."`.
    pub async fn load_plan(&self) -> ApiResult<Option<Plan>> {
        match self.api.fetch_plans().await {
            Ok(plans) => {
                let plan = plans.into_iter().next();
                match &plan {
                    Some(p) => debug!(plan_id = p.id, name = %p.name, "Active plan loaded"),
                    None => warn!("No plans returned"),
                }
                self.set_plan(plan.clone());
                Ok(plan)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load plan");
                self.notifier.notify(Notice::error(PLAN_LOAD_FAILED));
                Err(e)
            }
        }
    }

    /// Fetch the signed-in user; the ask payout address comes from here.
    pub async fn load_profile(&self) -> ApiResult<UserProfile> {
        match self.api.fetch_profile().await {
            Ok(profile) => {
                debug!(user_id = profile.id, "Profile loaded");
                self.set_profile(Some(profile.clone()));
                Ok(profile)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load profile");
                Err(e)
            }
        }
    }

    // ---- submission ----

    /// Run one submission attempt.
    pub async fn submit(&self) -> SubmissionOutcome {
        let Some(_in_flight) = InFlightGuard::acquire(&self.submitting, &self.phase) else {
            debug!(kind = %self.kind, "Submission already in flight");
            Metrics::submission(self.kind, SubmissionOutcome::Busy.label());
            return SubmissionOutcome::Busy;
        };

        self.set_phase(SubmissionPhase::Validating);
        let request = match self.build_request() {
            Ok(request) => request,
            Err(rejection) => {
                debug!(kind = %self.kind, reason = rejection.label(), "Submission rejected");
                self.set_phase(SubmissionPhase::Rejected);
                self.notifier.notify(Notice::error(rejection.to_string()));
                let outcome = SubmissionOutcome::Rejected(rejection);
                Metrics::submission(self.kind, outcome.label());
                return outcome;
            }
        };

        self.set_phase(SubmissionPhase::Submitting);
        info!(kind = %self.kind, amount = %request.amount(), "Submitting");

        let started = Instant::now();
        let result = self.api.submit(request).await;
        Metrics::submission_latency(self.kind, started.elapsed().as_secs_f64() * 1000.0);

        let outcome = match result {
            Ok(response) => self.on_response(response),
            Err(e) => {
                warn!(
                    kind = %self.kind,
                    transport = e.is_transport(),
                    error = %e,
                    "Submission request failed"
                );
                SubmissionOutcome::Failed {
                    message: self.messages.network_error.to_string(),
                }
            }
        };

        match &outcome {
            SubmissionOutcome::Succeeded { message } => {
                self.set_phase(SubmissionPhase::Succeeded);
                self.form.lock().amount.clear();
                self.notifier.notify(Notice::success(message.clone()));
            }
            SubmissionOutcome::Failed { message } => {
                self.set_phase(SubmissionPhase::Failed);
                self.notifier.notify(Notice::error(message.clone()));
            }
            SubmissionOutcome::Rejected(_) | SubmissionOutcome::Busy => {}
        }
        Metrics::submission(self.kind, outcome.label());
        outcome
    }

    fn on_response(&self, response: SubmissionResult) -> SubmissionOutcome {
        let server_message = response.message.filter(|m| !m.trim().is_empty());
        if response.success {
            info!(kind = %self.kind, "Submission accepted");
            SubmissionOutcome::Succeeded {
                message: server_message.unwrap_or_else(|| self.messages.succeeded.to_string()),
            }
        } else {
            warn!(
                kind = %self.kind,
                message = server_message.as_deref().unwrap_or(""),
                "Submission rejected by server"
            );
            SubmissionOutcome::Failed {
                message: server_message.unwrap_or_else(|| self.messages.rejected.to_string()),
            }
        }
    }

    fn build_request(&self) -> Result<SubmissionRequest, Rejection> {
        if !self.gate.can_submit() {
            return Err(Rejection::WindowClosed {
                notice: self.window_notice(),
            });
        }

        let form = self.form.lock();
        let amount = Amount::parse(&form.amount).map_err(|_| Rejection::InvalidAmount)?;

        match self.kind {
            SubmissionKind::Bid => {
                let plan = form.plan.as_ref().ok_or(Rejection::NoActivePlan)?;
                Ok(SubmissionRequest::Bid(BidRequest {
                    plan_id: plan.id,
                    amount,
                }))
            }
            SubmissionKind::Ask => Ok(SubmissionRequest::Ask(AskRequest {
                bal_source: form.source,
                bep_address: form.profile.as_ref().and_then(|p| p.bep_address.clone()),
                amount,
            })),
        }
    }

    /// Notice shown when the gate is closed.
    pub fn window_notice(&self) -> String {
        format!(
            "{}{}{}",
            self.messages.window_prefix,
            self.gate.schedule().describe(),
            self.messages.window_suffix
        )
    }

    fn set_phase(&self, phase: SubmissionPhase) {
        *self.phase.lock() = phase;
    }
}
