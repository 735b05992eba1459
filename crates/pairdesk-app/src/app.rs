//! Application wiring.
//!
//! Builds the gate, API client and notifier from configuration and exposes
//! one method per CLI command.

use crate::config::AppConfig;
use crate::controller::{SubmissionController, SubmissionOutcome};
use crate::error::AppResult;
use crate::notifier::{ConsoleNotifier, Notifier};
use crate::ticker::GateTicker;
use pairdesk_api::{DynTradeApi, RestClient};
use pairdesk_core::{
    Amount, FundingSource, GateState, Plan, SubmissionKind, TimeGate, TradeRecord,
};
use pairdesk_telemetry::Metrics;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Main application.
pub struct Application {
    config: AppConfig,
    gate: TimeGate,
    api: DynTradeApi,
    notifier: Arc<dyn Notifier>,
}

impl Application {
    /// Create an application talking to the configured API.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let gate = TimeGate::new(config.schedule()?, config.clock()?);
        let client = RestClient::new(config.api_config())?;
        info!(
            base_url = %config.api.base_url,
            windows = %gate.schedule().describe(),
            "Application initialized"
        );
        Ok(Self::with_parts(config, gate, Arc::new(client), Arc::new(ConsoleNotifier)))
    }

    /// Create an application from prebuilt parts.
    pub fn with_parts(
        config: AppConfig,
        gate: TimeGate,
        api: DynTradeApi,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            gate,
            api,
            notifier,
        }
    }

    pub fn gate(&self) -> &TimeGate {
        &self.gate
    }

    pub fn controller(&self, kind: SubmissionKind) -> SubmissionController {
        SubmissionController::new(kind, self.gate.clone(), self.api.clone(), self.notifier.clone())
    }

    /// Current gate state.
    pub fn status(&self) -> GateState {
        self.gate.state()
    }

    /// Report gate state every tick until Ctrl-C, or until `ticks` updates
    /// have been reported.
    pub async fn watch<F>(&self, ticks: Option<u64>, mut on_tick: F) -> AppResult<()>
    where
        F: FnMut(&GateState),
    {
        let guard = GateTicker::spawn(self.gate.clone(), self.config.tick_interval());
        let mut rx = guard.subscribe();
        let mut seen = 0u64;
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);
        let mut ctrl_c_armed = true;

        loop {
            tokio::select! {
                changed = rx.changed() => {
                    if changed.is_err() {
                        warn!("Gate ticker stopped unexpectedly");
                        break;
                    }
                    let state = *rx.borrow_and_update();
                    on_tick(&state);
                    seen += 1;
                    if ticks.is_some_and(|limit| seen >= limit) {
                        break;
                    }
                }
                signal = &mut ctrl_c, if ctrl_c_armed => {
                    match signal {
                        Ok(()) => {
                            info!("Shutdown signal received");
                            break;
                        }
                        Err(e) => {
                            warn!(error = %e, "Failed to install Ctrl-C handler");
                            ctrl_c_armed = false;
                        }
                    }
                }
            }
        }

        debug!(ticks = seen, "Watch finished");
        guard.shutdown().await;
        match Metrics::render() {
            Ok(text) => debug!(metrics = %text, "Gate metrics"),
            Err(e) => warn!(error = %e, "Failed to render metrics"),
        }
        Ok(())
    }

    pub async fn plans(&self) -> AppResult<Vec<Plan>> {
        Ok(self.api.fetch_plans().await?)
    }

    /// Load the active plan and submit one bid.
    pub async fn bid(&self, amount: &str) -> SubmissionOutcome {
        let controller = self.controller(SubmissionKind::Bid);
        if let Err(e) = controller.load_plan().await {
            debug!(error = %e, "Continuing without plan");
        }
        controller.set_amount(amount);
        controller.submit().await
    }

    /// Load the profile for its payout address and submit one ask.
    pub async fn ask(&self, amount: &str, source: FundingSource) -> SubmissionOutcome {
        let controller = self.controller(SubmissionKind::Ask);
        if let Err(e) = controller.load_profile().await {
            warn!(error = %e, "Profile unavailable, submitting without payout address");
        }
        controller.set_source(source);
        controller.set_amount(amount);
        controller.submit().await
    }

    pub async fn history(&self, kind: SubmissionKind) -> AppResult<Vec<TradeRecord>> {
        Ok(self.api.fetch_history(kind).await?)
    }

    pub fn presets() -> Vec<Amount> {
        Amount::presets()
    }
}

/// One-line rendering of a gate state.
pub fn describe_state(state: &GateState, gate: &TimeGate) -> String {
    if state.is_open {
        format!("OPEN  windows {}", gate.schedule().describe())
    } else {
        format!(
            "CLOSED  opens {} in {}",
            state.next_open_at.format("%Y-%m-%d %H:%M:%S"),
            state.countdown
        )
    }
}
