//! Periodic gate recomputation.
//!
//! The ticker publishes the current `GateState` through a watch channel once
//! at spawn and then every interval. The returned `TickerGuard` owns the task:
//! dropping it cancels the loop.

use std::time::Duration;

use pairdesk_core::{GateState, TimeGate};
use pairdesk_telemetry::Metrics;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Spawns the gate recomputation task.
pub struct GateTicker;

impl GateTicker {
    /// Start publishing gate state every `interval`.
    ///
    /// Must be called within a tokio runtime.
    pub fn spawn(gate: TimeGate, interval: Duration) -> TickerGuard {
        let (tx, rx) = watch::channel(gate.state());
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            debug!(interval_ms = interval.as_millis() as u64, "Gate ticker started");

            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        let state = gate.state();
                        Metrics::gate_tick(&state);
                        trace!(open = state.is_open, countdown = %state.countdown, "Gate tick");
                        tx.send_replace(state);
                    }
                }
            }

            debug!("Gate ticker stopped");
        });

        TickerGuard {
            cancel,
            handle: Some(handle),
            rx,
        }
    }
}

/// Owns a running ticker. Dropping it cancels the task.
pub struct TickerGuard {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
    rx: watch::Receiver<GateState>,
}

impl TickerGuard {
    /// New receiver for gate updates.
    pub fn subscribe(&self) -> watch::Receiver<GateState> {
        self.rx.clone()
    }

    /// Most recently published state.
    pub fn current(&self) -> GateState {
        *self.rx.borrow()
    }

    /// Cancel the task and wait for it to finish.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TickerGuard {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
