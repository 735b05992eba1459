//! Shared fixtures for desk integration tests.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use pairdesk_api::MockTradeApi;
use pairdesk_app::{RecordingNotifier, SubmissionController};
use pairdesk_core::{ManualClock, Plan, SubmissionKind, TimeGate, UserProfile, WindowSchedule};
use rust_decimal_macros::dec;

/// 2026-03-10 at the given time.
pub fn at(hour: u32, min: u32, sec: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 10)
        .unwrap()
        .and_hms_opt(hour, min, sec)
        .unwrap()
}

pub fn active_plan() -> Plan {
    Plan {
        id: 2,
        name: "Donation".to_string(),
        minimum: dec!(10),
        maximum: dec!(150),
        interest: dec!(30),
        interest_type: "percent".to_string(),
    }
}

pub fn profile() -> UserProfile {
    UserProfile {
        id: 7,
        name: "Grace".to_string(),
        username: "grace".to_string(),
        email: "grace@example.com".to_string(),
        balance: dec!(120),
        earning: dec!(35.5),
        bep_address: Some("0x5f3c".to_string()),
        status: Some("active".to_string()),
    }
}

/// Controller under test plus its collaborators.
pub struct Desk {
    pub controller: Arc<SubmissionController>,
    pub api: Arc<MockTradeApi>,
    pub notifier: Arc<RecordingNotifier>,
    pub clock: Arc<ManualClock>,
}

impl Desk {
    pub fn new(kind: SubmissionKind, now: NaiveDateTime) -> Self {
        let api = Arc::new(MockTradeApi::new());
        api.set_plans(vec![active_plan()]);
        api.set_profile(profile());

        let clock = Arc::new(ManualClock::new(now));
        let notifier = Arc::new(RecordingNotifier::new());
        let gate = TimeGate::new(WindowSchedule::default(), clock.clone());
        let controller = Arc::new(SubmissionController::new(
            kind,
            gate,
            api.clone(),
            notifier.clone(),
        ));

        Self {
            controller,
            api,
            notifier,
            clock,
        }
    }

    /// Bid desk with the plan already loaded.
    pub async fn bid_ready(now: NaiveDateTime) -> Self {
        let desk = Self::new(SubmissionKind::Bid, now);
        desk.controller.load_plan().await.unwrap();
        desk
    }
}
