//! Application command tests against the in-memory API.

mod integration;
use integration::common::{active_plan, at, profile};

use std::sync::Arc;

use pairdesk_api::MockTradeApi;
use pairdesk_app::{AppConfig, Application, NoticeLevel, RecordingNotifier};
use pairdesk_core::{
    FundingSource, ManualClock, SubmissionKind, SubmissionRequest, TimeGate, TradeRecord,
    WindowSchedule,
};
use pairdesk_telemetry::Metrics;
use rust_decimal_macros::dec;

struct Fixture {
    app: Application,
    api: Arc<MockTradeApi>,
    notifier: Arc<RecordingNotifier>,
    clock: Arc<ManualClock>,
}

fn fixture(now: chrono::NaiveDateTime) -> Fixture {
    let api = Arc::new(MockTradeApi::new());
    api.set_plans(vec![active_plan()]);
    api.set_profile(profile());
    let notifier = Arc::new(RecordingNotifier::new());
    let clock = Arc::new(ManualClock::new(now));
    let gate = TimeGate::new(WindowSchedule::default(), clock.clone());
    let app = Application::with_parts(AppConfig::default(), gate, api.clone(), notifier.clone());

    Fixture {
        app,
        api,
        notifier,
        clock,
    }
}

#[tokio::test]
async fn test_bid_command_loads_plan_and_submits() {
    let f = fixture(at(9, 5, 0));

    let outcome = f.app.bid("70").await;

    assert!(outcome.is_success());
    match &f.api.submissions()[0] {
        SubmissionRequest::Bid(bid) => {
            assert_eq!(bid.plan_id, 2);
            assert_eq!(bid.amount.inner(), dec!(70));
        }
        other => panic!("unexpected request {other:?}"),
    }
    assert_eq!(f.notifier.count(NoticeLevel::Success), 1);
}

#[tokio::test]
async fn test_bid_command_outside_window() {
    let f = fixture(at(10, 0, 0));

    let outcome = f.app.bid("70").await;

    assert!(!outcome.is_success());
    assert_eq!(f.api.call_count(), 0);
    assert_eq!(
        f.notifier.last().unwrap().message,
        "Bidding is only allowed between 09:00-09:30 and 21:00-21:30"
    );
}

#[tokio::test]
async fn test_ask_command_without_profile_sends_no_address() {
    let f = fixture(at(21, 0, 0));
    f.api.set_fetch_fails(true);

    let outcome = f.app.ask("15", FundingSource::Earning).await;

    assert!(outcome.is_success());
    match &f.api.submissions()[0] {
        SubmissionRequest::Ask(ask) => {
            assert_eq!(ask.bal_source, FundingSource::Earning);
            assert!(ask.bep_address.is_none());
        }
        other => panic!("unexpected request {other:?}"),
    }
}

#[tokio::test]
async fn test_history_and_plans() {
    let f = fixture(at(12, 0, 0));
    f.api.set_history(vec![TradeRecord {
        id: 4,
        amount: dec!(40),
        status: "pending".to_string(),
        trx: Some("TRX-4".to_string()),
        created_at: None,
    }]);

    let records = f.app.history(SubmissionKind::Ask).await.unwrap();
    let plans = f.app.plans().await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(plans, vec![active_plan()]);
}

#[tokio::test(start_paused = true)]
async fn test_watch_reports_requested_ticks() {
    let f = fixture(at(20, 59, 57));
    let clock = f.clock.clone();
    let mut seen = Vec::new();

    f.app
        .watch(Some(4), |state| {
            seen.push(*state);
            clock.advance(chrono::Duration::seconds(1));
        })
        .await
        .unwrap();

    let countdowns: Vec<String> = seen.iter().map(|s| s.countdown.to_string()).collect();
    assert_eq!(countdowns, ["00:00:03", "00:00:02", "00:00:01", "00:00:00"]);
    assert!(seen[3].is_open);

    let metrics = Metrics::render().unwrap();
    assert!(metrics.contains("pairdesk_gate_ticks_total"));
}

#[test]
fn test_presets() {
    let presets: Vec<String> = Application::presets().iter().map(ToString::to_string).collect();
    assert_eq!(presets.len(), 15);
    assert_eq!(presets.first().map(String::as_str), Some("10"));
    assert_eq!(presets.last().map(String::as_str), Some("150"));
}
