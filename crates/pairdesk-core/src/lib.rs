//! Core domain types for pairdesk.
//!
//! This crate provides the pieces the desk is built from:
//! - `Amount`: strictly positive decimal amount
//! - `TimeWindow`, `WindowSchedule`: daily submission windows
//! - `TimeGate`, `GateState`, `Countdown`: admission check and wait time
//! - `Clock`: wall-clock sources (system, manual)
//! - request/response types for the bid and ask endpoints

pub mod amount;
pub mod clock;
pub mod error;
pub mod gate;
pub mod types;
pub mod window;

pub use amount::Amount;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CoreError, CoreResult};
pub use gate::{Countdown, GateState, TimeGate};
pub use types::{
    AskRequest, BidRequest, FundingSource, Plan, SubmissionKind, SubmissionRequest,
    SubmissionResult, TradeRecord, UserProfile,
};
pub use window::{TimeWindow, WindowSchedule, EVENING_WINDOW, MORNING_WINDOW};
