//! pairdesk: bid/ask submission desk.
//!
//! Wires the pieces together:
//! - Time-window gate with a live countdown ticker
//! - Submission controllers for the bid and ask flows
//! - Terminal notices
//! - Configuration loading

pub mod app;
pub mod config;
pub mod controller;
pub mod error;
pub mod notifier;
pub mod ticker;

pub use app::{describe_state, Application};
pub use config::AppConfig;
pub use controller::{Rejection, SubmissionController, SubmissionOutcome, SubmissionPhase};
pub use error::{AppError, AppResult};
pub use notifier::{ConsoleNotifier, Notice, NoticeLevel, Notifier, RecordingNotifier};
pub use ticker::{GateTicker, TickerGuard};
