//! Integration tests for pairdesk-app.
//!
//! Drive the submission controllers and the application against
//! `MockTradeApi` with a manual clock.

pub mod common;
