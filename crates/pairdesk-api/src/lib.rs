//! REST access to the bid/ask platform.
//!
//! `RestClient` talks to the real API; `TradeApi` is the seam the desk
//! depends on, with `MockTradeApi` standing in for the network in tests.

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod trade_api;

pub use client::RestClient;
pub use config::{ApiConfig, TokenProvider};
pub use envelope::{Envelope, Page};
pub use error::{ApiError, ApiResult};
pub use trade_api::{BoxFuture, DynTradeApi, MockResponse, MockTradeApi, TradeApi};
