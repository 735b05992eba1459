//! Domain types shared between the API client and the desk.

use crate::amount::Amount;
use crate::error::CoreError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which balance an ask draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FundingSource {
    #[default]
    Balance,
    Earning,
}

impl FundingSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Balance => "balance",
            Self::Earning => "earning",
        }
    }
}

impl fmt::Display for FundingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FundingSource {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "balance" => Ok(Self::Balance),
            "earning" | "earnings" => Ok(Self::Earning),
            other => Err(CoreError::InvalidFundingSource(other.to_string())),
        }
    }
}

/// Submission flow a controller drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionKind {
    Bid,
    Ask,
}

impl SubmissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bid => "bid",
            Self::Ask => "ask",
        }
    }
}

impl fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Investment plan a bid is placed against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub id: u64,
    pub name: String,
    pub minimum: Decimal,
    pub maximum: Decimal,
    pub interest: Decimal,
    pub interest_type: String,
}

/// Signed-in user as returned by the dashboard endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub balance: Decimal,
    #[serde(default)]
    pub earning: Decimal,
    /// BEP-20 payout address; asks are paid out here.
    #[serde(default)]
    pub bep_address: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl UserProfile {
    /// Available funds for a source.
    pub fn available(&self, source: FundingSource) -> Decimal {
        match source {
            FundingSource::Balance => self.balance,
            FundingSource::Earning => self.earning,
        }
    }
}

/// Body of `POST bid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BidRequest {
    pub plan_id: u64,
    pub amount: Amount,
}

/// Body of `POST ask`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AskRequest {
    pub bal_source: FundingSource,
    pub bep_address: Option<String>,
    pub amount: Amount,
}

/// A request built by the submission controller. Immutable once sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionRequest {
    Bid(BidRequest),
    Ask(AskRequest),
}

impl SubmissionRequest {
    pub fn kind(&self) -> SubmissionKind {
        match self {
            Self::Bid(_) => SubmissionKind::Bid,
            Self::Ask(_) => SubmissionKind::Ask,
        }
    }

    pub fn amount(&self) -> Amount {
        match self {
            Self::Bid(bid) => bid.amount,
            Self::Ask(ask) => ask.amount,
        }
    }
}

/// Endpoint verdict for a bid or ask.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubmissionResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl SubmissionResult {
    pub fn accepted(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// One row of bid or ask history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub id: u64,
    pub amount: Decimal,
    pub status: String,
    #[serde(default)]
    pub trx: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}
