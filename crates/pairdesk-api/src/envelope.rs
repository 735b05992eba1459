//! Response envelopes used by the platform API.
//!
//! Most endpoints wrap their payload as `{ success, message, data }`; list
//! endpoints add a pagination layer (`data.data`).

use serde::{Deserialize, Serialize};

/// `{ success?, message?, data? }` wrapper.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// `false` only when the server said so explicitly.
    pub fn is_success(&self) -> bool {
        self.success.unwrap_or(true)
    }
}

/// Paginated list payload.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub last_page: Option<u32>,
}
