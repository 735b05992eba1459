//! Client configuration.

use std::fmt;
use std::sync::Arc;

/// Accessor returning the current bearer token, if any.
///
/// Called on every request so a refreshed token is picked up without
/// rebuilding the client.
pub type TokenProvider = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// Base URL and credentials handed to the client at construction.
#[derive(Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: TokenProvider,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, token: TokenProvider) -> Self {
        Self {
            base_url: base_url.into(),
            token,
        }
    }

    /// Config with a fixed token.
    pub fn with_static_token(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let token = token.into();
        Self::new(base_url, Arc::new(move || Some(token.clone())))
    }

    /// Config that never sends an `Authorization` header.
    pub fn anonymous(base_url: impl Into<String>) -> Self {
        Self::new(base_url, Arc::new(|| None))
    }

    /// Join a path onto the base URL with exactly one `/` between them.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn bearer_token(&self) -> Option<String> {
        (self.token)().filter(|t| !t.is_empty())
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}
