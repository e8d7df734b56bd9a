//! Detector configuration.

use crate::probe::DEFAULT_HEAD_TIMEOUT;
use std::time::Duration;

/// Default GitHub REST API base URL.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Configuration for building a [`Detector`](super::Detector).
///
/// The token decides which cascade the detector runs: with a token the
/// deployment-environments stage is included, without one only public API
/// calls are made.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Optional GitHub personal access token.
    token: Option<String>,
    /// GitHub API base URL.
    api_base: String,
    /// Hard timeout for each reachability probe.
    head_timeout: Duration,
}

impl DetectorConfig {
    /// Creates a configuration for unauthenticated detection against the
    /// public GitHub API.
    #[must_use]
    pub fn new() -> Self {
        Self {
            token: None,
            api_base: GITHUB_API_BASE.to_string(),
            head_timeout: DEFAULT_HEAD_TIMEOUT,
        }
    }

    /// Sets the access token, enabling the environments stage.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Overrides the GitHub API base URL.
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Overrides the reachability probe timeout.
    #[must_use]
    pub fn with_head_timeout(mut self, head_timeout: Duration) -> Self {
        self.head_timeout = head_timeout;
        self
    }

    /// Returns the configured token, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Returns the API base URL without a trailing slash.
    #[must_use]
    pub fn api_base(&self) -> &str {
        self.api_base.trim_end_matches('/')
    }

    /// Returns the reachability probe timeout.
    #[must_use]
    pub fn head_timeout(&self) -> Duration {
        self.head_timeout
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self::new()
    }
}
