//! Fleet scanner configuration.

use crate::probe::DEFAULT_HEAD_TIMEOUT;
use std::time::Duration;

/// Whose repositories a scan enumerates, and with what credential.
#[derive(Debug, Clone)]
pub enum ScanTarget {
    /// The account behind a personal access token, enumerated through
    /// `GET /user/repos`. Detection runs the full cascade.
    AuthenticatedUser {
        /// GitHub personal access token.
        token: String,
    },

    /// A public account, enumerated through `GET /users/{username}/repos`
    /// without credentials. Detection skips the environments stage.
    PublicUser {
        /// Account login.
        username: String,
    },
}

impl ScanTarget {
    /// Returns the token, when the target carries one.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::AuthenticatedUser { token } => Some(token),
            Self::PublicUser { .. } => None,
        }
    }
}

/// Configuration for building a [`FleetScanner`](super::FleetScanner).
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Scan target and credential.
    target: ScanTarget,
    /// GitHub API base override, mainly for tests.
    api_base: Option<String>,
    /// Hard timeout for each reachability probe.
    head_timeout: Duration,
}

impl ScannerConfig {
    /// Configures an authenticated scan of the token's own account.
    #[must_use]
    pub fn authenticated(token: impl Into<String>) -> Self {
        Self {
            target: ScanTarget::AuthenticatedUser {
                token: token.into(),
            },
            api_base: None,
            head_timeout: DEFAULT_HEAD_TIMEOUT,
        }
    }

    /// Configures an unauthenticated scan of a public account.
    #[must_use]
    pub fn public_user(username: impl Into<String>) -> Self {
        Self {
            target: ScanTarget::PublicUser {
                username: username.into(),
            },
            api_base: None,
            head_timeout: DEFAULT_HEAD_TIMEOUT,
        }
    }

    /// Overrides the GitHub API base URL.
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    /// Overrides the reachability probe timeout.
    #[must_use]
    pub fn with_head_timeout(mut self, head_timeout: Duration) -> Self {
        self.head_timeout = head_timeout;
        self
    }

    /// Returns the scan target.
    #[must_use]
    pub fn target(&self) -> &ScanTarget {
        &self.target
    }

    /// Returns the API base override, if any.
    #[must_use]
    pub fn api_base(&self) -> Option<&str> {
        self.api_base.as_deref()
    }

    /// Returns the reachability probe timeout.
    #[must_use]
    pub fn head_timeout(&self) -> Duration {
        self.head_timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_token() {
        let auth = ScannerConfig::authenticated("ghp_test");
        assert_eq!(auth.target().token(), Some("ghp_test"));

        let public = ScannerConfig::public_user("alice");
        assert!(public.target().token().is_none());
    }

    #[test]
    fn test_defaults() {
        let config = ScannerConfig::public_user("alice");
        assert!(config.api_base().is_none());
        assert_eq!(config.head_timeout(), Duration::from_secs(5));
    }
}
