//! URL reachability probing.
//!
//! Every candidate deployment URL is validated with an HTTP `HEAD` request
//! before being reported. Probing is forgiving: any failure
//! (timeout, DNS, TLS, connection refused, error status) is treated as "not
//! reachable" and never surfaces as an error, so one flaky endpoint cannot
//! abort a detection cascade.

use std::time::Duration;
use tracing::debug;

/// Default hard timeout for a single reachability check.
pub const DEFAULT_HEAD_TIMEOUT: Duration = Duration::from_secs(5);

/// Checks whether a URL responds to an HTTP `HEAD` request.
#[allow(async_fn_in_trait)]
pub trait UrlProbe {
    /// Returns true if the URL answered with a 2xx or 3xx status within the
    /// probe's timeout. Must not fail; transport errors map to `false`.
    async fn is_reachable(&self, url: &str) -> bool;
}

/// Reachability probe backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpProbe {
    /// Creates a probe with the default 5 second timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_timeout(DEFAULT_HEAD_TIMEOUT)
    }

    /// Creates a probe with a custom per-request timeout.
    ///
    /// The timeout covers the entire request, including connection setup and
    /// redirects, and cancels the request outright when it elapses.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn with_timeout(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("deploy-scout/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, timeout })
    }

    /// Returns the configured per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl UrlProbe for HttpProbe {
    async fn is_reachable(&self, url: &str) -> bool {
        match self.client.head(url).timeout(self.timeout).send().await {
            Ok(response) => {
                let status = response.status();
                let reachable = status.is_success() || status.is_redirection();
                debug!(url, status = status.as_u16(), reachable, "Probed URL");
                reachable
            }
            Err(e) => {
                debug!(url, error = %e, "Probe failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_reachable_on_ok() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/live"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let probe = HttpProbe::new().unwrap();
        assert!(probe.is_reachable(&format!("{}/live", server.uri())).await);
    }

    #[tokio::test]
    async fn test_not_reachable_on_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let probe = HttpProbe::new().unwrap();
        assert!(!probe.is_reachable(&format!("{}/gone", server.uri())).await);
    }

    #[tokio::test]
    async fn test_not_reachable_on_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let probe = HttpProbe::new().unwrap();
        assert!(!probe.is_reachable(&server.uri()).await);
    }

    #[tokio::test]
    async fn test_not_reachable_on_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let probe = HttpProbe::with_timeout(Duration::from_millis(50)).unwrap();
        assert!(!probe.is_reachable(&server.uri()).await);
    }

    #[tokio::test]
    async fn test_not_reachable_on_connection_error() {
        // Nothing listens on this port.
        let probe = HttpProbe::new().unwrap();
        assert!(!probe.is_reachable("http://127.0.0.1:1/down").await);
    }
}
