//! Deployment URL detection.
//!
//! Given one repository descriptor, the detector runs an ordered cascade of
//! strategies and returns the first one that yields a validated URL:
//!
//! 1. the repository's homepage field;
//! 2. a constructed GitHub Pages URL;
//! 3. the most recent deployment of a `production`/`preview` environment
//!    (requires an access token);
//! 4. README extraction (hosting badges, then demo/live links);
//! 5. hosting-platform URLs inferred from the repository name.
//!
//! Candidate URLs from stages 1, 2, 4 and 5 must answer an HTTP `HEAD` probe
//! before they are reported. A failed stage falls through to the next one;
//! the cascade as a whole never fails.

mod config;
mod error;
mod result;

pub use config::{DetectorConfig, GITHUB_API_BASE};
pub use error::DetectorError;
pub use result::{ConfidenceLevel, DetectedApp, DetectionResult, DeploymentSource};

use crate::heuristics;
use crate::probe::{HttpProbe, UrlProbe};
use crate::repository::RepositoryDescriptor;
use octocrab::Octocrab;
use serde::Deserialize;
use std::convert::Infallible;
use std::time::Duration;
use tracing::{debug, info, info_span, Instrument};

/// Accept header value for fetching the raw README body.
const RAW_CONTENT_TYPE: &str = "application/vnd.github.v3.raw";

/// Timeout for fetching a README body, which can be much larger than the
/// HEAD probes covered by the probe timeout.
const README_TIMEOUT: Duration = Duration::from_secs(10);

/// Environment names that indicate a live deployment, in preference order.
const DEPLOYMENT_ENVIRONMENTS: [&str; 2] = ["production", "preview"];

/// Something that can run deployment detection over one repository.
///
/// This is the seam the fleet scanner drives. The associated error type lets
/// alternative implementations fail; the shipped [`Detector`] cannot, since
/// every cascade stage degrades to "no signal".
#[allow(async_fn_in_trait)]
pub trait DetectDeployment {
    /// Error produced by a failed detection attempt.
    type Error: std::fmt::Display;

    /// Runs detection over one repository.
    async fn detect(
        &self,
        repository: &RepositoryDescriptor,
    ) -> Result<DetectionResult, Self::Error>;
}

/// Runs the detection cascade against the GitHub API and the live web.
///
/// One detector serves both calling contexts: constructed with a token it
/// runs the full cascade, constructed without one it skips the environments
/// stage (that lookup requires authentication) and makes only public API
/// calls.
pub struct Detector<P = HttpProbe> {
    github: Octocrab,
    http: reqwest::Client,
    probe: P,
    api_base: String,
    token: Option<String>,
}

impl Detector<HttpProbe> {
    /// Builds a detector with the default HTTP reachability probe.
    ///
    /// # Errors
    ///
    /// Returns [`DetectorError`] if either underlying client cannot be built.
    pub fn new(config: DetectorConfig) -> Result<Self, DetectorError> {
        let probe = HttpProbe::with_timeout(config.head_timeout())?;
        Self::with_probe(config, probe)
    }
}

impl<P: UrlProbe> Detector<P> {
    /// Builds a detector with a custom reachability probe.
    ///
    /// # Errors
    ///
    /// Returns [`DetectorError`] if either underlying client cannot be built.
    pub fn with_probe(config: DetectorConfig, probe: P) -> Result<Self, DetectorError> {
        let mut builder = Octocrab::builder();
        if let Some(token) = config.token() {
            builder = builder.personal_token(token.to_string());
        }
        let github = builder.base_uri(config.api_base())?.build()?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("deploy-scout/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            github,
            http,
            probe,
            api_base: config.api_base().to_string(),
            token: config.token().map(str::to_owned),
        })
    }

    /// Returns true if the detector was built with an access token and will
    /// run the environments stage.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Runs the detection cascade over one repository.
    ///
    /// Strategies run strictly in priority order and the first validated hit
    /// wins; no strategy is retried. Network failures inside a stage are
    /// treated as "nothing found there" and the cascade moves on, so this
    /// call always produces a result.
    pub async fn detect(&self, repository: &RepositoryDescriptor) -> DetectionResult {
        let span = info_span!("detect", repo = %repository.full_name);

        async move {
            // Step 1: homepage field, when it holds a well-formed URL.
            if let Some(homepage) = repository.homepage.as_deref() {
                if heuristics::is_http_url(homepage) && self.probe.is_reachable(homepage).await {
                    info!(url = homepage, "Deployment found via homepage field");
                    return DetectionResult::detected(homepage, DeploymentSource::GithubHomepage);
                }
            }

            // Step 2: GitHub Pages.
            if repository.has_pages {
                let url = heuristics::pages_url(&repository.owner.login, &repository.name);
                if self.probe.is_reachable(&url).await {
                    info!(url = %url, "Deployment found via GitHub Pages");
                    return DetectionResult::detected(url, DeploymentSource::GithubPages);
                }
            }

            // Step 3: deployment environments, token required.
            if self.is_authenticated() {
                if let Some(url) = self.environment_web_url(repository).await {
                    info!(url = %url, "Deployment found via deployment environment");
                    return DetectionResult::detected(url, DeploymentSource::GithubEnvironments);
                }
            }

            // Step 4: README extraction, badges before demo links.
            if let Some(readme) = self.fetch_readme(repository).await {
                if let Some(url) = heuristics::extract_badge_url(&readme) {
                    if self.probe.is_reachable(&url).await {
                        info!(url = %url, "Deployment found via README badge");
                        return DetectionResult::detected(url, DeploymentSource::ReadmeBadge);
                    }
                }
                if let Some(url) = heuristics::extract_demo_link(&readme) {
                    if self.probe.is_reachable(&url).await {
                        info!(url = %url, "Deployment found via README link");
                        return DetectionResult::detected(url, DeploymentSource::ReadmeLink);
                    }
                }
            }

            // Step 5: URL pattern inference.
            for candidate in
                heuristics::candidate_urls(&repository.owner.login, &repository.name)
            {
                if self.probe.is_reachable(&candidate).await {
                    info!(url = %candidate, "Deployment found via URL inference");
                    return DetectionResult::detected(candidate, DeploymentSource::UrlInference);
                }
            }

            debug!("No deployment found");
            DetectionResult::NotFound
        }
        .instrument(span)
        .await
    }

    /// Looks up the `web_url` of the most recent deployment in a
    /// production/preview environment.
    ///
    /// Presence of the field is taken at face value; these URLs come from the
    /// deployment platform itself and are not probed. Any API failure yields
    /// `None`.
    async fn environment_web_url(&self, repository: &RepositoryDescriptor) -> Option<String> {
        let route = format!("/repos/{}/environments", repository.full_name);
        let listing: EnvironmentList = match self.github.get(&route, None::<&()>).await {
            Ok(listing) => listing,
            Err(e) => {
                debug!(error = %e, "Environments lookup failed");
                return None;
            }
        };

        let environment = DEPLOYMENT_ENVIRONMENTS.iter().find_map(|wanted| {
            listing
                .environments
                .iter()
                .find(|e| e.name.eq_ignore_ascii_case(wanted))
        })?;

        let route = format!(
            "/repos/{}/deployments?environment={}&per_page=1",
            repository.full_name, environment.name
        );
        let deployments: Vec<DeploymentRecord> = match self.github.get(&route, None::<&()>).await {
            Ok(deployments) => deployments,
            Err(e) => {
                debug!(error = %e, "Deployments lookup failed");
                return None;
            }
        };

        deployments
            .into_iter()
            .next()?
            .payload
            .get("web_url")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned)
    }

    /// Fetches the repository's README as raw text.
    ///
    /// Returns `None` on any failure; a missing or unreadable README just
    /// means the README stages have nothing to extract from.
    async fn fetch_readme(&self, repository: &RepositoryDescriptor) -> Option<String> {
        let url = format!("{}/repos/{}/readme", self.api_base, repository.full_name);
        let mut request = self
            .http
            .get(&url)
            .header(reqwest::header::ACCEPT, RAW_CONTENT_TYPE)
            .timeout(README_TIMEOUT);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                debug!(error = %e, "README fetch failed");
                return None;
            }
        };
        if !response.status().is_success() {
            debug!(status = response.status().as_u16(), "README not available");
            return None;
        }
        response.text().await.ok()
    }
}

impl<P: UrlProbe> DetectDeployment for Detector<P> {
    type Error = Infallible;

    async fn detect(
        &self,
        repository: &RepositoryDescriptor,
    ) -> Result<DetectionResult, Self::Error> {
        Ok(Detector::detect(self, repository).await)
    }
}

/// Response shape of `GET /repos/{owner}/{repo}/environments`.
#[derive(Debug, Deserialize)]
struct EnvironmentList {
    #[serde(default)]
    environments: Vec<EnvironmentRecord>,
}

#[derive(Debug, Deserialize)]
struct EnvironmentRecord {
    name: String,
}

/// One entry of `GET /repos/{owner}/{repo}/deployments`.
///
/// The `payload` field is whatever the deploying platform attached; GitHub
/// allows both an object and a string, so it is kept as a raw JSON value.
#[derive(Debug, Deserialize)]
struct DeploymentRecord {
    #[serde(default)]
    payload: serde_json::Value,
}
