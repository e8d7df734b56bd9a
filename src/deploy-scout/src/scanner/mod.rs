//! Fleet-wide repository scanning.
//!
//! The scanner enumerates every repository of a GitHub account and drives the
//! deployment detector over each one with bounded concurrency, folding the
//! outcomes into one [`ScanSummary`]. Enumeration failure is the only fatal
//! condition; per-repository failures are recorded and never stop the scan.

mod config;
mod error;
mod options;
mod summary;

pub use config::{ScanTarget, ScannerConfig};
pub use error::ScanError;
pub use options::{
    AppDetectedCallback, CancelFlag, ProgressCallback, ScanOptions, DEFAULT_CONCURRENCY,
};
pub use summary::{RepoScanError, ScanOutcome, ScanSummary};

use crate::detector::{DetectDeployment, DetectedApp, Detector, DetectorConfig};
use crate::repository::RepositoryDescriptor;
use futures::future::join_all;
use octocrab::Octocrab;
use tracing::{info, info_span, warn, Instrument};

/// Repositories fetched per enumeration page.
const REPOS_PER_PAGE: usize = 100;

/// Scans a GitHub account's repositories for live deployments.
///
/// Generic over the detector so embedders and tests can substitute their own
/// [`DetectDeployment`] implementation; [`FleetScanner::new`] wires up the
/// real cascade matching the scan target's credential.
pub struct FleetScanner<D = Detector> {
    github: Octocrab,
    target: ScanTarget,
    detector: D,
}

impl FleetScanner<Detector> {
    /// Builds a scanner and its matching detector from configuration.
    ///
    /// An authenticated target gets the full cascade; a public target gets
    /// the public-API-only cascade.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] if the GitHub client or detector cannot be
    /// built.
    pub fn new(config: ScannerConfig) -> Result<Self, ScanError> {
        let mut detector_config = DetectorConfig::new().with_head_timeout(config.head_timeout());
        if let Some(token) = config.target().token() {
            detector_config = detector_config.with_token(token);
        }
        if let Some(api_base) = config.api_base() {
            detector_config = detector_config.with_api_base(api_base);
        }
        let detector = Detector::new(detector_config)?;

        let mut builder = Octocrab::builder();
        if let Some(token) = config.target().token() {
            builder = builder.personal_token(token.to_string());
        }
        if let Some(api_base) = config.api_base() {
            builder = builder.base_uri(api_base)?;
        }
        let github = builder.build()?;

        Ok(Self::with_detector(github, config.target().clone(), detector))
    }
}

impl<D: DetectDeployment> FleetScanner<D> {
    /// Builds a scanner around an existing client and detector.
    #[must_use]
    pub fn with_detector(github: Octocrab, target: ScanTarget, detector: D) -> Self {
        Self {
            github,
            target,
            detector,
        }
    }

    /// Scans every repository of the target account.
    ///
    /// Repositories are processed in chunks of the configured concurrency
    /// limit; a whole chunk settles before the next one starts, which bounds
    /// in-flight HTTP work and gives progress reporting a natural cadence.
    /// The scan always runs to completion (or cancellation) once enumeration
    /// has succeeded, however many individual repositories fail.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Enumeration`] if the repository list cannot be
    /// fetched. Per-repository failures are reported through
    /// [`ScanSummary::errors`] instead.
    pub async fn scan_all(&self, options: &ScanOptions) -> Result<ScanSummary, ScanError> {
        let span = info_span!("scan_all");

        async move {
            info!("Enumerating repositories");
            let repositories = self.list_repositories().await?;
            let total = repositories.len();
            info!(count = total, "Scanning repositories");

            let mut summary = ScanSummary::new(total);
            for chunk in repositories.chunks(options.concurrency()) {
                if options.is_cancelled() {
                    warn!(
                        scanned = summary.scanned_repos,
                        total, "Scan cancelled, returning partial results"
                    );
                    summary.cancelled = true;
                    break;
                }

                let settled = summary.scanned_repos;
                let detections: Vec<_> = chunk
                    .iter()
                    .map(|repository| self.scan_one(repository, settled, total, options))
                    .collect();
                for outcome in join_all(detections).await {
                    summary.record(outcome);
                }
            }

            if !summary.cancelled {
                options.emit_progress(total, total, None);
            }
            info!(
                scanned = summary.scanned_repos,
                detected = summary.detected_apps.len(),
                skipped = summary.skipped_repos.len(),
                errors = summary.errors.len(),
                "Scan complete"
            );
            Ok(summary)
        }
        .instrument(span)
        .await
    }

    /// Scans a single repository by owner and name.
    ///
    /// Used for on-demand lookups; bypasses enumeration and aggregation
    /// entirely.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::RepoLookup`] if the repository cannot be fetched
    /// (e.g., it does not exist) and [`ScanError::Detection`] if detection
    /// itself fails.
    pub async fn scan_repository(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Option<DetectedApp>, ScanError> {
        let full_name = format!("{owner}/{repo}");
        let span = info_span!("scan_repository", repo = %full_name);

        async move {
            let route = format!("/repos/{owner}/{repo}");
            let repository: RepositoryDescriptor = self
                .github
                .get(&route, None::<&()>)
                .await
                .map_err(|source| ScanError::RepoLookup {
                    repo: full_name.clone(),
                    source,
                })?;

            match self.detector.detect(&repository).await {
                Ok(result) => Ok(DetectedApp::from_detection(&repository, &result)),
                Err(e) => Err(ScanError::Detection {
                    repo: full_name.clone(),
                    message: e.to_string(),
                }),
            }
        }
        .instrument(span)
        .await
    }

    /// Runs detection over one repository, reporting progress first.
    async fn scan_one(
        &self,
        repository: &RepositoryDescriptor,
        settled: usize,
        total: usize,
        options: &ScanOptions,
    ) -> ScanOutcome {
        options.emit_progress(settled, total, Some(&repository.full_name));

        match self.detector.detect(repository).await {
            Ok(result) => match DetectedApp::from_detection(repository, &result) {
                Some(app) => {
                    options.emit_app_detected(&app);
                    ScanOutcome::Detected(app)
                }
                None => ScanOutcome::Skipped {
                    repo: repository.full_name.clone(),
                },
            },
            Err(e) => {
                warn!(repo = %repository.full_name, error = %e, "Detection failed");
                ScanOutcome::Failed {
                    repo: repository.full_name.clone(),
                    error: e.to_string(),
                }
            }
        }
    }

    /// Fetches the complete repository list for the scan target.
    ///
    /// Pages through the listing endpoint until a short page signals the end.
    async fn list_repositories(&self) -> Result<Vec<RepositoryDescriptor>, ScanError> {
        let mut repositories = Vec::new();
        let mut page = 1u32;

        loop {
            let route = match &self.target {
                ScanTarget::AuthenticatedUser { .. } => format!(
                    "/user/repos?per_page={REPOS_PER_PAGE}&page={page}&sort=updated"
                ),
                ScanTarget::PublicUser { username } => format!(
                    "/users/{username}/repos?per_page={REPOS_PER_PAGE}&page={page}&sort=updated"
                ),
            };

            let batch: Vec<RepositoryDescriptor> = self
                .github
                .get(&route, None::<&()>)
                .await
                .map_err(ScanError::Enumeration)?;

            let fetched = batch.len();
            repositories.extend(batch);

            if fetched < REPOS_PER_PAGE {
                break;
            }
            page += 1;
        }

        Ok(repositories)
    }
}
