//! Scan aggregation types.

use crate::detector::DetectedApp;
use serde::Serialize;

/// Result of processing a single repository during a fleet scan.
#[derive(Debug, Clone)]
pub enum ScanOutcome {
    /// A deployment was found and enriched into an app.
    Detected(DetectedApp),

    /// Detection ran to completion and found no deployment.
    Skipped {
        /// Repository full name.
        repo: String,
    },

    /// Detection failed outright.
    Failed {
        /// Repository full name.
        repo: String,
        /// Error message.
        error: String,
    },
}

/// A per-repository failure recorded during a fleet scan.
#[derive(Debug, Clone, Serialize)]
pub struct RepoScanError {
    /// Repository full name.
    pub repo: String,

    /// Error message.
    pub error: String,
}

/// Aggregated result of one fleet scan.
///
/// Built fresh per scan invocation and returned to the caller; nothing is
/// retained across scans, and persistence (including diffing against already
/// registered apps) is the caller's concern.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanSummary {
    /// Number of repositories enumerated.
    pub total_repos: usize,

    /// Number of repositories whose detection settled, whatever the outcome.
    pub scanned_repos: usize,

    /// Apps with a detected deployment.
    pub detected_apps: Vec<DetectedApp>,

    /// Repositories scanned successfully with no deployment found.
    pub skipped_repos: Vec<String>,

    /// Repositories whose detection failed.
    pub errors: Vec<RepoScanError>,

    /// True if the scan was cancelled before processing every repository.
    pub cancelled: bool,
}

impl ScanSummary {
    /// Creates an empty summary for a scan over `total_repos` repositories.
    #[must_use]
    pub fn new(total_repos: usize) -> Self {
        Self {
            total_repos,
            ..Default::default()
        }
    }

    /// Folds one settled repository into the summary.
    ///
    /// Every outcome counts as scanned; a failure is recorded in `errors`
    /// and never in `skipped_repos`, which only holds repositories that were
    /// inspected successfully and had nothing.
    pub fn record(&mut self, outcome: ScanOutcome) {
        self.scanned_repos += 1;
        match outcome {
            ScanOutcome::Detected(app) => self.detected_apps.push(app),
            ScanOutcome::Skipped { repo } => self.skipped_repos.push(repo),
            ScanOutcome::Failed { repo, error } => {
                self.errors.push(RepoScanError { repo, error });
            }
        }
    }

    /// Returns true if any repository failed during the scan.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::{ConfidenceLevel, DeploymentSource};

    fn app(full_name: &str) -> DetectedApp {
        DetectedApp {
            repo_full_name: full_name.to_string(),
            repo_name: full_name.split('/').next_back().unwrap().to_string(),
            description: None,
            url: "https://demo.example.com".to_string(),
            source: DeploymentSource::GithubHomepage,
            confidence: ConfidenceLevel::High,
            thumbnail_url: DetectedApp::thumbnail_url(full_name),
        }
    }

    #[test]
    fn test_record_counts_every_outcome_as_scanned() {
        let mut summary = ScanSummary::new(3);
        summary.record(ScanOutcome::Detected(app("alice/demo")));
        summary.record(ScanOutcome::Skipped {
            repo: "alice/lib".to_string(),
        });
        summary.record(ScanOutcome::Failed {
            repo: "alice/broken".to_string(),
            error: "boom".to_string(),
        });

        assert_eq!(summary.scanned_repos, 3);
        assert_eq!(summary.detected_apps.len(), 1);
        assert_eq!(summary.skipped_repos, vec!["alice/lib"]);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].repo, "alice/broken");
        assert!(summary.has_errors());
    }

    #[test]
    fn test_failure_is_not_a_skip() {
        let mut summary = ScanSummary::new(1);
        summary.record(ScanOutcome::Failed {
            repo: "alice/broken".to_string(),
            error: "boom".to_string(),
        });

        assert!(summary.skipped_repos.is_empty());
        assert!(summary.detected_apps.is_empty());
        assert_eq!(summary.scanned_repos, 1);
    }
}
