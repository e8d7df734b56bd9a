//! Fleet scanner errors.

use crate::detector::DetectorError;
use thiserror::Error;

/// Errors that can abort a scan.
///
/// Per-repository detection failures are not represented here; they are
/// recorded in [`ScanSummary::errors`](super::ScanSummary::errors) and never
/// stop the scan. Only enumeration and lookup failures are fatal, since
/// without a repository list there is nothing to scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// GitHub API client could not be built.
    #[error("Failed to build GitHub client: {0}")]
    Client(#[from] octocrab::Error),

    /// Detector could not be built.
    #[error("Failed to build detector: {0}")]
    Detector(#[from] DetectorError),

    /// Repository enumeration failed. The source error carries the HTTP
    /// status returned by GitHub.
    #[error("Repository enumeration failed: {0}")]
    Enumeration(#[source] octocrab::Error),

    /// A single-repository lookup failed (e.g., 404).
    #[error("Failed to look up repository '{repo}': {source}")]
    RepoLookup {
        /// Repository full name.
        repo: String,
        /// Underlying API error.
        #[source]
        source: octocrab::Error,
    },

    /// Detection failed during a single-repository scan.
    #[error("Detection failed for repository '{repo}': {message}")]
    Detection {
        /// Repository full name.
        repo: String,
        /// Error message.
        message: String,
    },
}
