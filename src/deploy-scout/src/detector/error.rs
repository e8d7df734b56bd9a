//! Detector construction errors.

use thiserror::Error;

/// Errors that can occur while building a [`Detector`](super::Detector).
///
/// Detection itself never fails; every stage degrades to "no signal".
#[derive(Debug, Error)]
pub enum DetectorError {
    /// GitHub API client could not be built.
    #[error("Failed to build GitHub client: {0}")]
    GitHub(#[from] octocrab::Error),

    /// HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}
