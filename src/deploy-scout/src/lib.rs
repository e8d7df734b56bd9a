#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod detector;
pub mod heuristics;
pub mod probe;
pub mod repository;
pub mod scanner;

pub use detector::{
    ConfidenceLevel, DetectDeployment, DetectedApp, DetectionResult, Detector, DetectorConfig,
    DetectorError, DeploymentSource, GITHUB_API_BASE,
};
pub use probe::{HttpProbe, UrlProbe, DEFAULT_HEAD_TIMEOUT};
pub use repository::{RepositoryDescriptor, RepositoryOwner};
pub use scanner::{
    CancelFlag, FleetScanner, RepoScanError, ScanError, ScanOptions, ScanOutcome, ScanSummary,
    ScanTarget, ScannerConfig, DEFAULT_CONCURRENCY,
};
