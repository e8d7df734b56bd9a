//! Detection outcome types.

use crate::repository::RepositoryDescriptor;
use serde::Serialize;

/// Base URL for deterministic repository thumbnails.
const THUMBNAIL_BASE: &str = "https://opengraph.githubassets.com/1";

/// Where in the cascade a deployment URL was found.
///
/// Variants are declared in cascade order; the derived `Ord` makes earlier
/// (preferred) sources compare smaller, so the minimum of a set of sources is
/// the one the cascade would have produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentSource {
    /// The repository's homepage field.
    GithubHomepage,

    /// A constructed GitHub Pages URL.
    GithubPages,

    /// A deployment environment's `web_url` payload (token required).
    GithubEnvironments,

    /// A hosting-platform status badge in the README.
    ReadmeBadge,

    /// A demo/live link in the README.
    ReadmeLink,

    /// A platform URL inferred from the repository name.
    UrlInference,
}

impl DeploymentSource {
    /// Confidence assigned to URLs produced by this source.
    #[must_use]
    pub fn confidence(self) -> ConfidenceLevel {
        match self {
            Self::GithubHomepage | Self::GithubPages | Self::GithubEnvironments => {
                ConfidenceLevel::High
            }
            Self::ReadmeBadge | Self::ReadmeLink => ConfidenceLevel::Medium,
            Self::UrlInference => ConfidenceLevel::Low,
        }
    }

    /// Returns the source as a string, matching its serialized form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GithubHomepage => "github_homepage",
            Self::GithubPages => "github_pages",
            Self::GithubEnvironments => "github_environments",
            Self::ReadmeBadge => "readme_badge",
            Self::ReadmeLink => "readme_link",
            Self::UrlInference => "url_inference",
        }
    }
}

/// How much a detected URL should be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    /// Inferred from naming patterns only.
    Low,

    /// Extracted from README text.
    Medium,

    /// Declared on the repository itself.
    High,
}

impl ConfidenceLevel {
    /// Returns the level as a string, matching its serialized form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Outcome of running the detection cascade over one repository.
///
/// A URL is never reported without its source; the two travel together in the
/// `Detected` variant, so the pair cannot get out of sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DetectionResult {
    /// A validated deployment URL was found.
    Detected {
        /// The deployment URL.
        url: String,
        /// Which cascade stage produced it.
        source: DeploymentSource,
    },

    /// Every cascade stage fell through.
    NotFound,
}

impl DetectionResult {
    /// Builds a detected outcome.
    pub(crate) fn detected(url: impl Into<String>, source: DeploymentSource) -> Self {
        Self::Detected {
            url: url.into(),
            source,
        }
    }

    /// The detected URL, if any.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Detected { url, .. } => Some(url),
            Self::NotFound => None,
        }
    }

    /// The producing cascade stage, if any.
    #[must_use]
    pub fn source(&self) -> Option<DeploymentSource> {
        match self {
            Self::Detected { source, .. } => Some(*source),
            Self::NotFound => None,
        }
    }

    /// Confidence of the outcome. A miss carries low confidence.
    #[must_use]
    pub fn confidence(&self) -> ConfidenceLevel {
        match self {
            Self::Detected { source, .. } => source.confidence(),
            Self::NotFound => ConfidenceLevel::Low,
        }
    }

    /// Returns true if a deployment URL was found.
    #[must_use]
    pub fn is_detected(&self) -> bool {
        matches!(self, Self::Detected { .. })
    }
}

/// A repository paired with its detected deployment, ready for registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectedApp {
    /// Full repository name in "owner/name" format.
    pub repo_full_name: String,

    /// Repository name.
    pub repo_name: String,

    /// Repository description, if any.
    pub description: Option<String>,

    /// The detected deployment URL.
    pub url: String,

    /// Which cascade stage produced the URL.
    pub source: DeploymentSource,

    /// Confidence of the detection.
    pub confidence: ConfidenceLevel,

    /// Derived OpenGraph preview image URL. Never fetched here.
    pub thumbnail_url: String,
}

impl DetectedApp {
    /// Enriches a detection outcome with repository identity.
    ///
    /// Returns `None` when the cascade found nothing; a repository without a
    /// deployment is skipped, not registered with an empty URL.
    #[must_use]
    pub fn from_detection(
        repository: &RepositoryDescriptor,
        result: &DetectionResult,
    ) -> Option<Self> {
        match result {
            DetectionResult::Detected { url, source } => Some(Self {
                repo_full_name: repository.full_name.clone(),
                repo_name: repository.name.clone(),
                description: repository.description.clone(),
                url: url.clone(),
                source: *source,
                confidence: source.confidence(),
                thumbnail_url: Self::thumbnail_url(&repository.full_name),
            }),
            DetectionResult::NotFound => None,
        }
    }

    /// Derives the OpenGraph thumbnail URL for a repository.
    #[must_use]
    pub fn thumbnail_url(repo_full_name: &str) -> String {
        format!("{THUMBNAIL_BASE}/{repo_full_name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RepositoryOwner;

    fn descriptor() -> RepositoryDescriptor {
        RepositoryDescriptor {
            name: "demo".to_string(),
            full_name: "alice/demo".to_string(),
            description: Some("demo app".to_string()),
            homepage: None,
            html_url: "https://github.com/alice/demo".to_string(),
            owner: RepositoryOwner {
                login: "alice".to_string(),
            },
            has_pages: false,
            default_branch: "main".to_string(),
        }
    }

    #[test]
    fn test_source_confidence_mapping() {
        assert_eq!(
            DeploymentSource::GithubHomepage.confidence(),
            ConfidenceLevel::High
        );
        assert_eq!(
            DeploymentSource::GithubPages.confidence(),
            ConfidenceLevel::High
        );
        assert_eq!(
            DeploymentSource::GithubEnvironments.confidence(),
            ConfidenceLevel::High
        );
        assert_eq!(
            DeploymentSource::ReadmeBadge.confidence(),
            ConfidenceLevel::Medium
        );
        assert_eq!(
            DeploymentSource::ReadmeLink.confidence(),
            ConfidenceLevel::Medium
        );
        assert_eq!(
            DeploymentSource::UrlInference.confidence(),
            ConfidenceLevel::Low
        );
    }

    #[test]
    fn test_source_priority_order() {
        assert!(DeploymentSource::GithubHomepage < DeploymentSource::GithubPages);
        assert!(DeploymentSource::GithubPages < DeploymentSource::GithubEnvironments);
        assert!(DeploymentSource::GithubEnvironments < DeploymentSource::ReadmeBadge);
        assert!(DeploymentSource::ReadmeBadge < DeploymentSource::ReadmeLink);
        assert!(DeploymentSource::ReadmeLink < DeploymentSource::UrlInference);
    }

    #[test]
    fn test_confidence_order() {
        assert!(ConfidenceLevel::High > ConfidenceLevel::Medium);
        assert!(ConfidenceLevel::Medium > ConfidenceLevel::Low);
    }

    #[test]
    fn test_result_accessors_pair_up() {
        let hit = DetectionResult::detected("https://x.example.com", DeploymentSource::GithubPages);
        assert_eq!(hit.url().is_some(), hit.source().is_some());
        assert_eq!(hit.confidence(), ConfidenceLevel::High);

        let miss = DetectionResult::NotFound;
        assert_eq!(miss.url().is_some(), miss.source().is_some());
        assert!(miss.url().is_none());
        assert_eq!(miss.confidence(), ConfidenceLevel::Low);
    }

    #[test]
    fn test_serialized_form() {
        let hit = DetectionResult::detected("https://x.example.com", DeploymentSource::ReadmeBadge);
        let json = serde_json::to_value(&hit).unwrap();
        assert_eq!(json["status"], "detected");
        assert_eq!(json["source"], "readme_badge");

        let miss = serde_json::to_value(DetectionResult::NotFound).unwrap();
        assert_eq!(miss["status"], "not_found");
    }

    #[test]
    fn test_detected_app_from_hit() {
        let result = DetectionResult::detected(
            "https://demo-alice.example.com",
            DeploymentSource::GithubHomepage,
        );
        let app = DetectedApp::from_detection(&descriptor(), &result).unwrap();

        assert_eq!(app.repo_full_name, "alice/demo");
        assert_eq!(app.repo_name, "demo");
        assert_eq!(app.url, "https://demo-alice.example.com");
        assert_eq!(app.source, DeploymentSource::GithubHomepage);
        assert_eq!(app.confidence, ConfidenceLevel::High);
        assert_eq!(
            app.thumbnail_url,
            "https://opengraph.githubassets.com/1/alice/demo"
        );
    }

    #[test]
    fn test_detected_app_from_miss() {
        assert!(DetectedApp::from_detection(&descriptor(), &DetectionResult::NotFound).is_none());
    }
}
