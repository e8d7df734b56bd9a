//! Repository descriptors consumed by detection.
//!
//! These are read-only views of the GitHub REST repository payload, restricted
//! to the fields deployment detection actually looks at. They are deserialized
//! straight from API responses and never constructed by the detector itself.

use serde::{Deserialize, Serialize};

/// The owning user or organization of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryOwner {
    /// Owner login (user or organization name).
    pub login: String,
}

/// A snapshot of a GitHub repository's public metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    /// Repository name.
    pub name: String,

    /// Full repository name in "owner/name" format.
    pub full_name: String,

    /// Repository description, if any.
    #[serde(default)]
    pub description: Option<String>,

    /// Homepage URL configured on the repository, if any.
    ///
    /// GitHub returns an empty string for repositories where the field was
    /// set and later cleared; callers must not assume `Some` means usable.
    #[serde(default)]
    pub homepage: Option<String>,

    /// GitHub URL of the repository.
    pub html_url: String,

    /// Repository owner.
    pub owner: RepositoryOwner,

    /// Whether GitHub Pages is enabled for the repository.
    #[serde(default)]
    pub has_pages: bool,

    /// Default branch name (e.g., "main").
    #[serde(default = "default_branch")]
    pub default_branch: String,
}

fn default_branch() -> String {
    "main".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_from_api_payload() {
        let json = serde_json::json!({
            "name": "widget",
            "full_name": "acme/widget",
            "description": "A widget",
            "homepage": "https://widget.example.com",
            "html_url": "https://github.com/acme/widget",
            "owner": { "login": "acme" },
            "has_pages": true,
            "default_branch": "main",
            "stargazers_count": 42
        });

        let repo: RepositoryDescriptor = serde_json::from_value(json).unwrap();
        assert_eq!(repo.name, "widget");
        assert_eq!(repo.full_name, "acme/widget");
        assert_eq!(repo.owner.login, "acme");
        assert!(repo.has_pages);
        assert_eq!(repo.homepage.as_deref(), Some("https://widget.example.com"));
    }

    #[test]
    fn test_deserialize_nullable_fields() {
        let json = serde_json::json!({
            "name": "widget",
            "full_name": "acme/widget",
            "description": null,
            "homepage": null,
            "html_url": "https://github.com/acme/widget",
            "owner": { "login": "acme" }
        });

        let repo: RepositoryDescriptor = serde_json::from_value(json).unwrap();
        assert!(repo.description.is_none());
        assert!(repo.homepage.is_none());
        assert!(!repo.has_pages);
        assert_eq!(repo.default_branch, "main");
    }
}
