//! URL and README extraction heuristics.
//!
//! Pure string/regex helpers used by the deployment detector: GitHub Pages
//! URL construction, repository name normalization, hosting-platform URL
//! inference, and README badge/link extraction. These are best-effort by
//! nature; extracted candidates are always validated for reachability before
//! being reported.

use regex::Regex;
use url::Url;

/// Words that mark a README link as pointing at a live deployment.
///
/// Includes the Korean equivalents for "deployment" and "demo", which are
/// common in the wild.
const DEMO_KEYWORDS: &str = "demo|live|website|site|deployed|배포|데모";

/// Returns true if `candidate` parses as an absolute `http` or `https` URL.
#[must_use]
pub fn is_http_url(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Constructs the GitHub Pages URL for a repository.
///
/// The user/organization root repository (`{owner}.github.io`) is served at
/// the domain root; every other repository is served under its name. Pages
/// hostnames and paths are lowercase regardless of how the repository is
/// spelled.
#[must_use]
pub fn pages_url(owner: &str, name: &str) -> String {
    let owner = owner.to_lowercase();
    let name = name.to_lowercase();

    if name == format!("{owner}.github.io") {
        format!("https://{owner}.github.io")
    } else {
        format!("https://{owner}.github.io/{name}")
    }
}

/// Normalizes a repository name into a hosting-platform subdomain label.
///
/// Platforms like Vercel and Netlify derive project slugs by lowercasing and
/// replacing `_` and `.` with `-`.
#[must_use]
pub fn normalize_repo_name(name: &str) -> String {
    name.to_lowercase().replace(['_', '.'], "-")
}

/// Produces candidate deployment URLs inferred from the repository name.
///
/// Candidates are ordered by how commonly each platform's default domain
/// scheme shows up for hobby deployments; the caller probes them in order and
/// keeps the first reachable one.
#[must_use]
pub fn candidate_urls(owner: &str, name: &str) -> Vec<String> {
    let name = normalize_repo_name(name);
    let owner = owner.to_lowercase();

    vec![
        format!("https://{name}.vercel.app"),
        format!("https://{name}-{owner}.vercel.app"),
        format!("https://{name}.netlify.app"),
        format!("https://{name}.pages.dev"),
    ]
}

/// Extracts a deployment URL from a hosting-platform status badge.
///
/// Matches the markdown image-link shape `[![alt](badge-image)](target)`
/// where the badge image is served by Vercel or Netlify and the outer link is
/// an `https://` URL. Vercel is checked first; the first match wins.
#[must_use]
pub fn extract_badge_url(readme: &str) -> Option<String> {
    for platform in ["vercel", "netlify"] {
        let pattern = format!(r"(?i)\[!\[.*?\]\(.*?{platform}.*?\)\]\((https://[^\s)]+)\)");
        let re = Regex::new(&pattern).expect("valid regex");
        if let Some(captures) = re.captures(readme) {
            return Some(captures[1].to_string());
        }
    }
    None
}

/// Extracts a demo/live link from README text.
///
/// Tries three shapes in order and stops at the first one that matches
/// anywhere in the text:
///
/// 1. a URL on the same line as a deployment keyword ("demo", "live", ...);
/// 2. a markdown link whose label contains a deployment keyword (plus
///    "visit"/"view");
/// 3. a bare URL introduced by a link-ish emoji (🔗, 🌐, 🚀).
///
/// The first `http(s)://` URL inside the matched fragment is returned.
#[must_use]
pub fn extract_demo_link(readme: &str) -> Option<String> {
    let patterns = [
        format!(r"(?i)(?:{DEMO_KEYWORDS})[^\n]*?https?://[^\s)\]]+"),
        format!(r"(?i)\[[^\]]*(?:{DEMO_KEYWORDS}|visit|view)[^\]]*\]\(\s*(?:https?://[^\s)]+)\s*\)"),
        r"(?:🔗|🌐|🚀)\s*(?:https?://[^\s)\]]+)".to_string(),
    ];

    for pattern in &patterns {
        let re = Regex::new(pattern).expect("valid regex");
        if let Some(found) = re.find(readme) {
            return first_url_in(found.as_str());
        }
    }
    None
}

/// Pulls the first `http(s)://` URL out of a text fragment.
fn first_url_in(fragment: &str) -> Option<String> {
    let re = Regex::new(r"https?://[^\s)\]]+").expect("valid regex");
    re.find(fragment).map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_http_url() {
        assert!(is_http_url("https://example.com"));
        assert!(is_http_url("http://example.com/path?q=1"));
        assert!(!is_http_url("ftp://example.com"));
        assert!(!is_http_url("example.com"));
        assert!(!is_http_url(""));
        assert!(!is_http_url("not a url"));
    }

    #[test]
    fn test_pages_url_regular_repo() {
        assert_eq!(pages_url("acme", "widget"), "https://acme.github.io/widget");
    }

    #[test]
    fn test_pages_url_root_repo() {
        assert_eq!(pages_url("acme", "acme.github.io"), "https://acme.github.io");
    }

    #[test]
    fn test_pages_url_lowercases() {
        assert_eq!(
            pages_url("Acme", "MyWidget"),
            "https://acme.github.io/mywidget"
        );
        assert_eq!(pages_url("Acme", "Acme.github.io"), "https://acme.github.io");
    }

    #[test]
    fn test_normalize_repo_name() {
        assert_eq!(normalize_repo_name("my_project.v2"), "my-project-v2");
        assert_eq!(normalize_repo_name("Widget"), "widget");
        assert_eq!(normalize_repo_name("plain"), "plain");
    }

    #[test]
    fn test_candidate_urls_order() {
        let candidates = candidate_urls("Acme", "my_project.v2");
        assert_eq!(
            candidates,
            vec![
                "https://my-project-v2.vercel.app",
                "https://my-project-v2-acme.vercel.app",
                "https://my-project-v2.netlify.app",
                "https://my-project-v2.pages.dev",
            ]
        );
    }

    #[test]
    fn test_extract_badge_url_vercel() {
        let readme = "# App\n[![Deployed on Vercel](https://img.shields.io/badge/vercel-up)](https://app.vercel.app)\n";
        assert_eq!(
            extract_badge_url(readme).as_deref(),
            Some("https://app.vercel.app")
        );
    }

    #[test]
    fn test_extract_badge_url_netlify() {
        let readme =
            "[![Netlify Status](https://api.netlify.com/api/v1/badges/abc/deploy-status)](https://app.netlify.app)";
        assert_eq!(
            extract_badge_url(readme).as_deref(),
            Some("https://app.netlify.app")
        );
    }

    #[test]
    fn test_extract_badge_url_prefers_vercel() {
        let readme = "\
[![Netlify Status](https://api.netlify.com/api/v1/badges/abc/deploy-status)](https://on-netlify.example.com)
[![Vercel](https://vercelbadge.vercel.app/api/acme/widget)](https://on-vercel.example.com)";
        assert_eq!(
            extract_badge_url(readme).as_deref(),
            Some("https://on-vercel.example.com")
        );
    }

    #[test]
    fn test_extract_badge_url_ignores_plain_links() {
        let readme = "Check out [vercel](https://vercel.com) for hosting.";
        assert_eq!(extract_badge_url(readme), None);
    }

    #[test]
    fn test_extract_demo_link_keyword_prefix() {
        let readme = "## Links\nLive demo: https://demo.example.com\n";
        assert_eq!(
            extract_demo_link(readme).as_deref(),
            Some("https://demo.example.com")
        );
    }

    #[test]
    fn test_extract_demo_link_markdown_label() {
        let readme = "See the [Visit the app](https://app.example.com) page.";
        assert_eq!(
            extract_demo_link(readme).as_deref(),
            Some("https://app.example.com")
        );
    }

    #[test]
    fn test_extract_demo_link_korean_keyword() {
        let readme = "배포 주소: https://kr.example.com 입니다";
        assert_eq!(
            extract_demo_link(readme).as_deref(),
            Some("https://kr.example.com")
        );
    }

    #[test]
    fn test_extract_demo_link_emoji() {
        let readme = "🔗 https://emoji.example.com";
        assert_eq!(
            extract_demo_link(readme).as_deref(),
            Some("https://emoji.example.com")
        );
    }

    #[test]
    fn test_extract_demo_link_none() {
        let readme = "# Project\nJust a library, no deployment here.";
        assert_eq!(extract_demo_link(readme), None);
    }

    #[test]
    fn test_extract_demo_link_pattern_order() {
        // Keyword-on-line matches before the emoji shape further up the text
        // would; the first matching pattern supplies the URL.
        let readme = "🚀 https://emoji.example.com\nDemo at https://keyword.example.com";
        assert_eq!(
            extract_demo_link(readme).as_deref(),
            Some("https://keyword.example.com")
        );
    }
}
