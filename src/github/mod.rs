//! GitHub REST API access.
//!
//! - [`client`] - the `GitHubClient` wrapper over the REST and OAuth endpoints
//! - [`types`] - the few response fields the backend reads
//! - repository name normalisation (`owner/repo`)

pub mod client;
pub mod types;

pub use client::GitHubClient;
pub use types::{FileContents, RepoTree, TreeEntry};

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{OpenHubError, Result};

static GITHUB_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://github\.com/").expect("valid GitHub prefix regex")
});

static GIT_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.git$").expect("valid .git suffix regex"));

/// Normalises user input into `owner/repo` form.
///
/// Strips a `http(s)://github.com/` prefix, then a `.git` suffix, then
/// trailing slashes.
///
/// # Example
/// ```
/// use openhub::github::normalize_repo_full_name;
///
/// assert_eq!(normalize_repo_full_name(" https://github.com/octo/hub.git "), "octo/hub");
/// assert_eq!(normalize_repo_full_name("octo/hub///"), "octo/hub");
/// ```
pub fn normalize_repo_full_name(input: &str) -> String {
    let trimmed = input.trim();
    let without_prefix = GITHUB_PREFIX.replace(trimmed, "");
    let without_suffix = GIT_SUFFIX.replace(&without_prefix, "");
    without_suffix.trim_end_matches('/').to_string()
}

/// A parsed `owner/repo` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    /// Normalises `input` and splits it into owner and repository.
    pub fn parse(input: &str) -> Result<Self> {
        let normalized = normalize_repo_full_name(input);
        let mut parts = normalized.split('/');
        let owner = parts.next().unwrap_or_default();
        let repo = parts.next().unwrap_or_default();

        if owner.is_empty() || repo.is_empty() {
            return Err(OpenHubError::InvalidInput(format!(
                "'{}' is not in owner/repo form",
                input.trim()
            )));
        }

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    /// `owner/repo`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_strips_protocol_suffix_and_slashes() {
        let cases = [
            ("octo/hub", "octo/hub"),
            ("https://github.com/octo/hub", "octo/hub"),
            ("http://github.com/octo/hub", "octo/hub"),
            ("HTTPS://GitHub.com/octo/hub", "octo/hub"),
            ("octo/hub.git", "octo/hub"),
            ("octo/hub.GIT", "octo/hub"),
            ("octo/hub/", "octo/hub"),
            ("  https://github.com/octo/hub.git  ", "octo/hub"),
        ];
        for (input, expected) in cases {
            assert_eq!(normalize_repo_full_name(input), expected, "input: {input}");
        }
    }

    #[test]
    fn test_normalize_strips_git_before_slashes() {
        // `.git` is removed first, so a trailing slash after it survives that step
        assert_eq!(normalize_repo_full_name("octo/hub.git/"), "octo/hub.git");
    }

    #[test]
    fn test_repo_ref_parse() {
        let repo = RepoRef::parse("https://github.com/octo/hub.git").unwrap();
        assert_eq!(repo.owner, "octo");
        assert_eq!(repo.repo, "hub");
        assert_eq!(repo.full_name(), "octo/hub");
        assert_eq!(repo.to_string(), "octo/hub");
    }

    #[test]
    fn test_repo_ref_parse_invalid() {
        assert!(RepoRef::parse("octo").is_err());
        assert!(RepoRef::parse("/hub").is_err());
        assert!(RepoRef::parse("octo/").is_err());
        assert!(RepoRef::parse("").is_err());
    }

    #[test]
    fn test_repo_ref_parse_ignores_extra_segments() {
        let repo = RepoRef::parse("octo/hub/tree/main").unwrap();
        assert_eq!(repo.full_name(), "octo/hub");
    }
}
