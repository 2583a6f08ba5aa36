//! Response fields read from the GitHub REST API.
//!
//! Everything else is forwarded to the frontend as opaque JSON.

use serde::{Deserialize, Serialize};

/// One entry of the Git Trees API (`recursive=1`).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TreeEntry {
    /// Slash-separated path from the repository root.
    pub path: String,

    /// `blob`, `tree` or `commit` (submodule).
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,

    /// Blob size in bytes; absent for trees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

impl TreeEntry {
    pub fn is_blob(&self) -> bool {
        self.kind == "blob"
    }

    pub fn is_tree(&self) -> bool {
        self.kind == "tree"
    }
}

/// Default branch plus its recursive tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepoTree {
    pub default_branch: String,
    pub tree: Vec<TreeEntry>,
}

/// A decoded file from the contents API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileBody {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub encoding: Option<String>,
    /// UTF-8 text when the payload was base64, the raw content otherwise.
    pub content: Option<String>,
}

/// Result of the contents API: a file, or a directory listing.
#[derive(Debug, Clone, PartialEq)]
pub enum FileContents {
    File(FileBody),
    Directory(Vec<serde_json::Value>),
}

#[derive(Deserialize)]
pub(crate) struct RawContents {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub encoding: Option<String>,
    pub content: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct BranchInfo {
    pub commit: Option<BranchCommit>,
}

#[derive(Deserialize)]
pub(crate) struct BranchCommit {
    pub commit: Option<CommitDetail>,
}

#[derive(Deserialize)]
pub(crate) struct CommitDetail {
    pub tree: Option<ShaRef>,
}

#[derive(Deserialize)]
pub(crate) struct ShaRef {
    pub sha: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct TreeResponse {
    #[serde(default)]
    pub tree: Vec<TreeEntry>,
}

#[derive(Deserialize)]
pub(crate) struct AccessTokenResponse {
    pub access_token: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_entry_deserialize() {
        let entry: TreeEntry = serde_json::from_value(serde_json::json!({
            "path": "src/main.rs",
            "mode": "100644",
            "type": "blob",
            "sha": "abc",
            "size": 42,
            "url": "https://api.github.com/..."
        }))
        .unwrap();
        assert!(entry.is_blob());
        assert_eq!(entry.size, Some(42));
    }

    #[test]
    fn test_branch_info_missing_tree() {
        let info: BranchInfo =
            serde_json::from_value(serde_json::json!({"name": "main", "commit": {}})).unwrap();
        let sha = info
            .commit
            .and_then(|c| c.commit)
            .and_then(|c| c.tree)
            .and_then(|t| t.sha);
        assert_eq!(sha, None);
    }
}
