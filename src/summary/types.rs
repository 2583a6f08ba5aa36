//! Request and response shapes of the summary endpoints.
//!
//! Field names follow the frontend's camelCase JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A child entry of a folder summary request. Only the name is read.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChildItem {
    #[serde(default)]
    pub name: String,
}

/// Body of `POST /api/github/ai-summary`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    /// `file` or `folder`.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub repo_name: Option<String>,
    #[serde(default)]
    pub children: Option<Vec<ChildItem>>,
}

impl SummaryRequest {
    /// Last `/` segment of the path.
    pub fn item_name(&self) -> &str {
        let path = self.path.as_deref().unwrap_or_default();
        path.rsplit('/').next().unwrap_or(path)
    }
}

/// Body of `POST /api/github/analyze-issue`.
///
/// `issueNumber` is accepted as a JSON number or string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRequest {
    #[serde(default)]
    pub issue_number: Option<Value>,
    #[serde(default)]
    pub repo_full_name: Option<String>,
    #[serde(default)]
    pub issue_title: Option<String>,
    #[serde(default)]
    pub issue_body: Option<String>,
}

/// Renders a JSON scalar as it would appear in text; `None` for null,
/// empty strings, `false` and `0`.
pub fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// Issue solution guide returned to the frontend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueAnalysis {
    pub issue_summary: String,
    pub affected_files: Vec<String>,
    pub solution_steps: Vec<String>,
    pub code_changes: String,
    pub suggested_comment: String,
    pub branch_name: String,
    pub difficulty: String,
    pub estimated_time: String,
    pub git_commands: Vec<String>,
    pub commit_message: String,
}

/// The same fields as parsed from a model answer; any may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PartialIssueAnalysis {
    pub issue_summary: Option<String>,
    pub affected_files: Option<Vec<String>>,
    pub solution_steps: Option<Vec<String>>,
    pub code_changes: Option<String>,
    pub suggested_comment: Option<String>,
    pub branch_name: Option<String>,
    pub difficulty: Option<String>,
    pub estimated_time: Option<String>,
    pub git_commands: Option<Vec<String>>,
    pub commit_message: Option<String>,
}

/// Extension frequency entry of a [`RepoStructure`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileTypeCount {
    pub extension: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    /// `high` above 100 files, `medium` above 50.
    pub fn from_file_count(files: usize) -> Self {
        if files > 100 {
            Complexity::High
        } else if files > 50 {
            Complexity::Medium
        } else {
            Complexity::Low
        }
    }
}

/// Shape statistics of a repository tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoStructure {
    pub total_files: usize,
    pub total_folders: usize,
    /// Up to 10 extensions, most frequent first.
    pub file_types: Vec<FileTypeCount>,
    /// Top-level folders, sorted by name.
    pub main_folders: Vec<String>,
    pub complexity: Complexity,
}
