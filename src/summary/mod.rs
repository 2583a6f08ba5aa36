//! AI summaries with a heuristic fallback.
//!
//! [`SummaryService`] asks the configured LLM first. Any LLM failure, an
//! unusably short answer, or no provider at all drops through to the
//! [`heuristics`] so the endpoints always have something to show.

pub mod heuristics;
pub mod types;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::github::TreeEntry;
use crate::llm::provider::base::parse_json_response;
use crate::llm::{LLMProvider, prompt};
use types::{IssueAnalysis, PartialIssueAnalysis, RepoStructure, SummaryRequest};

pub use types::{ChildItem, Complexity, FileTypeCount, IssueRequest};

/// AI answers shorter than this (after trimming) count as failures.
const MIN_ANSWER_LEN: usize = 10;

/// Summary generation shared by the GitHub handlers.
#[derive(Clone, Default)]
pub struct SummaryService {
    provider: Option<Arc<dyn LLMProvider>>,
}

impl SummaryService {
    pub fn new(provider: Option<Arc<dyn LLMProvider>>) -> Self {
        Self { provider }
    }

    /// Builds the configured provider chain; heuristics only when no
    /// provider can be built (usually: no API key).
    pub fn from_config(config: &AppConfig) -> Self {
        match crate::llm::provider::create_provider(config) {
            Ok(provider) => {
                debug!("LLM provider '{}' enabled", provider.name());
                Self::new(Some(provider))
            }
            Err(e) => {
                warn!("AI summaries disabled, using heuristics only: {}", e);
                Self::new(None)
            }
        }
    }

    /// Whether an LLM provider is configured.
    pub fn ai_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Sends a prompt and returns the trimmed answer, or `None` on any
    /// failure.
    async fn ask(
        &self,
        label: &str,
        (system, user): (String, String),
        options: &crate::llm::CompletionOptions,
        min_len: usize,
    ) -> Option<String> {
        let provider = self.provider.as_ref()?;
        match provider.send_prompt(&system, &user, options).await {
            Ok(answer) => {
                let answer = answer.trim();
                debug!("{} answer ({} chars)", label, answer.len());
                if answer.chars().count() < min_len {
                    warn!("{} answer too short, using heuristics", label);
                    None
                } else {
                    Some(answer.to_string())
                }
            }
            Err(e) => {
                warn!("{} via '{}' failed, using heuristics: {}", label, provider.name(), e);
                None
            }
        }
    }

    /// Summary text for an `ai-summary` request.
    ///
    /// Callers validate `type`, `path` and `repoName` first. An unknown
    /// `type` yields an empty summary.
    pub async fn summarize(&self, request: &SummaryRequest) -> String {
        let name = request.item_name();
        match request.kind.as_deref() {
            Some("file") => {
                let content = request.content.as_deref().unwrap_or_default();
                if content.is_empty() {
                    return heuristics::empty_file_summary();
                }
                let messages = prompt::build_file_prompt(name, content);
                match self
                    .ask("File summary", messages, &prompt::FILE_OPTIONS, MIN_ANSWER_LEN)
                    .await
                {
                    Some(answer) => answer,
                    None => heuristics::file_bullets(name, content),
                }
            }
            Some("folder") => {
                let child_names: Vec<String> = request
                    .children
                    .iter()
                    .flatten()
                    .map(|c| c.name.clone())
                    .collect();
                if child_names.is_empty() {
                    return heuristics::empty_folder_summary();
                }
                let repo_name = request.repo_name.as_deref().unwrap_or_default();
                let messages = prompt::build_folder_prompt(name, repo_name, &child_names);
                let summary = match self
                    .ask("Folder summary", messages, &prompt::FOLDER_OPTIONS, 1)
                    .await
                {
                    Some(answer) => answer,
                    None => heuristics::folder_bullets(name, &child_names),
                };
                summary + &heuristics::folder_listing(&child_names)
            }
            other => {
                debug!("Unknown summary type {:?}, returning empty summary", other);
                String::new()
            }
        }
    }

    /// Runs [`summarize`](Self::summarize) on its own task so a panic deep
    /// in a provider still yields the last-resort summary.
    pub async fn summarize_or_fallback(&self, request: SummaryRequest) -> String {
        let service = self.clone();
        let is_file = request.kind.as_deref() == Some("file");
        let name = request.item_name().to_string();

        match tokio::spawn(async move { service.summarize(&request).await }).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::error!("Summary task failed, using last-resort summary: {}", e);
                if is_file {
                    heuristics::last_resort_file_summary(&name)
                } else {
                    heuristics::last_resort_folder_summary(&name)
                }
            }
        }
    }

    /// Solution guide for an issue. Never fails: unparseable answers and
    /// LLM errors both produce a fallback analysis.
    pub async fn analyze_issue(
        &self,
        issue_number: &str,
        title: &str,
        body: Option<&str>,
        repo_full_name: &str,
    ) -> IssueAnalysis {
        let messages = prompt::build_issue_prompt(issue_number, title, body, repo_full_name);

        let partial = match self
            .ask("Issue analysis", messages, &prompt::FILE_OPTIONS, 1)
            .await
        {
            Some(answer) => match parse_json_response::<PartialIssueAnalysis>(&answer) {
                Ok(partial) => partial,
                Err(e) => {
                    warn!("Issue analysis JSON unusable, using structured fallback: {}", e);
                    return heuristics::structured_issue_fallback(issue_number, title, &answer);
                }
            },
            None => return heuristics::generic_issue_fallback(issue_number, title),
        };

        fill_issue_defaults(issue_number, title, partial)
    }

    /// Overview bullets for a repository.
    pub async fn summarize_repo(
        &self,
        full_name: &str,
        description: Option<&str>,
        structure: &RepoStructure,
        technologies: &[String],
    ) -> String {
        let messages = prompt::build_repo_prompt(
            full_name,
            description,
            &structure.main_folders,
            technologies,
            structure.total_files,
        );
        match self
            .ask("Repository summary", messages, &prompt::FOLDER_OPTIONS, MIN_ANSWER_LEN)
            .await
        {
            Some(answer) => answer,
            None => heuristics::repo_bullets(description, structure, technologies),
        }
    }
}

/// Tree statistics and detected technologies for `analyze-repo`.
pub fn analyze_tree(entries: &[TreeEntry]) -> (RepoStructure, Vec<String>) {
    (
        heuristics::analyze_structure(entries),
        heuristics::collect_technologies(entries),
    )
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Fills missing or empty fields of a parsed model answer.
fn fill_issue_defaults(
    issue_number: &str,
    title: &str,
    partial: PartialIssueAnalysis,
) -> IssueAnalysis {
    let branch_name =
        non_empty(partial.branch_name).unwrap_or_else(|| heuristics::default_branch_name(issue_number));
    let commit_message = non_empty(partial.commit_message)
        .unwrap_or_else(|| heuristics::default_commit_message(issue_number, title));
    let git_commands = partial
        .git_commands
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| {
            heuristics::git_commands(
                &branch_name,
                &heuristics::default_commit_message(issue_number, title),
            )
        });

    IssueAnalysis {
        issue_summary: non_empty(partial.issue_summary)
            .unwrap_or_else(|| format!("Issue #{}: {}", issue_number, title)),
        affected_files: partial.affected_files.unwrap_or_default(),
        solution_steps: partial.solution_steps.unwrap_or_default(),
        code_changes: non_empty(partial.code_changes)
            .unwrap_or_else(|| "Implement the fix based on the issue requirements".to_string()),
        suggested_comment: non_empty(partial.suggested_comment)
            .unwrap_or_else(|| "I'll work on this issue.".to_string()),
        branch_name,
        difficulty: non_empty(partial.difficulty).unwrap_or_else(|| "medium".to_string()),
        estimated_time: non_empty(partial.estimated_time)
            .unwrap_or_else(|| "2-4 hours".to_string()),
        git_commands,
        commit_message,
    }
}
