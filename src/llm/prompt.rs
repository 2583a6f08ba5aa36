//! Prompt builders.
//!
//! Each builder returns a `(system, user)` pair for
//! [`LLMProvider::send_prompt`](crate::llm::LLMProvider::send_prompt).

use crate::llm::CompletionOptions;

/// Limits for file and issue prompts.
pub const FILE_OPTIONS: CompletionOptions = CompletionOptions {
    max_tokens: Some(600),
    temperature: Some(0.3),
};

/// Limits for folder and repository prompts.
pub const FOLDER_OPTIONS: CompletionOptions = CompletionOptions {
    max_tokens: Some(300),
    temperature: Some(0.3),
};

const FILE_SYSTEM_PROMPT: &str = "You are helping a beginner understand a codebase. \
Provide clear, simple explanations that help new developers understand code purpose and functionality.";

const FOLDER_SYSTEM_PROMPT: &str = "You are helping a beginner understand a project structure. \
Provide clear, simple explanations that help new developers understand code organization.";

const ISSUE_SYSTEM_PROMPT: &str = "You are an expert software developer helping to analyze GitHub issues. \
Provide clear, actionable advice that helps developers understand and solve issues efficiently.";

/// File summary prompt: 5-7 beginner-friendly bullets.
pub fn build_file_prompt(file_name: &str, content: &str) -> (String, String) {
    let user = format!(
        r#"You are helping a beginner understand a codebase.

Task: Read the file below and produce 5-7 short, clear bullet points explaining what this file is used for.
Style rules:
- Use simple, friendly language a non-expert understands.
- Do not mention file extensions or technologies/framework names.
- Focus on purpose, inputs/outputs, and how it helps the app.
- Start each line with "- " and keep each bullet under 18 words.

File name: {file_name}
Code:
{content}"#
    );
    (FILE_SYSTEM_PROMPT.to_string(), user)
}

/// Folder summary prompt: 4-6 bullets from the child names.
pub fn build_folder_prompt(folder_name: &str, repo_name: &str, items: &[String]) -> (String, String) {
    let user = format!(
        r#"You are helping a beginner understand a project structure.

Task: Explain why this folder exists and what it contains using 4-6 simple bullet points.
Style rules:
- Use friendly, plain language.
- Do not mention file extensions or technology/framework names.
- Start each line with "- " and keep each bullet under 18 words.

Folder: {folder_name}
Repository: {repo_name}
Items: {}"#,
        items.join(", ")
    );
    (FOLDER_SYSTEM_PROMPT.to_string(), user)
}

/// Issue analysis prompt; the model answers with a JSON object.
pub fn build_issue_prompt(
    issue_number: &str,
    issue_title: &str,
    issue_body: Option<&str>,
    repo_full_name: &str,
) -> (String, String) {
    let description = issue_body
        .filter(|b| !b.trim().is_empty())
        .unwrap_or("No description provided");
    let user = format!(
        r#"Analyze this GitHub issue and provide a solution guide.

ISSUE: #{issue_number} - {issue_title}
DESCRIPTION: {description}
REPO: {repo_full_name}

Provide analysis in this JSON format:
{{
  "issueSummary": "What this issue is about and what needs to be done",
  "affectedFiles": ["Files that need changes"],
  "solutionSteps": ["Step 1", "Step 2", "Step 3"],
  "codeChanges": "Specific code changes needed",
  "suggestedComment": "Comment to add when starting work",
  "branchName": "descriptive-branch-name",
  "difficulty": "easy|medium|hard",
  "estimatedTime": "time estimate",
  "gitCommands": [
    "git checkout -b [BRANCH_NAME]",
    "git add .",
    "git commit -m \"[COMMIT_MESSAGE]\"",
    "git push origin [BRANCH_NAME]"
  ],
  "commitMessage": "Descriptive commit message"
}}

Be specific and actionable based on the issue content."#
    );
    (ISSUE_SYSTEM_PROMPT.to_string(), user)
}

/// Repository overview prompt: 4-6 bullets from structure statistics.
pub fn build_repo_prompt(
    full_name: &str,
    description: Option<&str>,
    main_folders: &[String],
    technologies: &[String],
    total_files: usize,
) -> (String, String) {
    let user = format!(
        r#"You are helping a beginner understand a project.

Task: Explain what this repository is for and how it is organized using 4-6 simple bullet points.
Style rules:
- Use friendly, plain language.
- Start each line with "- " and keep each bullet under 18 words.

Repository: {full_name}
Description: {}
Top-level folders: {}
Technologies: {}
Total files: {total_files}"#,
        description.unwrap_or("No description provided"),
        if main_folders.is_empty() {
            "none".to_string()
        } else {
            main_folders.join(", ")
        },
        if technologies.is_empty() {
            "unknown".to_string()
        } else {
            technologies.join(", ")
        },
    );
    (FOLDER_SYSTEM_PROMPT.to_string(), user)
}
