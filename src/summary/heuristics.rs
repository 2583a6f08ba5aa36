//! Rule-based summaries used whenever the LLM is unavailable.
//!
//! Every bullet starts with `- `. File summaries have 5-7 lines, folder
//! and repository summaries 4-6.

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use regex::Regex;

use super::types::{Complexity, FileTypeCount, IssueAnalysis, RepoStructure};
use crate::github::TreeEntry;
use crate::techdetect::detect_technologies;

const FILE_MIN_BULLETS: usize = 5;
const FILE_MAX_BULLETS: usize = 7;
const FOLDER_MIN_BULLETS: usize = 4;
const FOLDER_MAX_BULLETS: usize = 6;

/// Names listed after a folder summary before the `... and N more` tail.
pub const FOLDER_LISTING_LIMIT: usize = 15;

const FILE_FILLER: &str = "- Supports this feature with clear, reusable code";
const FOLDER_FILLER: &str = "- Explains this feature area and keeps it organized";
const REPO_FILLER: &str = "- Start with the README to learn how to run it";

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid heuristic regex")
}

/// Content rules for files, checked against the lower-cased source.
static FILE_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        (
            regex(r"get|post|put|delete|fetch|request|response|router|route|api"),
            "- Handles incoming requests and prepares helpful responses",
        ),
        (
            regex(r"auth|login|signup|token|session|password"),
            "- Checks who is signed in and what they can do",
        ),
        (
            regex(r"model|schema|db|database|query|insert|update|delete|select"),
            "- Reads and writes data used by the app",
        ),
        (
            regex(r"config|settings|env|environment|process\.env"),
            "- Keeps app settings like keys and service URLs",
        ),
        (
            regex(r"style|styles|color|spacing|font|layout"),
            "- Controls the look and layout of screens",
        ),
        (
            regex(r"render|view|ui|component|page|title|button|input"),
            "- Shows part of the interface and reacts to user actions",
        ),
    ]
});

/// Child-name rules for folders, case-insensitive.
static FOLDER_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        (regex(r"(?i)page|screen|view"), "- Holds full screens users can open"),
        (
            regex(r"(?i)service|client|api"),
            "- Keeps helpers for talking to other services",
        ),
        (
            regex(r"(?i)controller"),
            "- Stores functions that process requests and responses",
        ),
        (regex(r"(?i)model|schema"), "- Defines how important data is shaped"),
        (
            regex(r"(?i)route|router"),
            "- Lists paths this part of the app responds to",
        ),
        (
            regex(r"(?i)middleware|auth|validation"),
            "- Adds checks like access and input validation",
        ),
        (
            regex(r"(?i)style|styles|css|scss"),
            "- Keeps files that control look and layout",
        ),
        (regex(r"(?i)config|env"), "- Stores settings and environment values"),
        (
            regex(r"(?i)public|static|assets"),
            "- Holds images and other public assets",
        ),
        (
            regex(r"(?i)test|spec|__tests__"),
            "- Contains checks to make sure features work",
        ),
    ]
});

fn clamp_bullets(mut bullets: Vec<String>, min: usize, max: usize, filler: &str) -> String {
    bullets.truncate(max);
    while bullets.len() < min {
        bullets.push(filler.to_string());
    }
    bullets.join("\n")
}

fn owned(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| s.to_string()).collect()
}

/// Bullets for a file with content.
///
/// # Example
/// ```
/// use openhub::summary::heuristics::file_bullets;
///
/// let summary = file_bullets("auth.js", "router.post('/login', handler)");
/// assert!(summary.starts_with("- Handles incoming requests"));
/// assert!(summary.lines().all(|l| l.starts_with("- ")));
/// ```
pub fn file_bullets(file_name: &str, content: &str) -> String {
    let bullets = if file_name == "package.json" {
        owned(&[
            "- Lists tools and libraries used by this project",
            "- Defines commands to run and build the app",
            "- Stores project name and basic info",
            "- Helps others install everything with one command",
        ])
    } else {
        let lower = content.to_lowercase();
        let mut bullets: Vec<String> = FILE_RULES
            .iter()
            .filter(|(re, _)| re.is_match(&lower))
            .map(|(_, bullet)| bullet.to_string())
            .collect();
        bullets.push("- Connects this part with the rest of the app".to_string());
        bullets.push("- Organizes logic so the feature is easy to update".to_string());
        bullets
    };

    clamp_bullets(bullets, FILE_MIN_BULLETS, FILE_MAX_BULLETS, FILE_FILLER)
}

/// Summary for a file that is empty or could not be read.
pub fn empty_file_summary() -> String {
    [
        "- This file is part of the project structure",
        "- It looks empty or could not be read",
        "- Kept to organize the project correctly",
        "- Safe to ignore unless you are editing this area",
    ]
    .join("\n")
}

/// Bullets for a folder from its child names.
pub fn folder_bullets(folder_name: &str, child_names: &[String]) -> String {
    let mut bullets = match folder_name.to_lowercase().as_str() {
        "frontend" => owned(&[
            "- Holds everything users see and click",
            "- Contains screens and small reusable pieces",
            "- Manages navigation and page layout",
            "- Includes styles and shared helpers",
        ]),
        "backend" => owned(&[
            "- Handles app logic on the server side",
            "- Receives requests and returns useful data",
            "- Connects to storage and other services",
            "- Includes routes, controllers, and helpers",
        ]),
        _ => owned(&["- Groups files for one clear area of the app"]),
    };

    for (re, bullet) in FOLDER_RULES.iter() {
        if child_names.iter().any(|name| re.is_match(name)) {
            bullets.push(bullet.to_string());
        }
    }

    clamp_bullets(bullets, FOLDER_MIN_BULLETS, FOLDER_MAX_BULLETS, FOLDER_FILLER)
}

/// Summary for a folder with no listed children.
pub fn empty_folder_summary() -> String {
    [
        "- This folder organizes related files in one place",
        "- Helps keep features tidy and easy to find",
        "- May be empty now or contain hidden files",
        "- Used to structure the project clearly",
    ]
    .join("\n")
}

/// The child listing appended to every folder summary with children.
pub fn folder_listing(child_names: &[String]) -> String {
    let shown = child_names
        .iter()
        .take(FOLDER_LISTING_LIMIT)
        .map(|name| format!("• {}", name))
        .collect::<Vec<_>>()
        .join("\n");
    let mut listing = format!("\n\nFiles and subfolders in this directory:\n{}", shown);
    if child_names.len() > FOLDER_LISTING_LIMIT {
        listing.push_str(&format!(
            "\n... and {} more items",
            child_names.len() - FOLDER_LISTING_LIMIT
        ));
    }
    listing
}

/// Last-resort file summary when summarising failed unexpectedly.
pub fn last_resort_file_summary(file_name: &str) -> String {
    [
        format!("- {} helps this part of the app work", file_name),
        "- Explains behavior and handles a small set of tasks".to_string(),
        "- Connects with nearby files to complete the feature".to_string(),
        "- Safe to read to understand how this area behaves".to_string(),
    ]
    .join("\n")
}

/// Last-resort folder summary when summarising failed unexpectedly.
pub fn last_resort_folder_summary(folder_name: &str) -> String {
    [
        format!("- {} groups related files together", folder_name),
        "- Makes this feature easier to find and update".to_string(),
        "- Use it to keep work for this area in one place".to_string(),
    ]
    .join("\n")
}

// === Issue analysis ===

/// `fix: resolve issue #N - <title>`
pub fn default_commit_message(issue_number: &str, title: &str) -> String {
    format!("fix: resolve issue #{} - {}", issue_number, title)
}

/// `fix-issue-N`
pub fn default_branch_name(issue_number: &str) -> String {
    format!("fix-issue-{}", issue_number)
}

/// Git commands for working on `branch`.
pub fn git_commands(branch: &str, commit_message: &str) -> Vec<String> {
    vec![
        format!("git checkout -b {}", branch),
        "git add .".to_string(),
        format!("git commit -m \"{}\"", commit_message),
        format!("git push origin {}", branch),
    ]
}

fn issue_template(
    issue_number: &str,
    title: &str,
    issue_summary: String,
    solution_steps: &[&str],
    code_changes: &str,
    suggested_comment: &str,
) -> IssueAnalysis {
    let branch_name = default_branch_name(issue_number);
    let commit_message = default_commit_message(issue_number, title);
    IssueAnalysis {
        issue_summary,
        affected_files: Vec::new(),
        solution_steps: owned(solution_steps),
        code_changes: code_changes.to_string(),
        suggested_comment: suggested_comment.to_string(),
        git_commands: git_commands(&branch_name, &commit_message),
        branch_name,
        difficulty: "medium".to_string(),
        estimated_time: "2-4 hours".to_string(),
        commit_message,
    }
}

/// Analysis used when the model answered but not with parseable JSON.
///
/// The summary keeps the first 200 characters of the answer.
pub fn structured_issue_fallback(issue_number: &str, title: &str, ai_text: &str) -> IssueAnalysis {
    let preview: String = ai_text.chars().take(200).collect();
    issue_template(
        issue_number,
        title,
        format!("{}...", preview),
        &[
            "Analyze the issue description",
            "Identify affected files",
            "Implement the fix",
            "Test the changes",
        ],
        "Review the issue and implement necessary changes based on the description",
        "I'll work on this issue. Let me analyze the codebase and implement a solution.",
    )
}

/// Analysis used when the model could not be reached at all.
pub fn generic_issue_fallback(issue_number: &str, title: &str) -> IssueAnalysis {
    issue_template(
        issue_number,
        title,
        format!("Issue #{}: {}", issue_number, title),
        &[
            "Read and understand the issue description",
            "Identify which files are affected",
            "Make the necessary code changes",
            "Test your changes locally",
            "Create a pull request",
        ],
        "Implement the fix based on the issue requirements",
        "I'll take a look at this issue and work on a solution.",
    )
}

// === Repository analysis ===

/// Counts files, folders, extensions and top-level folders of a tree.
pub fn analyze_structure(entries: &[TreeEntry]) -> RepoStructure {
    let mut total_files = 0;
    let mut folders: BTreeSet<&str> = BTreeSet::new();
    let mut main_folders: BTreeSet<&str> = BTreeSet::new();
    let mut extensions: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        let path = entry.path.as_str();
        // every parent directory counts, listed or not
        for (i, _) in path.match_indices('/') {
            folders.insert(&path[..i]);
        }
        if let Some((top, _)) = path.split_once('/') {
            main_folders.insert(top);
        }

        if entry.is_tree() {
            folders.insert(path);
            if !path.contains('/') {
                main_folders.insert(path);
            }
        } else if entry.is_blob() {
            total_files += 1;
            let name = path.rsplit('/').next().unwrap_or(path);
            if let Some((stem, ext)) = name.rsplit_once('.')
                && !stem.is_empty()
                && !ext.is_empty()
            {
                *extensions.entry(ext.to_lowercase()).or_default() += 1;
            }
        }
    }

    let mut file_types: Vec<FileTypeCount> = extensions
        .into_iter()
        .map(|(extension, count)| FileTypeCount { extension, count })
        .collect();
    file_types.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.extension.cmp(&b.extension)));
    file_types.truncate(10);

    RepoStructure {
        total_files,
        total_folders: folders.len(),
        file_types,
        main_folders: main_folders.into_iter().map(str::to_string).collect(),
        complexity: Complexity::from_file_count(total_files),
    }
}

/// Detected technologies across all blobs, in first-seen order.
pub fn collect_technologies(entries: &[TreeEntry]) -> Vec<String> {
    let mut technologies: Vec<String> = Vec::new();
    for entry in entries.iter().filter(|e| e.is_blob()) {
        for tech in detect_technologies(&entry.path) {
            if !technologies.contains(&tech) {
                technologies.push(tech);
            }
        }
    }
    technologies
}

/// Repository overview bullets built from the tree statistics.
pub fn repo_bullets(
    description: Option<&str>,
    structure: &RepoStructure,
    technologies: &[String],
) -> String {
    let mut bullets = vec![format!(
        "- Contains {} files organized into {} folders",
        structure.total_files, structure.total_folders
    )];

    if let Some(description) = description.map(str::trim).filter(|d| !d.is_empty()) {
        bullets.push(format!("- Aims to: {}", description));
    }
    if !structure.main_folders.is_empty() {
        let shown: Vec<&str> = structure
            .main_folders
            .iter()
            .take(5)
            .map(String::as_str)
            .collect();
        bullets.push(format!("- Main areas to explore: {}", shown.join(", ")));
    }
    if !technologies.is_empty() {
        let shown: Vec<&str> = technologies.iter().take(5).map(String::as_str).collect();
        bullets.push(format!("- Built mainly with {}", shown.join(", ")));
    }
    bullets.push(
        match structure.complexity {
            Complexity::Low => "- Small enough to read through in one sitting",
            Complexity::Medium => "- Medium-sized, so start with the main folders",
            Complexity::High => "- Large codebase, so explore one area at a time",
        }
        .to_string(),
    );

    clamp_bullets(bullets, FOLDER_MIN_BULLETS, FOLDER_MAX_BULLETS, REPO_FILLER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn assert_bullets(summary: &str, min: usize, max: usize) {
        let lines: Vec<&str> = summary.lines().collect();
        assert!(
            lines.len() >= min && lines.len() <= max,
            "expected {min}-{max} lines, got {}: {summary}",
            lines.len()
        );
        assert!(lines.iter().all(|l| l.starts_with("- ")), "{summary}");
    }

    fn entry(path: &str, kind: &str) -> TreeEntry {
        TreeEntry {
            path: path.to_string(),
            kind: kind.to_string(),
            sha: None,
            size: None,
            mode: None,
        }
    }

    #[test]
    fn test_file_bullets_package_json() {
        let summary = file_bullets("package.json", "{}");
        assert_bullets(&summary, 5, 7);
        assert!(summary.starts_with("- Lists tools and libraries used by this project"));
        assert!(summary.ends_with(FILE_FILLER));
    }

    #[test]
    fn test_file_bullets_plain_content_padded() {
        let summary = file_bullets("notes.txt", "hello");
        assert_eq!(
            summary,
            [
                "- Connects this part with the rest of the app",
                "- Organizes logic so the feature is easy to update",
                FILE_FILLER,
                FILE_FILLER,
                FILE_FILLER,
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_file_bullets_every_rule_truncates_to_seven() {
        let content = "fetch login database config color render";
        let summary = file_bullets("page.js", content);
        assert_bullets(&summary, 7, 7);
        assert!(summary.contains("- Checks who is signed in and what they can do"));
        // the second generic bullet is cut
        assert!(!summary.contains("easy to update"));
    }

    #[test]
    fn test_file_bullets_case_insensitive() {
        let summary = file_bullets("a.py", "SELECT * FROM users");
        assert!(summary.starts_with("- Reads and writes data used by the app"));
    }

    #[test]
    fn test_folder_bullets_known_folder() {
        let names = vec!["routes".to_string(), "controllers".to_string()];
        let summary = folder_bullets("Backend", &names);
        assert_bullets(&summary, 4, 6);
        assert!(summary.starts_with("- Handles app logic on the server side"));
        assert!(summary.contains("- Stores functions that process requests and responses"));
        assert!(summary.contains("- Lists paths this part of the app responds to"));
    }

    #[test]
    fn test_folder_bullets_padded() {
        let summary = folder_bullets("misc", &["data.bin".to_string()]);
        assert_eq!(
            summary,
            [
                "- Groups files for one clear area of the app",
                FOLDER_FILLER,
                FOLDER_FILLER,
                FOLDER_FILLER,
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_folder_bullets_truncate_to_six() {
        let names: Vec<String> = [
            "HomePage.jsx",
            "apiClient.js",
            "userController.js",
            "userModel.js",
            "router.js",
            "middleware.js",
            "styles.css",
            "config.js",
            "public",
            "app.test.js",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        assert_bullets(&folder_bullets("frontend", &names), 6, 6);
    }

    #[test]
    fn test_folder_listing() {
        let names: Vec<String> = (1..=17).map(|i| format!("f{i}")).collect();
        let listing = folder_listing(&names);
        assert!(listing.starts_with("\n\nFiles and subfolders in this directory:\n• f1\n"));
        assert!(listing.contains("• f15"));
        assert!(!listing.contains("• f16"));
        assert!(listing.ends_with("\n... and 2 more items"));

        let short = folder_listing(&["a".to_string()]);
        assert_eq!(short, "\n\nFiles and subfolders in this directory:\n• a");
    }

    #[test]
    fn test_fixed_summaries_shape() {
        assert_bullets(&empty_file_summary(), 4, 4);
        assert_bullets(&empty_folder_summary(), 4, 4);
        assert_bullets(&last_resort_file_summary("x.rs"), 4, 4);
        assert_bullets(&last_resort_folder_summary("src"), 3, 3);
        assert!(last_resort_file_summary("x.rs").starts_with("- x.rs helps"));
    }

    #[test]
    fn test_generic_issue_fallback() {
        let analysis = generic_issue_fallback("12", "Login broken");
        assert_eq!(analysis.issue_summary, "Issue #12: Login broken");
        assert_eq!(analysis.solution_steps.len(), 5);
        assert_eq!(analysis.branch_name, "fix-issue-12");
        assert_eq!(
            analysis.git_commands,
            vec![
                "git checkout -b fix-issue-12",
                "git add .",
                "git commit -m \"fix: resolve issue #12 - Login broken\"",
                "git push origin fix-issue-12",
            ]
        );
    }

    #[test]
    fn test_structured_issue_fallback_truncates() {
        let text = "x".repeat(300);
        let analysis = structured_issue_fallback("3", "Typo", &text);
        assert_eq!(analysis.issue_summary, format!("{}...", "x".repeat(200)));
        assert_eq!(analysis.solution_steps.len(), 4);
    }

    #[test]
    fn test_analyze_structure() {
        let entries = vec![
            entry("src", "tree"),
            entry("src/main.rs", "blob"),
            entry("src/lib.rs", "blob"),
            entry("docs/guide/intro.md", "blob"),
            entry("README.md", "blob"),
            entry(".gitignore", "blob"),
            entry("Makefile", "blob"),
        ];
        let structure = analyze_structure(&entries);

        assert_eq!(structure.total_files, 6);
        // src, docs, docs/guide
        assert_eq!(structure.total_folders, 3);
        assert_eq!(structure.main_folders, vec!["docs", "src"]);
        assert_eq!(
            structure.file_types,
            vec![
                FileTypeCount {
                    extension: "md".to_string(),
                    count: 2
                },
                FileTypeCount {
                    extension: "rs".to_string(),
                    count: 2
                },
            ]
        );
        assert_eq!(structure.complexity, Complexity::Low);
    }

    #[test]
    fn test_collect_technologies_first_seen_order() {
        let entries = vec![
            entry("web/app.ts", "blob"),
            entry("web", "tree"),
            entry("api/main.go", "blob"),
            entry("web/util.ts", "blob"),
        ];
        assert_eq!(collect_technologies(&entries), vec!["TypeScript", "Go"]);
    }

    #[test]
    fn test_repo_bullets() {
        let structure = analyze_structure(&[entry("src/a.rs", "blob")]);
        let summary = repo_bullets(Some("A tiny tool"), &structure, &["Rust".to_string()]);
        assert_bullets(&summary, 4, 6);
        assert!(summary.contains("- Aims to: A tiny tool"));
        assert!(summary.contains("- Main areas to explore: src"));

        let bare = analyze_structure(&[]);
        assert_bullets(&repo_bullets(None, &bare, &[]), 4, 6);
    }
}
