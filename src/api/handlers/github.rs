//! GitHub proxy and AI summary endpoints

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{ApiJson, ApiQuery};
use super::auth::{require_token, token_from};
use crate::api::error::{ApiError, ApiResult, WithLabel};
use crate::api::routes::AppState;
use crate::error::OpenHubError;
use crate::github::{FileContents, RepoRef, normalize_repo_full_name};
use crate::summary::analyze_tree;
use crate::summary::types::{IssueRequest, SummaryRequest, scalar_text};
use crate::tree::nest_github_tree;

const FULL_NAME_REQUIRED: &str = "full_name query param required (owner/repo)";
const INVALID_REPO_FORMAT: &str = "Invalid repository format. Expected: owner/repo";

#[derive(Debug, Default, Deserialize)]
pub struct RepoQuery {
    pub full_name: Option<String>,
    pub path: Option<String>,
    pub state: Option<String>,
    pub per_page: Option<String>,
    pub nested: Option<String>,
}

impl RepoQuery {
    /// `full_name` must be present and contain `/` before normalisation.
    fn repo(&self) -> ApiResult<RepoRef> {
        let raw = self
            .full_name
            .as_deref()
            .filter(|name| name.contains('/'))
            .ok_or_else(|| ApiError::BadRequest(FULL_NAME_REQUIRED.to_string()))?;
        RepoRef::parse(raw).map_err(|_| ApiError::BadRequest(FULL_NAME_REQUIRED.to_string()))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// GET /api/github/user
pub async fn user(State(state): State<AppState>, jar: CookieJar) -> ApiResult<Json<Value>> {
    let token = require_token(&jar)?;
    let user = state
        .github
        .user(&token)
        .await
        .labelled("Failed to fetch user")?;
    Ok(Json(user))
}

/// GET /api/github/repos
pub async fn repos(State(state): State<AppState>, jar: CookieJar) -> ApiResult<Json<Value>> {
    let token = require_token(&jar)?;
    let repos = state
        .github
        .user_repos(&token)
        .await
        .labelled("Failed to fetch repositories")?;
    Ok(Json(repos))
}

/// GET /api/github/repo?full_name
pub async fn repo_info(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Query(query), _): ApiQuery<RepoQuery>,
) -> ApiResult<Json<Value>> {
    let repo = query.repo()?;
    let token = token_from(&jar);
    let info = state
        .github
        .repo(&repo, token.as_deref())
        .await
        .labelled("Failed to fetch repository info")?;
    Ok(Json(info))
}

/// GET /api/github/tree?full_name[&nested=true]
///
/// The flat Trees API listing by default; `nested=true` returns the
/// folder tree with technologies instead.
pub async fn repo_tree(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Query(query), _): ApiQuery<RepoQuery>,
) -> ApiResult<Json<Value>> {
    let repo = query.repo()?;
    let token = token_from(&jar);
    let tree = state
        .github
        .repo_tree(&repo, token.as_deref())
        .await
        .labelled("Failed to fetch repository tree")?;

    let body = if query.nested.as_deref() == Some("true") {
        json!({
            "default_branch": tree.default_branch,
            "tree": nest_github_tree(&tree.tree),
        })
    } else {
        json!({
            "default_branch": tree.default_branch,
            "tree": tree.tree,
        })
    };
    Ok(Json(body))
}

/// GET /api/github/file?full_name&path
pub async fn file_content(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Query(query), _): ApiQuery<RepoQuery>,
) -> ApiResult<Json<Value>> {
    let repo = query.repo()?;
    let path = non_empty(query.path.as_deref())
        .ok_or_else(|| ApiError::BadRequest("path query param required".to_string()))?;
    let token = token_from(&jar);

    let contents = state
        .github
        .file_contents(&repo, path, token.as_deref())
        .await
        .labelled("Failed to fetch file content")?;

    match contents {
        FileContents::Directory(_) => Err(ApiError::BadRequest(
            "Path is a directory, not a file".to_string(),
        )),
        FileContents::File(file) => Ok(Json(serde_json::to_value(file).map_err(|e| {
            ApiError::upstream("Failed to fetch file content", OpenHubError::from(e))
        })?)),
    }
}

/// GET /api/github/issues?full_name[&state=open][&per_page=30]
pub async fn issues(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Query(query), _): ApiQuery<RepoQuery>,
) -> ApiResult<Json<Value>> {
    let repo = query.repo()?;
    let issue_state = non_empty(query.state.as_deref()).unwrap_or("open");
    let per_page = query
        .per_page
        .as_deref()
        .and_then(|p| p.trim().parse::<u32>().ok())
        .unwrap_or(30);
    let token = token_from(&jar);

    let issues = state
        .github
        .issues(&repo, issue_state, per_page, token.as_deref())
        .await
        .labelled("Failed to fetch repository issues")?;
    Ok(Json(issues))
}

/// POST /api/github/ai-summary
///
/// Always answers 200 once the request is valid: AI failures fall back to
/// heuristic summaries.
pub async fn ai_summary(
    State(state): State<AppState>,
    WithRejection(Json(request), _): ApiJson<SummaryRequest>,
) -> ApiResult<Json<Value>> {
    let valid = non_empty(request.kind.as_deref()).is_some()
        && non_empty(request.path.as_deref()).is_some()
        && non_empty(request.repo_name.as_deref()).is_some();
    if !valid {
        return Err(ApiError::BadRequest(
            "Missing required fields: type, path, repoName".to_string(),
        ));
    }

    tracing::debug!(
        "AI summary requested for {} '{}'",
        request.kind.as_deref().unwrap_or_default(),
        request.path.as_deref().unwrap_or_default()
    );
    let summary = state.summary.summarize_or_fallback(request).await;
    Ok(Json(json!({ "summary": summary })))
}

/// `repoInfo` of an issue analysis: the normalised name split into owner
/// and repository, `null` where a segment is missing.
fn issue_repo_info(repo_full_name: &str) -> Value {
    let full_name = normalize_repo_full_name(repo_full_name);
    let mut parts = full_name.split('/').filter(|p| !p.is_empty());
    json!({
        "owner": parts.next(),
        "repo": parts.next(),
        "fullName": full_name,
    })
}

/// POST /api/github/analyze-issue
pub async fn analyze_issue(
    State(state): State<AppState>,
    WithRejection(Json(request), _): ApiJson<IssueRequest>,
) -> ApiResult<Json<Value>> {
    let issue_number = scalar_text(request.issue_number.as_ref());
    let (Some(issue_number), Some(repo_full_name), Some(title)) = (
        issue_number.as_deref(),
        non_empty(request.repo_full_name.as_deref()),
        non_empty(request.issue_title.as_deref()),
    ) else {
        return Err(ApiError::BadRequest(
            "Missing required fields: issueNumber, repoFullName, issueTitle".to_string(),
        ));
    };

    let analysis = state
        .summary
        .analyze_issue(
            issue_number,
            title,
            request.issue_body.as_deref(),
            repo_full_name,
        )
        .await;

    Ok(Json(json!({
        "success": true,
        "analysis": analysis,
        "repoInfo": issue_repo_info(repo_full_name),
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRepoRequest {
    #[serde(default)]
    pub repo_full_name: Option<String>,
}

/// POST /api/github/analyze-repo
pub async fn analyze_repo(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(request), _): ApiJson<AnalyzeRepoRequest>,
) -> ApiResult<Json<Value>> {
    let raw = non_empty(request.repo_full_name.as_deref()).ok_or_else(|| {
        ApiError::BadRequest("Missing required field: repoFullName".to_string())
    })?;
    let repo = RepoRef::parse(raw)
        .map_err(|_| ApiError::BadRequest(INVALID_REPO_FORMAT.to_string()))?;
    let token = token_from(&jar);
    let token = token.as_deref();

    const LABEL: &str = "Failed to analyze repository";
    let info = state.github.repo(&repo, token).await.labelled(LABEL)?;
    let default_branch = info
        .get("default_branch")
        .and_then(Value::as_str)
        .unwrap_or("main")
        .to_string();
    let tree_sha = state
        .github
        .branch_tree_sha(&repo, &default_branch, token)
        .await
        .labelled(LABEL)?
        .ok_or_else(|| ApiError::upstream(LABEL, OpenHubError::MissingTreeSha))?;
    let entries = state
        .github
        .tree_recursive(&repo, &tree_sha, token)
        .await
        .labelled(LABEL)?;

    let (structure, technologies) = analyze_tree(&entries);
    let description = info.get("description").and_then(Value::as_str);
    let summary = state
        .summary
        .summarize_repo(&repo.full_name(), description, &structure, &technologies)
        .await;

    Ok(Json(json!({
        "success": true,
        "repository": {
            "fullName": repo.full_name(),
            "description": description,
            "defaultBranch": default_branch,
            "language": info.get("language").cloned().unwrap_or(Value::Null),
            "stars": info.get("stargazers_count").cloned().unwrap_or(Value::Null),
        },
        "structure": structure,
        "technologies": technologies,
        "summary": summary,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBranchRequest {
    #[serde(default)]
    pub repo_full_name: Option<String>,
    #[serde(default)]
    pub branch_name: Option<String>,
    #[serde(default)]
    pub issue_number: Option<Value>,
}

/// Commit message suggested for a freshly created issue branch.
pub fn issue_branch_commit_message(issue_number: &str, branch: &str, repo_full_name: &str) -> String {
    format!(
        "feat: start work on issue #{issue_number}\n\n- Created branch: {branch}\n- Issue: {repo_full_name}#{issue_number}\n- Status: In progress"
    )
}

fn issue_branch_next_steps(branch: &str) -> Vec<String> {
    vec![
        "Clone the repository locally".to_string(),
        format!("Checkout the new branch: git checkout {}", branch),
        "Make your changes".to_string(),
        format!(
            "Commit and push: git add . && git commit -m \"your message\" && git push origin {}",
            branch
        ),
        "Create a pull request when ready".to_string(),
    ]
}

/// POST /api/github/create-issue-branch
pub async fn create_issue_branch(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(request), _): ApiJson<CreateBranchRequest>,
) -> ApiResult<Json<Value>> {
    let issue_number = scalar_text(request.issue_number.as_ref());
    let (Some(repo_full_name), Some(branch), Some(issue_number)) = (
        non_empty(request.repo_full_name.as_deref()),
        non_empty(request.branch_name.as_deref()),
        issue_number.as_deref(),
    ) else {
        return Err(ApiError::BadRequest(
            "Missing required fields: repoFullName, branchName, issueNumber".to_string(),
        ));
    };
    let token = require_token(&jar)?;

    let failed = |e: OpenHubError| ApiError::Custom {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        error: "Failed to create issue branch".to_string(),
        details: Some(e.details()),
    };

    let repo = RepoRef::parse(repo_full_name).map_err(failed)?;
    let base = state
        .github
        .default_branch(&repo, Some(&token))
        .await
        .map_err(failed)?;
    let sha = state
        .github
        .branch_head_sha(&repo, &base, &token)
        .await
        .map_err(failed)?;
    let created = state
        .github
        .create_ref(&repo, branch, &sha, &token)
        .await
        .map_err(failed)?;

    tracing::info!("Created branch {} on {} from {}", branch, repo, base);

    Ok(Json(json!({
        "success": true,
        "branch": created,
        "commitMessage": issue_branch_commit_message(issue_number, branch, repo_full_name),
        "nextSteps": issue_branch_next_steps(branch),
    })))
}
