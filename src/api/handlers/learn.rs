//! Learning tool endpoints under `/api/learn`

use std::convert::Infallible;
use std::path::PathBuf;

use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::{
        IntoResponse,
        sse::{Event, KeepAlive, Sse},
    },
};
use axum_extra::extract::WithRejection;
use axum_extra::extract::cookie::CookieJar;
use futures_util::{Stream, StreamExt};
use serde::Deserialize;
use serde_json::{Value, json};

use super::{ApiJson, ApiQuery};
use super::auth::token_from;
use crate::api::error::{ApiError, ApiResult, WithLabel};
use crate::api::routes::AppState;
use crate::error::OpenHubError;
use crate::github::RepoRef;
use crate::learn::{self, archive, resources, watcher};
use crate::tree::{build_tree, flatten_blobs, walk_dir};

#[derive(Debug, Default, Deserialize)]
pub struct RepoPathQuery {
    pub repo_path: Option<String>,
}

/// Resolves `repo_path` to an existing absolute directory.
fn resolve_repo_path(raw: Option<&str>) -> ApiResult<PathBuf> {
    let raw = raw
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::BadRequest("repo_path query parameter is required".to_string()))?;
    PathBuf::from(raw)
        .canonicalize()
        .map_err(|_| ApiError::NotFound("Repository path not found".to_string()))
}

/// Runs blocking filesystem or git work off the async runtime.
async fn blocking<T, F>(label: &'static str, work: F) -> ApiResult<T>
where
    F: FnOnce() -> crate::error::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::upstream(label, OpenHubError::Other(e.to_string())))?
        .labelled(label)
}

/// GET /api/learn/tree?repo_path
pub async fn local_tree(
    State(state): State<AppState>,
    WithRejection(Query(query), _): ApiQuery<RepoPathQuery>,
) -> ApiResult<Json<Value>> {
    let root = resolve_repo_path(query.repo_path.as_deref())?;
    let ignore_dirs = state.config.learn.ignore_dirs.clone();

    let walk_root = root.clone();
    let files = blocking("Failed to read repository tree", move || {
        walk_dir(&walk_root, &ignore_dirs)
    })
    .await?;

    Ok(Json(json!({
        "root": root.to_string_lossy(),
        "tree": build_tree(&files),
    })))
}

#[derive(Debug, Deserialize)]
pub struct ResourcesQuery {
    pub technologies: Option<String>,
}

/// GET /api/learn/resources?technologies=a,b
pub async fn resources(
    WithRejection(Query(query), _): ApiQuery<ResourcesQuery>,
) -> Json<Value> {
    let found = resources::resources_for(query.technologies.as_deref().unwrap_or_default());
    Json(json!({ "resources": found }))
}

/// GET /api/learn/status?repo_path
pub async fn status(
    State(state): State<AppState>,
    WithRejection(Query(query), _): ApiQuery<RepoPathQuery>,
) -> ApiResult<Json<Value>> {
    let root = resolve_repo_path(query.repo_path.as_deref())?;
    let key = root.to_string_lossy().into_owned();

    let head = tokio::task::spawn_blocking(move || watcher::current_head(&root))
        .await
        .ok()
        .flatten();

    Ok(Json(json!({
        "head": head,
        "lastSeen": state.heads.last_seen(&key),
    })))
}

/// GET /api/learn/stream?repo_path (SSE)
pub async fn stream(
    State(state): State<AppState>,
    WithRejection(Query(query), _): ApiQuery<RepoPathQuery>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let root = resolve_repo_path(query.repo_path.as_deref())?;
    tracing::info!("Change stream opened for {}", root.display());

    let events = watcher::watch(state.heads.clone(), root, state.poll_interval()).map(|event| {
        Ok(Event::default()
            .event(event.name())
            .data(event.data().to_string()))
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

#[derive(Debug, Deserialize)]
pub struct CompressRequest {
    /// Kept loose so a non-array answers `paths array required`.
    #[serde(default)]
    pub paths: Option<Value>,
    #[serde(default)]
    pub repo_path: Option<String>,
}

/// POST /api/learn/compress
pub async fn compress(
    WithRejection(Json(request), _): ApiJson<CompressRequest>,
) -> ApiResult<impl IntoResponse> {
    let paths: Vec<String> = request
        .paths
        .as_ref()
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .filter(|p: &Vec<String>| !p.is_empty())
        .ok_or_else(|| ApiError::BadRequest("paths array required".to_string()))?;
    if request.repo_path.as_deref().is_none_or(|p| p.trim().is_empty()) {
        return Err(ApiError::BadRequest("repo_path is required".to_string()));
    }
    let root = resolve_repo_path(request.repo_path.as_deref())?;

    let bytes = blocking("Failed to create archive", move || {
        archive::compress_selection(&root, &paths)
    })
    .await?;

    let name = archive::archive_name();
    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", name),
            ),
        ],
        bytes,
    ))
}

#[derive(Debug, Deserialize)]
pub struct ContextualQuery {
    pub path: Option<String>,
    pub full_name: Option<String>,
    pub language: Option<String>,
    pub max: Option<String>,
}

async fn contextual_body(state: &AppState, query: &ContextualQuery) -> ApiResult<Value> {
    let path = query
        .path
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::BadRequest("path query param is required".to_string()))?;
    let language = query
        .language
        .as_deref()
        .filter(|l| !l.is_empty())
        .unwrap_or("en");
    let max = learn::parse_max_results(query.max.as_deref());

    let items = learn::contextual_items(path, language, max, state.youtube.as_ref()).await;
    Ok(json!({
        "language": language,
        "availableLanguages": [language],
        "items": items,
    }))
}

/// GET /api/learn/contextual?path[&language][&max]
pub async fn contextual(
    State(state): State<AppState>,
    WithRejection(Query(query), _): ApiQuery<ContextualQuery>,
) -> ApiResult<Json<Value>> {
    Ok(Json(contextual_body(&state, &query).await?))
}

/// GET /api/learn/github-contextual?full_name&path[&language][&max]
pub async fn github_contextual(
    State(state): State<AppState>,
    WithRejection(Query(query), _): ApiQuery<ContextualQuery>,
) -> ApiResult<Json<Value>> {
    let mut body = contextual_body(&state, &query).await?;
    if let Value::Object(map) = &mut body {
        map.insert("repository".to_string(), json!(query.full_name));
        map.insert("filePath".to_string(), json!(query.path));
    }
    Ok(Json(body))
}

#[derive(Debug, Deserialize)]
pub struct GitHubTreeQuery {
    pub full_name: Option<String>,
}

/// GET /api/learn/github-tree?full_name
pub async fn github_tree(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Query(query), _): ApiQuery<GitHubTreeQuery>,
) -> ApiResult<Json<Value>> {
    let raw = query
        .full_name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| {
            ApiError::BadRequest(
                "full_name query parameter is required (owner/repo)".to_string(),
            )
        })?;
    let repo = RepoRef::parse(raw).map_err(|_| {
        ApiError::BadRequest("Invalid repository format. Expected: owner/repo".to_string())
    })?;
    let token = token_from(&jar);

    let tree = state
        .github
        .repo_tree(&repo, token.as_deref())
        .await
        .labelled("Failed to fetch repository tree")?;

    Ok(Json(json!({
        "default_branch": tree.default_branch,
        "tree": flatten_blobs(&tree.tree),
        "repository": {
            "name": repo.repo,
            "owner": repo.owner,
            "full_name": repo.full_name(),
        },
    })))
}
