use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::RepoRef;
use super::types::{
    AccessTokenResponse, BranchInfo, FileBody, FileContents, RawContents, RepoTree, TreeResponse,
};
use crate::config::{GitHubConfig, NetworkConfig};
use crate::error::{OpenHubError, Result};

const GITHUB_V3_ACCEPT: &str = "application/vnd.github.v3+json";

/// OAuth scopes requested at sign-in.
pub const OAUTH_SCOPES: &str = "read:user,repo";

/// GitHub REST and OAuth client.
///
/// Tokens are passed per call: the same client serves every signed-in user.
///
/// # Example
/// ```no_run
/// use openhub::config::{GitHubConfig, NetworkConfig};
/// use openhub::github::{GitHubClient, RepoRef};
///
/// # async fn example() -> openhub::error::Result<()> {
/// let client = GitHubClient::new(&GitHubConfig::default(), &NetworkConfig::default())?;
/// let repo = RepoRef::parse("rust-lang/rust")?;
/// let tree = client.repo_tree(&repo, None).await?;
/// println!("{} entries on {}", tree.tree.len(), tree.default_branch);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    api_base: String,
    oauth_base: String,
}

impl GitHubClient {
    /// Builds a client on the shared HTTP pool.
    pub fn new(config: &GitHubConfig, network: &NetworkConfig) -> Result<Self> {
        Ok(Self::with_client(
            crate::http::shared_client(network)?,
            &config.api_base,
            &config.oauth_base,
        ))
    }

    /// Builds a client on an existing `reqwest::Client`.
    pub fn with_client(client: Client, api_base: &str, oauth_base: &str) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            oauth_base: oauth_base.trim_end_matches('/').to_string(),
        }
    }

    /// Browser URL for the OAuth authorize step.
    pub fn authorize_url(&self, client_id: &str, redirect_uri: &str) -> String {
        format!(
            "{}/login/oauth/authorize?client_id={}&redirect_uri={}&scope={}",
            self.oauth_base,
            urlencoding::encode(client_id),
            urlencoding::encode(redirect_uri),
            OAUTH_SCOPES
        )
    }

    /// Exchanges an OAuth `code` for an access token.
    ///
    /// GitHub answers a bad code with 200 and an `error` field, so a missing
    /// `access_token` is reported with that field's description.
    pub async fn exchange_code(
        &self,
        client_id: &str,
        client_secret: &str,
        code: &str,
        redirect_uri: &str,
    ) -> Result<String> {
        let url = format!("{}/login/oauth/access_token", self.oauth_base);
        let body = serde_json::json!({
            "client_id": client_id,
            "client_secret": client_secret,
            "code": code,
            "redirect_uri": redirect_uri,
        });

        tracing::debug!("POST {}", url);
        let response = self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;
        let token: AccessTokenResponse = response.json().await?;

        match token.access_token.filter(|t| !t.is_empty()) {
            Some(access_token) => Ok(access_token),
            None => {
                let reason = token
                    .error_description
                    .or(token.error)
                    .unwrap_or_else(|| "No access token received from GitHub".to_string());
                tracing::error!("GitHub token exchange returned no token: {}", reason);
                Err(OpenHubError::Other(reason))
            }
        }
    }

    /// `GET /user`
    pub async fn user(&self, token: &str) -> Result<Value> {
        self.get_json("/user", Some(token)).await
    }

    /// `GET /user/repos`, most recently updated first.
    pub async fn user_repos(&self, token: &str) -> Result<Value> {
        self.get_json("/user/repos?sort=updated&per_page=100", Some(token))
            .await
    }

    /// `GET /repos/{owner}/{repo}`
    pub async fn repo(&self, repo: &RepoRef, token: Option<&str>) -> Result<Value> {
        self.get_json(&repo_path(repo, ""), token).await
    }

    /// The repository's default branch name.
    pub async fn default_branch(&self, repo: &RepoRef, token: Option<&str>) -> Result<String> {
        let info = self.repo(repo, token).await?;
        info.get("default_branch")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                OpenHubError::Other(format!("Repository {} has no default branch", repo))
            })
    }

    /// Tree SHA of the branch head commit, if GitHub reports one.
    pub async fn branch_tree_sha(
        &self,
        repo: &RepoRef,
        branch: &str,
        token: Option<&str>,
    ) -> Result<Option<String>> {
        let path = repo_path(repo, &format!("/branches/{}", encode_segments(branch)));
        let info: BranchInfo = self.get_json(&path, token).await?;
        Ok(info
            .commit
            .and_then(|c| c.commit)
            .and_then(|c| c.tree)
            .and_then(|t| t.sha))
    }

    /// `GET /repos/{owner}/{repo}/git/trees/{sha}?recursive=1`
    pub async fn tree_recursive(
        &self,
        repo: &RepoRef,
        sha: &str,
        token: Option<&str>,
    ) -> Result<Vec<super::TreeEntry>> {
        let path = repo_path(repo, &format!("/git/trees/{}?recursive=1", sha));
        let response: TreeResponse = self.get_json(&path, token).await?;
        Ok(response.tree)
    }

    /// Default branch and its full recursive tree.
    pub async fn repo_tree(&self, repo: &RepoRef, token: Option<&str>) -> Result<RepoTree> {
        let default_branch = self.default_branch(repo, token).await?;
        let tree_sha = self
            .branch_tree_sha(repo, &default_branch, token)
            .await?
            .ok_or(OpenHubError::MissingTreeSha)?;
        let tree = self.tree_recursive(repo, &tree_sha, token).await?;

        tracing::debug!(
            "Fetched {} tree entries for {}@{}",
            tree.len(),
            repo,
            default_branch
        );
        Ok(RepoTree {
            default_branch,
            tree,
        })
    }

    /// `GET /repos/{owner}/{repo}/contents/{path}`
    pub async fn file_contents(
        &self,
        repo: &RepoRef,
        file_path: &str,
        token: Option<&str>,
    ) -> Result<FileContents> {
        let path = repo_path(repo, &format!("/contents/{}", encode_segments(file_path)));
        let value: Value = self.get_json(&path, token).await?;

        if let Value::Array(items) = value {
            return Ok(FileContents::Directory(items));
        }

        let raw: RawContents = serde_json::from_value(value)?;
        let content = match (raw.encoding.as_deref(), raw.content) {
            (Some("base64"), Some(encoded)) => Some(decode_base64_content(&encoded)),
            (_, content) => content,
        };

        Ok(FileContents::File(FileBody {
            name: raw.name,
            path: raw.path,
            kind: raw.kind,
            encoding: raw.encoding,
            content,
        }))
    }

    /// `GET /repos/{owner}/{repo}/issues`, newest first.
    pub async fn issues(
        &self,
        repo: &RepoRef,
        state: &str,
        per_page: u32,
        token: Option<&str>,
    ) -> Result<Value> {
        let path = repo_path(
            repo,
            &format!(
                "/issues?state={}&per_page={}&sort=created&direction=desc",
                urlencoding::encode(state),
                per_page
            ),
        );
        self.get_json(&path, token).await
    }

    /// SHA of the branch head commit.
    pub async fn branch_head_sha(&self, repo: &RepoRef, branch: &str, token: &str) -> Result<String> {
        let path = repo_path(repo, &format!("/commits/{}", encode_segments(branch)));
        let commit: Value = self.get_json(&path, Some(token)).await?;
        commit
            .get("sha")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| OpenHubError::Other(format!("No commit SHA for branch {}", branch)))
    }

    /// Creates `refs/heads/{branch}` at `sha`.
    pub async fn create_ref(
        &self,
        repo: &RepoRef,
        branch: &str,
        sha: &str,
        token: &str,
    ) -> Result<Value> {
        let url = format!("{}{}", self.api_base, repo_path(repo, "/git/refs"));
        let body = serde_json::json!({
            "ref": format!("refs/heads/{}", branch),
            "sha": sha,
        });

        tracing::debug!("POST {}", url);
        let request = authorize(self.client.post(&url), Some(token)).json(&body);
        let response = check_status(request.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, token: Option<&str>) -> Result<T> {
        let url = format!("{}{}", self.api_base, path);
        tracing::debug!("GET {}", url);

        let request = authorize(self.client.get(&url), token);
        let response = check_status(request.send().await?).await?;
        Ok(response.json().await?)
    }
}

fn authorize(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    let request = request.header("Accept", GITHUB_V3_ACCEPT);
    match token {
        Some(token) => request.header("Authorization", format!("token {}", token)),
        None => request,
    }
}

/// Maps non-2xx responses to `OpenHubError::GitHub`.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body);
    tracing::debug!("GitHub responded {}: {}", status, message);
    Err(OpenHubError::GitHub {
        status: status.as_u16(),
        message,
    })
}

/// `message`, then OAuth `error_description` / `error`, then the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            ["message", "error_description", "error"]
                .iter()
                .find_map(|key| v.get(*key).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| body.to_string())
}

fn repo_path(repo: &RepoRef, rest: &str) -> String {
    format!(
        "/repos/{}/{}{}",
        urlencoding::encode(&repo.owner),
        urlencoding::encode(&repo.repo),
        rest
    )
}

/// Percent-encodes each `/`-separated segment, keeping the separators.
fn encode_segments(path: &str) -> String {
    path.trim_start_matches('/')
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// GitHub wraps base64 payloads at 60 columns.
fn decode_base64_content(encoded: &str) -> String {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    match STANDARD.decode(compact.as_bytes()) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            tracing::warn!("Failed to decode base64 content: {}", e);
            encoded.to_string()
        }
    }
}
