//! Route table and shared state.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::api::{handlers, middleware as api_middleware};
use crate::config::AppConfig;
use crate::error::Result;
use crate::github::GitHubClient;
use crate::learn::{HeadTracker, RateLimiter, YouTubeClient};
use crate::summary::SummaryService;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub github: GitHubClient,
    pub summary: SummaryService,
    pub youtube: Option<YouTubeClient>,
    pub heads: HeadTracker,
    pub limiter: RateLimiter,
}

impl AppState {
    /// Builds clients and services from the configuration.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let github = GitHubClient::new(&config.github, &config.network)?;
        let youtube = YouTubeClient::from_config(&config.learn, &config.network)?;
        let summary = SummaryService::from_config(&config);
        let limiter = RateLimiter::from_config(&config.learn);

        Ok(Self {
            config: Arc::new(config),
            github,
            summary,
            youtube,
            heads: HeadTracker::new(),
            limiter,
        })
    }

    /// HEAD polling interval of the change stream.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.config.learn.poll_interval_ms)
    }
}

/// Builds the complete router: auth, GitHub proxy, learn tools and health.
pub fn create_router(state: AppState) -> Router {
    let cors = api_middleware::cors_layer(&state.config.server);

    let auth = Router::new()
        .route("/github", get(handlers::auth::github_login))
        .route("/github/callback", get(handlers::auth::github_callback));

    let github = Router::new()
        .route("/user", get(handlers::github::user))
        .route("/repos", get(handlers::github::repos))
        .route("/repo", get(handlers::github::repo_info))
        .route("/tree", get(handlers::github::repo_tree))
        .route("/file", get(handlers::github::file_content))
        .route("/issues", get(handlers::github::issues))
        .route("/ai-summary", post(handlers::github::ai_summary))
        .route("/analyze-issue", post(handlers::github::analyze_issue))
        .route("/analyze-repo", post(handlers::github::analyze_repo))
        .route(
            "/create-issue-branch",
            post(handlers::github::create_issue_branch),
        );

    let contextual = Router::new()
        .route("/contextual", get(handlers::learn::contextual))
        .route("/github-contextual", get(handlers::learn::github_contextual))
        .route_layer(middleware::from_fn_with_state(
            state.limiter.clone(),
            api_middleware::limit_requests,
        ));

    let learn = Router::new()
        .route("/tree", get(handlers::learn::local_tree))
        .route("/github-tree", get(handlers::learn::github_tree))
        .route("/resources", get(handlers::learn::resources))
        .route("/status", get(handlers::learn::status))
        .route("/stream", get(handlers::learn::stream))
        .route("/compress", post(handlers::learn::compress))
        .merge(contextual);

    Router::new()
        .route("/test", get(handlers::health::health))
        .nest("/auth", auth)
        .nest("/api/github", github)
        .nest("/api/learn", learn)
        .with_state(state)
        .layer(cors)
        .layer(api_middleware::logging_layer())
}
