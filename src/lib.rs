//! # openhub
//!
//! Backend for OpenHub AI: a GitHub OAuth proxy with AI-generated summaries
//! of files, folders, issues and repositories, plus learning tools for
//! local checkouts.
//!
//! ## Features
//! - **GitHub proxy**: OAuth sign-in, repositories, trees, file contents, issues
//! - **AI summaries**: OpenAI-compatible chat completions (OpenRouter by default),
//!   with keyword heuristics whenever the model is unavailable
//! - **Issue helpers**: solution guides and issue branch creation
//! - **Learn tools**: local file trees, HEAD change stream (SSE), zip export,
//!   curated and YouTube learning resources
//!
//! ## Quick start
//! ```bash
//! export GITHUB_CLIENT_ID=... GITHUB_CLIENT_SECRET=...
//! export OPENROUTER_API_KEY=...   # optional
//! openhub serve --port 5001
//! ```
//!
//! ## As a library
//! ```no_run
//! use openhub::tree::build_tree;
//! use openhub::techdetect::detect_technologies;
//!
//! let tree = build_tree(&["src/main.rs", "README.md"]);
//! assert_eq!(tree[0].name, "src");
//! assert_eq!(detect_technologies("src/main.rs"), vec!["Rust"]);
//! ```
//!
//! ## Modules
//! - [`api`] - axum router, handlers and middleware
//! - [`github`] - GitHub REST/OAuth client
//! - [`summary`] - AI summaries with heuristic fallback
//! - [`llm`] - LLM provider interface and implementations
//! - [`learn`] - learning resources, change watcher, export, rate limiting
//! - [`tree`] / [`techdetect`] - tree building and technology detection
//! - [`git`] - local repository access
//! - [`config`] / [`error`] - configuration and error types
//!
//! ## Configuration
//! Configuration file locations:
//! - Linux: `~/.config/openhub/config.toml`
//! - macOS: `~/Library/Application Support/openhub/config.toml`
//! - Windows: `%APPDATA%\openhub\config\config.toml`
//!
//! ```toml
//! [server]
//! port = 5001
//! frontend_url = "http://localhost:3000"
//!
//! [llm.providers.openrouter]
//! model = "openai/gpt-4o"
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod github;
pub mod http;
pub mod learn;
pub mod llm;
pub mod summary;
pub mod techdetect;
pub mod tree;
