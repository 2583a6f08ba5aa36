//! HEAD polling for the learn change stream.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use futures_util::Stream;
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::{OpenHubError, Result};
use crate::git::repository::GitRepository;
use crate::git::{FileChange, GitOperations};
use crate::techdetect::detect_technologies;

/// A changed file with the technologies its path suggests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangedFile {
    pub status: String,
    pub file: String,
    pub technologies: Vec<String>,
}

impl From<FileChange> for ChangedFile {
    fn from(change: FileChange) -> Self {
        let technologies = detect_technologies(&change.file);
        Self {
            status: change.status,
            file: change.file,
            technologies,
        }
    }
}

/// An event pushed to stream subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    Head {
        sha: String,
    },
    Change {
        from: String,
        to: String,
        changes: Vec<ChangedFile>,
    },
    Error {
        message: String,
    },
}

impl WatchEvent {
    /// SSE event name.
    pub fn name(&self) -> &'static str {
        match self {
            WatchEvent::Head { .. } => "head",
            WatchEvent::Change { .. } => "change",
            WatchEvent::Error { .. } => "error",
        }
    }

    /// SSE data payload.
    pub fn data(&self) -> Value {
        match self {
            WatchEvent::Head { sha } => json!({ "sha": sha }),
            WatchEvent::Change { from, to, changes } => {
                json!({ "from": from, "to": to, "changes": changes })
            }
            WatchEvent::Error { message } => json!({ "message": message }),
        }
    }
}

/// Last HEAD observed by the stream, per repository path.
#[derive(Debug, Clone, Default)]
pub struct HeadTracker {
    last_seen: Arc<DashMap<String, String>>,
}

impl HeadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_seen(&self, repo_key: &str) -> Option<String> {
        self.last_seen.get(repo_key).map(|sha| sha.clone())
    }

    /// Compares HEAD with the last seen commit and records the new one.
    ///
    /// A moved HEAD yields a `change` event (only when a previous commit
    /// was known) followed by `head`. An unchanged or unresolvable HEAD
    /// yields nothing.
    pub fn poll_once(&self, git: &dyn GitOperations, repo_key: &str) -> Result<Vec<WatchEvent>> {
        let Some(sha) = git.head_sha()? else {
            return Ok(Vec::new());
        };

        let previous = self.last_seen(repo_key);
        if previous.as_deref() == Some(sha.as_str()) {
            return Ok(Vec::new());
        }

        let mut events = Vec::with_capacity(2);
        if let Some(from) = previous {
            let changes = git
                .changes_between(&from, &sha)?
                .into_iter()
                .map(ChangedFile::from)
                .collect();
            events.push(WatchEvent::Change {
                from,
                to: sha.clone(),
                changes,
            });
        }

        self.last_seen.insert(repo_key.to_string(), sha.clone());
        events.push(WatchEvent::Head { sha });
        Ok(events)
    }
}

/// Current HEAD of the repository at `root`, `None` when unresolvable.
pub fn current_head(root: &std::path::Path) -> Option<String> {
    GitRepository::open(root)
        .and_then(|repo| repo.head_sha())
        .ok()
        .flatten()
}

/// Event stream for one subscriber: the current HEAD right away, then one
/// poll per `interval`.
///
/// The repository is reopened on every poll on the blocking pool, and a
/// directory that cannot be opened as one stays silent. Only failures of an
/// opened repository become `error` events. The stream never ends on its
/// own; dropping it stops the polling.
pub fn watch(
    tracker: HeadTracker,
    root: PathBuf,
    interval: Duration,
) -> impl Stream<Item = WatchEvent> + Send + 'static {
    let repo_key = root.to_string_lossy().into_owned();

    async_stream::stream! {
        let initial_root = root.clone();
        let initial = tokio::task::spawn_blocking(move || current_head(&initial_root))
            .await
            .ok()
            .flatten();
        if let Some(sha) = initial {
            yield WatchEvent::Head { sha };
        }

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // the first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let tracker = tracker.clone();
            let root = root.clone();
            let key = repo_key.clone();
            let polled = tokio::task::spawn_blocking(move || {
                // not (yet) a repository: no HEAD to report, same as `current_head`
                let repo = match GitRepository::open(&root) {
                    Ok(repo) => repo,
                    Err(e) => {
                        tracing::trace!("No repository at {}: {}", root.display(), e);
                        return Ok(Vec::new());
                    }
                };
                tracker.poll_once(&repo, &key)
            })
            .await
            .map_err(|e| OpenHubError::Other(e.to_string()))
            .and_then(|result| result);

            match polled {
                Ok(events) => {
                    for event in events {
                        yield event;
                    }
                }
                Err(e) => {
                    tracing::warn!("HEAD poll failed for {}: {}", repo_key, e);
                    yield WatchEvent::Error { message: e.to_string() };
                }
            }
        }
    }
}
