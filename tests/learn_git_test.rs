//! Learn change tracking against real repositories
//!
//! Covers:
//! - HeadTracker with GitRepository (first poll, moved HEAD, deletions)
//! - the SSE event stream end to end, including non-repository paths
//! - error propagation through the mocked GitOperations

use std::fs;
use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use openhub::error::{OpenHubError, Result};
use openhub::git::MockGitOperations;
use openhub::git::repository::GitRepository;
use openhub::learn::watcher::{self, HeadTracker, WatchEvent};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

// ========== Helpers ==========

fn init_repo() -> (TempDir, git2::Repository) {
    let dir = TempDir::new().unwrap();
    let repo = git2::Repository::init(dir.path()).unwrap();
    (dir, repo)
}

fn write_file(root: &Path, name: &str, content: &str) {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Stages the whole work tree (including deletions) and commits it.
fn commit_all(repo: &git2::Repository, message: &str) -> String {
    let mut index = repo.index().unwrap();
    index
        .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
        .unwrap();
    index.update_all(["*"].iter(), None).unwrap();
    index.write().unwrap();

    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let sig = git2::Signature::now("Test User", "test@example.com").unwrap();
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap()
        .to_string()
}

// ========== HeadTracker ==========

#[test]
fn test_first_poll_only_records_head() -> Result<()> {
    let (dir, repo) = init_repo();
    write_file(dir.path(), "README.md", "# hub");
    let sha = commit_all(&repo, "init");

    let tracker = HeadTracker::new();
    let git = GitRepository::open(dir.path())?;
    let events = tracker.poll_once(&git, "hub")?;

    assert_eq!(events, vec![WatchEvent::Head { sha: sha.clone() }]);
    assert_eq!(tracker.last_seen("hub"), Some(sha));

    // unchanged HEAD
    assert!(tracker.poll_once(&git, "hub")?.is_empty());
    Ok(())
}

#[test]
fn test_moved_head_reports_changes() -> Result<()> {
    let (dir, repo) = init_repo();
    write_file(dir.path(), "README.md", "# hub");
    write_file(dir.path(), "src/old.js", "module.exports = 1;");
    let first = commit_all(&repo, "init");

    let tracker = HeadTracker::new();
    tracker.poll_once(&GitRepository::open(dir.path())?, "hub")?;

    write_file(dir.path(), "README.md", "# hub\n\nNow with docs.");
    write_file(dir.path(), "src/App.tsx", "export default () => null;");
    fs::remove_file(dir.path().join("src/old.js"))?;
    let second = commit_all(&repo, "second");

    let events = tracker.poll_once(&GitRepository::open(dir.path())?, "hub")?;
    assert_eq!(events.len(), 2);

    match &events[0] {
        WatchEvent::Change { from, to, changes } => {
            assert_eq!(from, &first);
            assert_eq!(to, &second);

            let app = changes.iter().find(|c| c.file == "src/App.tsx").unwrap();
            assert_eq!(app.status, "A");
            assert!(app.technologies.contains(&"React TypeScript".to_string()));

            let readme = changes.iter().find(|c| c.file == "README.md").unwrap();
            assert_eq!(readme.status, "M");

            let old = changes.iter().find(|c| c.file == "src/old.js").unwrap();
            assert_eq!(old.status, "D");
        }
        other => panic!("expected change event, got {other:?}"),
    }
    assert_eq!(events[1], WatchEvent::Head { sha: second });
    Ok(())
}

#[test]
fn test_status_head_of_empty_repo() {
    let (dir, _repo) = init_repo();
    assert_eq!(watcher::current_head(dir.path()), None);

    let not_a_repo = TempDir::new().unwrap();
    assert_eq!(watcher::current_head(not_a_repo.path()), None);
}

#[test]
fn test_diff_error_is_propagated() {
    let tracker = HeadTracker::new();

    let mut first = MockGitOperations::new();
    first
        .expect_head_sha()
        .returning(|| Ok(Some("aaa".to_string())));
    tracker.poll_once(&first, "hub").unwrap();

    let mut second = MockGitOperations::new();
    second
        .expect_head_sha()
        .returning(|| Ok(Some("bbb".to_string())));
    second
        .expect_changes_between()
        .returning(|_, _| Err(OpenHubError::InvalidInput("Unknown revision 'aaa'".into())));

    let err = tracker.poll_once(&second, "hub").unwrap_err();
    assert!(err.to_string().contains("Unknown revision"));
    // the failed poll does not advance the tracker
    assert_eq!(tracker.last_seen("hub"), Some("aaa".to_string()));
}

// ========== Stream ==========

async fn next_event<S>(stream: &mut S) -> WatchEvent
where
    S: futures_util::Stream<Item = WatchEvent> + Unpin,
{
    tokio::time::timeout(Duration::from_secs(5), stream.next())
        .await
        .expect("timed out waiting for event")
        .expect("stream ended")
}

#[tokio::test]
async fn test_watch_stream_reports_new_commit() {
    let (dir, repo) = init_repo();
    write_file(dir.path(), "index.js", "console.log(1);");
    let first = commit_all(&repo, "init");

    let tracker = HeadTracker::new();
    let mut stream = Box::pin(watcher::watch(
        tracker.clone(),
        dir.path().to_path_buf(),
        Duration::from_millis(50),
    ));

    // initial HEAD, then the first poll records it
    assert_eq!(
        next_event(&mut stream).await,
        WatchEvent::Head { sha: first.clone() }
    );
    assert_eq!(
        next_event(&mut stream).await,
        WatchEvent::Head { sha: first.clone() }
    );

    write_file(dir.path(), "index.js", "console.log(2);");
    let second = commit_all(&repo, "second");

    match next_event(&mut stream).await {
        WatchEvent::Change { from, to, changes } => {
            assert_eq!(from, first);
            assert_eq!(to, second);
            assert_eq!(changes.len(), 1);
            assert_eq!(changes[0].file, "index.js");
        }
        other => panic!("expected change event, got {other:?}"),
    }
    assert_eq!(
        next_event(&mut stream).await,
        WatchEvent::Head { sha: second.clone() }
    );

    let key = dir.path().to_string_lossy().into_owned();
    assert_eq!(tracker.last_seen(&key), Some(second));
}

#[tokio::test]
async fn test_watch_stream_is_silent_outside_a_repository() {
    let not_a_repo = TempDir::new().unwrap();
    let mut stream = Box::pin(watcher::watch(
        HeadTracker::new(),
        not_a_repo.path().to_path_buf(),
        Duration::from_millis(20),
    ));

    // several poll intervals pass without any event
    let next = tokio::time::timeout(Duration::from_millis(300), stream.next()).await;
    assert!(next.is_err(), "unexpected event: {next:?}");
}

#[tokio::test]
async fn test_watch_stream_picks_up_a_new_repository() {
    let dir = TempDir::new().unwrap();
    let mut stream = Box::pin(watcher::watch(
        HeadTracker::new(),
        dir.path().to_path_buf(),
        Duration::from_millis(20),
    ));
    assert!(
        tokio::time::timeout(Duration::from_millis(100), stream.next())
            .await
            .is_err()
    );

    let repo = git2::Repository::init(dir.path()).unwrap();
    write_file(dir.path(), "main.py", "print(1)");
    let sha = commit_all(&repo, "init");

    assert_eq!(next_event(&mut stream).await, WatchEvent::Head { sha });
}
