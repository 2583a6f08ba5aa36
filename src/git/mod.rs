pub mod repository;

use serde::Serialize;

use crate::error::Result;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// One line of `git diff --name-status`.
///
/// `status` is the single-letter change code (`A`, `M`, `D`, `R`, `C`, `T`).
/// For renames and copies `file` is the new path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    pub status: String,
    pub file: String,
}

/// Read-only view of a local repository, as polled by the learn stream.
///
/// Main implementation: [`GitRepository`](repository::GitRepository).
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use openhub::git::{GitOperations, repository::GitRepository};
///
/// # fn main() -> openhub::error::Result<()> {
/// let repo = GitRepository::open(Path::new("."))?;
/// if let Some(sha) = repo.head_sha()? {
///     println!("HEAD is {}", sha);
/// }
/// # Ok(())
/// # }
/// ```
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait GitOperations {
    /// Full SHA of the commit HEAD points at.
    ///
    /// `Ok(None)` for a repository without commits.
    fn head_sha(&self) -> Result<Option<String>>;

    /// Files changed from `from` to `to`, equivalent to
    /// `git diff --name-status from..to`.
    fn changes_between(&self, from: &str, to: &str) -> Result<Vec<FileChange>>;
}
