use std::path::Path;

use git2::{Delta, DiffFindOptions, DiffOptions, Repository};

use crate::error::{OpenHubError, Result};
use crate::git::{FileChange, GitOperations};

pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// Opens the repository containing `path`, searching parent directories.
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path)?;
        Ok(Self { repo })
    }

    fn resolve_tree(&self, rev: &str) -> Result<git2::Tree<'_>> {
        let object = self.repo.revparse_single(rev).map_err(|_| {
            OpenHubError::InvalidInput(format!("Unknown revision '{}'", rev))
        })?;
        Ok(object.peel_to_commit()?.tree()?)
    }
}

fn status_letter(delta: Delta) -> &'static str {
    match delta {
        Delta::Added => "A",
        Delta::Deleted => "D",
        Delta::Modified => "M",
        Delta::Renamed => "R",
        Delta::Copied => "C",
        Delta::Typechange => "T",
        Delta::Unreadable => "X",
        _ => "U",
    }
}

impl GitOperations for GitRepository {
    fn head_sha(&self) -> Result<Option<String>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?.id().to_string())),
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => Ok(None),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn changes_between(&self, from: &str, to: &str) -> Result<Vec<FileChange>> {
        let old_tree = self.resolve_tree(from)?;
        let new_tree = self.resolve_tree(to)?;

        let mut opts = DiffOptions::new();
        let mut diff =
            self.repo
                .diff_tree_to_tree(Some(&old_tree), Some(&new_tree), Some(&mut opts))?;

        // rename detection, as `git diff` does by default
        let mut find = DiffFindOptions::new();
        find.renames(true);
        diff.find_similar(Some(&mut find))?;

        let changes = diff
            .deltas()
            .filter_map(|delta| {
                let file = match delta.status() {
                    Delta::Deleted => delta.old_file().path(),
                    _ => delta.new_file().path(),
                }?;
                Some(FileChange {
                    status: status_letter(delta.status()).to_string(),
                    file: file.to_string_lossy().replace('\\', "/"),
                })
            })
            .collect();

        Ok(changes)
    }
}
