//! Nested file trees for the sidebar.
//!
//! Local directories are listed with [`walk_dir`]; GitHub trees arrive as a
//! flat `{path, type}` list. Both are nested by [`build_tree`] /
//! [`nest_github_tree`], with folders first and names compared
//! case-insensitively.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::Path;

use ignore::WalkBuilder;
use serde::Serialize;

use crate::error::Result;
use crate::github::TreeEntry;
use crate::techdetect::detect_technologies;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Folder,
    File,
}

/// One node of the nested tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub path: String,
    /// Empty for folders.
    pub technologies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
}

/// A GitHub blob flattened for the learn sidebar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatFile {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub path: String,
    pub technologies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

struct PendingNode {
    kind: NodeKind,
    path: String,
    children: BTreeMap<String, PendingNode>,
}

impl PendingNode {
    fn new(kind: NodeKind, path: String) -> Self {
        Self {
            kind,
            path,
            children: BTreeMap::new(),
        }
    }
}

/// Inserts `path`; the leaf gets `leaf_kind`, intermediate segments are
/// folders. An existing node keeps the kind it was first inserted with.
fn insert_path(root: &mut BTreeMap<String, PendingNode>, path: &str, leaf_kind: NodeKind) {
    let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
    let mut current = root;

    for (i, part) in parts.iter().enumerate() {
        let kind = if i == parts.len() - 1 {
            leaf_kind
        } else {
            NodeKind::Folder
        };
        let node = current
            .entry(part.to_string())
            .or_insert_with(|| PendingNode::new(kind, parts[..=i].join("/")));
        current = &mut node.children;
    }
}

fn compare_nodes(a: &TreeNode, b: &TreeNode) -> Ordering {
    match (a.kind, b.kind) {
        (NodeKind::Folder, NodeKind::File) => Ordering::Less,
        (NodeKind::File, NodeKind::Folder) => Ordering::Greater,
        _ => a
            .name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name)),
    }
}

fn finish(nodes: BTreeMap<String, PendingNode>) -> Vec<TreeNode> {
    let mut out: Vec<TreeNode> = nodes
        .into_iter()
        .map(|(name, node)| match node.kind {
            NodeKind::Folder => TreeNode {
                name,
                kind: NodeKind::Folder,
                path: node.path,
                technologies: Vec::new(),
                children: Some(finish(node.children)),
            },
            NodeKind::File => TreeNode {
                name,
                kind: NodeKind::File,
                technologies: detect_technologies(&node.path),
                path: node.path,
                children: None,
            },
        })
        .collect();
    out.sort_by(compare_nodes);
    out
}

/// Nests flat `a/b/c` file paths into a tree.
///
/// # Example
/// ```
/// use openhub::tree::{build_tree, NodeKind};
///
/// let tree = build_tree(&["src/main.rs", "README.md"]);
/// assert_eq!(tree[0].name, "src");
/// assert_eq!(tree[0].kind, NodeKind::Folder);
/// assert_eq!(tree[1].name, "README.md");
/// ```
pub fn build_tree<S: AsRef<str>>(paths: &[S]) -> Vec<TreeNode> {
    let mut root = BTreeMap::new();
    for path in paths {
        insert_path(&mut root, path.as_ref(), NodeKind::File);
    }
    finish(root)
}

/// Nests GitHub tree entries. `tree` entries become folders even when
/// nothing inside them is listed.
pub fn nest_github_tree(entries: &[TreeEntry]) -> Vec<TreeNode> {
    let mut root = BTreeMap::new();
    for entry in entries {
        let kind = if entry.is_tree() {
            NodeKind::Folder
        } else {
            NodeKind::File
        };
        insert_path(&mut root, &entry.path, kind);
    }
    finish(root)
}

/// Keeps only blobs, flattened with their detected technologies.
pub fn flatten_blobs(entries: &[TreeEntry]) -> Vec<FlatFile> {
    entries
        .iter()
        .filter(|e| e.is_blob())
        .map(|e| FlatFile {
            name: e.path.rsplit('/').next().unwrap_or(&e.path).to_string(),
            kind: NodeKind::File,
            path: e.path.clone(),
            technologies: detect_technologies(&e.path),
            size: e.size,
            sha: e.sha.clone(),
        })
        .collect()
}

/// Lists every file under `root` as a relative `/`-separated path.
///
/// Hidden files are included and `.gitignore` is not consulted. Directories
/// named in `ignore_dirs` are skipped entirely.
pub fn walk_dir(root: &Path, ignore_dirs: &[String]) -> Result<Vec<String>> {
    let ignore_dirs = ignore_dirs.to_vec();
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .hidden(false)
        .git_ignore(false)
        .follow_links(false)
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            !(is_dir
                && entry.depth() > 0
                && ignore_dirs
                    .iter()
                    .any(|d| entry.file_name().to_str() == Some(d.as_str())))
        })
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if entry.file_type().is_some_and(|t| t.is_dir()) {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if !relative.is_empty() {
            files.push(relative);
        }
    }

    files.sort();
    Ok(files)
}
