use std::collections::HashSet;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::Result;

/// `export-<millis>.zip`
pub fn archive_name() -> String {
    format!("export-{}.zip", chrono::Utc::now().timestamp_millis())
}

/// Zips the selected paths of `root` into memory.
///
/// Directories are added recursively. Entries are named by their path
/// relative to `root`, so overlapping selections (a folder plus a file in
/// it) store each file once. Entries that do not exist or resolve outside
/// `root` are skipped.
pub fn compress_selection(root: &Path, selection: &[String]) -> Result<Vec<u8>> {
    let root = root.canonicalize()?;
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(9));
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let mut written: HashSet<String> = HashSet::new();

    for rel in selection {
        let rel = rel.trim_start_matches(['/', '\\']).replace('\\', "/");
        let Some(abs) = resolve_inside(&root, &rel) else {
            tracing::debug!("Skipping selection entry '{}'", rel);
            continue;
        };

        let files = if abs.is_dir() {
            directory_files(&root, &abs)
        } else {
            entry_name(&root, &abs)
                .map(|name| vec![(name, abs.clone())])
                .unwrap_or_default()
        };

        for (name, path) in files {
            if !written.insert(name.clone()) {
                tracing::debug!("'{}' already in the archive", name);
                continue;
            }
            zip.start_file(name, options)?;
            zip.write_all(&fs::read(path)?)?;
        }
    }

    Ok(zip.finish()?.into_inner())
}

fn resolve_inside(root: &Path, rel: &str) -> Option<PathBuf> {
    let abs = root.join(rel).canonicalize().ok()?;
    if abs.starts_with(root) {
        Some(abs)
    } else {
        tracing::warn!("Selection entry '{}' resolves outside the repository", rel);
        None
    }
}

/// Archive name of `path`: its `/`-separated path relative to `root`.
fn entry_name(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let name = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    (!name.is_empty()).then_some(name)
}

/// Every file under `dir` with its archive name.
fn directory_files(root: &Path, dir: &Path) -> Vec<(String, PathBuf)> {
    let mut files: Vec<(String, PathBuf)> = WalkBuilder::new(dir)
        .standard_filters(false)
        .hidden(false)
        .follow_links(false)
        .build()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .filter_map(|entry| Some((entry_name(root, entry.path())?, entry.path().to_path_buf())))
        .collect();
    files.sort();
    files
}
