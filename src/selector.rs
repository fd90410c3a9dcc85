//! Decides which posts a run should translate.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

use crate::ui::Style;

/// How the user asked for files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The most recently modified post under the source directory.
    Latest,
    /// A file or directory; `None` means the source directory.
    Path { target: Option<PathBuf>, force: bool },
}

/// Recursively collects posts under `dir` with one of `extensions`, sorted.
pub fn find_posts(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut posts = Vec::new();

    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry
            .with_context(|| format!("Failed to read directory entry under {}", dir.display()))?;
        if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
            posts.push(entry.into_path());
        }
    }

    posts.sort();
    Ok(posts)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            extensions
                .iter()
                .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext))
        })
}

/// Whether `path` sits in one of `output_dirs` below `root`.
///
/// Only directories between `root` and the file count, so scanning an
/// output directory itself still finds its posts.
fn in_output_dir(root: &Path, path: &Path, output_dirs: &[String]) -> bool {
    let Some(parent) = path.parent() else {
        return false;
    };
    let Ok(relative) = parent.strip_prefix(root) else {
        return false;
    };
    relative.components().any(|c| {
        c.as_os_str().to_str().is_some_and(|name| {
            output_dirs
                .iter()
                .any(|dir| dir.eq_ignore_ascii_case(name))
        })
    })
}

/// Posts under `root` that are sources, not earlier translations.
fn find_sources(root: &Path, extensions: &[String], output_dirs: &[String]) -> Result<Vec<PathBuf>> {
    Ok(find_posts(root, extensions)?
        .into_iter()
        .filter(|p| !in_output_dir(root, p, output_dirs))
        .collect())
}

/// The source post under `dir` with the newest modification time.
pub fn latest_post(
    dir: &Path,
    extensions: &[String],
    output_dirs: &[String],
) -> Result<Option<PathBuf>> {
    let mut latest: Option<(SystemTime, PathBuf)> = None;

    for path in find_sources(dir, extensions, output_dirs)? {
        let modified = std::fs::metadata(&path)
            .and_then(|m| m.modified())
            .with_context(|| format!("Failed to read modification time: {}", path.display()))?;
        if latest.as_ref().is_none_or(|(newest, _)| modified > *newest) {
            latest = Some((modified, path));
        }
    }

    Ok(latest.map(|(_, path)| path))
}
/// Resolves a selection into the list of posts to process.
///
/// Posts inside one of `output_dirs` (relative to the scanned directory) are
/// translations from an earlier run and never selected by a scan.
/// `is_translated` tells whether every target output of a post already
/// exists; such posts are skipped in a directory scan unless `force` is set.
/// A path that does not exist is reported and yields no files.
pub fn select_files(
    selection: &Selection,
    source_dir: &Path,
    extensions: &[String],
    output_dirs: &[String],
    is_translated: impl Fn(&Path) -> bool,
) -> Result<Vec<PathBuf>> {
    match selection {
        Selection::Latest => {
            crate::status!(
                "{} Looking for the most recently modified file in {}...",
                Style::label("[INFO]"),
                source_dir.display()
            );
            if !source_dir.is_dir() {
                crate::warn!(
                    "{} Source directory does not exist: {}",
                    Style::error("[ERROR]"),
                    source_dir.display()
                );
                return Ok(Vec::new());
            }
            match latest_post(source_dir, extensions, output_dirs)? {
                Some(path) => {
                    crate::status!(
                        "{} Found latest file: {}",
                        Style::label("[INFO]"),
                        Style::value(path.file_name().unwrap_or_default().to_string_lossy())
                    );
                    Ok(vec![path])
                }
                None => {
                    crate::warn!(
                        "{} No posts found in {}",
                        Style::error("[ERROR]"),
                        source_dir.display()
                    );
                    Ok(Vec::new())
                }
            }
        }
        Selection::Path { target, force } => {
            let path = target.as_deref().unwrap_or(source_dir);

            if path.is_file() {
                crate::status!(
                    "{} Target is a single file: {}",
                    Style::label("[INFO]"),
                    Style::value(path.file_name().unwrap_or_default().to_string_lossy())
                );
                return Ok(vec![path.to_path_buf()]);
            }

            if !path.is_dir() {
                crate::warn!(
                    "{} Path does not exist: {}",
                    Style::error("[ERROR]"),
                    path.display()
                );
                return Ok(Vec::new());
            }

            crate::status!(
                "{} Target is a directory. Scanning: {}",
                Style::label("[INFO]"),
                path.display()
            );
            let posts = find_sources(path, extensions, output_dirs)?;

            if *force {
                crate::status!(
                    "{} Force mode: included all {} files.",
                    Style::label("[INFO]"),
                    posts.len()
                );
                return Ok(posts);
            }

            let pending: Vec<PathBuf> = posts.into_iter().filter(|p| !is_translated(p)).collect();
            crate::status!(
                "{} Found {} files to translate.",
                Style::label("[INFO]"),
                pending.len()
            );
            Ok(pending)
        }
    }
}
