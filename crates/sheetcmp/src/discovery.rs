//! Finding file pairs under a root folder
//!
//! Every direct sub-directory of the root is a target. A target holds exactly two
//! sub-directories; sorted by name, the first is V1 and the second V2.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::source::extension_of;

/// A pair of files ready for comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairJob {
    /// Target folder name
    pub target: String,
    /// Target folder, where reports are written
    pub dir: PathBuf,
    pub v1: PathBuf,
    pub v2: PathBuf,
}

/// Why a target cannot be compared
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryIssue {
    /// The target does not hold exactly two sub-directories
    FolderError { found: usize },
    /// One or both sides hold no file with a supported extension
    MissingFile { extensions: Vec<String> },
    /// The target folder or one of its sides could not be listed
    Unreadable { reason: String },
}

impl DiscoveryIssue {
    /// Short label for console summaries
    pub fn label(&self) -> &'static str {
        match self {
            DiscoveryIssue::FolderError { .. } => "Folder Error",
            DiscoveryIssue::MissingFile { .. } => "Missing File",
            DiscoveryIssue::Unreadable { .. } => "Read Error",
        }
    }
}

impl fmt::Display for DiscoveryIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryIssue::FolderError { found } => {
                write!(f, "Expected 2 subfolders, found {}", found)
            }
            DiscoveryIssue::MissingFile { extensions } => {
                let list: Vec<String> = extensions.iter().map(|e| format!(".{}", e)).collect();
                write!(f, "Missing {} in one or both subfolders.", list.join("/"))
            }
            DiscoveryIssue::Unreadable { reason } => f.write_str(reason),
        }
    }
}

/// One entry found under the root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Pair(PairJob),
    Issue { target: String, issue: DiscoveryIssue },
}

impl Target {
    /// Target folder name
    pub fn name(&self) -> &str {
        match self {
            Target::Pair(job) => &job.target,
            Target::Issue { target, .. } => target,
        }
    }
}

/// List the targets under `root`, sorted by name
///
/// `extensions` are matched case-insensitively. Within a side folder the first
/// file by name wins, and Office lock files (`~$...`) are ignored.
pub fn discover<P: AsRef<Path>>(root: P, extensions: &[String]) -> Result<Vec<Target>> {
    let root = root.as_ref();
    let mut targets = Vec::new();

    for dir in sorted_entries(root, EntryKind::Dir)? {
        let target = dir_name(&dir);
        let found = inspect_target(&target, &dir, extensions).unwrap_or_else(|e| {
            tracing::warn!(folder = %target, error = %e, "target folder unreadable");
            Target::Issue {
                target: target.clone(),
                issue: DiscoveryIssue::Unreadable {
                    reason: e.to_string(),
                },
            }
        });
        targets.push(found);
    }

    Ok(targets)
}

/// Classify one target folder
///
/// A failure to read inside the folder is returned so that only this target
/// is affected.
fn inspect_target(target: &str, dir: &Path, extensions: &[String]) -> Result<Target> {
    let sides = sorted_entries(dir, EntryKind::Dir)?;
    if sides.len() != 2 {
        tracing::debug!(folder = %target, found = sides.len(), "skipping target");
        return Ok(Target::Issue {
            target: target.to_string(),
            issue: DiscoveryIssue::FolderError { found: sides.len() },
        });
    }

    let v1 = first_file(&sides[0], extensions)?;
    let v2 = first_file(&sides[1], extensions)?;
    Ok(match (v1, v2) {
        (Some(v1), Some(v2)) => Target::Pair(PairJob {
            target: target.to_string(),
            dir: dir.to_path_buf(),
            v1,
            v2,
        }),
        _ => Target::Issue {
            target: target.to_string(),
            issue: DiscoveryIssue::MissingFile {
                extensions: extensions.to_vec(),
            },
        },
    })
}

#[derive(Clone, Copy, PartialEq)]
enum EntryKind {
    Dir,
    File,
}

fn sorted_entries(dir: &Path, kind: EntryKind) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::io(dir, e))?.path();
        let matches = match kind {
            EntryKind::Dir => path.is_dir(),
            EntryKind::File => path.is_file(),
        };
        if matches {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn first_file(dir: &Path, extensions: &[String]) -> Result<Option<PathBuf>> {
    Ok(sorted_entries(dir, EntryKind::File)?.into_iter().find(|path| {
        let is_lock_file = path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(false, |n| n.starts_with("~$"));
        !is_lock_file
            && extension_of(path)
                .map_or(false, |ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)))
    }))
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
