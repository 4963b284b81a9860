//! csproj discovery with ignore-directory support
//!
//! Walks a root directory for `*.csproj` files, skipping any file whose
//! directory chain contains an ignored directory name. The ignore list is
//! a fixed set of well-known build/tooling directories unless a
//! `.dotupignore` file at the root replaces it outright.

use std::fs;
use std::path::{Path, PathBuf};

/// Well-known directories that never contain projects worth scanning
const DEFAULT_IGNORE_DIRS: &[&str] = &[
    ".git",
    ".github",
    ".vs",
    ".vscode",
    "bin",
    "obj",
    "packages",
    "node_modules",
];

/// Name of the optional ignore file at the scan root
pub const IGNORE_FILE: &str = ".dotupignore";

/// Resolve the ignore-directory list for a scan root
///
/// If `.dotupignore` exists its non-blank lines fully replace the
/// defaults; a missing file means "use defaults". There is no parse error
/// to handle: every line is taken verbatim as a directory name.
pub fn resolve_ignore_dirs(root: &Path) -> Vec<String> {
    let ignore_file = root.join(IGNORE_FILE);
    match fs::read_to_string(&ignore_file) {
        Ok(content) => content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
        Err(_) => DEFAULT_IGNORE_DIRS.iter().map(|d| d.to_string()).collect(),
    }
}

/// Whether any directory in the file's chain up to the filesystem root is
/// on the ignore list (case-insensitive)
pub fn is_ignored(file: &Path, ignore_dirs: &[String]) -> bool {
    if ignore_dirs.is_empty() {
        return false;
    }

    let mut current = file.parent();
    while let Some(dir) = current {
        if let Some(name) = dir.file_name().and_then(|n| n.to_str()) {
            if ignore_dirs.iter().any(|d| d.eq_ignore_ascii_case(name)) {
                return true;
            }
        }
        current = dir.parent();
    }

    false
}

/// Enumerate csproj files under `root`, honoring the ignore list
///
/// Results are sorted so processing order is deterministic. Inaccessible
/// directories are silently skipped.
pub fn locate_projects(root: &Path, recursive: bool, ignore_dirs: &[String]) -> Vec<PathBuf> {
    let mut projects = Vec::new();

    if recursive {
        let mut pending = vec![root.to_path_buf()];
        while let Some(dir) = pending.pop() {
            let Ok(entries) = fs::read_dir(&dir) else {
                continue;
            };
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    let skip = path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|name| {
                            ignore_dirs.iter().any(|d| d.eq_ignore_ascii_case(name))
                        });
                    if !skip {
                        pending.push(path);
                    }
                } else if is_project_file(&path) && !is_ignored(&path, ignore_dirs) {
                    projects.push(path);
                }
            }
        }
    } else if let Ok(entries) = fs::read_dir(root) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() && is_project_file(&path) && !is_ignored(&path, ignore_dirs) {
                projects.push(path);
            }
        }
    }

    projects.sort();
    projects
}

fn is_project_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csproj"))
}
