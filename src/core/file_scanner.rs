//! Source file discovery.
//!
//! Includes are directories, files, or glob patterns relative to the base
//! directory. Every file found here may be rewritten in place, so dependency
//! and build-output directories are pruned from the walk no matter what the
//! configuration says.

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use glob::{Pattern, glob};
use walkdir::{DirEntry, WalkDir};

use crate::config::TEST_FILE_PATTERNS;

/// Directories that hold installed packages or generated output.
pub const EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    "bower_components",
    "dist",
    "build",
    "out",
    "coverage",
];

/// Sorted, so runs process files in a stable order.
pub struct ScanResult {
    pub files: BTreeSet<String>,
    /// Entries the walk could not read.
    pub unreadable: usize,
}

/// User ignores plus, optionally, the test file patterns.
///
/// Patterns with `*` or `?` are globs over the full path. Anything else is a
/// literal path under the base directory and ignores everything below it.
struct IgnoreSet {
    prefixes: Vec<PathBuf>,
    globs: Vec<Pattern>,
}

impl IgnoreSet {
    fn new(base_dir: &Path, ignores: &[String], ignore_test_files: bool) -> Self {
        let mut set = Self {
            prefixes: Vec::new(),
            globs: Vec::new(),
        };
        for ignore in ignores {
            if !is_glob_pattern(ignore) {
                set.prefixes.push(base_dir.join(ignore));
                continue;
            }
            match Pattern::new(ignore) {
                Ok(pattern) => set.globs.push(pattern),
                Err(e) => tracing::warn!("Invalid ignore pattern '{}': {}", ignore, e),
            }
        }
        if ignore_test_files {
            set.globs
                .extend(TEST_FILE_PATTERNS.iter().filter_map(|p| Pattern::new(p).ok()));
        }
        set
    }

    fn matches(&self, path: &Path) -> bool {
        self.prefixes.iter().any(|prefix| path.starts_with(prefix))
            || self.globs.iter().any(|glob| glob.matches_path(path))
    }
}

fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Dependency, build-output and hidden directories below a walk root.
fn is_pruned(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| EXCLUDED_DIRS.contains(&name) || name.starts_with('.'))
}

/// JavaScript or TypeScript sources that can hold markup. Declaration files
/// and minified bundles never do.
fn is_source_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.ends_with(".d.ts") || name.ends_with(".min.js") {
        return false;
    }
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("tsx" | "ts" | "jsx" | "js")
    )
}

fn walk_roots(base_dir: &Path, includes: &[String]) -> Vec<PathBuf> {
    if includes.is_empty() {
        return vec![base_dir.to_path_buf()];
    }

    let mut roots = Vec::new();
    for include in includes {
        let path = base_dir.join(include);
        if is_glob_pattern(include) {
            match glob(&path.to_string_lossy()) {
                Ok(entries) => roots.extend(entries.flatten()),
                Err(e) => tracing::warn!("Invalid glob pattern '{}': {}", include, e),
            }
        } else if path.exists() {
            roots.push(path);
        } else {
            tracing::warn!("Include path does not exist: {}", path.display());
        }
    }
    roots
}

/// Collect the source files under `includes`.
pub fn scan_files(
    base_dir: &Path,
    includes: &[String],
    ignores: &[String],
    ignore_test_files: bool,
) -> ScanResult {
    let ignore_set = IgnoreSet::new(base_dir, ignores, ignore_test_files);
    let mut result = ScanResult {
        files: BTreeSet::new(),
        unreadable: 0,
    };

    for root in walk_roots(base_dir, includes) {
        let walk = WalkDir::new(&root)
            .into_iter()
            .filter_entry(|entry| !is_pruned(entry) && !ignore_set.matches(entry.path()));
        for entry in walk {
            match entry {
                Ok(entry) if entry.file_type().is_file() && is_source_file(entry.path()) => {
                    result.files.insert(entry.path().to_string_lossy().into_owned());
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Cannot access path: {}", e);
                    result.unreadable += 1;
                }
            }
        }
    }

    tracing::debug!("Found {} source files under {}", result.files.len(), base_dir.display());
    result
}
