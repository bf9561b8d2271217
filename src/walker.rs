//! Directory discovery for the `pipeline` CLI command. Grounded on the
//! teacher's `FileWalker::walk` (an `ignore::WalkBuilder` over the root,
//! respecting `.gitignore`); the watch-mode half of the teacher's walker
//! (`notify`) has no counterpart here — this core processes a batch of
//! paths, it doesn't run a long-lived indexing daemon.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

const DEFAULT_IGNORES: &[&str] = &[
    ".git",
    "node_modules",
    "target",
    "dist",
    "build",
    "__pycache__",
    ".mypy_cache",
    ".pytest_cache",
];

pub struct FileWalker {
    ignore_patterns: Vec<String>,
}

impl FileWalker {
    pub fn new() -> Self {
        Self {
            ignore_patterns: DEFAULT_IGNORES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns.extend(patterns);
        self
    }

    /// Expands `roots` (files pass through unchanged, directories are
    /// walked) into a flat, ignore-filtered file list.
    pub fn collect(&self, roots: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for root in roots {
            if root.is_file() {
                if !self.should_ignore(root) {
                    files.push(root.clone());
                }
                continue;
            }
            let walker = WalkBuilder::new(root)
                .hidden(false)
                .git_ignore(true)
                .git_global(true)
                .git_exclude(true)
                .build();
            for entry in walker {
                let entry = entry?;
                let path = entry.path();
                if path.is_file() && !self.should_ignore(path) {
                    files.push(path.to_path_buf());
                }
            }
        }
        Ok(files)
    }

    fn should_ignore(&self, path: &Path) -> bool {
        let text = path.to_string_lossy();
        self.ignore_patterns.iter().any(|p| text.contains(p.as_str()))
    }
}

impl Default for FileWalker {
    fn default() -> Self {
        Self::new()
    }
}
