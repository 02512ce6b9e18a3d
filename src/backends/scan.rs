//! Candidate file enumeration
//!
//! Walks the project tree with the ignore crate, keeping files whose
//! lowercased final extension is in the finder's scan set.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::debug;

use crate::core::file_reader::FileReadConfig;
use crate::core::paths::extension_of;

/// Version-control metadata never holds project sources
const VCS_DIRS: &[&str] = &[".git", ".svn", ".hg"];

/// How candidate files are enumerated and read
#[derive(Debug, Clone, Copy)]
pub struct ScanOptions {
    /// Honor `.gitignore`, `.ignore` and git exclude files
    pub respect_ignore: bool,
    /// Keep each matched line's text; otherwise it is re-read on demand
    pub capture_text: bool,
    pub read: FileReadConfig,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            respect_ignore: true,
            capture_text: true,
            read: FileReadConfig::default(),
        }
    }
}

impl ScanOptions {
    pub fn with_respect_ignore(mut self, respect_ignore: bool) -> Self {
        self.respect_ignore = respect_ignore;
        self
    }

    pub fn with_capture_text(mut self, capture_text: bool) -> Self {
        self.capture_text = capture_text;
        self
    }
}

/// Every file under `root` with one of `extensions`, in file-name order.
///
/// Dot-prefixed entries are included. Entries that cannot be read are
/// logged and skipped.
pub fn candidate_files(root: &Path, extensions: &[&str], opts: &ScanOptions) -> Vec<PathBuf> {
    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(false)
        .parents(opts.respect_ignore)
        .ignore(opts.respect_ignore)
        .git_ignore(opts.respect_ignore)
        .git_global(opts.respect_ignore)
        .git_exclude(opts.respect_ignore)
        .require_git(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(|entry| {
            let is_vcs = entry.file_type().is_some_and(|ft| ft.is_dir())
                && VCS_DIRS.iter().any(|dir| entry.file_name() == *dir);
            !is_vcs
        });

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                debug!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let matches = extension_of(entry.path()).is_some_and(|ext| extensions.contains(&ext.as_str()));
        if matches {
            files.push(entry.into_path());
        }
    }
    files
}
