//! Path normalization utilities
//!
//! Every comparison the finders make is between absolute, lexically
//! normalized paths. Nothing here touches the filesystem.

use std::path::{Component, Path, PathBuf};

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Make a path relative to the root directory
pub fn make_relative(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(normalize_path)
}

/// Collapse `.` and `..` components without consulting the filesystem.
///
/// `..` at the filesystem root stays at the root, so the result of
/// normalizing an absolute path is always absolute.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(out.components().next_back(), Some(Component::Normal(_)));
                if popped {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Join `relative` onto `base` (unless it is already absolute) and normalize.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_lexically(path)
    } else {
        normalize_lexically(&base.join(path))
    }
}

/// The lowercased final extension of a path (`show.html.erb` -> `erb`).
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// File name up to its first '.' (`hello.html.erb` -> `hello`).
pub fn stem_before_first_dot(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.find('.') {
        Some(0) | None => name,
        Some(idx) => name[..idx].to_string(),
    }
}

/// Remove every extension from the final component of `path`.
pub fn strip_all_extensions(path: &Path) -> PathBuf {
    let stem = stem_before_first_dot(path);
    match path.parent() {
        Some(parent) => parent.join(stem),
        None => PathBuf::from(stem),
    }
}

/// `path` equals `logical` or continues it with a `.`-started suffix.
///
/// Logical template names omit format and handler extensions, so
/// `app/views/layouts/test` names `app/views/layouts/test.html.erb` but
/// never `app/views/layouts/test2.html.erb`.
pub fn is_logical_prefix(logical: &Path, path: &Path) -> bool {
    let logical = logical.as_os_str().to_string_lossy();
    let path = path.as_os_str().to_string_lossy();
    match path.strip_prefix(logical.as_ref()) {
        Some(rest) => rest.is_empty() || rest.starts_with('.'),
        None => false,
    }
}
