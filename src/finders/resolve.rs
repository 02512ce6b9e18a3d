//! Reference resolution
//!
//! Turns the textual reference found in a candidate file into the absolute
//! path it names, so it can be compared with the target. References are
//! never turned into patterns; they are only ever compared after
//! resolution.

use std::path::{Path, PathBuf};

use crate::core::layout::ProjectLayout;
use crate::core::paths::{absolutize, normalize_lexically};

const EXTERNAL_SCHEMES: &[&str] = &["http:", "https:", "ftp:", "data:", "mailto:", "javascript:"];

/// Strip URL decorations and reject references that can never name a file
/// in the tree (external URLs, interpolated strings, empty references).
pub fn clean_reference(reference: &str) -> Option<&str> {
    let reference = reference.trim();
    if reference.starts_with("//") || reference.contains("#{") || reference.contains("<%") {
        return None;
    }
    let lowered = reference.to_ascii_lowercase();
    if EXTERNAL_SCHEMES.iter().any(|s| lowered.starts_with(s)) {
        return None;
    }

    let end = reference.find(['?', '#']).unwrap_or(reference.len());
    let cleaned = &reference[..end];
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Resolve a URL-style reference made from `referencing_file`.
///
/// A leading `/` makes the reference root-relative: it names a file under
/// the public root. Anything else is relative to the referencing file's
/// directory.
pub fn resolve(
    project: &ProjectLayout,
    reference: &str,
    referencing_file: &Path,
) -> Option<PathBuf> {
    let reference = clean_reference(reference)?;
    match reference.strip_prefix('/') {
        Some(rest) => Some(normalize_lexically(&project.public_root().join(rest))),
        None => {
            let dir = referencing_file.parent()?;
            Some(absolutize(dir, Path::new(reference)))
        }
    }
}

/// Resolve a reference against the public root whether or not it carries
/// a leading `/`.
pub fn resolve_from_site_root(project: &ProjectLayout, reference: &str) -> Option<PathBuf> {
    let reference = clean_reference(reference)?;
    let rest = reference.trim_start_matches('/');
    Some(normalize_lexically(&project.public_root().join(rest)))
}

/// Resolve the name given to an asset helper (`stylesheet_link_tag "main"`).
///
/// Plain names live in `asset_dir`; `/`-prefixed names are root-relative.
/// `extension` is appended when the name does not already end with it.
pub fn resolve_helper_asset(
    project: &ProjectLayout,
    name: &str,
    asset_dir: &Path,
    extension: Option<&str>,
) -> Option<PathBuf> {
    let name = clean_reference(name)?;
    let mut file_name = match extension {
        Some(ext) if !name.ends_with(&format!(".{}", ext)) => format!("{}.{}", name, ext),
        _ => name.to_string(),
    };
    let base = match name.strip_prefix('/') {
        Some(_) => {
            file_name.remove(0);
            project.public_root().to_path_buf()
        }
        None => asset_dir.to_path_buf(),
    };
    Some(normalize_lexically(&base.join(file_name)))
}
