//! Finder factory - pick the finder for a target file by its shape

use std::path::Path;

use super::{Finder, FinderKind};
use crate::core::layout::ProjectLayout;
use crate::core::paths::extension_of;

const IMAGE_TYPES: &[&str] = &["png", "gif", "jpg"];
const TEMPLATE_TYPES: &[&str] = &["erb", "rhtml", "rxml"];

/// Kind of finder that handles `target`, or `None` for an unsupported
/// file type. `target` must already be absolute.
pub fn kind_for(project: &ProjectLayout, target: &Path) -> Option<FinderKind> {
    let extension = extension_of(target).unwrap_or_default();
    let kind = match extension.as_str() {
        "css" => FinderKind::Stylesheet,
        "js" => FinderKind::JavaScript,
        ext if IMAGE_TYPES.contains(&ext) => FinderKind::Image,
        ext if TEMPLATE_TYPES.contains(&ext) => {
            let partial = target
                .file_name()
                .is_some_and(|name| name.to_string_lossy().starts_with('_'));
            if partial {
                FinderKind::PartialTemplate
            } else if target.starts_with(project.layouts_root()) {
                FinderKind::LayoutTemplate
            } else {
                FinderKind::Template
            }
        }
        _ if project.is_public(target) => FinderKind::PublicFile,
        _ => return None,
    };
    Some(kind)
}

/// Build the finder for `target` (root-relative or absolute)
pub fn generate<'p>(project: &'p ProjectLayout, target: &Path) -> Option<Finder<'p>> {
    let full = project.absolutize(target);
    let kind = kind_for(project, &full)?;
    Some(Finder::new(kind, project, &full))
}
