//! Finders - one reference-matching strategy per asset category
//!
//! A [`Finder`] is built for one target file by [`factory::generate`]. Its
//! [`FinderKind`] decides which candidate files are scanned and, per
//! candidate extension, which line matchers run.

pub mod attributes;
pub mod factory;
pub mod helpers;
pub mod image;
pub mod javascript;
pub mod layout_template;
pub mod public_file;
pub mod resolve;
pub mod stylesheet;
pub mod template;

use std::path::{Path, PathBuf};

use once_cell::unsync::OnceCell;

use crate::backends::collect::each_usage;
use crate::backends::scan::ScanOptions;
use crate::core::layout::ProjectLayout;
use crate::core::model::Usage;
use crate::core::paths::{extension_of, stem_before_first_dot};

pub use factory::generate;

/// A line matcher: does `line` of the candidate described by the context
/// reference the finder's target?
pub type LineMatcher = fn(&Finder<'_>, &FileContext, &str) -> bool;

/// The asset category a finder handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FinderKind {
    Stylesheet,
    JavaScript,
    Image,
    Template,
    PartialTemplate,
    LayoutTemplate,
    PublicFile,
}

impl FinderKind {
    /// Candidate file extensions this kind scans
    pub fn file_types(&self) -> &'static [&'static str] {
        match self {
            FinderKind::Stylesheet => stylesheet::FILE_TYPES,
            FinderKind::JavaScript => javascript::FILE_TYPES,
            FinderKind::Image => image::FILE_TYPES,
            FinderKind::Template | FinderKind::PartialTemplate | FinderKind::LayoutTemplate => {
                template::FILE_TYPES
            }
            FinderKind::PublicFile => public_file::FILE_TYPES,
        }
    }

    /// Line matchers for a candidate with extension `ext`
    pub fn matchers(&self, ext: &str) -> &'static [LineMatcher] {
        match self {
            FinderKind::Stylesheet => stylesheet::matchers(ext),
            FinderKind::JavaScript => javascript::matchers(ext),
            FinderKind::Image => image::matchers(ext),
            FinderKind::Template => template::matchers(ext),
            FinderKind::PartialTemplate => template::partial_matchers(ext),
            FinderKind::LayoutTemplate => layout_template::matchers(ext),
            FinderKind::PublicFile => public_file::matchers(ext),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FinderKind::Stylesheet => "stylesheet",
            FinderKind::JavaScript => "javascript",
            FinderKind::Image => "image",
            FinderKind::Template => "template",
            FinderKind::PartialTemplate => "partial",
            FinderKind::LayoutTemplate => "layout",
            FinderKind::PublicFile => "public",
        }
    }
}

impl std::fmt::Display for FinderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a matcher needs to know about the candidate file beyond one line
#[derive(Debug, Clone)]
pub struct FileContext {
    pub path: PathBuf,
    /// Lowercased final extension
    pub extension: String,
    /// Whether the candidate itself lives under the public root
    pub in_public: bool,
    /// Views directory `action:` and bare `partial:` names resolve in
    pub views_dir: Option<PathBuf>,
    /// Set when the candidate is a controller source file
    pub controller: Option<template::ControllerFile>,
    /// Whether the candidate declares a `layout` anywhere
    pub declares_layout: bool,
}

/// Finds the usages of one target file
#[derive(Debug)]
pub struct Finder<'p> {
    kind: FinderKind,
    project: &'p ProjectLayout,
    full_target_path: PathBuf,
    target_basename: String,
    scan: ScanOptions,
    usages: OnceCell<Vec<Usage>>,
}

impl<'p> Finder<'p> {
    /// `target` is resolved against the project root unless absolute
    pub fn new(kind: FinderKind, project: &'p ProjectLayout, target: &Path) -> Self {
        let full_target_path = project.absolutize(target);
        let target_basename = stem_before_first_dot(&full_target_path);
        Self {
            kind,
            project,
            full_target_path,
            target_basename,
            scan: ScanOptions::default(),
            usages: OnceCell::new(),
        }
    }

    pub fn with_scan_options(mut self, scan: ScanOptions) -> Self {
        self.scan = scan;
        self.usages = OnceCell::new();
        self
    }

    pub fn kind(&self) -> FinderKind {
        self.kind
    }

    pub fn project(&self) -> &ProjectLayout {
        self.project
    }

    /// Absolute, lexically normalized target path
    pub fn full_target_path(&self) -> &Path {
        &self.full_target_path
    }

    /// Target file name up to its first '.'
    pub fn target_basename(&self) -> &str {
        &self.target_basename
    }

    pub fn scan_options(&self) -> &ScanOptions {
        &self.scan
    }

    /// All usages of the target, scanned on first call and cached
    pub fn usages(&self) -> &[Usage] {
        self.usages.get_or_init(|| each_usage(self))
    }

    /// Inspect a whole candidate before its lines are matched
    pub fn context_for(&self, path: &Path, content: &str) -> FileContext {
        let extension = extension_of(path).unwrap_or_default();
        let mut context = FileContext {
            path: path.to_path_buf(),
            in_public: self.project.is_public(path),
            views_dir: None,
            controller: None,
            declares_layout: false,
            extension,
        };
        if matches!(
            self.kind,
            FinderKind::Template | FinderKind::PartialTemplate | FinderKind::LayoutTemplate
        ) {
            context.views_dir = template::views_dir_for(self.project, path);
            context.controller = template::ControllerFile::detect(self.project, path);
        }
        if self.kind == FinderKind::LayoutTemplate && context.extension == "rb" {
            context.declares_layout = layout_template::declares_layout(content);
        }
        context
    }

    /// Whether any matcher for the candidate's extension accepts `line`
    pub fn matches_line(&self, context: &FileContext, line: &str) -> bool {
        self.kind
            .matchers(&context.extension)
            .iter()
            .any(|matcher| matcher(self, context, line))
    }

    /// `path` is exactly the target
    pub fn is_target(&self, path: &Path) -> bool {
        path == self.full_target_path
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::fs;
    use std::path::Path;

    use super::*;

    pub fn write_file(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    /// Run one finder's matchers over a single in-memory line
    pub fn line_matches(finder: &Finder<'_>, candidate: &str, line: &str) -> bool {
        let path = finder.project().absolutize(Path::new(candidate));
        let context = finder.context_for(&path, line);
        finder.matches_line(&context, line)
    }

    /// Same as [`line_matches`] but the context sees the whole candidate
    pub fn line_matches_in(finder: &Finder<'_>, candidate: &str, content: &str, line: &str) -> bool {
        let path = finder.project().absolutize(Path::new(candidate));
        let context = finder.context_for(&path, content);
        finder.matches_line(&context, line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basename_and_full_path() {
        let project = ProjectLayout::new("/p");
        let finder = Finder::new(
            FinderKind::LayoutTemplate,
            &project,
            Path::new("app/views/layouts/../layouts/hello.html.erb"),
        );
        assert_eq!(
            finder.full_target_path(),
            Path::new("/p/app/views/layouts/hello.html.erb")
        );
        assert_eq!(finder.target_basename(), "hello");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(FinderKind::PartialTemplate.to_string(), "partial");
        assert_eq!(FinderKind::PublicFile.as_str(), "public");
    }

    #[test]
    fn test_unknown_extension_has_no_matchers() {
        for kind in [
            FinderKind::Stylesheet,
            FinderKind::JavaScript,
            FinderKind::Image,
            FinderKind::Template,
            FinderKind::PartialTemplate,
            FinderKind::LayoutTemplate,
            FinderKind::PublicFile,
        ] {
            assert!(kind.matchers("py").is_empty(), "{kind} matches .py");
            for ext in kind.file_types() {
                assert!(!kind.matchers(ext).is_empty(), "{kind} has no matcher for {ext}");
            }
        }
    }
}
