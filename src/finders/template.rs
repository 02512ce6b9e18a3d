//! Template and partial finders
//!
//! Templates are referenced by logical name from `render` calls:
//!
//! - `:template => "users/show"` names a file under the views root
//! - `:action => "edit"` names a file in the current controller's views dir
//! - `:file => "/abs/or/project/relative.html.erb"` names an exact file
//! - `:partial => "form"` (partials only) names `_form` next to the action
//!
//! Logical names omit format and handler extensions, so template and action
//! references match when they are a `.`-bounded prefix of the target path.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use super::{FileContext, Finder, LineMatcher};
use crate::core::layout::ProjectLayout;
use crate::core::paths::{absolutize, is_logical_prefix, normalize_lexically};

pub const FILE_TYPES: &[&str] = &["rb", "erb", "rhtml", "rxml"];

const CONTROLLER_SUFFIX: &str = "_controller.rb";

/// `render`, `render_to_string`, `render_component`...
static RENDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\brender(?:_\w+)?\b").expect("Invalid RENDER_RE regex"));

/// `:key => "value"` or `key: "value"`
static OPTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?::(\w+)\s*=>|\b(\w+):)\s*["']([^"']+)["']"#).expect("Invalid OPTION_RE regex")
});

/// A bare string as the first argument: `render "posts/show"`
static BARE_ARG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*\(?\s*["']([^"']+)["']"#).expect("Invalid BARE_ARG_RE regex")
});

/// Which form of logical name a render call used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderKey {
    Template,
    Action,
    File,
    Partial,
    Layout,
}

impl RenderKey {
    fn from_option(key: &str) -> Option<Self> {
        match key {
            "template" => Some(RenderKey::Template),
            "action" => Some(RenderKey::Action),
            "file" => Some(RenderKey::File),
            "partial" => Some(RenderKey::Partial),
            "layout" => Some(RenderKey::Layout),
            _ => None,
        }
    }
}

/// One logical name passed to a render call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderReference {
    pub key: RenderKey,
    pub name: String,
}

/// Every template reference made by render calls on `line`
pub fn render_references(line: &str) -> Vec<RenderReference> {
    let mut references = Vec::new();
    let calls: Vec<_> = RENDER_RE.find_iter(line).collect();
    for (i, call) in calls.iter().enumerate() {
        let end = calls.get(i + 1).map(|next| next.start()).unwrap_or(line.len());
        let args = call_arguments(&line[call.end()..end]);

        if let Some(caps) = BARE_ARG_RE.captures(args) {
            let name = caps[1].to_string();
            let key = if name.contains('/') {
                RenderKey::Template
            } else {
                RenderKey::Action
            };
            references.push(RenderReference { key, name });
        }

        for caps in OPTION_RE.captures_iter(args) {
            let key = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str());
            if let Some(key) = key.and_then(RenderKey::from_option) {
                references.push(RenderReference {
                    key,
                    name: caps[3].to_string(),
                });
            }
        }
    }
    references
}

/// The argument text of one call, cut from everything after it.
///
/// Arguments end at the closing paren of a parenthesized call, at a
/// closer that was never opened, at `%>`, at `;` or at a comment.
/// Quoted text is skipped.
fn call_arguments(text: &str) -> &str {
    let parenthesized = text.trim_start().starts_with('(');
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut chars = text.char_indices().peekable();
    while let Some((idx, ch)) = chars.next() {
        if let Some(open) = quote {
            if ch == '\\' {
                chars.next();
            } else if ch == open {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' => quote = Some(ch),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                if depth == 0 {
                    return &text[..idx];
                }
                depth -= 1;
                if depth == 0 && parenthesized {
                    return &text[..idx];
                }
            }
            ';' | '#' if depth == 0 => return &text[..idx],
            '%' if chars.peek().is_some_and(|&(_, next)| next == '>') => {
                return &text[..idx];
            }
            _ => {}
        }
    }
    text
}

/// A controller source file, seen through naming conventions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerFile {
    /// Controller path below the controllers root without the suffix
    /// (`admin/users_controller.rb` -> `admin/users`)
    pub name: String,
}

impl ControllerFile {
    pub fn detect(project: &ProjectLayout, path: &Path) -> Option<Self> {
        let relative = path.strip_prefix(project.controllers_root()).ok()?;
        let relative = relative.to_str()?.replace('\\', "/");
        let name = relative.strip_suffix(CONTROLLER_SUFFIX)?;
        if name.is_empty() || name.ends_with('/') {
            return None;
        }
        Some(Self {
            name: name.to_string(),
        })
    }

    /// Layout the controller uses when it declares none
    pub fn implicit_layout_name(&self) -> &str {
        &self.name
    }
}

/// Views directory that `action:` and bare `partial:` names resolve in.
///
/// For a controller it is the views subdirectory named after it; a file
/// already under the views root uses its own directory.
pub fn views_dir_for(project: &ProjectLayout, path: &Path) -> Option<PathBuf> {
    if let Some(controller) = ControllerFile::detect(project, path) {
        return Some(project.views_root().join(controller.name));
    }
    if path.starts_with(project.views_root()) {
        return path.parent().map(Path::to_path_buf);
    }
    None
}

const BASE_MATCHERS: &[LineMatcher] = &[render_target];
const PARTIAL_MATCHERS: &[LineMatcher] = &[render_target, render_partial];

pub fn matchers(ext: &str) -> &'static [LineMatcher] {
    if FILE_TYPES.contains(&ext) {
        BASE_MATCHERS
    } else {
        &[]
    }
}

pub fn partial_matchers(ext: &str) -> &'static [LineMatcher] {
    if FILE_TYPES.contains(&ext) {
        PARTIAL_MATCHERS
    } else {
        &[]
    }
}

/// `template:`, `action:` and `file:` references
pub fn render_target(finder: &Finder<'_>, ctx: &FileContext, line: &str) -> bool {
    let project = finder.project();
    let target = finder.full_target_path();
    render_references(line).iter().any(|reference| match reference.key {
        RenderKey::Template => {
            let logical = absolutize(project.views_root(), Path::new(&reference.name));
            is_logical_prefix(&logical, target)
        }
        RenderKey::Action => ctx.views_dir.as_ref().is_some_and(|dir| {
            let logical = absolutize(dir, Path::new(&reference.name));
            is_logical_prefix(&logical, target)
        }),
        RenderKey::File => {
            let file = absolutize(project.root(), Path::new(&reference.name));
            file.as_path() == target
        }
        RenderKey::Partial | RenderKey::Layout => false,
    })
}

/// `partial:` references, with the leading underscore added to the name
fn render_partial(finder: &Finder<'_>, ctx: &FileContext, line: &str) -> bool {
    let project = finder.project();
    render_references(line)
        .iter()
        .filter(|reference| reference.key == RenderKey::Partial)
        .filter_map(|reference| {
            let logical = if reference.name.contains('/') {
                absolutize(project.views_root(), Path::new(&reference.name))
            } else {
                absolutize(ctx.views_dir.as_ref()?, Path::new(&reference.name))
            };
            underscored(&logical)
        })
        .any(|logical| is_logical_prefix(&logical, finder.full_target_path()))
}

/// `app/views/users/form` -> `app/views/users/_form`
fn underscored(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?.to_string_lossy();
    let parent = path.parent()?;
    Some(normalize_lexically(&parent.join(format!("_{}", name))))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::line_matches;
    use super::super::{Finder, FinderKind};
    use super::*;

    fn project() -> ProjectLayout {
        ProjectLayout::new("/p")
    }

    fn check(kind: FinderKind, target: &str, candidate: &str, line: &str) -> bool {
        let project = project();
        let finder = Finder::new(kind, &project, Path::new(target));
        line_matches(&finder, candidate, line)
    }

    #[test]
    fn test_render_references_forms() {
        let refs = render_references(r#"render :template => "users/show", :layout => 'admin'"#);
        assert_eq!(
            refs,
            vec![
                RenderReference {
                    key: RenderKey::Template,
                    name: "users/show".into()
                },
                RenderReference {
                    key: RenderKey::Layout,
                    name: "admin".into()
                },
            ]
        );
        let refs = render_references("render_to_string(partial: 'row', locals: {})");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].key, RenderKey::Partial);
    }

    #[test]
    fn test_render_bare_string() {
        let refs = render_references("render 'posts/show'");
        assert_eq!(refs[0].key, RenderKey::Template);
        let refs = render_references("render('edit')");
        assert_eq!(refs[0].key, RenderKey::Action);
    }

    #[test]
    fn test_render_options_stop_at_end_of_call() {
        let refs = render_references(
            "<%= render :partial => 'row' %> <%= link_to 'Show', :action => 'show' %>",
        );
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].key, RenderKey::Partial);

        let refs = render_references("render(:partial => 'row') + link_to('x', :action => 'show')");
        assert_eq!(refs.len(), 1);
        let refs = render_references("render :action => 'edit'; redirect_to :action => 'index'");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "edit");
        let refs = render_references("wrap(render :partial => 'row'), :layout => 'popup'");
        assert_eq!(refs.len(), 1);
        let refs = render_references("render :partial => 'row' # :action => 'show'");
        assert_eq!(refs.len(), 1);
        let refs = render_references(r#"render :partial => "a;b#c)", :layout => 'popup'"#);
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].name, "a;b#c)");
    }

    #[test]
    fn test_link_to_action_after_render_is_not_a_usage() {
        assert!(!check(
            FinderKind::Template,
            "app/views/hello/show.html.erb",
            "app/views/hello/index.html.erb",
            "<%= render :partial => 'row' %> <%= link_to 'Show', :action => 'show' %>"
        ));
    }

    #[test]
    fn test_render_ignores_other_options() {
        assert!(render_references(r#"render :text => "hello", :status => "404""#).is_empty());
        assert!(render_references(r#"redirect_to :action => "index""#).is_empty());
    }

    #[test]
    fn test_controller_detection() {
        let p = project();
        let controller =
            ControllerFile::detect(&p, Path::new("/p/app/controllers/admin/users_controller.rb"))
                .unwrap();
        assert_eq!(controller.name, "admin/users");
        assert!(ControllerFile::detect(&p, Path::new("/p/app/models/user.rb")).is_none());
        assert!(
            ControllerFile::detect(&p, Path::new("/p/app/controllers/_controller.rb")).is_none()
        );
    }

    #[test]
    fn test_views_dir_for() {
        let p = project();
        assert_eq!(
            views_dir_for(&p, Path::new("/p/app/controllers/hello_controller.rb")),
            Some(PathBuf::from("/p/app/views/hello"))
        );
        assert_eq!(
            views_dir_for(&p, Path::new("/p/app/views/hello/index.html.erb")),
            Some(PathBuf::from("/p/app/views/hello"))
        );
        assert_eq!(views_dir_for(&p, Path::new("/p/lib/tasks/x.rb")), None);
    }

    #[test]
    fn test_template_prefix_match() {
        let line = r#"render :template => "layouts/test""#;
        let candidate = "app/controllers/hello_controller.rb";
        assert!(check(
            FinderKind::Template,
            "app/views/layouts/test.html.erb",
            candidate,
            line
        ));
        assert!(!check(
            FinderKind::Template,
            "app/views/layouts/test2.html.erb",
            candidate,
            line
        ));
    }

    #[test]
    fn test_action_resolves_in_controller_views_dir() {
        let target = "app/views/hello/show.html.erb";
        assert!(check(
            FinderKind::Template,
            target,
            "app/controllers/hello_controller.rb",
            "render :action => 'show'"
        ));
        assert!(!check(
            FinderKind::Template,
            target,
            "app/controllers/other_controller.rb",
            "render :action => 'show'"
        ));
        assert!(!check(
            FinderKind::Template,
            target,
            "lib/renderer.rb",
            "render :action => 'show'"
        ));
    }

    #[test]
    fn test_file_requires_exact_path() {
        let target = "app/views/shared/box.html.erb";
        let candidate = "app/controllers/hello_controller.rb";
        assert!(check(
            FinderKind::Template,
            target,
            candidate,
            "render :file => 'app/views/shared/box.html.erb'"
        ));
        assert!(check(
            FinderKind::Template,
            target,
            candidate,
            "render :file => '/p/app/views/shared/box.html.erb'"
        ));
        assert!(!check(
            FinderKind::Template,
            target,
            candidate,
            "render :file => 'app/views/shared/box'"
        ));
    }

    #[test]
    fn test_partial_from_controller() {
        assert!(check(
            FinderKind::PartialTemplate,
            "app/views/hello/_greeting.html.erb",
            "app/controllers/hello_controller.rb",
            "    render_to_string(:partial => 'greeting')"
        ));
    }

    #[test]
    fn test_partial_from_view_and_with_path() {
        let target = "app/views/shared/_menu.rhtml";
        assert!(check(
            FinderKind::PartialTemplate,
            target,
            "app/views/hello/index.html.erb",
            "<%= render :partial => 'shared/menu' %>"
        ));
        assert!(check(
            FinderKind::PartialTemplate,
            target,
            "app/views/shared/page.html.erb",
            "<%= render :partial => 'menu', :locals => { :a => 1 } %>"
        ));
        assert!(!check(
            FinderKind::PartialTemplate,
            target,
            "app/views/hello/index.html.erb",
            "<%= render :partial => 'menu' %>"
        ));
    }

    #[test]
    fn test_plain_template_finder_ignores_partial_option() {
        assert!(!check(
            FinderKind::Template,
            "app/views/hello/_greeting.html.erb",
            "app/controllers/hello_controller.rb",
            "render :partial => 'greeting'"
        ));
    }

    #[test]
    fn test_partial_finder_keeps_template_forms() {
        assert!(check(
            FinderKind::PartialTemplate,
            "app/views/hello/_greeting.html.erb",
            "app/controllers/hello_controller.rb",
            "render :template => 'hello/_greeting'"
        ));
    }

    #[test]
    fn test_not_scanned_outside_file_types() {
        assert!(!check(
            FinderKind::Template,
            "app/views/layouts/test.html.erb",
            "public/index.html",
            r#"render :template => "layouts/test""#
        ));
    }
}
