//! Layout finder
//!
//! A layout is used when a render call names it as a template, when a
//! render call passes it as `:layout`, when a Ruby file declares it with
//! `layout "name"`, or implicitly by a controller that declares no layout
//! at all. The implicit case reports the controller's class line.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use super::template::{render_references, render_target, RenderKey, FILE_TYPES};
use super::{FileContext, Finder, LineMatcher};
use crate::core::paths::{normalize_path, strip_all_extensions};

/// Layout every controller falls back to
pub const DEFAULT_LAYOUT: &str = "application";

/// `layout "name"`, `layout 'admin/name'`, `layout :name`, `layout("name")`
static LAYOUT_DECL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*layout\s*\(?\s*(?:["']([^"']+)["']|:(\w+))"#)
        .expect("Invalid LAYOUT_DECL_RE regex")
});

/// Any `layout` declaration, including `layout nil` and `layout proc { }`.
/// A local `layout = ...` is not one.
static ANY_LAYOUT_DECL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*layout(?:\s*\(|\s+(?:["':]|->|[A-Za-z_])|\s*$)"#)
        .expect("Invalid ANY_LAYOUT_DECL_RE regex")
});

static CONTROLLER_CLASS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*class\s+[\w:]*Controller\b").expect("Invalid CONTROLLER_CLASS_RE regex")
});

const RUBY_MATCHERS: &[LineMatcher] = &[
    render_target,
    layout_option,
    explicit_declaration,
    implicit_binding,
];
const TEMPLATE_MATCHERS: &[LineMatcher] = &[render_target, layout_option];

pub fn matchers(ext: &str) -> &'static [LineMatcher] {
    match ext {
        "rb" => RUBY_MATCHERS,
        _ if FILE_TYPES.contains(&ext) => TEMPLATE_MATCHERS,
        _ => &[],
    }
}

/// Name a layout file is referred to by: its path below the layouts dir
/// with every extension removed (`layouts/admin/main.html.erb` ->
/// `admin/main`). `None` outside the layouts dir.
pub fn layout_name(layouts_root: &Path, target: &Path) -> Option<String> {
    let stripped = strip_all_extensions(target);
    let relative = stripped.strip_prefix(layouts_root).ok()?;
    if relative.as_os_str().is_empty() {
        return None;
    }
    Some(normalize_path(relative))
}

/// Whether any line of `content` is a `layout` declaration
pub fn declares_layout(content: &str) -> bool {
    content.lines().any(|line| ANY_LAYOUT_DECL_RE.is_match(line))
}

fn target_layout_name(finder: &Finder<'_>) -> String {
    layout_name(finder.project().layouts_root(), finder.full_target_path())
        .unwrap_or_else(|| finder.target_basename().to_string())
}

fn layout_option(finder: &Finder<'_>, _ctx: &FileContext, line: &str) -> bool {
    let mut names = render_references(line)
        .into_iter()
        .filter(|reference| reference.key == RenderKey::Layout)
        .peekable();
    if names.peek().is_none() {
        return false;
    }
    let target = target_layout_name(finder);
    names.any(|reference| reference.name == target)
}

fn explicit_declaration(finder: &Finder<'_>, _ctx: &FileContext, line: &str) -> bool {
    LAYOUT_DECL_RE.captures(line).is_some_and(|caps| {
        let name = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str());
        name == Some(target_layout_name(finder).as_str())
    })
}

fn implicit_binding(finder: &Finder<'_>, ctx: &FileContext, line: &str) -> bool {
    let Some(controller) = ctx.controller.as_ref() else {
        return false;
    };
    if ctx.declares_layout || !CONTROLLER_CLASS_RE.is_match(line) {
        return false;
    }
    let target = target_layout_name(finder);
    target == controller.implicit_layout_name() || target == DEFAULT_LAYOUT
}
