//! JavaScript finder
//!
//! Targets `.js` files. Matches `javascript_include_tag` calls and
//! `<script src>` tags. JavaScript and CSS files are never scanned.

use super::attributes::tags_named;
use super::helpers::{helper_calls, HelperArg};
use super::resolve::{resolve, resolve_helper_asset};
use super::{FileContext, Finder, LineMatcher};

pub const FILE_TYPES: &[&str] = &["rb", "erb", "rhtml", "html", "htm"];

const HELPER: &str = "javascript_include_tag";

/// Scripts included by `javascript_include_tag :defaults`
pub const DEFAULT_SCRIPTS: &[&str] = &["prototype", "effects", "dragdrop", "controls", "application"];

const TEMPLATE_MATCHERS: &[LineMatcher] = &[helper_call, script_tag];
const HTML_MATCHERS: &[LineMatcher] = &[script_tag];

pub fn matchers(ext: &str) -> &'static [LineMatcher] {
    match ext {
        "rb" | "erb" | "rhtml" => TEMPLATE_MATCHERS,
        "html" | "htm" => HTML_MATCHERS,
        _ => &[],
    }
}

fn names_target(finder: &Finder<'_>, name: &str) -> bool {
    let project = finder.project();
    resolve_helper_asset(project, name, &project.javascripts_root(), Some("js")).as_deref()
        == Some(finder.full_target_path())
}

fn helper_call(finder: &Finder<'_>, _ctx: &FileContext, line: &str) -> bool {
    helper_calls(line, HELPER).iter().flatten().any(|arg| match arg {
        HelperArg::Literal(name) => names_target(finder, name),
        HelperArg::Symbol(sym) if sym == "defaults" => {
            DEFAULT_SCRIPTS.iter().any(|name| names_target(finder, name))
        }
        HelperArg::Symbol(sym) if sym == "all" => {
            let dir = finder.project().javascripts_root();
            finder.full_target_path().parent() == Some(dir.as_path())
        }
        HelperArg::Symbol(_) => false,
    })
}

fn script_tag(finder: &Finder<'_>, ctx: &FileContext, line: &str) -> bool {
    tags_named(line, "script").iter().any(|tag| {
        tag.attribute("src")
            .and_then(|src| resolve(finder.project(), src, &ctx.path))
            .as_deref()
            == Some(finder.full_target_path())
    })
}
