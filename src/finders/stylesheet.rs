//! Stylesheet finder
//!
//! Targets `.css` files. Matches `stylesheet_link_tag` calls and
//! `<link rel="stylesheet">` tags in templates, `<link>` tags in static
//! HTML, and `@import` directives in other stylesheets.

use once_cell::sync::Lazy;
use regex::Regex;

use super::attributes::tags_named;
use super::helpers::{helper_calls, HelperArg};
use super::resolve::{resolve, resolve_helper_asset};
use super::{FileContext, Finder, LineMatcher};

pub const FILE_TYPES: &[&str] = &["rb", "erb", "rhtml", "html", "htm", "css"];

const HELPER: &str = "stylesheet_link_tag";

/// `@import "x.css"`, `@import 'x.css' screen`, `@import url(x.css)`
static IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"@import\s+(?:url\(\s*)?["']?([^"')\s;]+)"#).expect("Invalid IMPORT_RE regex")
});

const TEMPLATE_MATCHERS: &[LineMatcher] = &[helper_call, link_tag];
const HTML_MATCHERS: &[LineMatcher] = &[link_tag];
const CSS_MATCHERS: &[LineMatcher] = &[import];

pub fn matchers(ext: &str) -> &'static [LineMatcher] {
    match ext {
        "rb" | "erb" | "rhtml" => TEMPLATE_MATCHERS,
        "html" | "htm" => HTML_MATCHERS,
        "css" => CSS_MATCHERS,
        _ => &[],
    }
}

fn helper_call(finder: &Finder<'_>, _ctx: &FileContext, line: &str) -> bool {
    let project = finder.project();
    let dir = project.stylesheets_root();
    helper_calls(line, HELPER).iter().flatten().any(|arg| match arg {
        HelperArg::Literal(name) => {
            resolve_helper_asset(project, name, &dir, Some("css")).as_deref()
                == Some(finder.full_target_path())
        }
        // `:all` pulls in every stylesheet directly under the stylesheets dir
        HelperArg::Symbol(sym) => {
            sym == "all" && finder.full_target_path().parent() == Some(dir.as_path())
        }
    })
}

fn link_tag(finder: &Finder<'_>, ctx: &FileContext, line: &str) -> bool {
    tags_named(line, "link").iter().any(|tag| {
        let is_stylesheet = tag
            .attribute("rel")
            .is_some_and(|rel| rel.trim().eq_ignore_ascii_case("stylesheet"));
        is_stylesheet
            && tag
                .attribute("href")
                .and_then(|href| resolve(finder.project(), href, &ctx.path))
                .as_deref()
                == Some(finder.full_target_path())
    })
}

fn import(finder: &Finder<'_>, ctx: &FileContext, line: &str) -> bool {
    IMPORT_RE.captures_iter(line).any(|caps| {
        resolve(finder.project(), &caps[1], &ctx.path).as_deref() == Some(finder.full_target_path())
    })
}
