//! Image finder
//!
//! Targets `.png`, `.gif` and `.jpg` files. Matches image helpers and
//! `<img src>` tags in templates and HTML, and `url(...)` or quoted
//! `background`/`background-image` values in stylesheets.

use once_cell::sync::Lazy;
use regex::Regex;

use super::attributes::tags_named;
use super::helpers::{helper_calls, HelperArg};
use super::resolve::{resolve, resolve_helper_asset};
use super::{FileContext, Finder, LineMatcher};

pub const FILE_TYPES: &[&str] = &["rb", "erb", "rhtml", "html", "htm", "css"];

const HELPERS: &[&str] = &["image_tag", "image_path", "image_submit_tag"];

/// `url(x.png)`, `url('x.png')`, `url( "x.png" )`
static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"url\(\s*["']?([^"')]+?)["']?\s*\)"#).expect("Invalid URL_RE regex")
});

/// `background-image: "x.png"` and `background: 'x.png'`
static BACKGROUND_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"background(?:-image)?\s*:\s*["']([^"']+)["']"#)
        .expect("Invalid BACKGROUND_RE regex")
});

const TEMPLATE_MATCHERS: &[LineMatcher] = &[helper_call, img_tag];
const HTML_MATCHERS: &[LineMatcher] = &[img_tag];
const CSS_MATCHERS: &[LineMatcher] = &[css_reference];

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
    let dir = project.images_root();
    HELPERS
        .iter()
        .flat_map(|helper| helper_calls(line, helper))
        .flatten()
        .any(|arg| match arg {
            HelperArg::Literal(name) => {
                resolve_helper_asset(project, &name, &dir, None).as_deref()
                    == Some(finder.full_target_path())
            }
            HelperArg::Symbol(_) => false,
        })
}

fn img_tag(finder: &Finder<'_>, ctx: &FileContext, line: &str) -> bool {
    tags_named(line, "img").iter().any(|tag| {
        tag.attribute("src")
            .and_then(|src| resolve(finder.project(), src, &ctx.path))
            .as_deref()
            == Some(finder.full_target_path())
    })
}

fn css_reference(finder: &Finder<'_>, ctx: &FileContext, line: &str) -> bool {
    URL_RE
        .captures_iter(line)
        .chain(BACKGROUND_RE.captures_iter(line))
        .any(|caps| {
            resolve(finder.project(), &caps[1], &ctx.path).as_deref()
                == Some(finder.full_target_path())
        })
}
