//! Public file finder
//!
//! Targets any other file under the public root (static pages, documents,
//! icons). Only raw `src=` and `href=` attributes count.

use super::attributes::tags;
use super::resolve::{resolve, resolve_from_site_root};
use super::{FileContext, Finder, LineMatcher};

pub const FILE_TYPES: &[&str] = &["rb", "erb", "rhtml", "html", "htm"];

const MATCHERS: &[LineMatcher] = &[src_or_href];

pub fn matchers(ext: &str) -> &'static [LineMatcher] {
    match ext {
        "rb" | "erb" | "rhtml" | "html" | "htm" => MATCHERS,
        _ => &[],
    }
}

fn src_or_href(finder: &Finder<'_>, ctx: &FileContext, line: &str) -> bool {
    let project = finder.project();
    tags(line).iter().any(|tag| {
        ["src", "href"]
            .iter()
            .filter_map(|name| tag.attribute(name))
            .any(|reference| {
                // Pages rendered from outside public/ are served at the site root
                let resolved = if ctx.in_public {
                    resolve(project, reference, &ctx.path)
                } else {
                    resolve_from_site_root(project, reference)
                };
                resolved.as_deref() == Some(finder.full_target_path())
            })
    })
}
