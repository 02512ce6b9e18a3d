//! Asset helper calls
//!
//! Extracts the positional arguments of view-helper invocations such as
//! `stylesheet_link_tag "main", "print", :media => "all"`. Arguments are
//! read left to right and reading stops at the first token that is not a
//! string literal or a bare symbol, so hash options and expressions never
//! leak into the result.

use once_cell::sync::Lazy;
use regex::Regex;

/// One positional helper argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelperArg {
    /// `"main"` or `'main'`
    Literal(String),
    /// `:defaults`
    Symbol(String),
}

/// Next argument at the start of the remaining text: a string literal, or
/// a symbol that is not a hash key (`:media =>`).
static ARG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*,?\s*(?:"([^"]*)"|'([^']*)'|:([A-Za-z_]\w*)(\s*=>)?)"#)
        .expect("Invalid ARG_RE regex")
});

/// Positional arguments of every call to `helper` on `line`
pub fn helper_calls(line: &str, helper: &str) -> Vec<Vec<HelperArg>> {
    let mut calls = Vec::new();
    let mut search_from = 0;
    while let Some(offset) = line[search_from..].find(helper) {
        let start = search_from + offset;
        let end = start + helper.len();
        search_from = end;

        let preceded_by_word = line[..start]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_');
        let followed_by_word = line[end..]
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric() || c == '_');
        if preceded_by_word || followed_by_word {
            continue;
        }

        let rest = line[end..].trim_start();
        let rest = rest.strip_prefix('(').unwrap_or(rest);
        calls.push(positional_args(rest));
    }
    calls
}

fn positional_args(mut rest: &str) -> Vec<HelperArg> {
    let mut args = Vec::new();
    while let Some(caps) = ARG_RE.captures(rest) {
        if caps.get(4).is_some() {
            break;
        }
        let arg = if let Some(m) = caps.get(1).or_else(|| caps.get(2)) {
            HelperArg::Literal(m.as_str().to_string())
        } else {
            HelperArg::Symbol(caps[3].to_string())
        };
        args.push(arg);
        rest = &rest[caps.get(0).map(|m| m.end()).unwrap_or(rest.len())..];
    }
    args
}
