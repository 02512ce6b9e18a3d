//! HTML attribute and tag extraction
//!
//! Tags are found per line. A `>` inside an attribute value ends the tag,
//! so dynamic markup such as `href="<%= path %>"` never matches.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

/// Attribute name (lowercased) to value
pub type Attributes = HashMap<String, String>;

/// One attribute at the start of the remaining text: `name="value"`,
/// `name='value'`, `name=value` or a bare `name`
static ATTRIBUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^\s*([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?(?:\s+|/?$)"#,
    )
    .expect("Invalid ATTRIBUTE_RE regex")
});

/// Any opening tag: name in group 1, attribute text in group 2
static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<([A-Za-z][A-Za-z0-9:-]*)(\s[^>]*)?/?>"#).expect("Invalid TAG_RE regex")
});

/// Parse the attribute text of a tag.
///
/// Keys are lowercased; the last occurrence of a duplicate key wins.
/// Attributes are read left to right. Text that is not an attribute, such
/// as an unterminated quote, makes the whole tag unparseable and yields an
/// empty map.
pub fn parse_attributes(input: &str) -> Attributes {
    let mut attributes = Attributes::new();
    let mut rest = input;
    loop {
        let remaining = rest.trim();
        if remaining.is_empty() || remaining == "/" {
            return attributes;
        }
        let Some(caps) = ATTRIBUTE_RE.captures(rest) else {
            return Attributes::new();
        };
        let name = caps[1].to_ascii_lowercase();
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        attributes.insert(name, value);
        rest = &rest[caps.get(0).map_or(rest.len(), |m| m.end())..];
    }
}

/// A tag found on a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Lowercased tag name
    pub name: String,
    pub attributes: Attributes,
}

impl Tag {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Every opening tag on `line`, in order of appearance
pub fn tags(line: &str) -> Vec<Tag> {
    TAG_RE
        .captures_iter(line)
        .map(|caps| Tag {
            name: caps[1].to_ascii_lowercase(),
            attributes: caps
                .get(2)
                .map(|m| parse_attributes(m.as_str()))
                .unwrap_or_default(),
        })
        .collect()
}

/// Opening tags named `name` (case-insensitive) on `line`
pub fn tags_named(line: &str, name: &str) -> Vec<Tag> {
    tags(line)
        .into_iter()
        .filter(|tag| tag.name.eq_ignore_ascii_case(name))
        .collect()
}
