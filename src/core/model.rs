//! Usage model
//!
//! Every finder maps its matches to `Usage` records before a printer sees
//! them. A usage is identified by (file, line number) alone.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::file_reader::read_line;

/// Text shown when a deferred line can no longer be read.
pub const UNAVAILABLE_LINE: &str = "<line unavailable>";

/// How the text of a usage line is obtained
#[derive(Debug, Clone)]
pub enum LineText {
    /// Captured while the file was scanned
    Captured(String),
    /// Re-read from disk whenever it is asked for
    Deferred,
}

/// One line of one file that references a target
#[derive(Debug, Clone)]
pub struct Usage {
    file: PathBuf,
    line_number: u32,
    text: LineText,
}

impl Usage {
    /// Create a usage whose line text is already known
    pub fn new(file: impl Into<PathBuf>, line_number: u32, text: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line_number,
            text: LineText::Captured(text.into()),
        }
    }

    /// Create a usage whose line text is read lazily from `file`
    pub fn deferred(file: impl Into<PathBuf>, line_number: u32) -> Self {
        Self {
            file: file.into(),
            line_number,
            text: LineText::Deferred,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// 1-indexed line number
    pub fn line_number(&self) -> u32 {
        self.line_number
    }

    /// The referencing line, or [`UNAVAILABLE_LINE`] if it vanished since the scan
    pub fn line_text(&self) -> Cow<'_, str> {
        match &self.text {
            LineText::Captured(text) => Cow::Borrowed(text.as_str()),
            LineText::Deferred => match read_line(&self.file, self.line_number) {
                Some(text) => Cow::Owned(text),
                None => Cow::Borrowed(UNAVAILABLE_LINE),
            },
        }
    }

    /// Serializable view with `file` shown relative to `root` when possible
    pub fn record(&self, target: &str, root: &Path) -> UsageRecord {
        let path = crate::core::paths::make_relative(&self.file, root)
            .unwrap_or_else(|| crate::core::paths::normalize_path(&self.file));
        UsageRecord {
            target: target.to_string(),
            path,
            line: self.line_number,
            text: self.line_text().into_owned(),
        }
    }
}

impl PartialEq for Usage {
    fn eq(&self, other: &Self) -> bool {
        self.file == other.file && self.line_number == other.line_number
    }
}

impl Eq for Usage {}

impl Hash for Usage {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.file.hash(state);
        self.line_number.hash(state);
    }
}

impl PartialOrd for Usage {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Usage {
    fn cmp(&self, other: &Self) -> Ordering {
        self.file
            .cmp(&other.file)
            .then(self.line_number.cmp(&other.line_number))
    }
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.file.display(),
            self.line_number,
            self.line_text()
        )
    }
}

/// Flat, printable form of a usage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageRecord {
    /// Target path relative to root, using '/' as separator
    pub target: String,
    /// Referencing file relative to root, using '/' as separator
    pub path: String,
    pub line: u32,
    pub text: String,
}

/// Usages of one target, in scan order
#[derive(Debug, Clone)]
pub struct UsageReport {
    /// Target path as shown to the user
    pub target: String,
    pub usages: Vec<Usage>,
}

impl UsageReport {
    pub fn new(target: impl Into<String>, usages: Vec<Usage>) -> Self {
        Self {
            target: target.into(),
            usages,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.usages.is_empty()
    }
}
