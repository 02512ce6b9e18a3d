//! Candidate file reading
//!
//! Provides consistent handling for:
//! - Non-UTF-8 files (lossy conversion)
//! - Oversized files (skipped)
//! - Binary files (skipped)
//! - Files that vanish between enumeration and read (skipped)

use std::fs;
use std::io::Read;
use std::path::Path;

/// Default maximum file size in bytes (16 MB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Bytes inspected for NUL when sniffing binary content
const BINARY_SNIFF_LEN: usize = 8192;

/// Configuration for file reading
#[derive(Debug, Clone, Copy)]
pub struct FileReadConfig {
    /// Files larger than this are skipped
    pub max_file_size: u64,
}

impl Default for FileReadConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// Why a file produced no content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Unreadable(String),
    TooLarge(u64),
    Binary,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Unreadable(e) => write!(f, "cannot read file: {}", e),
            SkipReason::TooLarge(size) => write!(f, "file too large ({} bytes)", size),
            SkipReason::Binary => write!(f, "binary file"),
        }
    }
}

/// Result of reading a file
#[derive(Debug, Clone)]
pub struct FileReadResult {
    /// The file content, or why there is none
    pub content: Result<String, SkipReason>,

    /// Whether lossy conversion was used
    pub lossy_conversion: bool,
}

impl FileReadResult {
    fn success(content: String) -> Self {
        Self {
            content: Ok(content),
            lossy_conversion: false,
        }
    }

    fn skipped(reason: SkipReason) -> Self {
        Self {
            content: Err(reason),
            lossy_conversion: false,
        }
    }
}

/// Read a file with the given configuration
pub fn read_file_with_config(path: &Path, config: &FileReadConfig) -> FileReadResult {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) => return FileReadResult::skipped(SkipReason::Unreadable(e.to_string())),
    };

    if metadata.len() > config.max_file_size {
        return FileReadResult::skipped(SkipReason::TooLarge(metadata.len()));
    }

    let mut bytes = Vec::with_capacity(metadata.len() as usize);
    let read = fs::File::open(path).and_then(|mut f| f.read_to_end(&mut bytes));
    if let Err(e) = read {
        return FileReadResult::skipped(SkipReason::Unreadable(e.to_string()));
    }

    let check_len = std::cmp::min(BINARY_SNIFF_LEN, bytes.len());
    if bytes[..check_len].contains(&0) {
        return FileReadResult::skipped(SkipReason::Binary);
    }

    match String::from_utf8(bytes) {
        Ok(content) => FileReadResult::success(content),
        Err(e) => {
            let content = String::from_utf8_lossy(e.as_bytes()).into_owned();
            FileReadResult {
                content: Ok(content),
                lossy_conversion: true,
            }
        }
    }
}

/// Convenience function with default config
pub fn read_file_safe(path: &Path) -> FileReadResult {
    read_file_with_config(path, &FileReadConfig::default())
}

/// Read the 1-indexed line `line_number` of `path`, if both still exist
pub fn read_line(path: &Path, line_number: u32) -> Option<String> {
    let index = (line_number as usize).checked_sub(1)?;
    let content = read_file_safe(path).content.ok()?;
    content.lines().nth(index).map(str::to_string)
}
