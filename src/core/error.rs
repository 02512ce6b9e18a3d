//! Crate-level error type
//!
//! Only failures that stop a whole run live here. A candidate file that is
//! unreadable, binary or gone is skipped by the collector instead.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The project root does not exist or is not a directory.
    #[error("project root not found: {}", path.display())]
    RootNotFound { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_not_found_message() {
        let err = Error::RootNotFound {
            path: PathBuf::from("/nope"),
        };
        assert_eq!(err.to_string(), "project root not found: /nope");
    }

    #[test]
    fn test_io_from() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("gone"));
    }
}
