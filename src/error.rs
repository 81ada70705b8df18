//! Error types for reading os-release files.
//!
//! All fallible operations return a [`Result<T>`], an alias for `Result<T, Error>`.
//! Mapping parsed assignments onto [`OsRelease`](crate::OsRelease) never fails, so the only
//! errors are about finding, reading and parsing the input.

use std::{fmt, path::PathBuf};

use crate::parser::SyntaxError;

/// Result type alias for operations that may return an [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Describes the input that failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// A string, identified by its first line.
    String(String),
    /// A file on disk.
    File(PathBuf),
}

impl Origin {
    pub(crate) fn string(text: &str) -> Self {
        Self::String(text.lines().next().unwrap_or_default().to_string())
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(first_line) => write!(f, "string '{first_line}'"),
            Self::File(path) => write!(f, "file '{}'", path.display()),
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error types for os-release operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// None of the candidate paths exist.
    #[error("no os-release file found (tried {})", display_paths(.paths))]
    NotFound {
        /// Every path that was tried, in order.
        paths: Vec<PathBuf>,
    },

    /// The input is not a valid os-release document.
    #[error("failed to parse os-release {origin}: {source}")]
    Parse {
        /// The string or file that failed to parse.
        origin: Origin,
        /// Where and why parsing failed.
        source: SyntaxError,
    },

    /// The file exists but couldn't be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// The file being read.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
}
