//! Error types for keyword extraction.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while resolving or running an extractor.
///
/// An inapplicable keyword is never an error; see [`crate::Token::empty`].
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The keyword name is not in the registry.
    #[error("unknown keyword: {0}")]
    UnknownKeyword(String),

    /// Reading the content stream failed part way.
    #[error("failed to read content of {path}: {source}")]
    ContentRead { path: PathBuf, source: io::Error },

    /// A content keyword was requested for a regular file but no stream was supplied.
    #[error("no content stream supplied for regular file {0}")]
    MissingContent(PathBuf),

    /// The entry claims to be a symlink but its target could not be read.
    #[error("failed to read link target of {path}: {source}")]
    ReadLink { path: PathBuf, source: io::Error },

    /// The owner id could not be resolved to a user name.
    #[error("failed to look up user name for uid {uid}: {source}")]
    UserLookup { uid: u32, source: io::Error },

    /// The group id could not be resolved to a group name.
    #[error("failed to look up group name for gid {gid}: {source}")]
    GroupLookup { gid: u32, source: io::Error },
}

impl ExtractError {
    /// Check if this error came from an I/O operation on the entry.
    pub fn is_io(&self) -> bool {
        !matches!(self, ExtractError::UnknownKeyword(_))
    }
}

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;
