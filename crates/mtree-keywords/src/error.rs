//! Error types for the extraction driver.

use std::io;
use std::path::PathBuf;

use mtree_keywords_core::ExtractError;
use thiserror::Error;

/// Errors that can occur while extracting keywords for an entry.
#[derive(Debug, Error)]
pub enum Error {
    /// An extractor failed, or a keyword name was not recognised.
    #[error("extraction error: {0}")]
    Extract(#[from] ExtractError),

    /// The caller-supplied content source could not be opened.
    #[error("failed to open content of {path}: {source}")]
    ContentOpen { path: PathBuf, source: io::Error },

    /// `lstat` on a live path failed.
    #[error("failed to stat {path}: {source}")]
    Stat { path: PathBuf, source: io::Error },

    /// Reading an archive failed.
    #[error("archive error: {0}")]
    Archive(io::Error),

    /// The keyword configuration is invalid.
    #[error("invalid keyword configuration: {0}")]
    Config(String),
}

/// Result type for driver operations.
pub type Result<T> = std::result::Result<T, Error>;
