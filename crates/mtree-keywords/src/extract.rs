//! Per-entry extraction: run a keyword set over one entry and assemble the
//! manifest line.
//!
//! The content stream of an entry is a single cursor, so the driver asks the
//! caller for a fresh stream before every content keyword instead of reusing
//! one that an earlier digest already drained.

use std::io::Read;
use std::path::{Path, PathBuf};

use mtree_keywords_core::{Entry, KeywordRegistry, Metadata, Token, Xattr};

use crate::config::ExtractConfig;
use crate::error::{Error, Result};

/// A keyword that failed for an entry (collected when `fail_fast` is off).
#[derive(Debug)]
pub struct KeywordFailure {
    pub keyword: String,
    pub error: Error,
}

/// The outcome of extracting a keyword set for one entry.
#[derive(Debug)]
pub struct EntryReport {
    /// The entry's path.
    pub path: PathBuf,
    /// Non-empty tokens, in keyword-set order.
    pub tokens: Vec<Token>,
    /// Keywords that failed, if the config collects failures.
    pub failures: Vec<KeywordFailure>,
}

impl EntryReport {
    /// The keyword portion of a manifest line: tokens joined by single spaces.
    pub fn manifest_line(&self) -> String {
        Token::join(self.tokens.iter().cloned()).into_string()
    }

    /// The token for a given emitted keyword, e.g. `sha256digest`.
    pub fn token(&self, keyword: &str) -> Option<&Token> {
        self.tokens.iter().find(|t| t.keyword() == Some(keyword))
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Extract every configured keyword for one entry.
///
/// `open` must return a reader positioned at the start of the entry's
/// content. It is called once per content keyword, and only for regular
/// files.
pub fn extract_entry<F, R>(
    registry: &KeywordRegistry,
    config: &ExtractConfig,
    path: &Path,
    metadata: &Metadata,
    xattrs: &[Xattr],
    mut open: F,
) -> Result<EntryReport>
where
    F: FnMut() -> std::io::Result<R>,
    R: Read,
{
    let mut report = EntryReport {
        path: path.to_path_buf(),
        tokens: Vec::with_capacity(config.keywords.len()),
        failures: Vec::new(),
    };

    for keyword in config.keywords.iter() {
        let result = extract_keyword(registry, keyword, path, metadata, xattrs, &mut open);
        match result {
            Ok(token) if token.is_empty() => {
                tracing::trace!(path = %path.display(), keyword, "keyword not applicable");
            }
            Ok(token) => {
                tracing::trace!(path = %path.display(), %token, "extracted keyword");
                report.tokens.push(token);
            }
            Err(error) if config.fail_fast => return Err(error),
            Err(error) => {
                tracing::warn!(path = %path.display(), keyword, %error, "keyword failed");
                report.failures.push(KeywordFailure {
                    keyword: keyword.to_string(),
                    error,
                });
            }
        }
    }

    tracing::debug!(
        path = %path.display(),
        tokens = report.tokens.len(),
        failures = report.failures.len(),
        "extracted entry"
    );
    Ok(report)
}

fn extract_keyword<F, R>(
    registry: &KeywordRegistry,
    keyword: &str,
    path: &Path,
    metadata: &Metadata,
    xattrs: &[Xattr],
    open: &mut F,
) -> Result<Token>
where
    F: FnMut() -> std::io::Result<R>,
    R: Read,
{
    let extractor = registry.resolve(keyword)?;

    if extractor.reads_content() && metadata.mode.is_regular() {
        let mut reader = open().map_err(|source| Error::ContentOpen {
            path: path.to_path_buf(),
            source,
        })?;
        let mut entry = Entry::new(path, metadata)
            .with_xattrs(xattrs)
            .with_content(&mut reader);
        return Ok(extractor.extract(&mut entry)?);
    }

    let mut entry = Entry::new(path, metadata).with_xattrs(xattrs);
    Ok(extractor.extract(&mut entry)?)
}

/// `lstat` a live path and extract the configured keywords for it.
///
/// Extended attributes are not read; use [`extract_entry`] to supply them.
#[cfg(unix)]
pub fn extract_path(
    registry: &KeywordRegistry,
    config: &ExtractConfig,
    path: &Path,
) -> Result<EntryReport> {
    let stat = std::fs::symlink_metadata(path).map_err(|source| Error::Stat {
        path: path.to_path_buf(),
        source,
    })?;
    let metadata = Metadata::from_fs(&stat);
    extract_entry(registry, config, path, &metadata, &[], || {
        std::fs::File::open(path)
    })
}
