//! # mtree Keywords
//!
//! Keyword-set extraction for mtree-style manifests: run an ordered list of
//! keywords (`size`, `type`, `sha256`, `cksum`, ...) over an entry and get
//! back the space-separated `name=value` tokens of its manifest line.
//!
//! ## Overview
//!
//! The token logic lives in [`core`]. This crate adds the parts a manifest
//! generator needs around it:
//!
//! - **Keyword sets**: Validated, ordered, duplicate-free keyword lists
//! - **Entry driver**: Opens a fresh content stream for every content keyword
//! - **Live paths**: `lstat` a path and extract its keywords
//! - **Archives**: Extract keywords for every member of a tar stream
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mtree_keywords::{extract_path, ExtractConfig, KeywordRegistry, KeywordSet};
//!
//! let keywords = KeywordSet::parse("type,size,mode,sha256").unwrap();
//! let config = ExtractConfig::new(keywords);
//!
//! let report = extract_path(KeywordRegistry::global(), &config, "Cargo.toml".as_ref()).unwrap();
//! println!("{} {}", report.path.display(), report.manifest_line());
//! ```
//!
//! ## Re-exports
//!
//! - `mtree_keywords::core` - Extractors, registry, metadata and tokens

#[cfg(feature = "tar")]
pub mod archive;
pub mod config;
pub mod error;
pub mod extract;

pub use mtree_keywords_core as core;

pub use config::{ExtractConfig, KeywordSet, ARCHIVE_DEFAULT_KEYWORDS, DEFAULT_KEYWORDS};
pub use error::{Error, Result};
pub use extract::{extract_entry, EntryReport, KeywordFailure};

#[cfg(unix)]
pub use extract::extract_path;

#[cfg(feature = "tar")]
pub use archive::extract_tar;

pub use mtree_keywords_core::{
    Entry, ExtractError, FileKind, FileMode, KeywordRegistry, Metadata, Timestamp, Token, Xattr,
};
