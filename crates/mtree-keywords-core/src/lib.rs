//! # mtree Keywords Core
//!
//! Pure primitives for producing mtree keyword tokens: given a filesystem
//! entry and, for regular files, a stream of its content, produce canonical
//! `name=value` tokens such as `size=42`, `type=file` or `sha256digest=...`.
//!
//! This crate does not walk directories, parse manifests or log. It answers a
//! single question: what is keyword K for entry E?
//!
//! ## Key Types
//!
//! - [`Entry`] - The subject of extraction (path, metadata, content, xattrs)
//! - [`Metadata`] - Mode, size, times and ownership, tagged with [`Provenance`]
//! - [`Token`] - A formatted `name=value` string, or empty when inapplicable
//! - [`Extractor`] - The capability that turns an entry into a token
//! - [`KeywordRegistry`] - Keyword name (and synonym) to extractor lookup
//! - [`HashAlgorithm`] - The digest algorithms backing the digest keywords
//!
//! ## Inapplicable vs. failed
//!
//! Every extractor distinguishes two outcomes. A keyword that has no meaning
//! for an entry (a digest of a directory) yields [`Token::empty`]. A keyword
//! that should apply but cannot be computed (content read error, unreadable
//! symlink) yields an [`ExtractError`].
//!
//! ```rust
//! use std::io::Cursor;
//! use std::path::Path;
//! use mtree_keywords_core::{Entry, FileKind, FileMode, KeywordRegistry, Metadata};
//!
//! let metadata = Metadata::live(FileMode::new(FileKind::Regular, 0o644));
//! let mut content = Cursor::new(b"abc".to_vec());
//! let mut entry = Entry::new(Path::new("a.txt"), &metadata).with_content(&mut content);
//!
//! let token = KeywordRegistry::global().extract("sha1", &mut entry).unwrap();
//! assert_eq!(token.as_str(), "sha1digest=a9993e364706816aba3e25717850c26c9cd0d89d");
//! ```

pub mod cksum;
pub mod content;
pub mod entry;
pub mod error;
pub mod extract;
pub mod hash;
pub mod identity;
pub mod metadata;
pub mod registry;
pub mod token;
pub mod types;

pub use cksum::{cksum, Cksum};
pub use content::{CksumExtractor, DigestExtractor};
pub use entry::{Entry, Xattr};
pub use error::{ExtractError, Result};
pub use extract::Extractor;
pub use hash::{DigestHasher, HashAlgorithm, Hasher};
pub use identity::{IdentityLookup, SystemIdentity};
pub use metadata::{ArchiveEntryType, ArchiveOrigin, Metadata, Provenance};
pub use registry::KeywordRegistry;
pub use token::Token;
pub use types::{FileKind, FileMode, Timestamp};
