//! # mtree Keywords Testkit
//!
//! Testing utilities for mtree keyword extraction.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known digest and checksum outputs for cross-implementation verification
//! - **Generators**: Proptest strategies for modes, metadata, content and xattrs
//! - **Fixtures**: A fixed identity table and a scratch directory tree
//!
//! ## Golden Vectors
//!
//! ```rust
//! use mtree_keywords_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, actual) in verify_all_vectors() {
//!     assert!(matches, "{name}: {actual}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use mtree_keywords_testkit::generators::{live_metadata, content};
//!
//! proptest! {
//!     #[test]
//!     fn size_token_matches_metadata(meta in live_metadata()) {
//!         // ...
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use mtree_keywords_testkit::fixtures::FixedIdentity;
//!
//! let registry = FixedIdentity::new().user(1000, "alice").registry();
//! assert!(registry.contains("uname"));
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{FixedIdentity, TempTree};
pub use vectors::{
    all_cksum_vectors, all_digest_vectors, verify_all_vectors, vectors_json, CksumVector,
    DigestVector,
};
