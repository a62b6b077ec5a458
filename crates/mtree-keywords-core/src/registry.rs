//! Keyword registry: every recognised keyword name mapped to its extractor.
//!
//! Synonyms are extra keys pointing at the same `Arc`, never a second copy of
//! the extractor, so `sha1` and `sha1digest` cannot diverge. The table is
//! built once and only read afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::content::{CksumExtractor, DigestExtractor};
use crate::entry::Entry;
use crate::error::{ExtractError, Result};
use crate::extract::{
    Extractor, GidExtractor, GnameExtractor, LinkExtractor, ModeExtractor, NlinkExtractor,
    SizeExtractor, TarTimeExtractor, TimeExtractor, TypeExtractor, UidExtractor,
    UnameExtractor, XattrExtractor,
};
use crate::hash::HashAlgorithm;
use crate::identity::{IdentityLookup, SystemIdentity};
use crate::token::Token;

/// Digest keywords: algorithm, emitted keyword, accepted names.
const DIGEST_KEYWORDS: &[(HashAlgorithm, &str, &[&str])] = &[
    (HashAlgorithm::Md5, "md5digest", &["md5", "md5digest"]),
    (
        HashAlgorithm::Ripemd160,
        "ripemd160digest",
        &["rmd160", "rmd160digest", "ripemd160digest"],
    ),
    (HashAlgorithm::Sha1, "sha1digest", &["sha1", "sha1digest"]),
    (HashAlgorithm::Sha256, "sha256digest", &["sha256", "sha256digest"]),
    (HashAlgorithm::Sha384, "sha384digest", &["sha384", "sha384digest"]),
    (HashAlgorithm::Sha512, "sha512digest", &["sha512", "sha512digest"]),
];

static GLOBAL: Lazy<KeywordRegistry> =
    Lazy::new(|| KeywordRegistry::new(Arc::new(SystemIdentity)));

/// Immutable keyword name to extractor table.
pub struct KeywordRegistry {
    extractors: HashMap<&'static str, Arc<dyn Extractor>>,
}

impl KeywordRegistry {
    /// The process-wide registry, resolving names through the system
    /// user and group databases.
    pub fn global() -> &'static KeywordRegistry {
        &GLOBAL
    }

    /// Build a registry whose `uname`/`gname` use the given lookup.
    pub fn new(identity: Arc<dyn IdentityLookup>) -> Self {
        let mut extractors: HashMap<&'static str, Arc<dyn Extractor>> = HashMap::new();
        let mut add = |names: &[&'static str], extractor: Arc<dyn Extractor>| {
            for name in names {
                extractors.insert(*name, Arc::clone(&extractor));
            }
        };

        add(&["size"], Arc::new(SizeExtractor));
        add(&["type"], Arc::new(TypeExtractor));
        add(&["time"], Arc::new(TimeExtractor));
        add(&["link"], Arc::new(LinkExtractor));
        add(&["uid"], Arc::new(UidExtractor));
        add(&["gid"], Arc::new(GidExtractor));
        add(&["nlink"], Arc::new(NlinkExtractor));
        add(&["uname"], Arc::new(UnameExtractor::new(Arc::clone(&identity))));
        add(&["gname"], Arc::new(GnameExtractor::new(identity)));
        add(&["mode"], Arc::new(ModeExtractor));
        add(&["cksum"], Arc::new(CksumExtractor));
        for &(algorithm, output, names) in DIGEST_KEYWORDS {
            add(names, Arc::new(DigestExtractor::new(algorithm, output)));
        }
        add(&["tar_time"], Arc::new(TarTimeExtractor));
        add(&["xattr", "xattrs"], Arc::new(XattrExtractor));

        Self { extractors }
    }

    /// Look up the extractor for a keyword name (exact match).
    pub fn resolve(&self, name: &str) -> Result<&Arc<dyn Extractor>> {
        self.extractors
            .get(name)
            .ok_or_else(|| ExtractError::UnknownKeyword(name.to_string()))
    }

    /// Check whether a keyword name is recognised.
    pub fn contains(&self, name: &str) -> bool {
        self.extractors.contains_key(name)
    }

    /// Every recognised name, synonyms included, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.extractors.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Resolve and run in one step.
    pub fn extract(&self, name: &str, entry: &mut Entry<'_>) -> Result<Token> {
        self.resolve(name)?.extract(entry)
    }
}

impl std::fmt::Debug for KeywordRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeywordRegistry")
            .field("keywords", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Metadata;
    use crate::types::{FileKind, FileMode};
    use std::io::Cursor;
    use std::path::Path;

    const REQUIRED: &[&str] = &[
        "size", "type", "time", "link", "uid", "gid", "nlink", "uname", "mode", "cksum", "md5",
        "md5digest", "rmd160", "rmd160digest", "ripemd160digest", "sha1", "sha1digest",
        "sha256", "sha256digest", "sha384", "sha384digest", "sha512", "sha512digest",
        "tar_time", "xattr", "xattrs",
    ];

    #[test]
    fn test_required_keywords_present() {
        let registry = KeywordRegistry::global();
        for name in REQUIRED {
            assert!(registry.contains(name), "missing keyword {name}");
        }
    }

    #[test]
    fn test_unknown_keyword() {
        let registry = KeywordRegistry::global();
        assert!(matches!(
            registry.resolve("sha3"),
            Err(ExtractError::UnknownKeyword(name)) if name == "sha3"
        ));
        // Lookup is exact.
        assert!(registry.resolve("SHA1").is_err());
        assert!(registry.resolve(" size").is_err());
    }

    #[test]
    fn test_synonyms_share_one_extractor() {
        let registry = KeywordRegistry::global();
        for &(_, _, names) in DIGEST_KEYWORDS {
            let first = registry.resolve(names[0]).unwrap();
            for name in &names[1..] {
                assert!(Arc::ptr_eq(first, registry.resolve(name).unwrap()), "{name}");
            }
        }
        assert!(Arc::ptr_eq(
            registry.resolve("xattr").unwrap(),
            registry.resolve("xattrs").unwrap()
        ));
    }

    #[test]
    fn test_synonym_tokens_identical() {
        let registry = KeywordRegistry::global();
        let meta = Metadata::live(FileMode::new(FileKind::Regular, 0o644));
        let token_for = |name: &str| {
            let mut content = Cursor::new(b"hello world".to_vec());
            let mut entry = Entry::new(Path::new("f"), &meta).with_content(&mut content);
            registry.extract(name, &mut entry).unwrap()
        };
        assert_eq!(token_for("sha1"), token_for("sha1digest"));
        assert_eq!(token_for("rmd160"), token_for("ripemd160digest"));
        assert_eq!(
            token_for("rmd160").as_str(),
            "ripemd160digest=98c615784ccb5fe5936fbc0cbe9dfdb408d92f0f"
        );
    }

    #[test]
    fn test_content_flag() {
        let registry = KeywordRegistry::global();
        for name in ["cksum", "md5", "sha512digest"] {
            assert!(registry.resolve(name).unwrap().reads_content(), "{name}");
        }
        for name in ["size", "type", "link", "xattr", "uname"] {
            assert!(!registry.resolve(name).unwrap().reads_content(), "{name}");
        }
    }

    #[test]
    fn test_names_sorted() {
        let names = KeywordRegistry::global().names();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
        assert!(names.contains(&"gname"));
    }
}
