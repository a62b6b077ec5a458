//! Property tests for keyword extraction.

use std::io::{self, Cursor};
use std::path::Path;

use mtree_keywords::core::Xattr;
use mtree_keywords::{
    extract_entry, ExtractConfig, FileKind, FileMode, KeywordRegistry, KeywordSet, Metadata,
};
use mtree_keywords_testkit::generators::{
    content, file_mode_of, live_metadata, non_regular_kind, xattrs,
};
use proptest::prelude::*;

const CONTENT_KEYWORDS: &[&str] = &[
    "cksum", "md5", "md5digest", "rmd160", "rmd160digest", "ripemd160digest", "sha1",
    "sha1digest", "sha256", "sha256digest", "sha384", "sha384digest", "sha512", "sha512digest",
];

const SYNONYMS: &[(&str, &str)] = &[
    ("md5", "md5digest"),
    ("rmd160", "ripemd160digest"),
    ("rmd160digest", "ripemd160digest"),
    ("sha1", "sha1digest"),
    ("sha256", "sha256digest"),
    ("sha384", "sha384digest"),
    ("sha512", "sha512digest"),
];

fn run(keywords: &[&str], meta: &Metadata, data: &[u8], xattrs: &[Xattr]) -> String {
    let config = ExtractConfig::new(KeywordSet::new(keywords).unwrap());
    extract_entry(
        KeywordRegistry::global(),
        &config,
        Path::new("p"),
        meta,
        xattrs,
        || Ok(Cursor::new(data)),
    )
    .unwrap()
    .manifest_line()
}

proptest! {
    #[test]
    fn test_content_keywords_empty_for_non_regular(
        kind in non_regular_kind(),
        bits in 0u32..=0o7777,
    ) {
        let meta = Metadata::live(FileMode::new(kind, bits));
        let config = ExtractConfig::new(KeywordSet::new(CONTENT_KEYWORDS).unwrap());
        let report = extract_entry(
            KeywordRegistry::global(),
            &config,
            Path::new("n"),
            &meta,
            &[],
            || -> io::Result<Cursor<Vec<u8>>> {
                Err(io::Error::new(io::ErrorKind::Other, "content opened for non-regular entry"))
            },
        )
        .unwrap();
        prop_assert!(report.tokens.is_empty());
    }

    #[test]
    fn test_synonyms_produce_identical_tokens(
        mode in file_mode_of(FileKind::Regular),
        data in content(512),
    ) {
        let meta = Metadata::live(mode);
        for &(short, long) in SYNONYMS {
            prop_assert_eq!(run(&[short], &meta, &data, &[]), run(&[long], &meta, &data, &[]));
        }
    }

    #[test]
    fn test_tokens_follow_keyword_order(meta in live_metadata()) {
        let forward = run(&["uid", "gid", "nlink", "size"], &meta, b"", &[]);
        let backward = run(&["size", "nlink", "gid", "uid"], &meta, b"", &[]);

        let mut reversed: Vec<_> = forward.split(' ').collect();
        reversed.reverse();
        prop_assert_eq!(reversed.join(" "), backward);
    }

    #[test]
    fn test_mode_is_octal_with_leading_zero(meta in live_metadata()) {
        let line = run(&["mode"], &meta, b"", &[]);
        let value = line.strip_prefix("mode=").unwrap();
        let parsed = u32::from_str_radix(value, 8).unwrap();
        prop_assert_eq!(parsed, meta.mode.bits() & 0o7777);
        prop_assert!(value == "0" || value.starts_with('0'));
    }

    #[test]
    fn test_xattr_token_independent_of_order(list in xattrs()) {
        let meta = Metadata::live(FileMode::new(FileKind::Regular, 0o644));
        let mut reversed = list.clone();
        reversed.reverse();

        let a = run(&["xattr"], &meta, b"", &list);
        let b = run(&["xattrs"], &meta, b"", &reversed);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.split(' ').filter(|t| !t.is_empty()).count(), list.len());
    }
}
