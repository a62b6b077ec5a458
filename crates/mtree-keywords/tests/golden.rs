//! Golden vectors run through the full keyword path: registry lookup,
//! extractor, token formatting and manifest line assembly.

use std::io::Cursor;
use std::path::Path;

use mtree_keywords::core::HashAlgorithm;
use mtree_keywords::{extract_entry, ExtractConfig, KeywordRegistry, KeywordSet};
use mtree_keywords_testkit::fixtures::regular_file;
use mtree_keywords_testkit::{all_cksum_vectors, all_digest_vectors, vectors_json};

/// The emitted keyword for each algorithm.
fn output_keyword(algorithm: HashAlgorithm) -> &'static str {
    match algorithm {
        HashAlgorithm::Md5 => "md5digest",
        HashAlgorithm::Ripemd160 => "ripemd160digest",
        HashAlgorithm::Sha1 => "sha1digest",
        HashAlgorithm::Sha256 => "sha256digest",
        HashAlgorithm::Sha384 => "sha384digest",
        HashAlgorithm::Sha512 => "sha512digest",
    }
}

#[test]
fn test_digest_vectors_through_registry() {
    let registry = KeywordRegistry::global();
    for vector in all_digest_vectors() {
        let algorithm = vector.algorithm().unwrap();
        let input = vector.input_bytes().unwrap();
        let meta = regular_file(input.len() as u64, 0o644);
        let config = ExtractConfig::new(KeywordSet::new([output_keyword(algorithm)]).unwrap());

        let report = extract_entry(registry, &config, Path::new("f"), &meta, &[], || {
            Ok(Cursor::new(input.clone()))
        })
        .unwrap();

        assert_eq!(
            report.manifest_line(),
            format!("{}={}", output_keyword(algorithm), vector.expected),
            "vector '{}'",
            vector.name
        );
    }
}

#[test]
fn test_cksum_vectors_through_registry() {
    let registry = KeywordRegistry::global();
    let config = ExtractConfig::new(KeywordSet::parse("cksum,size").unwrap());
    for vector in all_cksum_vectors() {
        let input = vector.input_bytes().unwrap();
        let meta = regular_file(vector.expected_len, 0o644);

        let report = extract_entry(registry, &config, Path::new("f"), &meta, &[], || {
            Ok(Cursor::new(input.clone()))
        })
        .unwrap();

        assert_eq!(
            report.manifest_line(),
            format!("cksum={} size={}", vector.expected_sum, vector.expected_len),
            "vector '{}'",
            vector.name
        );
    }
}

#[test]
fn test_every_digest_in_one_line() {
    let config = ExtractConfig::new(
        KeywordSet::parse("md5 rmd160 sha1 sha256 sha384 sha512 cksum").unwrap(),
    );
    let meta = regular_file(3, 0o644);
    let report = extract_entry(
        KeywordRegistry::global(),
        &config,
        Path::new("abc"),
        &meta,
        &[],
        || Ok(Cursor::new(b"abc")),
    )
    .unwrap();

    let keywords: Vec<_> = report.tokens.iter().filter_map(|t| t.keyword()).collect();
    assert_eq!(
        keywords,
        [
            "md5digest",
            "ripemd160digest",
            "sha1digest",
            "sha256digest",
            "sha384digest",
            "sha512digest",
            "cksum"
        ]
    );
    assert_eq!(
        report.token("ripemd160digest").map(|t| t.as_str()),
        Some("ripemd160digest=8eb208f7e05d987a9b044a8e98c6b087f15a0bfc")
    );
    assert_eq!(report.token("cksum").map(|t| t.as_str()), Some("cksum=1219131554"));
}

#[test]
fn test_vector_export_is_json() {
    let json = vectors_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(
        value["digests"].as_array().map(Vec::len),
        Some(all_digest_vectors().len())
    );
}
