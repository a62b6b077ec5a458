//! Golden vectors for the content keywords.
//!
//! Digest values are the published test vectors for each algorithm. The
//! checksum values match `cksum(1)` output for the same input.

use mtree_keywords_core::{cksum, HashAlgorithm};
use serde::{Deserialize, Serialize};

/// A digest golden vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestVector {
    /// Human-readable name for the vector.
    pub name: String,
    /// Algorithm name as accepted by [`HashAlgorithm::from_name`].
    pub algorithm: String,
    /// Input bytes (hex).
    pub input: String,
    /// Expected digest (lowercase hex).
    pub expected: String,
}

/// A `cksum` golden vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CksumVector {
    pub name: String,
    /// Input bytes (hex).
    pub input: String,
    pub expected_sum: u32,
    pub expected_len: u64,
}

impl DigestVector {
    fn new(name: &str, algorithm: HashAlgorithm, input: &[u8], expected: &str) -> Self {
        Self {
            name: name.to_string(),
            algorithm: algorithm.name().to_string(),
            input: hex::encode(input),
            expected: expected.to_string(),
        }
    }

    pub fn algorithm(&self) -> Option<HashAlgorithm> {
        HashAlgorithm::from_name(&self.algorithm)
    }

    pub fn input_bytes(&self) -> Result<Vec<u8>, hex::FromHexError> {
        hex::decode(&self.input)
    }
}

impl CksumVector {
    fn new(name: &str, input: &[u8], expected_sum: u32) -> Self {
        Self {
            name: name.to_string(),
            input: hex::encode(input),
            expected_sum,
            expected_len: input.len() as u64,
        }
    }

    pub fn input_bytes(&self) -> Result<Vec<u8>, hex::FromHexError> {
        hex::decode(&self.input)
    }
}

/// All digest vectors: every algorithm over `""`, `"abc"` and `"hello world"`.
pub fn all_digest_vectors() -> Vec<DigestVector> {
    use HashAlgorithm::*;

    vec![
        DigestVector::new("md5 empty", Md5, b"", "d41d8cd98f00b204e9800998ecf8427e"),
        DigestVector::new("md5 abc", Md5, b"abc", "900150983cd24fb0d6963f7d28e17f72"),
        DigestVector::new(
            "md5 hello world",
            Md5,
            b"hello world",
            "5eb63bbbe01eeed093cb22bb8f5acdc3",
        ),
        DigestVector::new(
            "ripemd160 empty",
            Ripemd160,
            b"",
            "9c1185a5c5e9fc54612808977ee8f548b2258d31",
        ),
        DigestVector::new(
            "ripemd160 abc",
            Ripemd160,
            b"abc",
            "8eb208f7e05d987a9b044a8e98c6b087f15a0bfc",
        ),
        DigestVector::new(
            "ripemd160 hello world",
            Ripemd160,
            b"hello world",
            "98c615784ccb5fe5936fbc0cbe9dfdb408d92f0f",
        ),
        DigestVector::new("sha1 empty", Sha1, b"", "da39a3ee5e6b4b0d3255bfef95601890afd80709"),
        DigestVector::new("sha1 abc", Sha1, b"abc", "a9993e364706816aba3e25717850c26c9cd0d89d"),
        DigestVector::new(
            "sha1 hello world",
            Sha1,
            b"hello world",
            "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed",
        ),
        DigestVector::new(
            "sha256 empty",
            Sha256,
            b"",
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
        ),
        DigestVector::new(
            "sha256 abc",
            Sha256,
            b"abc",
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
        ),
        DigestVector::new(
            "sha256 hello world",
            Sha256,
            b"hello world",
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9",
        ),
        DigestVector::new(
            "sha384 empty",
            Sha384,
            b"",
            "38b060a751ac96384cd9327eb1b1e36a21fdb71114be07434c0cc7bf63f6e1da\
             274edebfe76f65fbd51ad2f14898b95b",
        ),
        DigestVector::new(
            "sha384 abc",
            Sha384,
            b"abc",
            "cb00753f45a35e8bb5a03d699ac65007272c32ab0eded1631a8b605a43ff5bed\
             8086072ba1e7cc2358baeca134c825a7",
        ),
        DigestVector::new(
            "sha384 hello world",
            Sha384,
            b"hello world",
            "fdbd8e75a67f29f701a4e040385e2e23986303ea10239211af907fcbb83578b3\
             e417cb71ce646efd0819dd8c088de1bd",
        ),
        DigestVector::new(
            "sha512 empty",
            Sha512,
            b"",
            "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce\
             47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e",
        ),
        DigestVector::new(
            "sha512 abc",
            Sha512,
            b"abc",
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
             2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f",
        ),
        DigestVector::new(
            "sha512 hello world",
            Sha512,
            b"hello world",
            "309ecc489c12d6eb4cc40f50c902f2b4d0ed77ee511a7c7a9bcd3ca86d4cd86f\
             989dd35bc5ff499670da34255b45b0cfd830e81f605dcf7dc5542e93ae9cd76f",
        ),
    ]
}

/// All `cksum` vectors.
pub fn all_cksum_vectors() -> Vec<CksumVector> {
    vec![
        CksumVector::new("empty", b"", 4294967295),
        CksumVector::new("abc", b"abc", 1219131554),
        CksumVector::new("check string", b"123456789", 930766865),
        CksumVector::new("hello world", b"hello world", 1135714720),
    ]
}

/// Run every vector and report `(name, matches, actual)`.
///
/// Call this to verify an implementation matches the reference.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    let digests = all_digest_vectors().into_iter().map(|v| {
        let actual = match (v.algorithm(), v.input_bytes()) {
            (Some(algorithm), Ok(input)) => hex::encode(algorithm.digest(&input)),
            (None, _) => format!("unknown algorithm {}", v.algorithm),
            (_, Err(e)) => e.to_string(),
        };
        let matches = actual == v.expected;
        (v.name, matches, actual)
    });

    let sums = all_cksum_vectors().into_iter().map(|v| {
        let result = v
            .input_bytes()
            .map_err(|e| e.to_string())
            .and_then(|input| cksum(&mut input.as_slice()).map_err(|e| e.to_string()));
        let name = format!("cksum {}", v.name);
        match result {
            Ok((sum, len)) => {
                let matches = sum == v.expected_sum && len == v.expected_len;
                (name, matches, format!("{sum} {len}"))
            }
            Err(e) => (name, false, e),
        }
    });

    digests.chain(sums).collect()
}

/// Export all vectors as pretty JSON for other implementations to consume.
pub fn vectors_json() -> serde_json::Result<String> {
    #[derive(Serialize)]
    struct Export {
        digests: Vec<DigestVector>,
        cksums: Vec<CksumVector>,
    }

    serde_json::to_string_pretty(&Export {
        digests: all_digest_vectors(),
        cksums: all_cksum_vectors(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_match() {
        for (name, matches, actual) in verify_all_vectors() {
            assert!(matches, "vector '{name}' produced {actual}");
        }
    }

    #[test]
    fn test_every_algorithm_covered() {
        let vectors = all_digest_vectors();
        for algorithm in HashAlgorithm::ALL {
            assert!(
                vectors.iter().any(|v| v.algorithm() == Some(algorithm)),
                "no vector for {algorithm}"
            );
        }
    }

    #[test]
    fn test_expected_lengths_match_output_len() {
        for v in all_digest_vectors() {
            let algorithm = v.algorithm().unwrap();
            assert_eq!(v.expected.len(), algorithm.output_len() * 2, "{}", v.name);
        }
    }

    #[test]
    fn test_json_export_round_trips() {
        let json = vectors_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let digests: Vec<DigestVector> =
            serde_json::from_value(value["digests"].clone()).unwrap();
        assert_eq!(digests.len(), all_digest_vectors().len());
        assert_eq!(value["cksums"][0]["expected_sum"], 4294967295u32);
    }
}
