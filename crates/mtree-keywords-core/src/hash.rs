//! Hash registry: the digest algorithms behind the digest keywords.
//!
//! Each [`HashAlgorithm`] hands out a fresh, independent [`Hasher`] on every
//! call, so no accumulator is ever shared between two entries.

use digest::Digest;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Read, Write};

/// Minimal incremental hashing interface.
pub trait Hasher: Send {
    fn update(&mut self, data: &[u8]);
    fn finalize(self: Box<Self>) -> Vec<u8>;
}

/// Adapter from any RustCrypto [`Digest`] to [`Hasher`].
pub struct DigestHasher<D>(D);

impl<D: Digest + Send> DigestHasher<D> {
    pub fn new() -> Self {
        Self(D::new())
    }
}

impl<D: Digest + Send> Default for DigestHasher<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Digest + Send> Hasher for DigestHasher<D> {
    fn update(&mut self, data: &[u8]) {
        Digest::update(&mut self.0, data);
    }

    fn finalize(self: Box<Self>) -> Vec<u8> {
        let this = *self;
        this.0.finalize().to_vec()
    }
}

/// Lets `io::copy` drive a hasher.
struct HashWriter(Box<dyn Hasher>);

impl Write for HashWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A supported content digest algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    Md5,
    Ripemd160,
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    /// All supported algorithms.
    pub const ALL: [HashAlgorithm; 6] = [
        HashAlgorithm::Md5,
        HashAlgorithm::Ripemd160,
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha384,
        HashAlgorithm::Sha512,
    ];

    /// Look up an algorithm by canonical name or common synonym,
    /// ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        let algorithm = match name.as_str() {
            "md5" => HashAlgorithm::Md5,
            "ripemd160" | "rmd160" | "ripemd-160" => HashAlgorithm::Ripemd160,
            "sha1" | "sha-1" => HashAlgorithm::Sha1,
            "sha256" | "sha-256" => HashAlgorithm::Sha256,
            "sha384" | "sha-384" => HashAlgorithm::Sha384,
            "sha512" | "sha-512" => HashAlgorithm::Sha512,
            _ => return None,
        };
        Some(algorithm)
    }

    /// The canonical identifier.
    pub const fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Ripemd160 => "ripemd160",
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
        }
    }

    /// Digest length in bytes.
    pub const fn output_len(self) -> usize {
        match self {
            HashAlgorithm::Md5 => 16,
            HashAlgorithm::Ripemd160 | HashAlgorithm::Sha1 => 20,
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
        }
    }

    /// A fresh accumulator.
    pub fn hasher(self) -> Box<dyn Hasher> {
        match self {
            HashAlgorithm::Md5 => Box::new(DigestHasher::<md5::Md5>::new()),
            HashAlgorithm::Ripemd160 => Box::new(DigestHasher::<ripemd::Ripemd160>::new()),
            HashAlgorithm::Sha1 => Box::new(DigestHasher::<sha1::Sha1>::new()),
            HashAlgorithm::Sha256 => Box::new(DigestHasher::<sha2::Sha256>::new()),
            HashAlgorithm::Sha384 => Box::new(DigestHasher::<sha2::Sha384>::new()),
            HashAlgorithm::Sha512 => Box::new(DigestHasher::<sha2::Sha512>::new()),
        }
    }

    /// Digest a byte slice in one call.
    pub fn digest(self, data: &[u8]) -> Vec<u8> {
        let mut hasher = self.hasher();
        hasher.update(data);
        hasher.finalize()
    }

    /// Digest a reader until EOF.
    pub fn digest_reader<R: Read + ?Sized>(self, reader: &mut R) -> io::Result<Vec<u8>> {
        let mut writer = HashWriter(self.hasher());
        io::copy(reader, &mut writer)?;
        Ok(writer.0.finalize())
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
