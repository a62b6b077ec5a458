//! Extractors that consume the entry's content stream.
//!
//! Both apply to regular files only. For any other kind they return the
//! empty token without touching the stream.

use std::io::Read;
use std::path::Path;

use crate::cksum::cksum;
use crate::entry::Entry;
use crate::error::{ExtractError, Result};
use crate::extract::Extractor;
use crate::hash::HashAlgorithm;
use crate::token::Token;

fn content_stream<'e, 'a>(entry: &'e mut Entry<'a>) -> Result<&'e mut (dyn Read + 'a)> {
    let path = entry.path();
    entry
        .content()
        .ok_or_else(|| ExtractError::MissingContent(path.to_path_buf()))
}

fn read_error(path: &Path, source: std::io::Error) -> ExtractError {
    ExtractError::ContentRead {
        path: path.to_path_buf(),
        source,
    }
}

/// A content digest written as `<output>=<lowercase hex>`.
#[derive(Debug, Clone, Copy)]
pub struct DigestExtractor {
    algorithm: HashAlgorithm,
    output: &'static str,
}

impl DigestExtractor {
    pub const fn new(algorithm: HashAlgorithm, output: &'static str) -> Self {
        Self { algorithm, output }
    }

    pub const fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// The keyword written into the token.
    pub const fn output(&self) -> &'static str {
        self.output
    }
}

impl Extractor for DigestExtractor {
    fn extract(&self, entry: &mut Entry<'_>) -> Result<Token> {
        if !entry.metadata().mode.is_regular() {
            return Ok(Token::empty());
        }
        let path = entry.path();
        let digest = self
            .algorithm
            .digest_reader(content_stream(entry)?)
            .map_err(|e| read_error(path, e))?;
        Ok(Token::new(self.output, hex::encode(digest)))
    }

    fn reads_content(&self) -> bool {
        true
    }
}

/// `cksum`: the POSIX `cksum(1)` checksum in decimal.
#[derive(Debug, Clone, Copy, Default)]
pub struct CksumExtractor;

impl Extractor for CksumExtractor {
    fn extract(&self, entry: &mut Entry<'_>) -> Result<Token> {
        if !entry.metadata().mode.is_regular() {
            return Ok(Token::empty());
        }
        let path = entry.path();
        let (sum, _len) = cksum(content_stream(entry)?).map_err(|e| read_error(path, e))?;
        Ok(Token::new("cksum", sum))
    }

    fn reads_content(&self) -> bool {
        true
    }
}
