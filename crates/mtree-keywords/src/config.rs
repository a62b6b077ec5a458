//! Keyword set configuration.
//!
//! A [`KeywordSet`] is validated against the keyword registry when it is
//! built, so an unknown name is reported before any entry is touched.

use std::fmt;
use std::str::FromStr;

use mtree_keywords_core::{ExtractError, KeywordRegistry};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The classic default manifest keywords.
pub const DEFAULT_KEYWORDS: &[&str] = &["size", "type", "uid", "gid", "mode", "link", "nlink", "time"];

/// Defaults for archive-derived trees: `tar_time` in place of `time`.
pub const ARCHIVE_DEFAULT_KEYWORDS: &[&str] =
    &["size", "type", "uid", "gid", "mode", "link", "nlink", "tar_time"];

/// An ordered, duplicate-free list of recognised keyword names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct KeywordSet(Vec<String>);

impl KeywordSet {
    /// Build a keyword set, validating every name against the global registry.
    ///
    /// Duplicates are dropped, keeping the first occurrence.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_registry(KeywordRegistry::global(), names)
    }

    /// Build a keyword set, validating against the given registry.
    pub fn with_registry<I, S>(registry: &KeywordRegistry, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut keywords: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref();
            if !registry.contains(name) {
                return Err(ExtractError::UnknownKeyword(name.to_string()).into());
            }
            if keywords.iter().any(|k| k == name) {
                tracing::warn!(keyword = name, "duplicate keyword dropped from keyword set");
                continue;
            }
            keywords.push(name.to_string());
        }
        if keywords.is_empty() {
            return Err(Error::Config("keyword set is empty".into()));
        }
        Ok(Self(keywords))
    }

    /// Parse a comma- and/or whitespace-separated list such as `"size,type sha256"`.
    pub fn parse(s: &str) -> Result<Self> {
        Self::new(
            s.split(|c: char| c == ',' || c.is_whitespace())
                .filter(|name| !name.is_empty()),
        )
    }

    /// The default keywords with `tar_time` substituted for `time`.
    pub fn archive_default() -> Self {
        Self(ARCHIVE_DEFAULT_KEYWORDS.iter().map(|s| s.to_string()).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|k| k == name)
    }
}

impl Default for KeywordSet {
    fn default() -> Self {
        Self(DEFAULT_KEYWORDS.iter().map(|s| s.to_string()).collect())
    }
}

impl FromStr for KeywordSet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<Vec<String>> for KeywordSet {
    type Error = Error;

    fn try_from(names: Vec<String>) -> Result<Self> {
        Self::new(names)
    }
}

impl From<KeywordSet> for Vec<String> {
    fn from(set: KeywordSet) -> Self {
        set.0
    }
}

impl fmt::Display for KeywordSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(","))
    }
}

/// Configuration for extracting an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Keywords to produce, in output order.
    pub keywords: KeywordSet,
    /// Abort the entry on the first failing keyword. When false, failures are
    /// collected in the report and the remaining keywords still run.
    pub fail_fast: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            keywords: KeywordSet::default(),
            fail_fast: true,
        }
    }
}

impl ExtractConfig {
    pub fn new(keywords: KeywordSet) -> Self {
        Self {
            keywords,
            ..Self::default()
        }
    }

    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }
}
