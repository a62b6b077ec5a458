//! Entry: the subject of extraction.

use std::fmt;
use std::io::Read;
use std::path::Path;

use crate::metadata::Metadata;

/// An extended attribute value already fetched by the caller.
#[derive(Clone, PartialEq, Eq)]
pub struct Xattr {
    pub namespace: String,
    pub key: String,
    pub value: Vec<u8>,
}

impl Xattr {
    pub fn new(namespace: impl Into<String>, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
            value: value.into(),
        }
    }

    /// Split a full attribute name such as `user.mime_type` at the first dot.
    ///
    /// Returns `None` when the name has no namespace part.
    pub fn from_name(name: &str, value: impl Into<Vec<u8>>) -> Option<Self> {
        let (namespace, key) = name.split_once('.')?;
        if namespace.is_empty() || key.is_empty() {
            return None;
        }
        Some(Self::new(namespace, key, value))
    }

    /// The full `namespace.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.namespace, self.key)
    }
}

impl fmt::Debug for Xattr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Xattr({}.{}, {} bytes)", self.namespace, self.key, self.value.len())
    }
}

/// One entry handed to an extractor.
///
/// The content stream is a single cursor owned by the caller. Extractors
/// read it to the end and never rewind it, so a caller asking for more than
/// one content keyword must supply a fresh stream for each.
pub struct Entry<'a> {
    path: &'a Path,
    metadata: &'a Metadata,
    content: Option<&'a mut dyn Read>,
    xattrs: &'a [Xattr],
}

impl<'a> Entry<'a> {
    /// An entry with no content stream and no extended attributes.
    pub fn new(path: &'a Path, metadata: &'a Metadata) -> Self {
        Self {
            path,
            metadata,
            content: None,
            xattrs: &[],
        }
    }

    /// Attach the content stream, positioned at offset 0.
    pub fn with_content(mut self, content: &'a mut dyn Read) -> Self {
        self.content = Some(content);
        self
    }

    /// Attach already-fetched extended attributes.
    pub fn with_xattrs(mut self, xattrs: &'a [Xattr]) -> Self {
        self.xattrs = xattrs;
        self
    }

    pub fn path(&self) -> &'a Path {
        self.path
    }

    pub fn metadata(&self) -> &'a Metadata {
        self.metadata
    }

    pub fn xattrs(&self) -> &'a [Xattr] {
        self.xattrs
    }

    /// The content stream, if one was attached.
    pub fn content(&mut self) -> Option<&mut (dyn Read + 'a)> {
        self.content.as_deref_mut()
    }

    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }
}

impl fmt::Debug for Entry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("path", &self.path)
            .field("metadata", &self.metadata)
            .field("has_content", &self.content.is_some())
            .field("xattrs", &self.xattrs)
            .finish()
    }
}
