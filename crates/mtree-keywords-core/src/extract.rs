//! Extractors for the metadata keywords.
//!
//! Each extractor is a stateless function of the entry. The content-reading
//! extractors (digests and `cksum`) live in [`crate::content`].

use std::fs;
use std::io;
use std::sync::Arc;

use crate::entry::Entry;
use crate::error::{ExtractError, Result};
use crate::hash::HashAlgorithm;
use crate::identity::IdentityLookup;
use crate::metadata::ArchiveEntryType;
use crate::token::Token;
use crate::types::{S_ISGID, S_ISUID, S_ISVTX};

/// Produces the token for one keyword.
///
/// Implementations return [`Token::empty`] when the keyword does not apply
/// to the entry, and an error only when it applies but cannot be computed.
pub trait Extractor: Send + Sync {
    fn extract(&self, entry: &mut Entry<'_>) -> Result<Token>;

    /// Whether this extractor consumes the entry's content stream.
    fn reads_content(&self) -> bool {
        false
    }
}

/// `size`: byte size, or the link target length for archive symlinks.
#[derive(Debug, Clone, Copy, Default)]
pub struct SizeExtractor;

impl Extractor for SizeExtractor {
    fn extract(&self, entry: &mut Entry<'_>) -> Result<Token> {
        let meta = entry.metadata();
        if let Some(origin) = meta.archive_origin() {
            if origin.entry_type == ArchiveEntryType::Symlink {
                return Ok(Token::new("size", origin.link_name.len()));
            }
        }
        Ok(Token::new("size", meta.size))
    }
}

/// `type`: dir, file, socket, link, fifo, char or device.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeExtractor;

impl Extractor for TypeExtractor {
    fn extract(&self, entry: &mut Entry<'_>) -> Result<Token> {
        let mode = entry.metadata().mode;
        let value = if mode.is_dir() {
            "dir"
        } else if mode.is_regular() {
            "file"
        } else if mode.is_socket() {
            "socket"
        } else if mode.is_symlink() {
            "link"
        } else if mode.is_fifo() {
            "fifo"
        } else if mode.is_device() {
            if mode.is_char_device() {
                "char"
            } else {
                "device"
            }
        } else {
            return Ok(Token::empty());
        };
        Ok(Token::new("type", value))
    }
}

/// `mode`: permission bits plus setuid, setgid and sticky, in octal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModeExtractor;

impl Extractor for ModeExtractor {
    fn extract(&self, entry: &mut Entry<'_>) -> Result<Token> {
        let mode = entry.metadata().mode;
        let mut permissions = mode.permissions();
        if mode.is_setuid() {
            permissions |= S_ISUID;
        }
        if mode.is_setgid() {
            permissions |= S_ISGID;
        }
        if mode.is_sticky() {
            permissions |= S_ISVTX;
        }
        if permissions == 0 {
            return Ok(Token::new("mode", 0));
        }
        Ok(Token::new("mode", format_args!("0{permissions:o}")))
    }
}

/// `time`: modification time as `<secs>.<nanos>` with nine fractional digits.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeExtractor;

impl Extractor for TimeExtractor {
    fn extract(&self, entry: &mut Entry<'_>) -> Result<Token> {
        let mtime = entry.metadata().mtime;
        if mtime.as_unix_nanos() == 0 {
            return Ok(Token::new("time", "0.000000000"));
        }
        Ok(Token::new(
            "time",
            format_args!("{}.{:09}", mtime.secs(), mtime.subsec_nanos()),
        ))
    }
}

/// `tar_time`: modification time truncated to whole seconds.
///
/// Archives rarely keep sub-second times, so comparing an archive-derived
/// tree against a live one on `time` would always differ.
#[derive(Debug, Clone, Copy, Default)]
pub struct TarTimeExtractor;

impl Extractor for TarTimeExtractor {
    fn extract(&self, entry: &mut Entry<'_>) -> Result<Token> {
        let secs = entry.metadata().mtime.secs();
        Ok(Token::new("tar_time", format_args!("{secs}.000000000")))
    }
}

/// `link`: the symlink target.
///
/// Targets are emitted verbatim. A live target that is not valid UTF-8 is a
/// [`ExtractError::ReadLink`] failure with `InvalidData`, never a lossy
/// rewrite.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkExtractor;

impl Extractor for LinkExtractor {
    fn extract(&self, entry: &mut Entry<'_>) -> Result<Token> {
        let meta = entry.metadata();
        if let Some(origin) = meta.archive_origin() {
            if origin.link_name.is_empty() {
                return Ok(Token::empty());
            }
            return Ok(Token::new("link", &origin.link_name));
        }

        if !meta.mode.is_symlink() {
            return Ok(Token::empty());
        }
        let path = entry.path();
        let read_link_error = |source| ExtractError::ReadLink {
            path: path.to_path_buf(),
            source,
        };
        let target = fs::read_link(path).map_err(read_link_error)?;
        let target = target.into_os_string().into_string().map_err(|_| {
            read_link_error(io::Error::new(
                io::ErrorKind::InvalidData,
                "link target is not valid UTF-8",
            ))
        })?;
        Ok(Token::new("link", target))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UidExtractor;

impl Extractor for UidExtractor {
    fn extract(&self, entry: &mut Entry<'_>) -> Result<Token> {
        Ok(Token::new("uid", entry.metadata().uid))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GidExtractor;

impl Extractor for GidExtractor {
    fn extract(&self, entry: &mut Entry<'_>) -> Result<Token> {
        Ok(Token::new("gid", entry.metadata().gid))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NlinkExtractor;

impl Extractor for NlinkExtractor {
    fn extract(&self, entry: &mut Entry<'_>) -> Result<Token> {
        Ok(Token::new("nlink", entry.metadata().nlink))
    }
}

/// `uname`: owner name, from the archive record when it has one.
pub struct UnameExtractor {
    identity: Arc<dyn IdentityLookup>,
}

impl UnameExtractor {
    pub fn new(identity: Arc<dyn IdentityLookup>) -> Self {
        Self { identity }
    }
}

impl Extractor for UnameExtractor {
    fn extract(&self, entry: &mut Entry<'_>) -> Result<Token> {
        let meta = entry.metadata();
        if let Some(name) = meta.archive_origin().and_then(|o| o.user_name.as_deref()) {
            return Ok(Token::new("uname", name));
        }
        let name = self
            .identity
            .user_name(meta.uid)
            .map_err(|source| ExtractError::UserLookup {
                uid: meta.uid,
                source,
            })?;
        Ok(Token::new("uname", name))
    }
}

/// `gname`: group name, from the archive record when it has one.
pub struct GnameExtractor {
    identity: Arc<dyn IdentityLookup>,
}

impl GnameExtractor {
    pub fn new(identity: Arc<dyn IdentityLookup>) -> Self {
        Self { identity }
    }
}

impl Extractor for GnameExtractor {
    fn extract(&self, entry: &mut Entry<'_>) -> Result<Token> {
        let meta = entry.metadata();
        if let Some(name) = meta.archive_origin().and_then(|o| o.group_name.as_deref()) {
            return Ok(Token::new("gname", name));
        }
        let name = self
            .identity
            .group_name(meta.gid)
            .map_err(|source| ExtractError::GroupLookup {
                gid: meta.gid,
                source,
            })?;
        Ok(Token::new("gname", name))
    }
}

/// `xattr`: one `xattr.<namespace>.<key>=<sha1>` pair per attribute.
///
/// Hashing keeps the value out of the manifest and fixes its width. Pairs
/// are sorted by attribute name so the token does not depend on the order
/// the attributes were listed in.
#[derive(Debug, Clone, Copy, Default)]
pub struct XattrExtractor;

impl Extractor for XattrExtractor {
    fn extract(&self, entry: &mut Entry<'_>) -> Result<Token> {
        let mut xattrs: Vec<_> = entry.xattrs().iter().collect();
        xattrs.sort_by(|a, b| (&a.namespace, &a.key).cmp(&(&b.namespace, &b.key)));

        Ok(Token::join(xattrs.into_iter().map(|xattr| {
            let digest = HashAlgorithm::Sha1.digest(&xattr.value);
            Token::new(&format!("xattr.{}", xattr.name()), hex::encode(digest))
        })))
    }
}
