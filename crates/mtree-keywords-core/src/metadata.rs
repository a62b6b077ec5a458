//! Entry metadata and its provenance.
//!
//! Metadata comes from one of two sources: a live filesystem (`lstat`) or an
//! archive record. Archive records may store a link target and owner names
//! directly and may not carry a meaningful size for symlinks, so the source is
//! an explicit tag on the metadata rather than something extractors guess.

#[cfg(feature = "tar")]
use std::io;

use serde::{Deserialize, Serialize};

use crate::types::{FileKind, FileMode, Timestamp};

/// The type recorded in an archive header (the tar typeflag).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArchiveEntryType {
    Regular,
    HardLink,
    Symlink,
    CharDevice,
    BlockDevice,
    Directory,
    Fifo,
    Other(u8),
}

impl ArchiveEntryType {
    /// Decode a tar typeflag byte.
    pub const fn from_typeflag(flag: u8) -> Self {
        match flag {
            b'0' | b'\0' | b'7' => ArchiveEntryType::Regular,
            b'1' => ArchiveEntryType::HardLink,
            b'2' => ArchiveEntryType::Symlink,
            b'3' => ArchiveEntryType::CharDevice,
            b'4' => ArchiveEntryType::BlockDevice,
            b'5' => ArchiveEntryType::Directory,
            b'6' => ArchiveEntryType::Fifo,
            other => ArchiveEntryType::Other(other),
        }
    }

    /// The file kind an extracted entry of this type would have.
    ///
    /// Hard links extract as regular files.
    pub const fn file_kind(self) -> Option<FileKind> {
        match self {
            ArchiveEntryType::Regular | ArchiveEntryType::HardLink => Some(FileKind::Regular),
            ArchiveEntryType::Symlink => Some(FileKind::Symlink),
            ArchiveEntryType::CharDevice => Some(FileKind::CharDevice),
            ArchiveEntryType::BlockDevice => Some(FileKind::BlockDevice),
            ArchiveEntryType::Directory => Some(FileKind::Directory),
            ArchiveEntryType::Fifo => Some(FileKind::Fifo),
            ArchiveEntryType::Other(_) => None,
        }
    }
}

/// What an archive header recorded beyond the plain stat fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveOrigin {
    /// The explicit entry type from the header.
    pub entry_type: ArchiveEntryType,
    /// Recorded link target (symlinks and hard links); empty when absent.
    pub link_name: String,
    /// Recorded owner name, if the header carries one.
    pub user_name: Option<String>,
    /// Recorded group name, if the header carries one.
    pub group_name: Option<String>,
}

impl ArchiveOrigin {
    /// Create an origin record with no link target or names.
    pub fn new(entry_type: ArchiveEntryType) -> Self {
        Self {
            entry_type,
            link_name: String::new(),
            user_name: None,
            group_name: None,
        }
    }

    /// Set the recorded link target.
    pub fn link_name(mut self, target: impl Into<String>) -> Self {
        self.link_name = target.into();
        self
    }

    /// Set the recorded owner name.
    pub fn user_name(mut self, name: impl Into<String>) -> Self {
        self.user_name = Some(name.into());
        self
    }

    /// Set the recorded group name.
    pub fn group_name(mut self, name: impl Into<String>) -> Self {
        self.group_name = Some(name.into());
        self
    }
}

/// Where an entry's metadata came from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Provenance {
    /// Read from a live filesystem.
    #[default]
    Live,
    /// Read from an archive record.
    Archive(ArchiveOrigin),
}

/// The stat-like attributes of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub mode: FileMode,
    pub size: u64,
    pub mtime: Timestamp,
    pub uid: u32,
    pub gid: u32,
    pub nlink: u64,
    pub provenance: Provenance,
}

impl Metadata {
    /// Live-filesystem metadata with the given mode and every other field
    /// zeroed (one link).
    pub fn live(mode: FileMode) -> Self {
        Self {
            mode,
            size: 0,
            mtime: Timestamp::UNIX_EPOCH,
            uid: 0,
            gid: 0,
            nlink: 1,
            provenance: Provenance::Live,
        }
    }

    /// Archive-provenance metadata.
    ///
    /// The mode's type bits are replaced by the kind implied by the origin's
    /// entry type, so the archive header stays the authority on type.
    pub fn archive(mode: FileMode, origin: ArchiveOrigin) -> Self {
        let mode = match origin.entry_type.file_kind() {
            Some(kind) => FileMode::new(kind, mode.bits()),
            None => FileMode::from_bits(mode.bits() & 0o7777),
        };
        Self {
            provenance: Provenance::Archive(origin),
            ..Self::live(mode)
        }
    }

    /// The archive record, if this entry came from an archive.
    pub fn archive_origin(&self) -> Option<&ArchiveOrigin> {
        match &self.provenance {
            Provenance::Archive(origin) => Some(origin),
            Provenance::Live => None,
        }
    }

    /// Set the size in bytes.
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    /// Set the modification time.
    pub fn with_mtime(mut self, mtime: Timestamp) -> Self {
        self.mtime = mtime;
        self
    }

    /// Set the numeric owner and group ids.
    pub fn with_owner(mut self, uid: u32, gid: u32) -> Self {
        self.uid = uid;
        self.gid = gid;
        self
    }

    /// Set the hard link count.
    pub fn with_nlink(mut self, nlink: u64) -> Self {
        self.nlink = nlink;
        self
    }

    /// Build live metadata from `std::fs::symlink_metadata` output.
    #[cfg(unix)]
    pub fn from_fs(meta: &std::fs::Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;

        Self {
            mode: FileMode::from_bits(meta.mode()),
            size: meta.size(),
            mtime: Timestamp::from_unix_nanos(
                i128::from(meta.mtime()) * 1_000_000_000 + i128::from(meta.mtime_nsec()),
            ),
            uid: meta.uid(),
            gid: meta.gid(),
            nlink: meta.nlink(),
            provenance: Provenance::Live,
        }
    }

    /// Build archive metadata from a bare tar header block.
    ///
    /// Only the header block is read, so GNU long link names and PAX records
    /// are not seen; use [`Metadata::from_tar_entry`] for members of an
    /// archive. Numeric fields left blank (all NUL or spaces) read as zero.
    /// A link target that is not valid UTF-8 is an `InvalidData` error rather
    /// than being rewritten.
    #[cfg(feature = "tar")]
    pub fn from_tar_header(header: &tar::Header) -> io::Result<Self> {
        let entry_type = ArchiveEntryType::from_typeflag(header.entry_type().as_byte());
        let mut origin = ArchiveOrigin::new(entry_type);

        if let Some(link) = header.link_name_bytes() {
            origin.link_name = utf8_link_name(link.into_owned())?;
        }
        if let Ok(Some(name)) = header.username() {
            if !name.is_empty() {
                origin.user_name = Some(name.to_string());
            }
        }
        if let Ok(Some(name)) = header.groupname() {
            if !name.is_empty() {
                origin.group_name = Some(name.to_string());
            }
        }

        let raw = header.as_old();
        let numeric = |field: &[u8], parsed: io::Result<u64>| {
            if is_blank(field) {
                Ok(0)
            } else {
                parsed
            }
        };
        let mode = if is_blank(&raw.mode) { 0 } else { header.mode()? };
        let size = numeric(&raw.size[..], header.size())?;
        let mtime = numeric(&raw.mtime[..], header.mtime())?;
        let mtime = i64::try_from(mtime).map_err(|_| invalid_data("mtime out of range"))?;
        let uid = id_field("uid", numeric(&raw.uid[..], header.uid())?)?;
        let gid = id_field("gid", numeric(&raw.gid[..], header.gid())?)?;

        Ok(Self::archive(FileMode::from_bits(mode), origin)
            .with_size(size)
            .with_mtime(Timestamp::new(mtime, 0))
            .with_owner(uid, gid))
    }

    /// Build archive metadata for a member read through [`tar::Archive`].
    ///
    /// On top of [`Metadata::from_tar_header`] this applies the extensions
    /// recorded ahead of the member: the GNU long link name, and the PAX
    /// `linkpath`, `uname`, `gname`, `uid`, `gid`, `size` and `mtime` records,
    /// which take precedence over the header block. A PAX `mtime` keeps its
    /// fractional seconds.
    #[cfg(feature = "tar")]
    pub fn from_tar_entry<R: io::Read>(entry: &mut tar::Entry<'_, R>) -> io::Result<Self> {
        let mut meta = Self::from_tar_header(entry.header())?;

        if let Some(link) = entry.link_name_bytes().map(|link| link.into_owned()) {
            let link = utf8_link_name(link)?;
            if let Provenance::Archive(origin) = &mut meta.provenance {
                origin.link_name = link;
            }
        }
        if let Some(extensions) = entry.pax_extensions()? {
            for extension in extensions {
                let extension = extension?;
                if let (Ok(key), Ok(value)) = (extension.key(), extension.value()) {
                    meta.apply_pax(key, value)?;
                }
            }
        }
        Ok(meta)
    }

    #[cfg(feature = "tar")]
    fn apply_pax(&mut self, key: &str, value: &str) -> io::Result<()> {
        let parse = |what: &str| {
            value
                .parse::<u64>()
                .map_err(|_| invalid_data(format!("pax {what} {value:?} is not a number")))
        };
        match key {
            "uid" => self.uid = id_field("uid", parse("uid")?)?,
            "gid" => self.gid = id_field("gid", parse("gid")?)?,
            "size" => self.size = parse("size")?,
            "mtime" => {
                self.mtime = parse_pax_time(value)
                    .ok_or_else(|| invalid_data(format!("pax mtime {value:?} is malformed")))?;
            }
            "uname" | "gname" if !value.is_empty() => {
                if let Provenance::Archive(origin) = &mut self.provenance {
                    let name = Some(value.to_string());
                    if key == "uname" {
                        origin.user_name = name;
                    } else {
                        origin.group_name = name;
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(feature = "tar")]
fn invalid_data(message: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message.into())
}

/// A header numeric field that was never filled in.
#[cfg(feature = "tar")]
fn is_blank(field: &[u8]) -> bool {
    field.iter().all(|&b| b == 0 || b == b' ')
}

#[cfg(feature = "tar")]
fn id_field(what: &str, value: u64) -> io::Result<u32> {
    u32::try_from(value).map_err(|_| invalid_data(format!("{what} {value} out of range")))
}

#[cfg(feature = "tar")]
fn utf8_link_name(bytes: Vec<u8>) -> io::Result<String> {
    String::from_utf8(bytes).map_err(|err| {
        invalid_data(format!(
            "link target {:?} is not valid UTF-8",
            String::from_utf8_lossy(err.as_bytes())
        ))
    })
}

/// Parse a PAX decimal time such as `1600000000.25` or `-1.5`.
///
/// Digits past nanosecond precision are dropped.
#[cfg(feature = "tar")]
fn parse_pax_time(value: &str) -> Option<Timestamp> {
    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value),
    };
    let (secs, frac) = digits.split_once('.').unwrap_or((digits, ""));
    if secs.is_empty() || !secs.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let secs: i128 = secs.parse().ok()?;
    let nanos = frac
        .bytes()
        .chain(std::iter::repeat(b'0'))
        .take(9)
        .fold(0i128, |acc, b| acc * 10 + i128::from(b - b'0'));
    let total = secs.checked_mul(1_000_000_000)?.checked_add(nanos)?;
    Some(Timestamp::from_unix_nanos(if negative { -total } else { total }))
}
