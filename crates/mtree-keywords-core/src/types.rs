//! Strong type definitions for entry metadata.
//!
//! The mode word uses the traditional Unix `st_mode` layout: the file type in
//! the `S_IFMT` bits, permission bits in the low nine, and the set-user-id,
//! set-group-id and sticky flags above them. Because the type is a single
//! field of the word, an entry can only ever classify as one kind.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Mask for the file type bits.
pub const S_IFMT: u32 = 0o170000;
/// Socket.
pub const S_IFSOCK: u32 = 0o140000;
/// Symbolic link.
pub const S_IFLNK: u32 = 0o120000;
/// Regular file.
pub const S_IFREG: u32 = 0o100000;
/// Block device.
pub const S_IFBLK: u32 = 0o060000;
/// Directory.
pub const S_IFDIR: u32 = 0o040000;
/// Character device.
pub const S_IFCHR: u32 = 0o020000;
/// Named pipe.
pub const S_IFIFO: u32 = 0o010000;

/// Set-user-id on execution.
pub const S_ISUID: u32 = 0o4000;
/// Set-group-id on execution.
pub const S_ISGID: u32 = 0o2000;
/// Sticky bit.
pub const S_ISVTX: u32 = 0o1000;

/// The kind of a filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileKind {
    Directory,
    Regular,
    Socket,
    Symlink,
    Fifo,
    CharDevice,
    BlockDevice,
}

impl FileKind {
    /// All kinds, in classification order.
    pub const ALL: [FileKind; 7] = [
        FileKind::Directory,
        FileKind::Regular,
        FileKind::Socket,
        FileKind::Symlink,
        FileKind::Fifo,
        FileKind::CharDevice,
        FileKind::BlockDevice,
    ];

    /// The `S_IFMT` bits for this kind.
    pub const fn type_bits(self) -> u32 {
        match self {
            FileKind::Directory => S_IFDIR,
            FileKind::Regular => S_IFREG,
            FileKind::Socket => S_IFSOCK,
            FileKind::Symlink => S_IFLNK,
            FileKind::Fifo => S_IFIFO,
            FileKind::CharDevice => S_IFCHR,
            FileKind::BlockDevice => S_IFBLK,
        }
    }

    /// The value written for `type=`.
    pub const fn as_str(self) -> &'static str {
        match self {
            FileKind::Directory => "dir",
            FileKind::Regular => "file",
            FileKind::Socket => "socket",
            FileKind::Symlink => "link",
            FileKind::Fifo => "fifo",
            FileKind::CharDevice => "char",
            FileKind::BlockDevice => "device",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A Unix mode word: file type, special flags and permission bits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileMode(pub u32);

impl FileMode {
    /// Build a mode from a kind and the low twelve bits (permissions plus
    /// setuid, setgid and sticky).
    pub const fn new(kind: FileKind, bits: u32) -> Self {
        Self(kind.type_bits() | (bits & 0o7777))
    }

    /// Create from a raw `st_mode` value.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Get the raw `st_mode` value.
    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// The classified kind, or `None` if the type bits match no known kind.
    pub fn kind(&self) -> Option<FileKind> {
        FileKind::ALL
            .into_iter()
            .find(|kind| self.0 & S_IFMT == kind.type_bits())
    }

    /// The bare `rwxrwxrwx` permission bits.
    pub const fn permissions(&self) -> u32 {
        self.0 & 0o777
    }

    /// Set-user-ID bit.
    pub const fn is_setuid(&self) -> bool {
        self.0 & S_ISUID != 0
    }

    /// Set-group-ID bit.
    pub const fn is_setgid(&self) -> bool {
        self.0 & S_ISGID != 0
    }

    /// Sticky bit.
    pub const fn is_sticky(&self) -> bool {
        self.0 & S_ISVTX != 0
    }

    /// Directory type bits.
    pub const fn is_dir(&self) -> bool {
        self.0 & S_IFMT == S_IFDIR
    }

    /// Regular file type bits.
    pub const fn is_regular(&self) -> bool {
        self.0 & S_IFMT == S_IFREG
    }

    /// Socket type bits.
    pub const fn is_socket(&self) -> bool {
        self.0 & S_IFMT == S_IFSOCK
    }

    /// Symbolic link type bits.
    pub const fn is_symlink(&self) -> bool {
        self.0 & S_IFMT == S_IFLNK
    }

    /// Named pipe type bits.
    pub const fn is_fifo(&self) -> bool {
        self.0 & S_IFMT == S_IFIFO
    }

    /// Character device type bits.
    pub const fn is_char_device(&self) -> bool {
        self.0 & S_IFMT == S_IFCHR
    }

    /// True for both character and block devices.
    pub const fn is_device(&self) -> bool {
        let fmt = self.0 & S_IFMT;
        fmt == S_IFCHR || fmt == S_IFBLK
    }
}

impl fmt::Debug for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileMode({:#o})", self.0)
    }
}

impl From<u32> for FileMode {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

const NANOS_PER_SEC: i128 = 1_000_000_000;

/// A modification time with nanosecond resolution.
///
/// Invariant: `nanos < 1_000_000_000`. Times before the epoch carry the sign
/// in `secs` (floor semantics), so -0.5s is `{ secs: -1, nanos: 500_000_000 }`.
/// Deserialization goes through [`Timestamp::new`], so an overflowing
/// `nanos` is carried into `secs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "RawTimestamp")]
pub struct Timestamp {
    secs: i64,
    nanos: u32,
}

/// The serialized shape of [`Timestamp`] before normalisation.
#[derive(Deserialize)]
struct RawTimestamp {
    secs: i64,
    nanos: u32,
}

impl From<RawTimestamp> for Timestamp {
    fn from(raw: RawTimestamp) -> Self {
        Self::new(raw.secs, raw.nanos)
    }
}

impl Timestamp {
    /// The Unix epoch.
    pub const UNIX_EPOCH: Self = Self { secs: 0, nanos: 0 };

    /// Create from seconds and nanoseconds, carrying any nanosecond overflow
    /// into the seconds.
    pub fn new(secs: i64, nanos: u32) -> Self {
        let carry = i64::from(nanos / 1_000_000_000);
        Self {
            secs: secs.saturating_add(carry),
            nanos: nanos % 1_000_000_000,
        }
    }

    /// Create from a raw nanosecond count since the epoch.
    pub fn from_unix_nanos(nanos: i128) -> Self {
        let secs = nanos.div_euclid(NANOS_PER_SEC);
        let nanos = nanos.rem_euclid(NANOS_PER_SEC) as u32;
        let secs = secs.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64;
        Self { secs, nanos }
    }

    /// Whole seconds since the epoch, rounded toward negative infinity.
    pub const fn secs(&self) -> i64 {
        self.secs
    }

    /// Sub-second nanoseconds, always in `0..1_000_000_000`.
    pub const fn subsec_nanos(&self) -> u32 {
        self.nanos
    }

    /// The raw nanosecond count since the epoch.
    pub fn as_unix_nanos(&self) -> i128 {
        i128::from(self.secs) * NANOS_PER_SEC + i128::from(self.nanos)
    }
}

impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(after) => Self::from_unix_nanos(after.as_nanos() as i128),
            Err(before) => Self::from_unix_nanos(-(before.duration().as_nanos() as i128)),
        }
    }
}
