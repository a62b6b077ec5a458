//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use mtree_keywords_core::{
    ArchiveEntryType, ArchiveOrigin, FileKind, FileMode, IdentityLookup, KeywordRegistry,
    Metadata, Timestamp,
};
use tempfile::TempDir;

/// An identity lookup backed by fixed tables, so `uname`/`gname` tests do
/// not depend on the host's user database.
#[derive(Debug, Clone, Default)]
pub struct FixedIdentity {
    users: HashMap<u32, String>,
    groups: HashMap<u32, String>,
}

impl FixedIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(mut self, uid: u32, name: &str) -> Self {
        self.users.insert(uid, name.to_string());
        self
    }

    pub fn group(mut self, gid: u32, name: &str) -> Self {
        self.groups.insert(gid, name.to_string());
        self
    }

    /// A registry whose `uname`/`gname` resolve through this table.
    pub fn registry(self) -> KeywordRegistry {
        KeywordRegistry::new(Arc::new(self))
    }
}

impl IdentityLookup for FixedIdentity {
    fn user_name(&self, uid: u32) -> io::Result<String> {
        self.users
            .get(&uid)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no user {uid}")))
    }

    fn group_name(&self, gid: u32) -> io::Result<String> {
        self.groups
            .get(&gid)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no group {gid}")))
    }
}

/// Live metadata for a regular file of the given size and permissions.
pub fn regular_file(size: u64, perm: u32) -> Metadata {
    Metadata::live(FileMode::new(FileKind::Regular, perm)).with_size(size)
}

/// Live metadata for a directory.
pub fn directory(perm: u32) -> Metadata {
    Metadata::live(FileMode::new(FileKind::Directory, perm))
}

/// Live metadata for a symlink.
pub fn symlink() -> Metadata {
    Metadata::live(FileMode::new(FileKind::Symlink, 0o777))
}

/// Archive metadata for a symlink member pointing at `target`.
pub fn archive_symlink(target: &str, mtime: i64) -> Metadata {
    Metadata::archive(
        FileMode::from_bits(0o777),
        ArchiveOrigin::new(ArchiveEntryType::Symlink).link_name(target),
    )
    .with_mtime(Timestamp::new(mtime, 0))
}

/// A scratch directory tree removed on drop.
pub struct TempTree {
    dir: TempDir,
}

impl TempTree {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Resolve a path relative to the tree root.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Write a file, creating parent directories.
    pub fn file(&self, rel: &str, contents: &[u8]) -> io::Result<PathBuf> {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn dir(&self, rel: &str) -> io::Result<PathBuf> {
        let path = self.path(rel);
        fs::create_dir_all(&path)?;
        Ok(path)
    }

    #[cfg(unix)]
    pub fn symlink(&self, rel: &str, target: &str) -> io::Result<PathBuf> {
        let path = self.path(rel);
        std::os::unix::fs::symlink(target, &path)?;
        Ok(path)
    }

    /// Set permission bits on a path inside the tree.
    #[cfg(unix)]
    pub fn chmod(&self, rel: &str, mode: u32) -> io::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        fs::set_permissions(self.path(rel), fs::Permissions::from_mode(mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtree_keywords_core::Entry;

    #[test]
    fn test_fixed_identity_registry() {
        let registry = FixedIdentity::new().user(1000, "alice").group(50, "staff").registry();
        let meta = regular_file(0, 0o644).with_owner(1000, 50);
        let mut entry = Entry::new(Path::new("f"), &meta);

        assert_eq!(registry.extract("uname", &mut entry).unwrap().as_str(), "uname=alice");
        assert_eq!(registry.extract("gname", &mut entry).unwrap().as_str(), "gname=staff");
    }

    #[test]
    fn test_fixed_identity_unknown() {
        let identity = FixedIdentity::new();
        let err = identity.user_name(1).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_temp_tree_layout() {
        let tree = TempTree::new().unwrap();
        let file = tree.file("a/b/c.txt", b"hi").unwrap();
        assert_eq!(fs::read(&file).unwrap(), b"hi");
        assert!(tree.dir("d").unwrap().is_dir());
        assert!(file.starts_with(tree.root()));
    }
}
