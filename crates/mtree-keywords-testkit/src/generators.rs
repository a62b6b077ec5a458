//! Proptest generators for property-based testing.

use proptest::prelude::*;

use mtree_keywords_core::{
    ArchiveEntryType, ArchiveOrigin, FileKind, FileMode, Metadata, Timestamp, Xattr,
};

/// Generate any file kind.
pub fn file_kind() -> impl Strategy<Value = FileKind> {
    prop::sample::select(FileKind::ALL.to_vec())
}

/// Generate a non-regular file kind.
pub fn non_regular_kind() -> impl Strategy<Value = FileKind> {
    file_kind().prop_filter("non-regular", |kind| *kind != FileKind::Regular)
}

/// Generate permission and special bits (`0o0000..=0o7777`).
pub fn mode_bits() -> impl Strategy<Value = u32> {
    0u32..=0o7777
}

/// Generate a mode of the given kind.
pub fn file_mode_of(kind: FileKind) -> impl Strategy<Value = FileMode> {
    mode_bits().prop_map(move |bits| FileMode::new(kind, bits))
}

/// Generate a mode of any kind.
pub fn file_mode() -> impl Strategy<Value = FileMode> {
    (file_kind(), mode_bits()).prop_map(|(kind, bits)| FileMode::new(kind, bits))
}

/// Generate a timestamp, including pre-epoch ones.
pub fn timestamp() -> impl Strategy<Value = Timestamp> {
    (-(1i64 << 40)..(1i64 << 40), 0u32..1_000_000_000)
        .prop_map(|(secs, nanos)| Timestamp::new(secs, nanos))
}

/// Generate content bytes of up to `max_len` bytes.
pub fn content(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate an archive link name (possibly empty).
pub fn link_name() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_./-]{0,64}".prop_map(String::from)
}

/// Generate a list of extended attributes with distinct names.
pub fn xattrs() -> impl Strategy<Value = Vec<Xattr>> {
    prop::collection::btree_map(
        ("(user|trusted|security)", "[a-z_]{1,12}"),
        content(32),
        0..6,
    )
    .prop_map(|map| {
        map.into_iter()
            .map(|((namespace, key), value)| Xattr::new(namespace, key, value))
            .collect()
    })
}

/// Live metadata with every field randomised.
pub fn live_metadata() -> impl Strategy<Value = Metadata> {
    (file_mode(), any::<u64>(), timestamp(), any::<u32>(), any::<u32>(), 1u64..64).prop_map(
        |(mode, size, mtime, uid, gid, nlink)| {
            Metadata::live(mode)
                .with_size(size)
                .with_mtime(mtime)
                .with_owner(uid, gid)
                .with_nlink(nlink)
        },
    )
}

/// Generate an archive entry type for one of the mapped kinds.
pub fn archive_entry_type() -> impl Strategy<Value = ArchiveEntryType> {
    prop_oneof![
        Just(ArchiveEntryType::Regular),
        Just(ArchiveEntryType::HardLink),
        Just(ArchiveEntryType::Symlink),
        Just(ArchiveEntryType::CharDevice),
        Just(ArchiveEntryType::BlockDevice),
        Just(ArchiveEntryType::Directory),
        Just(ArchiveEntryType::Fifo),
    ]
}

/// Archive metadata with a randomised origin.
pub fn archive_metadata() -> impl Strategy<Value = Metadata> {
    (archive_entry_type(), link_name(), mode_bits(), any::<u64>(), timestamp()).prop_map(
        |(entry_type, link, bits, size, mtime)| {
            Metadata::archive(
                FileMode::from_bits(bits),
                ArchiveOrigin::new(entry_type).link_name(link),
            )
            .with_size(size)
            .with_mtime(mtime)
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtree_keywords_core::{Entry, KeywordRegistry};
    use std::io::Cursor;
    use std::path::Path;

    proptest! {
        #[test]
        fn test_file_mode_kind_round_trip(kind in file_kind(), bits in mode_bits()) {
            let mode = FileMode::new(kind, bits);
            prop_assert_eq!(mode.kind(), Some(kind));
            prop_assert_eq!(mode.bits() & 0o7777, bits);
        }

        #[test]
        fn test_archive_type_bits_follow_origin(meta in archive_metadata()) {
            let origin = meta.archive_origin().unwrap();
            prop_assert_eq!(meta.mode.kind(), origin.entry_type.file_kind());
        }

        #[test]
        fn test_size_is_link_length_for_archive_symlinks(meta in archive_metadata()) {
            let mut entry = Entry::new(Path::new("m"), &meta);
            let token = KeywordRegistry::global().extract("size", &mut entry).unwrap();
            let origin = meta.archive_origin().unwrap();
            let expected = if origin.entry_type == ArchiveEntryType::Symlink {
                origin.link_name.len() as u64
            } else {
                meta.size
            };
            let expected = expected.to_string();
            prop_assert_eq!(token.value(), Some(expected.as_str()));
        }

        #[test]
        fn test_digest_independent_of_metadata(
            mode in file_mode_of(FileKind::Regular),
            owner in any::<(u32, u32)>(),
            data in content(256),
        ) {
            let meta = Metadata::live(mode).with_owner(owner.0, owner.1);
            let plain = Metadata::live(FileMode::new(FileKind::Regular, 0o644));

            let digest = |meta: &Metadata| {
                let mut reader = Cursor::new(data.clone());
                let mut entry = Entry::new(Path::new("f"), meta).with_content(&mut reader);
                KeywordRegistry::global().extract("sha256", &mut entry).unwrap()
            };
            prop_assert_eq!(digest(&meta), digest(&plain));
        }
    }
}
