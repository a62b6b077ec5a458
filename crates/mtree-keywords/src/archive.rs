//! Keyword extraction over the members of a tar archive.
//!
//! A tar member's data can only be read once, in archive order. Members that
//! need a content keyword are buffered in memory so each content keyword gets
//! its own cursor over the same bytes.
//!
//! A hard link member carries no data of its own. It is measured and hashed
//! as the earlier member it names, so the bytes of every regular member stay
//! buffered until the archive is finished when a content keyword is
//! requested.

use std::collections::HashMap;
use std::io::{self, Cursor, Read};
use std::path::PathBuf;
use std::rc::Rc;

use mtree_keywords_core::{ArchiveEntryType, KeywordRegistry, Metadata};

use crate::config::ExtractConfig;
use crate::error::{Error, Result};
use crate::extract::{extract_entry, EntryReport};

/// What later hard links need to know about a regular member.
struct LinkTarget {
    size: u64,
    content: Rc<[u8]>,
}

/// Extract the configured keywords for every member of a tar archive, in
/// archive order.
///
/// A hard link whose target is not an earlier regular member fails with
/// [`Error::Archive`].
pub fn extract_tar<R: Read>(
    registry: &KeywordRegistry,
    config: &ExtractConfig,
    archive: &mut tar::Archive<R>,
) -> Result<Vec<EntryReport>> {
    let mut needs_content = false;
    for name in config.keywords.iter() {
        needs_content |= registry.resolve(name)?.reads_content();
    }

    let mut targets: HashMap<PathBuf, LinkTarget> = HashMap::new();
    let mut reports = Vec::new();
    for member in archive.entries().map_err(Error::Archive)? {
        let mut member = member.map_err(Error::Archive)?;
        let path = member.path().map_err(Error::Archive)?.into_owned();
        let mut metadata = Metadata::from_tar_entry(&mut member).map_err(Error::Archive)?;

        let hard_link = metadata
            .archive_origin()
            .filter(|origin| origin.entry_type == ArchiveEntryType::HardLink)
            .map(|origin| PathBuf::from(&origin.link_name));

        let content: Rc<[u8]> = match hard_link {
            Some(target) => {
                let linked = targets.get(&target).ok_or_else(|| {
                    Error::Archive(io::Error::new(
                        io::ErrorKind::NotFound,
                        format!(
                            "hard link {} names {}, which is not an earlier member",
                            path.display(),
                            target.display()
                        ),
                    ))
                })?;
                tracing::trace!(
                    path = %path.display(),
                    target = %target.display(),
                    "resolved hard link"
                );
                metadata.size = linked.size;
                Rc::clone(&linked.content)
            }
            None if metadata.mode.is_regular() => {
                let mut buf = Vec::new();
                if needs_content {
                    member.read_to_end(&mut buf).map_err(Error::Archive)?;
                }
                Rc::from(buf)
            }
            None => Rc::from(Vec::new()),
        };

        if metadata.mode.is_regular() {
            targets.insert(
                path.clone(),
                LinkTarget {
                    size: metadata.size,
                    content: Rc::clone(&content),
                },
            );
        }

        let data = &content[..];
        let report = extract_entry(registry, config, &path, &metadata, &[], || {
            Ok(Cursor::new(data))
        })?;
        reports.push(report);
    }

    tracing::debug!(entries = reports.len(), "extracted archive");
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeywordSet;

    fn build_archive() -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());

        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Regular);
        header.set_size(3);
        header.set_mode(0o644);
        header.set_mtime(1_600_000_000);
        builder.append_data(&mut header, "dir/file.txt", &b"abc"[..]).unwrap();

        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Symlink);
        header.set_size(0);
        header.set_mode(0o777);
        header.set_mtime(1_600_000_000);
        builder
            .append_link(&mut header, "dir/link", "target.txt")
            .unwrap();

        builder.into_inner().unwrap()
    }

    #[test]
    fn test_extract_tar_members() {
        let bytes = build_archive();
        let mut archive = tar::Archive::new(bytes.as_slice());
        let config = ExtractConfig::new(KeywordSet::parse("type,size,link,tar_time,sha1").unwrap());

        let reports = extract_tar(KeywordRegistry::global(), &config, &mut archive).unwrap();
        assert_eq!(reports.len(), 2);

        assert_eq!(
            reports[0].manifest_line(),
            "type=file size=3 tar_time=1600000000.000000000 \
             sha1digest=a9993e364706816aba3e25717850c26c9cd0d89d"
        );
        assert_eq!(
            reports[1].manifest_line(),
            "type=link size=10 link=target.txt tar_time=1600000000.000000000"
        );
    }

    fn run(bytes: &[u8], keywords: &str) -> Result<Vec<EntryReport>> {
        let mut archive = tar::Archive::new(bytes);
        let config = ExtractConfig::new(KeywordSet::parse(keywords).unwrap());
        extract_tar(KeywordRegistry::global(), &config, &mut archive)
    }

    fn regular(builder: &mut tar::Builder<Vec<u8>>, path: &str, data: &[u8]) {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Regular);
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        builder.append_data(&mut header, path, data).unwrap();
    }

    fn link(builder: &mut tar::Builder<Vec<u8>>, kind: tar::EntryType, path: &str, target: &str) {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(kind);
        header.set_size(0);
        header.set_mode(0o777);
        builder.append_link(&mut header, path, target).unwrap();
    }

    #[test]
    fn test_extract_tar_long_symlink_target() {
        let target = "t".repeat(150);
        let mut builder = tar::Builder::new(Vec::new());
        link(&mut builder, tar::EntryType::Symlink, "long", &target);
        let bytes = builder.into_inner().unwrap();

        let reports = run(&bytes, "size,link").unwrap();
        assert_eq!(reports[0].manifest_line(), format!("size=150 link={target}"));
    }

    #[test]
    fn test_extract_tar_hard_link_uses_target_content() {
        let mut builder = tar::Builder::new(Vec::new());
        regular(&mut builder, "a", b"abc");
        link(&mut builder, tar::EntryType::Link, "b", "a");
        let bytes = builder.into_inner().unwrap();

        let reports = run(&bytes, "type,size,sha1").unwrap();
        let expected = "type=file size=3 sha1digest=a9993e364706816aba3e25717850c26c9cd0d89d";
        assert_eq!(reports[0].manifest_line(), expected);
        assert_eq!(reports[1].manifest_line(), expected);
    }

    #[test]
    fn test_extract_tar_hard_link_without_target_fails() {
        let mut builder = tar::Builder::new(Vec::new());
        link(&mut builder, tar::EntryType::Link, "b", "missing");
        let bytes = builder.into_inner().unwrap();

        let err = run(&bytes, "sha1").unwrap_err();
        assert!(matches!(err, Error::Archive(ref e) if e.kind() == io::ErrorKind::NotFound));
    }

    #[test]
    fn test_extract_tar_blank_header_fields() {
        let mut builder = tar::Builder::new(Vec::new());
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Regular);
        header.set_size(3);
        header.as_old_mut().mtime = [0; 12];
        builder.append_data(&mut header, "bare", &b"abc"[..]).unwrap();
        regular(&mut builder, "next", b"");
        let bytes = builder.into_inner().unwrap();

        let reports = run(&bytes, "uid,gid,mode,tar_time,size").unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(
            reports[0].manifest_line(),
            "uid=0 gid=0 mode=0 tar_time=0.000000000 size=3"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_extract_tar_non_utf8_link_target_fails() {
        use std::os::unix::ffi::OsStrExt;

        let mut builder = tar::Builder::new(Vec::new());
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Symlink);
        header.set_size(0);
        header
            .set_link_name(std::ffi::OsStr::from_bytes(b"bad\xfftarget"))
            .unwrap();
        builder.append_data(&mut header, "l", io::empty()).unwrap();
        let bytes = builder.into_inner().unwrap();

        let err = run(&bytes, "link").unwrap_err();
        assert!(matches!(err, Error::Archive(ref e) if e.kind() == io::ErrorKind::InvalidData));
    }
}
