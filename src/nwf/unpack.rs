#![forbid(unsafe_code)]

use std::fs;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use tracing::{debug, info};

use crate::nwf::error::{NwfError, NwfResult};
use crate::nwf::format::{ArchiveEntry, ArchiveManifest, MAX_ENTRY_SIZE};
use crate::nwf::io::read_vec;
use crate::nwf::path::resolve;

#[derive(Debug, Clone)]
pub struct UnpackOptions {
    /// Entries declaring more than this many bytes abort the unpack unread.
    pub max_entry_size: u64,
    /// Only extract entries whose path contains one of these substrings.
    pub filter: Vec<String>,
}

impl Default for UnpackOptions {
    fn default() -> Self {
        Self {
            max_entry_size: MAX_ENTRY_SIZE,
            filter: Vec::new(),
        }
    }
}

impl UnpackOptions {
    fn wants(&self, path: &str) -> bool {
        self.filter.is_empty() || self.filter.iter().any(|s| path.contains(s.as_str()))
    }
}

/// Extracts every entry of `manifest` from `archive` into `output`, in order.
///
/// The first failing entry aborts the rest; the error carries its index and
/// path. Returns the number of files written.
pub fn unpack<R: Read + Seek>(
    archive: &mut R,
    manifest: &ArchiveManifest,
    output: &Path,
    opts: &UnpackOptions,
) -> NwfResult<usize> {
    let total = manifest.len();
    let mut written = 0;

    for (i, e) in manifest.iter().enumerate() {
        if !opts.wants(&e.path) {
            continue;
        }
        debug!(path = %e.path, "reading file ({}/{})", i + 1, total);
        extract_one(archive, e, output, opts).map_err(|err| err.in_entry(i, &e.path))?;
        written += 1;
    }

    info!(written, total, output = %output.display(), "unpacked");
    Ok(written)
}

fn extract_one<R: Read + Seek>(
    archive: &mut R,
    e: &ArchiveEntry,
    output: &Path,
    opts: &UnpackOptions,
) -> NwfResult<()> {
    if e.size < 0 || e.offset < 0 {
        return Err(NwfError::Format(format!(
            "negative offset/size {}/{}",
            e.offset, e.size
        )));
    }
    if e.size as u64 > opts.max_entry_size {
        return Err(NwfError::SizeSanity {
            path: e.path.clone(),
            size: e.size,
            limit: opts.max_entry_size,
        });
    }
    let out_path = resolve(output, &e.path)?;

    archive.seek(SeekFrom::Start(e.offset as u64))?;
    let data = read_vec(archive, e.size as u64)?;

    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&out_path, &data)?;
    debug!(to = %out_path.display(), bytes = data.len(), "wrote file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn entry(path: &str, offset: i32, size: i32) -> ArchiveEntry {
        ArchiveEntry {
            offset,
            size,
            ..ArchiveEntry::new(path, 0, 0, 0)
        }
    }

    #[test]
    fn writes_each_entry_at_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut archive = Cursor::new(b"....hello world".to_vec());
        let m = ArchiveManifest::new(vec![entry("a/x.txt", 4, 5), entry("y.txt", 10, 5)]);

        let n = unpack(&mut archive, &m, dir.path(), &UnpackOptions::default()).unwrap();
        assert_eq!(n, 2);
        assert_eq!(fs::read(dir.path().join("a").join("x.txt")).unwrap(), b"hello");
        assert_eq!(fs::read(dir.path().join("y.txt")).unwrap(), b"world");
    }

    #[test]
    fn oversized_entry_is_rejected_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        // Nothing to read at all: the sanity check has to trip first.
        let mut archive = Cursor::new(Vec::new());
        let m = ArchiveManifest::new(vec![entry("big.bin", 0, 52_428_801)]);

        let err = unpack(&mut archive, &m, dir.path(), &UnpackOptions::default()).unwrap_err();
        match err.root() {
            NwfError::SizeSanity { path, size, .. } => {
                assert_eq!(path, "big.bin");
                assert_eq!(*size, 52_428_801);
            }
            other => panic!("expected size sanity error, got {other:?}"),
        }
        assert!(!dir.path().join("big.bin").exists());
    }

    #[test]
    fn limit_is_inclusive() {
        let dir = tempfile::tempdir().unwrap();
        let mut archive = Cursor::new(vec![7u8; 8]);
        let m = ArchiveManifest::new(vec![entry("edge.bin", 0, 8)]);
        let opts = UnpackOptions {
            max_entry_size: 8,
            ..UnpackOptions::default()
        };
        assert_eq!(unpack(&mut archive, &m, dir.path(), &opts).unwrap(), 1);
    }

    #[test]
    fn short_archive_is_truncated_and_stops() {
        let dir = tempfile::tempdir().unwrap();
        let mut archive = Cursor::new(b"abcdef".to_vec());
        let m = ArchiveManifest::new(vec![
            entry("ok.bin", 0, 2),
            entry("cut.bin", 2, 100),
            entry("never.bin", 0, 1),
        ]);

        let err = unpack(&mut archive, &m, dir.path(), &UnpackOptions::default()).unwrap_err();
        match &err {
            NwfError::Entry { index, path, source } => {
                assert_eq!(*index, 1);
                assert_eq!(path, "cut.bin");
                assert!(matches!(**source, NwfError::Truncated(_)));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(dir.path().join("ok.bin").exists());
        assert!(!dir.path().join("cut.bin").exists());
        assert!(!dir.path().join("never.bin").exists());
    }

    #[test]
    fn filter_limits_extracted_entries() {
        let dir = tempfile::tempdir().unwrap();
        let mut archive = Cursor::new(b"aabb".to_vec());
        let m = ArchiveManifest::new(vec![
            entry("sounds/a.ogg", 0, 2),
            entry("textures/b.png", 2, 2),
        ]);
        let opts = UnpackOptions {
            filter: vec!["textures/".into()],
            ..UnpackOptions::default()
        };

        assert_eq!(unpack(&mut archive, &m, dir.path(), &opts).unwrap(), 1);
        assert!(!dir.path().join("sounds").exists());
        assert_eq!(fs::read(dir.path().join("textures").join("b.png")).unwrap(), b"bb");
    }
}
