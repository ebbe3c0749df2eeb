#![forbid(unsafe_code)]

use std::io::{self, Read, Write};

use tracing::debug;

use crate::nwf::error::{NwfError, NwfResult};
use crate::nwf::format::{ArchiveEntry, ArchiveManifest, HEADER_LEN, MAGIC};
use crate::nwf::io::{write_i16, write_i32};

/// Length of the header plus the whole entry table, i.e. where content starts.
pub fn table_len(manifest: &ArchiveManifest) -> i64 {
    HEADER_LEN + manifest.iter().map(|e| e.record_len()).sum::<i64>()
}

/// NWF layout:
/// - [i32 magic][i32 reserved = 0][i32 entry_count]
/// - entries...
///   - [i32 name_len][name bytes UTF-8]
///   - [i16 flag1][i16 flag2][i32 flag3]
///   - [i32 offset][i32 size]
/// - content blobs, in table order, `size` bytes each
///
/// Offsets and sizes are written as found on the entries; run the manifest
/// through the planner first. `open` supplies each entry's content and must
/// yield at least `size` bytes.
pub fn encode<W, F, R>(manifest: &ArchiveManifest, out: &mut W, mut open: F) -> NwfResult<()>
where
    W: Write,
    F: FnMut(&ArchiveEntry) -> io::Result<R>,
    R: Read,
{
    let count = i32::try_from(manifest.len())
        .map_err(|_| NwfError::Overflow(format!("{} entries", manifest.len())))?;

    write_i32(out, MAGIC)?;
    write_i32(out, 0)?;
    write_i32(out, count)?;

    for (i, e) in manifest.iter().enumerate() {
        let name = e.path.as_bytes();
        let name_len = i32::try_from(name.len())
            .map_err(|_| NwfError::Overflow(e.path.clone()).in_entry(i, &e.path))?;
        write_i32(out, name_len)?;
        out.write_all(name)?;
        write_i16(out, e.flag1)?;
        write_i16(out, e.flag2)?;
        write_i32(out, e.flag3)?;
        write_i32(out, e.offset)?;
        write_i32(out, e.size)?;
    }

    for (i, e) in manifest.iter().enumerate() {
        if e.size < 0 {
            return Err(NwfError::Format(format!("negative size {}", e.size)).in_entry(i, &e.path));
        }
        copy_content(e.size as u64, &mut open, e, &mut *out).map_err(|err| err.in_entry(i, &e.path))?;
        debug!(path = %e.path, offset = e.offset, size = e.size, "packed");
    }

    out.flush()?;
    Ok(())
}

fn copy_content<W, F, R>(
    size: u64,
    open: &mut F,
    entry: &ArchiveEntry,
    out: &mut W,
) -> NwfResult<()>
where
    W: Write,
    F: FnMut(&ArchiveEntry) -> io::Result<R>,
    R: Read,
{
    let src = open(entry)?;
    let copied = io::copy(&mut src.take(size), out)?;
    if copied < size {
        return Err(NwfError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("content source gave {copied} of {size} bytes"),
        )));
    }
    Ok(())
}
