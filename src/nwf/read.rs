#![forbid(unsafe_code)]

use std::io::Read;

use tracing::debug;

use crate::nwf::error::{NwfError, NwfResult};
use crate::nwf::format::{ArchiveEntry, ArchiveManifest, MAGIC};
use crate::nwf::io::{read_exact, read_i16, read_i32, read_vec};

/// Cap on up-front allocation for the entry list; the real count may be bogus.
const PREALLOC_ENTRIES: usize = 4096;

/// Returns true iff the first four bytes are the NWF magic.
///
/// Reads nothing past the magic. Short or unreadable input is simply `false`,
/// so callers can probe arbitrary files.
pub fn verify(r: &mut dyn Read) -> bool {
    match read_exact::<4>(r) {
        Ok(head) => i32::from_le_bytes(head) == MAGIC,
        Err(_) => false,
    }
}

/// Decodes the header and entry table. Content bytes are not read.
pub fn decode(r: &mut dyn Read) -> NwfResult<ArchiveManifest> {
    let magic = read_i32(r).map_err(|e| truncated_at(e, "magic"))?;
    if magic != MAGIC {
        return Err(NwfError::Format(format!("bad magic {magic:#010x}")));
    }

    let _reserved = read_i32(r).map_err(|e| truncated_at(e, "reserved field"))?;
    let count = read_i32(r).map_err(|e| truncated_at(e, "entry count"))?;
    if count < 0 {
        return Err(NwfError::Format(format!("negative entry count {count}")));
    }
    debug!(count, "reading entry table");

    let count = count as usize;
    let mut entries = Vec::with_capacity(count.min(PREALLOC_ENTRIES));
    for i in 0..count {
        let entry = read_entry(r).map_err(|e| truncated_at(e, &format!("entry {i} of {count}")))?;
        debug!(
            path = %entry.path,
            flag1 = entry.flag1,
            flag2 = entry.flag2,
            flag3 = entry.flag3,
            offset = entry.offset,
            size = entry.size,
            "entry"
        );
        entries.push(entry);
    }

    Ok(ArchiveManifest::new(entries))
}

fn read_entry(r: &mut dyn Read) -> NwfResult<ArchiveEntry> {
    let name_len = read_i32(r)?;
    if name_len < 0 {
        return Err(NwfError::Format(format!("negative name length {name_len}")));
    }
    let name = read_vec(r, name_len as u64)?;
    let path = String::from_utf8(name)
        .map_err(|e| NwfError::Format(format!("entry name is not utf8: {e}")))?;

    Ok(ArchiveEntry {
        path,
        flag1: read_i16(r)?,
        flag2: read_i16(r)?,
        flag3: read_i32(r)?,
        offset: read_i32(r)?,
        size: read_i32(r)?,
    })
}

fn truncated_at(err: NwfError, what: &str) -> NwfError {
    match err {
        NwfError::Truncated(detail) => NwfError::Truncated(format!("{what}: {detail}")),
        other => other,
    }
}
