#![forbid(unsafe_code)]

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, info};

use crate::nwf::error::{NwfError, NwfResult};
use crate::nwf::format::ArchiveManifest;
use crate::nwf::path::resolve;
use crate::nwf::write::table_len;

/// Prepares a manifest for encoding from the files under `source_dir`.
///
/// Every entry must name an existing file; the first one that does not stops
/// planning with `MissingSource`. Sizes come from the files on disk and
/// offsets are laid out back to back, starting right after the entry table.
/// Whatever offsets and sizes the manifest carried before are discarded.
pub fn plan(mut manifest: ArchiveManifest, source_dir: &Path) -> NwfResult<ArchiveManifest> {
    let mut sources = Vec::with_capacity(manifest.len());
    for e in manifest.iter() {
        let resolved = resolve(source_dir, &e.path)?;
        let is_file = match fs::metadata(&resolved) {
            Ok(meta) => meta.is_file(),
            Err(err) if err.kind() == ErrorKind::NotFound => false,
            Err(err) => return Err(NwfError::Io(err)),
        };
        if !is_file {
            return Err(NwfError::MissingSource {
                path: e.path.clone(),
                resolved,
            });
        }
        sources.push(resolved);
    }

    let header_len = table_len(&manifest);
    let mut offset = header_len;

    for (e, src) in manifest.entries.iter_mut().zip(&sources) {
        let len = fs::metadata(src)?.len();
        e.size = i32::try_from(len).map_err(|_| NwfError::Overflow(e.path.clone()))?;
        e.offset = i32::try_from(offset).map_err(|_| NwfError::Overflow(e.path.clone()))?;
        offset += i64::from(e.size);
        debug!(path = %e.path, offset = e.offset, size = e.size, "planned");
    }

    info!(entries = manifest.len(), header_len, total_len = offset, "repack planned");
    Ok(manifest)
}
