#![forbid(unsafe_code)]

use std::path::{Component, Path, PathBuf};

use crate::nwf::error::{NwfError, NwfResult};

/// Maps an archive path (`/`-separated) onto `base` using host separators.
///
/// Empty paths and paths that are absolute or climb out with `..` are
/// rejected, so an archive or schema can never address files outside `base`.
pub fn resolve(base: &Path, archive_path: &str) -> NwfResult<PathBuf> {
    let mut out = base.to_path_buf();
    let mut pushed = false;

    for part in archive_path.split(['/', '\\']) {
        if part.is_empty() || part == "." {
            continue;
        }
        let mut comps = Path::new(part).components();
        match (comps.next(), comps.next()) {
            (Some(Component::Normal(c)), None) => out.push(c),
            _ => return Err(NwfError::Outside(archive_path.to_string())),
        }
        pushed = true;
    }

    if !pushed || archive_path.starts_with(['/', '\\']) {
        return Err(NwfError::Outside(archive_path.to_string()));
    }

    Ok(out)
}
