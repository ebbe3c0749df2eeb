#![forbid(unsafe_code)]

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use tracing::{info, warn};

use crate::nwf::error::{NwfError, NwfResult};
use crate::nwf::format::ArchiveManifest;
use crate::nwf::path::resolve;
use crate::nwf::plan::plan;
use crate::nwf::read::{decode, verify};
use crate::nwf::schema::{from_xml, to_xml};
use crate::nwf::unpack::{unpack, UnpackOptions};
use crate::nwf::write::{encode, table_len};

/// True iff the file at `path` starts with the NWF magic.
pub fn verify_file(path: &Path) -> NwfResult<bool> {
    let mut f = File::open(path)?;
    Ok(verify(&mut f))
}

pub fn decode_file(path: &Path) -> NwfResult<ArchiveManifest> {
    let mut r = BufReader::new(File::open(path)?);
    let manifest = decode(&mut r)?;
    info!(entries = manifest.len(), archive = %path.display(), "decoded");
    Ok(manifest)
}

pub fn write_schema(manifest: &ArchiveManifest, path: &Path) -> NwfResult<()> {
    fs::write(path, to_xml(manifest)?)?;
    Ok(())
}

pub fn read_schema(path: &Path) -> NwfResult<ArchiveManifest> {
    from_xml(&fs::read_to_string(path)?)
}

/// Encodes a planned manifest, pulling content from `source_dir`.
///
/// If encoding fails after `output` was created, the partial file is removed.
/// A failure to create `output` leaves whatever was there untouched.
pub fn encode_file(manifest: &ArchiveManifest, source_dir: &Path, output: &Path) -> NwfResult<()> {
    let file = File::create(output)?;
    let res = write_archive(manifest, source_dir, file);
    if res.is_err() {
        if let Err(e) = fs::remove_file(output) {
            warn!(output = %output.display(), error = %e, "could not remove partial archive");
        }
    }
    res
}

fn write_archive(manifest: &ArchiveManifest, source_dir: &Path, file: File) -> NwfResult<()> {
    let mut out = BufWriter::new(file);
    encode(manifest, &mut out, |e| {
        let src = resolve(source_dir, &e.path).map_err(std::io::Error::other)?;
        File::open(src).map(BufReader::new)
    })
}

/// Schema + source dir to archive. Nothing is written unless planning succeeds.
pub fn repack(schema: &Path, source_dir: &Path, output: &Path) -> NwfResult<ArchiveManifest> {
    let manifest = plan(read_schema(schema)?, source_dir)?;
    encode_file(&manifest, source_dir, output)?;
    info!(entries = manifest.len(), output = %output.display(), "repacked");
    Ok(manifest)
}

pub fn unpack_file(
    archive: &Path,
    manifest: &ArchiveManifest,
    output: &Path,
    opts: &UnpackOptions,
) -> NwfResult<usize> {
    let mut f = BufReader::new(File::open(archive)?);
    unpack(&mut f, manifest, output, opts)
}

pub fn list(archive: &Path, verbose: bool) -> NwfResult<()> {
    let manifest = decode_file(archive)?;
    for e in manifest.iter() {
        if verbose {
            println!(
                "{}  flags={}/{}/{} off={} len={}",
                e.path, e.flag1, e.flag2, e.flag3, e.offset, e.size
            );
        } else {
            println!("{}", e.path);
        }
    }
    Ok(())
}

/// Decodes `archive` and checks that every entry's content lies between the
/// end of the entry table and the end of the file. Returns the entry count.
pub fn check(archive: &Path) -> NwfResult<usize> {
    let manifest = decode_file(archive)?;
    let file_len = fs::metadata(archive)?.len() as i64;
    let content_start = table_len(&manifest);

    for (i, e) in manifest.iter().enumerate() {
        let bad = |why: &str| NwfError::Format(why.to_string()).in_entry(i, &e.path);
        if e.size < 0 {
            return Err(bad("negative size"));
        }
        if i64::from(e.offset) < content_start {
            return Err(bad("content offset inside entry table"));
        }
        if i64::from(e.offset) + i64::from(e.size) > file_len {
            return Err(bad("content outside file"));
        }
    }

    Ok(manifest.len())
}
