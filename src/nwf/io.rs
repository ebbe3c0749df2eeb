#![forbid(unsafe_code)]

use std::io::{ErrorKind, Read, Write};

use crate::nwf::error::{NwfError, NwfResult};

pub fn write_i16(w: &mut dyn Write, v: i16) -> NwfResult<()> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

pub fn write_i32(w: &mut dyn Write, v: i32) -> NwfResult<()> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Reads exactly `N` bytes; running out of input is `Truncated`, not `Io`.
pub fn read_exact<const N: usize>(r: &mut dyn Read) -> NwfResult<[u8; N]> {
    let mut buf = [0u8; N];
    r.read_exact(&mut buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => NwfError::Truncated(format!("needed {N} more bytes")),
        _ => NwfError::Io(e),
    })?;
    Ok(buf)
}

pub fn read_i16(r: &mut dyn Read) -> NwfResult<i16> {
    Ok(i16::from_le_bytes(read_exact::<2>(r)?))
}

pub fn read_i32(r: &mut dyn Read) -> NwfResult<i32> {
    Ok(i32::from_le_bytes(read_exact::<4>(r)?))
}

/// Reads `len` bytes without allocating more than the input actually holds.
pub fn read_vec(r: &mut dyn Read, len: u64) -> NwfResult<Vec<u8>> {
    let mut buf = Vec::new();
    r.take(len).read_to_end(&mut buf)?;
    if (buf.len() as u64) < len {
        return Err(NwfError::Truncated(format!(
            "needed {len} bytes, only {} left",
            buf.len()
        )));
    }
    Ok(buf)
}
