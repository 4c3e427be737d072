#![forbid(unsafe_code)]

use std::io::{ErrorKind, Read, Write};
use std::path::Path;

use crate::pak::error::{PakError, PakResult};

pub fn write_u32(w: &mut dyn Write, v: u32) -> PakResult<()> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Reads exactly `N` bytes. A short read is a format error naming `what`,
/// any other failure stays an io error.
pub fn read_exact<const N: usize>(r: &mut dyn Read, what: &str) -> PakResult<[u8; N]> {
    let mut buf = [0u8; N];
    r.read_exact(&mut buf).map_err(|e| truncated(e, what))?;
    Ok(buf)
}

pub fn read_u32(r: &mut dyn Read, what: &str) -> PakResult<u32> {
    Ok(u32::from_le_bytes(read_exact::<4>(r, what)?))
}

pub(crate) fn truncated(e: std::io::Error, what: &str) -> PakError {
    if e.kind() == ErrorKind::UnexpectedEof {
        PakError::Format(format!("truncated {what}"))
    } else {
        PakError::Io(e)
    }
}

/// Attaches the offending path to an io error.
pub(crate) fn at_path(e: std::io::Error, path: &Path) -> PakError {
    PakError::Io(std::io::Error::new(e.kind(), format!("{}: {e}", path.display())))
}
