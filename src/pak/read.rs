#![forbid(unsafe_code)]

use std::fs::File;
use std::io::{Seek, SeekFrom};

use crate::pak::error::PakResult;
use crate::pak::format::UnpackEntry;
use crate::pak::header::decode_header;
use crate::pak::size::resolve_entries;

/// Decodes the header of an open archive and sizes every entry against the
/// archive's length.
pub(crate) fn read_entries(file: &mut File) -> PakResult<Vec<UnpackEntry>> {
    let total_len = file.metadata()?.len();
    file.seek(SeekFrom::Start(0))?;

    let header = decode_header(file, total_len)?;
    resolve_entries(header, total_len)
}
