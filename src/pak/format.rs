#![forbid(unsafe_code)]

use std::path::PathBuf;

/// Width of the leading `u32` entry count.
pub const COUNT_SIZE: usize = 4;

/// Width of the NUL-padded ASCII path field of a record.
pub const PATH_FIELD_SIZE: usize = 64;

pub const OFFSET_SIZE: usize = 4;

/// One header record: path field followed by the payload offset.
pub const RECORD_SIZE: usize = PATH_FIELD_SIZE + OFFSET_SIZE;

pub const FOOTER_SIZE: usize = 69;

/// Trailing block of every header. Its meaning is unknown; it is written
/// verbatim on pack and never read back. The last byte pads the 68-byte
/// block seen in the wild to the 69 bytes the layout reserves.
#[rustfmt::skip]
pub const FOOTER: [u8; FOOTER_SIZE] = [
    0x00, 0x00, 0x00, 0x00, 0xBC, 0x42, 0x59, 0x81, 0x00, 0x00, 0x00, 0x00, 0x8C, 0x83, 0x59, 0x81,
    0x8C, 0x83, 0x59, 0x81, 0x88, 0x83, 0x59, 0x81, 0x3B, 0xAE, 0xF7, 0xBF, 0x00, 0x20, 0x56, 0x81,
    0x00, 0x00, 0x00, 0x00, 0x8C, 0x83, 0x59, 0x81, 0xDB, 0xAE, 0xF7, 0xBF, 0x8C, 0x83, 0x59, 0x81,
    0xDE, 0xDA, 0xF7, 0xBF, 0x8C, 0x83, 0x59, 0x81, 0x8C, 0x83, 0x59, 0x81, 0xE2, 0x13, 0xF7, 0xBF,
    0x59, 0xB7, 0x5E, 0x01, 0x00,
];

/// Byte length of a header holding `count` records, i.e. the offset of the
/// first payload.
pub fn header_size(count: usize) -> u64 {
    (COUNT_SIZE + count * RECORD_SIZE + FOOTER_SIZE) as u64
}

/// A decoded header record. `path` already uses host separators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HeaderEntry {
    pub path: String,
    pub offset: u32,
}

/// A header record with its payload size inferred from the next offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UnpackEntry {
    pub path: String,
    pub offset: u32,
    pub size: u32,
}

/// One file of a pack plan.
#[derive(Debug, Clone)]
pub(crate) struct PackEntry {
    /// Where the payload is read from on the host.
    pub source: PathBuf,
    /// Relative path as shown to the user (`/`-separated).
    pub display_path: String,
    /// Encoded 64-byte archive path field.
    pub archive_path: [u8; PATH_FIELD_SIZE],
    pub size: u32,
    pub offset: u32,
}

/// Public view of a pak entry (for listing and progress reporting).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub path: String,
    pub offset: u32,
    pub size: u32,
}

impl From<UnpackEntry> for EntryInfo {
    fn from(e: UnpackEntry) -> Self {
        Self {
            path: e.path,
            offset: e.offset,
            size: e.size,
        }
    }
}

/// Progress record emitted for every processed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryReport {
    pub path: String,
    pub offset: u32,
    pub size: u32,
    /// The destination already existed and was left untouched.
    pub skipped: bool,
}
