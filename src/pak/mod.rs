#![forbid(unsafe_code)]

mod build;
mod error;
mod format;
mod header;
mod io;
mod ops;
mod path;
mod read;
mod size;

pub use error::{PakError, PakResult};
pub use format::{header_size, EntryInfo, EntryReport, FOOTER};

pub use ops::{entries, pack, pack_with_progress, unpack, unpack_with_progress, UnpackSummary};
