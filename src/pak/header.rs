#![forbid(unsafe_code)]

use std::io::{Read, Write};

use crate::pak::error::{PakError, PakResult};
use crate::pak::format::{
    HeaderEntry, PackEntry, COUNT_SIZE, FOOTER, PATH_FIELD_SIZE, RECORD_SIZE,
};
use crate::pak::io::{read_exact, read_u32, write_u32};
use crate::pak::path::to_host_path;

/// Header layout:
/// - [u32 entry_count]
/// - entries...
///   - [u8 path[64]] ASCII, backslash separated, NUL padded
///   - [u32 payload_offset]
/// - [u8 footer[69]] opaque, see `FOOTER`
///
/// Reads the records in archive order. The footer is not read and nothing
/// is checksummed: a header of plausible size but garbage content decodes
/// to garbage entries.
pub(crate) fn decode_header(r: &mut dyn Read, total_len: u64) -> PakResult<Vec<HeaderEntry>> {
    let count = read_u32(r, "entry count")?;

    let records_end = COUNT_SIZE as u64 + u64::from(count) * RECORD_SIZE as u64;
    if records_end > total_len {
        return Err(PakError::Format(format!(
            "header declares {count} entries ({records_end} bytes) but archive is {total_len} bytes"
        )));
    }

    let mut out = Vec::with_capacity(count as usize);
    for i in 0..count {
        let what = format!("record {i}");
        let field = read_exact::<PATH_FIELD_SIZE>(r, &what)?;
        let path = to_host_path(&field)
            .map_err(|e| PakError::Format(format!("record {i}: {e}")))?;
        let offset = read_u32(r, &what)?;
        out.push(HeaderEntry { path, offset });
    }

    Ok(out)
}

/// Writes the count, one record per entry, and the footer. Paths were
/// validated when the plan was built.
pub(crate) fn encode_header(w: &mut dyn Write, entries: &[PackEntry]) -> PakResult<()> {
    let count = u32::try_from(entries.len())
        .map_err(|_| PakError::Encoding(format!("too many entries: {}", entries.len())))?;

    let mut buf = Vec::with_capacity(COUNT_SIZE + entries.len() * RECORD_SIZE + FOOTER.len());
    write_u32(&mut buf, count)?;
    for e in entries {
        buf.extend_from_slice(&e.archive_path);
        write_u32(&mut buf, e.offset)?;
    }
    buf.extend_from_slice(&FOOTER);

    w.write_all(&buf)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pak::format::header_size;
    use crate::pak::path::to_archive_path;
    use std::io::Cursor;
    use std::path::PathBuf;

    fn entry(rel: &str, offset: u32) -> PackEntry {
        PackEntry {
            source: PathBuf::from(rel),
            display_path: rel.to_string(),
            archive_path: to_archive_path(rel).unwrap(),
            size: 0,
            offset,
        }
    }

    #[test]
    fn encodes_fixed_layout() {
        let entries = vec![entry("a.txt", 209), entry("dir/b.txt", 212)];
        let mut out = Vec::new();
        encode_header(&mut out, &entries).unwrap();

        assert_eq!(out.len() as u64, header_size(2));
        assert_eq!(&out[..4], &2u32.to_le_bytes());
        assert_eq!(&out[4..9], b"a.txt");
        assert!(out[9..68].iter().all(|&b| b == 0));
        assert_eq!(&out[68..72], &209u32.to_le_bytes());
        assert_eq!(&out[72..81], b"dir\\b.txt");
        assert_eq!(&out[136..140], &212u32.to_le_bytes());
        assert_eq!(&out[140..], &FOOTER);
        assert_eq!(&out[140..144], &[0x00u8, 0x00, 0x00, 0x00]);
        assert_eq!(&out[144..148], &[0xBCu8, 0x42, 0x59, 0x81]);
        assert_eq!(&out[out.len() - 5..], &[0x59u8, 0xB7, 0x5E, 0x01, 0x00]);
    }

    #[test]
    fn empty_header_is_count_and_footer() {
        let mut out = Vec::new();
        encode_header(&mut out, &[]).unwrap();
        assert_eq!(out.len(), 73);
        let decoded = decode_header(&mut Cursor::new(&out), out.len() as u64).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn decodes_in_archive_order() {
        let entries = vec![entry("z/last.bin", 209), entry("a/first.bin", 300)];
        let mut out = Vec::new();
        encode_header(&mut out, &entries).unwrap();

        let decoded = decode_header(&mut Cursor::new(&out), 1000).unwrap();
        let sep = std::path::MAIN_SEPARATOR;
        assert_eq!(
            decoded,
            vec![
                HeaderEntry { path: format!("z{sep}last.bin"), offset: 209 },
                HeaderEntry { path: format!("a{sep}first.bin"), offset: 300 },
            ]
        );
    }

    #[test]
    fn missing_count_is_format_error() {
        let err = decode_header(&mut Cursor::new(vec![0u8; 3]), 3).unwrap_err();
        assert!(matches!(err, PakError::Format(_)));
    }

    #[test]
    fn truncated_record_is_format_error() {
        let mut out = Vec::new();
        encode_header(&mut out, &[entry("a.txt", 141)]).unwrap();
        out.truncate(4 + 40);

        let len = out.len() as u64;
        let err = decode_header(&mut Cursor::new(&out), len).unwrap_err();
        assert!(matches!(err, PakError::Format(_)));

        // Size check trusted over the reader.
        let err = decode_header(&mut Cursor::new(&out), 10_000).unwrap_err();
        assert!(matches!(err, PakError::Format(ref m) if m.contains("truncated record 0")));
    }

    #[test]
    fn non_ascii_path_is_format_error() {
        let mut out = Vec::new();
        encode_header(&mut out, &[entry("a.txt", 141)]).unwrap();
        out[4] = 0xC3;
        let err = decode_header(&mut Cursor::new(&out), out.len() as u64).unwrap_err();
        assert!(matches!(err, PakError::Format(ref m) if m.starts_with("record 0")));
    }
}
