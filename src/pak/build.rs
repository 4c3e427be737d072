#![forbid(unsafe_code)]

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::pak::error::{PakError, PakResult};
use crate::pak::format::{header_size, EntryReport, PackEntry};
use crate::pak::header::encode_header;
use crate::pak::io::at_path;
use crate::pak::path::{normalize_rel_path, to_archive_path};

/// Every file to pack with its final offset, computed before anything is
/// written. Payloads are appended in exactly this order.
#[derive(Debug)]
pub(crate) struct PackPlan {
    pub entries: Vec<PackEntry>,
    pub header_size: u64,
    /// Length of the finished archive.
    pub total_len: u64,
}

fn walk_error(e: walkdir::Error) -> PakError {
    let msg = e.to_string();
    let io = e
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, msg));
    PakError::Io(io)
}

/// Walks `input` and lays out the archive.
///
/// Determinism rules:
/// - entries are visited in file name order within each directory
/// - symlinks are not followed
/// - `exclude` (canonical path of the archive being written) is skipped
///
/// Any path that cannot be encoded fails here, before the output exists.
pub(crate) fn plan(input: &Path, exclude: Option<&Path>) -> PakResult<PackPlan> {
    let mut files: Vec<(String, PathBuf, u64)> = Vec::new();
    for ent in WalkDir::new(input).follow_links(false).sort_by_file_name() {
        let ent = ent.map_err(walk_error)?;

        if !ent.file_type().is_file() {
            continue;
        }

        if let Some(skip) = exclude {
            if Some(ent.file_name()) == skip.file_name()
                && ent.path().canonicalize().ok().as_deref() == Some(skip)
            {
                tracing::warn!("not packing the output archive into itself: {}", ent.path().display());
                continue;
            }
        }

        let rel = normalize_rel_path(input, ent.path())?;
        let len = ent.metadata().map_err(walk_error)?.len();
        files.push((rel, ent.path().to_path_buf(), len));
    }

    let header_size = header_size(files.len());
    let mut cursor = header_size;
    let mut entries = Vec::with_capacity(files.len());

    for (rel, source, len) in files {
        let archive_path = to_archive_path(&rel)?;
        let size = u32::try_from(len)
            .map_err(|_| PakError::Encoding(format!("{rel} is {len} bytes, limit is {}", u32::MAX)))?;
        let offset = u32::try_from(cursor).map_err(|_| {
            PakError::Encoding(format!("{rel} would start at {cursor}, past the 32-bit offset range"))
        })?;

        entries.push(PackEntry {
            source,
            display_path: rel,
            archive_path,
            size,
            offset,
        });
        cursor += len;
    }

    Ok(PackPlan {
        entries,
        header_size,
        total_len: cursor,
    })
}

/// Writes the header and then every payload in plan order.
///
/// The archive is assembled in a temporary file beside `output` and moved
/// into place only once complete.
pub(crate) fn write_plan(
    plan: &PackPlan,
    output: &Path,
    on_entry: &mut dyn FnMut(&EntryReport),
) -> PakResult<()> {
    let dir = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir).map_err(|e| at_path(e, dir))?;
    let mut out = BufWriter::new(tmp);

    encode_header(&mut out, &plan.entries)?;

    for e in &plan.entries {
        let raw = std::fs::read(&e.source).map_err(|err| at_path(err, &e.source))?;
        if raw.len() as u64 != u64::from(e.size) {
            return Err(PakError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!(
                    "{} changed while packing: planned {} bytes, read {}",
                    e.source.display(),
                    e.size,
                    raw.len()
                ),
            )));
        }
        out.write_all(&raw)?;

        tracing::debug!(path = %e.display_path, offset = e.offset, size = e.size, "packed");
        on_entry(&EntryReport {
            path: e.display_path.clone(),
            offset: e.offset,
            size: e.size,
            skipped: false,
        });
    }

    let tmp = out.into_inner().map_err(|e| PakError::Io(e.into_error()))?;
    tmp.as_file().sync_all()?;
    tmp.persist(output).map_err(|e| at_path(e.error, output))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pak::format::FOOTER;
    use std::fs;

    #[test]
    fn offsets_accumulate_from_header_size() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.bin"), [1u8; 10]).unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::write(dir.path().join("b").join("c.bin"), [2u8; 5]).unwrap();
        fs::write(dir.path().join("d.bin"), [3u8; 7]).unwrap();

        let plan = plan(dir.path(), None).unwrap();
        assert_eq!(plan.header_size, 277);

        let got: Vec<(&str, u32, u32)> = plan
            .entries
            .iter()
            .map(|e| (e.display_path.as_str(), e.offset, e.size))
            .collect();
        assert_eq!(
            got,
            vec![("a.bin", 277, 10), ("b/c.bin", 287, 5), ("d.bin", 292, 7)]
        );
        assert_eq!(plan.total_len, 299);
        assert_eq!(&plan.entries[1].archive_path[..7], b"b\\c.bin");
    }

    #[test]
    fn writes_header_then_payloads() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        fs::create_dir(&input).unwrap();
        fs::write(input.join("one.txt"), b"first").unwrap();
        fs::write(input.join("two.txt"), b"second").unwrap();

        let plan = plan(&input, None).unwrap();
        let out = dir.path().join("OUT.PAK");
        let mut seen = Vec::new();
        write_plan(&plan, &out, &mut |r| seen.push(r.path.clone())).unwrap();

        let bytes = fs::read(&out).unwrap();
        assert_eq!(bytes.len() as u64, plan.total_len);
        let hs = plan.header_size as usize;
        assert_eq!(&bytes[hs - FOOTER.len()..hs], &FOOTER);
        assert_eq!(&bytes[hs..], b"firstsecond");
        assert_eq!(seen, vec!["one.txt", "two.txt"]);
    }

    #[test]
    fn long_path_fails_before_output_exists() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        fs::create_dir(&input).unwrap();
        fs::write(input.join("ok.txt"), b"x").unwrap();
        fs::write(input.join("n".repeat(70)), b"y").unwrap();

        let err = plan(&input, None).unwrap_err();
        assert!(matches!(err, PakError::Encoding(_)));
    }
}
