#![forbid(unsafe_code)]

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::pak::build::{plan, write_plan};
use crate::pak::error::{PakError, PakResult};
use crate::pak::format::{EntryInfo, EntryReport};
use crate::pak::io::{at_path, truncated};
use crate::pak::path::safe_join;
use crate::pak::read::read_entries;

/// Outcome of an unpack run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnpackSummary {
    pub written: usize,
    pub skipped: usize,
}

fn require(path: &Path) -> PakResult<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(PakError::NotFound(path.to_path_buf()))
    }
}

pub fn pack(input: &Path, output: &Path) -> PakResult<()> {
    pack_with_progress(input, output, &mut |_| {})
}

/// Packs every regular file under `input` into `output`, reporting each
/// entry as its payload is appended.
pub fn pack_with_progress(
    input: &Path,
    output: &Path,
    on_entry: &mut dyn FnMut(&EntryReport),
) -> PakResult<()> {
    require(input)?;
    if !input.is_dir() {
        return Err(PakError::Io(std::io::Error::new(
            ErrorKind::Other,
            format!("{} is not a directory", input.display()),
        )));
    }

    let own = output.canonicalize().ok();
    let plan = plan(input, own.as_deref())?;
    tracing::info!(
        entries = plan.entries.len(),
        header_size = plan.header_size,
        "size of header: {} bytes",
        plan.header_size
    );

    write_plan(&plan, output, on_entry)?;
    tracing::info!(
        "packed {} entries into {} ({} bytes)",
        plan.entries.len(),
        output.display(),
        plan.total_len
    );
    Ok(())
}

/// Read pak entries with inferred sizes (without extracting payloads).
pub fn entries(pak: &Path) -> PakResult<Vec<EntryInfo>> {
    require(pak)?;
    let mut f = File::open(pak).map_err(|e| at_path(e, pak))?;
    Ok(read_entries(&mut f)?.into_iter().map(EntryInfo::from).collect())
}

pub fn unpack(pak: &Path, output: &Path) -> PakResult<UnpackSummary> {
    unpack_with_progress(pak, output, &mut |_| {})
}

/// Extracts every entry of `pak` under `output`.
///
/// Destinations that already exist are never overwritten: they are
/// reported with `skipped` set and the run goes on. Each payload is read in
/// full before its destination is created.
pub fn unpack_with_progress(
    pak: &Path,
    output: &Path,
    on_entry: &mut dyn FnMut(&EntryReport),
) -> PakResult<UnpackSummary> {
    require(pak)?;
    let mut f = File::open(pak).map_err(|e| at_path(e, pak))?;
    let entries = read_entries(&mut f)?;

    std::fs::create_dir_all(output).map_err(|e| at_path(e, output))?;

    let mut summary = UnpackSummary::default();
    for e in entries {
        let dest = safe_join(output, &e.path)?;
        let mut report = EntryReport {
            path: e.path,
            offset: e.offset,
            size: e.size,
            skipped: false,
        };

        if dest.symlink_metadata().is_ok() {
            skip(&mut report, &dest, &mut summary, on_entry);
            continue;
        }

        f.seek(SeekFrom::Start(u64::from(e.offset)))?;
        let mut payload = vec![0u8; e.size as usize];
        f.read_exact(&mut payload)
            .map_err(|err| truncated(err, &format!("payload of {} at {}", report.path, e.offset)))?;

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|err| at_path(err, parent))?;
        }
        if !write_new(&dest, &mut payload.as_slice())? {
            skip(&mut report, &dest, &mut summary, on_entry);
            continue;
        }

        tracing::debug!(path = %report.path, offset = report.offset, size = report.size, "extracted");
        summary.written += 1;
        on_entry(&report);
    }

    tracing::info!(
        "unpacked {} into {}: {} written, {} skipped",
        pak.display(),
        output.display(),
        summary.written,
        summary.skipped
    );
    Ok(summary)
}

/// Creates `dest` and fills it from `payload`. Returns `false` without
/// touching anything when `dest` already exists. A failed write removes the
/// partial file so a later run does not mistake it for a finished one.
fn write_new(dest: &Path, payload: &mut dyn Read) -> PakResult<bool> {
    let mut out = match OpenOptions::new().write(true).create_new(true).open(dest) {
        Ok(out) => out,
        Err(err) if err.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(err) => return Err(at_path(err, dest)),
    };

    if let Err(err) = std::io::copy(payload, &mut out).and_then(|_| out.flush()) {
        drop(out);
        if let Err(rm) = std::fs::remove_file(dest) {
            tracing::warn!("could not remove partial {}: {rm}", dest.display());
        }
        return Err(at_path(err, dest));
    }
    Ok(true)
}

fn skip(
    report: &mut EntryReport,
    dest: &Path,
    summary: &mut UnpackSummary,
    on_entry: &mut dyn FnMut(&EntryReport),
) {
    tracing::debug!("{} already exists, skipping", dest.display());
    report.skipped = true;
    summary.skipped += 1;
    on_entry(report);
}
