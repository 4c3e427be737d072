#![forbid(unsafe_code)]

use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

use crate::pak::error::{PakError, PakResult};
use crate::pak::format::PATH_FIELD_SIZE;

/// Archive path separator.
const ARCHIVE_SEP: u8 = b'\\';

pub fn normalize_rel_path(input_root: &Path, file_path: &Path) -> PakResult<String> {
    let rel = file_path
        .strip_prefix(input_root)
        .map_err(|_| PakError::Outside(file_path.to_string_lossy().into_owned()))?;

    let mut out = String::new();
    for (i, comp) in rel.components().enumerate() {
        if i != 0 {
            out.push('/');
        }
        let name = comp.as_os_str().to_string_lossy();
        // The archive separator cannot appear inside a name.
        if name.contains(ARCHIVE_SEP as char) {
            return Err(PakError::Encoding(format!(
                "file name contains a backslash: {}",
                rel.display()
            )));
        }
        out.push_str(&name);
    }

    if out.is_empty() {
        return Err(PakError::Encoding("empty relative path".into()));
    }

    Ok(out)
}

/// Encodes a relative path into the 64-byte archive field: backslash
/// separators, NUL padded. Paths that do not fit are rejected, never
/// truncated.
pub fn to_archive_path(rel: &str) -> PakResult<[u8; PATH_FIELD_SIZE]> {
    if rel.is_empty() {
        return Err(PakError::Encoding("empty path".into()));
    }
    if !rel.is_ascii() {
        return Err(PakError::Encoding(format!("path is not ascii: {rel}")));
    }
    if rel.len() > PATH_FIELD_SIZE {
        return Err(PakError::Encoding(format!(
            "path is {} bytes, limit is {PATH_FIELD_SIZE}: {rel}",
            rel.len()
        )));
    }

    let mut field = [0u8; PATH_FIELD_SIZE];
    for (dst, b) in field.iter_mut().zip(rel.bytes()) {
        *dst = match b {
            0 => return Err(PakError::Encoding(format!("path contains NUL: {rel:?}"))),
            b'/' => ARCHIVE_SEP,
            b => b,
        };
    }
    Ok(field)
}

/// Decodes an archive path field: trailing NULs stripped, backslashes
/// rewritten to the host separator. NUL is only valid as padding.
pub fn to_host_path(field: &[u8]) -> PakResult<String> {
    let end = field.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    let raw = &field[..end];
    if !raw.is_ascii() {
        return Err(PakError::Format(format!(
            "path field is not ascii: {}",
            String::from_utf8_lossy(raw)
        )));
    }
    if raw.contains(&0) {
        return Err(PakError::Format(format!(
            "path field has NUL before its end: {:?}",
            String::from_utf8_lossy(raw)
        )));
    }
    Ok(raw
        .iter()
        .map(|&b| if b == ARCHIVE_SEP { MAIN_SEPARATOR } else { char::from(b) })
        .collect())
}

/// Joins an unpacked entry path under `root`. Entries that would land
/// outside `root` (absolute, `..`, empty) are rejected.
pub fn safe_join(root: &Path, rel: &str) -> PakResult<PathBuf> {
    let rel_path = Path::new(rel);
    let mut any = false;
    for comp in rel_path.components() {
        match comp {
            Component::Normal(_) => any = true,
            Component::CurDir => {}
            _ => {
                return Err(PakError::Format(format!(
                    "entry path escapes output dir: {rel}"
                )))
            }
        }
    }
    if !any {
        return Err(PakError::Format(format!("empty entry path: {rel:?}")));
    }
    Ok(root.join(rel_path))
}
