#![forbid(unsafe_code)]

use crate::pak::error::{PakError, PakResult};
use crate::pak::format::{HeaderEntry, UnpackEntry};

/// Payload sizes are not stored: each one runs up to the next entry's
/// offset, the last one up to the end of the archive.
///
/// Offsets must be non-decreasing and the last one must not pass
/// `total_len`.
pub(crate) fn infer_sizes(offsets: &[u32], total_len: u64) -> PakResult<Vec<u32>> {
    let mut sizes = Vec::with_capacity(offsets.len());

    for (i, w) in offsets.windows(2).enumerate() {
        let size = w[1].checked_sub(w[0]).ok_or_else(|| {
            PakError::Format(format!(
                "offsets not increasing: entry {i} at {} > entry {} at {}",
                w[0],
                i + 1,
                w[1]
            ))
        })?;
        sizes.push(size);
    }

    if let Some(&last) = offsets.last() {
        let i = offsets.len() - 1;
        let size = total_len.checked_sub(u64::from(last)).ok_or_else(|| {
            PakError::Format(format!(
                "entry {i} offset {last} is past end of archive ({total_len} bytes)"
            ))
        })?;
        let size = u32::try_from(size).map_err(|_| {
            PakError::Format(format!("entry {i} size {size} does not fit in 32 bits"))
        })?;
        sizes.push(size);
    }

    Ok(sizes)
}

/// Pairs decoded records with their inferred sizes.
pub(crate) fn resolve_entries(
    header: Vec<HeaderEntry>,
    total_len: u64,
) -> PakResult<Vec<UnpackEntry>> {
    let offsets: Vec<u32> = header.iter().map(|e| e.offset).collect();
    let sizes = infer_sizes(&offsets, total_len)?;

    Ok(header
        .into_iter()
        .zip(sizes)
        .map(|(e, size)| UnpackEntry {
            path: e.path,
            offset: e.offset,
            size,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_from_offset_gaps() {
        assert_eq!(infer_sizes(&[100, 150, 230], 300).unwrap(), vec![50, 80, 70]);
    }

    #[test]
    fn empty_and_single() {
        assert!(infer_sizes(&[], 73).unwrap().is_empty());
        assert_eq!(infer_sizes(&[141], 141).unwrap(), vec![0]);
        assert_eq!(infer_sizes(&[141], 150).unwrap(), vec![9]);
    }

    #[test]
    fn equal_offsets_give_empty_entries() {
        assert_eq!(infer_sizes(&[209, 209, 215], 215).unwrap(), vec![0, 6, 0]);
    }

    #[test]
    fn decreasing_offsets_rejected() {
        let err = infer_sizes(&[100, 90, 230], 300).unwrap_err();
        assert!(matches!(err, PakError::Format(ref m) if m.contains("entry 0")));
    }

    #[test]
    fn last_offset_past_end_rejected() {
        assert!(matches!(infer_sizes(&[100, 400], 300), Err(PakError::Format(_))));
    }

    #[test]
    fn oversized_tail_rejected() {
        let total = u64::from(u32::MAX) + 200;
        assert!(matches!(infer_sizes(&[100], total), Err(PakError::Format(_))));
    }

    #[test]
    fn resolve_keeps_order() {
        let header = vec![
            HeaderEntry { path: "b".into(), offset: 10 },
            HeaderEntry { path: "a".into(), offset: 14 },
        ];
        let entries = resolve_entries(header, 20).unwrap();
        assert_eq!(entries[0], UnpackEntry { path: "b".into(), offset: 10, size: 4 });
        assert_eq!(entries[1], UnpackEntry { path: "a".into(), offset: 14, size: 6 });
    }
}
