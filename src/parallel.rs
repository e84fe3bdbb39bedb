//! Parallel decoding and comparison using Rayon.
//!
//! Candidate slices are independent once boundaries are known, so
//! [`decode_parallel`] decodes them on Rayon's work-stealing pool and then
//! folds the outcomes in buffer order. Results are identical to the
//! sequential [`Decoder`] for the same buffer and recovery mode.
//!
//! # Examples
//!
//! ```
//! use marcdiff::parallel::decode_pair;
//! use marcdiff::Decoder;
//!
//! let (left, right) = decode_pair(&Decoder::new(), &[0x1D], &[]);
//! assert!(left?.is_empty());
//! assert!(right?.is_empty());
//! # Ok::<(), marcdiff::MarcError>(())
//! ```

use crate::boundary_scanner::RecordBoundaryScanner;
use crate::decoder::{decode_candidate, DecodeReport, Decoder, Outcome};
use crate::diff::{diff, RecordDiff};
use crate::error::{MarcError, Result};
use crate::record::MarcRecord;
use rayon::prelude::*;

/// Decode a buffer with each candidate slice handled on the Rayon pool.
///
/// # Errors
///
/// In strict mode, returns the failure of the lowest-indexed slice that
/// failed, matching the sequential decoder.
pub fn decode_parallel(decoder: &Decoder, buffer: &[u8]) -> Result<DecodeReport> {
    let mut scanner = RecordBoundaryScanner::new();
    let boundaries = scanner.scan(buffer);

    let outcomes: Vec<(usize, usize, Outcome)> = boundaries
        .par_iter()
        .enumerate()
        .map(|(index, &(offset, len))| {
            let outcome = match buffer.get(offset..offset + len) {
                Some(slice) => decode_candidate(slice),
                None => Outcome::Failed(MarcError::InvalidRecord(format!(
                    "Record boundary ({offset}, {len}) exceeds buffer size {}",
                    buffer.len()
                ))),
            };
            (index, offset, outcome)
        })
        .collect();

    decoder.assemble(outcomes)
}

/// Decode the two sides of a comparison concurrently.
pub fn decode_pair(
    decoder: &Decoder,
    left: &[u8],
    right: &[u8],
) -> (Result<Vec<MarcRecord>>, Result<Vec<MarcRecord>>) {
    rayon::join(|| decoder.decode_all(left), || decoder.decode_all(right))
}

/// Parallel form of [`crate::diff::diff_sequences`]; output is identical.
#[must_use]
pub fn diff_sequences_parallel(left: &[MarcRecord], right: &[MarcRecord]) -> Vec<RecordDiff> {
    (0..left.len().max(right.len()))
        .into_par_iter()
        .map(|i| diff(left.get(i), right.get(i)))
        .collect()
}
