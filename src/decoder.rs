//! Decoding MARC21 records from an in-memory buffer.
//!
//! This module turns a byte buffer holding zero or more concatenated ISO 2709
//! records into [`MarcRecord`] values. Decoding is pure and restartable: the
//! same buffer always yields the same records.
//!
//! Candidate slices are found by scanning for the 0x1D record terminator.
//! Slices of 24 bytes or fewer are dropped silently. A slice whose leader or
//! directory arithmetic falls outside the slice is a per-record failure; by
//! default it is logged and skipped (see [`RecoveryMode`]).
//!
//! # Examples
//!
//! ```
//! let records = marcdiff::decode(&[0x1D]);
//! assert!(records.is_empty());
//! ```
//!
//! Strict decoding surfaces the first failure:
//!
//! ```
//! use marcdiff::{Decoder, RecoveryMode};
//!
//! let decoder = Decoder::new().with_recovery_mode(RecoveryMode::Strict);
//! let records = decoder.decode_all(b"")?;
//! assert!(records.is_empty());
//! # Ok::<(), marcdiff::MarcError>(())
//! ```

use crate::boundary_scanner::RecordBoundaryScanner;
use crate::error::{MarcError, Result};
use crate::leader::{parse_leading_number, Leader, LEADER_LEN};
use crate::record::{ControlField, DataField, Field, MarcRecord, Subfield};
use crate::recovery::{RecoveryMode, SkippedRecord};
use std::io::Read;
use tracing::{debug, trace, warn};

const FIELD_TERMINATOR: char = '\u{1E}';
const SUBFIELD_DELIMITER: char = '\u{1F}';
const DIRECTORY_ENTRY_LEN: usize = 12;

/// Decode every usable record in a buffer.
///
/// Never fails: records that cannot be decoded are logged at `warn` level
/// and omitted. An empty result means the buffer held no usable records.
#[must_use]
pub fn decode(buffer: &[u8]) -> Vec<MarcRecord> {
    // Lenient decoding never returns Err.
    Decoder::new()
        .decode_report(buffer)
        .map(|report| report.records)
        .unwrap_or_default()
}

/// Configurable buffer decoder.
///
/// # Examples
///
/// ```
/// use marcdiff::{Decoder, RecoveryMode};
///
/// let decoder = Decoder::new().with_recovery_mode(RecoveryMode::Lenient);
/// let report = decoder.decode_report(&[0x1D, 0x1D])?;
/// assert!(report.records.is_empty());
/// assert_eq!(report.fragments, 2);
/// # Ok::<(), marcdiff::MarcError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder {
    recovery_mode: RecoveryMode,
}

/// Everything a decode pass produced.
#[derive(Debug, Default)]
pub struct DecodeReport {
    /// Successfully decoded records in buffer order
    pub records: Vec<MarcRecord>,
    /// Candidate slices that failed to decode (lenient mode only)
    pub skipped: Vec<SkippedRecord>,
    /// Number of slices dropped for being no longer than a leader
    pub fragments: usize,
}

/// What became of one candidate slice.
#[derive(Debug)]
pub(crate) enum Outcome {
    Fragment,
    Decoded(MarcRecord),
    Failed(MarcError),
}

impl Decoder {
    /// Create a decoder in lenient mode.
    #[must_use]
    pub fn new() -> Self {
        Decoder::default()
    }

    /// Set the recovery mode for records that fail to decode.
    #[must_use]
    pub fn with_recovery_mode(mut self, mode: RecoveryMode) -> Self {
        self.recovery_mode = mode;
        self
    }

    /// The configured recovery mode.
    #[must_use]
    pub fn recovery_mode(&self) -> RecoveryMode {
        self.recovery_mode
    }

    /// Decode a buffer, returning the records only.
    ///
    /// # Errors
    ///
    /// In strict mode, returns the first per-record failure.
    pub fn decode_all(&self, buffer: &[u8]) -> Result<Vec<MarcRecord>> {
        self.decode_report(buffer).map(|report| report.records)
    }

    /// Decode a buffer, returning records, skipped slices, and fragment count.
    ///
    /// # Errors
    ///
    /// In strict mode, returns the first per-record failure.
    pub fn decode_report(&self, buffer: &[u8]) -> Result<DecodeReport> {
        let mut scanner = RecordBoundaryScanner::new();
        let outcomes = scanner
            .scan(buffer)
            .into_iter()
            .enumerate()
            .map(|(index, (offset, len))| {
                (index, offset, decode_candidate(&buffer[offset..offset + len]))
            });
        self.assemble(outcomes)
    }

    /// Read a source to the end, then decode it.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails, or in strict mode the first
    /// per-record failure.
    pub fn decode_reader<R: Read>(&self, mut reader: R) -> Result<Vec<MarcRecord>> {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        self.decode_all(&buffer)
    }

    /// Fold per-slice outcomes into a report, applying the recovery mode.
    pub(crate) fn assemble<I>(&self, outcomes: I) -> Result<DecodeReport>
    where
        I: IntoIterator<Item = (usize, usize, Outcome)>,
    {
        let mut report = DecodeReport::default();

        for (index, offset, outcome) in outcomes {
            match outcome {
                Outcome::Fragment => {
                    debug!(index, offset, "dropping fragment shorter than a leader");
                    report.fragments += 1;
                },
                Outcome::Decoded(record) => report.records.push(record),
                Outcome::Failed(error) => {
                    let skipped = self.recovery_mode.recover(index, offset, error)?;
                    warn!(
                        index,
                        offset,
                        error = %skipped.error,
                        "error parsing record, skipping"
                    );
                    report.skipped.push(skipped);
                },
            }
        }

        debug!(
            records = report.records.len(),
            skipped = report.skipped.len(),
            fragments = report.fragments,
            "decode finished"
        );
        Ok(report)
    }
}

/// Classify and decode one candidate slice.
pub(crate) fn decode_candidate(slice: &[u8]) -> Outcome {
    if slice.len() <= LEADER_LEN {
        return Outcome::Fragment;
    }
    match decode_record(slice) {
        Ok(record) => Outcome::Decoded(record),
        Err(error) => Outcome::Failed(error),
    }
}

/// Decode a single record slice (leader, directory, and fields).
///
/// # Errors
///
/// Returns an error if the base address of data or a directory entry is not
/// numeric, or if the directory or a field span lies outside `bytes`.
pub fn decode_record(bytes: &[u8]) -> Result<MarcRecord> {
    let leader = Leader::from_bytes(bytes)?;
    let base_address = leader.base_address()?;
    let directory = directory_region(bytes, base_address)?;

    let mut record = MarcRecord::new(leader);
    for chunk in directory.chunks_exact(DIRECTORY_ENTRY_LEN) {
        let entry = DirectoryEntry::parse(chunk)?;
        let span = entry.field_span(bytes, base_address)?;
        trace!(
            tag = %entry.tag,
            length = entry.field_length,
            start = entry.starting_position,
            "directory entry"
        );
        let text = String::from_utf8_lossy(span);
        record.add_field(parse_field(&entry.tag, &text));
    }

    Ok(record)
}

/// Directory bytes: from the end of the leader up to (not including) the
/// byte before the base address, which holds the directory terminator.
fn directory_region(bytes: &[u8], base_address: usize) -> Result<&[u8]> {
    let end = base_address.saturating_sub(1);
    if end <= LEADER_LEN {
        return Ok(&[]);
    }
    bytes.get(LEADER_LEN..end).ok_or_else(|| {
        MarcError::TruncatedRecord(format!(
            "Directory ends at byte {end} but record is {} bytes",
            bytes.len()
        ))
    })
}

#[derive(Debug)]
struct DirectoryEntry {
    tag: String,
    field_length: usize,
    starting_position: usize,
}

impl DirectoryEntry {
    /// Parse a 12-byte entry: tag(3) + length(4) + start(5).
    fn parse(chunk: &[u8]) -> Result<Self> {
        let tag = String::from_utf8_lossy(&chunk[0..3]).into_owned();
        let field_length = parse_entry_number(&chunk[3..7]).ok_or_else(|| {
            MarcError::InvalidRecord(format!(
                "Invalid field length for tag {tag}: '{}'",
                String::from_utf8_lossy(&chunk[3..7])
            ))
        })?;
        let starting_position = parse_entry_number(&chunk[7..12]).ok_or_else(|| {
            MarcError::InvalidRecord(format!(
                "Invalid start position for tag {tag}: '{}'",
                String::from_utf8_lossy(&chunk[7..12])
            ))
        })?;

        Ok(DirectoryEntry {
            tag,
            field_length,
            starting_position,
        })
    }

    /// The field's bytes: `[base + start, base + start + length)`.
    fn field_span<'a>(&self, bytes: &'a [u8], base_address: usize) -> Result<&'a [u8]> {
        let start = base_address + self.starting_position;
        let end = start + self.field_length;
        bytes.get(start..end).ok_or_else(|| {
            MarcError::TruncatedRecord(format!(
                "Field {} spans bytes {start}..{end} but record is {} bytes",
                self.tag,
                bytes.len()
            ))
        })
    }
}

fn parse_entry_number(bytes: &[u8]) -> Option<usize> {
    let chars: Vec<char> = String::from_utf8_lossy(bytes).chars().collect();
    parse_leading_number(&chars).map(|n| n as usize)
}

/// Build a control or data field from its decoded text.
///
/// Tags starting with `00` are control fields. Anything else is a data
/// field whose first two characters are the indicators.
pub(crate) fn parse_field(tag: &str, text: &str) -> Field {
    if tag.starts_with("00") {
        let value = text.strip_suffix(FIELD_TERMINATOR).unwrap_or(text);
        return Field::Control(ControlField::new(tag, value));
    }

    let mut chars = text.chars();
    let indicator1 = chars.next().unwrap_or(' ');
    let indicator2 = chars.next().unwrap_or(' ');
    let rest = chars.as_str();
    let rest = rest.strip_suffix(FIELD_TERMINATOR).unwrap_or(rest);

    let mut field = DataField::new(tag, indicator1, indicator2);
    field.subfields.extend(parse_subfields(rest));
    Field::Data(field)
}

/// Split subfield text on the delimiter. The chunk before the first
/// delimiter and empty chunks are discarded.
fn parse_subfields(text: &str) -> impl Iterator<Item = Subfield> + '_ {
    text.split(SUBFIELD_DELIMITER).skip(1).filter_map(|chunk| {
        let mut chars = chunk.chars();
        let code = chars.next()?;
        Some(Subfield {
            code,
            value: chars.as_str().to_string(),
        })
    })
}
