#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # Modules
//!
//! - [`decoder`] — ISO 2709 buffer decoding with per-record recovery
//! - [`boundary_scanner`] — Record boundary detection on 0x1D terminators
//! - [`leader`] — The 24-byte record leader
//! - [`record`] — Record, field, and subfield structures
//! - [`diff`] — Field-level comparison of two records
//! - [`title`] — Display titles and list labels
//! - [`display`] — Plain-text rendering of records and diffs
//! - [`parallel`] — Rayon-backed decoding and sequence comparison
//! - [`format`] — File extension detection and file loading
//! - [`recovery`] — Lenient and strict handling of malformed records
//! - [`error`] — Error types and result type

pub mod boundary_scanner;
pub mod decoder;
pub mod diff;
pub mod display;
pub mod error;
pub mod format;
pub mod leader;
pub mod parallel;
pub mod record;
pub mod recovery;
pub mod title;

pub use decoder::{decode, decode_record, DecodeReport, Decoder};
pub use diff::{canonical_key, diff, diff_sequences, DiffStats, DiffStatus, FieldDiff, RecordDiff};
pub use error::{MarcError, Result};
pub use leader::Leader;
pub use record::{
    ControlField, DataField, Field, FieldBuilder, FieldRef, MarcRecord, RecordBuilder, Subfield,
};
pub use recovery::{RecoveryMode, SkippedRecord};
pub use title::{comparison_label, record_label, title_of, truncate_title};
