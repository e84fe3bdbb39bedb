//! Human-readable record titles and list labels.
//!
//! Titles come from the first subfield `a` of field 245, falling back to
//! 130 and then 240. Trailing whitespace and ISBD punctuation (`/ : ; ,`)
//! are trimmed.

use crate::record::MarcRecord;
use lazy_static::lazy_static;
use regex::Regex;

/// Returned when no title field is present.
pub const UNTITLED: &str = "Untitled Record";

/// Stands in for a missing record in comparison labels.
pub const NO_RECORD: &str = "(no record)";

/// Tags consulted for a title, in priority order.
const TITLE_TAGS: [&str; 3] = ["245", "130", "240"];

lazy_static! {
    static ref TRAILING_PUNCTUATION: Regex = Regex::new(r"[\s/:;,]+$").unwrap();
}

/// Derive a display title for a record.
///
/// # Examples
///
/// ```
/// use marcdiff::{title_of, DataField, Leader, MarcRecord};
///
/// let leader = Leader::from_bytes(b"00000nam a2200000   4500")?;
/// let record = MarcRecord::builder(leader)
///     .data_field(DataField::builder("245", '1', '0').subfield('a', "Moby Dick /").build())
///     .build();
/// assert_eq!(title_of(&record), "Moby Dick");
/// # Ok::<(), marcdiff::MarcError>(())
/// ```
#[must_use]
pub fn title_of(record: &MarcRecord) -> String {
    TITLE_TAGS
        .iter()
        .find_map(|tag| {
            record
                .get_data_field(tag)
                .and_then(|field| field.get_subfield('a'))
        })
        .map_or_else(|| UNTITLED.to_string(), |title| trim_title(title).to_string())
}

fn trim_title(title: &str) -> &str {
    match TRAILING_PUNCTUATION.find(title) {
        Some(m) => &title[..m.start()],
        None => title,
    }
}

/// Shorten a title to `max` characters, appending `...` when cut.
#[must_use]
pub fn truncate_title(title: &str, max: usize) -> String {
    match title.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &title[..cut]),
        None => title.to_string(),
    }
}

/// Label for a record in a single-file list: `Record 3: Some title`.
#[must_use]
pub fn record_label(index: usize, record: &MarcRecord) -> String {
    format!("Record {}: {}", index + 1, truncate_title(&title_of(record), 60))
}

/// Label for a positional pair in a comparison list: `#2: Left vs Right`.
#[must_use]
pub fn comparison_label(
    index: usize,
    left: Option<&MarcRecord>,
    right: Option<&MarcRecord>,
) -> String {
    let side = |record: Option<&MarcRecord>| {
        let title = record.map_or_else(|| NO_RECORD.to_string(), title_of);
        truncate_title(&title, 30)
    };
    format!("#{}: {} vs {}", index + 1, side(left), side(right))
}
