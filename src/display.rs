//! Plain-text rendering of records and comparisons.
//!
//! Blank indicators render as `_` so column alignment survives. Data fields
//! render as `245 10 $aTitle $cAuthor`, control fields as `001 value`.

use crate::diff::{DiffStats, DiffStatus, FieldDiff, RecordDiff};
use crate::leader::Leader;
use crate::record::{ControlField, DataField, Field, FieldRef, MarcRecord};
use std::fmt::{self, Write as _};

const ABSENT: &str = "-";

fn indicator(c: char) -> char {
    if c == ' ' {
        '_'
    } else {
        c
    }
}

impl fmt::Display for ControlField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.tag, self.value)
    }
}

impl fmt::Display for DataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}{}",
            self.tag,
            indicator(self.indicator1),
            indicator(self.indicator2)
        )?;
        for sf in &self.subfields {
            write!(f, " ${}{}", sf.code, sf.value)?;
        }
        Ok(())
    }
}

impl fmt::Display for FieldRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRef::Control(field) => fmt::Display::fmt(field, f),
            FieldRef::Data(field) => fmt::Display::fmt(field, f),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.as_field_ref(), f)
    }
}

impl DiffStatus {
    /// One-character marker for a diff row.
    #[must_use]
    pub fn marker(self) -> char {
        match self {
            DiffStatus::Added => '+',
            DiffStatus::Removed => '-',
            DiffStatus::Modified => '~',
            DiffStatus::Unchanged => ' ',
        }
    }
}

impl fmt::Display for DiffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiffStatus::Unchanged => "unchanged",
            DiffStatus::Added => "added",
            DiffStatus::Removed => "removed",
            DiffStatus::Modified => "modified",
        };
        f.write_str(name)
    }
}

/// `~ 100 1_ $aSmith | 100 1_ $aJones`; an absent side renders as `-`.
impl fmt::Display for FieldDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.status.marker())?;
        side(f, self.left.as_ref())?;
        f.write_str(" | ")?;
        side(f, self.right.as_ref())
    }
}

fn side(f: &mut fmt::Formatter<'_>, field: Option<&Field>) -> fmt::Result {
    match field {
        Some(field) => fmt::Display::fmt(field, f),
        None => f.write_str(ABSENT),
    }
}

impl fmt::Display for DiffStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.has_differences() {
            return write!(f, "Changes: No differences, {} unchanged", self.unchanged);
        }
        let parts: Vec<String> = [
            (self.added, '+', "added"),
            (self.removed, '-', "removed"),
            (self.modified, '~', "modified"),
        ]
        .iter()
        .filter(|(count, _, _)| *count > 0)
        .map(|(count, marker, label)| format!("{marker}{count} {label}"))
        .collect();
        write!(f, "Changes: {}, {} unchanged", parts.join(" "), self.unchanged)
    }
}

/// The leader as a diff row: `~ LDR <left> | <right>`.
#[must_use]
pub fn leader_row(diff: &RecordDiff) -> String {
    let marker = if diff.leader_changed { '~' } else { ' ' };
    let raw = |s: &str| if s.is_empty() { ABSENT.to_string() } else { s.to_string() };
    format!(
        "{marker} LDR {} | {}",
        raw(&diff.left_leader),
        raw(&diff.right_leader)
    )
}

/// Render a comparison: leader row, field rows, and the stats line.
///
/// With `hide_unchanged`, unchanged field rows are left out; the stats line
/// still counts them.
#[must_use]
pub fn render_diff(diff: &RecordDiff, hide_unchanged: bool) -> String {
    let mut out = String::new();
    if diff.leader_changed || !hide_unchanged {
        let _ = writeln!(out, "{}", leader_row(diff));
    }
    let rows: Box<dyn Iterator<Item = &FieldDiff>> = if hide_unchanged {
        Box::new(diff.changes())
    } else {
        Box::new(diff.fields.iter())
    };
    for row in rows {
        let _ = writeln!(out, "{row}");
    }
    let _ = writeln!(out, "{}", diff.stats());
    out
}

/// Render a record: `LDR` line then one line per field.
#[must_use]
pub fn render_record(record: &MarcRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "LDR {}", record.leader.raw);
    for field in record.fields() {
        let _ = writeln!(out, "{field}");
    }
    out
}

/// Render the labelled leader positions, one per line, with the MARC21
/// meaning of coded values where known.
#[must_use]
pub fn render_leader_details(leader: &Leader) -> String {
    const CODED: [(&str, usize); 5] = [
        ("Record Status", 5),
        ("Type of Record", 6),
        ("Bibliographic Level", 7),
        ("Encoding Level", 17),
        ("Descriptive Cataloging Form", 18),
    ];

    let mut out = String::new();
    for (label, value) in leader.labelled_positions() {
        let description = CODED
            .iter()
            .find(|(name, _)| *name == label)
            .and_then(|&(_, pos)| Leader::describe_value(pos, &value));
        let _ = match description {
            Some(desc) => writeln!(out, "{label}: {value} ({desc})"),
            None => writeln!(out, "{label}: {value}"),
        };
    }
    out
}
