//! Structural comparison of two MARC records.
//!
//! [`diff`] classifies every field of two records as unchanged, added,
//! removed or modified:
//!
//! 1. Fields are keyed by a canonical serialization of their full content
//!    ([`canonical_key`]). Equal keys on both sides pair positionally as
//!    `unchanged`, so exact duplicates (two identical 650s) match each other.
//! 2. What is left is regrouped by tag. Same-tag leftovers pair positionally
//!    as `modified`.
//! 3. Unpaired left leftovers are `removed`; unpaired right leftovers are
//!    `added`.
//! 4. The result is stably sorted by tag.
//!
//! Fields are addressed by index into a per-side arena, and each pass
//! records how many entries of a group it consumed, so no field is ever
//! reported twice.
//!
//! # Examples
//!
//! ```
//! use marcdiff::{diff, DataField, DiffStatus, Leader, MarcRecord};
//!
//! let leader = Leader::from_bytes(b"00000nam a2200000   4500")?;
//! let left = MarcRecord::builder(leader.clone())
//!     .data_field(DataField::builder("100", '1', ' ').subfield('a', "Smith").build())
//!     .build();
//! let right = MarcRecord::builder(leader)
//!     .data_field(DataField::builder("100", '1', ' ').subfield('a', "Jones").build())
//!     .build();
//!
//! let result = diff(Some(&left), Some(&right));
//! assert!(!result.leader_changed);
//! assert_eq!(result.fields.len(), 1);
//! assert_eq!(result.fields[0].status, DiffStatus::Modified);
//! # Ok::<(), marcdiff::MarcError>(())
//! ```

use crate::record::{Field, FieldRef, MarcRecord};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Classification of one field pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffStatus {
    /// Identical content on both sides
    Unchanged,
    /// Present only on the right
    Added,
    /// Present only on the left
    Removed,
    /// Same tag, different content
    Modified,
}

/// One row of a record comparison.
///
/// `left` is absent for [`DiffStatus::Added`], `right` is absent for
/// [`DiffStatus::Removed`]; both are present otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDiff {
    /// How the pair was classified
    pub status: DiffStatus,
    /// Field from the left record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Field>,
    /// Field from the right record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Field>,
}

/// Comparison of two records at the same position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDiff {
    /// Whether the raw leaders differ (always true if a side is absent)
    pub leader_changed: bool,
    /// Raw left leader, empty if the left record is absent
    pub left_leader: String,
    /// Raw right leader, empty if the right record is absent
    pub right_leader: String,
    /// Field comparisons, non-decreasing by tag
    pub fields: Vec<FieldDiff>,
}

/// Summary counts for a [`RecordDiff`].
///
/// The leader counts as one `modified` entry when it changed and as one
/// `unchanged` entry otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    /// Fields only on the right
    pub added: usize,
    /// Fields only on the left
    pub removed: usize,
    /// Modified fields, plus the leader if it changed
    pub modified: usize,
    /// Unchanged fields, plus the leader if it did not change
    pub unchanged: usize,
}

impl FieldDiff {
    fn unchanged(left: FieldRef<'_>, right: FieldRef<'_>) -> Self {
        Self::pair(DiffStatus::Unchanged, left, right)
    }

    fn modified(left: FieldRef<'_>, right: FieldRef<'_>) -> Self {
        Self::pair(DiffStatus::Modified, left, right)
    }

    fn pair(status: DiffStatus, left: FieldRef<'_>, right: FieldRef<'_>) -> Self {
        FieldDiff {
            status,
            left: Some(left.to_field()),
            right: Some(right.to_field()),
        }
    }

    fn removed(left: FieldRef<'_>) -> Self {
        FieldDiff {
            status: DiffStatus::Removed,
            left: Some(left.to_field()),
            right: None,
        }
    }

    fn added(right: FieldRef<'_>) -> Self {
        FieldDiff {
            status: DiffStatus::Added,
            left: None,
            right: Some(right.to_field()),
        }
    }

    /// Tag of the left field if present, else of the right field.
    #[must_use]
    pub fn tag(&self) -> &str {
        self.left
            .as_ref()
            .or(self.right.as_ref())
            .map_or("", Field::tag)
    }
}

impl RecordDiff {
    /// Iterate over the non-`unchanged` field diffs, in order.
    pub fn changes(&self) -> impl Iterator<Item = &FieldDiff> {
        self.fields
            .iter()
            .filter(|f| f.status != DiffStatus::Unchanged)
    }

    /// Summary counts, including the leader.
    #[must_use]
    pub fn stats(&self) -> DiffStats {
        DiffStats::from(self)
    }
}

impl DiffStats {
    /// True if anything was added, removed, or modified.
    #[must_use]
    pub fn has_differences(&self) -> bool {
        self.added > 0 || self.removed > 0 || self.modified > 0
    }
}

impl From<&RecordDiff> for DiffStats {
    fn from(diff: &RecordDiff) -> Self {
        let mut stats = DiffStats::default();
        for field in &diff.fields {
            match field.status {
                DiffStatus::Added => stats.added += 1,
                DiffStatus::Removed => stats.removed += 1,
                DiffStatus::Modified => stats.modified += 1,
                DiffStatus::Unchanged => stats.unchanged += 1,
            }
        }
        if diff.leader_changed {
            stats.modified += 1;
        } else {
            stats.unchanged += 1;
        }
        stats
    }
}

/// Canonical serialization of a field's full content.
///
/// Control field: `tag:value`. Data field: `tag:<ind1><ind2>:` followed by
/// `$<code><value>` for each subfield in order.
#[must_use]
pub fn canonical_key(field: FieldRef<'_>) -> String {
    match field {
        FieldRef::Control(f) => format!("{}:{}", f.tag, f.value),
        FieldRef::Data(f) => {
            let mut key = format!("{}:{}{}:", f.tag, f.indicator1, f.indicator2);
            for sf in &f.subfields {
                let _ = write!(key, "${}{}", sf.code, sf.value);
            }
            key
        },
    }
}

/// One side of a comparison: its fields plus arena indices grouped by key.
struct Side<'a> {
    fields: Vec<FieldRef<'a>>,
    by_key: IndexMap<String, Vec<usize>>,
}

impl<'a> Side<'a> {
    fn new(record: Option<&'a MarcRecord>) -> Self {
        let fields: Vec<FieldRef<'a>> = record
            .map(|r| r.fields().collect())
            .unwrap_or_default();
        let mut by_key: IndexMap<String, Vec<usize>> = IndexMap::new();
        for (idx, field) in fields.iter().enumerate() {
            by_key.entry(canonical_key(*field)).or_default().push(idx);
        }
        Side { fields, by_key }
    }

    /// Indices left over after `matched` consumed the head of each key
    /// group, regrouped by tag.
    fn leftovers_by_tag(&self, matched: &IndexMap<&str, usize>) -> IndexMap<&'a str, Vec<usize>> {
        let mut by_tag: IndexMap<&'a str, Vec<usize>> = IndexMap::new();
        for (key, indices) in &self.by_key {
            let consumed = matched.get(key.as_str()).copied().unwrap_or(0);
            for &idx in &indices[consumed..] {
                by_tag.entry(self.fields[idx].tag()).or_default().push(idx);
            }
        }
        by_tag
    }
}

/// Compare two records; either side may be absent.
#[must_use]
pub fn diff(left: Option<&MarcRecord>, right: Option<&MarcRecord>) -> RecordDiff {
    let leader_changed = match (left, right) {
        (Some(l), Some(r)) => l.leader.raw != r.leader.raw,
        _ => true,
    };
    let raw_leader = |record: Option<&MarcRecord>| {
        record.map_or_else(String::new, |r| r.leader.raw.clone())
    };

    let left_side = Side::new(left);
    let right_side = Side::new(right);
    let mut fields = Vec::new();

    // Exact content matches, paired positionally within each key.
    let mut matched: IndexMap<&str, usize> = IndexMap::new();
    for (key, left_idx) in &left_side.by_key {
        if let Some(right_idx) = right_side.by_key.get(key) {
            let count = left_idx.len().min(right_idx.len());
            for (&l, &r) in left_idx.iter().zip(right_idx) {
                fields.push(FieldDiff::unchanged(
                    left_side.fields[l],
                    right_side.fields[r],
                ));
            }
            matched.insert(key.as_str(), count);
        }
    }

    let left_by_tag = left_side.leftovers_by_tag(&matched);
    let right_by_tag = right_side.leftovers_by_tag(&matched);

    // Same-tag leftovers, paired positionally within each tag.
    let mut paired: IndexMap<&str, usize> = IndexMap::new();
    for (tag, left_idx) in &left_by_tag {
        let right_idx = right_by_tag.get(tag).map_or(&[][..], Vec::as_slice);
        let count = left_idx.len().min(right_idx.len());
        for (&l, &r) in left_idx.iter().zip(right_idx) {
            fields.push(FieldDiff::modified(
                left_side.fields[l],
                right_side.fields[r],
            ));
        }
        paired.insert(*tag, count);
    }

    for (tag, left_idx) in &left_by_tag {
        let consumed = paired.get(tag).copied().unwrap_or(0);
        for &l in &left_idx[consumed..] {
            fields.push(FieldDiff::removed(left_side.fields[l]));
        }
    }

    for (tag, right_idx) in &right_by_tag {
        let consumed = paired.get(tag).copied().unwrap_or(0);
        for &r in &right_idx[consumed..] {
            fields.push(FieldDiff::added(right_side.fields[r]));
        }
    }

    // Stable: same-tag diffs keep emission order.
    fields.sort_by(|a, b| a.tag().cmp(b.tag()));

    RecordDiff {
        leader_changed,
        left_leader: raw_leader(left),
        right_leader: raw_leader(right),
        fields,
    }
}

/// Compare two record sequences position by position.
///
/// Produces `max(left.len(), right.len())` diffs; positions past the end of
/// the shorter sequence compare against an absent record.
#[must_use]
pub fn diff_sequences(left: &[MarcRecord], right: &[MarcRecord]) -> Vec<RecordDiff> {
    (0..left.len().max(right.len()))
        .map(|i| diff(left.get(i), right.get(i)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leader::Leader;
    use crate::record::{ControlField, DataField};

    fn leader(raw: &[u8]) -> Leader {
        Leader::from_bytes(raw).unwrap()
    }

    fn record(fields: Vec<Field>) -> MarcRecord {
        let mut record = MarcRecord::new(leader(b"00000nam a2200000   4500"));
        for field in fields {
            record.add_field(field);
        }
        record
    }

    fn data(tag: &str, subfields: &[(char, &str)]) -> Field {
        let mut field = DataField::new(tag, ' ', ' ');
        for (code, value) in subfields {
            field.add_subfield(*code, *value);
        }
        field.into()
    }

    fn statuses(diff: &RecordDiff) -> Vec<(String, DiffStatus)> {
        diff.fields
            .iter()
            .map(|f| (f.tag().to_string(), f.status))
            .collect()
    }

    #[test]
    fn test_canonical_key() {
        let control = ControlField::new("001", "abc");
        assert_eq!(canonical_key(FieldRef::Control(&control)), "001:abc");

        let field = DataField::builder("245", '1', '0')
            .subfield('a', "Title")
            .subfield('b', "Sub")
            .build();
        assert_eq!(canonical_key(FieldRef::Data(&field)), "245:10:$aTitle$bSub");
    }

    #[test]
    fn test_identity() {
        let r = record(vec![
            ControlField::new("001", "x").into(),
            data("245", &[('a', "Title")]),
            data("650", &[('a', "A")]),
        ]);
        let result = diff(Some(&r), Some(&r));
        assert!(!result.leader_changed);
        assert_eq!(result.fields.len(), 3);
        assert!(result
            .fields
            .iter()
            .all(|f| f.status == DiffStatus::Unchanged));
        assert_eq!(result.changes().count(), 0);
    }

    #[test]
    fn test_duplicate_fields_match_as_unchanged() {
        let dup = data("650", &[('a', "Same subject")]);
        let left = record(vec![dup.clone(), dup.clone()]);
        let right = record(vec![dup.clone(), dup]);

        let result = diff(Some(&left), Some(&right));
        assert_eq!(
            statuses(&result),
            vec![
                ("650".to_string(), DiffStatus::Unchanged),
                ("650".to_string(), DiffStatus::Unchanged),
            ]
        );
    }

    #[test]
    fn test_extra_duplicate_is_removed() {
        let dup = data("650", &[('a', "Same subject")]);
        let left = record(vec![dup.clone(), dup.clone()]);
        let right = record(vec![dup]);

        let result = diff(Some(&left), Some(&right));
        assert_eq!(
            statuses(&result),
            vec![
                ("650".to_string(), DiffStatus::Unchanged),
                ("650".to_string(), DiffStatus::Removed),
            ]
        );
        assert!(result.fields[1].right.is_none());
    }

    #[test]
    fn test_modified_pairing() {
        let left = record(vec![data("100", &[('a', "Smith")])]);
        let right = record(vec![data("100", &[('a', "Jones")])]);

        let result = diff(Some(&left), Some(&right));
        assert_eq!(result.fields.len(), 1);
        assert_eq!(result.fields[0].status, DiffStatus::Modified);
        assert_eq!(result.fields[0].left, Some(data("100", &[('a', "Smith")])));
        assert_eq!(result.fields[0].right, Some(data("100", &[('a', "Jones")])));
    }

    #[test]
    fn test_added_and_removed() {
        let left = record(vec![data("500", &[('a', "Only left")])]);
        let right = record(vec![data("520", &[('a', "Only right")])]);

        let result = diff(Some(&left), Some(&right));
        assert_eq!(
            statuses(&result),
            vec![
                ("500".to_string(), DiffStatus::Removed),
                ("520".to_string(), DiffStatus::Added),
            ]
        );
        assert!(result.fields[0].right.is_none());
        assert!(result.fields[1].left.is_none());
    }

    #[test]
    fn test_same_tag_emission_order() {
        // Unchanged pairs are emitted before modified, which come before removed.
        let left = record(vec![
            data("650", &[('a', "Changed")]),
            data("650", &[('a', "Kept")]),
            data("650", &[('a', "Dropped")]),
        ]);
        let right = record(vec![
            data("650", &[('a', "Kept")]),
            data("650", &[('a', "Changed!")]),
        ]);

        let result = diff(Some(&left), Some(&right));
        let got: Vec<DiffStatus> = result.fields.iter().map(|f| f.status).collect();
        assert_eq!(
            got,
            vec![
                DiffStatus::Unchanged,
                DiffStatus::Modified,
                DiffStatus::Removed,
            ]
        );
        assert_eq!(
            result.fields[1].left,
            Some(data("650", &[('a', "Changed")]))
        );
        assert_eq!(
            result.fields[2].left,
            Some(data("650", &[('a', "Dropped")]))
        );
    }

    #[test]
    fn test_sorted_by_tag() {
        let left = record(vec![
            data("700", &[('a', "B")]),
            ControlField::new("008", "x").into(),
            data("100", &[('a', "A")]),
        ]);
        let right = record(vec![
            data("245", &[('a', "T")]),
            ControlField::new("001", "y").into(),
        ]);
        let result = diff(Some(&left), Some(&right));
        let tags: Vec<&str> = result.fields.iter().map(FieldDiff::tag).collect();
        let mut sorted = tags.clone();
        sorted.sort_unstable();
        assert_eq!(tags, sorted);
    }

    #[test]
    fn test_absent_left() {
        let right = record(vec![
            ControlField::new("001", "x").into(),
            data("245", &[('a', "T")]),
        ]);
        let result = diff(None, Some(&right));
        assert!(result.leader_changed);
        assert_eq!(result.left_leader, "");
        assert_eq!(result.right_leader, right.leader.raw);
        assert_eq!(result.fields.len(), 2);
        assert!(result.fields.iter().all(|f| f.status == DiffStatus::Added));
    }

    #[test]
    fn test_both_absent() {
        let result = diff(None, None);
        assert!(result.leader_changed);
        assert!(result.fields.is_empty());
    }

    #[test]
    fn test_leader_change() {
        let left = record(vec![]);
        let mut right = record(vec![]);
        right.leader = leader(b"00000cam a2200000   4500");
        let result = diff(Some(&left), Some(&right));
        assert!(result.leader_changed);
        assert_eq!(result.stats().modified, 1);
    }

    #[test]
    fn test_indicator_change_is_modified() {
        let left = record(vec![DataField::builder("245", '1', '0')
            .subfield('a', "T")
            .build()
            .into()]);
        let right = record(vec![DataField::builder("245", '0', '0')
            .subfield('a', "T")
            .build()
            .into()]);
        let result = diff(Some(&left), Some(&right));
        assert_eq!(result.fields[0].status, DiffStatus::Modified);
    }

    #[test]
    fn test_stats() {
        let left = record(vec![
            data("100", &[('a', "Smith")]),
            data("500", &[('a', "Gone")]),
            data("650", &[('a', "Same")]),
        ]);
        let right = record(vec![
            data("100", &[('a', "Jones")]),
            data("650", &[('a', "Same")]),
            data("700", &[('a', "New")]),
        ]);
        let stats = diff(Some(&left), Some(&right)).stats();
        assert_eq!(
            stats,
            DiffStats {
                added: 1,
                removed: 1,
                modified: 1,
                unchanged: 2,
            }
        );
        assert!(stats.has_differences());
    }

    #[test]
    fn test_diff_sequences_pads_shorter_side() {
        let a = record(vec![data("245", &[('a', "A")])]);
        let b = record(vec![data("245", &[('a', "B")])]);
        let diffs = diff_sequences(&[a.clone(), b.clone()], &[a]);
        assert_eq!(diffs.len(), 2);
        assert!(!diffs[0].leader_changed);
        assert!(diffs[1].leader_changed);
        assert_eq!(diffs[1].right_leader, "");
        assert_eq!(diffs[1].fields[0].status, DiffStatus::Removed);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&DiffStatus::Modified).unwrap();
        assert_eq!(json, "\"modified\"");
    }
}
