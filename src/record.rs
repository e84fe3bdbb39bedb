//! MARC bibliographic record structures.
//!
//! This module provides the decoded record types:
//! - [`MarcRecord`] — leader plus ordered control and data fields
//! - [`ControlField`] — fields 00x, a tag and an opaque value
//! - [`DataField`] — every other tag, two indicators and ordered subfields
//! - [`Subfield`] — a coded data element within a data field
//! - [`Field`] / [`FieldRef`] — owned and borrowed views over either kind
//!
//! # Examples
//!
//! ```
//! use marcdiff::{DataField, Leader, MarcRecord};
//!
//! let leader = Leader::from_bytes(b"00000nam a2200000   4500")?;
//! let record = MarcRecord::builder(leader)
//!     .control_field("001", "12345")
//!     .data_field(
//!         DataField::builder("245", '1', '0')
//!             .subfield('a', "Title")
//!             .build(),
//!     )
//!     .build();
//!
//! assert_eq!(record.fields().count(), 2);
//! # Ok::<(), marcdiff::MarcError>(())
//! ```

use crate::leader::Leader;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A decoded MARC record.
///
/// Fields keep directory order within each of the two sequences. A record
/// has no identity of its own; callers identify records by their position
/// in the decoded sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarcRecord {
    /// Record leader (24 bytes)
    pub leader: Leader,
    /// Control fields (00x) in directory order
    pub control_fields: Vec<ControlField>,
    /// Data fields in directory order
    pub data_fields: Vec<DataField>,
}

/// A control field: tag `00x` and an unstructured value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControlField {
    /// Field tag (3 characters)
    pub tag: String,
    /// Field value with the field terminator removed
    pub value: String,
}

/// A data field: tag, two indicators, and ordered subfields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataField {
    /// Field tag (3 characters)
    pub tag: String,
    /// First indicator
    pub indicator1: char,
    /// Second indicator
    pub indicator2: char,
    /// Subfields (stored in `SmallVec` to avoid allocation for typical fields with 4 or fewer subfields)
    pub subfields: SmallVec<[Subfield; 4]>,
}

/// A subfield within a data field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subfield {
    /// Subfield code (single character)
    pub code: char,
    /// Subfield value
    pub value: String,
}

/// Either kind of field, owned.
///
/// Serialized untagged: a data field is the variant that has `subfields`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Field {
    /// Data field (has subfields)
    Data(DataField),
    /// Control field (00x)
    Control(ControlField),
}

/// Either kind of field, borrowed from a [`MarcRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldRef<'a> {
    /// Borrowed control field
    Control(&'a ControlField),
    /// Borrowed data field
    Data(&'a DataField),
}

impl MarcRecord {
    /// Create an empty record with the given leader
    #[must_use]
    pub fn new(leader: Leader) -> Self {
        MarcRecord {
            leader,
            control_fields: Vec::new(),
            data_fields: Vec::new(),
        }
    }

    /// Create a builder for fluently constructing records
    #[must_use]
    pub fn builder(leader: Leader) -> RecordBuilder {
        RecordBuilder {
            record: MarcRecord::new(leader),
        }
    }

    /// Append a control field
    pub fn add_control_field(&mut self, field: ControlField) {
        self.control_fields.push(field);
    }

    /// Append a data field
    pub fn add_data_field(&mut self, field: DataField) {
        self.data_fields.push(field);
    }

    /// Append either kind of field to its sequence
    pub fn add_field(&mut self, field: Field) {
        match field {
            Field::Control(field) => self.add_control_field(field),
            Field::Data(field) => self.add_data_field(field),
        }
    }

    /// Iterate over all fields: control fields first, then data fields,
    /// each in directory order.
    pub fn fields(&self) -> impl Iterator<Item = FieldRef<'_>> {
        self.control_fields
            .iter()
            .map(FieldRef::Control)
            .chain(self.data_fields.iter().map(FieldRef::Data))
    }

    /// Get the value of the first control field with a given tag
    #[must_use]
    pub fn get_control_field(&self, tag: &str) -> Option<&str> {
        self.control_fields
            .iter()
            .find(|f| f.tag == tag)
            .map(|f| f.value.as_str())
    }

    /// Get the first data field with a given tag
    #[must_use]
    pub fn get_data_field(&self, tag: &str) -> Option<&DataField> {
        self.data_fields.iter().find(|f| f.tag == tag)
    }

    /// Iterate over data fields matching a specific tag
    pub fn data_fields_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a DataField> {
        self.data_fields.iter().filter(move |f| f.tag == tag)
    }

    /// Total number of fields of both kinds
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.control_fields.len() + self.data_fields.len()
    }
}

/// Builder for [`MarcRecord`]
#[derive(Debug)]
pub struct RecordBuilder {
    record: MarcRecord,
}

impl RecordBuilder {
    /// Add a control field to the record being built
    #[must_use]
    pub fn control_field(mut self, tag: impl Into<String>, value: impl Into<String>) -> Self {
        self.record.add_control_field(ControlField::new(tag, value));
        self
    }

    /// Add a data field to the record being built
    #[must_use]
    pub fn data_field(mut self, field: DataField) -> Self {
        self.record.add_data_field(field);
        self
    }

    /// Build the record
    #[must_use]
    pub fn build(self) -> MarcRecord {
        self.record
    }
}

impl ControlField {
    /// Create a new control field
    #[must_use]
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        ControlField {
            tag: tag.into(),
            value: value.into(),
        }
    }
}

impl DataField {
    /// Create a new data field with no subfields
    #[must_use]
    pub fn new(tag: impl Into<String>, indicator1: char, indicator2: char) -> Self {
        DataField {
            tag: tag.into(),
            indicator1,
            indicator2,
            subfields: SmallVec::new(),
        }
    }

    /// Create a builder for constructing fields fluently
    ///
    /// # Examples
    ///
    /// ```
    /// use marcdiff::DataField;
    ///
    /// let field = DataField::builder("245", '1', '0')
    ///     .subfield('a', "The Great Gatsby")
    ///     .subfield('c', "F. Scott Fitzgerald")
    ///     .build();
    /// assert_eq!(field.get_subfield('c'), Some("F. Scott Fitzgerald"));
    /// ```
    #[must_use]
    pub fn builder(tag: impl Into<String>, indicator1: char, indicator2: char) -> FieldBuilder {
        FieldBuilder {
            field: DataField::new(tag, indicator1, indicator2),
        }
    }

    /// Append a subfield
    pub fn add_subfield(&mut self, code: char, value: impl Into<String>) {
        self.subfields.push(Subfield {
            code,
            value: value.into(),
        });
    }

    /// Get first value for a subfield code
    #[must_use]
    pub fn get_subfield(&self, code: char) -> Option<&str> {
        self.subfields
            .iter()
            .find(|sf| sf.code == code)
            .map(|sf| sf.value.as_str())
    }

    /// Iterate over values for a subfield code
    pub fn subfields_by_code(&self, code: char) -> impl Iterator<Item = &str> {
        self.subfields
            .iter()
            .filter(move |sf| sf.code == code)
            .map(|sf| sf.value.as_str())
    }
}

/// Builder for [`DataField`]
#[derive(Debug)]
pub struct FieldBuilder {
    field: DataField,
}

impl FieldBuilder {
    /// Add a subfield to the field being built
    #[must_use]
    pub fn subfield(mut self, code: char, value: impl Into<String>) -> Self {
        self.field.add_subfield(code, value);
        self
    }

    /// Build the field
    #[must_use]
    pub fn build(self) -> DataField {
        self.field
    }
}

impl Field {
    /// The field's tag
    #[must_use]
    pub fn tag(&self) -> &str {
        self.as_field_ref().tag()
    }

    /// Borrow this field as a [`FieldRef`]
    #[must_use]
    pub fn as_field_ref(&self) -> FieldRef<'_> {
        match self {
            Field::Control(f) => FieldRef::Control(f),
            Field::Data(f) => FieldRef::Data(f),
        }
    }

    /// The data field, if this is one
    #[must_use]
    pub fn as_data(&self) -> Option<&DataField> {
        match self {
            Field::Data(f) => Some(f),
            Field::Control(_) => None,
        }
    }

    /// The control field, if this is one
    #[must_use]
    pub fn as_control(&self) -> Option<&ControlField> {
        match self {
            Field::Control(f) => Some(f),
            Field::Data(_) => None,
        }
    }
}

impl<'a> FieldRef<'a> {
    /// The field's tag
    #[must_use]
    pub fn tag(self) -> &'a str {
        match self {
            FieldRef::Control(f) => &f.tag,
            FieldRef::Data(f) => &f.tag,
        }
    }

    /// Clone the referenced field into an owned [`Field`]
    #[must_use]
    pub fn to_field(self) -> Field {
        match self {
            FieldRef::Control(f) => Field::Control(f.clone()),
            FieldRef::Data(f) => Field::Data(f.clone()),
        }
    }
}

impl From<ControlField> for Field {
    fn from(field: ControlField) -> Self {
        Field::Control(field)
    }
}

impl From<DataField> for Field {
    fn from(field: DataField) -> Self {
        Field::Data(field)
    }
}
