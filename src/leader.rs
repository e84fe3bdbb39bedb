//! MARC record leader parsing.
//!
//! The MARC leader is a 24-byte fixed-length header at the start of every MARC record.
//! It describes the record's structure, content type, and encoding.
//!
//! # Structure
//!
//! - Positions 0-4: Record length (5 digits)
//! - Position 5: Record status
//! - Position 6: Type of record (a = language material, c = music, etc.)
//! - Position 7: Bibliographic level (m = monograph, s = serial, etc.)
//! - Position 8: Type of control
//! - Position 9: Character coding scheme (space = MARC-8, a = UTF-8)
//! - Position 10: Indicator count (usually 2)
//! - Position 11: Subfield code count (usually 2)
//! - Positions 12-16: Base address of data (5 digits)
//! - Positions 17-19: Encoding level, cataloging form, multipart level
//! - Positions 20-22: Entry map lengths (usually "450")
//!
//! Numeric positions are parsed leniently: an unparseable value becomes
//! `None` instead of failing the leader. Whether that matters is decided by
//! the decoder, which only needs the base address of data.

use crate::error::{MarcError, Result};
use serde::{Deserialize, Serialize};

/// Length of the leader in bytes.
pub const LEADER_LEN: usize = 24;

/// MARC Leader - 24 bytes at the start of every MARC record.
///
/// `raw` keeps the original text; every other field is derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leader {
    /// Record length (5 digits) - positions 0-4
    pub record_length: Option<u32>,
    /// Record status (1 char) - position 5
    pub record_status: char,
    /// Type of record (1 char) - position 6
    pub type_of_record: char,
    /// Bibliographic level (1 char) - position 7
    pub bibliographic_level: char,
    /// Type of control (1 char) - position 8
    pub type_of_control: char,
    /// Character coding scheme (1 char) - position 9
    pub character_coding_scheme: char,
    /// Indicator count (1 digit) - position 10
    pub indicator_count: Option<u32>,
    /// Subfield code count (1 digit) - position 11
    pub subfield_code_count: Option<u32>,
    /// Base address of data (5 digits) - positions 12-16
    pub base_address_of_data: Option<u32>,
    /// Encoding level (1 char) - position 17
    pub encoding_level: char,
    /// Descriptive cataloging form (1 char) - position 18
    pub descriptive_cataloging_form: char,
    /// Multipart resource record level (1 char) - position 19
    pub multipart_resource_record_level: char,
    /// Length of the length-of-field portion (1 digit) - position 20
    pub length_of_length_of_field: Option<u32>,
    /// Length of the starting-character-position portion (1 digit) - position 21
    pub length_of_starting_character_position: Option<u32>,
    /// Length of the implementation-defined portion (1 digit) - position 22
    pub length_of_implementation_defined: Option<u32>,
    /// The original leader text
    pub raw: String,
}

impl Leader {
    /// Parse a leader from the first 24 bytes of a record.
    ///
    /// The bytes are decoded as UTF-8 (invalid sequences are replaced), and
    /// every sub-field is read from the decoded text at its fixed position.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than 24 bytes are supplied.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < LEADER_LEN {
            return Err(MarcError::InvalidLeader(format!(
                "Leader must be at least {LEADER_LEN} bytes, got {}",
                bytes.len()
            )));
        }

        let raw = String::from_utf8_lossy(&bytes[..LEADER_LEN]).into_owned();
        let chars: Vec<char> = raw.chars().collect();
        let at = |pos: usize| chars.get(pos).copied().unwrap_or(' ');
        let number = |start: usize, len: usize| {
            let end = (start + len).min(chars.len());
            chars.get(start..end).and_then(parse_leading_number)
        };

        Ok(Leader {
            record_length: number(0, 5),
            record_status: at(5),
            type_of_record: at(6),
            bibliographic_level: at(7),
            type_of_control: at(8),
            character_coding_scheme: at(9),
            indicator_count: number(10, 1),
            subfield_code_count: number(11, 1),
            base_address_of_data: number(12, 5),
            encoding_level: at(17),
            descriptive_cataloging_form: at(18),
            multipart_resource_record_level: at(19),
            length_of_length_of_field: number(20, 1),
            length_of_starting_character_position: number(21, 1),
            length_of_implementation_defined: number(22, 1),
            raw,
        })
    }

    /// Base address of data as a byte offset.
    ///
    /// # Errors
    ///
    /// Returns an error if positions 12-16 hold no leading digits.
    pub fn base_address(&self) -> Result<usize> {
        self.base_address_of_data
            .map(|addr| addr as usize)
            .ok_or_else(|| {
                let text: String = self.raw.chars().skip(12).take(5).collect();
                MarcError::InvalidLeader(format!("Invalid base address of data: '{text}'"))
            })
    }

    /// Get valid values for a coded leader position (MARC 21 reference).
    ///
    /// Returns `None` for positions without a defined value list.
    #[must_use]
    pub fn valid_values_at_position(position: usize) -> Option<Vec<(&'static str, &'static str)>> {
        match position {
            5 => Some(vec![
                ("a", "Increase in encoding level"),
                ("c", "Corrected or revised"),
                ("d", "Deleted"),
                ("n", "New"),
                ("p", "Increase in encoding level from prepublication"),
            ]),
            6 => Some(vec![
                ("a", "Language material"),
                ("c", "Notated music"),
                ("d", "Manuscript notated music"),
                ("e", "Cartographic material"),
                ("f", "Manuscript cartographic material"),
                ("g", "Projected medium"),
                ("i", "Nonmusical sound recording"),
                ("j", "Musical sound recording"),
                ("k", "Two-dimensional nonprojectable graphic"),
                ("m", "Computer file"),
                ("o", "Kit"),
                ("p", "Mixed materials"),
                (
                    "r",
                    "Three-dimensional artifact or naturally occurring object",
                ),
                ("t", "Manuscript language material"),
            ]),
            7 => Some(vec![
                ("a", "Monographic component part"),
                ("b", "Serial component part"),
                ("c", "Collection"),
                ("d", "Subunit"),
                ("i", "Integrating resource"),
                ("m", "Monograph/Item"),
                ("s", "Serial"),
            ]),
            17 => Some(vec![
                (" ", "Full level"),
                ("1", "Full level, material not examined"),
                ("2", "Less-than-full level, material not examined"),
                ("3", "Abbreviated level"),
                ("4", "Core level"),
                ("5", "Partial (preliminary) level"),
                ("7", "Minimal level"),
                ("8", "Prepublication level"),
                ("u", "Unknown"),
                ("z", "Not applicable"),
            ]),
            18 => Some(vec![
                (" ", "Non-ISBD"),
                ("a", "AACR 2"),
                ("c", "ISBD punctuation omitted"),
                ("i", "ISBD punctuation included"),
                ("n", "Non-ISBD punctuation omitted"),
                ("u", "Unknown"),
            ]),
            _ => None,
        }
    }

    /// Get the description for a value at a coded leader position.
    ///
    /// # Example
    ///
    /// ```
    /// use marcdiff::Leader;
    /// assert_eq!(Leader::describe_value(6, "a"), Some("Language material"));
    /// assert_eq!(Leader::describe_value(6, "?"), None);
    /// ```
    #[must_use]
    pub fn describe_value(position: usize, value: &str) -> Option<&'static str> {
        Self::valid_values_at_position(position).and_then(|values| {
            values
                .into_iter()
                .find(|(v, _)| *v == value)
                .map(|(_, desc)| desc)
        })
    }

    /// Labelled leader positions for display, in leader order.
    ///
    /// Numeric positions that failed to parse render as `NaN`.
    #[must_use]
    pub fn labelled_positions(&self) -> Vec<(&'static str, String)> {
        let num = |n: Option<u32>| n.map_or_else(|| "NaN".to_string(), |n| n.to_string());
        vec![
            ("Record Length", num(self.record_length)),
            ("Record Status", self.record_status.to_string()),
            ("Type of Record", self.type_of_record.to_string()),
            ("Bibliographic Level", self.bibliographic_level.to_string()),
            ("Type of Control", self.type_of_control.to_string()),
            (
                "Character Coding Scheme",
                self.character_coding_scheme.to_string(),
            ),
            ("Indicator Count", num(self.indicator_count)),
            ("Subfield Code Count", num(self.subfield_code_count)),
            ("Base Address of Data", num(self.base_address_of_data)),
            ("Encoding Level", self.encoding_level.to_string()),
            (
                "Descriptive Cataloging Form",
                self.descriptive_cataloging_form.to_string(),
            ),
            (
                "Multipart Resource Record Level",
                self.multipart_resource_record_level.to_string(),
            ),
        ]
    }
}

/// Parse a leading unsigned integer: leading whitespace is skipped, then the
/// run of ASCII digits is read. No digits means no number.
pub(crate) fn parse_leading_number(chars: &[char]) -> Option<u32> {
    let mut value: Option<u32> = None;
    for c in chars
        .iter()
        .skip_while(|c| c.is_whitespace())
        .take_while(|c| c.is_ascii_digit())
    {
        let digit = c.to_digit(10)?;
        value = Some(value.unwrap_or(0).checked_mul(10)?.checked_add(digit)?);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leader_from_bytes() {
        let leader = Leader::from_bytes(b"01234cam a2200289 i 4500").unwrap();

        assert_eq!(leader.record_length, Some(1234));
        assert_eq!(leader.record_status, 'c');
        assert_eq!(leader.type_of_record, 'a');
        assert_eq!(leader.bibliographic_level, 'm');
        assert_eq!(leader.type_of_control, ' ');
        assert_eq!(leader.character_coding_scheme, 'a');
        assert_eq!(leader.indicator_count, Some(2));
        assert_eq!(leader.subfield_code_count, Some(2));
        assert_eq!(leader.base_address_of_data, Some(289));
        assert_eq!(leader.encoding_level, ' ');
        assert_eq!(leader.descriptive_cataloging_form, 'i');
        assert_eq!(leader.multipart_resource_record_level, ' ');
        assert_eq!(leader.length_of_length_of_field, Some(4));
        assert_eq!(leader.length_of_starting_character_position, Some(5));
        assert_eq!(leader.length_of_implementation_defined, Some(0));
        assert_eq!(leader.raw, "01234cam a2200289 i 4500");
    }

    #[test]
    fn test_leader_raw_is_first_24_bytes() {
        let leader = Leader::from_bytes(b"00050nam a2200037   4500EXTRA").unwrap();
        assert_eq!(leader.raw.len(), 24);
        assert_eq!(leader.raw, "00050nam a2200037   4500");
    }

    #[test]
    fn test_leader_too_short() {
        let result = Leader::from_bytes(b"0123456789012");
        assert!(result.is_err());
    }

    #[test]
    fn test_non_digit_numeric_positions_are_none() {
        let leader = Leader::from_bytes(b"abcdenam aXY22ZZZZ   4500").unwrap();
        assert_eq!(leader.record_length, None);
        assert_eq!(leader.indicator_count, None);
        assert_eq!(leader.subfield_code_count, None);
        assert_eq!(leader.base_address_of_data, Some(22));
        assert!(leader.base_address().is_ok());
    }

    #[test]
    fn test_base_address_error() {
        let leader = Leader::from_bytes(b"00050nam a22xxxxx   4500").unwrap();
        assert_eq!(leader.base_address_of_data, None);
        let err = leader.base_address().unwrap_err().to_string();
        assert!(err.contains("xxxxx"), "got: {err}");
    }

    #[test]
    fn test_parse_leading_number() {
        let chars = |s: &str| s.chars().collect::<Vec<_>>();
        assert_eq!(parse_leading_number(&chars("00123")), Some(123));
        assert_eq!(parse_leading_number(&chars("  42 ")), Some(42));
        assert_eq!(parse_leading_number(&chars("12ab3")), Some(12));
        assert_eq!(parse_leading_number(&chars("ab123")), None);
        assert_eq!(parse_leading_number(&chars("")), None);
    }

    #[test]
    fn test_describe_value() {
        assert_eq!(Leader::describe_value(5, "n"), Some("New"));
        assert_eq!(Leader::describe_value(7, "s"), Some("Serial"));
        assert_eq!(Leader::describe_value(5, "z"), None);
        assert_eq!(Leader::describe_value(99, "a"), None);
    }

    #[test]
    fn test_labelled_positions_render_nan() {
        let leader = Leader::from_bytes(b"abcdenam a2200037   4500").unwrap();
        let positions = leader.labelled_positions();
        assert_eq!(positions[0], ("Record Length", "NaN".to_string()));
        assert_eq!(positions[8], ("Base Address of Data", "37".to_string()));
    }
}
