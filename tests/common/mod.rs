//! Common test helpers shared across the integration suites.

#![allow(dead_code)]

use marcdiff::{DataField, Leader, MarcRecord};

/// Default leader text used by hand-built records.
pub const LEADER: &[u8; 24] = b"00000nam a2200000   4500";

/// Parsed form of [`LEADER`].
pub fn make_leader() -> Leader {
    Leader::from_bytes(LEADER).unwrap()
}

/// Encode one ISO 2709 record from `(tag, body)` pairs.
///
/// Bodies exclude the field terminator; for data fields they start with the
/// two indicator bytes and use 0x1F before each subfield code.
pub fn encode_record(fields: &[(&str, &[u8])]) -> Vec<u8> {
    encode_record_with_leader(b"nam a22", fields)
}

/// Like [`encode_record`], with custom leader bytes 5..12.
pub fn encode_record_with_leader(leader_mid: &[u8; 7], fields: &[(&str, &[u8])]) -> Vec<u8> {
    let mut directory = Vec::new();
    let mut data = Vec::new();
    for (tag, body) in fields {
        directory.extend_from_slice(tag.as_bytes());
        directory.extend_from_slice(format!("{:04}", body.len() + 1).as_bytes());
        directory.extend_from_slice(format!("{:05}", data.len()).as_bytes());
        data.extend_from_slice(body);
        data.push(0x1E);
    }
    directory.push(0x1E);

    let base_address = 24 + directory.len();
    let record_length = base_address + data.len() + 1;

    let mut bytes = format!("{record_length:05}").into_bytes();
    bytes.extend_from_slice(leader_mid);
    bytes.extend_from_slice(format!("{base_address:05}   4500").as_bytes());
    bytes.extend_from_slice(&directory);
    bytes.extend_from_slice(&data);
    bytes.push(0x1D);
    bytes
}

/// A small book record with control, title, author, and subject fields.
pub fn book_record(title: &str) -> Vec<u8> {
    let title_body = format!("10\x1fa{title} /\x1fcF. Scott Fitzgerald.");
    encode_record(&[
        ("001", b"ocm00001"),
        ("008", b"200101s1925    nyu           000 1 eng d"),
        ("100", b"1 \x1faFitzgerald, F. Scott."),
        ("245", title_body.as_bytes()),
        ("650", b" 0\x1faAmerican fiction."),
    ])
}

/// Build an in-memory data field.
pub fn data_field(tag: &str, ind1: char, ind2: char, subfields: &[(char, &str)]) -> DataField {
    let mut field = DataField::new(tag, ind1, ind2);
    for (code, value) in subfields {
        field.add_subfield(*code, *value);
    }
    field
}

/// Build an in-memory record from data fields, with the default leader.
pub fn record_with(fields: Vec<DataField>) -> MarcRecord {
    let mut record = MarcRecord::new(make_leader());
    for field in fields {
        record.add_data_field(field);
    }
    record
}
