//! Error types for MARC decoding.
//!
//! This module provides the [`MarcError`] type returned by the per-record
//! decode step and the [`Result`] convenience type. The whole-buffer
//! [`decode`](crate::decode) entry point never surfaces these errors; it
//! logs and skips the offending record instead.

use thiserror::Error;

/// Error type for MARC decoding operations.
///
/// Each variant carries a human-readable description of what went wrong
/// with a single record.
#[derive(Error, Debug)]
pub enum MarcError {
    /// Error indicating an invalid or malformed MARC record.
    #[error("Invalid MARC record: {0}")]
    InvalidRecord(String),

    /// Error indicating an invalid leader (24-byte header).
    #[error("Invalid leader: {0}")]
    InvalidLeader(String),

    /// Error indicating a field or directory span that runs past the record.
    #[error("Truncated record: {0}")]
    TruncatedRecord(String),

    /// IO error from the underlying source.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Convenience type alias for [`std::result::Result`] with [`MarcError`].
pub type Result<T> = std::result::Result<T, MarcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MarcError::InvalidLeader("Invalid base address of data: 'abcde'".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid leader: Invalid base address of data: 'abcde'"
        );

        let err = MarcError::TruncatedRecord("Field 245 exceeds record".to_string());
        assert!(err.to_string().starts_with("Truncated record"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let err: MarcError = io.into();
        assert!(matches!(err, MarcError::IoError(_)));
    }
}
