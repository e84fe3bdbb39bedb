//! Recovery strategies for malformed records.
//!
//! A buffer may hold records whose leader or directory arithmetic points
//! outside the record. [`RecoveryMode`] decides whether such a record is
//! skipped (the default) or ends the decode with an error.

use crate::error::{MarcError, Result};

/// Strategy for handling records that fail to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryMode {
    /// Skip the failing record, log it, and continue with the next one (default)
    #[default]
    Lenient,
    /// Return the first failure to the caller
    Strict,
}

/// A candidate record slice that failed to decode.
#[derive(Debug)]
pub struct SkippedRecord {
    /// Zero-based index of the candidate slice in the buffer
    pub index: usize,
    /// Byte offset of the slice within the buffer
    pub offset: usize,
    /// Why the slice was rejected
    pub error: MarcError,
}

impl RecoveryMode {
    /// Apply this mode to a per-record failure.
    ///
    /// # Errors
    ///
    /// Returns the error unchanged in strict mode; lenient mode turns it
    /// into a [`SkippedRecord`].
    pub fn recover(self, index: usize, offset: usize, error: MarcError) -> Result<SkippedRecord> {
        match self {
            RecoveryMode::Strict => Err(error),
            RecoveryMode::Lenient => Ok(SkippedRecord {
                index,
                offset,
                error,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_lenient() {
        assert_eq!(RecoveryMode::default(), RecoveryMode::Lenient);
    }

    #[test]
    fn test_recovery_mode_lenient() {
        let error = MarcError::InvalidRecord("test".to_string());
        let skipped = RecoveryMode::Lenient.recover(3, 120, error).unwrap();
        assert_eq!(skipped.index, 3);
        assert_eq!(skipped.offset, 120);
        assert!(skipped.error.to_string().contains("test"));
    }

    #[test]
    fn test_recovery_mode_strict() {
        let error = MarcError::InvalidRecord("test".to_string());
        assert!(RecoveryMode::Strict.recover(0, 0, error).is_err());
    }
}
