//! File format detection and file loading.
//!
//! Only ISO 2709 (`.mrc`, `.marc`) is recognized. The extension is advisory:
//! [`decode_file`] decodes whatever it is given and logs a warning when the
//! extension is unfamiliar.

use crate::decoder::Decoder;
use crate::error::Result;
use crate::record::MarcRecord;
use std::path::Path;
use tracing::{debug, warn};

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Format {
    /// ISO 2709 binary MARC (`.mrc`, `.marc`)
    Iso2709,
}

impl Format {
    /// Detect format from a file extension, case-insensitively.
    ///
    /// # Example
    ///
    /// ```
    /// use marcdiff::format::Format;
    ///
    /// assert_eq!(Format::from_extension("MARC"), Some(Format::Iso2709));
    /// assert_eq!(Format::from_extension("xml"), None);
    /// ```
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "mrc" | "marc" => Some(Self::Iso2709),
            _ => None,
        }
    }

    /// Detect format from a path's extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Human-readable format name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Iso2709 => "ISO 2709",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Read a file's bytes, warning if its extension is not a MARC one.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    match Format::from_path(path) {
        Some(format) => debug!(path = %path.display(), %format, "reading file"),
        None => warn!(
            path = %path.display(),
            "file does not have a .mrc or .marc extension, decoding anyway"
        ),
    }
    Ok(std::fs::read(path)?)
}

/// Read a file and decode its records.
///
/// # Errors
///
/// Returns an error if the file cannot be read, or in strict mode the first
/// record that fails to decode.
pub fn decode_file(decoder: &Decoder, path: &Path) -> Result<Vec<MarcRecord>> {
    let buffer = read_file(path)?;
    decoder.decode_all(&buffer)
}
