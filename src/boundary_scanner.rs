//! Record boundary detection using 0x1D delimiters.
//!
//! This module locates candidate record slices in a buffer with the
//! SIMD-accelerated `memchr` crate. Boundaries are returned as
//! `(offset, length)` tuples; each slice includes its terminating 0x1D.
//! Bytes after the last terminator form one final, unterminated slice.
//!
//! # Example
//!
//! ```
//! use marcdiff::boundary_scanner::RecordBoundaryScanner;
//!
//! let data = vec![1, 2, 3, 0x1D, 4, 5];
//! let mut scanner = RecordBoundaryScanner::new();
//! let boundaries = scanner.scan(&data);
//!
//! assert_eq!(boundaries, vec![(0, 4), (4, 2)]);
//! ```

/// The byte value that terminates MARC records (ISO 2709).
pub const RECORD_TERMINATOR: u8 = 0x1D;

/// Record boundary scanner.
///
/// Holds a reusable boundaries buffer so repeated scans do not reallocate.
#[derive(Debug, Default)]
pub struct RecordBoundaryScanner {
    boundaries: Vec<(usize, usize)>,
}

impl RecordBoundaryScanner {
    /// Create a new boundary scanner with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            boundaries: Vec::with_capacity(100),
        }
    }

    /// Scan a buffer for candidate record slices.
    ///
    /// Every slice runs from the current position up to and including the
    /// next 0x1D. If bytes remain after the last terminator they are returned
    /// as a final slice running to the end of the buffer. An empty buffer
    /// yields no slices.
    ///
    /// # Examples
    ///
    /// ```
    /// use marcdiff::boundary_scanner::RecordBoundaryScanner;
    ///
    /// let data = vec![1, 0x1D, 0x1D, 2, 0x1D];
    /// let mut scanner = RecordBoundaryScanner::new();
    ///
    /// assert_eq!(scanner.scan(&data), vec![(0, 2), (2, 1), (3, 2)]);
    /// ```
    pub fn scan(&mut self, buffer: &[u8]) -> Vec<(usize, usize)> {
        self.boundaries.clear();
        let mut offset = 0;

        for terminator_pos in memchr::memchr_iter(RECORD_TERMINATOR, buffer) {
            let record_len = terminator_pos - offset + 1; // +1 to include terminator
            self.boundaries.push((offset, record_len));
            offset = terminator_pos + 1;
        }

        if offset < buffer.len() {
            self.boundaries.push((offset, buffer.len() - offset));
        }

        self.boundaries.clone()
    }

    /// Count the candidate slices in a buffer without collecting them.
    #[must_use]
    pub fn count_records(&self, buffer: &[u8]) -> usize {
        let terminated = memchr::memchr_iter(RECORD_TERMINATOR, buffer).count();
        let tail = match memchr::memrchr(RECORD_TERMINATOR, buffer) {
            Some(last) => usize::from(last + 1 < buffer.len()),
            None => usize::from(!buffer.is_empty()),
        };
        terminated + tail
    }
}
