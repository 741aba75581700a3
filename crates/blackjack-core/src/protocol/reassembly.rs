//! Stream reassembly: turning TCP's byte stream back into fixed-size records.
//!
//! # Why a buffer is needed
//!
//! TCP is a stream protocol.  There is no guarantee that a single `read()`
//! returns exactly one record:
//!
//! - It may return fewer bytes than the full record (partial read).
//! - It may return bytes from several records at once (coalesced reads).
//!
//! [`StreamReassembler`] accumulates everything that arrives and hands out
//! records only once all of their bytes are present.  Leftover bytes stay
//! buffered for the next call.

/// Append-only byte buffer consumed in fixed-size chunks.
///
/// Exclusively owned by the reading side of one connection.
#[derive(Debug, Default)]
pub struct StreamReassembler {
    buf: Vec<u8>,
}

impl StreamReassembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends freshly read bytes.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Removes and returns the first `size` bytes, or `None` (leaving the
    /// buffer untouched) when fewer than `size` bytes are buffered.
    pub fn take_record(&mut self, size: usize) -> Option<Vec<u8>> {
        if self.buf.len() < size {
            return None;
        }
        // `drain(..size)` shifts the remainder to the front; records here are
        // at most a few dozen bytes, so the copy is negligible.
        Some(self.buf.drain(..size).collect())
    }

    /// Number of bytes currently buffered.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Whether a complete record of `size` bytes is already available.
    pub fn has_record(&self, size: usize) -> bool {
        self.buf.len() >= size
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
