//! Growable, seekable writer used by the encoder.
//!
//! [`crate::file::writer::Writer`] is the write half of the codec's byte layer. It behaves like an
//! in-memory stream: writes at the current position overwrite existing bytes and extend the buffer
//! when they run past its end. The encoder relies on two patterns built on top of it:
//!
//! - **Placeholder then patch**: reserve a zeroed field, keep its offset, fill it in with
//!   [`crate::file::writer::Writer::patch_le`] once the value is known (section lengths, header
//!   size and count, offset table slots).
//! - **Alignment**: [`crate::file::writer::Writer::pad_to`] zero-fills up to a boundary, every
//!   section ends 4-byte aligned.

use crate::{
    file::io::{write_le_at, ClytIO},
    Result,
};

/// An in-memory little-endian output stream with random-access patching.
#[derive(Debug, Default)]
pub struct Writer {
    /// Output written so far
    data: Vec<u8>,
    /// Current write position, never beyond `data.len()`
    position: usize,
}

impl Writer {
    /// Create an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current write position.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Returns the number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if nothing has been written yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Move the write position to `pos`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `pos` is beyond the end of the written data.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(out_of_bounds_error!());
        }

        self.position = pos;
        Ok(())
    }

    /// Write raw bytes at the current position, overwriting and extending as needed.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        let end = self.position + bytes.len();
        if end > self.data.len() {
            self.data.resize(end, 0);
        }

        self.data[self.position..end].copy_from_slice(bytes);
        self.position = end;
    }

    /// Write a little-endian primitive at the current position.
    pub fn write_le<T: ClytIO>(&mut self, value: T) {
        self.write_bytes(value.to_le_bytes().as_ref());
    }

    /// Write `count` zero bytes.
    pub fn write_zeros(&mut self, count: usize) {
        let end = self.position + count;
        if end > self.data.len() {
            self.data.resize(end, 0);
        }

        self.data[self.position..end].fill(0);
        self.position = end;
    }

    /// Write `value` into a fixed-width field of `width` bytes, null padded.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the UTF-8 encoding of `value` is longer than `width`
    /// or contains a null byte.
    pub fn write_fixed_string(&mut self, value: &str, width: usize) -> Result<()> {
        let bytes = value.as_bytes();
        if bytes.contains(&0) {
            return Err(malformed_error!(
                "Name '{}' contains a null byte",
                value.escape_debug()
            ));
        }
        if bytes.len() > width {
            return Err(malformed_error!(
                "Name '{}' is {} bytes long, the field only holds {}",
                value,
                bytes.len(),
                width
            ));
        }

        self.write_bytes(bytes);
        self.write_zeros(width - bytes.len());
        Ok(())
    }

    /// Write `value` followed by a null terminator.
    pub fn write_cstring(&mut self, value: &str) {
        self.write_bytes(value.as_bytes());
        self.write_le(0u8);
    }

    /// Zero-fill until the current position is a multiple of `alignment`.
    pub fn pad_to(&mut self, alignment: usize) {
        let padding = (alignment - (self.position % alignment)) % alignment;
        self.write_zeros(padding);
    }

    /// Overwrite an already written primitive at `offset` without moving the write position.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the value does not lie within the written data.
    pub fn patch_le<T: ClytIO>(&mut self, offset: usize, value: T) -> Result<()> {
        let mut offset = offset;
        write_le_at(&mut self.data, &mut offset, value)
    }

    /// Returns the bytes written so far.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the writer and return its buffer.
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}
