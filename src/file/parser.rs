//! Cursor-based reader for CLYT section payloads.
//!
//! This module provides the [`crate::file::parser::Parser`] type, the read half of the codec's
//! byte layer. It keeps a position inside a borrowed byte slice and offers bounds-checked access to
//! the handful of encodings a CLYT container uses:
//!
//! - little-endian primitives through [`crate::file::parser::Parser::read_le`]
//! - 4-byte ASCII tags through [`crate::file::parser::Parser::read_tag`]
//! - fixed-width, null-padded names through [`crate::file::parser::Parser::read_fixed_string`]
//! - null-terminated names through [`crate::file::parser::Parser::read_cstring`]
//! - UTF-16LE text runs through [`crate::file::parser::Parser::read_utf16`]
//!
//! Section handlers jump around inside their section (offset tables, the text record's absolute
//! text offset), so [`crate::file::parser::Parser::seek`] accepts any position up to and including
//! the end of the data.
//!
//! # Examples
//!
//! ```rust
//! use bclyt::Parser;
//!
//! let data = [b'p', b'a', b'n', b'1', 0x10, 0x00, 0x00, 0x00];
//! let mut parser = Parser::new(&data);
//!
//! assert_eq!(&parser.read_tag()?, b"pan1");
//! assert_eq!(parser.read_le::<u32>()?, 0x10);
//! assert!(!parser.has_more_data());
//! # Ok::<(), bclyt::Error>(())
//! ```

use widestring::U16Str;

use crate::{file::io::read_le_at, file::io::ClytIO, Result};

/// A bounds-checked little-endian reader over a byte slice.
///
/// `Parser` never panics on malformed input: every read validates that enough bytes remain and
/// returns [`crate::Error::OutOfBounds`] otherwise, leaving the position untouched.
pub struct Parser<'a> {
    /// The binary data being parsed
    data: &'a [u8],
    /// Current position within the data buffer
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new [`crate::file::parser::Parser`] positioned at the start of `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Returns the length of the underlying data buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the parser has no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` while the position is before the end of the data.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Move to an absolute position.
    ///
    /// Seeking to exactly the end of the data is allowed, it is where the decoder lands after the
    /// last section.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `pos` is beyond the end of the data.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(out_of_bounds_error!());
        }

        self.position = pos;
        Ok(())
    }

    /// Move forward by `step` bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if that would move past the end of the data.
    pub fn advance_by(&mut self, step: usize) -> Result<()> {
        match self.position.checked_add(step) {
            Some(pos) => self.seek(pos),
            None => Err(out_of_bounds_error!()),
        }
    }

    /// Returns the current position.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Returns the complete underlying data.
    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Read a little-endian primitive and advance past it.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if not enough data remains.
    pub fn read_le<T: ClytIO>(&mut self) -> Result<T> {
        read_le_at::<T>(self.data, &mut self.position)
    }

    /// Borrow the next `len` bytes and advance past them.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if not enough data remains.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let Some(end) = self.position.checked_add(len) else {
            return Err(out_of_bounds_error!());
        };
        if end > self.data.len() {
            return Err(out_of_bounds_error!());
        }

        let bytes = &self.data[self.position..end];
        self.position = end;
        Ok(bytes)
    }

    /// Read a 4-byte section or container tag.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than 4 bytes remain.
    pub fn read_tag(&mut self) -> Result<[u8; 4]> {
        let mut tag = [0u8; 4];
        tag.copy_from_slice(self.read_bytes(4)?);
        Ok(tag)
    }

    /// Read a fixed-width, null-padded UTF-8 name of `width` bytes.
    ///
    /// The name ends at the first null byte; the whole field is consumed regardless. Every byte
    /// after the terminator must be zero, otherwise the field could not be written back as read.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `width` bytes remain, or
    /// [`crate::Error::Malformed`] if the name is not valid UTF-8 or the padding is not zeroed.
    pub fn read_fixed_string(&mut self, width: usize) -> Result<String> {
        let start = self.position;
        let field = self.read_bytes(width)?;
        let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());

        if let Some(stray) = field[end..].iter().position(|&b| b != 0) {
            return Err(malformed_error!(
                "Fixed-width name at offset {:#x} has data after its terminator at offset {:#x}",
                start,
                start + end + stray
            ));
        }

        match std::str::from_utf8(&field[..end]) {
            Ok(name) => Ok(name.to_string()),
            Err(_) => Err(malformed_error!(
                "Fixed-width name at offset {:#x} is not valid UTF-8",
                start
            )),
        }
    }

    /// Read a null-terminated UTF-8 string and advance past its terminator.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if no terminator is found before the end of the data,
    /// or [`crate::Error::Malformed`] if the string is not valid UTF-8.
    pub fn read_cstring(&mut self) -> Result<String> {
        let start = self.position;
        let Some(len) = self.data[start..].iter().position(|&b| b == 0) else {
            return Err(out_of_bounds_error!());
        };

        let bytes = self.read_bytes(len)?;
        self.position += 1;

        match std::str::from_utf8(bytes) {
            Ok(value) => Ok(value.to_string()),
            Err(_) => Err(malformed_error!(
                "String at offset {:#x} is not valid UTF-8",
                start
            )),
        }
    }

    /// Read `byte_len` bytes of UTF-16LE text. Null code units are kept as `'\0'`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if not enough data remains, or
    /// [`crate::Error::Malformed`] if `byte_len` is odd or the text is not valid UTF-16.
    pub fn read_utf16(&mut self, byte_len: usize) -> Result<String> {
        let start = self.position;
        if byte_len % 2 != 0 {
            return Err(malformed_error!(
                "UTF-16 text at offset {:#x} has odd length {}",
                start,
                byte_len
            ));
        }

        let bytes = self.read_bytes(byte_len)?;
        let units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        U16Str::from_slice(&units)
            .to_string()
            .map_err(|_| malformed_error!("Text at offset {:#x} is not valid UTF-16", start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seek_and_advance() {
        let data = [0u8; 8];
        let mut parser = Parser::new(&data);

        parser.seek(8).unwrap();
        assert!(!parser.has_more_data());
        assert!(parser.seek(9).is_err());

        parser.seek(2).unwrap();
        parser.advance_by(4).unwrap();
        assert_eq!(parser.pos(), 6);
        assert!(parser.advance_by(3).is_err());
        assert_eq!(parser.pos(), 6);
        assert!(parser.advance_by(usize::MAX).is_err());
    }

    #[test]
    fn fixed_string_trims_padding() {
        let mut data = [0u8; 0x18 + 1];
        data[..4].copy_from_slice(b"Root");
        data[0x18] = 0xAA;

        let mut parser = Parser::new(&data);
        assert_eq!(parser.read_fixed_string(0x18).unwrap(), "Root");
        assert_eq!(parser.pos(), 0x18);
        assert_eq!(parser.read_le::<u8>().unwrap(), 0xAA);
    }

    #[test]
    fn fixed_string_rejects_dirty_padding() {
        let mut data = [0u8; 0x18];
        data[..7].copy_from_slice(b"Root\0XY");

        let mut parser = Parser::new(&data);
        match parser.read_fixed_string(0x18) {
            Err(crate::Error::Malformed { message, .. }) => assert!(message.contains("0x5")),
            other => panic!("expected malformed error, got {other:?}"),
        }

        data[..7].copy_from_slice(b"Root\0\0\0");
        data[0x17] = 1;
        let mut parser = Parser::new(&data);
        assert!(parser.read_fixed_string(0x18).is_err());
    }

    #[test]
    fn fixed_string_full_width() {
        let data = *b"ABCDEFGHIJKLMNOP";
        let mut parser = Parser::new(&data);
        assert_eq!(parser.read_fixed_string(16).unwrap(), "ABCDEFGHIJKLMNOP");
    }

    #[test]
    fn fixed_string_invalid_utf8() {
        let data = [0xFF, 0xFE, 0x00, 0x00];
        let mut parser = Parser::new(&data);
        assert!(matches!(
            parser.read_fixed_string(4),
            Err(crate::Error::Malformed { .. })
        ));
    }

    #[test]
    fn cstring() {
        let data = b"tex_a.bclim\0font\0";
        let mut parser = Parser::new(data);
        assert_eq!(parser.read_cstring().unwrap(), "tex_a.bclim");
        assert_eq!(parser.read_cstring().unwrap(), "font");
        assert!(!parser.has_more_data());
    }

    #[test]
    fn cstring_unterminated() {
        let data = b"abc";
        let mut parser = Parser::new(data);
        assert!(parser.read_cstring().is_err());
        assert_eq!(parser.pos(), 0);
    }

    #[test]
    fn utf16_keeps_nulls() {
        let data = [0x48, 0x00, 0x69, 0x00, 0x00, 0x00, 0x00, 0x00];
        let mut parser = Parser::new(&data);
        assert_eq!(parser.read_utf16(4).unwrap(), "Hi");
        assert_eq!(parser.read_utf16(4).unwrap(), "\0\0");
        assert!(!parser.has_more_data());
    }

    #[test]
    fn utf16_rejects_bad_input() {
        let data = [0x48, 0x00, 0x00];
        let mut parser = Parser::new(&data);
        assert!(parser.read_utf16(3).is_err());

        // Lone high surrogate
        let data = [0x00, 0xD8];
        let mut parser = Parser::new(&data);
        assert!(matches!(
            parser.read_utf16(2),
            Err(crate::Error::Malformed { .. })
        ));
    }
}
