//! Input sources and byte-level I/O for CLYT containers.
//!
//! This module separates *where the bytes come from* from *how they are read and written*:
//!
//! - **Backend system** - [`crate::file::Backend`] abstracts over a memory-mapped file on disk and
//!   an owned in-memory buffer, [`crate::file::File`] wraps whichever one is in use.
//! - **Reading** - [`crate::file::parser::Parser`] is the bounds-checked cursor the decoder runs on.
//! - **Writing** - [`crate::file::writer::Writer`] is the seekable buffer the encoder patches into.
//! - **Primitives** - [`crate::file::io`] holds the little-endian read/write helpers both build on.
//!
//! # Examples
//!
//! ```rust,no_run
//! use bclyt::File;
//! use std::path::Path;
//!
//! let file = File::from_file(Path::new("tests/samples/title.bclyt"))?;
//! println!("Loaded {} bytes", file.len());
//! # Ok::<(), bclyt::Error>(())
//! ```

pub mod io;
pub mod parser;
pub mod writer;

mod memory;
mod physical;

use std::path::Path;

use crate::{Error::Empty, Result};
use memory::Memory;
use physical::Physical;

/// Source of the raw bytes of a container.
///
/// Implemented by the memory-mapped [`physical::Physical`] backend and the owned
/// [`memory::Memory`] backend.
pub trait Backend: Send + Sync {
    /// Borrow `len` bytes starting at `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range is not fully inside the data.
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]>;

    /// Borrow the complete data.
    fn data(&self) -> &[u8];

    /// Length of the data in bytes.
    fn len(&self) -> usize;
}

/// A loaded, non-empty input buffer.
pub struct File {
    data: Box<dyn Backend>,
}

impl File {
    /// Memory-map the file at `file`.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be opened or mapped, or
    /// [`crate::Error::Empty`] if it has no content.
    pub fn from_file(file: &Path) -> Result<File> {
        let input = Physical::new(file)?;

        Self::load(input)
    }

    /// Take ownership of an in-memory buffer.
    ///
    /// # Errors
    /// Returns [`crate::Error::Empty`] if `data` is empty.
    pub fn from_mem(data: Vec<u8>) -> Result<File> {
        let input = Memory::new(data);

        Self::load(input)
    }

    fn load<T: Backend + 'static>(data: T) -> Result<File> {
        if data.len() == 0 {
            return Err(Empty);
        }

        Ok(File {
            data: Box::new(data),
        })
    }

    /// Returns the size of the input in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the input is empty (never the case for a loaded `File`).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the complete input.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.data.data()
    }

    /// Borrow `len` bytes starting at `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range is not fully inside the input.
    pub fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.data.data_slice(offset, len)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn from_mem() {
        let file = File::from_mem(vec![1, 2, 3, 4]).unwrap();
        assert_eq!(file.len(), 4);
        assert_eq!(file.data_slice(1, 2).unwrap(), &[2, 3]);
        assert!(file.data_slice(3, 2).is_err());
    }

    #[test]
    fn from_mem_empty() {
        assert!(matches!(File::from_mem(Vec::new()), Err(Empty)));
    }

    #[test]
    fn from_file() {
        let mut temp = tempfile::NamedTempFile::new().unwrap();
        temp.write_all(b"CLYT").unwrap();
        temp.flush().unwrap();

        let file = File::from_file(temp.path()).unwrap();
        assert_eq!(file.data(), b"CLYT");
    }

    #[test]
    fn from_file_empty() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        assert!(matches!(File::from_file(temp.path()), Err(Empty)));
    }
}
