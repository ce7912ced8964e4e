//! Little-endian primitive reading and writing for CLYT streams.
//!
//! Everything in a CLYT container is little-endian: the header's `0xFEFF` byte-order mark is the
//! only endianness the 3DS layout engine emits, and the decoder rejects anything else. This module
//! therefore offers a single, bounds-checked pair of primitives built around the
//! [`crate::file::io::ClytIO`] trait:
//!
//! - [`crate::file::io::read_le_at`] - Read a value at an offset and advance the offset
//! - [`crate::file::io::write_le_at`] - Overwrite a value at an offset and advance the offset
//!
//! Both return [`crate::Error::OutOfBounds`] instead of panicking when the buffer is too short, so
//! a truncated section surfaces as an error from the decoder rather than a crash.
//!
//! # Examples
//!
//! ```rust,ignore
//! use bclyt::file::io::{read_le_at, write_le_at};
//!
//! let mut data = [0u8; 6];
//! let mut offset = 0;
//! write_le_at(&mut data, &mut offset, 0xFEFF_u16)?;
//! write_le_at(&mut data, &mut offset, 400.0_f32)?;
//!
//! let mut offset = 0;
//! assert_eq!(read_le_at::<u16>(&data, &mut offset)?, 0xFEFF);
//! assert_eq!(read_le_at::<f32>(&data, &mut offset)?, 400.0);
//! # Ok::<(), bclyt::Error>(())
//! ```

use crate::Result;

/// Fixed-size primitives that can be moved in and out of a CLYT byte stream.
///
/// Implemented for the integer and float widths that appear in the container. `Bytes` is the
/// fixed-size array matching `size_of::<Self>()`.
pub trait ClytIO: Sized + Copy {
    /// The byte array representation of the value.
    type Bytes: AsRef<[u8]> + for<'a> TryFrom<&'a [u8]>;

    /// Decode the value from its little-endian representation.
    fn from_le_bytes(bytes: Self::Bytes) -> Self;

    /// Encode the value into its little-endian representation.
    fn to_le_bytes(self) -> Self::Bytes;
}

macro_rules! impl_clyt_io {
    ($($ty:ty),*) => {
        $(
            impl ClytIO for $ty {
                type Bytes = [u8; std::mem::size_of::<$ty>()];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }

                fn to_le_bytes(self) -> Self::Bytes {
                    <$ty>::to_le_bytes(self)
                }
            }
        )*
    };
}

impl_clyt_io!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

/// Read a value from the start of `data`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if `data` is shorter than the value.
pub fn read_le<T: ClytIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_le_at(data, &mut offset)
}

/// Read a value at `offset` and advance `offset` past it.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the value does not fit between `offset` and the end of
/// `data`. `offset` is left unchanged in that case.
pub fn read_le_at<T: ClytIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(out_of_bounds_error!());
    };
    if end > data.len() {
        return Err(out_of_bounds_error!());
    }

    let Ok(read) = data[*offset..end].try_into() else {
        return Err(out_of_bounds_error!());
    };

    *offset = end;
    Ok(T::from_le_bytes(read))
}

/// Overwrite the bytes at `offset` with `value` and advance `offset` past it.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the value does not fit inside `data`.
pub fn write_le_at<T: ClytIO>(data: &mut [u8], offset: &mut usize, value: T) -> Result<()> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(out_of_bounds_error!());
    };
    if end > data.len() {
        return Err(out_of_bounds_error!());
    }

    data[*offset..end].copy_from_slice(value.to_le_bytes().as_ref());
    *offset = end;
    Ok(())
}
