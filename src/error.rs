use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! structural_error {
    ($msg:expr) => {
        crate::Error::Structural {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Structural {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! out_of_bounds_error {
    () => {
        crate::Error::OutOfBounds {
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every failure is terminal for the call that produced it: decoding either yields a complete
/// [`crate::Layout`] or one of these errors, there is no partial-result mode. The only anomaly the
/// decoder tolerates, an unknown section tag, is reported through `log::warn!` instead.
///
/// # Error Categories
///
/// ## Container Errors
/// - [`Error::Malformed`] - Bad header fields, bad section content, duplicate `mat1`, overlong names
/// - [`Error::UnsupportedVersion`] - Recognized container with a version this crate does not handle
/// - [`Error::OutOfBounds`] - A read or seek went past the end of the stream
/// - [`Error::Empty`] - Empty input provided
///
/// ## Tree Errors
/// - [`Error::Structural`] - Unbalanced start/end markers or a section with no cursor to attach to
/// - [`Error::Reference`] - A panel name used by a group, dump or string catalog does not resolve
///
/// ## I/O and External Errors
/// - [`Error::FileError`] - Filesystem I/O errors
/// - [`Error::Error`] - Miscellaneous failures, mostly from serializers
///
/// # Examples
///
/// ```rust
/// use bclyt::{Error, Layout};
///
/// match Layout::from_mem(b"NOPE".to_vec()) {
///     Err(Error::Malformed { message, .. }) => eprintln!("not a layout: {message}"),
///     Err(e) => eprintln!("other error: {e}"),
///     Ok(_) => unreachable!(),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The stream is not a well-formed CLYT container.
    ///
    /// Raised for a bad magic, endianness marker, header size or total size, for a second `mat1`
    /// section, for undecodable strings or enum values, and, while encoding, for names that do not
    /// fit their fixed-width field. The message names the offending tag or offset.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// The container header carries a version other than 2.2.0.0.
    #[error("Unsupported layout version {0:#010x}")]
    UnsupportedVersion(u32),

    /// The panel or group nesting described by the marker sections is inconsistent.
    ///
    /// Covers end markers without an open cursor, start markers without a node to descend into,
    /// markers left open at the end of the stream and a second top-level root.
    #[error("Structural - {file}:{line}: {message}")]
    Structural {
        /// Description of the nesting violation
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A panel name does not resolve to a panel of the expected kind.
    ///
    /// Returned by group resolution, structural dump import and string injection. The layout is
    /// left untouched when this error is returned.
    #[error("Unresolved panel reference - {0}")]
    Reference(String),

    /// An out of bound access was attempted while reading or patching the stream.
    #[error("Out of Bound access would have occurred - {file}:{line}")]
    OutOfBounds {
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,

    /// File I/O error.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Generic error for miscellaneous failures.
    ///
    /// Used for errors that don't fit into other categories or for
    /// wrapping external library errors with additional context.
    #[error("{0}")]
    Error(String),
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Error(error.to_string())
    }
}
