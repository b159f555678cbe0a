//! Error types for the capture codec.

use std::fmt;
use std::io;

use crate::kind::RecordKind;
use crate::{FORMAT_MAJOR_VERSION, FORMAT_MINOR_VERSION, MAGIC, MAGIC_SWAPPED};

/// Errors that can occur while encoding, decoding, or mutating capture data.
///
/// [`MagicMismatch`](Self::MagicMismatch) and
/// [`VersionMismatch`](Self::VersionMismatch) abort a whole-file decode.
/// The record-level variants only end the record sequence; see
/// [`CaptureError::is_record_level`].
#[derive(Debug)]
pub enum CaptureError {
    /// An I/O error occurred while reading or writing a capture stream.
    Io(io::Error),
    /// The buffer does not start with the `0xA1B2C3D4` magic number.
    MagicMismatch {
        /// The first four bytes, read big-endian.
        found: u32,
    },
    /// The file was written with an unsupported format version.
    VersionMismatch {
        /// Format major version found in the file.
        major: u16,
        /// Format minor version found in the file.
        minor: u16,
    },
    /// A record discriminant is not one of the known kinds.
    UnknownKind {
        /// The unrecognized discriminant.
        found: u16,
    },
    /// A variant decoder was invoked on a record of another kind.
    TypeMismatch {
        /// The kind the decoder handles.
        expected: RecordKind,
        /// The discriminant found in the buffer.
        found: u16,
    },
    /// Fewer bytes remain than a field requires.
    TruncatedInput {
        /// Name of the field being read.
        field: &'static str,
        /// Bytes the field requires.
        needed: usize,
        /// Bytes left in the buffer.
        available: usize,
    },
    /// A record decoded structurally but carries inconsistent values.
    MalformedRecord {
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// A mutation was rejected before it reached the value.
    InvalidArgument {
        /// Human-readable description of the rejected argument.
        detail: String,
    },
}

impl CaptureError {
    /// Whether this error affects a single record rather than the whole file.
    pub fn is_record_level(&self) -> bool {
        matches!(
            self,
            Self::UnknownKind { .. }
                | Self::TypeMismatch { .. }
                | Self::TruncatedInput { .. }
                | Self::MalformedRecord { .. }
        )
    }

    /// Whether a [`MagicMismatch`](Self::MagicMismatch) is the byte-swapped
    /// magic of a little-endian capture.
    pub fn is_byte_swapped(&self) -> bool {
        matches!(self, Self::MagicMismatch { found } if *found == MAGIC_SWAPPED)
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::MagicMismatch { found } if *found == MAGIC_SWAPPED => write!(
                f,
                "little-endian capture (magic {found:#010x}) is not supported"
            ),
            Self::MagicMismatch { found } => write!(
                f,
                "invalid magic number {found:#010x} (expected {MAGIC:#010x})"
            ),
            Self::VersionMismatch { major, minor } => write!(
                f,
                "unsupported format version {major}.{minor} \
                 (expected {FORMAT_MAJOR_VERSION}.{FORMAT_MINOR_VERSION})"
            ),
            Self::UnknownKind { found } => write!(f, "unknown record kind {found}"),
            Self::TypeMismatch { expected, found } => write!(
                f,
                "record kind mismatch: expected {expected} ({}), found {found}",
                expected.as_u16()
            ),
            Self::TruncatedInput {
                field,
                needed,
                available,
            } => write!(
                f,
                "truncated input reading {field}: need {needed} bytes, {available} available"
            ),
            Self::MalformedRecord { detail } => write!(f, "malformed record: {detail}"),
            Self::InvalidArgument { detail } => write!(f, "invalid argument: {detail}"),
        }
    }
}

impl std::error::Error for CaptureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for CaptureError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_level_classification() {
        assert!(CaptureError::UnknownKind { found: 7 }.is_record_level());
        assert!(CaptureError::TruncatedInput {
            field: "timestamp",
            needed: 4,
            available: 1
        }
        .is_record_level());
        assert!(!CaptureError::MagicMismatch { found: 0 }.is_record_level());
        assert!(!CaptureError::VersionMismatch { major: 1, minor: 0 }.is_record_level());
    }

    #[test]
    fn swapped_magic_is_named_in_message() {
        let err = CaptureError::MagicMismatch {
            found: MAGIC_SWAPPED,
        };
        assert!(err.is_byte_swapped());
        assert!(err.to_string().contains("little-endian"));

        let other = CaptureError::MagicMismatch { found: 0xDEADBEEF };
        assert!(!other.is_byte_swapped());
        assert!(other.to_string().contains("0xdeadbeef"));
    }

    #[test]
    fn io_error_is_source() {
        use std::error::Error;
        let err = CaptureError::from(io::Error::new(io::ErrorKind::Other, "disk"));
        assert!(err.source().is_some());
        assert!(CaptureError::UnknownKind { found: 3 }.source().is_none());
    }
}
