//! Record kind discriminant and the non-consuming dispatch probe.

use std::fmt;

use crate::codec::ByteReader;
use crate::error::CaptureError;

/// Byte offset of the kind discriminant inside a record:
/// after the u32 timestamp and the u16 millisecond offset.
pub const KIND_OFFSET: usize = 6;

/// Bytes needed to reach the end of the discriminant
/// (timestamp + offset + kind).
pub const KIND_PROBE_LEN: usize = KIND_OFFSET + 2;

/// The three kinds of captured intent.
///
/// # Examples
///
/// ```
/// use aics::RecordKind;
///
/// assert_eq!(RecordKind::try_from(1).unwrap(), RecordKind::Broadcast);
/// assert_eq!(RecordKind::Service.as_u16(), 2);
/// assert!(RecordKind::try_from(3).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// An activity launch (discriminant 0).
    Activity,
    /// A broadcast delivery (discriminant 1).
    Broadcast,
    /// A service start or bind (discriminant 2).
    Service,
}

impl RecordKind {
    /// All kinds in discriminant order.
    pub const ALL: [RecordKind; 3] = [Self::Activity, Self::Broadcast, Self::Service];

    /// The wire discriminant.
    pub fn as_u16(self) -> u16 {
        match self {
            Self::Activity => 0,
            Self::Broadcast => 1,
            Self::Service => 2,
        }
    }
}

impl TryFrom<u16> for RecordKind {
    type Error = CaptureError;

    fn try_from(v: u16) -> Result<Self, CaptureError> {
        match v {
            0 => Ok(Self::Activity),
            1 => Ok(Self::Broadcast),
            2 => Ok(Self::Service),
            found => Err(CaptureError::UnknownKind { found }),
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Activity => "activity",
            Self::Broadcast => "broadcast",
            Self::Service => "service",
        })
    }
}

/// Read the kind of the record starting at the reader's position.
///
/// The cursor does not move, so repeated calls return the same answer and
/// the caller can hand the same reader to the matching variant decoder.
pub fn peek_kind(r: &ByteReader<'_>) -> Result<RecordKind, CaptureError> {
    RecordKind::try_from(r.peek_u16_at(KIND_OFFSET, "record kind")?)
}
