//! Intent records: the common prefix, the per-kind variants, and the
//! [`IntentRecord`] sum type that dispatches between them.
//!
//! # Layout
//!
//! ```text
//! [timestamp u32] [offset u16] [kind u16]
//! [caller uid i32] [caller pid i32] [receiver uid i32] [receiver pid i32] [user id i32]
//! [kind-specific i32 fields] [3 × field length u32] [payload size u32]
//! [3 × field body] [payload block]
//! ```
//!
//! [`RecordFormat::encode`] stops before the payload block. The container
//! appends [`Payload::encode`] right after it.

mod activity;
mod broadcast;
mod service;

pub use activity::ActivityRecord;
pub use broadcast::BroadcastRecord;
pub use service::ServiceRecord;

use crate::codec::{put_body, put_i32, put_len, put_u16, put_u32, ByteReader};
use crate::error::CaptureError;
use crate::kind::{peek_kind, RecordKind};
use crate::payload::Payload;

/// Largest valid sub-second offset.
pub const MAX_OFFSET_MILLIS: u16 = 999;

/// Bytes taken by the prefix shared by every kind.
pub const COMMON_PREFIX_LEN: usize = 4 + 2 + 2 + 4 * 5;

fn validate_offset(millis: i32) -> Result<u16, CaptureError> {
    match u16::try_from(millis) {
        Ok(v) if v <= MAX_OFFSET_MILLIS => Ok(v),
        _ => Err(CaptureError::InvalidArgument {
            detail: format!("millisecond offset {millis} outside [0, {MAX_OFFSET_MILLIS}]"),
        }),
    }
}

/// Fields shared by every record kind.
///
/// The kind discriminant is not stored here: it is implied by the variant
/// that embeds this struct and written by the variant's encoder.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct RecordCommon {
    timestamp: u32,
    offset_millis: u16,
    caller_uid: i32,
    caller_pid: i32,
    receiver_uid: i32,
    receiver_pid: i32,
    user_id: i32,
}

impl RecordCommon {
    /// A prefix with every field zeroed.
    pub fn new() -> Self {
        Self::default()
    }

    /// UNIX timestamp in seconds.
    pub fn timestamp(&self) -> u32 {
        self.timestamp
    }

    /// Milliseconds past [`timestamp`](Self::timestamp), in `[0, 999]`.
    pub fn offset_millis(&self) -> u16 {
        self.offset_millis
    }

    /// UID of the sending process.
    pub fn caller_uid(&self) -> i32 {
        self.caller_uid
    }

    /// PID of the sending process.
    pub fn caller_pid(&self) -> i32 {
        self.caller_pid
    }

    /// UID of the receiving process.
    pub fn receiver_uid(&self) -> i32 {
        self.receiver_uid
    }

    /// PID of the receiving process.
    pub fn receiver_pid(&self) -> i32 {
        self.receiver_pid
    }

    /// Android user the intent was sent as.
    pub fn user_id(&self) -> i32 {
        self.user_id
    }

    /// Builder form of [`set_timestamp`](Self::set_timestamp).
    pub fn with_timestamp(mut self, timestamp: u32) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Builder form of [`set_offset_millis`](Self::set_offset_millis).
    pub fn with_offset_millis(mut self, millis: i32) -> Result<Self, CaptureError> {
        self.set_offset_millis(millis)?;
        Ok(self)
    }

    /// Builder form of [`set_caller`](Self::set_caller).
    pub fn with_caller(mut self, uid: i32, pid: i32) -> Self {
        self.set_caller(uid, pid);
        self
    }

    /// Builder form of [`set_receiver`](Self::set_receiver).
    pub fn with_receiver(mut self, uid: i32, pid: i32) -> Self {
        self.set_receiver(uid, pid);
        self
    }

    /// Builder form of [`set_user_id`](Self::set_user_id).
    pub fn with_user_id(mut self, user_id: i32) -> Self {
        self.user_id = user_id;
        self
    }

    /// Replace the timestamp.
    pub fn set_timestamp(&mut self, timestamp: u32) {
        self.timestamp = timestamp;
    }

    /// Replace the millisecond offset.
    ///
    /// Fails with [`CaptureError::InvalidArgument`] outside `[0, 999]`,
    /// leaving the current value untouched.
    pub fn set_offset_millis(&mut self, millis: i32) -> Result<(), CaptureError> {
        self.offset_millis = validate_offset(millis)?;
        Ok(())
    }

    /// Replace the caller UID and PID.
    pub fn set_caller(&mut self, uid: i32, pid: i32) {
        self.caller_uid = uid;
        self.caller_pid = pid;
    }

    /// Replace the receiver UID and PID.
    pub fn set_receiver(&mut self, uid: i32, pid: i32) {
        self.receiver_uid = uid;
        self.receiver_pid = pid;
    }

    /// Replace the user ID.
    pub fn set_user_id(&mut self, user_id: i32) {
        self.user_id = user_id;
    }

    fn encode_into(&self, kind: RecordKind, out: &mut Vec<u8>) {
        put_u32(out, self.timestamp);
        put_u16(out, self.offset_millis);
        put_u16(out, kind.as_u16());
        put_i32(out, self.caller_uid);
        put_i32(out, self.caller_pid);
        put_i32(out, self.receiver_uid);
        put_i32(out, self.receiver_pid);
        put_i32(out, self.user_id);
    }

    fn decode(r: &mut ByteReader<'_>, expected: RecordKind) -> Result<Self, CaptureError> {
        let timestamp = r.read_u32("timestamp")?;
        let offset_millis = r.read_u16("millisecond offset")?;
        let kind = r.read_u16("record kind")?;
        if kind != expected.as_u16() {
            return Err(CaptureError::TypeMismatch {
                expected,
                found: kind,
            });
        }
        if offset_millis > MAX_OFFSET_MILLIS {
            return Err(CaptureError::MalformedRecord {
                detail: format!("millisecond offset {offset_millis} exceeds {MAX_OFFSET_MILLIS}"),
            });
        }
        Ok(Self {
            timestamp,
            offset_millis,
            caller_uid: r.read_i32("caller uid")?,
            caller_pid: r.read_i32("caller pid")?,
            receiver_uid: r.read_i32("receiver uid")?,
            receiver_pid: r.read_i32("receiver pid")?,
            user_id: r.read_i32("user id")?,
        })
    }
}

/// Wire names of a variant's three variable fields, as
/// `(length field, body field)` pairs.
type FieldNames = [(&'static str, &'static str); 3];

/// The variable part of a record once its kind-specific integers are read.
struct Tail {
    fields: [Vec<u8>; 3],
    payload: Payload,
}

/// Write the three lengths, the payload size, then the three bodies.
fn encode_tail(out: &mut Vec<u8>, fields: [&[u8]; 3], payload: &Payload) {
    for field in fields {
        put_len(out, field);
    }
    put_u32(out, payload.size() as u32);
    for field in fields {
        put_body(out, field);
    }
}

/// Mirror of [`encode_tail`], followed by the payload block itself.
fn decode_tail(r: &mut ByteReader<'_>, names: &FieldNames) -> Result<Tail, CaptureError> {
    let mut lens = [0u32; 3];
    for (len, &(name, _)) in lens.iter_mut().zip(names) {
        *len = r.read_u32(name)?;
    }
    let declared = r.read_u32("payload size")?;

    let mut fields: [Vec<u8>; 3] = Default::default();
    for ((field, len), &(_, name)) in fields.iter_mut().zip(lens).zip(names) {
        *field = r.read_body(len, name)?;
    }

    let payload = Payload::decode(r)?;
    if payload.size() != declared as usize {
        return Err(CaptureError::MalformedRecord {
            detail: format!(
                "declared payload size {declared} but payload occupies {} bytes",
                payload.size()
            ),
        });
    }
    Ok(Tail { fields, payload })
}

/// Encoding and decoding shared by the three record variants.
///
/// Implementors provide their kind-specific integers and their three
/// variable fields; framing, sizing, and payload handling are common.
pub trait RecordFormat: Sized {
    /// The discriminant this variant writes and accepts.
    const KIND: RecordKind;

    /// Bytes taken by this variant's fixed-width fields, including the
    /// three lengths and the payload size.
    const FIXED_LEN: usize;

    /// The shared prefix.
    fn common(&self) -> &RecordCommon;

    /// Mutable access to the shared prefix.
    fn common_mut(&mut self) -> &mut RecordCommon;

    /// The attached payload.
    fn payload(&self) -> &Payload;

    /// Mutable access to the attached payload.
    fn payload_mut(&mut self) -> &mut Payload;

    /// The three variable fields in wire order.
    fn variable_fields(&self) -> [&[u8]; 3];

    /// Write the integers that sit between the common prefix and the
    /// variable-field lengths.
    fn encode_kind_fields(&self, out: &mut Vec<u8>);

    /// Decode a record of this kind starting at the reader's position,
    /// payload included.
    ///
    /// Fails with [`CaptureError::TypeMismatch`] when the discriminant names
    /// another kind and [`CaptureError::TruncatedInput`] when any field runs
    /// past the end of the buffer.
    fn decode(r: &mut ByteReader<'_>) -> Result<Self, CaptureError>;

    /// Encoded size of the record framing, excluding the payload.
    fn size(&self) -> usize {
        Self::FIXED_LEN + self.variable_fields().iter().map(|f| f.len()).sum::<usize>()
    }

    /// Append the record framing (not the payload) to `out`.
    fn encode_into(&self, out: &mut Vec<u8>) {
        self.common().encode_into(Self::KIND, out);
        self.encode_kind_fields(out);
        encode_tail(out, self.variable_fields(), self.payload());
    }

    /// Encode the record framing into a buffer of exactly
    /// [`size`](Self::size) bytes. The payload is not included.
    fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size());
        self.encode_into(&mut out);
        out
    }
}

/// One captured intent of any kind.
///
/// # Examples
///
/// ```
/// use aics::{ActivityRecord, IntentRecord, Payload, RecordKind};
/// use aics::codec::ByteReader;
///
/// let record: IntentRecord = ActivityRecord::new()
///     .with_caller_component("component.caller")
///     .with_receiver_component("component.receiver")
///     .with_payload(Payload::new().with_action("action.one"))
///     .into();
///
/// let mut bytes = record.encode();
/// bytes.extend(record.payload().encode());
/// assert_eq!(bytes.len(), record.encoded_len());
///
/// let decoded = IntentRecord::decode(&mut ByteReader::new(&bytes)).unwrap();
/// assert_eq!(decoded.kind(), RecordKind::Activity);
/// assert_eq!(decoded, record);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum IntentRecord {
    /// An activity launch.
    Activity(ActivityRecord),
    /// A broadcast delivery.
    Broadcast(BroadcastRecord),
    /// A service start or bind.
    Service(ServiceRecord),
}

impl IntentRecord {
    /// The record's kind.
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Activity(_) => RecordKind::Activity,
            Self::Broadcast(_) => RecordKind::Broadcast,
            Self::Service(_) => RecordKind::Service,
        }
    }

    /// The shared prefix.
    pub fn common(&self) -> &RecordCommon {
        match self {
            Self::Activity(r) => r.common(),
            Self::Broadcast(r) => r.common(),
            Self::Service(r) => r.common(),
        }
    }

    /// Mutable access to the shared prefix.
    pub fn common_mut(&mut self) -> &mut RecordCommon {
        match self {
            Self::Activity(r) => r.common_mut(),
            Self::Broadcast(r) => r.common_mut(),
            Self::Service(r) => r.common_mut(),
        }
    }

    /// The attached payload.
    pub fn payload(&self) -> &Payload {
        match self {
            Self::Activity(r) => r.payload(),
            Self::Broadcast(r) => r.payload(),
            Self::Service(r) => r.payload(),
        }
    }

    /// Mutable access to the attached payload.
    pub fn payload_mut(&mut self) -> &mut Payload {
        match self {
            Self::Activity(r) => r.payload_mut(),
            Self::Broadcast(r) => r.payload_mut(),
            Self::Service(r) => r.payload_mut(),
        }
    }

    /// Component that received the intent.
    pub fn receiver_component(&self) -> &[u8] {
        match self {
            Self::Activity(r) => r.receiver_component(),
            Self::Broadcast(r) => r.receiver_component(),
            Self::Service(r) => r.receiver_component(),
        }
    }

    /// Component that sent the intent.
    pub fn caller_component(&self) -> &[u8] {
        match self {
            Self::Activity(r) => r.caller_component(),
            Self::Broadcast(r) => r.caller_component(),
            Self::Service(r) => r.caller_component(),
        }
    }

    /// Encoded size of the record framing, excluding the payload.
    pub fn size(&self) -> usize {
        match self {
            Self::Activity(r) => r.size(),
            Self::Broadcast(r) => r.size(),
            Self::Service(r) => r.size(),
        }
    }

    /// Encoded size of the framing plus the payload.
    pub fn encoded_len(&self) -> usize {
        self.size() + self.payload().size()
    }

    /// Append the record framing (not the payload) to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        match self {
            Self::Activity(r) => r.encode_into(out),
            Self::Broadcast(r) => r.encode_into(out),
            Self::Service(r) => r.encode_into(out),
        }
    }

    /// Encode the record framing. The payload is not included.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size());
        self.encode_into(&mut out);
        out
    }

    /// Peek the discriminant and decode the matching variant, payload
    /// included.
    pub fn decode(r: &mut ByteReader<'_>) -> Result<Self, CaptureError> {
        Ok(match peek_kind(r)? {
            RecordKind::Activity => Self::Activity(ActivityRecord::decode(r)?),
            RecordKind::Broadcast => Self::Broadcast(BroadcastRecord::decode(r)?),
            RecordKind::Service => Self::Service(ServiceRecord::decode(r)?),
        })
    }
}

impl From<ActivityRecord> for IntentRecord {
    fn from(r: ActivityRecord) -> Self {
        Self::Activity(r)
    }
}

impl From<BroadcastRecord> for IntentRecord {
    fn from(r: BroadcastRecord) -> Self {
        Self::Broadcast(r)
    }
}

impl From<ServiceRecord> for IntentRecord {
    fn from(r: ServiceRecord) -> Self {
        Self::Service(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_common() -> RecordCommon {
        RecordCommon::new()
            .with_timestamp(1_460_000_000)
            .with_offset_millis(250)
            .unwrap()
            .with_caller(10_001, 321)
            .with_receiver(1_000, 654)
            .with_user_id(-1)
    }

    #[test]
    fn offset_bounds() {
        let mut c = RecordCommon::new();
        assert!(c.set_offset_millis(0).is_ok());
        assert!(c.set_offset_millis(999).is_ok());
        assert_eq!(c.offset_millis(), 999);

        for bad in [-1, 1000, i32::MIN, i32::MAX, 65_536] {
            let err = c.set_offset_millis(bad).unwrap_err();
            assert!(matches!(err, CaptureError::InvalidArgument { .. }), "{bad}");
        }
        // Rejected values leave the previous one in place.
        assert_eq!(c.offset_millis(), 999);
        assert!(RecordCommon::new().with_offset_millis(1000).is_err());
    }

    #[test]
    fn common_prefix_layout() {
        let mut out = Vec::new();
        sample_common().encode_into(RecordKind::Broadcast, &mut out);
        assert_eq!(out.len(), COMMON_PREFIX_LEN);
        assert_eq!(&out[0..4], &1_460_000_000u32.to_be_bytes());
        assert_eq!(&out[4..6], &250u16.to_be_bytes());
        assert_eq!(&out[6..8], &1u16.to_be_bytes());
        assert_eq!(&out[24..28], &(-1i32).to_be_bytes());

        let got = RecordCommon::decode(&mut ByteReader::new(&out), RecordKind::Broadcast).unwrap();
        assert_eq!(got, sample_common());
    }

    #[test]
    fn common_decode_checks_kind_before_fields() {
        let mut out = Vec::new();
        sample_common().encode_into(RecordKind::Service, &mut out);
        // Only the first 8 bytes are needed to detect the mismatch.
        let err =
            RecordCommon::decode(&mut ByteReader::new(&out[..8]), RecordKind::Activity).unwrap_err();
        assert!(matches!(
            err,
            CaptureError::TypeMismatch {
                expected: RecordKind::Activity,
                found: 2
            }
        ));
    }

    #[test]
    fn wire_offset_out_of_range_is_malformed() {
        let mut out = Vec::new();
        sample_common().encode_into(RecordKind::Activity, &mut out);
        out[4..6].copy_from_slice(&1000u16.to_be_bytes());
        let err = RecordCommon::decode(&mut ByteReader::new(&out), RecordKind::Activity).unwrap_err();
        assert!(matches!(err, CaptureError::MalformedRecord { .. }));
    }

    #[test]
    fn payload_size_mismatch_is_malformed() {
        let record = ActivityRecord::new().with_payload(Payload::new().with_action("a"));
        let mut bytes = record.encode();
        bytes.extend(record.payload().encode());
        // The payload size is the last fixed field.
        let at = ActivityRecord::FIXED_LEN - 4;
        bytes[at..at + 4].copy_from_slice(&5u32.to_be_bytes());
        let err = ActivityRecord::decode(&mut ByteReader::new(&bytes)).unwrap_err();
        assert!(matches!(err, CaptureError::MalformedRecord { .. }), "{err:?}");
    }

    #[test]
    fn dispatch_selects_variant() {
        let records: Vec<IntentRecord> = vec![
            ActivityRecord::new().into(),
            BroadcastRecord::new().into(),
            ServiceRecord::new().into(),
        ];
        for record in records {
            let mut bytes = record.encode();
            record.payload().encode_into(&mut bytes);
            let got = IntentRecord::decode(&mut ByteReader::new(&bytes)).unwrap();
            assert_eq!(got.kind(), record.kind());
            assert_eq!(got, record);
        }
    }

    #[test]
    fn dispatch_rejects_unknown_kind() {
        let record: IntentRecord = ServiceRecord::new().into();
        let mut bytes = record.encode();
        bytes[6..8].copy_from_slice(&3u16.to_be_bytes());
        let err = IntentRecord::decode(&mut ByteReader::new(&bytes)).unwrap_err();
        assert!(matches!(err, CaptureError::UnknownKind { found: 3 }));
    }

    #[test]
    fn enum_accessors_reach_variant_state() {
        let mut record: IntentRecord = BroadcastRecord::new()
            .with_common(sample_common())
            .with_receiver_component("r")
            .with_caller_component("c")
            .into();
        record.common_mut().set_user_id(7);
        record.payload_mut().set_action("x");
        assert_eq!(record.common().user_id(), 7);
        assert_eq!(record.payload().action(), b"x");
        assert_eq!(record.receiver_component(), b"r");
        assert_eq!(record.caller_component(), b"c");
        assert_eq!(record.encoded_len(), record.size() + 28 + 1);
    }
}
