use super::{decode_tail, FieldNames, RecordCommon, RecordFormat, Tail};
use crate::codec::{put_i32, ByteReader};
use crate::error::CaptureError;
use crate::kind::RecordKind;
use crate::payload::Payload;

const FIELD_NAMES: FieldNames = [
    ("receiver component length", "receiver component"),
    ("caller component length", "caller component"),
    ("service action length", "service action"),
];

/// A captured service start or bind.
///
/// Carries one kind-specific integer fewer than the other kinds, so its
/// fixed part is 48 bytes instead of 52.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ServiceRecord {
    common: RecordCommon,
    flags: i32,
    receiver_component: Vec<u8>,
    caller_component: Vec<u8>,
    action: Vec<u8>,
    payload: Payload,
}

impl ServiceRecord {
    /// A service record with every field zeroed or absent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start or bind flags.
    pub fn flags(&self) -> i32 {
        self.flags
    }

    /// Service the intent was resolved to.
    pub fn receiver_component(&self) -> &[u8] {
        &self.receiver_component
    }

    /// Component that started or bound the service.
    pub fn caller_component(&self) -> &[u8] {
        &self.caller_component
    }

    /// How the service was reached (start, bind, ...), as recorded by the
    /// capturing hook.
    pub fn action(&self) -> &[u8] {
        &self.action
    }

    /// Replace the common prefix.
    pub fn with_common(mut self, common: RecordCommon) -> Self {
        self.common = common;
        self
    }

    /// Replace the payload.
    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    /// Builder form of [`set_flags`](Self::set_flags).
    pub fn with_flags(mut self, flags: i32) -> Self {
        self.flags = flags;
        self
    }

    /// Builder form of [`set_receiver_component`](Self::set_receiver_component).
    pub fn with_receiver_component(mut self, component: impl Into<Vec<u8>>) -> Self {
        self.receiver_component = component.into();
        self
    }

    /// Builder form of [`set_caller_component`](Self::set_caller_component).
    pub fn with_caller_component(mut self, component: impl Into<Vec<u8>>) -> Self {
        self.caller_component = component.into();
        self
    }

    /// Builder form of [`set_action`](Self::set_action).
    pub fn with_action(mut self, action: impl Into<Vec<u8>>) -> Self {
        self.action = action.into();
        self
    }

    /// Replace the flags.
    pub fn set_flags(&mut self, flags: i32) {
        self.flags = flags;
    }

    /// Replace the receiver component. An empty value means "absent".
    pub fn set_receiver_component(&mut self, component: impl Into<Vec<u8>>) {
        self.receiver_component = component.into();
    }

    /// Replace the caller component. An empty value means "absent".
    pub fn set_caller_component(&mut self, component: impl Into<Vec<u8>>) {
        self.caller_component = component.into();
    }

    /// Replace the action. An empty value means "absent".
    pub fn set_action(&mut self, action: impl Into<Vec<u8>>) {
        self.action = action.into();
    }
}

impl RecordFormat for ServiceRecord {
    const KIND: RecordKind = RecordKind::Service;
    const FIXED_LEN: usize = 4 * 12;

    fn common(&self) -> &RecordCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut RecordCommon {
        &mut self.common
    }

    fn payload(&self) -> &Payload {
        &self.payload
    }

    fn payload_mut(&mut self) -> &mut Payload {
        &mut self.payload
    }

    fn variable_fields(&self) -> [&[u8]; 3] {
        [
            self.receiver_component.as_slice(),
            self.caller_component.as_slice(),
            self.action.as_slice(),
        ]
    }

    fn encode_kind_fields(&self, out: &mut Vec<u8>) {
        put_i32(out, self.flags);
    }

    fn decode(r: &mut ByteReader<'_>) -> Result<Self, CaptureError> {
        let common = RecordCommon::decode(r, Self::KIND)?;
        let flags = r.read_i32("service flags")?;
        let Tail {
            fields: [receiver_component, caller_component, action],
            payload,
        } = decode_tail(r, &FIELD_NAMES)?;

        Ok(Self {
            common,
            flags,
            receiver_component,
            caller_component,
            action,
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ServiceRecord {
        ServiceRecord::new()
            .with_common(
                RecordCommon::new()
                    .with_timestamp(1_500_000_000)
                    .with_offset_millis(999)
                    .unwrap()
                    .with_caller(10_123, 900)
                    .with_receiver(10_124, 901),
            )
            .with_flags(1)
            .with_receiver_component("com.example/.SyncService")
            .with_caller_component("com.example/.MainActivity")
            .with_action("bind")
            .with_payload(Payload::new().with_category("android.intent.category.DEFAULT"))
    }

    #[test]
    fn size_is_fixed_plus_fields() {
        let r = sample();
        assert_eq!(ServiceRecord::new().size(), 48);
        assert_eq!(r.size(), 48 + 24 + 25 + 4);
        assert_eq!(r.encode().len(), r.size());
    }

    #[test]
    fn layout_has_single_kind_field() {
        let bytes = sample().encode();
        assert_eq!(&bytes[6..8], &[0, 2]);
        assert_eq!(&bytes[28..32], &1i32.to_be_bytes());
        assert_eq!(&bytes[32..36], &24u32.to_be_bytes());
        assert_eq!(&bytes[40..44], &4u32.to_be_bytes());
        assert_eq!(&bytes[48..72], b"com.example/.SyncService");
    }

    #[test]
    fn roundtrip() {
        let r = sample();
        let mut bytes = r.encode();
        r.payload().encode_into(&mut bytes);
        let mut reader = ByteReader::new(&bytes);
        let got = ServiceRecord::decode(&mut reader).unwrap();
        assert_eq!(reader.remaining(), 0);
        assert_eq!(got, r);
        assert_eq!(got.action(), b"bind");
        assert_eq!(got.common().offset_millis(), 999);
    }

    #[test]
    fn setters_update_size() {
        let mut r = sample();
        r.set_action("start");
        r.set_caller_component(Vec::new());
        r.set_receiver_component("s");
        r.set_flags(2);
        assert_eq!(r.size(), 48 + 1 + 5);
        assert_eq!(r.flags(), 2);
        assert!(r.caller_component().is_empty());
    }

    #[test]
    fn empty_record_roundtrips() {
        let r = ServiceRecord::new();
        let mut bytes = r.encode();
        r.payload().encode_into(&mut bytes);
        assert_eq!(bytes.len(), 48 + 28);
        let got = ServiceRecord::decode(&mut ByteReader::new(&bytes)).unwrap();
        assert_eq!(got, r);
    }
}
