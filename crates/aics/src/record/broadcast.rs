use super::{decode_tail, FieldNames, RecordCommon, RecordFormat, Tail};
use crate::codec::{put_i32, ByteReader};
use crate::error::CaptureError;
use crate::kind::RecordKind;
use crate::payload::Payload;

const FIELD_NAMES: FieldNames = [
    ("receiver component length", "receiver component"),
    ("caller component length", "caller component"),
    ("required permission length", "required permission"),
];

/// A captured broadcast delivery to one receiver.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BroadcastRecord {
    common: RecordCommon,
    request_code: i32,
    flags: i32,
    receiver_component: Vec<u8>,
    caller_component: Vec<u8>,
    required_permission: Vec<u8>,
    payload: Payload,
}

impl BroadcastRecord {
    /// A broadcast record with every field zeroed or absent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request code of the delivery.
    pub fn request_code(&self) -> i32 {
        self.request_code
    }

    /// Delivery flags.
    pub fn flags(&self) -> i32 {
        self.flags
    }

    /// Receiver the broadcast was delivered to.
    pub fn receiver_component(&self) -> &[u8] {
        &self.receiver_component
    }

    /// Component that sent the broadcast.
    pub fn caller_component(&self) -> &[u8] {
        &self.caller_component
    }

    /// Permission the receiver had to hold.
    pub fn required_permission(&self) -> &[u8] {
        &self.required_permission
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

    /// Builder form of [`set_request_code`](Self::set_request_code).
    pub fn with_request_code(mut self, request_code: i32) -> Self {
        self.request_code = request_code;
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

    /// Builder form of [`set_required_permission`](Self::set_required_permission).
    pub fn with_required_permission(mut self, permission: impl Into<Vec<u8>>) -> Self {
        self.required_permission = permission.into();
        self
    }

    /// Replace the request code.
    pub fn set_request_code(&mut self, request_code: i32) {
        self.request_code = request_code;
    }

    /// Replace the delivery flags.
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

    /// Replace the required permission. An empty value means "absent".
    pub fn set_required_permission(&mut self, permission: impl Into<Vec<u8>>) {
        self.required_permission = permission.into();
    }
}

impl RecordFormat for BroadcastRecord {
    const KIND: RecordKind = RecordKind::Broadcast;
    const FIXED_LEN: usize = 4 * 13;

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
            self.required_permission.as_slice(),
        ]
    }

    fn encode_kind_fields(&self, out: &mut Vec<u8>) {
        put_i32(out, self.request_code);
        put_i32(out, self.flags);
    }

    fn decode(r: &mut ByteReader<'_>) -> Result<Self, CaptureError> {
        let common = RecordCommon::decode(r, Self::KIND)?;
        let request_code = r.read_i32("request code")?;
        let flags = r.read_i32("broadcast flags")?;
        let Tail {
            fields: [receiver_component, caller_component, required_permission],
            payload,
        } = decode_tail(r, &FIELD_NAMES)?;

        Ok(Self {
            common,
            request_code,
            flags,
            receiver_component,
            caller_component,
            required_permission,
            payload,
        })
    }
}
