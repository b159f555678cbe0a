use super::{decode_tail, FieldNames, RecordCommon, RecordFormat, Tail};
use crate::codec::{put_i32, ByteReader};
use crate::error::CaptureError;
use crate::kind::RecordKind;
use crate::payload::Payload;

const FIELD_NAMES: FieldNames = [
    ("receiver component length", "receiver component"),
    ("caller component length", "caller component"),
    ("options length", "options"),
];

/// A captured activity launch.
///
/// Adds the request code and start flags passed to `startActivity`, the
/// receiving and calling components, and the serialized activity options.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ActivityRecord {
    common: RecordCommon,
    request_code: i32,
    start_flags: i32,
    receiver_component: Vec<u8>,
    caller_component: Vec<u8>,
    options: Vec<u8>,
    payload: Payload,
}

impl ActivityRecord {
    /// An activity record with every field zeroed or absent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request code passed by the caller.
    pub fn request_code(&self) -> i32 {
        self.request_code
    }

    /// Start flags.
    pub fn start_flags(&self) -> i32 {
        self.start_flags
    }

    /// Component the activity was resolved to.
    pub fn receiver_component(&self) -> &[u8] {
        &self.receiver_component
    }

    /// Component that started the activity.
    pub fn caller_component(&self) -> &[u8] {
        &self.caller_component
    }

    /// Serialized activity options.
    pub fn options(&self) -> &[u8] {
        &self.options
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

    /// Builder form of [`set_start_flags`](Self::set_start_flags).
    pub fn with_start_flags(mut self, start_flags: i32) -> Self {
        self.start_flags = start_flags;
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

    /// Builder form of [`set_options`](Self::set_options).
    pub fn with_options(mut self, options: impl Into<Vec<u8>>) -> Self {
        self.options = options.into();
        self
    }

    /// Replace the request code.
    pub fn set_request_code(&mut self, request_code: i32) {
        self.request_code = request_code;
    }

    /// Replace the start flags.
    pub fn set_start_flags(&mut self, start_flags: i32) {
        self.start_flags = start_flags;
    }

    /// Replace the receiver component. An empty value means "absent".
    pub fn set_receiver_component(&mut self, component: impl Into<Vec<u8>>) {
        self.receiver_component = component.into();
    }

    /// Replace the caller component. An empty value means "absent".
    pub fn set_caller_component(&mut self, component: impl Into<Vec<u8>>) {
        self.caller_component = component.into();
    }

    /// Replace the options blob. An empty value means "absent".
    pub fn set_options(&mut self, options: impl Into<Vec<u8>>) {
        self.options = options.into();
    }
}

impl RecordFormat for ActivityRecord {
    const KIND: RecordKind = RecordKind::Activity;
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
            self.options.as_slice(),
        ]
    }

    fn encode_kind_fields(&self, out: &mut Vec<u8>) {
        put_i32(out, self.request_code);
        put_i32(out, self.start_flags);
    }

    fn decode(r: &mut ByteReader<'_>) -> Result<Self, CaptureError> {
        let common = RecordCommon::decode(r, Self::KIND)?;
        let request_code = r.read_i32("request code")?;
        let start_flags = r.read_i32("start flags")?;
        let Tail {
            fields: [receiver_component, caller_component, options],
            payload,
        } = decode_tail(r, &FIELD_NAMES)?;

        Ok(Self {
            common,
            request_code,
            start_flags,
            receiver_component,
            caller_component,
            options,
            payload,
        })
    }
}
