//! The intent payload block attached to every record.

use crate::codec::{put_body, put_i32, put_len, ByteReader};
use crate::error::CaptureError;

/// Bytes taken by the payload's fixed part: flags plus six lengths.
pub const PAYLOAD_FIXED_LEN: usize = 4 * 7;

/// The data carried by a captured intent.
///
/// Every text field is stored as opaque bytes: the format declares no
/// charset, so only byte-for-byte reproduction is guaranteed. An empty
/// field is written as length 0 and means "absent". Use [`crate::text`] to
/// view a field as `&str`.
///
/// # Examples
///
/// ```
/// use aics::Payload;
///
/// let payload = Payload::new()
///     .with_action("android.intent.action.VIEW")
///     .with_data("https://example.org")
///     .with_flags(0x1000_0000);
///
/// let bytes = payload.encode();
/// assert_eq!(bytes.len(), payload.size());
/// assert_eq!(payload.size(), 28 + 26 + 19);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Payload {
    flags: i32,
    action: Vec<u8>,
    data: Vec<u8>,
    category: Vec<u8>,
    mime_type: Vec<u8>,
    clip_data: Vec<u8>,
    extras: Vec<u8>,
}

impl Payload {
    /// An empty payload: zero flags, every field absent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Intent flags.
    pub fn flags(&self) -> i32 {
        self.flags
    }

    /// Intent action, e.g. `android.intent.action.MAIN`.
    pub fn action(&self) -> &[u8] {
        &self.action
    }

    /// Data URI.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Intent category.
    pub fn category(&self) -> &[u8] {
        &self.category
    }

    /// MIME type of the data.
    pub fn mime_type(&self) -> &[u8] {
        &self.mime_type
    }

    /// Serialized clip data.
    pub fn clip_data(&self) -> &[u8] {
        &self.clip_data
    }

    /// Serialized extras bundle.
    pub fn extras(&self) -> &[u8] {
        &self.extras
    }

    /// Builder form of [`set_flags`](Self::set_flags).
    pub fn with_flags(mut self, flags: i32) -> Self {
        self.flags = flags;
        self
    }

    /// Builder form of [`set_action`](Self::set_action).
    pub fn with_action(mut self, action: impl Into<Vec<u8>>) -> Self {
        self.action = action.into();
        self
    }

    /// Builder form of [`set_data`](Self::set_data).
    pub fn with_data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.data = data.into();
        self
    }

    /// Builder form of [`set_category`](Self::set_category).
    pub fn with_category(mut self, category: impl Into<Vec<u8>>) -> Self {
        self.category = category.into();
        self
    }

    /// Builder form of [`set_mime_type`](Self::set_mime_type).
    pub fn with_mime_type(mut self, mime_type: impl Into<Vec<u8>>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    /// Builder form of [`set_clip_data`](Self::set_clip_data).
    pub fn with_clip_data(mut self, clip_data: impl Into<Vec<u8>>) -> Self {
        self.clip_data = clip_data.into();
        self
    }

    /// Builder form of [`set_extras`](Self::set_extras).
    pub fn with_extras(mut self, extras: impl Into<Vec<u8>>) -> Self {
        self.extras = extras.into();
        self
    }

    /// Replace the intent flags.
    pub fn set_flags(&mut self, flags: i32) {
        self.flags = flags;
    }

    /// Replace the action.
    pub fn set_action(&mut self, action: impl Into<Vec<u8>>) {
        self.action = action.into();
    }

    /// Replace the data URI.
    pub fn set_data(&mut self, data: impl Into<Vec<u8>>) {
        self.data = data.into();
    }

    /// Replace the category.
    pub fn set_category(&mut self, category: impl Into<Vec<u8>>) {
        self.category = category.into();
    }

    /// Replace the MIME type.
    pub fn set_mime_type(&mut self, mime_type: impl Into<Vec<u8>>) {
        self.mime_type = mime_type.into();
    }

    /// Replace the clip data.
    pub fn set_clip_data(&mut self, clip_data: impl Into<Vec<u8>>) {
        self.clip_data = clip_data.into();
    }

    /// Replace the extras.
    pub fn set_extras(&mut self, extras: impl Into<Vec<u8>>) {
        self.extras = extras.into();
    }

    /// The six variable fields in wire order.
    fn fields(&self) -> [&[u8]; 6] {
        [
            self.action.as_slice(),
            self.data.as_slice(),
            self.category.as_slice(),
            self.mime_type.as_slice(),
            self.clip_data.as_slice(),
            self.extras.as_slice(),
        ]
    }

    /// Encoded size in bytes.
    pub fn size(&self) -> usize {
        PAYLOAD_FIXED_LEN + self.fields().iter().map(|f| f.len()).sum::<usize>()
    }

    /// Append the encoded payload to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        put_i32(out, self.flags);
        let fields = self.fields();
        for field in fields {
            put_len(out, field);
        }
        for field in fields {
            put_body(out, field);
        }
    }

    /// Encode into a fresh buffer of exactly [`size`](Self::size) bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size());
        self.encode_into(&mut out);
        out
    }

    /// Decode a payload starting at the reader's position.
    ///
    /// On error the reader may have advanced past the fields it did read;
    /// callers that need the old position must save it first.
    pub fn decode(r: &mut ByteReader<'_>) -> Result<Self, CaptureError> {
        let flags = r.read_i32("payload flags")?;
        let action_len = r.read_u32("payload action length")?;
        let data_len = r.read_u32("payload data length")?;
        let category_len = r.read_u32("payload category length")?;
        let mime_type_len = r.read_u32("payload type length")?;
        let clip_data_len = r.read_u32("payload clip data length")?;
        let extras_len = r.read_u32("payload extras length")?;

        Ok(Self {
            flags,
            action: r.read_body(action_len, "payload action")?,
            data: r.read_body(data_len, "payload data")?,
            category: r.read_body(category_len, "payload category")?,
            mime_type: r.read_body(mime_type_len, "payload type")?,
            clip_data: r.read_body(clip_data_len, "payload clip data")?,
            extras: r.read_body(extras_len, "payload extras")?,
        })
    }
}
