//! Big-endian primitives shared by every component of the format.
//!
//! All integers are big-endian. Variable fields are a `u32` length followed
//! by that many raw bytes, a zero length meaning "absent". There is no
//! alignment padding and no self-describing schema.
//!
//! Writers append to a `Vec<u8>` the caller pre-sized, so encoding never
//! fails. Reads go through [`ByteReader`], a cursor over a borrowed buffer
//! that reports [`CaptureError::TruncatedInput`] instead of reading past
//! the end.

use crate::error::CaptureError;

// ── Primitive writers ───────────────────────────────────────────

/// Write a single byte.
pub fn put_u8(out: &mut Vec<u8>, v: u8) {
    out.push(v);
}

/// Write a big-endian u16.
pub fn put_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_be_bytes());
}

/// Write a big-endian u32.
pub fn put_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_be_bytes());
}

/// Write a big-endian i32.
pub fn put_i32(out: &mut Vec<u8>, v: i32) {
    out.extend_from_slice(&v.to_be_bytes());
}

/// Write the `u32` length of a variable field.
///
/// Lengths and bodies are written in separate passes: every length of a
/// block comes first, then every body in the same order.
pub fn put_len(out: &mut Vec<u8>, field: &[u8]) {
    put_u32(out, field.len() as u32);
}

/// Write the raw body of a variable field (nothing for an absent field).
pub fn put_body(out: &mut Vec<u8>, field: &[u8]) {
    out.extend_from_slice(field);
}

// ── Reader ──────────────────────────────────────────────────────

/// A read cursor over an in-memory buffer.
///
/// The position only moves forward on successful reads; a failed read
/// leaves it where it was. [`ByteReader::set_position`] lets a caller
/// rewind after speculative decoding.
///
/// # Examples
///
/// ```
/// use aics::codec::ByteReader;
///
/// let data = [0x00, 0x01, 0xA1, 0xB2, 0xC3, 0xD4];
/// let mut r = ByteReader::new(&data);
/// assert_eq!(r.read_u16("word").unwrap(), 1);
/// assert_eq!(r.read_u32("magic").unwrap(), 0xA1B2_C3D4);
/// assert_eq!(r.remaining(), 0);
/// assert!(r.read_u8("extra").is_err());
/// ```
#[derive(Clone, Debug)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a reader positioned at the start of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current byte offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Move the cursor to `pos`, clamped to the buffer length.
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.buf.len());
    }

    /// Bytes left between the cursor and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// The unread tail of the buffer.
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    /// Borrow `len` bytes starting `offset` bytes past the cursor, without
    /// moving it.
    pub fn peek_at(
        &self,
        offset: usize,
        len: usize,
        field: &'static str,
    ) -> Result<&'a [u8], CaptureError> {
        let rest = self.rest();
        match offset.checked_add(len) {
            Some(end) if end <= rest.len() => Ok(&rest[offset..end]),
            _ => Err(CaptureError::TruncatedInput {
                field,
                needed: offset.saturating_add(len),
                available: rest.len(),
            }),
        }
    }

    /// Read a big-endian u16 located `offset` bytes past the cursor,
    /// without moving it.
    pub fn peek_u16_at(&self, offset: usize, field: &'static str) -> Result<u16, CaptureError> {
        let b = self.peek_at(offset, 2, field)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    /// Consume exactly `len` bytes.
    pub fn take(&mut self, len: usize, field: &'static str) -> Result<&'a [u8], CaptureError> {
        let bytes = self.peek_at(0, len, field)?;
        self.pos += len;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], CaptureError> {
        let bytes = self.take(N, field)?;
        let mut arr = [0u8; N];
        arr.copy_from_slice(bytes);
        Ok(arr)
    }

    /// Read a single byte.
    pub fn read_u8(&mut self, field: &'static str) -> Result<u8, CaptureError> {
        Ok(self.take_array::<1>(field)?[0])
    }

    /// Read a big-endian u16.
    pub fn read_u16(&mut self, field: &'static str) -> Result<u16, CaptureError> {
        self.take_array(field).map(u16::from_be_bytes)
    }

    /// Read a big-endian u32.
    pub fn read_u32(&mut self, field: &'static str) -> Result<u32, CaptureError> {
        self.take_array(field).map(u32::from_be_bytes)
    }

    /// Read a big-endian i32.
    pub fn read_i32(&mut self, field: &'static str) -> Result<i32, CaptureError> {
        self.take_array(field).map(i32::from_be_bytes)
    }

    /// Read the body of a variable field whose length was read earlier.
    ///
    /// The length is checked against the remaining bytes before anything
    /// is allocated, so a corrupt length cannot trigger a huge allocation.
    pub fn read_body(&mut self, len: u32, field: &'static str) -> Result<Vec<u8>, CaptureError> {
        if len == 0 {
            return Ok(Vec::new());
        }
        Ok(self.take(len as usize, field)?.to_vec())
    }
}
