//! The capture file container: one [`FileHeader`] and a record sequence.

use crate::codec::{put_u16, put_u32, put_u8, ByteReader};
use crate::config::{DecodeOptions, RecoveryPolicy};
use crate::error::CaptureError;
use crate::kind::KIND_PROBE_LEN;
use crate::record::IntentRecord;
use crate::{FORMAT_MAJOR_VERSION, FORMAT_MINOR_VERSION, MAGIC};

/// Encoded size of the file header.
pub const FILE_HEADER_LEN: usize = 12;

/// The fixed header at the start of every capture file.
///
/// Only the device version is stored: the magic number and the format
/// version are constants written on encode and checked on decode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FileHeader {
    device_major: u16,
    device_minor: u8,
    device_patch: u8,
}

impl FileHeader {
    /// A header for intents captured on Android `major.minor.patch`.
    pub fn new(device_major: u16, device_minor: u8, device_patch: u8) -> Self {
        Self {
            device_major,
            device_minor,
            device_patch,
        }
    }

    /// Android major version of the capturing device.
    pub fn device_major(&self) -> u16 {
        self.device_major
    }

    /// Android minor version of the capturing device.
    pub fn device_minor(&self) -> u8 {
        self.device_minor
    }

    /// Android patch version of the capturing device.
    pub fn device_patch(&self) -> u8 {
        self.device_patch
    }

    /// Format version written by this build, as `(major, minor)`.
    pub fn format_version(&self) -> (u16, u16) {
        (FORMAT_MAJOR_VERSION, FORMAT_MINOR_VERSION)
    }

    /// Append the 12 header bytes to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        put_u32(out, MAGIC);
        put_u16(out, FORMAT_MAJOR_VERSION);
        put_u16(out, FORMAT_MINOR_VERSION);
        put_u16(out, self.device_major);
        put_u8(out, self.device_minor);
        put_u8(out, self.device_patch);
    }

    /// Decode and validate a header: magic first, then format version.
    pub fn decode(r: &mut ByteReader<'_>) -> Result<Self, CaptureError> {
        let magic = r.read_u32("magic")?;
        if magic != MAGIC {
            return Err(CaptureError::MagicMismatch { found: magic });
        }

        let major = r.read_u16("format major version")?;
        let minor = r.read_u16("format minor version")?;
        if (major, minor) != (FORMAT_MAJOR_VERSION, FORMAT_MINOR_VERSION) {
            return Err(CaptureError::VersionMismatch { major, minor });
        }

        Ok(Self {
            device_major: r.read_u16("device major version")?,
            device_minor: r.read_u8("device minor version")?,
            device_patch: r.read_u8("device patch version")?,
        })
    }
}

/// Why the decode loop stopped before the end of the buffer.
#[derive(Debug)]
pub struct RecordFailure {
    /// Index the failing record would have had.
    pub index: usize,
    /// Byte offset of the failing record from the start of the buffer.
    pub offset: usize,
    /// The record-level error.
    pub error: CaptureError,
}

/// Result of [`CaptureFile::decode_detailed`].
#[derive(Debug)]
pub struct DecodeReport {
    /// The header and every record decoded before decoding stopped.
    pub file: CaptureFile,
    /// The record failure that ended decoding, if any.
    pub failure: Option<RecordFailure>,
    /// Bytes left unread: the failing record onwards, bytes past a
    /// `max_records` limit, or a tail too short to hold a record.
    pub trailing_bytes: usize,
}

impl DecodeReport {
    /// Whether the whole buffer was consumed without a record failure.
    pub fn is_complete(&self) -> bool {
        self.failure.is_none() && self.trailing_bytes == 0
    }
}

/// An in-memory capture session: a header and an ordered record list.
///
/// Records are kept in capture order. No ordering is enforced between
/// them; each one encodes and decodes independently.
///
/// # Examples
///
/// ```
/// use aics::{ActivityRecord, CaptureFile, FileHeader, Payload, ServiceRecord};
///
/// let mut file = CaptureFile::new(FileHeader::new(6, 0, 1));
/// file.push(ActivityRecord::new().with_payload(Payload::new().with_action("a")));
/// file.push(ServiceRecord::new().with_action("bind"));
///
/// let bytes = file.encode();
/// assert_eq!(bytes.len(), file.encoded_len());
///
/// let decoded = CaptureFile::decode(&bytes).unwrap();
/// assert_eq!(decoded, file);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CaptureFile {
    header: FileHeader,
    records: Vec<IntentRecord>,
}

impl CaptureFile {
    /// An empty capture with the given header.
    pub fn new(header: FileHeader) -> Self {
        Self {
            header,
            records: Vec::new(),
        }
    }

    /// The file header.
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    /// Append a record.
    pub fn push(&mut self, record: impl Into<IntentRecord>) {
        self.records.push(record.into());
    }

    /// The record at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&IntentRecord> {
        self.records.get(index)
    }

    /// Mutable access to the record at `index`, if any.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut IntentRecord> {
        self.records.get_mut(index)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the capture holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Remove every record. The header is kept.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Keep only the first `len` records.
    pub fn truncate(&mut self, len: usize) {
        self.records.truncate(len);
    }

    /// Records in capture order.
    pub fn records(&self) -> &[IntentRecord] {
        &self.records
    }

    /// Iterate over records in capture order.
    pub fn iter(&self) -> std::slice::Iter<'_, IntentRecord> {
        self.records.iter()
    }

    /// Consume the capture, returning its records.
    pub fn into_records(self) -> Vec<IntentRecord> {
        self.records
    }

    /// Total encoded size: header plus every record and payload.
    pub fn encoded_len(&self) -> usize {
        FILE_HEADER_LEN
            + self
                .records
                .iter()
                .map(IntentRecord::encoded_len)
                .sum::<usize>()
    }

    /// Encode the whole capture into one buffer allocated up front.
    pub fn encode(&self) -> Vec<u8> {
        let len = self.encoded_len();
        let mut out = Vec::with_capacity(len);
        self.header.encode_into(&mut out);
        for record in &self.records {
            record.encode_into(&mut out);
            record.payload().encode_into(&mut out);
        }
        debug_assert_eq!(out.len(), len);
        log::debug!(
            "encoded capture: {} records, {} bytes",
            self.records.len(),
            out.len()
        );
        out
    }

    /// Decode a capture with default options.
    ///
    /// Fails only on a bad header. A record that cannot be decoded ends the
    /// sequence: it and everything after it are dropped, and the records
    /// before it are returned.
    pub fn decode(buf: &[u8]) -> Result<Self, CaptureError> {
        Self::decode_with(buf, &DecodeOptions::default())
    }

    /// Decode a capture with explicit options.
    pub fn decode_with(buf: &[u8], opts: &DecodeOptions) -> Result<Self, CaptureError> {
        Self::decode_detailed(buf, opts).map(|report| report.file)
    }

    /// Decode a capture and report where and why decoding stopped.
    pub fn decode_detailed(buf: &[u8], opts: &DecodeOptions) -> Result<DecodeReport, CaptureError> {
        Self::decode_from(&mut ByteReader::new(buf), opts)
    }

    /// Decode a capture starting at the reader's position.
    ///
    /// The reader is returned to its starting position whatever the
    /// outcome, so the caller's view of the buffer never changes.
    pub fn decode_from(
        r: &mut ByteReader<'_>,
        opts: &DecodeOptions,
    ) -> Result<DecodeReport, CaptureError> {
        let start = r.position();
        let result = Self::decode_records(r, start, opts);
        r.set_position(start);
        result
    }

    fn decode_records(
        r: &mut ByteReader<'_>,
        start: usize,
        opts: &DecodeOptions,
    ) -> Result<DecodeReport, CaptureError> {
        let header = FileHeader::decode(r)?;
        let mut file = Self::new(header);
        let mut failure = None;
        let mut limited = false;

        while r.remaining() >= KIND_PROBE_LEN {
            if opts.max_records.is_some_and(|max| file.len() >= max) {
                limited = true;
                break;
            }

            let offset = r.position();
            match IntentRecord::decode(r) {
                Ok(record) => {
                    log::trace!(
                        "decoded {} record #{} at offset {}",
                        record.kind(),
                        file.len(),
                        offset - start
                    );
                    file.records.push(record);
                }
                Err(error) => {
                    r.set_position(offset);
                    if opts.recovery == RecoveryPolicy::Strict {
                        return Err(error);
                    }
                    log::warn!(
                        "dropping capture records from #{} (offset {}): {error}",
                        file.len(),
                        offset - start
                    );
                    failure = Some(RecordFailure {
                        index: file.len(),
                        offset: offset - start,
                        error,
                    });
                    break;
                }
            }
        }

        let trailing_bytes = r.remaining();
        if failure.is_none() && !limited && trailing_bytes > 0 {
            if opts.recovery == RecoveryPolicy::Strict {
                return Err(CaptureError::TruncatedInput {
                    field: "record",
                    needed: KIND_PROBE_LEN,
                    available: trailing_bytes,
                });
            }
            log::warn!("ignoring {trailing_bytes} trailing bytes too short to hold a record");
        }

        log::debug!(
            "decoded capture: {} records, {} trailing bytes",
            file.len(),
            trailing_bytes
        );
        Ok(DecodeReport {
            file,
            failure,
            trailing_bytes,
        })
    }
}

impl<'a> IntoIterator for &'a CaptureFile {
    type Item = &'a IntentRecord;
    type IntoIter = std::slice::Iter<'a, IntentRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl Extend<IntentRecord> for CaptureFile {
    fn extend<I: IntoIterator<Item = IntentRecord>>(&mut self, iter: I) {
        self.records.extend(iter);
    }
}
