//! Codec for AICS (Android Intent Capture Session) files.
//!
//! A capture file logs Android inter-process intents (activity launches,
//! broadcasts, service starts) in a compact big-endian binary format.
//! This crate encodes and decodes whole in-memory buffers; the I/O
//! helpers in [`io`] only move bytes in and out.
//!
//! # Architecture
//!
//! - [`Payload`] is the intent data carried by every record
//! - [`ActivityRecord`], [`BroadcastRecord`], [`ServiceRecord`] share a
//!   [`RecordCommon`] prefix and the [`RecordFormat`] framing
//! - [`IntentRecord`] is the sum of the three, dispatched with
//!   [`peek_kind`]
//! - [`CaptureFile`] holds a [`FileHeader`] and the record sequence and
//!   recovers the valid prefix of a damaged buffer
//!
//! # Format
//!
//! ```text
//! [MAGIC 0xA1B2C3D4] [format 0.1] [device major.minor.patch]
//! [Record 1 + Payload 1] [Record 2 + Payload 2] ... [Record N + Payload N]
//! ```
//!
//! Text fields carry no charset and are kept as raw bytes; [`text`] views
//! one as `&str` when it is valid UTF-8.

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod config;
pub mod error;
pub mod file;
pub mod io;
pub mod kind;
pub mod payload;
pub mod record;

pub use config::{DecodeOptions, RecoveryPolicy};
pub use error::CaptureError;
pub use file::{CaptureFile, DecodeReport, FileHeader, RecordFailure, FILE_HEADER_LEN};
pub use kind::{peek_kind, RecordKind};
pub use payload::{Payload, PAYLOAD_FIXED_LEN};
pub use record::{
    ActivityRecord, BroadcastRecord, IntentRecord, RecordCommon, RecordFormat, ServiceRecord,
};

/// Magic number at the start of every capture file.
pub const MAGIC: u32 = 0xA1B2_C3D4;

/// [`MAGIC`] as read from a file written in little-endian order.
pub const MAGIC_SWAPPED: u32 = MAGIC.swap_bytes();

/// Format major version written and accepted by this build.
pub const FORMAT_MAJOR_VERSION: u16 = 0;

/// Format minor version written and accepted by this build.
pub const FORMAT_MINOR_VERSION: u16 = 1;

/// View a text field as `&str`.
///
/// Returns `None` for an absent (empty) field or one that is not valid
/// UTF-8.
///
/// # Examples
///
/// ```
/// assert_eq!(aics::text(b"android.intent.action.MAIN"), Some("android.intent.action.MAIN"));
/// assert_eq!(aics::text(b""), None);
/// assert_eq!(aics::text(&[0xFF]), None);
/// ```
pub fn text(field: &[u8]) -> Option<&str> {
    if field.is_empty() {
        return None;
    }
    std::str::from_utf8(field).ok()
}
