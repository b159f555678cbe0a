//! Test utilities for AICS codec development.
//!
//! Provides sample records of each kind (see [`fixtures`]), a
//! deterministic capture generator for larger inputs, and helpers for
//! locating record boundaries inside an encoded capture.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{
    sample_activity, sample_broadcast, sample_common, sample_payload, sample_service,
};

use aics::{
    ActivityRecord, BroadcastRecord, CaptureFile, FileHeader, IntentRecord, Payload, RecordCommon,
    ServiceRecord, FILE_HEADER_LEN,
};

/// Device version stamped on generated captures (Android 6.0.1).
pub const SAMPLE_DEVICE: (u16, u8, u8) = (6, 0, 1);

/// A capture holding one sample record of each kind, in kind order.
pub fn sample_capture() -> CaptureFile {
    let (major, minor, patch) = SAMPLE_DEVICE;
    let mut file = CaptureFile::new(FileHeader::new(major, minor, patch));
    file.push(sample_activity());
    file.push(sample_broadcast());
    file.push(sample_service());
    file
}

/// Byte offsets at which each record (payload included) ends in the
/// encoding of `file`.
///
/// A buffer cut at `ends[i]` holds exactly `i + 1` whole records.
pub fn record_ends(file: &CaptureFile) -> Vec<usize> {
    let mut end = FILE_HEADER_LEN;
    file.iter()
        .map(|record| {
            end += record.encoded_len();
            end
        })
        .collect()
}

/// Deterministic pseudo-random capture generator.
///
/// Uses a 64-bit LCG so the same seed always yields the same capture,
/// byte for byte, without pulling in an RNG.
pub struct CaptureGenerator {
    state: u64,
    timestamp: u32,
}

impl CaptureGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed,
            timestamp: 1_460_000_000,
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    fn next_i32(&mut self) -> i32 {
        (self.next_u64() >> 32) as i32
    }

    fn below(&mut self, n: u64) -> u64 {
        (self.next_u64() >> 33) % n
    }

    /// Printable text of up to `max_len` bytes; empty about a quarter of
    /// the time so absent fields are covered.
    fn text(&mut self, max_len: u64) -> Vec<u8> {
        if self.below(4) == 0 {
            return Vec::new();
        }
        let len = 1 + self.below(max_len);
        (0..len).map(|_| b'a' + self.below(26) as u8).collect()
    }

    fn blob(&mut self, max_len: u64) -> Vec<u8> {
        let len = self.below(max_len + 1);
        (0..len).map(|_| self.next_u64() as u8).collect()
    }

    fn common(&mut self) -> RecordCommon {
        self.timestamp += self.below(3) as u32;
        let mut common = RecordCommon::new()
            .with_timestamp(self.timestamp)
            .with_caller(self.next_i32(), self.next_i32())
            .with_receiver(self.next_i32(), self.next_i32())
            .with_user_id(self.next_i32());
        // below(1000) is always a valid offset.
        let _ = common.set_offset_millis(self.below(1000) as i32);
        common
    }

    pub fn payload(&mut self) -> Payload {
        Payload::new()
            .with_flags(self.next_i32())
            .with_action(self.text(40))
            .with_data(self.text(60))
            .with_category(self.text(40))
            .with_mime_type(self.text(20))
            .with_clip_data(self.blob(32))
            .with_extras(self.blob(64))
    }

    /// One record of a randomly chosen kind.
    pub fn record(&mut self) -> IntentRecord {
        let common = self.common();
        match self.below(3) {
            0 => ActivityRecord::new()
                .with_common(common)
                .with_request_code(self.next_i32())
                .with_start_flags(self.next_i32())
                .with_receiver_component(self.text(48))
                .with_caller_component(self.text(48))
                .with_options(self.blob(24))
                .with_payload(self.payload())
                .into(),
            1 => BroadcastRecord::new()
                .with_common(common)
                .with_request_code(self.next_i32())
                .with_flags(self.next_i32())
                .with_receiver_component(self.text(48))
                .with_caller_component(self.text(48))
                .with_required_permission(self.text(48))
                .with_payload(self.payload())
                .into(),
            _ => ServiceRecord::new()
                .with_common(common)
                .with_flags(self.next_i32())
                .with_receiver_component(self.text(48))
                .with_caller_component(self.text(48))
                .with_action(self.text(16))
                .with_payload(self.payload())
                .into(),
        }
    }

    /// A capture of `count` records with monotonic timestamps.
    pub fn capture(&mut self, count: usize) -> CaptureFile {
        let (major, minor, patch) = SAMPLE_DEVICE;
        let mut file = CaptureFile::new(FileHeader::new(major, minor, patch));
        for _ in 0..count {
            file.push(self.record());
        }
        file
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_is_deterministic() {
        let a = CaptureGenerator::new(42).capture(20).encode();
        let b = CaptureGenerator::new(42).capture(20).encode();
        let c = CaptureGenerator::new(43).capture(20).encode();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn generator_covers_every_kind() {
        let file = CaptureGenerator::new(7).capture(60);
        for kind in aics::RecordKind::ALL {
            assert!(file.iter().any(|r| r.kind() == kind), "no {kind} record");
        }
    }

    #[test]
    fn record_ends_match_encoding() {
        let file = sample_capture();
        let ends = record_ends(&file);
        assert_eq!(ends.len(), 3);
        assert_eq!(*ends.last().unwrap(), file.encode().len());
    }
}
