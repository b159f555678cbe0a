//! Benchmark profiles for the AICS capture codec.
//!
//! - [`reference_capture`]: 1K mixed records, a typical short session
//! - [`stress_capture`]: 100K mixed records for throughput runs
//! - [`encoded`]: a profile pre-encoded for decode benchmarks

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use aics::CaptureFile;
use aics_test_utils::CaptureGenerator;

/// Build a reference capture: 1,000 records of mixed kinds.
pub fn reference_capture(seed: u64) -> CaptureFile {
    CaptureGenerator::new(seed).capture(1_000)
}

/// Build a stress capture: 100,000 records of mixed kinds.
pub fn stress_capture(seed: u64) -> CaptureFile {
    CaptureGenerator::new(seed).capture(100_000)
}

/// Encode `file` once so decode benchmarks measure decoding only.
pub fn encoded(file: &CaptureFile) -> Vec<u8> {
    file.encode()
}
