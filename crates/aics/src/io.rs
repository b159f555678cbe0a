//! Thin I/O wrappers around the in-memory codec.
//!
//! The codec never streams: these helpers read the whole source into
//! memory before decoding and encode the whole capture before writing.
//! Generic over `Read`/`Write` so tests can use `&[u8]` and `Vec<u8>` and
//! production code can use files.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use crate::error::CaptureError;
use crate::file::CaptureFile;

impl CaptureFile {
    /// Read `reader` to the end and decode it with default options.
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self, CaptureError> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Self::decode(&buf)
    }

    /// Encode the capture and write it to `writer`, then flush.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), CaptureError> {
        writer.write_all(&self.encode())?;
        writer.flush()?;
        Ok(())
    }

    /// Read and decode the capture file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CaptureError> {
        let path = path.as_ref();
        log::debug!("reading capture from {}", path.display());
        Self::read_from(File::open(path)?)
    }

    /// Encode the capture into a new file at `path`, replacing any
    /// existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CaptureError> {
        let path = path.as_ref();
        log::debug!("writing capture to {}", path.display());
        self.write_to(BufWriter::new(File::create(path)?))
    }
}
