//! Version-checked recorder stream reader.

use crate::error::{RecorderError, RecorderResult};
use crate::frame::{RecorderFrame, INTERFACE_VERSION};
use byteorder::{LittleEndian, ReadBytesExt};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Streaming reader over a recorder file.
pub struct FrameReader {
    input: Box<dyn Read>,
    version: u64,
}

impl FrameReader {
    /// Open a recorder file and read its version prefix. With `compressed`
    /// the stream is gzip-decoded first.
    ///
    /// The version is NOT validated here so that tooling can inspect
    /// mismatched files; call [`FrameReader::check_version`] before decoding
    /// frames.
    pub fn open(path: &Path, compressed: bool) -> RecorderResult<Self> {
        let file = File::open(path)?;
        let mut input: Box<dyn Read> = if compressed {
            Box::new(BufReader::new(GzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };
        let version = input.read_u64::<LittleEndian>()?;
        Ok(Self { input, version })
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Hard error on any version difference; no compatibility attempted.
    pub fn check_version(&self) -> RecorderResult<()> {
        if self.version != INTERFACE_VERSION {
            return Err(RecorderError::VersionMismatch {
                expected: INTERFACE_VERSION,
                got: self.version,
            });
        }
        Ok(())
    }

    /// Next frame, or `None` at a clean end of stream.
    pub fn next_frame(&mut self) -> RecorderResult<Option<RecorderFrame>> {
        RecorderFrame::read_from(&mut self.input)
    }
}
