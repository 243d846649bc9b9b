//! Flight data recorder: versioned fixed-layout binary frames, gzip
//! streams, file rotation and delimited-text conversion.
//!
//! The wire format is a `u64` interface version followed by back-to-back
//! frames, each the little-endian concatenation of five fixed-size blocks
//! (autopilot state machine, autopilot laws, autothrust, engine, additional
//! data). The layout is encoded explicitly field by field — never via a
//! compiler-defined struct layout — so the format is stable across builds.
//! A version mismatch between a file and this reader is a hard error; no
//! forward or backward compatibility is attempted.

pub mod convert;
pub mod error;
pub mod frame;
pub mod reader;
pub mod writer;

pub use convert::{write_csv_header, write_csv_row};
pub use error::{RecorderError, RecorderResult};
pub use frame::{
    AdditionalBlock, ApLawsBlock, ApStateMachineBlock, AthrBlock, EngineBlock, RecorderFrame,
    INTERFACE_VERSION,
};
pub use reader::FrameReader;
pub use writer::{FlightDataRecorder, RecorderSettings};
