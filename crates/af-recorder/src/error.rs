use thiserror::Error;

pub type RecorderResult<T> = Result<T, RecorderError>;

#[derive(Error, Debug)]
pub enum RecorderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("interface version mismatch (expected {expected}, got {got})")]
    VersionMismatch { expected: u64, got: u64 },

    #[error("truncated frame: {what}")]
    TruncatedFrame { what: &'static str },
}
