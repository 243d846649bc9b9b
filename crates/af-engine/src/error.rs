use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Invalid engine index {index} (engines are numbered 1 and 2)")]
    BadEngineIndex { index: u8 },

    #[error("Invalid engine state code {code}")]
    BadStateCode { code: f64 },

    #[error(transparent)]
    Core(#[from] af_core::CoreError),

    #[error(transparent)]
    Signal(#[from] af_signals::SignalError),
}
