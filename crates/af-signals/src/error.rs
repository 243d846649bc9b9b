use thiserror::Error;

pub type SignalResult<T> = Result<T, SignalError>;

#[derive(Error, Debug)]
pub enum SignalError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Breakpoint table error: {what}")]
    Breakpoints { what: &'static str },
}
