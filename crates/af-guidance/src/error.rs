use thiserror::Error;

pub type GuidanceResult<T> = Result<T, GuidanceError>;

#[derive(Error, Debug)]
pub enum GuidanceError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Unknown mode code {code} for {axis}")]
    UnknownMode { axis: &'static str, code: f64 },
}
