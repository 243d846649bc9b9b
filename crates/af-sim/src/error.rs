use thiserror::Error;

pub type SimResult<T> = Result<T, SimError>;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error(transparent)]
    Engine(#[from] af_engine::EngineError),

    #[error(transparent)]
    Guidance(#[from] af_guidance::GuidanceError),
}
