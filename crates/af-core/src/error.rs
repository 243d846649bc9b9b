use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Configuration parse error at line {line}: {what}")]
    ConfigParse { what: String, line: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
