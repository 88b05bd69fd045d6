//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Separates configuration problems, bad derivative registrations, environment
//! preconditions and external converter failures so callers can react to each.
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("ImageMagick is not properly configured: {0}")]
    Configuration(String),

    #[error("Invalid derivative specification: {0}")]
    InvalidSpecification(String),

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error("File at '{}' is not readable: {source}", .path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Derivative working directory '{}' is not writable: {reason}", .path.display())]
    WorkingDirectory { path: PathBuf, reason: String },

    #[error("ImageMagick failed with {}. Error output:\n{stderr}", exit_label(.status))]
    ConversionFailed { status: Option<i32>, stderr: String },

    #[error(
        "Derivative filename '{name}' for '{}' is already used by '{}'",
        .original.display(),
        .claimed_by.display()
    )]
    DerivativeNameTaken {
        name: String,
        original: PathBuf,
        claimed_by: PathBuf,
    },

    #[error("Failed to execute command '{}': {source}", .program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),
}

fn exit_label(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status code {code}"),
        None => "no status code (terminated by signal)".to_string(),
    }
}

impl Error {
    pub fn invalid_spec<S: Into<String>>(msg: S) -> Self {
        Error::InvalidSpecification(msg.into())
    }
}
