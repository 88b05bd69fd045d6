use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid derivative option: {value}. Expected NAME=SIZE or NAME=SIZE:square")]
    InvalidDerivative { value: String },

    #[error("Missing required argument: {arg}")]
    MissingArgument { arg: String },

    #[error("Cannot determine mime type of {path}; pass --mime-type")]
    UnknownMimeType { path: String },

    #[error(transparent)]
    Library(#[from] derivgen::Error),
}
