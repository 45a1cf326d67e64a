use thiserror::Error;

use crate::config::ConfigError;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ApplicationError {
    #[error("configuration failure: {0}")]
    Configuration(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("confidence {confidence} is below the required minimum {minimum}")]
    LowConfidence { confidence: f64, minimum: f64 },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String },
    #[error("unprocessable: {message}")]
    Unprocessable { message: String },
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl From<ConfigError> for ApplicationError {
    fn from(value: ConfigError) -> Self {
        Self::Configuration(value.to_string())
    }
}

impl ApplicationError {
    /// Stable machine-readable class for command and tool payloads.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "config_validation",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::LowConfidence { .. } => "low_confidence",
        }
    }
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The request could not be processed. Check inputs and try again."
            }
            Self::Unprocessable { .. } => {
                "The expression was understood only approximately. \
                 Rephrase it with a season, month, or offset."
            }
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        let message = value.to_string();
        match value {
            ApplicationError::InvalidArgument(_) => Self::BadRequest { message },
            ApplicationError::LowConfidence { .. } => Self::Unprocessable { message },
            ApplicationError::Configuration(_) => Self::Internal { message },
        }
    }
}
