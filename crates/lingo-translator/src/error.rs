use std::fmt;

use serde::{Deserialize, Serialize};

/// Failure category surfaced to callers of a single translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    ConnectionFailed,
    ModelNotFound,
    GenerationFailed,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::ConnectionFailed => "CONNECTION_FAILED",
            ErrorKind::ModelNotFound => "MODEL_NOT_FOUND",
            ErrorKind::GenerationFailed => "GENERATION_FAILED",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// The caller cancelled the operation. Not a failure of the server or model.
    #[error("Translation cancelled")]
    Cancelled,
}

impl TranslateError {
    /// Error category, `None` for cancellation
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            TranslateError::ConnectionFailed(_) => Some(ErrorKind::ConnectionFailed),
            TranslateError::ModelNotFound(_) => Some(ErrorKind::ModelNotFound),
            TranslateError::GenerationFailed(_) => Some(ErrorKind::GenerationFailed),
            TranslateError::Cancelled => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, TranslateError::Cancelled)
    }
}
