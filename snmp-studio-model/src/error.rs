use std::fmt::{self, Display};

/// Errors produced by model constructors and validation routines.
#[derive(Debug)]
pub enum ModelError {
    Json(serde_json::Error),
    InvalidWalk(String),
    InvalidCustomData(String),
    InvalidFileName(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::Json(err) => write!(f, "invalid json: {err}"),
            ModelError::InvalidWalk(msg) => write!(f, "invalid walk request: {msg}"),
            ModelError::InvalidCustomData(msg) => {
                write!(f, "invalid custom data: {msg}")
            }
            ModelError::InvalidFileName(name) => {
                write!(f, "invalid MIB file name '{name}'")
            }
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelError::Json(err) => Some(err),
            ModelError::InvalidWalk(_)
            | ModelError::InvalidCustomData(_)
            | ModelError::InvalidFileName(_) => None,
        }
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::Json(err)
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
