//! Error handling for the resume builder

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeBuilderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Template rendering error: {0}")]
    Template(String),
}

pub type Result<T> = std::result::Result<T, ResumeBuilderError>;

impl From<askama::Error> for ResumeBuilderError {
    fn from(err: askama::Error) -> Self {
        ResumeBuilderError::Template(err.to_string())
    }
}
