//! Error handling for the CV evaluator

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CvEvaluatorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input file not found: {0}")]
    InputNotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, CvEvaluatorError>;

impl From<toml::de::Error> for CvEvaluatorError {
    fn from(err: toml::de::Error) -> Self {
        CvEvaluatorError::Configuration(format!("Failed to parse config: {}", err))
    }
}
