//! CV evaluator library
//!
//! Extracts text from a CV (plain text, DOCX or PDF), runs a fixed battery of
//! ATS-compatibility checks over it and combines them into a 0-100 score with
//! suggestions.

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{CvEvaluatorError, Result};
pub use input::{extract, ExtractedDocument, FileType};
pub use output::EvaluationResult;
pub use processing::evaluator::{evaluate, Evaluator};
