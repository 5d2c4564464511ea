//! Text processing, checks and scoring

pub mod checks;
pub mod evaluator;
pub mod scoring;
pub mod text_processor;
