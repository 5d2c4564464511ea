//! CLI interface for the CV evaluator

use crate::config::OutputFormat;
use crate::error::Result;
use crate::input::manager::read_input;
use crate::processing::text_processor::{TextProcessor, DEFAULT_JOB_KEYWORDS};
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "cv-evaluator")]
#[command(about = "Evaluate a CV/resume file for ATS compatibility")]
#[command(long_about = "Score a CV (PDF, DOCX, TXT, MD) 0-100 on heuristic applicant-tracking-system checks and suggest fixes")]
pub struct Cli {
    /// Path to the CV file (pdf, docx, txt, md)
    pub cv_path: PathBuf,

    /// Job description file to extract keywords from
    #[arg(long)]
    pub job: Option<PathBuf>,

    /// Comma-separated keywords to check for
    #[arg(short, long)]
    pub keywords: Option<String>,

    /// Output format: text, json, md
    #[arg(short, long, default_value = "text")]
    pub format: String,

    /// Exit with status 2 if the score is below this threshold
    #[arg(long, default_value_t = 70)]
    pub fail_under: u8,

    /// Print the extracted text and extraction notes instead of scoring
    #[arg(long)]
    pub show_text: bool,

    /// Also write the report to this file
    #[arg(short, long)]
    pub save: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Disable colored console output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> std::result::Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "text" | "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "md" | "markdown" => Ok(OutputFormat::Markdown),
        _ => Err(format!("Invalid output format: {}. Supported: text, json, md", format)),
    }
}

/// Split a comma-separated keyword list, dropping empty entries.
pub fn parse_keyword_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Job description keywords first, then explicit keywords.
pub fn collect_keywords(job: Option<&Path>, keywords: Option<&str>) -> Result<Vec<String>> {
    let mut collected = Vec::new();
    if let Some(path) = job {
        let bytes = read_input(path)?;
        let text = String::from_utf8_lossy(&bytes);
        collected.extend(TextProcessor::new().extract_keywords(&text, DEFAULT_JOB_KEYWORDS));
    }
    if let Some(raw) = keywords {
        collected.extend(parse_keyword_list(raw));
    }
    Ok(collected)
}
