//! Configuration management for the CV evaluator

use crate::error::{CvEvaluatorError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scoring: ScoringWeights,
    pub checks: CheckThresholds,
    pub output: OutputConfig,
}

/// Weight of each score component.
///
/// The defaults sum to 1.0 for readability; the scoring engine re-normalizes
/// whatever is configured, so custom weights need not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub has_text: f64,
    pub contact: f64,
    pub sections: f64,
    pub length: f64,
    pub pitfalls: f64,
    pub keywords: f64,
    pub pages: f64,
    pub size: f64,
    pub profile_links: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckThresholds {
    pub min_words: usize,
    pub max_words: usize,
    pub min_pages: u32,
    pub max_pages: u32,
    pub max_file_size_kb: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub color_output: bool,
    pub pretty_json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            has_text: 0.22,
            contact: 0.12,
            sections: 0.24,
            length: 0.12,
            pitfalls: 0.06,
            keywords: 0.14,
            pages: 0.05,
            size: 0.03,
            profile_links: 0.02,
        }
    }
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.has_text
            + self.contact
            + self.sections
            + self.length
            + self.pitfalls
            + self.keywords
            + self.pages
            + self.size
            + self.profile_links
    }
}

impl Default for CheckThresholds {
    fn default() -> Self {
        Self {
            min_words: 50,
            max_words: 1200,
            min_pages: 1,
            max_pages: 3,
            max_file_size_kb: 2048.0,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color_output: true,
            pretty_json: true,
        }
    }
}

impl Config {
    /// Load configuration from an explicit path, the user config directory,
    /// or fall back to built-in defaults. Never writes to disk.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(CvEvaluatorError::Configuration(format!(
                    "Config file does not exist: {}",
                    path.display()
                )));
            }
            return Self::from_file(path);
        }

        match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| {
            CvEvaluatorError::Configuration(format!("Failed to serialize config: {}", e))
        })
    }

    fn validate(&self) -> Result<()> {
        if self.checks.min_words > self.checks.max_words {
            return Err(CvEvaluatorError::Configuration(format!(
                "checks.min_words ({}) exceeds checks.max_words ({})",
                self.checks.min_words, self.checks.max_words
            )));
        }
        if self.checks.min_pages > self.checks.max_pages {
            return Err(CvEvaluatorError::Configuration(format!(
                "checks.min_pages ({}) exceeds checks.max_pages ({})",
                self.checks.min_pages, self.checks.max_pages
            )));
        }
        Ok(())
    }

    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cv-evaluator").join("config.toml"))
    }
}
