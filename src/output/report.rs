//! Evaluation result record

use crate::input::file_detector::FileType;
use crate::processing::checks::ProfileLinks;
use crate::processing::scoring::ScoreComponent;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Outcome of evaluating one CV file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub path: String,
    pub file_type: FileType,
    pub pages: Option<u32>,
    /// KB, one decimal.
    pub file_size_kb: Option<f64>,
    pub checks: IndexMap<String, bool>,
    pub scores: IndexMap<String, ScoreComponent>,
    /// 0-100
    pub score: u8,
    pub missing_keywords: Vec<String>,
    pub found_keywords: Vec<String>,
    pub suggestions: Vec<String>,
    pub links: ProfileLinks,
}

impl EvaluationResult {
    pub fn passed_checks(&self) -> usize {
        self.checks.values().filter(|passed| **passed).count()
    }

    pub fn meets(&self, threshold: u8) -> bool {
        self.score >= threshold
    }
}
