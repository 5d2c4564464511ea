//! Text processing and normalization

use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Number of job-description words kept as keywords by default.
pub const DEFAULT_JOB_KEYWORDS: usize = 30;

pub struct TextProcessor {
    separator_regex: Regex,
    whitespace_regex: Regex,
    job_word_regex: Regex,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        // Keeps characters that carry meaning in skill names: c++, c#, ci/cd, node.js
        let separator_regex = Regex::new(r"[^a-z0-9+#/.\-]+")
            .expect("Invalid separator regex");

        let whitespace_regex = Regex::new(r"\s+")
            .expect("Invalid whitespace regex");

        let job_word_regex = Regex::new(r"[A-Za-z][A-Za-z\-+/#.]{2,}")
            .expect("Invalid job keyword regex");

        Self {
            separator_regex,
            whitespace_regex,
            job_word_regex,
        }
    }

    /// Lowercase, replace separator runs with a space, and collapse whitespace.
    pub fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let separated = self.separator_regex.replace_all(&lowered, " ");
        self.whitespace_regex
            .replace_all(&separated, " ")
            .trim()
            .to_string()
    }

    /// Distinct tokens of the normalized text.
    pub fn token_set(&self, text: &str) -> HashSet<String> {
        self.normalize(text)
            .split(' ')
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Whitespace-delimited word count of the raw text.
    pub fn word_count(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }

    /// Most frequent words of a job description, ties kept in first-seen order.
    pub fn extract_keywords(&self, text: &str, limit: usize) -> Vec<String> {
        let lowered = text.to_lowercase();
        let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
        for (position, m) in self.job_word_regex.find_iter(&lowered).enumerate() {
            counts.entry(m.as_str()).or_insert((0, position)).0 += 1;
        }

        let mut ranked: Vec<(&str, usize, usize)> = counts
            .into_iter()
            .map(|(word, (count, first))| (word, count, first))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        ranked
            .into_iter()
            .take(limit)
            .map(|(word, _, _)| word.to_string())
            .collect()
    }
}
