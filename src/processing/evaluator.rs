//! Evaluation engine: extraction, checks, scoring and suggestions

use crate::config::{CheckThresholds, Config, ScoringWeights};
use crate::error::Result;
use crate::input::document::ExtractedDocument;
use crate::input::file_detector::FileType;
use crate::input::manager;
use crate::output::report::EvaluationResult;
use crate::processing::checks::{BatteryReport, CheckBattery};
use crate::processing::scoring::{to_percent, weighted_score, ScoreComponent};
use indexmap::IndexMap;
use log::info;
use std::path::Path;

pub struct Evaluator {
    battery: CheckBattery,
    weights: ScoringWeights,
}

impl Evaluator {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            battery: CheckBattery::new(config.checks.clone())?,
            weights: config.scoring.clone(),
        })
    }

    /// Evaluates the file at `path` against the optional keyword list.
    pub fn evaluate(&self, path: &Path, keywords: &[String]) -> Result<EvaluationResult> {
        let doc = manager::extract(path)?;
        let file_size_kb = manager::file_size_kb(path);
        let result = self.evaluate_document(&path.display().to_string(), &doc, file_size_kb, keywords);
        info!(
            "Evaluated {}: score {} ({} of {} checks passed)",
            result.path,
            result.score,
            result.passed_checks(),
            result.checks.len()
        );
        Ok(result)
    }

    /// Scores an already-extracted document.
    pub fn evaluate_document(
        &self,
        path: &str,
        doc: &ExtractedDocument,
        file_size_kb: Option<f64>,
        keywords: &[String],
    ) -> EvaluationResult {
        let report = self.battery.run(doc, keywords, file_size_kb);
        let scores = self.score_components(&report);
        let score = to_percent(weighted_score(&scores));
        let suggestions = suggestions(&report, doc, file_size_kb, self.battery.thresholds());

        EvaluationResult {
            path: path.to_string(),
            file_type: doc.file_type,
            pages: doc.page_count,
            file_size_kb,
            checks: report.checks(),
            scores,
            score,
            missing_keywords: report.keywords.missing.clone(),
            found_keywords: keywords.to_vec(),
            suggestions,
            links: report.links,
        }
    }

    fn score_components(&self, report: &BatteryReport) -> IndexMap<String, ScoreComponent> {
        let w = &self.weights;
        let mut scores = IndexMap::new();
        scores.insert("has_text".to_string(), ScoreComponent::from_bool(report.has_text, w.has_text));
        scores.insert("contact".to_string(), ScoreComponent::from_bool(report.has_contact_info, w.contact));
        scores.insert("sections".to_string(), ScoreComponent::new(report.sections_fraction(), w.sections));
        scores.insert("length".to_string(), ScoreComponent::from_bool(report.reasonable_length, w.length));
        scores.insert("pitfalls".to_string(), ScoreComponent::from_bool(report.pitfalls.is_empty(), w.pitfalls));
        scores.insert("keywords".to_string(), ScoreComponent::new(report.keywords.fraction(), w.keywords));
        scores.insert("pages".to_string(), ScoreComponent::from_bool(report.reasonable_pages, w.pages));
        scores.insert("size".to_string(), ScoreComponent::from_bool(report.reasonable_file_size, w.size));
        scores.insert("profile_links".to_string(), ScoreComponent::from_bool(report.links.any(), w.profile_links));
        scores
    }
}

fn suggestions(
    report: &BatteryReport,
    doc: &ExtractedDocument,
    file_size_kb: Option<f64>,
    thresholds: &CheckThresholds,
) -> Vec<String> {
    let mut suggestions = Vec::new();

    if !report.has_contact_info {
        suggestions.push("Add a professional email and a phone number.".to_string());
    }
    for section in report.missing_sections() {
        suggestions.push(format!("Consider adding a '{}' section.", section));
    }
    suggestions.extend(report.pitfalls.iter().map(|p| p.description().to_string()));
    if doc.file_type == FileType::Pdf && !report.has_text {
        suggestions.push(
            "PDF text extraction failed; export to PDF as text (not scanned) or use DOCX.".to_string(),
        );
    }
    if !report.links.any() {
        suggestions.push("Add a LinkedIn and/or GitHub URL in contact info.".to_string());
    }
    if doc.page_count.is_some() && !report.reasonable_pages {
        suggestions.push(format!(
            "Keep the CV to {}-{} pages for better readability.",
            thresholds.min_pages, thresholds.max_pages
        ));
    }
    if file_size_kb.is_some() && !report.reasonable_file_size {
        suggestions.push("Reduce file size (optimize images, export to text-based PDF/DOCX).".to_string());
    }
    suggestions
}

/// Evaluates `path` with the default configuration.
pub fn evaluate(path: &Path, keywords: &[String]) -> Result<EvaluationResult> {
    Evaluator::new(&Config::default())?.evaluate(path, keywords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::document::NoteKind;

    fn evaluator() -> Evaluator {
        Evaluator::new(&Config::default()).unwrap()
    }

    #[test]
    fn test_empty_pdf_suggestions() {
        let mut doc = ExtractedDocument::new(FileType::Pdf);
        doc.note(NoteKind::PageCountUnavailable);
        doc.note(NoteKind::ExtractionFailed("no text layer".into()));
        let result = evaluator().evaluate_document("cv.pdf", &doc, Some(10.0), &[]);

        assert_eq!(
            result.suggestions,
            vec![
                "Add a professional email and a phone number.",
                "Consider adding a 'Summary' section.",
                "Consider adding a 'Experience' section.",
                "Consider adding a 'Education' section.",
                "Consider adding a 'Skills' section.",
                "Consider adding a 'Projects' section.",
                "PDF text extraction failed; export to PDF as text (not scanned) or use DOCX.",
                "Add a LinkedIn and/or GitHub URL in contact info.",
            ]
        );
        // only pitfalls, pages (unknown) and size pass
        assert_eq!(result.score, 14);
    }

    #[test]
    fn test_page_and_size_suggestions_only_when_known() {
        let mut doc = ExtractedDocument::new(FileType::Docx);
        doc.page_count = Some(5);
        doc.text = "jane@example.com summary experience education skills projects https://github.com/jane".into();
        let result = evaluator().evaluate_document("cv.docx", &doc, Some(4096.0), &[]);
        assert_eq!(
            result.suggestions,
            vec![
                "Keep the CV to 1-3 pages for better readability.",
                "Reduce file size (optimize images, export to text-based PDF/DOCX).",
            ]
        );
        assert!(!result.checks["reasonable_pages"]);
        assert!(!result.checks["reasonable_file_size"]);

        let mut unknown = doc.clone();
        unknown.page_count = None;
        let result = evaluator().evaluate_document("cv.docx", &unknown, None, &[]);
        assert!(result.suggestions.is_empty());
        assert!(result.checks["reasonable_pages"]);
        assert!(result.checks["reasonable_file_size"]);
    }

    #[test]
    fn test_table_note_fails_table_check_and_pitfalls() {
        let mut doc = ExtractedDocument::new(FileType::Docx);
        doc.page_count = Some(1);
        doc.text = "jane@example.com".into();
        doc.note(NoteKind::TableDetected(2));
        let result = evaluator().evaluate_document("cv.docx", &doc, None, &[]);
        assert!(!result.checks["no_table_layout"]);
        assert_eq!(result.scores["pitfalls"].value, 0.0);
        assert!(result
            .suggestions
            .iter()
            .any(|s| s.starts_with("Document contains tables")));
    }

    #[test]
    fn test_custom_weights_are_used() {
        let mut config = Config::default();
        config.scoring = ScoringWeights {
            has_text: 1.0,
            contact: 0.0,
            sections: 0.0,
            length: 0.0,
            pitfalls: 0.0,
            keywords: 0.0,
            pages: 0.0,
            size: 0.0,
            profile_links: 0.0,
        };
        let mut doc = ExtractedDocument::new(FileType::Text);
        doc.text = "hello".into();
        let result = Evaluator::new(&config)
            .unwrap()
            .evaluate_document("cv.txt", &doc, None, &[]);
        assert_eq!(result.score, 100);
    }
}
