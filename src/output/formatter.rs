//! Output formatters: console, JSON and Markdown

use crate::config::{OutputConfig, OutputFormat};
use crate::error::{CvEvaluatorError, Result};
use crate::input::document::ExtractedDocument;
use crate::output::report::EvaluationResult;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for rendering an evaluation result
pub trait OutputFormatter {
    fn format_result(&self, result: &EvaluationResult) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
}

/// JSON formatter for machine consumption
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for reports
pub struct MarkdownFormatter;

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str) -> String {
        if self.use_colors {
            format!("{}\n", title.bold())
        } else {
            format!("{}\n", title)
        }
    }

    fn format_score_badge(&self, score: u8) -> String {
        let (badge, color) = match score {
            90..=100 => ("EXCELLENT", Color::Green),
            80..=89 => ("VERY GOOD", Color::BrightGreen),
            70..=79 => ("GOOD", Color::Yellow),
            60..=69 => ("FAIR", Color::BrightYellow),
            50..=59 => ("BELOW AVG", Color::Red),
            _ => ("POOR", Color::BrightRed),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_check(&self, name: &str, passed: bool) -> String {
        if passed {
            format!("  {} {}\n", self.colorize("✓", Color::Green), name)
        } else {
            format!("  {} {}\n", self.colorize("✗", Color::Red), name)
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_result(&self, result: &EvaluationResult) -> Result<String> {
        let mut output = String::new();

        output.push_str(&format!(
            "Score: {} / 100 {}\n",
            result.score,
            self.format_score_badge(result.score)
        ));

        output.push_str(&self.format_header("Checks:"));
        for (name, passed) in &result.checks {
            output.push_str(&self.format_check(name, *passed));
        }

        if !result.missing_keywords.is_empty() {
            output.push_str(&self.format_header("Missing keywords:"));
            for keyword in &result.missing_keywords {
                output.push_str(&format!("  - {}\n", self.colorize(keyword, Color::Yellow)));
            }
        }

        if !result.suggestions.is_empty() {
            output.push_str(&self.format_header("Suggestions:"));
            for suggestion in &result.suggestions {
                output.push_str(&format!("  - {}\n", suggestion));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_result(&self, result: &EvaluationResult) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(result)?)
        } else {
            Ok(serde_json::to_string(result)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_result(&self, result: &EvaluationResult) -> Result<String> {
        let mut lines: Vec<String> = Vec::new();

        lines.push("## CV Evaluation Report".to_string());
        lines.push(String::new());
        lines.push(format!("Path: `{}`  ", result.path));
        lines.push(format!("Type: `{}`  ", result.file_type));
        if let Some(pages) = result.pages {
            lines.push(format!("Pages: {}  ", pages));
        }
        if let Some(size) = result.file_size_kb {
            lines.push(format!("Size: {:.1} KB  ", size));
        }
        lines.push(String::new());

        lines.push("### Score".to_string());
        lines.push(format!("Overall: **{} / 100**", result.score));
        if !result.scores.is_empty() {
            lines.push(String::new());
            lines.push("Details:".to_string());
            for (name, component) in &result.scores {
                lines.push(format!(
                    "- {}: {:.2} (weight {:.2})",
                    name, component.value, component.weight
                ));
            }
        }
        lines.push(String::new());

        lines.push("### Checks".to_string());
        let mut names: Vec<&String> = result.checks.keys().collect();
        names.sort();
        for name in names {
            let mark = if result.checks[name] { "✅" } else { "❌" };
            lines.push(format!("- {} {}", mark, name));
        }
        lines.push(String::new());

        if !result.missing_keywords.is_empty() {
            lines.push("### Missing Keywords".to_string());
            lines.extend(result.missing_keywords.iter().map(|k| format!("- {}", k)));
            lines.push(String::new());
        }

        if !result.suggestions.is_empty() {
            lines.push("### Suggestions".to_string());
            lines.extend(result.suggestions.iter().map(|s| format!("- {}", s)));
            lines.push(String::new());
        }

        Ok(lines.join("\n"))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new(config: &OutputConfig) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(config.color_output),
            json_formatter: JsonFormatter::new(config.pretty_json),
            markdown_formatter: MarkdownFormatter,
        }
    }

    pub fn generate_report(&self, result: &EvaluationResult, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_result(result),
            OutputFormat::Json => self.json_formatter.format_result(result),
            OutputFormat::Markdown => self.markdown_formatter.format_result(result),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(&OutputConfig::default())
    }
}

/// Plain dump of extracted text and notes, for inspecting what the checks see.
pub fn format_extracted(doc: &ExtractedDocument) -> String {
    let mut output = String::new();
    output.push_str(&format!("Type: {}\n", doc.file_type));
    if let Some(pages) = doc.page_count {
        output.push_str(&format!("Pages: {}\n", pages));
    }
    for note in &doc.notes {
        output.push_str(&format!("Note: {}\n", note));
    }
    output.push_str("----- extracted text -----\n");
    output.push_str(&doc.text);
    if !doc.text.ends_with('\n') {
        output.push('\n');
    }
    output
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(file_path, content).map_err(|e| {
        CvEvaluatorError::OutputFormatting(format!(
            "Failed to write report to {}: {}",
            file_path.display(),
            e
        ))
    })
}
