//! ATS compatibility checks over extracted text
//!
//! Each check is pure: the same document and keyword list always yield the
//! same signals. Checks are independent of each other.

use crate::config::CheckThresholds;
use crate::error::{CvEvaluatorError, Result};
use crate::input::document::{ExtractedDocument, NoteKind};
use crate::processing::text_processor::TextProcessor;
use aho_corasick::AhoCorasick;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
}

impl SectionType {
    /// Fixed battery order; suggestions and check keys follow it.
    pub const ALL: [SectionType; 5] = [
        SectionType::Summary,
        SectionType::Experience,
        SectionType::Education,
        SectionType::Skills,
        SectionType::Projects,
    ];

    /// Header synonyms, matched case-insensitively anywhere in the text.
    pub fn synonyms(&self) -> &'static [&'static str] {
        match self {
            SectionType::Summary => &["summary", "objective", "profile"],
            SectionType::Experience => &["experience", "work history", "employment"],
            SectionType::Education => &["education", "academics"],
            SectionType::Skills => &["skills", "technical skills", "core competencies"],
            SectionType::Projects => &["projects", "portfolio"],
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            SectionType::Summary => "summary",
            SectionType::Experience => "experience",
            SectionType::Education => "education",
            SectionType::Skills => "skills",
            SectionType::Projects => "projects",
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionType::Summary => write!(f, "Summary"),
            SectionType::Experience => write!(f, "Experience"),
            SectionType::Education => write!(f, "Education"),
            SectionType::Skills => write!(f, "Skills"),
            SectionType::Projects => write!(f, "Projects"),
        }
    }
}

/// Formatting characteristic likely to hurt machine parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pitfall {
    Tables,
    Images,
    WideSpacing,
}

impl Pitfall {
    pub fn description(&self) -> &'static str {
        match self {
            Pitfall::Tables => {
                "Document contains tables; some ATS may not parse table content reliably."
            }
            Pitfall::Images => {
                "Document contains images; avoid embedding headshots or text in images."
            }
            Pitfall::WideSpacing => {
                "Detected wide spacing that may indicate columns; consider single-column layout."
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileLinks {
    pub linkedin: bool,
    pub github: bool,
}

impl ProfileLinks {
    pub fn any(&self) -> bool {
        self.linkedin || self.github
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordCoverage {
    pub total: usize,
    pub found: usize,
    /// Missing keywords in input order.
    pub missing: Vec<String>,
}

impl KeywordCoverage {
    /// Fraction of keywords found; 0 for an empty keyword list.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.found as f64 / self.total as f64
        }
    }
}

/// Every signal produced by one run of the battery.
#[derive(Debug, Clone, PartialEq)]
pub struct BatteryReport {
    pub has_text: bool,
    pub has_contact_info: bool,
    pub sections: Vec<(SectionType, bool)>,
    pub pitfalls: Vec<Pitfall>,
    pub word_count: usize,
    pub reasonable_length: bool,
    pub links: ProfileLinks,
    pub reasonable_pages: bool,
    pub reasonable_file_size: bool,
    pub keywords: KeywordCoverage,
}

impl BatteryReport {
    pub fn sections_fraction(&self) -> f64 {
        if self.sections.is_empty() {
            return 0.0;
        }
        let present = self.sections.iter().filter(|(_, present)| *present).count();
        present as f64 / self.sections.len() as f64
    }

    pub fn missing_sections(&self) -> impl Iterator<Item = SectionType> + '_ {
        self.sections
            .iter()
            .filter(|(_, present)| !present)
            .map(|(section, _)| *section)
    }

    pub fn no_table_layout(&self) -> bool {
        !self.pitfalls.contains(&Pitfall::Tables)
    }

    /// Named boolean checks in battery order.
    pub fn checks(&self) -> IndexMap<String, bool> {
        let mut checks = IndexMap::new();
        checks.insert("has_text".to_string(), self.has_text);
        checks.insert("has_contact_info".to_string(), self.has_contact_info);
        for (section, present) in &self.sections {
            checks.insert(format!("section_{}", section.key()), *present);
        }
        checks.insert("no_table_layout".to_string(), self.no_table_layout());
        checks.insert("reasonable_length".to_string(), self.reasonable_length);
        checks.insert("has_profile_links".to_string(), self.links.any());
        checks.insert("reasonable_pages".to_string(), self.reasonable_pages);
        checks.insert("reasonable_file_size".to_string(), self.reasonable_file_size);
        checks
    }
}

pub struct CheckBattery {
    email_regex: Regex,
    phone_regex: Regex,
    url_regex: Regex,
    wide_spacing_regex: Regex,
    section_matcher: AhoCorasick,
    pattern_sections: Vec<SectionType>,
    text_processor: TextProcessor,
    thresholds: CheckThresholds,
}

impl CheckBattery {
    pub fn new(thresholds: CheckThresholds) -> Result<Self> {
        let email_regex = Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")
            .expect("Invalid email regex");

        // Seven or more digits, optionally grouped by spaces or hyphens, optional leading +
        let phone_regex = Regex::new(r"(?:\+?\d[\s-]?){6,}\d")
            .expect("Invalid phone regex");

        let url_regex = Regex::new(r"https?://[^\s)]+")
            .expect("Invalid URL regex");

        let wide_spacing_regex = Regex::new(r"\S\s{4,}\S")
            .expect("Invalid spacing regex");

        let mut patterns = Vec::new();
        let mut pattern_sections = Vec::new();
        for section in SectionType::ALL {
            for synonym in section.synonyms() {
                patterns.push(*synonym);
                pattern_sections.push(section);
            }
        }
        let section_matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(&patterns)
            .map_err(|e| CvEvaluatorError::Processing(format!("Failed to build section matcher: {}", e)))?;

        Ok(Self {
            email_regex,
            phone_regex,
            url_regex,
            wide_spacing_regex,
            section_matcher,
            pattern_sections,
            text_processor: TextProcessor::new(),
            thresholds,
        })
    }

    pub fn thresholds(&self) -> &CheckThresholds {
        &self.thresholds
    }

    /// Runs every check over the document.
    pub fn run(
        &self,
        doc: &ExtractedDocument,
        keywords: &[String],
        file_size_kb: Option<f64>,
    ) -> BatteryReport {
        let text = doc.text.as_str();
        let word_count = self.text_processor.word_count(text);

        BatteryReport {
            has_text: doc.has_text(),
            has_contact_info: self.has_contact_info(text),
            sections: self.section_presence(text),
            pitfalls: self.formatting_pitfalls(doc),
            word_count,
            reasonable_length: self.reasonable_length(word_count),
            links: self.profile_links(text),
            reasonable_pages: self.reasonable_pages(doc.page_count),
            reasonable_file_size: self.reasonable_file_size(file_size_kb),
            keywords: self.keyword_coverage(text, keywords),
        }
    }

    pub fn has_contact_info(&self, text: &str) -> bool {
        self.email_regex.is_match(text) || self.phone_regex.is_match(text)
    }

    /// Presence of each section in battery order.
    pub fn section_presence(&self, text: &str) -> Vec<(SectionType, bool)> {
        let mut found = vec![false; SectionType::ALL.len()];
        for m in self.section_matcher.find_overlapping_iter(text) {
            let section = self.pattern_sections[m.pattern().as_usize()];
            if let Some(index) = SectionType::ALL.iter().position(|s| *s == section) {
                found[index] = true;
            }
        }
        SectionType::ALL.into_iter().zip(found).collect()
    }

    /// Pitfalls from extraction notes first, then the column-spacing heuristic.
    pub fn formatting_pitfalls(&self, doc: &ExtractedDocument) -> Vec<Pitfall> {
        let mut pitfalls: Vec<Pitfall> = doc
            .notes
            .iter()
            .filter_map(|note| match note.kind {
                NoteKind::TableDetected(_) => Some(Pitfall::Tables),
                NoteKind::ImageDetected(_) => Some(Pitfall::Images),
                _ => None,
            })
            .collect();
        if self.wide_spacing_regex.is_match(&doc.text) {
            pitfalls.push(Pitfall::WideSpacing);
        }
        pitfalls
    }

    pub fn reasonable_length(&self, word_count: usize) -> bool {
        (self.thresholds.min_words..=self.thresholds.max_words).contains(&word_count)
    }

    /// Unknown page count passes.
    pub fn reasonable_pages(&self, page_count: Option<u32>) -> bool {
        page_count.map_or(true, |pages| {
            (self.thresholds.min_pages..=self.thresholds.max_pages).contains(&pages)
        })
    }

    /// Unknown file size passes.
    pub fn reasonable_file_size(&self, file_size_kb: Option<f64>) -> bool {
        file_size_kb.map_or(true, |kb| kb <= self.thresholds.max_file_size_kb)
    }

    /// LinkedIn / GitHub URLs, judged by registrable domain.
    pub fn profile_links(&self, text: &str) -> ProfileLinks {
        let mut links = ProfileLinks::default();
        for m in self.url_regex.find_iter(text) {
            let Some(domain) = registered_domain(m.as_str()) else {
                continue;
            };
            if domain.starts_with("linkedin.") {
                links.linkedin = true;
            }
            if domain.starts_with("github.") {
                links.github = true;
            }
        }
        links
    }

    /// A keyword counts as found when it, or its lowercase form, appears as a
    /// normalized token either verbatim or with its spaces removed.
    pub fn keyword_coverage(&self, text: &str, keywords: &[String]) -> KeywordCoverage {
        let mut coverage = KeywordCoverage {
            total: keywords.len(),
            ..Default::default()
        };
        if keywords.is_empty() {
            return coverage;
        }

        let tokens = self.text_processor.token_set(text);
        for keyword in keywords {
            let lowered = keyword.to_lowercase();
            let hit = [keyword.as_str(), lowered.as_str()]
                .iter()
                .any(|alt| tokens.contains(*alt) || tokens.contains(&alt.replace(' ', "")));
            if hit {
                coverage.found += 1;
            } else {
                coverage.missing.push(keyword.clone());
            }
        }
        coverage
    }
}

/// Registrable domain of a URL's host, e.g. `github.io` for `jane.github.io`.
fn registered_domain(raw_url: &str) -> Option<String> {
    let url = Url::parse(raw_url).ok()?;
    let host = url.host_str()?.trim_end_matches('.').to_lowercase();
    let suffix = icann_suffix(&host)?;
    let rest = host.strip_suffix(suffix)?.strip_suffix('.')?;
    let label = rest.rsplit('.').next().filter(|l| !l.is_empty())?;
    Some(format!("{}.{}", label, suffix))
}

/// Public suffix of `host` from the ICANN section of the list. Private
/// entries such as `github.io` are skipped so hosted pages resolve to the
/// provider's domain.
fn icann_suffix(host: &str) -> Option<&str> {
    let mut candidate = host;
    loop {
        let suffix = psl::suffix(candidate.as_bytes())?;
        let text = std::str::from_utf8(suffix.as_bytes()).ok()?;
        if !matches!(suffix.typ(), Some(psl::Type::Private)) {
            return Some(text);
        }
        candidate = text.split_once('.')?.1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::file_detector::FileType;

    fn battery() -> CheckBattery {
        CheckBattery::new(CheckThresholds::default()).unwrap()
    }

    fn keywords(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_contact_detection() {
        let battery = battery();
        assert!(battery.has_contact_info("reach me at jane.doe@example.com"));
        assert!(battery.has_contact_info("Phone: +1 555-123-4567"));
        assert!(battery.has_contact_info("+123456789"));
        assert!(battery.has_contact_info("Call 555-1234"));
        assert!(!battery.has_contact_info("Room 555-123"));
        assert!(!battery.has_contact_info("no contact details here"));
    }

    #[test]
    fn test_sections_are_case_insensitive_and_synonym_aware() {
        let battery = battery();
        let sections = battery.section_presence("CAREER OBJECTIVE\nWork History\nTechnical Skills");
        assert_eq!(
            sections,
            vec![
                (SectionType::Summary, true),
                (SectionType::Experience, true),
                (SectionType::Education, false),
                (SectionType::Skills, true),
                (SectionType::Projects, false),
            ]
        );
    }

    #[test]
    fn test_pitfalls_from_notes_and_spacing() {
        let battery = battery();
        let mut doc = ExtractedDocument::new(FileType::Docx);
        doc.text = "Name        Phone".to_string();
        doc.note(NoteKind::TableDetected(1));
        doc.note(NoteKind::ImageDetected(2));
        doc.note(NoteKind::PageCountUnavailable);
        assert_eq!(
            battery.formatting_pitfalls(&doc),
            vec![Pitfall::Tables, Pitfall::Images, Pitfall::WideSpacing]
        );

        let mut clean = ExtractedDocument::new(FileType::Text);
        clean.text = "Name Phone\nEmail   Address".to_string();
        assert!(battery.formatting_pitfalls(&clean).is_empty());
    }

    #[test]
    fn test_length_boundaries() {
        let battery = battery();
        assert!(!battery.reasonable_length(49));
        assert!(battery.reasonable_length(50));
        assert!(battery.reasonable_length(1200));
        assert!(!battery.reasonable_length(1201));
    }

    #[test]
    fn test_page_and_size_bounds() {
        let battery = battery();
        assert!(battery.reasonable_pages(None));
        assert!(!battery.reasonable_pages(Some(0)));
        assert!(battery.reasonable_pages(Some(1)));
        assert!(battery.reasonable_pages(Some(3)));
        assert!(!battery.reasonable_pages(Some(4)));

        assert!(battery.reasonable_file_size(None));
        assert!(battery.reasonable_file_size(Some(2048.0)));
        assert!(!battery.reasonable_file_size(Some(2048.1)));
    }

    #[test]
    fn test_profile_links() {
        let battery = battery();
        let links = battery.profile_links(
            "See https://www.linkedin.com/in/jane-doe and (https://github.com/janedoe)",
        );
        assert_eq!(links, ProfileLinks { linkedin: true, github: true });

        let links = battery.profile_links("https://notlinkedin.com/jane http://github.example.org");
        assert!(!links.any());

        let links = battery.profile_links("linkedin.com/in/jane without scheme");
        assert!(!links.any());
    }

    #[test]
    fn test_hosted_pages_count_as_profile_links() {
        let battery = battery();
        let links = battery.profile_links("Portfolio: https://janedoe.github.io/");
        assert_eq!(links, ProfileLinks { linkedin: false, github: true });

        let links = battery.profile_links("https://uk.linkedin.com/in/jane https://jane.github.io/cv");
        assert_eq!(links, ProfileLinks { linkedin: true, github: true });

        assert_eq!(registered_domain("https://janedoe.github.io/").as_deref(), Some("github.io"));
        assert_eq!(registered_domain("https://www.example.co.uk/x").as_deref(), Some("example.co.uk"));
        assert_eq!(registered_domain("https://io/"), None);
    }

    #[test]
    fn test_keyword_coverage() {
        let battery = battery();
        let text = "Skills: Python, SQL, Machine Learning, machinelearning";
        let coverage = battery.keyword_coverage(
            text,
            &keywords(&["python", "SQL", "docker", "Machine Learning"]),
        );
        assert_eq!(coverage.total, 4);
        assert_eq!(coverage.found, 3);
        assert_eq!(coverage.missing, vec!["docker".to_string()]);
        assert!((coverage.fraction() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_keyword_coverage_empty_list_is_zero() {
        let battery = battery();
        let coverage = battery.keyword_coverage("python", &[]);
        assert_eq!(coverage.fraction(), 0.0);
        assert!(coverage.missing.is_empty());
    }

    #[test]
    fn test_keyword_duplicates_counted_once_each() {
        let battery = battery();
        let list = keywords(&["rust", "rust", "go"]);
        let coverage = battery.keyword_coverage("rust developer", &list);
        assert_eq!(coverage.found + coverage.missing.len(), list.len());
        assert_eq!(coverage.missing, vec!["go".to_string()]);
    }

    #[test]
    fn test_checks_map_order() {
        let battery = battery();
        let doc = ExtractedDocument::new(FileType::Text);
        let report = battery.run(&doc, &[], None);
        let checks = report.checks();
        let keys: Vec<&str> = checks.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "has_text",
                "has_contact_info",
                "section_summary",
                "section_experience",
                "section_education",
                "section_skills",
                "section_projects",
                "no_table_layout",
                "reasonable_length",
                "has_profile_links",
                "reasonable_pages",
                "reasonable_file_size",
            ]
        );
    }
}
