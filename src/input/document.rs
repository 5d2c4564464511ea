//! Normalized extraction output shared by every reader

use crate::input::file_detector::FileType;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub text: String,
    /// Unknown for plain text; best-effort for structured formats.
    pub page_count: Option<u32>,
    pub file_type: FileType,
    pub notes: Vec<ExtractionNote>,
}

/// Advisory annotation emitted while extracting. Never fatal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionNote {
    pub kind: NoteKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NoteKind {
    TableDetected(usize),
    ImageDetected(usize),
    PageCountUnavailable,
    ExtractionFailed(String),
    EncodingFallback(String),
    EmptyInput,
}

impl ExtractedDocument {
    pub fn new(file_type: FileType) -> Self {
        Self {
            text: String::new(),
            page_count: None,
            file_type,
            notes: Vec::new(),
        }
    }

    pub fn note(&mut self, kind: NoteKind) {
        self.notes.push(ExtractionNote::new(kind));
    }

    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    pub fn table_count(&self) -> usize {
        self.notes
            .iter()
            .map(|n| match n.kind {
                NoteKind::TableDetected(count) => count,
                _ => 0,
            })
            .sum()
    }

    pub fn image_count(&self) -> usize {
        self.notes
            .iter()
            .map(|n| match n.kind {
                NoteKind::ImageDetected(count) => count,
                _ => 0,
            })
            .sum()
    }
}

impl ExtractionNote {
    pub fn new(kind: NoteKind) -> Self {
        let message = kind.to_string();
        Self { kind, message }
    }
}

impl fmt::Display for NoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteKind::TableDetected(n) => write!(f, "contains {} table(s)", n),
            NoteKind::ImageDetected(n) => write!(f, "contains {} image(s)", n),
            NoteKind::PageCountUnavailable => write!(f, "could not read page count"),
            NoteKind::ExtractionFailed(reason) => {
                write!(f, "failed to extract text: {}", reason)
            }
            NoteKind::EncodingFallback(encoding) => {
                write!(f, "not valid UTF-8, decoded as {} with substitutions", encoding)
            }
            NoteKind::EmptyInput => write!(f, "file is empty"),
        }
    }
}

impl fmt::Display for ExtractionNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_messages_match_kind() {
        assert_eq!(
            ExtractionNote::new(NoteKind::TableDetected(2)).message,
            "contains 2 table(s)"
        );
        assert_eq!(
            ExtractionNote::new(NoteKind::ImageDetected(1)).message,
            "contains 1 image(s)"
        );
        assert!(ExtractionNote::new(NoteKind::ExtractionFailed("bad xref".into()))
            .message
            .starts_with("failed to extract text"));
    }

    #[test]
    fn counts_come_from_note_kinds() {
        let mut doc = ExtractedDocument::new(FileType::Docx);
        doc.note(NoteKind::TableDetected(3));
        doc.note(NoteKind::ImageDetected(2));
        doc.note(NoteKind::PageCountUnavailable);
        assert_eq!(doc.table_count(), 3);
        assert_eq!(doc.image_count(), 2);
        assert!(!doc.has_text());
    }
}
