//! Path-level entry point for text extraction

use crate::error::{CvEvaluatorError, Result};
use crate::input::document::ExtractedDocument;
use crate::input::file_detector::FileType;
use crate::input::text_extractor::extractor_for;
use log::{debug, info};
use std::fs;
use std::path::Path;

/// Reads `path` and extracts its text with the reader chosen by extension.
///
/// Only a missing or unreadable input is an error; problems inside the
/// document are reported through [`ExtractedDocument::notes`].
pub fn extract(path: &Path) -> Result<ExtractedDocument> {
    let bytes = read_input(path)?;
    let file_type = FileType::from_path(path);
    debug!("Dispatching {} to the {} reader", path.display(), file_type);

    let doc = extract_bytes(&bytes, file_type);
    info!(
        "Extracted {} characters from {} ({} note(s))",
        doc.text.chars().count(),
        path.display(),
        doc.notes.len()
    );
    Ok(doc)
}

/// Extracts already-loaded document bytes.
pub fn extract_bytes(bytes: &[u8], file_type: FileType) -> ExtractedDocument {
    extractor_for(file_type).extract(bytes)
}

/// Reads the whole input file; a missing path is reported before any I/O.
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(CvEvaluatorError::InputNotFound(path.display().to_string()));
    }
    if !path.is_file() {
        return Err(CvEvaluatorError::InvalidInput(format!(
            "Not a regular file: {}",
            path.display()
        )));
    }
    Ok(fs::read(path)?)
}

/// File size in KB rounded to one decimal, or `None` if metadata is unavailable.
pub fn file_size_kb(path: &Path) -> Option<f64> {
    fs::metadata(path)
        .ok()
        .map(|meta| (meta.len() as f64 / 1024.0 * 10.0).round() / 10.0)
}
