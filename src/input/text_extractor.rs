//! Text extraction from various file formats
//!
//! Every reader turns raw bytes into an [`ExtractedDocument`]. Failures inside a
//! reader are recorded as notes on the document; a reader never returns an error.

use crate::error::{CvEvaluatorError, Result};
use crate::input::document::{ExtractedDocument, NoteKind};
use crate::input::file_detector::FileType;
use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use log::{debug, warn};
use lopdf::{Dictionary, Object, ObjectId};
use quick_xml::events::Event;
use std::io::Read;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

/// Paragraphs assumed per page when estimating DOCX length. A rough heuristic,
/// not a pagination model.
const PARAGRAPHS_PER_PAGE: usize = 40;
/// Maximum decompressed bytes read from `word/document.xml` (zip-bomb protection).
const MAX_XML_ENTRY_BYTES: u64 = 50 * 1024 * 1024;

pub trait TextExtractor {
    fn extract(&self, bytes: &[u8]) -> ExtractedDocument;
}

/// Returns the reader for a file type.
pub fn extractor_for(file_type: FileType) -> Box<dyn TextExtractor> {
    match file_type {
        FileType::Text => Box::new(PlainTextExtractor),
        FileType::Docx => Box::new(DocxExtractor),
        FileType::Pdf => Box::new(PdfExtractor),
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> ExtractedDocument {
        let mut doc = ExtractedDocument::new(FileType::Text);
        if bytes.is_empty() {
            doc.note(NoteKind::EmptyInput);
            return doc;
        }

        match std::str::from_utf8(bytes) {
            Ok(text) => doc.text = text.to_string(),
            Err(e) => {
                let mut detector = EncodingDetector::new();
                detector.feed(bytes, true);
                let encoding: &'static Encoding = detector.guess(None, true);
                debug!(
                    "UTF-8 decode failed at byte {}, falling back to {}",
                    e.valid_up_to(),
                    encoding.name()
                );
                let (text, _, _) = encoding.decode(bytes);
                doc.text = text.into_owned();
                doc.note(NoteKind::EncodingFallback(encoding.name().to_string()));
            }
        }
        doc
    }
}

pub struct DocxExtractor;

/// Body-level content of a `word/document.xml` part.
#[derive(Debug, Default, PartialEq)]
struct DocxBody {
    paragraphs: Vec<String>,
    tables: usize,
    images: usize,
}

impl TextExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> ExtractedDocument {
        let mut doc = ExtractedDocument::new(FileType::Docx);
        if bytes.is_empty() {
            doc.note(NoteKind::EmptyInput);
        }

        let body = match read_document_xml(bytes).and_then(|xml| parse_document_xml(&xml)) {
            Ok(body) => body,
            Err(e) => {
                warn!("DOCX extraction failed: {}", e);
                doc.note(NoteKind::ExtractionFailed(e.to_string()));
                return doc;
            }
        };

        if body.tables > 0 {
            doc.note(NoteKind::TableDetected(body.tables));
        }
        if body.images > 0 {
            doc.note(NoteKind::ImageDetected(body.images));
        }
        doc.page_count = Some(estimate_docx_pages(body.paragraphs.len()));
        doc.text = body.paragraphs.join("\n");
        doc
    }
}

fn estimate_docx_pages(paragraphs: usize) -> u32 {
    if paragraphs == 0 {
        1
    } else {
        (paragraphs / PARAGRAPHS_PER_PAGE).max(1) as u32
    }
}

fn read_document_xml(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes))
        .map_err(|e| CvEvaluatorError::Processing(format!("not a DOCX container: {}", e)))?;
    let entry = archive
        .by_name("word/document.xml")
        .map_err(|e| CvEvaluatorError::Processing(format!("word/document.xml: {}", e)))?;

    let mut xml = Vec::new();
    entry
        .take(MAX_XML_ENTRY_BYTES)
        .read_to_end(&mut xml)
        .map_err(|e| CvEvaluatorError::Processing(format!("word/document.xml: {}", e)))?;
    if xml.len() as u64 >= MAX_XML_ENTRY_BYTES {
        return Err(CvEvaluatorError::Processing(
            "word/document.xml exceeds size limit".to_string(),
        ));
    }
    Ok(xml)
}

fn xml_error(e: impl std::fmt::Display) -> CvEvaluatorError {
    CvEvaluatorError::Processing(format!("malformed XML: {}", e))
}

fn parse_document_xml(xml: &[u8]) -> Result<DocxBody> {
    let mut body = DocxBody::default();
    let mut reader = quick_xml::Reader::from_reader(xml);
    let mut buf = Vec::new();

    let mut table_depth = 0usize;
    let mut para_depth = 0usize;
    let mut run_depth = 0usize;
    let mut in_text = false;
    let mut current = String::new();

    loop {
        // Paragraphs nested in tables are not part of the body paragraph stream.
        let collecting = table_depth == 0 && para_depth > 0;
        match reader.read_event_into(&mut buf).map_err(xml_error)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"tbl" => {
                    if table_depth == 0 {
                        body.tables += 1;
                    }
                    table_depth += 1;
                }
                b"p" => {
                    if table_depth == 0 && para_depth == 0 {
                        current.clear();
                    }
                    para_depth += 1;
                }
                b"r" => run_depth += 1,
                b"t" => in_text = true,
                b"inline" => body.images += 1,
                b"tab" if collecting && run_depth > 0 => current.push('\t'),
                b"br" | b"cr" if collecting && run_depth > 0 => current.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"p" if table_depth == 0 && para_depth == 0 => body.paragraphs.push(String::new()),
                b"inline" => body.images += 1,
                b"tab" if collecting && run_depth > 0 => current.push('\t'),
                b"br" | b"cr" if collecting && run_depth > 0 => current.push('\n'),
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"tbl" => table_depth = table_depth.saturating_sub(1),
                b"p" => {
                    para_depth = para_depth.saturating_sub(1);
                    if para_depth == 0 && table_depth == 0 {
                        body.paragraphs.push(std::mem::take(&mut current));
                    }
                }
                b"r" => run_depth = run_depth.saturating_sub(1),
                b"t" => in_text = false,
                _ => {}
            },
            Event::Text(te) if in_text && collecting => {
                current.push_str(&te.unescape().map_err(xml_error)?);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(body)
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> ExtractedDocument {
        let mut doc = ExtractedDocument::new(FileType::Pdf);
        if bytes.is_empty() {
            doc.note(NoteKind::EmptyInput);
        }

        // Page table and text layer are read independently; either may fail alone.
        let structure = match guarded(|| {
            lopdf::Document::load_mem(bytes)
                .map_err(|e| CvEvaluatorError::Processing(e.to_string()))
        }) {
            Ok(pdf) => {
                doc.page_count = Some(pdf.get_pages().len() as u32);
                Some(pdf)
            }
            Err(e) => {
                warn!("Could not read PDF page table: {}", e);
                doc.note(NoteKind::PageCountUnavailable);
                None
            }
        };

        match guarded(|| {
            pdf_extract::extract_text_from_mem(bytes)
                .map_err(|e| CvEvaluatorError::Processing(e.to_string()))
        }) {
            Ok(text) => doc.text = text,
            Err(e) => {
                warn!("PDF text extraction failed: {}", e);
                doc.note(NoteKind::ExtractionFailed(e.to_string()));
            }
        }

        if let Some(pdf) = structure {
            let images = guarded(|| Ok(count_pdf_images(&pdf))).unwrap_or_else(|e| {
                warn!("PDF image scan failed: {}", e);
                0
            });
            if images > 0 {
                doc.note(NoteKind::ImageDetected(images));
            }
        }
        doc
    }
}

thread_local! {
    static IN_GUARDED_STEP: Cell<bool> = const { Cell::new(false) };
}

static QUIET_PARSER_PANICS: Once = Once::new();

/// Panics raised inside [`guarded`] go to the debug log instead of stderr;
/// every other panic still reaches the previous hook.
fn install_parser_panic_hook() {
    QUIET_PARSER_PANICS.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if IN_GUARDED_STEP.with(Cell::get) {
                debug!("Parser panicked: {}", info);
            } else {
                previous(info);
            }
        }));
    });
}

/// Runs a parser step, turning a panic inside a third-party parser into an error.
/// Whatever the step built is dropped on panic, so no broken state escapes.
fn guarded<T>(step: impl FnOnce() -> Result<T>) -> Result<T> {
    install_parser_panic_hook();
    IN_GUARDED_STEP.with(|flag| flag.set(true));
    let outcome = panic::catch_unwind(AssertUnwindSafe(step));
    IN_GUARDED_STEP.with(|flag| flag.set(false));
    outcome.unwrap_or_else(|_| {
        Err(CvEvaluatorError::Processing(
            "parser panicked on malformed input".to_string(),
        ))
    })
}

/// Counts image XObjects referenced from each page's resources. Pages whose
/// resources cannot be resolved contribute nothing.
fn count_pdf_images(pdf: &lopdf::Document) -> usize {
    pdf.get_pages()
        .values()
        .map(|&page_id| page_image_count(pdf, page_id).unwrap_or(0))
        .sum()
}

fn page_image_count(pdf: &lopdf::Document, page_id: ObjectId) -> lopdf::Result<usize> {
    let page = resolve_dict(pdf, pdf.get_object(page_id)?)?;
    let resources = resolve_dict(pdf, page.get(b"Resources")?)?;
    let xobjects = resolve_dict(pdf, resources.get(b"XObject")?)?;

    let count = xobjects
        .iter()
        .filter_map(|(_, entry)| resolve_dict(pdf, entry).ok())
        .filter(|dict| matches!(dict.get(b"Subtype"), Ok(Object::Name(name)) if name.as_slice() == b"Image"))
        .count();
    Ok(count)
}

fn resolve_dict<'a>(pdf: &'a lopdf::Document, object: &'a Object) -> lopdf::Result<&'a Dictionary> {
    let object = match object {
        Object::Reference(id) => pdf.get_object(*id)?,
        other => other,
    };
    match object {
        Object::Stream(stream) => Ok(&stream.dict),
        other => other.as_dict(),
    }
}
