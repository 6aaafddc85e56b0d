//! Document text extraction.
//!
//! [`DocumentLoader`] is the seam between the worker pool and file formats.
//! [`FormatLoader`] is the default implementation:
//! - PDF documents (via pdf-extract, behind the `pdf` feature)
//! - Word documents (via docx-rs, with a zip/XML fallback)
//! - Other OOXML and ODF containers (via zip + XML stripping)
//! - RTF and legacy binary Office files (via [`super::markup`])
//! - Everything else as raw bytes
//!
//! Any format-specific failure, or a format that yields no words, falls back
//! to tokenizing the raw bytes.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

use super::markup;
use super::path_utils::lower_extension;
use crate::text::{DocumentStatistics, Tokenizer};

/// Errors that can occur during document text extraction.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// An error occurred during PDF extraction.
    #[error("Failed to extract text from PDF {path}: {message}")]
    PdfError {
        /// Path to the PDF file
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// An error occurred during DOCX extraction.
    #[error("Failed to extract text from DOCX {path}: {message}")]
    DocxError {
        /// Path to the DOCX file
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// The zip container could not be opened.
    #[error("Failed to open archive {path}: {message}")]
    ArchiveError {
        /// Path to the container
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// The file does not carry the signature its extension promises.
    #[error("{path} does not look like a {format} file")]
    SignatureMismatch {
        /// Path to the file
        path: PathBuf,
        /// Expected format
        format: &'static str,
    },

    /// Support for this format was not compiled in.
    #[error("{format} extraction is not available in this build")]
    Unavailable {
        /// Format name
        format: &'static str,
    },

    /// The extractor ran but produced no countable words.
    #[error("No text extracted from {0}")]
    NoText(PathBuf),
}

impl DocumentError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Flags honoured by [`FormatLoader`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Serialize all PDF extraction behind one process-wide lock.
    pub safe_mode: bool,
    /// Skip format detection and tokenize raw bytes.
    pub raw_only: bool,
}

/// Turns a file into token statistics.
///
/// Implementations are shared between worker threads and must be
/// thread-safe.
pub trait DocumentLoader: Send + Sync {
    /// Load `path`. The returned statistics may be empty.
    fn load(&self, path: &Path) -> Result<DocumentStatistics, DocumentError>;
}

/// Families of formats with a dedicated extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Pdf,
    Rtf,
    WordXml,
    PresentationXml,
    SpreadsheetXml,
    OpenDocument,
    LegacyOffice,
}

impl Format {
    fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "pdf" => Some(Self::Pdf),
            "rtf" => Some(Self::Rtf),
            "docx" | "docm" | "dotx" | "dotm" => Some(Self::WordXml),
            "pptx" | "pptm" | "potx" | "potm" | "ppsx" | "ppsm" => Some(Self::PresentationXml),
            "xlsx" | "xlsm" | "xltx" | "xltm" => Some(Self::SpreadsheetXml),
            "odt" | "ods" | "odp" => Some(Self::OpenDocument),
            "doc" | "dot" | "xls" | "xlt" | "ppt" | "pps" | "pot" => Some(Self::LegacyOffice),
            _ => None,
        }
    }

    /// Whether the zip member `name` (lowercased) carries document text.
    fn wants_member(self, name: &str) -> bool {
        match self {
            Self::WordXml => {
                matches!(
                    name,
                    "word/document.xml" | "word/footnotes.xml" | "word/endnotes.xml"
                ) || name.starts_with("word/header")
                    || name.starts_with("word/footer")
            }
            Self::PresentationXml => {
                name.starts_with("ppt/slides/") || name.starts_with("ppt/notesslides/")
            }
            Self::SpreadsheetXml => {
                name == "xl/sharedstrings.xml" || name.starts_with("xl/worksheets/")
            }
            Self::OpenDocument => name == "content.xml" || name == "styles.xml",
            Self::Pdf | Self::Rtf | Self::LegacyOffice => false,
        }
    }
}

const PDF_SIGNATURE: &[u8] = b"%PDF-";
const ZIP_SIGNATURE: &[u8] = b"PK";

/// Default [`DocumentLoader`]: format detection by extension with raw fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatLoader {
    options: LoadOptions,
}

impl FormatLoader {
    /// Create a loader with the given options.
    #[must_use]
    pub fn new(options: LoadOptions) -> Self {
        Self { options }
    }

    /// Options this loader was built with.
    #[must_use]
    pub fn options(&self) -> LoadOptions {
        self.options
    }

    /// Tokenize the raw bytes of `path`.
    pub fn load_raw(path: &Path) -> Result<DocumentStatistics, DocumentError> {
        let mut file = File::open(path).map_err(|e| DocumentError::io(path, e))?;
        let mut stats = DocumentStatistics::new();
        let mut tokenizer = Tokenizer::new(&mut stats);
        io::copy(&mut file, &mut tokenizer).map_err(|e| DocumentError::io(path, e))?;
        tokenizer.finish();
        Ok(stats)
    }

    fn extract(&self, path: &Path, format: Format) -> Result<DocumentStatistics, DocumentError> {
        let stats = match format {
            Format::Pdf => {
                require_signature(path, PDF_SIGNATURE, "PDF")?;
                DocumentStatistics::from_text(&self.extract_pdf(path)?)
            }
            Format::Rtf => stats_from_bytes(&markup::rtf_text(&read_all(path)?)),
            Format::WordXml => {
                require_signature(path, ZIP_SIGNATURE, "zip")?;
                extract_word(path)?
            }
            Format::PresentationXml | Format::SpreadsheetXml | Format::OpenDocument => {
                require_signature(path, ZIP_SIGNATURE, "zip")?;
                extract_zip_xml(path, |name| format.wants_member(name))?
            }
            Format::LegacyOffice => stats_from_bytes(&markup::binary_text(&read_all(path)?)),
        };
        if stats.is_empty() {
            return Err(DocumentError::NoText(path.to_path_buf()));
        }
        Ok(stats)
    }

    #[cfg(feature = "pdf")]
    fn extract_pdf(&self, path: &Path) -> Result<String, DocumentError> {
        let bytes = read_all(path)?;
        let pdf_error = |message: String| DocumentError::PdfError {
            path: path.to_path_buf(),
            message,
        };
        let extracted = with_pdf_lock(self.options.safe_mode, || {
            std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(&bytes))
        });
        match extracted {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(pdf_error(e.to_string())),
            Err(_) => Err(pdf_error("extractor panicked".to_string())),
        }
    }

    #[cfg(not(feature = "pdf"))]
    fn extract_pdf(&self, _path: &Path) -> Result<String, DocumentError> {
        Err(DocumentError::Unavailable { format: "PDF" })
    }
}

impl DocumentLoader for FormatLoader {
    fn load(&self, path: &Path) -> Result<DocumentStatistics, DocumentError> {
        if self.options.raw_only {
            return Self::load_raw(path);
        }
        if let Some(format) = Format::from_extension(&lower_extension(path)) {
            match self.extract(path, format) {
                Ok(stats) => return Ok(stats),
                Err(e) => log::debug!("{}; falling back to raw bytes", e),
            }
        }
        Self::load_raw(path)
    }
}

#[cfg_attr(not(feature = "pdf"), allow(dead_code))]
static PDF_LOCK: Mutex<()> = Mutex::new(());

/// Run `f`, holding the process-wide PDF lock when `safe` is set.
#[cfg_attr(not(feature = "pdf"), allow(dead_code))]
fn with_pdf_lock<T>(safe: bool, f: impl FnOnce() -> T) -> T {
    let _guard = safe.then(|| PDF_LOCK.lock().unwrap_or_else(PoisonError::into_inner));
    f()
}

fn read_all(path: &Path) -> Result<Vec<u8>, DocumentError> {
    fs::read(path).map_err(|e| DocumentError::io(path, e))
}

fn stats_from_bytes(bytes: &[u8]) -> DocumentStatistics {
    let mut stats = DocumentStatistics::new();
    let mut tokenizer = Tokenizer::new(&mut stats);
    tokenizer.add_chunk(bytes);
    tokenizer.finish();
    stats
}

/// Check that `path` starts with `signature`.
fn require_signature(
    path: &Path,
    signature: &[u8],
    format: &'static str,
) -> Result<(), DocumentError> {
    let file = File::open(path).map_err(|e| DocumentError::io(path, e))?;
    let mut head = Vec::with_capacity(signature.len());
    file.take(signature.len() as u64)
        .read_to_end(&mut head)
        .map_err(|e| DocumentError::io(path, e))?;
    if head == signature {
        Ok(())
    } else {
        Err(DocumentError::SignatureMismatch {
            path: path.to_path_buf(),
            format,
        })
    }
}

const WORD_BODY_MEMBER: &str = "word/document.xml";

/// Word body text through docx-rs, headers, footers and notes through the
/// zip/XML path. The whole container goes through zip/XML when docx-rs
/// fails or finds no body text.
fn extract_word(path: &Path) -> Result<DocumentStatistics, DocumentError> {
    let body = match extract_docx(path) {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => return extract_zip_xml(path, |name| Format::WordXml.wants_member(name)),
        Err(e) => {
            log::debug!("{}; retrying as plain zip/XML", e);
            return extract_zip_xml(path, |name| Format::WordXml.wants_member(name));
        }
    };
    let mut stats = extract_zip_xml(path, |name| {
        name != WORD_BODY_MEMBER && Format::WordXml.wants_member(name)
    })?;
    stats.add_text(&body);
    Ok(stats)
}

/// Extract body paragraph and table text from a Word document.
fn extract_docx(path: &Path) -> Result<String, DocumentError> {
    let bytes = read_all(path)?;
    let docx = docx_rs::read_docx(&bytes).map_err(|e| DocumentError::DocxError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut text = String::new();
    for child in &docx.document.children {
        docx_child_text(child, &mut text);
    }
    Ok(text)
}

fn docx_run_text(run: &docx_rs::Run, text: &mut String) {
    for child in &run.children {
        match child {
            docx_rs::RunChild::Text(t) => text.push_str(&t.text),
            docx_rs::RunChild::Tab(_) | docx_rs::RunChild::PTab(_) => text.push('\t'),
            docx_rs::RunChild::Break(_) | docx_rs::RunChild::CarriageReturn(_) => {
                text.push('\n');
            }
            _ => {}
        }
    }
}

// Deleted and moved-away runs are not part of the visible text.
fn docx_inline_text(child: &docx_rs::ParagraphChild, text: &mut String) {
    match child {
        docx_rs::ParagraphChild::Run(run) => docx_run_text(run, text),
        docx_rs::ParagraphChild::Hyperlink(link) => {
            for child in &link.children {
                docx_inline_text(child, text);
            }
        }
        docx_rs::ParagraphChild::Insert(insert) => {
            for child in &insert.children {
                if let docx_rs::InsertChild::Run(run) = child {
                    docx_run_text(run, text);
                }
            }
        }
        docx_rs::ParagraphChild::MoveTo(moved) => {
            for child in &moved.children {
                if let docx_rs::MoveToChild::Run(run) = child {
                    docx_run_text(run, text);
                }
            }
        }
        docx_rs::ParagraphChild::StructuredDataTag(tag) => docx_tag_text(tag, text),
        _ => {}
    }
}

fn docx_paragraph_text(paragraph: &docx_rs::Paragraph, text: &mut String) {
    for child in &paragraph.children {
        docx_inline_text(child, text);
    }
    text.push('\n');
}

fn docx_tag_text(tag: &docx_rs::StructuredDataTag, text: &mut String) {
    for child in &tag.children {
        match child {
            docx_rs::StructuredDataTagChild::Run(run) => docx_run_text(run, text),
            docx_rs::StructuredDataTagChild::Paragraph(p) => docx_paragraph_text(p, text),
            docx_rs::StructuredDataTagChild::Table(t) => docx_table_text(t, text),
            docx_rs::StructuredDataTagChild::StructuredDataTag(inner) => {
                docx_tag_text(inner, text);
            }
            _ => {}
        }
    }
}

fn docx_table_text(table: &docx_rs::Table, text: &mut String) {
    for row_child in &table.rows {
        let docx_rs::TableChild::TableRow(row) = row_child;
        for cell_child in &row.cells {
            let docx_rs::TableRowChild::TableCell(cell) = cell_child;
            for content in &cell.children {
                match content {
                    docx_rs::TableCellContent::Paragraph(p) => docx_paragraph_text(p, text),
                    docx_rs::TableCellContent::Table(t) => docx_table_text(t, text),
                    docx_rs::TableCellContent::StructuredDataTag(tag) => docx_tag_text(tag, text),
                    _ => {}
                }
            }
        }
    }
}

fn docx_child_text(child: &docx_rs::DocumentChild, text: &mut String) {
    match child {
        docx_rs::DocumentChild::Paragraph(p) => docx_paragraph_text(p, text),
        docx_rs::DocumentChild::Table(t) => docx_table_text(t, text),
        docx_rs::DocumentChild::StructuredDataTag(tag) => docx_tag_text(tag, text),
        _ => {}
    }
}

/// Tokenize the XML members of a zip container whose lowercased names pass
/// `wants`.
fn extract_zip_xml(
    path: &Path,
    wants: impl Fn(&str) -> bool,
) -> Result<DocumentStatistics, DocumentError> {
    let archive_error = |message: String| DocumentError::ArchiveError {
        path: path.to_path_buf(),
        message,
    };
    let file = File::open(path).map_err(|e| DocumentError::io(path, e))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| archive_error(e.to_string()))?;

    let mut stats = DocumentStatistics::new();
    let mut tokenizer = Tokenizer::new(&mut stats);
    let mut member = Vec::new();
    let mut text = Vec::new();
    for index in 0..archive.len() {
        let mut entry = match archive.by_index(index) {
            Ok(entry) => entry,
            Err(e) => {
                log::debug!("{}: skipping zip member {}: {}", path.display(), index, e);
                continue;
            }
        };
        if entry.is_dir() || !wants(&entry.name().to_ascii_lowercase()) {
            continue;
        }
        member.clear();
        if let Err(e) = entry.read_to_end(&mut member) {
            log::debug!("{}: unreadable member {}: {}", path.display(), entry.name(), e);
            continue;
        }
        text.clear();
        markup::xml_text(&member, &mut text);
        tokenizer.add_chunk(&text);
        // Members never run together into one token
        tokenizer.add_chunk(b"\n");
    }
    tokenizer.finish();
    Ok(stats)
}
