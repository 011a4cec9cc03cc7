// PDF loading and text extraction

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Used when the document has no usable file name
const FALLBACK_NAME: &str = "pdf_speech";

/// The document could not be read or parsed
#[derive(Debug, Error)]
#[error("Error extracting text from {}: {message}", .path.display())]
pub struct ExtractionError {
    pub path: PathBuf,
    pub message: String,
}

impl ExtractionError {
    pub fn new(path: &Path, message: impl ToString) -> Self {
        Self {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}

/// Text extracted from a source PDF
#[derive(Debug, Clone)]
pub struct Document {
    /// Where the PDF was read from
    pub path: PathBuf,
    /// Display name (file name including extension), if available
    pub name: Option<String>,
    /// Full extracted text
    pub text: String,
}

impl Document {
    pub fn new(path: PathBuf, text: String) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .filter(|n| !n.trim().is_empty());
        Self { path, name, text }
    }

    /// Number of characters of extracted text
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Output file name: the document name with ".pdf" removed, plus ".mp3"
    pub fn output_file_name(&self) -> String {
        let name = self.name.as_deref().unwrap_or(FALLBACK_NAME);
        format!("{}.mp3", strip_pdf_suffix(name))
    }
}

/// Extract text from a PDF file.
///
/// This is CPU-bound and blocking; async callers should run it on a blocking thread.
pub fn extract_text(path: &Path) -> Result<Document, ExtractionError> {
    let bytes = std::fs::read(path).map_err(|e| ExtractionError::new(path, e))?;
    let text =
        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| ExtractionError::new(path, e))?;
    Ok(Document::new(path.to_path_buf(), text))
}

/// Remove every ".pdf" occurrence, ignoring case
fn strip_pdf_suffix(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    let mut result = String::with_capacity(name.len());
    let mut rest = 0;

    while let Some(pos) = lower[rest..].find(".pdf") {
        result.push_str(&name[rest..rest + pos]);
        rest += pos + ".pdf".len();
    }
    result.push_str(&name[rest..]);

    if result.trim().is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        result
    }
}
