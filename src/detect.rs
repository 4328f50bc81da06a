//! Input format detection and validation.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// PDF format information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfFormat {
    /// PDF version (e.g., "1.7", "2.0")
    pub version: String,
}

impl std::fmt::Display for PdfFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

/// Kind of document handed to the reformatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// PDF document
    Pdf,
    /// Legacy Word binary document (OLE2 container)
    Doc,
    /// Office Open XML document (ZIP container)
    Docx,
    /// Plain text
    Text,
}

impl InputKind {
    /// Whether the input must go through the word converter first.
    pub fn needs_conversion(self) -> bool {
        matches!(self, InputKind::Doc | InputKind::Docx)
    }
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// OLE2 compound file signature (.doc)
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// ZIP local file header signature (.docx)
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

const SNIFF_LEN: usize = 16;

/// Detect PDF format from a file path.
///
/// # Example
/// ```no_run
/// use a5kit::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("document.pdf").unwrap();
/// println!("PDF version: {}", format.version);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<PdfFormat> {
    let header = read_header(path.as_ref())?;
    detect_format_from_bytes(&header)
}

/// Detect PDF format from bytes.
///
/// # Returns
/// * `Ok(PdfFormat)` if the data starts with valid PDF header
/// * `Err(Error::UnknownFormat)` if the data is not a PDF
pub fn detect_format_from_bytes(data: &[u8]) -> Result<PdfFormat> {
    if data.len() < PDF_MAGIC_LEN + VERSION_LEN {
        return Err(Error::UnknownFormat);
    }

    if !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version_bytes = &data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::UnsupportedVersion(version));
    }

    Ok(PdfFormat { version })
}

/// Check if a version string is valid.
fn is_valid_version(version: &str) -> bool {
    if version.len() != 3 {
        return false;
    }

    let chars: Vec<char> = version.chars().collect();
    chars[0].is_ascii_digit() && chars[1] == '.' && chars[2].is_ascii_digit()
}

/// Check if bytes represent a valid PDF.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}

/// Detect the input kind of a file.
///
/// Magic bytes win over the extension; the extension decides for plain
/// text, which has no signature. A missing file is [`Error::NotFound`].
pub fn detect_input_kind<P: AsRef<Path>>(path: P) -> Result<InputKind> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }

    let header = read_header(path)?;
    if let Some(kind) = sniff_bytes(&header) {
        return Ok(kind);
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "txt" | "text" | "md" => Ok(InputKind::Text),
        "pdf" => Err(Error::UnknownFormat),
        "doc" | "docx" => Err(Error::UnsupportedInput(format!(
            "{} does not look like a Word document",
            path.display()
        ))),
        _ => Err(Error::UnsupportedInput(format!(
            "cannot process {} (expected PDF, DOC, DOCX or text)",
            path.display()
        ))),
    }
}

/// Identify a document kind from its leading bytes.
pub fn sniff_bytes(data: &[u8]) -> Option<InputKind> {
    if is_pdf_bytes(data) {
        Some(InputKind::Pdf)
    } else if data.starts_with(OLE_MAGIC) {
        Some(InputKind::Doc)
    } else if data.starts_with(ZIP_MAGIC) {
        Some(InputKind::Docx)
    } else {
        None
    }
}

fn read_header(path: &Path) -> Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut header = Vec::with_capacity(SNIFF_LEN);
    file.take(SNIFF_LEN as u64).read_to_end(&mut header)?;
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_detect_valid_pdf() {
        let data = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3";
        let format = detect_format_from_bytes(data).unwrap();
        assert_eq!(format.version, "1.7");
    }

    #[test]
    fn test_detect_invalid_format() {
        let result = detect_format_from_bytes(b"<!DOCTYPE html>");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_detect_too_short() {
        let result = detect_format_from_bytes(b"%PDF");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_version_validation() {
        assert!(is_valid_version("1.0"));
        assert!(is_valid_version("2.0"));
        assert!(!is_valid_version("10.0"));
        assert!(!is_valid_version("abc"));
    }

    #[test]
    fn test_sniff_bytes() {
        assert_eq!(sniff_bytes(b"%PDF-1.4\n"), Some(InputKind::Pdf));
        assert_eq!(sniff_bytes(OLE_MAGIC), Some(InputKind::Doc));
        assert_eq!(sniff_bytes(b"PK\x03\x04\x14\x00"), Some(InputKind::Docx));
        assert_eq!(sniff_bytes(b"hello world"), None);
    }

    #[test]
    fn test_detect_input_kind_missing_file() {
        let result = detect_input_kind("/definitely/not/here.pdf");
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_detect_input_kind_text_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(b"Just some words.").unwrap();
        assert_eq!(detect_input_kind(file.path()).unwrap(), InputKind::Text);
    }

    #[test]
    fn test_detect_input_kind_magic_beats_extension() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(b"%PDF-1.5\n%....").unwrap();
        assert_eq!(detect_input_kind(file.path()).unwrap(), InputKind::Pdf);
        assert!(InputKind::Docx.needs_conversion());
        assert!(!InputKind::Pdf.needs_conversion());
    }
}
