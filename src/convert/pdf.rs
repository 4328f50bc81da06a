//! PDF passthrough converter.

use crate::detect::detect_format_from_bytes;
use crate::error::{Error, Result};
use std::path::Path;

use super::DocumentConverter;

/// Passes PDF input through unchanged after checking the header.
#[derive(Debug, Clone, Default)]
pub struct PdfPassthrough {
    _private: (),
}

impl PdfPassthrough {
    /// Create a new PDF passthrough.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentConverter for PdfPassthrough {
    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn name(&self) -> &str {
        "pdf"
    }

    fn convert(&self, path: &Path) -> Result<Vec<u8>> {
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        let bytes = std::fs::read(path)?;
        self.convert_bytes(&bytes, "pdf")
    }

    fn convert_bytes(&self, bytes: &[u8], _ext: &str) -> Result<Vec<u8>> {
        let format = detect_format_from_bytes(bytes)?;
        log::debug!("Passing through {} ({} bytes)", format, bytes.len());
        Ok(bytes.to_vec())
    }
}
