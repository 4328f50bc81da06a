//! Conversion shim: normalize input documents to PDF bytes.
//!
//! Converters are registered per file extension. PDF input passes through
//! after validation; word-processor documents are handed to an external
//! converter (LibreOffice by default).
//!
//! # Example
//!
//! ```no_run
//! use a5kit::convert::{ConverterRegistry, OfficeConverter};
//! use std::sync::Arc;
//! use std::path::Path;
//!
//! fn main() -> a5kit::Result<()> {
//!     let mut registry = ConverterRegistry::new();
//!     registry.register(Arc::new(OfficeConverter::new()));
//!
//!     let pdf = registry.convert(Path::new("letter.docx"))?;
//!     println!("{} bytes of PDF", pdf.len());
//!     Ok(())
//! }
//! ```

mod office;
mod pdf;

pub use office::OfficeConverter;
pub use pdf::PdfPassthrough;

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Trait for document-to-PDF converters.
///
/// Implement this trait to add support for a new input format.
pub trait DocumentConverter: Send + Sync {
    /// Get the supported file extensions for this converter.
    ///
    /// Extensions should be lowercase without the leading dot (e.g., `["docx"]`).
    fn supported_extensions(&self) -> &[&str];

    /// Get the name of this converter.
    fn name(&self) -> &str;

    /// Convert the file at `path` to PDF bytes.
    fn convert(&self, path: &Path) -> Result<Vec<u8>>;

    /// Convert in-memory document bytes of type `ext` to PDF bytes.
    fn convert_bytes(&self, bytes: &[u8], ext: &str) -> Result<Vec<u8>>;

    /// Check if this converter supports the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }
}

/// Registry for document converters.
///
/// The registry maps file extensions to converters and provides
/// convenient methods for converting documents.
pub struct ConverterRegistry {
    converters: HashMap<String, Arc<dyn DocumentConverter>>,
    by_name: HashMap<String, Arc<dyn DocumentConverter>>,
}

impl ConverterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            converters: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with default converters (PDF passthrough and
    /// LibreOffice for word-processor formats).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PdfPassthrough::new()));
        registry.register(Arc::new(OfficeConverter::new()));
        registry
    }

    /// Register a converter.
    ///
    /// The converter will be registered for all its supported extensions,
    /// replacing any earlier converter for the same extension.
    pub fn register(&mut self, converter: Arc<dyn DocumentConverter>) {
        for ext in converter.supported_extensions() {
            self.converters
                .insert(ext.to_lowercase(), converter.clone());
        }
        self.by_name
            .insert(converter.name().to_lowercase(), converter);
    }

    /// Get a converter by file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn DocumentConverter>> {
        self.converters.get(&ext.to_lowercase()).cloned()
    }

    /// Get a converter by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn DocumentConverter>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.converters.contains_key(&ext.to_lowercase())
    }

    /// Get all supported extensions.
    pub fn supported_extensions(&self) -> Vec<&str> {
        self.converters.keys().map(|s| s.as_str()).collect()
    }

    /// Convert a file using the converter for its extension.
    pub fn convert(&self, path: &Path) -> Result<Vec<u8>> {
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| {
                Error::UnsupportedInput(format!("{} has no extension", path.display()))
            })?;

        let converter = self.get_by_extension(ext).ok_or_else(|| {
            Error::UnsupportedInput(format!("no converter for extension: {}", ext))
        })?;

        log::info!("Converting {} with {}", path.display(), converter.name());
        converter.convert(path)
    }

    /// Convert bytes using the specified extension to determine the converter.
    pub fn convert_bytes(&self, bytes: &[u8], ext: &str) -> Result<Vec<u8>> {
        let converter = self.get_by_extension(ext).ok_or_else(|| {
            Error::UnsupportedInput(format!("no converter for extension: {}", ext))
        })?;

        converter.convert_bytes(bytes, ext)
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Convert a word-processor document to PDF bytes with LibreOffice.
///
/// A single attempt: failures surface as [`Error::ConversionFailed`] and
/// nothing is left behind.
pub fn word_to_pdf<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    OfficeConverter::new().convert(path.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_with_defaults() {
        let registry = ConverterRegistry::with_defaults();
        assert!(registry.supports("pdf"));
        assert!(registry.supports("PDF"));
        assert!(registry.supports("docx"));
        assert!(registry.supports("doc"));
        assert!(!registry.supports("xlsx"));
    }

    #[test]
    fn test_registry_get_by_extension() {
        let registry = ConverterRegistry::with_defaults();
        let converter = registry.get_by_extension("pdf");
        assert!(converter.is_some());
        assert_eq!(converter.unwrap().name(), "pdf");
        assert_eq!(registry.get_by_extension("docx").unwrap().name(), "office");
    }

    #[test]
    fn test_registry_get_by_name() {
        let registry = ConverterRegistry::with_defaults();
        assert!(registry.get_by_name("pdf").is_some());
        assert!(registry.get_by_name("OFFICE").is_some());
    }

    #[test]
    fn test_registry_convert_missing_file() {
        let registry = ConverterRegistry::with_defaults();
        let result = registry.convert(Path::new("/no/such/file.docx"));
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
