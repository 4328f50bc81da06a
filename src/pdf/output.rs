//! Finished output documents.

use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};
use crate::geometry::PageSize;

/// A serialized output PDF together with the size of each of its pages.
#[derive(Debug, Clone)]
pub struct OutputDocument {
    pages: Vec<PageSize>,
    data: Vec<u8>,
}

impl OutputDocument {
    pub(crate) fn new(pages: Vec<PageSize>, data: Vec<u8>) -> Self {
        Self { pages, data }
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Size of every page, in order.
    pub fn page_sizes(&self) -> &[PageSize] {
        &self.pages
    }

    /// The PDF bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the document and return the PDF bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Write the PDF to `path` with [`write_atomic`].
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        write_atomic(path, &self.data)?;

        log::info!(
            "Wrote {} page(s), {} bytes to {}",
            self.page_count(),
            self.data.len(),
            path.display()
        );
        Ok(())
    }
}

/// Write `data` to `path` through a temporary file in the same directory.
///
/// The file is renamed into place once complete, so the destination either
/// keeps its old content or holds all of `data`.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = tempfile::Builder::new()
        .prefix(".a5kit-")
        .suffix(".part")
        .tempfile_in(dir)?;
    file.write_all(data)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
