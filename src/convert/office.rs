//! Word-processor documents to PDF through LibreOffice.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::DocumentConverter;
use crate::detect::detect_format_from_bytes;
use crate::error::{Error, Result};

/// Converts DOC, DOCX, ODT and RTF files by running LibreOffice headless.
///
/// Output goes to a temporary directory that is removed before returning,
/// whether the conversion succeeded or not. Single attempt, no retry.
#[derive(Debug, Clone)]
pub struct OfficeConverter {
    binary: PathBuf,
}

impl OfficeConverter {
    /// Create a converter, searching `PATH` for `soffice`, then `libreoffice`.
    pub fn new() -> Self {
        let binary = which::which("soffice")
            .or_else(|_| which::which("libreoffice"))
            .unwrap_or_else(|_| PathBuf::from("soffice"));
        Self { binary }
    }

    /// Use a specific LibreOffice binary.
    #[must_use]
    pub fn with_binary(mut self, path: impl Into<PathBuf>) -> Self {
        self.binary = path.into();
        self
    }

    /// The binary that will be invoked.
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn build_args(input: &Path, outdir: &Path) -> Vec<String> {
        vec![
            "--headless".to_string(),
            "--convert-to".to_string(),
            "pdf".to_string(),
            "--outdir".to_string(),
            outdir.to_string_lossy().into_owned(),
            input.to_string_lossy().into_owned(),
        ]
    }

    fn run(&self, input: &Path) -> Result<Vec<u8>> {
        let outdir = tempfile::Builder::new().prefix("a5kit-office-").tempdir()?;
        let args = Self::build_args(input, outdir.path());

        log::debug!("Running {} {}", self.binary.display(), args.join(" "));
        let output = Command::new(&self.binary)
            .args(&args)
            .output()
            .map_err(|e| {
                Error::ConversionFailed(format!("cannot run {}: {}", self.binary.display(), e))
            })?;

        if !output.status.success() {
            return Err(Error::ConversionFailed(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stem = input
            .file_stem()
            .ok_or_else(|| Error::ConversionFailed("input has no file name".to_string()))?;
        let mut name = stem.to_os_string();
        name.push(".pdf");
        let produced = outdir.path().join(name);
        let bytes = std::fs::read(&produced).map_err(|_| {
            Error::ConversionFailed(format!("no PDF produced for {}", input.display()))
        })?;

        detect_format_from_bytes(&bytes).map_err(|_| {
            Error::ConversionFailed(format!("output for {} is not a PDF", input.display()))
        })?;

        log::info!("Converted {} to PDF ({} bytes)", input.display(), bytes.len());
        Ok(bytes)
    }
}

impl Default for OfficeConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentConverter for OfficeConverter {
    fn supported_extensions(&self) -> &[&str] {
        &["doc", "docx", "odt", "rtf"]
    }

    fn name(&self) -> &str {
        "office"
    }

    fn convert(&self, path: &Path) -> Result<Vec<u8>> {
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        self.run(path)
    }

    fn convert_bytes(&self, bytes: &[u8], ext: &str) -> Result<Vec<u8>> {
        let mut input = tempfile::Builder::new()
            .prefix("a5kit-in-")
            .suffix(&format!(".{}", ext.to_lowercase()))
            .tempfile()?;
        input.write_all(bytes)?;
        input.flush()?;
        self.run(input.path())
    }
}
