//! PDF reading and loading operations.
//!
//! Loading is blocking work. Callers on the async runtime run it through
//! `tokio::task::spawn_blocking`.
//!
//! # Examples
//!
//! ```no_run
//! use pdfmerge::io::PdfReader;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = PdfReader::new();
//! let loaded = reader.load(Path::new("a.pdf"))?;
//! println!("{} pages", loaded.page_count);
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::{MergeError, Result};

/// A loaded PDF document with metadata.
#[derive(Debug)]
pub struct LoadedPdf {
    /// The PDF document.
    pub document: Document,

    /// Path to the source file.
    pub path: PathBuf,

    /// Number of pages in the document.
    pub page_count: usize,

    /// Time taken to load the document.
    pub load_time: Duration,

    /// File size in bytes.
    pub file_size: u64,
}

impl LoadedPdf {
    fn new(document: Document, path: PathBuf, load_time: Duration) -> Self {
        let page_count = document.get_pages().len();
        let file_size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

        Self {
            document,
            path,
            page_count,
            load_time,
            file_size,
        }
    }
}

/// Loads PDF documents from disk.
#[derive(Debug, Clone, Default)]
pub struct PdfReader;

impl PdfReader {
    /// Create a new PDF reader.
    pub fn new() -> Self {
        Self
    }

    /// Load a single PDF document.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - File cannot be read or is not a valid PDF
    /// - PDF is encrypted
    /// - PDF has no pages
    pub fn load(&self, path: &Path) -> Result<LoadedPdf> {
        let path_buf = path.to_path_buf();
        let start = Instant::now();

        let doc = Document::load(&path_buf).map_err(|e| {
            let err_msg = e.to_string();
            if err_msg.contains("encrypt") || err_msg.contains("password") {
                MergeError::encrypted_pdf(path_buf.clone())
            } else {
                MergeError::failed_to_load_pdf(path_buf.clone(), err_msg)
            }
        })?;

        if doc.get_pages().is_empty() {
            return Err(MergeError::corrupted_pdf(path_buf, "PDF has no pages"));
        }

        Ok(LoadedPdf::new(doc, path_buf, start.elapsed()))
    }

    /// Count the pages of a PDF held in memory.
    pub fn page_count_of(bytes: &[u8]) -> Result<usize> {
        let doc = Document::load_mem(bytes)?;
        Ok(doc.get_pages().len())
    }
}
