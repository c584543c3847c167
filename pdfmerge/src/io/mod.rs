//! I/O operations for pdfmerge.
//!
//! This module handles PDF file I/O:
//! - Loading PDF documents from disk
//! - Writing merged PDFs to disk

pub mod reader;
pub mod writer;

pub use reader::{LoadedPdf, PdfReader};
pub use writer::{PdfWriter, WriteOptions, WriteStatistics};
