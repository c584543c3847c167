//! PDF merging operations.
//!
//! The server only depends on the [`MergePrimitive`] capability: append the
//! pages of each input, in the given order, to one output file. The
//! [`LopdfMerger`] implementation backs it with `lopdf`.
//!
//! # Examples
//!
//! ```no_run
//! use pdfmerge::merge::{LopdfMerger, MergePrimitive};
//! use std::path::{Path, PathBuf};
//!
//! # fn example() -> pdfmerge::Result<()> {
//! let inputs = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
//! let stats = LopdfMerger::new().merge(&inputs, Path::new("merged.pdf"))?;
//! println!("Merged {} pages", stats.total_pages);
//! # Ok(())
//! # }
//! ```

pub mod merger;

pub use merger::Merger;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::{MergeError, Result};
use crate::io::{PdfWriter, WriteOptions};
use crate::utils::format_file_size;

/// Statistics about a merge operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeStatistics {
    /// Number of PDFs merged.
    pub files_merged: usize,

    /// Total number of pages in merged document.
    pub total_pages: usize,

    /// Page count of every input, in merge order.
    pub pages_per_file: Vec<usize>,

    /// Total time taken for merge and write.
    pub merge_time: Duration,

    /// Total size of input files.
    pub input_size: u64,

    /// Size of the written output.
    pub output_size: u64,
}

impl MergeStatistics {
    /// Format input size as human-readable string.
    pub fn format_input_size(&self) -> String {
        format_file_size(self.input_size)
    }

    /// Format output size as human-readable string.
    pub fn format_output_size(&self) -> String {
        format_file_size(self.output_size)
    }
}

/// Concatenates the pages of several PDF files into one output file.
///
/// Implementations must append inputs strictly in slice order and preserve
/// each input's page order and content. The call is blocking.
pub trait MergePrimitive: Send + Sync {
    /// Merge `inputs` into a new file at `output`.
    ///
    /// # Errors
    ///
    /// Returns `NoFilesToMerge` for an empty slice, a load error for any
    /// unreadable input and `FailedToWrite` if the output cannot be written.
    /// The output path may hold a partial file after an error.
    fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<MergeStatistics>;
}

/// [`MergePrimitive`] backed by `lopdf`.
#[derive(Debug, Clone, Default)]
pub struct LopdfMerger {
    write_options: WriteOptions,
}

impl LopdfMerger {
    /// Create a merger that compresses its output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a merger with explicit write options.
    pub fn with_options(write_options: WriteOptions) -> Self {
        Self { write_options }
    }
}

impl MergePrimitive for LopdfMerger {
    fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<MergeStatistics> {
        if inputs.is_empty() {
            return Err(MergeError::NoFilesToMerge);
        }

        let start = Instant::now();

        let mut merger = Merger::new();
        for input in inputs {
            let pages = merger.add(input)?;
            tracing::debug!("Appended {} page(s) from {}", pages, input.display());
        }

        let files_merged = merger.files_merged();
        let total_pages = merger.total_pages();
        let pages_per_file = merger.page_counts().to_vec();
        let input_size = merger.input_size();

        let document = merger.finish()?;
        let write_stats =
            PdfWriter::with_options(self.write_options.clone()).save(document, output)?;

        Ok(MergeStatistics {
            files_merged,
            total_pages,
            pages_per_file,
            merge_time: start.elapsed(),
            input_size,
            output_size: write_stats.file_size,
        })
    }
}
