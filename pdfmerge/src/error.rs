//! Error types for pdfmerge.
//!
//! Every fallible operation in the library returns [`MergeError`]. The HTTP
//! layer decides how each variant is reported to the requester: errors the
//! requester caused are echoed back, everything else becomes a generic
//! failure and is only logged.
//!
//! # Error Categories
//!
//! - **Upload Errors**: too many parts, unexpected fields, malformed bodies
//! - **PDF Errors**: unreadable, encrypted or page-less documents
//! - **Output Errors**: the merged document could not be written
//! - **Client Errors**: empty selections, transport failures, non-success responses

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfmerge operations.
pub type Result<T> = std::result::Result<T, MergeError>;

/// Main error type for pdfmerge operations.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// No files were provided for merging.
    #[error("No PDF files to merge")]
    NoFilesToMerge,

    /// The upload carried more file parts than allowed.
    #[error("Too many files: at most {limit} PDFs can be merged at once")]
    TooManyFiles {
        /// Maximum number of file parts accepted per request.
        limit: usize,
    },

    /// A file part arrived under a field other than the expected one.
    #[error("Unexpected file field '{name}'")]
    UnexpectedField {
        /// Name of the offending multipart field.
        name: String,
    },

    /// Failed to load PDF file.
    #[error("Failed to load PDF: {}\n  Reason: {reason}", .path.display())]
    FailedToLoadPdf {
        /// Path to the PDF file.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// PDF file is corrupted or has invalid structure.
    #[error("Corrupted or invalid PDF: {}\n  Details: {details}", .path.display())]
    CorruptedPdf {
        /// Path to the corrupted PDF.
        path: PathBuf,
        /// Details about the corruption.
        details: String,
    },

    /// PDF file is encrypted and cannot be processed.
    #[error("PDF is encrypted and cannot be processed: {}", .path.display())]
    EncryptedPdf {
        /// Path to the encrypted PDF.
        path: PathBuf,
    },

    /// Merge operation failed.
    #[error("Merge operation failed: {reason}")]
    MergeFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// Failed to write the merged output.
    #[error("Failed to write output file: {}\n  Reason: {source}", .path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The multipart body could not be read.
    #[error("Invalid upload: {reason}")]
    Upload {
        /// Description of the malformed input.
        reason: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// A submission was attempted with nothing selected.
    #[error("Please choose at least one PDF")]
    EmptySelection,

    /// The merge request could not be sent or its response not read.
    #[error("Request failed: {reason}")]
    Request {
        /// Transport level failure description.
        reason: String,
    },

    /// The server answered with a non-success status.
    #[error("Server responded with status {status}")]
    Server {
        /// HTTP status code returned by the server.
        status: u16,
    },

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<lopdf::Error> for MergeError {
    fn from(err: lopdf::Error) -> Self {
        Self::merge_failed(err.to_string())
    }
}

impl From<reqwest::Error> for MergeError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request {
            reason: err.to_string(),
        }
    }
}

impl MergeError {
    /// Create a FailedToLoadPdf error.
    pub fn failed_to_load_pdf(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::FailedToLoadPdf {
            path,
            reason: reason.into(),
        }
    }

    /// Create a CorruptedPdf error.
    pub fn corrupted_pdf(path: PathBuf, details: impl Into<String>) -> Self {
        Self::CorruptedPdf {
            path,
            details: details.into(),
        }
    }

    /// Create an EncryptedPdf error.
    pub fn encrypted_pdf(path: PathBuf) -> Self {
        Self::EncryptedPdf { path }
    }

    /// Create a MergeFailed error.
    pub fn merge_failed(reason: impl Into<String>) -> Self {
        Self::MergeFailed {
            reason: reason.into(),
        }
    }

    /// Create an Upload error.
    pub fn upload(reason: impl Into<String>) -> Self {
        Self::Upload {
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Whether the requester caused this error.
    ///
    /// These are reported back verbatim; all other errors are treated as
    /// internal processing failures.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NoFilesToMerge
                | Self::TooManyFiles { .. }
                | Self::UnexpectedField { .. }
                | Self::Upload { .. }
                | Self::EmptySelection
        )
    }
}
