//! pdfmerge - Merge uploaded PDF files into a single document, in order.
//!
//! This library provides both sides of a small web utility:
//!
//! - An HTTP server whose `POST /merge` endpoint accepts up to ten PDFs as
//!   multipart `pdfs` parts and answers with the merged document
//! - An ordered [`selection::Selection`] model and a [`client::MergeClient`]
//!   that submits it
//! - The page-concatenation primitive itself, backed by `lopdf`
//!
//! Uploaded parts and merged output only live for the duration of one
//! request; they are removed on every exit path.
//!
//! # Examples
//!
//! ## Running the server
//!
//! ```no_run
//! use pdfmerge::ServerConfig;
//!
//! # async fn example() -> pdfmerge::Result<()> {
//! let config = ServerConfig {
//!     port: 8080,
//!     ..ServerConfig::from_env()
//! };
//! pdfmerge::server::serve(config).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Merging files directly
//!
//! ```no_run
//! use pdfmerge::merge::{LopdfMerger, MergePrimitive};
//! use std::path::{Path, PathBuf};
//!
//! # fn example() -> pdfmerge::Result<()> {
//! let inputs = [PathBuf::from("cover.pdf"), PathBuf::from("report.pdf")];
//! let stats = LopdfMerger::new().merge(&inputs, Path::new("out.pdf"))?;
//! println!("{} pages from {} files", stats.total_pages, stats.files_merged);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod error;
pub mod io;
pub mod merge;
pub mod selection;
pub mod server;
pub mod staging;
pub mod utils;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::{MergeError, Result};

/// Multipart field name carrying each uploaded PDF.
pub const UPLOAD_FIELD: &str = "pdfs";

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
