//! Configuration module for pdfmerge.
//!
//! This module turns command-line or environment settings into a validated
//! [`ServerConfig`] and derives the on-disk [`Layout`] the server works in:
//! - Application of defaults
//! - Environment overrides that never abort startup
//! - Validation of limits
//! - Creation of the working directories

use std::env;
use std::path::{Path, PathBuf};

use crate::error::{MergeError, Result};

/// Default TCP port when none is supplied.
pub const DEFAULT_PORT: u16 = 3000;

/// Default number of files accepted per merge request.
pub const DEFAULT_MAX_FILES: usize = 10;

/// Default request body limit (100 MB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 100 * 1024 * 1024;

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind (default: "0.0.0.0").
    pub host: String,

    /// Port to bind (default: 3000). Port 0 binds an ephemeral port.
    pub port: u16,

    /// Directory holding `uploads/`, `merged/`, `public/` and `views/`.
    pub root: PathBuf,

    /// Maximum number of `pdfs` parts per request (default: 10).
    pub max_files: usize,

    /// Maximum request body size in bytes.
    pub max_body_size: usize,

    /// Compress content streams of the merged output.
    pub compress: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            root: PathBuf::from("."),
            max_files: DEFAULT_MAX_FILES,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            compress: true,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparseable variables fall back to their defaults.
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            host: env::var("HOST").unwrap_or(default.host),

            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.port),

            root: env::var_os("PDFMERGE_ROOT")
                .map(PathBuf::from)
                .unwrap_or(default.root),

            max_files: env::var("PDFMERGE_MAX_FILES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_files),

            max_body_size: env::var("PDFMERGE_MAX_BODY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_body_size),

            compress: env::var("PDFMERGE_COMPRESS")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(default.compress),
        }
    }

    /// Check limits for values that would make every request fail.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `max_files` or `max_body_size` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_files == 0 {
            return Err(MergeError::invalid_config(
                "max_files must be at least 1",
            ));
        }

        if self.max_body_size == 0 {
            return Err(MergeError::invalid_config(
                "max_body_size must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Address string suitable for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Directory layout rooted at [`ServerConfig::root`].
    pub fn layout(&self) -> Layout {
        Layout::new(&self.root)
    }
}

/// The four working directories of the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Staging directory for uploaded parts.
    pub uploads: PathBuf,

    /// Output directory for merged artifacts.
    pub merged: PathBuf,

    /// Static assets served verbatim.
    pub public: PathBuf,

    /// Page templates.
    pub views: PathBuf,
}

impl Layout {
    /// Derive the layout below `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            uploads: root.join("uploads"),
            merged: root.join("merged"),
            public: root.join("public"),
            views: root.join("views"),
        }
    }

    /// Path of the entry page served at `/`.
    pub fn index_page(&self) -> PathBuf {
        self.views.join("index.html")
    }

    /// All directories, in creation order.
    pub fn directories(&self) -> [&Path; 4] {
        [&self.uploads, &self.merged, &self.public, &self.views]
    }

    /// Create every missing directory.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if a directory cannot be created.
    pub async fn ensure(&self) -> Result<()> {
        for dir in self.directories() {
            if !tokio::fs::try_exists(dir).await? {
                tokio::fs::create_dir_all(dir).await?;
                tracing::debug!("Created directory {}", dir.display());
            }
        }
        Ok(())
    }
}
