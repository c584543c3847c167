//! Temporary storage for uploaded parts and merged output.
//!
//! Both [`UploadedPart`] and [`MergedArtifact`] own a file on disk and
//! delete it when dropped, so every exit path of a request (success, error
//! or an aborted download) releases what it created.

use bytes::Bytes;
use chrono::Utc;
use futures::{Stream, StreamExt};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use uuid::Uuid;
use walkdir::WalkDir;

use crate::config::Layout;
use crate::error::Result;

/// Staging (`uploads/`) and output (`merged/`) directories of one server.
#[derive(Debug, Clone)]
pub struct StagingArea {
    uploads: PathBuf,
    merged: PathBuf,
}

impl StagingArea {
    /// Staging area over the upload and output directories of `layout`.
    pub fn new(layout: &Layout) -> Self {
        Self {
            uploads: layout.uploads.clone(),
            merged: layout.merged.clone(),
        }
    }

    /// Start persisting the part that arrived at position `index`.
    ///
    /// The file gets a random name; the client's filename is only recorded.
    pub async fn begin_part(&self, index: usize, original_name: &str) -> Result<PartWriter> {
        let temp = tempfile::Builder::new()
            .prefix("upload_")
            .suffix(".pdf")
            .tempfile_in(&self.uploads)?;
        let (file, guard) = temp.into_parts();

        Ok(PartWriter {
            file: tokio::fs::File::from_std(file),
            guard,
            original_name: original_name.to_string(),
            index,
            size: 0,
        })
    }

    /// Persist an in-memory part in one step.
    pub async fn stage_bytes(
        &self,
        index: usize,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<UploadedPart> {
        let mut writer = self.begin_part(index, original_name).await?;
        writer.write_chunk(bytes).await?;
        writer.finish().await
    }

    /// Reserve an output path for a merge started now.
    pub fn new_artifact(&self) -> MergedArtifact {
        let millis = Utc::now().timestamp_millis();
        let unique = Uuid::new_v4().simple().to_string();

        MergedArtifact {
            path: self
                .merged
                .join(format!("merged_{millis}_{}.pdf", &unique[..8])),
            download_name: format!("merged_{millis}.pdf"),
        }
    }

    /// Files currently present in the staging and output directories.
    pub fn orphans(&self) -> Vec<PathBuf> {
        [&self.uploads, &self.merged]
            .into_iter()
            .flat_map(|dir| {
                WalkDir::new(dir)
                    .min_depth(1)
                    .max_depth(1)
                    .into_iter()
                    .filter_map(|entry| entry.ok())
                    .filter(|entry| entry.file_type().is_file())
                    .map(|entry| entry.into_path())
            })
            .collect()
    }
}

/// An upload being written to the staging directory.
///
/// Dropping the writer before [`PartWriter::finish`] deletes the partial file.
#[derive(Debug)]
pub struct PartWriter {
    file: tokio::fs::File,
    guard: TempPath,
    original_name: String,
    index: usize,
    size: u64,
}

impl PartWriter {
    /// Append a chunk of the part's body.
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        self.file.write_all(chunk).await?;
        self.size += chunk.len() as u64;
        Ok(())
    }

    /// Flush the file and hand over ownership of it.
    pub async fn finish(self) -> Result<UploadedPart> {
        let PartWriter {
            mut file,
            guard,
            original_name,
            index,
            size,
        } = self;
        file.flush().await?;

        Ok(UploadedPart {
            path: guard.to_path_buf(),
            guard: Some(guard),
            original_name,
            index,
            size,
        })
    }
}

/// One received file, persisted in the staging directory.
#[derive(Debug)]
pub struct UploadedPart {
    path: PathBuf,
    guard: Option<TempPath>,
    original_name: String,
    index: usize,
    size: u64,
}

impl UploadedPart {
    /// Location of the staged bytes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Filename supplied by the client.
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// Position of the part in the request.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of bytes received.
    pub fn size(&self) -> u64 {
        self.size
    }
}

impl Drop for UploadedPart {
    fn drop(&mut self) {
        if let Some(guard) = self.guard.take() {
            match guard.close() {
                Ok(()) => tracing::debug!("Removed staged part {}", self.path.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!(
                    "Failed to remove staged part {}: {}",
                    self.path.display(),
                    e
                ),
            }
        }
    }
}

/// The merged output file of one request.
#[derive(Debug)]
pub struct MergedArtifact {
    path: PathBuf,
    download_name: String,
}

impl MergedArtifact {
    /// Location of the merged file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name offered to the client, `merged_<millis>.pdf`.
    pub fn download_name(&self) -> &str {
        &self.download_name
    }

    /// Open the artifact for streaming.
    ///
    /// Returns the byte length and a stream of its contents. The stream owns
    /// the artifact, so the file is deleted once the stream is dropped.
    pub async fn into_stream(
        self,
    ) -> Result<(u64, impl Stream<Item = io::Result<Bytes>> + Send + 'static)> {
        let file = tokio::fs::File::open(&self.path).await?;
        let len = file.metadata().await?.len();

        let artifact = self;
        let stream = ReaderStream::new(file).map(move |chunk| {
            let _owner = &artifact;
            chunk
        });

        Ok((len, stream))
    }
}

impl Drop for MergedArtifact {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!("Removed merged output {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                "Failed to remove merged output {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}
