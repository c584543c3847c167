//! Ordered file selection.
//!
//! A [`Selection`] is the list of files a user intends to merge, in the
//! order they will be uploaded. Index based edits that point outside the
//! list are ignored rather than reported, so stale UI events are harmless.

use bytes::Bytes;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Where the bytes of a selected file come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// A file on the local filesystem, read at submission time.
    Path(PathBuf),
    /// Contents already held in memory.
    Bytes(Bytes),
}

/// A user-chosen file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    source: FileSource,
}

impl SelectedFile {
    /// Select a file on disk, displayed under its file name.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self {
            name,
            source: FileSource::Path(path),
        }
    }

    /// Select in-memory contents under `name`.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            source: FileSource::Bytes(bytes.into()),
        }
    }

    /// Display name, also sent as the upload filename.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Underlying byte handle.
    pub fn source(&self) -> &FileSource {
        &self.source
    }

    /// Read the file contents.
    pub async fn read(&self) -> Result<Bytes> {
        match &self.source {
            FileSource::Path(path) => Ok(Bytes::from(tokio::fs::read(path).await?)),
            FileSource::Bytes(bytes) => Ok(bytes.clone()),
        }
    }
}

/// Files in the order they will be merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    files: Vec<SelectedFile>,
}

impl Selection {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the given paths, in order.
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self {
            files: paths
                .into_iter()
                .map(|p| SelectedFile::from_path(p.as_ref()))
                .collect(),
        }
    }

    /// Replace the whole selection with a new pick.
    ///
    /// Nothing from the previous selection is kept.
    pub fn replace(&mut self, files: impl IntoIterator<Item = SelectedFile>) {
        self.files = files.into_iter().collect();
    }

    /// Swap the entry at `index` with the one before it.
    ///
    /// Returns `false`, leaving the list unchanged, if there is no such pair.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.files.len() {
            return false;
        }
        self.files.swap(index, index - 1);
        true
    }

    /// Swap the entry at `index` with the one after it.
    ///
    /// Returns `false`, leaving the list unchanged, if there is no such pair.
    pub fn move_down(&mut self, index: usize) -> bool {
        match index.checked_add(1) {
            Some(next) if next < self.files.len() => {
                self.files.swap(index, next);
                true
            }
            _ => false,
        }
    }

    /// Delete the entry at `index`, returning it.
    pub fn remove(&mut self, index: usize) -> Option<SelectedFile> {
        (index < self.files.len()).then(|| self.files.remove(index))
    }

    /// Number of selected files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Selected files in order.
    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    /// Display names in order.
    pub fn names(&self) -> Vec<&str> {
        self.files.iter().map(SelectedFile::name).collect()
    }

    /// Iterate the selected files in order.
    pub fn iter(&self) -> std::slice::Iter<'_, SelectedFile> {
        self.files.iter()
    }
}

impl FromIterator<SelectedFile> for Selection {
    fn from_iter<T: IntoIterator<Item = SelectedFile>>(iter: T) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a SelectedFile;
    type IntoIter = std::slice::Iter<'a, SelectedFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}
