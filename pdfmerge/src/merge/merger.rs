//! Core PDF merging implementation.
//!
//! [`Merger`] grows a single output document one input at a time. Each
//! added document keeps its own page tree; that tree is grafted as the last
//! kid of the output's root `Pages` node, so pages appear in call order and
//! attributes they inherit from their original tree stay reachable.

use lopdf::{Document, Object, ObjectId};
use std::path::Path;

use crate::error::{MergeError, Result};
use crate::io::PdfReader;

/// Incremental PDF merger.
///
/// ```no_run
/// # use pdfmerge::merge::Merger;
/// # use std::path::Path;
/// # fn example() -> pdfmerge::Result<()> {
/// let mut merger = Merger::new();
/// merger.add(Path::new("a.pdf"))?;
/// merger.add(Path::new("b.pdf"))?;
/// let document = merger.finish()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct Merger {
    reader: PdfReader,
    document: Option<Document>,
    page_counts: Vec<usize>,
    input_size: u64,
}

impl Merger {
    /// Create an empty merger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the PDF at `path` and append its pages to the output.
    ///
    /// Returns the number of pages appended.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded, has no pages, or its
    /// page tree cannot be attached.
    pub fn add(&mut self, path: &Path) -> Result<usize> {
        let loaded = self.reader.load(path)?;
        let pages = loaded.page_count;
        self.add_document(loaded.document)?;
        self.input_size += loaded.file_size;
        Ok(pages)
    }

    /// Append the pages of an already loaded document.
    pub fn add_document(&mut self, document: Document) -> Result<usize> {
        let pages = document.get_pages().len();

        match self.document.as_mut() {
            None => self.document = Some(document),
            Some(merged) => append_document(merged, document)?,
        }

        self.page_counts.push(pages);
        Ok(pages)
    }

    /// Number of documents added so far.
    pub fn files_merged(&self) -> usize {
        self.page_counts.len()
    }

    /// Page count of each added document, in call order.
    pub fn page_counts(&self) -> &[usize] {
        &self.page_counts
    }

    /// Total pages in the output so far.
    pub fn total_pages(&self) -> usize {
        self.page_counts.iter().sum()
    }

    /// Combined size in bytes of the files added through [`Merger::add`].
    pub fn input_size(&self) -> u64 {
        self.input_size
    }

    /// Take the merged document.
    ///
    /// # Errors
    ///
    /// Returns `NoFilesToMerge` if nothing was added.
    pub fn finish(self) -> Result<Document> {
        self.document.ok_or(MergeError::NoFilesToMerge)
    }
}

/// Append every page of `source` to `merged`, after its existing pages.
fn append_document(merged: &mut Document, mut source: Document) -> Result<()> {
    // Renumber objects to avoid ID conflicts
    source.renumber_objects_with(merged.max_id + 1);
    merged.max_id = merged.max_id.max(source.max_id);

    let source_catalog = catalog_id(&source)?;
    let source_pages = pages_root(&source)?;
    let source_count = source.get_pages().len() as i64;

    source.objects.remove(&source_catalog);
    merged.objects.extend(source.objects);

    let target_pages = pages_root(merged)?;

    match merged.get_object_mut(source_pages) {
        Ok(Object::Dictionary(dict)) => dict.set("Parent", Object::Reference(target_pages)),
        _ => {
            return Err(MergeError::merge_failed(
                "Source pages object is not a dictionary",
            ));
        }
    }

    let pages_dict = merged
        .get_object_mut(target_pages)
        .map_err(|e| MergeError::merge_failed(format!("Failed to get pages object: {e}")))?;

    let Object::Dictionary(dict) = pages_dict else {
        return Err(MergeError::merge_failed("Pages object is not a dictionary"));
    };

    match dict.get_mut(b"Kids") {
        Ok(Object::Array(kids)) => kids.push(Object::Reference(source_pages)),
        Ok(_) => return Err(MergeError::merge_failed("Kids is not an array")),
        Err(_) => return Err(MergeError::merge_failed("Pages dictionary missing Kids array")),
    }

    let current_count = dict.get(b"Count").and_then(|c| c.as_i64()).unwrap_or(0);
    dict.set("Count", Object::Integer(current_count + source_count));

    Ok(())
}

fn catalog_id(doc: &Document) -> Result<ObjectId> {
    doc.trailer
        .get(b"Root")
        .and_then(|root| root.as_reference())
        .map_err(|e| MergeError::merge_failed(format!("Failed to get catalog: {e}")))
}

fn pages_root(doc: &Document) -> Result<ObjectId> {
    doc.catalog()
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(|pages| pages.as_reference())
        .map_err(|e| MergeError::merge_failed(format!("Failed to get pages reference: {e}")))
}
