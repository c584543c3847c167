//! Shared helpers for the integration tests.
//!
//! PDFs come from the shared fixtures; each page carries a `Marker` entry
//! (`<label>-<n>`) so the page order of a merged document can be asserted.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use lopdf::Document;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;

use pdfmerge::ServerConfig;
use pdfmerge::merge::{LopdfMerger, MergePrimitive, MergeStatistics};
use pdfmerge::server::{AppState, create_app};

use crate::fixtures;

pub const BOUNDARY: &str = "pdfmerge-test-boundary";

pub const INDEX_HTML: &str = "<!doctype html><title>merge page</title>";

/// Serialized PDF with `pages` pages tagged `label-1 ..= label-N`.
pub fn pdf_bytes(label: &str, pages: usize) -> Vec<u8> {
    fixtures::sample_pdf_bytes(label, pages)
}

/// Page markers of a serialized PDF, in page order.
pub fn page_markers(bytes: &[u8]) -> Vec<String> {
    fixtures::page_markers(&Document::load_mem(bytes).unwrap())
}

/// One multipart part: field name, optional filename, contents.
pub struct Part<'a> {
    pub field: &'a str,
    pub filename: Option<&'a str>,
    pub data: Vec<u8>,
}

impl<'a> Part<'a> {
    pub fn pdf(filename: &'a str, data: Vec<u8>) -> Self {
        Self {
            field: "pdfs",
            filename: Some(filename),
            data,
        }
    }

    pub fn text(field: &'a str, value: &str) -> Self {
        Self {
            field,
            filename: None,
            data: value.as_bytes().to_vec(),
        }
    }
}

/// Encode `parts` as a `multipart/form-data` body.
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part.filename {
            Some(filename) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        part.field, filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: application/pdf\r\n");
            }
            None => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n",
                    part.field
                )
                .as_bytes(),
            ),
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(&part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// `POST /merge` request carrying `parts`.
pub fn merge_request(parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/merge")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

/// A server rooted in a temporary directory.
pub struct TestApp {
    pub root: TempDir,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn with_config(adjust: impl FnOnce(&mut ServerConfig)) -> Self {
        Self::build(adjust, None).await
    }

    pub async fn with_merger(merger: Arc<dyn MergePrimitive>) -> Self {
        Self::build(|_| {}, Some(merger)).await
    }

    async fn build(
        adjust: impl FnOnce(&mut ServerConfig),
        merger: Option<Arc<dyn MergePrimitive>>,
    ) -> Self {
        let root = TempDir::new().unwrap();
        let mut config = ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            root: root.path().to_path_buf(),
            ..Default::default()
        };
        adjust(&mut config);

        let state = match merger {
            Some(merger) => AppState::with_merger(config, merger),
            None => AppState::new(config),
        };
        state.layout.ensure().await.unwrap();
        std::fs::write(state.layout.index_page(), INDEX_HTML).unwrap();
        std::fs::write(state.layout.public.join("style.css"), "body {}").unwrap();

        Self { root, state }
    }

    pub fn router(&self) -> Router {
        create_app(self.state.clone())
    }

    /// Files left behind in `uploads/` and `merged/`.
    pub fn leftovers(&self) -> Vec<PathBuf> {
        self.state.staging.orphans()
    }
}

/// Delegates to [`LopdfMerger`] and counts invocations.
#[derive(Default)]
pub struct CountingMerger {
    inner: LopdfMerger,
    calls: AtomicUsize,
}

impl CountingMerger {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MergePrimitive for CountingMerger {
    fn merge(&self, inputs: &[PathBuf], output: &Path) -> pdfmerge::Result<MergeStatistics> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.merge(inputs, output)
    }
}

/// Writes a truncated output file, then fails.
pub struct PartialWriteMerger;

impl MergePrimitive for PartialWriteMerger {
    fn merge(&self, _inputs: &[PathBuf], output: &Path) -> pdfmerge::Result<MergeStatistics> {
        std::fs::write(output, b"%PDF-1.5\n% truncated")?;
        Err(pdfmerge::MergeError::merge_failed("disk vanished mid-write"))
    }
}

/// Sleeps before merging, so a request can be abandoned mid-merge.
pub struct SlowMerger {
    delay: Duration,
    inner: LopdfMerger,
    finished: AtomicBool,
}

impl SlowMerger {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            inner: LopdfMerger::new(),
            finished: AtomicBool::new(false),
        }
    }

    pub fn finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }
}

impl MergePrimitive for SlowMerger {
    fn merge(&self, inputs: &[PathBuf], output: &Path) -> pdfmerge::Result<MergeStatistics> {
        std::thread::sleep(self.delay);
        let result = self.inner.merge(inputs, output);
        self.finished.store(true, Ordering::SeqCst);
        result
    }
}
