//! HTTP client for the merge endpoint.
//!
//! # Examples
//!
//! ```no_run
//! use pdfmerge::client::MergeClient;
//! use pdfmerge::selection::Selection;
//!
//! # async fn example() -> pdfmerge::Result<()> {
//! let mut selection = Selection::from_paths(["intro.pdf", "body.pdf"]);
//! selection.move_up(1);
//!
//! let download = MergeClient::new("http://localhost:3000")
//!     .submit(&selection)
//!     .await?;
//! download.save_to(".").await?;
//! # Ok(())
//! # }
//! ```

use bytes::Bytes;
use chrono::Utc;
use percent_encoding::percent_decode_str;
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::multipart::{Form, Part};
use std::path::{Path, PathBuf};

use crate::UPLOAD_FIELD;
use crate::error::{MergeError, Result};
use crate::selection::Selection;

/// A merged document returned by the server.
#[derive(Debug, Clone)]
pub struct MergedDownload {
    /// Name to save the document under.
    pub filename: String,

    /// The merged PDF.
    pub bytes: Bytes,
}

impl MergedDownload {
    /// Write the download into `dir`, returning the full path.
    pub async fn save_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.filename);
        tokio::fs::write(&path, &self.bytes)
            .await
            .map_err(|e| MergeError::FailedToWrite {
                path: path.clone(),
                source: e,
            })?;
        Ok(path)
    }
}

/// Client for a running merge server.
#[derive(Debug, Clone)]
pub struct MergeClient {
    http: reqwest::Client,
    base_url: String,
}

impl MergeClient {
    /// Create a client for the server at `base_url`, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing `reqwest` client.
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// URL of the merge endpoint.
    pub fn merge_url(&self) -> String {
        format!("{}/merge", self.base_url)
    }

    /// Upload the selection in its current order and return the merged PDF.
    ///
    /// # Errors
    ///
    /// - `EmptySelection` if nothing is selected; no request is made
    /// - `Server` if the server answers with a non-success status
    /// - `Request` if the request cannot be sent or the body not read
    pub async fn submit(&self, selection: &Selection) -> Result<MergedDownload> {
        if selection.is_empty() {
            return Err(MergeError::EmptySelection);
        }

        let mut form = Form::new();
        for file in selection {
            let part = Part::bytes(file.read().await?.to_vec())
                .file_name(file.name().to_string())
                .mime_str("application/pdf")?;
            form = form.part(UPLOAD_FIELD, part);
        }

        tracing::debug!("Submitting {} file(s) to {}", selection.len(), self.merge_url());
        let response = self.http.post(self.merge_url()).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MergeError::Server {
                status: status.as_u16(),
            });
        }

        let filename = filename_from_content_disposition(
            response
                .headers()
                .get(CONTENT_DISPOSITION)
                .and_then(|v| v.to_str().ok()),
        );
        let bytes = response.bytes().await?;

        Ok(MergedDownload { filename, bytes })
    }
}

/// Timestamped fallback name, `merged_<millis>.pdf`.
pub fn default_download_name() -> String {
    format!("merged_{}.pdf", Utc::now().timestamp_millis())
}

/// Pick a download name from a `Content-Disposition` header value.
///
/// `filename*=UTF-8''...` wins over `filename=...`. Directory components
/// are stripped. Falls back to [`default_download_name`] when the header is
/// missing or names nothing usable.
pub fn filename_from_content_disposition(header: Option<&str>) -> String {
    header
        .and_then(parse_disposition_filename)
        .and_then(|name| sanitize(&name))
        .unwrap_or_else(default_download_name)
}

fn parse_disposition_filename(header: &str) -> Option<String> {
    let params: Vec<(String, &str)> = header
        .split(';')
        .skip(1)
        .filter_map(|param| {
            let (key, value) = param.split_once('=')?;
            Some((key.trim().to_ascii_lowercase(), value.trim()))
        })
        .collect();

    let extended = params
        .iter()
        .find(|(key, _)| key == "filename*")
        .and_then(|(_, value)| {
            let (charset, rest) = value.split_once('\'')?;
            let (_language, encoded) = rest.split_once('\'')?;
            if !charset.eq_ignore_ascii_case("utf-8") {
                return None;
            }
            percent_decode_str(encoded.trim_matches('"'))
                .decode_utf8()
                .ok()
                .map(|s| s.into_owned())
        });

    extended.or_else(|| {
        params
            .iter()
            .find(|(key, _)| key == "filename")
            .map(|(_, value)| value.trim_matches('"').to_string())
    })
}

fn sanitize(name: &str) -> Option<String> {
    let last = name.rsplit(['/', '\\']).next()?.trim();
    match last {
        "" | "." | ".." => None,
        _ => Some(last.to_string()),
    }
}
