//! The merge request handler.

use axum::body::Body;
use axum::extract::{Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use futures::StreamExt;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use super::AppState;
use super::error::AppError;
use crate::UPLOAD_FIELD;
use crate::error::MergeError;
use crate::merge::MergeStatistics;
use crate::staging::{MergedArtifact, StagingArea, UploadedPart};

/// Progress of one merge request, recorded for failure logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    /// Reading the multipart body and staging parts.
    Received,
    /// Every part is on disk, merge not yet finished.
    PartsPersisted,
    /// The merged artifact has been written.
    Merged,
    /// Staged parts have been deleted.
    PartsCleanedUp,
    /// The artifact is being sent to the client.
    Streaming,
    /// The response body is gone and the artifact deleted.
    OutputCleanedUp,
    /// The request ended with an error; everything staged has been released.
    Failed,
}

impl fmt::Display for RequestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Received => "received",
            Self::PartsPersisted => "parts-persisted",
            Self::Merged => "merged",
            Self::PartsCleanedUp => "parts-cleaned-up",
            Self::Streaming => "streaming",
            Self::OutputCleanedUp => "output-cleaned-up",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// `POST /merge`: merge the uploaded `pdfs` parts in arrival order.
pub async fn merge_pdfs(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut phase = RequestPhase::Received;

    let result = process(&state, &mut multipart, &mut phase).await;
    if let Err(e) = &result {
        tracing::debug!("Merge request failed in phase {}: {}", phase, e);
        advance(&mut phase, RequestPhase::Failed);
    }
    result
}

async fn process(
    state: &AppState,
    multipart: &mut Multipart,
    phase: &mut RequestPhase,
) -> Result<Response, AppError> {
    let parts = receive_parts(&state.staging, state.config.max_files, multipart).await?;
    advance(phase, RequestPhase::PartsPersisted);

    // The blocking task owns the parts and the artifact, so both are deleted
    // even if this future is dropped before the merge finishes.
    let artifact = state.staging.new_artifact();
    let merger = Arc::clone(&state.merger);
    let job = move || -> Result<(MergeStatistics, MergedArtifact), MergeError> {
        let inputs: Vec<PathBuf> = parts.iter().map(|p| p.path().to_path_buf()).collect();
        let stats = merger.merge(&inputs, artifact.path())?;
        drop(parts);
        Ok((stats, artifact))
    };

    let (stats, artifact) = tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| MergeError::merge_failed(format!("merge task aborted: {e}")))??;
    advance(phase, RequestPhase::Merged);

    tracing::info!(
        "Merged {} file(s), {} page(s) into {} ({}) in {:?}",
        stats.files_merged,
        stats.total_pages,
        artifact.download_name(),
        stats.format_output_size(),
        stats.merge_time
    );
    advance(phase, RequestPhase::PartsCleanedUp);

    let disposition = format!("attachment; filename=\"{}\"", artifact.download_name());
    let (len, stream) = artifact.into_stream().await?;
    advance(phase, RequestPhase::Streaming);

    let done = StreamDone;
    let stream = stream.map(move |chunk| {
        let _done = &done;
        chunk
    });

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(header::CONTENT_DISPOSITION, disposition)
        .header(header::CONTENT_LENGTH, len)
        .body(Body::from_stream(stream))
        .map_err(|e| MergeError::other(format!("failed to build response: {e}")).into())
}

/// Stage every `pdfs` file part of the request, in arrival order.
///
/// Parts already staged are dropped (and deleted) when an error is returned.
pub async fn receive_parts(
    staging: &StagingArea,
    max_files: usize,
    multipart: &mut Multipart,
) -> Result<Vec<UploadedPart>, AppError> {
    let mut parts: Vec<UploadedPart> = Vec::new();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(AppError::from_multipart)?
    {
        let name = field.name().unwrap_or_default().to_string();
        // An empty filename is what a browser sends for an untouched file input.
        let Some(file_name) = field
            .file_name()
            .filter(|n| !n.is_empty())
            .map(str::to_string)
        else {
            continue;
        };

        if name != UPLOAD_FIELD {
            return Err(MergeError::UnexpectedField { name }.into());
        }
        if parts.len() >= max_files {
            return Err(MergeError::TooManyFiles { limit: max_files }.into());
        }

        let mut writer = staging.begin_part(parts.len(), &file_name).await?;
        while let Some(chunk) = field.chunk().await.map_err(AppError::from_multipart)? {
            writer.write_chunk(&chunk).await?;
        }
        let part = writer.finish().await?;

        tracing::debug!(
            "Staged part {} '{}' ({} bytes)",
            part.index(),
            part.original_name(),
            part.size()
        );
        parts.push(part);
    }

    if parts.is_empty() {
        return Err(MergeError::NoFilesToMerge.into());
    }

    Ok(parts)
}

fn advance(phase: &mut RequestPhase, next: RequestPhase) {
    tracing::debug!("Merge request {} -> {}", phase, next);
    *phase = next;
}

/// Dropped together with the response body, after the artifact it wraps.
struct StreamDone;

impl Drop for StreamDone {
    fn drop(&mut self) {
        tracing::debug!(
            "Merge request {} -> {}",
            RequestPhase::Streaming,
            RequestPhase::OutputCleanedUp
        );
    }
}
