//! Question answering endpoint

use axum::{
    extract::{Multipart, State},
    Json,
};
use std::path::Path;
use std::time::Instant;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{AskResponse, DocumentSummary};

/// An uploaded document held in memory until it is written out
struct Upload {
    filename: String,
    data: axum::body::Bytes,
}

/// POST /api/ask - Upload one document and ask a question about it
pub async fn ask_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AskResponse>> {
    let start = Instant::now();
    let request_id = Uuid::new_v4();

    let mut upload: Option<Upload> = None;
    let mut question: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::bad_request(format!("Failed to read multipart field: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                let filename = sanitize_filename(field.file_name());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| Error::bad_request(format!("Failed to read file: {}", e)))?;
                upload = Some(Upload { filename, data });
            }
            "question" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| Error::bad_request(format!("Failed to read question: {}", e)))?;
                question = Some(text);
            }
            other => {
                tracing::debug!("Ignoring multipart field '{}'", other);
            }
        }
    }

    let question = question
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| Error::bad_request("Please enter a question"))?;
    let upload = upload.ok_or_else(|| Error::bad_request("Please upload a file"))?;

    tracing::info!(
        "[{}] Question about {} ({} bytes)",
        request_id,
        upload.filename,
        upload.data.len()
    );

    // Removed when dropped at the end of the request
    let workdir = upload_workdir(state.config().server.upload_dir.as_deref())?;
    let path = workdir.path().join(&upload.filename);
    tokio::fs::write(&path, &upload.data).await?;

    let report = {
        let _guard = state.lock_run().await;
        state.pipeline().ask_file(&path, &question).await?
    };

    let processing_time_ms = start.elapsed().as_millis() as u64;
    tracing::info!(
        "[{}] Answered in {}ms (chunk: {:?})",
        request_id,
        processing_time_ms,
        report.answer.chunk_index
    );

    Ok(Json(AskResponse::new(
        request_id,
        question,
        DocumentSummary::from(&report.document),
        report.chunks_total,
        &report.answers,
        report.answer,
        processing_time_ms,
    )))
}

/// Keep only the base name of a client-supplied filename
fn sanitize_filename(raw: Option<&str>) -> String {
    raw.and_then(|name| {
        // Browsers on Windows may send backslash-separated paths
        let base = name.rsplit(['/', '\\']).next()?;
        Path::new(base)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
    })
    .filter(|name| !name.is_empty())
    .unwrap_or_else(|| format!("upload_{}.bin", Uuid::new_v4()))
}

/// Per-request temporary directory for the uploaded file
fn upload_workdir(parent: Option<&Path>) -> Result<tempfile::TempDir> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("doc-qa-");

    let dir = match parent {
        Some(parent) => {
            std::fs::create_dir_all(parent)?;
            builder.tempdir_in(parent)?
        }
        None => builder.tempdir()?,
    };
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_base_name() {
        assert_eq!(sanitize_filename(Some("report.pdf")), "report.pdf");
        assert_eq!(sanitize_filename(Some("../../etc/notes.md")), "notes.md");
        assert_eq!(sanitize_filename(Some("C:\\Users\\me\\page.html")), "page.html");
    }

    #[test]
    fn test_sanitize_falls_back_to_generated_name() {
        for raw in [None, Some(""), Some(".."), Some("dir/")] {
            let name = sanitize_filename(raw);
            assert!(name.starts_with("upload_") && name.ends_with(".bin"), "{}", name);
        }
    }

    #[test]
    fn test_upload_workdir_under_parent() {
        let parent = tempfile::tempdir().unwrap();
        let nested = parent.path().join("uploads");

        let workdir = upload_workdir(Some(&nested)).unwrap();
        assert!(workdir.path().starts_with(&nested));
        assert!(workdir.path().is_dir());
    }
}
