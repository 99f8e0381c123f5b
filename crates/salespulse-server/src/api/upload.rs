//! `POST /upload`: multipart file -> parsed dataset -> store swap.
//!
//! The file is parsed and cleaned completely before the store is touched, so
//! a rejected upload leaves the previous dataset in place.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;

use salespulse_core::error::{Result, SalesError};
use salespulse_core::{load_sales_file, SalesDataset};

use crate::api::error::ApiError;
use crate::app_state::AppState;

/// Multipart field carrying the file.
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    pub rows: usize,
    pub columns: Vec<String>,
}

pub async fn upload_sales_file(
    State(app): State<AppState>,
    mut multipart: Multipart,
) -> std::result::Result<Json<UploadResponse>, ApiError> {
    let metrics = app.metrics();

    let dataset = match receive_and_load(&mut multipart).await {
        Ok(ds) => Arc::new(ds),
        Err(e) => {
            metrics
                .uploads
                .inc(&[("outcome", "rejected"), ("code", e.client_code().as_str())]);
            tracing::warn!(error = %e, "upload rejected");
            return Err(e.into());
        }
    };

    let rows = dataset.row_count();
    let kept = dataset.orders().len();
    let columns = dataset.columns().to_vec();

    app.store().replace(dataset).await;

    metrics.uploads.inc(&[("outcome", "accepted"), ("code", "OK")]);
    metrics.upload_rows.add(&[], rows as u64);
    tracing::info!(
        rows,
        kept,
        columns = columns.len(),
        generation = app.store().generation(),
        "dataset replaced"
    );

    Ok(Json(UploadResponse {
        message: "File uploaded successfully",
        rows,
        columns,
    }))
}

async fn receive_and_load(multipart: &mut Multipart) -> Result<SalesDataset> {
    let (filename, data) = read_file_field(multipart).await?;
    tracing::debug!(%filename, bytes = data.len(), "parsing upload");

    tokio::task::spawn_blocking(move || load_sales_file(&filename, data))
        .await
        .map_err(|e| SalesError::Internal(format!("loader task failed: {e}")))?
}

async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Bytes)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| SalesError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| SalesError::BadRequest("file field has no filename".into()))?;
        let data = field
            .bytes()
            .await
            .map_err(|e| SalesError::BadRequest(format!("failed to read upload: {e}")))?;

        return Ok((filename, data));
    }

    Err(SalesError::BadRequest(format!(
        "multipart form has no '{FILE_FIELD}' field"
    )))
}
