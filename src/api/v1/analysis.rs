//! CSV upload and correlation matrix

use axum::extract::Multipart;
use tracing::info;

use crate::api::types::{ApiError, Json};
use crate::infrastructure::analysis::{analyze_csv, CorrelationReport, DEFAULT_PREVIEW_ROWS};

/// POST /v1/analysis/correlation
///
/// Reads the `file` field of a multipart upload, or the first field when none is
/// named that way.
pub async fn correlation(mut multipart: Multipart) -> Result<Json<CorrelationReport>, ApiError> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        let is_file = field.name() == Some("file");
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {}", e)))?;

        if is_file || upload.is_none() {
            upload = Some(bytes);
        }
        if is_file {
            break;
        }
    }

    let bytes = upload.ok_or_else(|| ApiError::bad_request("No file uploaded").with_param("file"))?;

    let report = analyze_csv(&bytes, DEFAULT_PREVIEW_ROWS)?;

    info!(
        rows = report.row_count,
        numeric_columns = report.numeric_columns.len(),
        "Correlation analysis completed"
    );

    Ok(Json(report))
}
