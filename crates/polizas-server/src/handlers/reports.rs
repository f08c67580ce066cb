//! Report download endpoints.

use axum::extract::rejection::JsonRejection;
use axum::{
    Json,
    body::Body,
    http::{Response, StatusCode, header},
};
use chrono::Utc;
use tracing::info;

use polizas_core::report::render;
use polizas_core::{ReportFormat, ReportRequest};

use crate::dto::ReportRequestBody;
use crate::error::ApiError;

/// Render a report to an `.xlsx` workbook.
#[utoipa::path(
    post,
    path = "/api/polizas/reportes/excel",
    request_body = ReportRequestBody,
    responses(
        (
            status = 200,
            description = "Spreadsheet attachment",
            content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        ),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Malformed request or rendering failure"),
    ),
    security(("bearer" = [])),
    tag = "reports"
)]
pub async fn excel_report(
    payload: Result<Json<ReportRequestBody>, JsonRejection>,
) -> Result<Response<Body>, ApiError> {
    download(payload, ReportFormat::Xlsx).await
}

/// Render a report to a PDF document.
#[utoipa::path(
    post,
    path = "/api/polizas/reportes/pdf",
    request_body = ReportRequestBody,
    responses(
        (status = 200, description = "PDF attachment", content_type = "application/pdf"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Malformed request or rendering failure"),
    ),
    security(("bearer" = [])),
    tag = "reports"
)]
pub async fn pdf_report(
    payload: Result<Json<ReportRequestBody>, JsonRejection>,
) -> Result<Response<Body>, ApiError> {
    download(payload, ReportFormat::Pdf).await
}

/// Renders the whole document on the blocking pool before responding, so
/// clients get either a complete file or an error.
async fn download(
    payload: Result<Json<ReportRequestBody>, JsonRejection>,
    format: ReportFormat,
) -> Result<Response<Body>, ApiError> {
    let Json(body) =
        payload.map_err(|e| ApiError::Internal(format!("Malformed report request: {}", e)))?;
    let request = ReportRequest::try_from(body)?;
    let file_name = request.file_name(format);

    let bytes = tokio::task::spawn_blocking(move || render(&request, format, Utc::now()))
        .await
        .map_err(|e| ApiError::Internal(format!("Render task failed: {}", e)))??;

    info!("Rendered {} ({} bytes)", file_name, bytes.len());

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, format.content_type())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name),
        )
        .body(Body::from(bytes))
        .map_err(|e| ApiError::Internal(format!("Failed to build response: {}", e)))
}
