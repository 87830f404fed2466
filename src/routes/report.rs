use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    error::Result, models::report::AggregateReport, services::export_service::ExportService,
    AppState,
};

#[utoipa::path(
    get,
    path = "/report/{id}/data",
    params(
        ("id" = Uuid, Path, description = "Interview ID")
    ),
    responses(
        (status = 200, description = "Aggregate interview report", body = AggregateReport),
        (status = 404, description = "Interview not found")
    )
)]
#[axum::debug_handler]
pub async fn report_data(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    Ok(Json(state.report_service.build_report(id).await?))
}

/// Download the report as XLSX.
#[utoipa::path(
    get,
    path = "/report/{id}",
    params(
        ("id" = Uuid, Path, description = "Interview ID")
    ),
    responses(
        (status = 200, description = "XLSX workbook attachment"),
        (status = 404, description = "Interview not found")
    )
)]
#[axum::debug_handler]
pub async fn download_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let report = state.report_service.build_report(id).await?;
    let buffer = ExportService::render_report_xlsx(&report)?;
    let disposition = format!("attachment; filename=\"interview_report_{}.xlsx\"", id);

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".to_string(),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        buffer,
    ))
}
