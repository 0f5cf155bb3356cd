use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Extension;
use readiness_core::report::Report;
use uuid::Uuid;

use super::{join_error, load_owned};
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::pdf;
use crate::state::AppState;

async fn completed_report(app: &AppState, id: Uuid, user_id: Uuid) -> Result<Report, AppError> {
    let store = app.store.clone();
    let assessment = tokio::task::spawn_blocking(move || load_owned(&store, id, user_id))
        .await
        .map_err(join_error)??;
    if !assessment.is_complete() {
        return Err(AppError::conflict("assessment is not complete"));
    }
    Ok(Report::from_assessment(&assessment))
}

/// GET /api/assessments/{id}/report — PDF download.
pub async fn pdf_report(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let report = completed_report(&app, id, user.id).await?;
    let file_name = report.file_name();
    let bytes = tokio::task::spawn_blocking(move || pdf::render(&report))
        .await
        .map_err(join_error)??;

    tracing::info!(assessment = %id, bytes = bytes.len(), "report rendered");
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    ))
}

/// GET /api/assessments/{id}/report.md — Markdown rendition.
pub async fn markdown_report(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let report = completed_report(&app, id, user.id).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        report.to_markdown(),
    ))
}
