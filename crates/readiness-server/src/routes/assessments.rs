use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::Utc;
use readiness_core::assessment::Assessment;
use readiness_core::catalog::Catalog;
use serde::Deserialize;
use uuid::Uuid;

use super::{join_error, load_owned};
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AnswersBody {
    /// Question id (as a string key) to the selected option.
    #[serde(default)]
    pub answers: BTreeMap<String, String>,
}

fn summary(a: &Assessment) -> serde_json::Value {
    serde_json::json!({
        "id": a.id,
        "status": a.status,
        "start_date": a.start_date,
        "completion_date": a.completion_date,
        "total_score": a.total_score,
        "readiness_level": a.readiness_level,
    })
}

/// The assessment together with the questions waiting at its cursor.
fn progress(a: &Assessment, catalog: &Catalog, page_size: usize) -> serde_json::Value {
    let questions = if a.is_complete() {
        &[][..]
    } else {
        a.page(catalog, page_size)
    };
    let answered = (a.current_question.max(1) - 1).min(catalog.len() as u32);
    serde_json::json!({
        "assessment": a,
        "complete": a.is_complete() || a.is_exhausted(catalog),
        "finalized": a.is_complete(),
        "answered": answered,
        "total": catalog.len(),
        "questions": questions,
    })
}

/// GET /api/assessments — the signed-in user's assessments, newest first.
pub async fn list_assessments(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = app.store.clone();
    let list = tokio::task::spawn_blocking(move || store.assessments_for(user.id))
        .await
        .map_err(join_error)??;
    let list: Vec<serde_json::Value> = list.iter().map(summary).collect();
    Ok(Json(serde_json::json!(list)))
}

/// POST /api/assessments — start a new assessment at question 1.
pub async fn start_assessment(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let store = app.store.clone();
    let assessment = tokio::task::spawn_blocking(move || {
        let assessment = Assessment::start(user.id, Utc::now());
        store.insert_assessment(&assessment)?;
        Ok::<_, AppError>(assessment)
    })
    .await
    .map_err(join_error)??;

    tracing::info!(assessment = %assessment.id, user = %assessment.user_id, "assessment started");
    Ok((
        StatusCode::CREATED,
        Json(progress(&assessment, &app.catalog, app.page_size())),
    ))
}

/// GET /api/assessments/{id} — current page, or `complete: true` once exhausted.
pub async fn get_assessment(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = app.store.clone();
    let assessment = tokio::task::spawn_blocking(move || load_owned(&store, id, user.id))
        .await
        .map_err(join_error)??;
    Ok(Json(progress(&assessment, &app.catalog, app.page_size())))
}

/// POST /api/assessments/{id}/answers — record the current page and advance.
pub async fn submit_answers(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<AnswersBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut answers = BTreeMap::new();
    for (key, value) in body.answers {
        let qid: u32 = key
            .parse()
            .map_err(|_| AppError::bad_request(format!("invalid question id: {key}")))?;
        answers.insert(qid, value);
    }

    let store = app.store.clone();
    let catalog = app.catalog.clone();
    let page_size = app.page_size();
    let (assessment, recorded) = tokio::task::spawn_blocking(move || -> Result<_, AppError> {
        let mut assessment = load_owned(&store, id, user.id)?;
        if assessment.is_complete() {
            return Err(AppError::conflict("assessment is already complete"));
        }
        let from_cursor = assessment.current_question;
        let responses = assessment.submit_page(&catalog, page_size, &answers)?;
        store.record_responses(&assessment, from_cursor, &responses)?;
        Ok((assessment, responses.len()))
    })
    .await
    .map_err(join_error)??;

    tracing::info!(
        assessment = %assessment.id,
        recorded,
        cursor = assessment.current_question,
        "page submitted"
    );
    Ok(Json(progress(&assessment, &app.catalog, app.page_size())))
}

/// POST /api/assessments/{id}/complete — score and finalize.
pub async fn complete_assessment(
    State(app): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = app.store.clone();
    let catalog = app.catalog.clone();
    let assessment = tokio::task::spawn_blocking(move || -> Result<Assessment, AppError> {
        let assessment = load_owned(&store, id, user.id)?;
        if assessment.is_complete() {
            return Ok(assessment);
        }
        if !assessment.is_exhausted(&catalog) {
            return Err(AppError::conflict("assessment has unanswered questions"));
        }
        Ok(store.finalize(id, &catalog, Utc::now())?)
    })
    .await
    .map_err(join_error)??;

    tracing::info!(
        assessment = %assessment.id,
        total = assessment.total_score,
        level = ?assessment.readiness_level,
        "assessment finalized"
    );
    Ok(Json(serde_json::json!({
        "assessment": assessment,
        "report": readiness_core::report::Report::from_assessment(&assessment),
    })))
}
