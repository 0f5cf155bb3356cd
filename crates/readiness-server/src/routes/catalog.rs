use axum::extract::State;
use axum::Json;
use readiness_core::types::Category;

use crate::state::AppState;

/// GET /api/health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /api/catalog — the questionnaire with per-category caps.
pub async fn get_catalog(State(app): State<AppState>) -> Json<serde_json::Value> {
    let categories: Vec<serde_json::Value> = Category::all()
        .iter()
        .map(|&c| {
            serde_json::json!({
                "key": c,
                "name": c.display_name(),
                "max_score": c.max_score(),
                "questions": app.catalog.by_category(c).count(),
            })
        })
        .collect();

    Json(serde_json::json!({
        "version": app.catalog.version,
        "page_size": app.page_size(),
        "categories": categories,
        "questions": app.catalog.questions(),
    }))
}
