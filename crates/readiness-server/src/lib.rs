pub mod auth;
pub mod error;
pub mod pdf;
pub mod routes;
pub mod state;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(app_state: state::AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Everything below requires a live session cookie.
    let protected = Router::new()
        .route("/api/logout", post(routes::auth::logout))
        .route("/api/me", get(routes::auth::me))
        .route(
            "/api/assessments",
            get(routes::assessments::list_assessments).post(routes::assessments::start_assessment),
        )
        .route(
            "/api/assessments/{id}",
            get(routes::assessments::get_assessment),
        )
        .route(
            "/api/assessments/{id}/answers",
            post(routes::assessments::submit_answers),
        )
        .route(
            "/api/assessments/{id}/complete",
            post(routes::assessments::complete_assessment),
        )
        .route(
            "/api/assessments/{id}/report",
            get(routes::reports::pdf_report),
        )
        .route(
            "/api/assessments/{id}/report.md",
            get(routes::reports::markdown_report),
        )
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth::require_session,
        ));

    Router::new()
        .route("/api/health", get(routes::catalog::health))
        .route("/api/catalog", get(routes::catalog::get_catalog))
        .route("/api/register", post(routes::auth::register))
        .route("/api/login", post(routes::auth::login))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the readiness server on `port`.
pub async fn serve(root: PathBuf, port: u16, open_browser: bool) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(root, listener, open_browser).await
}

/// Start the readiness server on a pre-bound listener.
///
/// The caller can read the actual port before starting (useful when
/// `port = 0` and the OS picks a free port).
pub async fn serve_on(
    root: PathBuf,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app_state = tokio::task::spawn_blocking(move || state::AppState::open(root)).await??;
    let app = build_router(app_state);

    tracing::info!("readiness server listening on http://localhost:{actual_port}");

    if open_browser {
        let url = format!("http://localhost:{actual_port}/api/health");
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;
    Ok(())
}
