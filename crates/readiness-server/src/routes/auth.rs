use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use readiness_core::user::User;
use readiness_core::{paths, ReadinessError};
use serde::Deserialize;

use super::join_error;
use crate::auth::{self as session, CurrentUser};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RegisterBody {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// POST /api/register — create an account.
pub async fn register(
    State(app): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, AppError> {
    if body.password.is_empty() {
        return Err(AppError::bad_request("password is required"));
    }
    if body.password != body.confirm_password {
        return Err(AppError::bad_request("passwords do not match"));
    }

    let store = app.store.clone();
    let user = tokio::task::spawn_blocking(move || {
        let email = paths::normalize_email(&body.email)?;
        let hash = session::hash_password(&body.password)?;
        let user = User::new(&email, hash)?;
        store.create_user(&user)?;
        Ok::<_, AppError>(user)
    })
    .await
    .map_err(join_error)??;

    tracing::info!(user = %user.id, "user registered");
    Ok((StatusCode::CREATED, Json(user.public())))
}

/// POST /api/login — verify credentials and set the session cookie.
pub async fn login(
    State(app): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse, AppError> {
    let store = app.store.clone();
    let user = tokio::task::spawn_blocking(move || -> Result<Option<User>, AppError> {
        let Ok(email) = paths::normalize_email(&body.email) else {
            session::burn_verification(&body.password);
            return Ok(None);
        };
        let Some(user) = store.user_by_email(&email)? else {
            session::burn_verification(&body.password);
            return Ok(None);
        };
        if !session::verify_password(&body.password, &user.password_hash)? {
            return Ok(None);
        }
        Ok(Some(user))
    })
    .await
    .map_err(join_error)??;

    let Some(user) = user else {
        tracing::warn!("login failed");
        return Err(ReadinessError::InvalidCredentials.into());
    };

    let token = app.sessions.create(user.id).await;
    tracing::info!(user = %user.id, "user logged in");
    Ok((
        [(header::SET_COOKIE, session::session_cookie(&token))],
        Json(user.public()),
    ))
}

/// POST /api/logout — end the current session.
pub async fn logout(
    State(app): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> impl IntoResponse {
    app.sessions.remove(&current.token).await;
    (
        [(header::SET_COOKIE, session::clear_session_cookie())],
        Json(serde_json::json!({ "ok": true })),
    )
}

/// GET /api/me — the signed-in user.
pub async fn me(
    State(app): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = app.store.clone();
    let user = tokio::task::spawn_blocking(move || store.user(current.id))
        .await
        .map_err(join_error)??;
    Ok(Json(user.public()))
}
