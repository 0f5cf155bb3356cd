use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use readiness_core::ReadinessError;

// ---------------------------------------------------------------------------
// Internal sentinel for explicit status codes
// ---------------------------------------------------------------------------

/// Private sentinel carrying an explicit HTTP status through the
/// `anyhow::Error` chain without touching the `ReadinessError` enum.
#[derive(Debug)]
struct StatusError(StatusCode, String);

impl std::fmt::Display for StatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.1)
    }
}

impl std::error::Error for StatusError {}

// ---------------------------------------------------------------------------
// AppError
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    fn with_status(status: StatusCode, msg: impl Into<String>) -> Self {
        Self(StatusError(status, msg.into()).into())
    }

    /// 400 Bad Request.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, msg)
    }

    /// 401 Unauthorized: no valid session.
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::with_status(StatusCode::UNAUTHORIZED, msg)
    }

    /// 403 Forbidden: signed in, but not the owner.
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::with_status(StatusCode::FORBIDDEN, msg)
    }

    /// 404 Not Found.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::with_status(StatusCode::NOT_FOUND, msg)
    }

    /// 409 Conflict.
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::with_status(StatusCode::CONFLICT, msg)
    }

    fn status(&self) -> StatusCode {
        if let Some(s) = self.0.downcast_ref::<StatusError>() {
            return s.0;
        }
        match self.0.downcast_ref::<ReadinessError>() {
            Some(e) => match e {
                ReadinessError::NotInitialized
                | ReadinessError::InvalidEmail(_)
                | ReadinessError::InvalidCategory(_) => StatusCode::BAD_REQUEST,
                ReadinessError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                ReadinessError::AssessmentNotFound(_)
                | ReadinessError::UserNotFound(_) => StatusCode::NOT_FOUND,
                ReadinessError::UserExists(_) | ReadinessError::InvalidState(_) => {
                    StatusCode::CONFLICT
                }
                ReadinessError::InvalidAnswer { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                ReadinessError::InvalidCatalog(_)
                | ReadinessError::Store(_)
                | ReadinessError::Io(_)
                | ReadinessError::Yaml(_)
                | ReadinessError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {:#}", self.0);
        }
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
