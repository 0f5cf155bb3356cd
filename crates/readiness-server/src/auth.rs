use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "readiness_session";

// ---------------------------------------------------------------------------
// Passwords
// ---------------------------------------------------------------------------

/// Hash a password with Argon2id, returning the PHC string (salt included).
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow::anyhow!("failed to hash password: {e}"))
}

/// Check a password against a stored PHC hash.
pub fn verify_password(password: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| anyhow::anyhow!("invalid password hash format: {e}"))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// A hash of a throwaway password, computed once per process.
fn dummy_hash() -> Option<&'static str> {
    static HASH: OnceLock<Option<String>> = OnceLock::new();
    HASH.get_or_init(|| hash_password("readiness-no-such-account").ok())
        .as_deref()
}

/// Run one Argon2 verification for a login that has no account behind it,
/// so unknown emails cost as much as wrong passwords.
pub fn burn_verification(password: &str) {
    if let Some(hash) = dummy_hash() {
        let _ = verify_password(password, hash);
    }
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

struct Session {
    user_id: Uuid,
    last_seen: Instant,
}

/// In-memory session table keyed by cookie token.
///
/// A session expires once it has been idle for `ttl`; every successful
/// lookup refreshes it.
#[derive(Clone)]
pub struct Sessions {
    inner: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl Sessions {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Start a session for `user_id` and return its token.
    pub async fn create(&self, user_id: Uuid) -> String {
        let token = generate_token();
        let mut map = self.inner.write().await;
        let ttl = self.ttl;
        map.retain(|_, s| s.last_seen.elapsed() < ttl);
        map.insert(
            token.clone(),
            Session {
                user_id,
                last_seen: Instant::now(),
            },
        );
        token
    }

    /// The user behind `token`, if the session is still live.
    pub async fn resolve(&self, token: &str) -> Option<Uuid> {
        let mut map = self.inner.write().await;
        let session = map.get_mut(token)?;
        if session.last_seen.elapsed() >= self.ttl {
            map.remove(token);
            return None;
        }
        session.last_seen = Instant::now();
        Some(session.user_id)
    }

    pub async fn remove(&self, token: &str) -> bool {
        self.inner.write().await.remove(token).is_some()
    }
}

/// Generate a random 48-character alphanumeric session token.
pub fn generate_token() -> String {
    use rand::{distributions::Alphanumeric, Rng};
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(48)
        .map(char::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Cookies
// ---------------------------------------------------------------------------

pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/")
}

pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
}

/// Read the session token from the request's `Cookie` header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get("cookie").and_then(|v| v.to_str().ok())?;
    let prefix = format!("{SESSION_COOKIE}=");
    cookies
        .split(';')
        .find_map(|part| part.trim().strip_prefix(prefix.as_str()))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Middleware
// ---------------------------------------------------------------------------

/// The signed-in user, inserted into request extensions by [`require_session`].
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub token: String,
}

/// Axum middleware that rejects requests without a live session cookie.
pub async fn require_session(State(app): State<AppState>, mut req: Request, next: Next) -> Response {
    let Some(token) = session_token(req.headers()) else {
        return AppError::unauthorized("unauthorized").into_response();
    };
    let Some(user_id) = app.sessions.resolve(&token).await else {
        return AppError::unauthorized("session expired").into_response();
    };
    req.extensions_mut().insert(CurrentUser { id: user_id, token });
    next.run(req).await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::{body::Body, http::Request, middleware, routing::get, Extension, Router};
    use tower::ServiceExt;

    async fn whoami(Extension(user): Extension<CurrentUser>) -> String {
        user.id.to_string()
    }

    fn test_app(state: AppState) -> Router {
        Router::new()
            .route("/api/me", get(whoami))
            .layer(middleware::from_fn_with_state(state.clone(), require_session))
            .with_state(state)
    }

    fn test_state(dir: &tempfile::TempDir) -> AppState {
        AppState::open(dir.path().to_path_buf()).unwrap()
    }

    #[test]
    fn hash_and_verify() {
        let hash = hash_password("correct-horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct-horse", &hash).unwrap());
        assert!(!verify_password("wrong-horse", &hash).unwrap());
    }

    #[test]
    fn dummy_hash_is_a_real_argon2_hash() {
        let hash = dummy_hash().unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!verify_password("hunter22", hash).unwrap());
        burn_verification("hunter22");
    }

    #[test]
    fn verify_rejects_malformed_hash() {
        assert!(verify_password("pw", "not-a-hash").is_err());
    }

    #[test]
    fn tokens_are_unique_and_alphanumeric() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 48);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn session_token_parses_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert("cookie", "theme=dark; readiness_session=abc123".parse().unwrap());
        assert_eq!(session_token(&headers).as_deref(), Some("abc123"));

        headers.insert("cookie", "readiness_session=".parse().unwrap());
        assert_eq!(session_token(&headers), None);
    }

    #[test]
    fn cookies_are_http_only() {
        assert!(session_cookie("t").contains("HttpOnly"));
        assert!(session_cookie("t").contains("SameSite=Lax"));
        assert!(clear_session_cookie().contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn sessions_resolve_and_remove() {
        let sessions = Sessions::new(Duration::from_secs(60));
        let user = Uuid::new_v4();
        let token = sessions.create(user).await;
        assert_eq!(sessions.resolve(&token).await, Some(user));
        assert!(sessions.remove(&token).await);
        assert_eq!(sessions.resolve(&token).await, None);
    }

    #[tokio::test]
    async fn zero_ttl_expires_immediately() {
        let sessions = Sessions::new(Duration::ZERO);
        let token = sessions.create(Uuid::new_v4()).await;
        assert_eq!(sessions.resolve(&token).await, None);
    }

    #[tokio::test]
    async fn missing_cookie_returns_401_json() {
        let dir = tempfile::TempDir::new().unwrap();
        let resp = test_app(test_state(&dir))
            .oneshot(Request::builder().uri("/api/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let ct = resp.headers().get("content-type").unwrap().to_str().unwrap();
        assert!(ct.contains("application/json"));
    }

    #[tokio::test]
    async fn unknown_token_returns_401() {
        let dir = tempfile::TempDir::new().unwrap();
        let resp = test_app(test_state(&dir))
            .oneshot(
                Request::builder()
                    .uri("/api/me")
                    .header("cookie", "readiness_session=forged")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn live_session_passes_through() {
        let dir = tempfile::TempDir::new().unwrap();
        let state = test_state(&dir);
        let user = Uuid::new_v4();
        let token = state.sessions.create(user).await;
        let resp = test_app(state)
            .oneshot(
                Request::builder()
                    .uri("/api/me")
                    .header("cookie", format!("readiness_session={token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
