//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for login, logout, and session lookup.

use crate::{
    error::{ApiError, ErrorBody},
    web::state::AppState,
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2, PasswordHash, PasswordVerifier,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use chrono::{Duration, Utc};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::sync::Arc;
use study_buddy_core::{domain::SessionUser, PortError};
use tracing::{error, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "session";
const SESSION_DAYS: i64 = 30;

/// Checked against when the email is unknown, so both failure paths run argon2 once.
static UNKNOWN_ACCOUNT_HASH: Lazy<Option<String>> = Lazy::new(|| {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(b"no-such-account", &salt)
        .map(|hash| hash.to_string())
        .ok()
});

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Reads the auth session id out of the `Cookie` header.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())?
        .split(';')
        .find_map(|c| {
            c.trim()
                .strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
        })
        .filter(|id| !id.is_empty())
}

fn password_matches(password: &str, hashed_password: &str) -> Result<bool, ApiError> {
    let parsed_hash = PasswordHash::new(hashed_password).map_err(|e| {
        error!("Failed to parse password hash: {:?}", e);
        ApiError::Internal("Authentication error".to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn invalid_credentials() -> ApiError {
    ApiError::Port(PortError::Authentication(
        "Invalid email or password".to_string(),
    ))
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/login - Login with one of the configured accounts
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = SessionUser),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    // 1. Look up the account by email
    let creds = match state.accounts.get_credentials_by_email(&req.email).await {
        Ok(creds) => creds,
        Err(PortError::NotFound(_)) => {
            warn!("Login attempt for unknown email");
            if let Some(hash) = UNKNOWN_ACCOUNT_HASH.as_deref() {
                let _ = password_matches(&req.password, hash);
            }
            return Err(invalid_credentials());
        }
        Err(e) => return Err(e.into()),
    };

    // 2. Verify password
    if !password_matches(&req.password, &creds.hashed_password)? {
        return Err(invalid_credentials());
    }

    // 3. Create the auth session
    let auth_session_id = Uuid::new_v4().to_string();
    let expires_at = Utc::now() + Duration::days(SESSION_DAYS);
    state
        .sessions
        .create_auth_session(&auth_session_id, creds.user.clone(), expires_at)
        .await?;
    info!(user_id = %creds.user.user_id, "User logged in");

    // 4. Return the user with the session cookie
    let cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE,
        auth_session_id,
        Duration::days(SESSION_DAYS).num_seconds()
    );
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(creds.user),
    ))
}

/// POST /auth/logout - Logout and invalidate session
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logout successful"),
        (status = 401, description = "No active session", body = ErrorBody)
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let auth_session_id =
        session_id_from_headers(&headers).ok_or(ApiError::Port(PortError::Unauthorized))?;
    state.sessions.delete_auth_session(auth_session_id).await?;

    let cookie = format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", SESSION_COOKIE);
    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)]))
}

/// GET /auth/session - The currently signed-in user
#[utoipa::path(
    get,
    path = "/auth/session",
    responses(
        (status = 200, description = "Active session", body = SessionUser),
        (status = 401, description = "No active session", body = ErrorBody)
    )
)]
pub async fn session_handler(Extension(user): Extension<SessionUser>) -> Json<SessionUser> {
    Json(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn session_cookie_is_found_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session=abc-123; lang=en"),
        );
        assert_eq!(session_id_from_headers(&headers), Some("abc-123"));
    }

    #[test]
    fn similarly_named_cookie_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("session_hint=1"));
        assert_eq!(session_id_from_headers(&headers), None);
        assert_eq!(session_id_from_headers(&HeaderMap::new()), None);
    }

    #[test]
    fn unknown_account_hash_is_a_real_hash_that_matches_nothing() {
        let hash = UNKNOWN_ACCOUNT_HASH.as_deref().unwrap();
        assert!(PasswordHash::new(hash).is_ok());
        for password in ["admin123", "user123", ""] {
            assert!(matches!(password_matches(password, hash), Ok(false)));
        }
    }

    #[test]
    fn password_matches_checks_the_stored_hash() {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(b"secret", &salt)
            .unwrap()
            .to_string();
        assert!(matches!(password_matches("secret", &hash), Ok(true)));
        assert!(matches!(password_matches("Secret", &hash), Ok(false)));
        assert!(matches!(
            password_matches("secret", "not-a-phc-string"),
            Err(ApiError::Internal(_))
        ));
    }
}
