//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use study_buddy_core::{
    domain::{SessionUser, UserRole},
    PortError,
};
use tracing::debug;

use crate::{
    error::ApiError,
    web::{auth::session_id_from_headers, state::AppState},
};

/// Middleware that validates the auth session cookie.
///
/// If valid, inserts the `SessionUser` into request extensions for handlers to use.
/// If invalid or missing, returns 401 Unauthorized.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_session_id =
        session_id_from_headers(req.headers()).ok_or(PortError::Unauthorized)?;

    let user = state
        .sessions
        .validate_auth_session(auth_session_id)
        .await
        .map_err(|e| {
            debug!("Rejected auth session: {}", e);
            PortError::Unauthorized
        })?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Middleware that only lets admins through. Must run after `require_auth`.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    match req.extensions().get::<SessionUser>() {
        Some(user) if user.role == UserRole::Admin => Ok(next.run(req).await),
        Some(_) => Err(PortError::Forbidden.into()),
        None => Err(PortError::Unauthorized.into()),
    }
}
