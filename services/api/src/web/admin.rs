//! services/api/src/web/admin.rs
//!
//! Admin dashboard endpoints over the user repository. Guarded by
//! `require_auth` followed by `require_admin`.

use crate::{
    error::{ApiError, ErrorBody},
    web::state::AppState,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use study_buddy_core::domain::{AdminUser, SessionUser, UserData};
use tracing::info;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct UsersResponse {
    pub users: Vec<AdminUser>,
}

#[derive(Serialize, ToSchema)]
pub struct UserResponse {
    pub user: AdminUser,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum UserAction {
    Create,
    Update,
    Delete,
    ToggleStatus,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManageUserRequest {
    pub action: UserAction,
    pub user_id: Option<String>,
    pub user_data: Option<UserData>,
}

impl ManageUserRequest {
    fn user_id(&self) -> Result<&str, ApiError> {
        self.user_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ApiError::validation("User ID required"))
    }
}

/// GET /admin/users - List every user
#[utoipa::path(
    get,
    path = "/admin/users",
    responses(
        (status = 200, description = "All users", body = UsersResponse),
        (status = 401, description = "Not signed in", body = ErrorBody),
        (status = 403, description = "Not an admin", body = ErrorBody)
    )
)]
pub async fn list_users_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<UsersResponse>, ApiError> {
    let users = state.users.list_users().await?;
    Ok(Json(UsersResponse { users }))
}

/// POST /admin/users - Create, update, delete or toggle a user
#[utoipa::path(
    post,
    path = "/admin/users",
    request_body = ManageUserRequest,
    responses(
        (status = 200, description = "The affected user", body = UserResponse),
        (status = 400, description = "Missing userId or userData", body = ErrorBody),
        (status = 403, description = "Not an admin", body = ErrorBody),
        (status = 404, description = "Unknown user", body = ErrorBody)
    )
)]
pub async fn manage_user_handler(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<SessionUser>,
    payload: Result<Json<ManageUserRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let Json(req) = payload?;

    let user = match req.action {
        UserAction::Create => {
            let data = req
                .user_data
                .ok_or_else(|| ApiError::validation("User data required"))?;
            state.users.create_user(data).await?
        }
        UserAction::Update => {
            let user_id = req.user_id()?.to_string();
            let data = req
                .user_data
                .ok_or_else(|| ApiError::validation("User ID and data required"))?;
            state.users.update_user(&user_id, data).await?
        }
        UserAction::Delete => state.users.delete_user(req.user_id()?).await?,
        UserAction::ToggleStatus => state.users.toggle_status(req.user_id()?).await?,
    };

    info!(admin = %admin.user_id, action = ?req.action, target = %user.id, "Admin user action");
    Ok(Json(UserResponse { user }))
}
