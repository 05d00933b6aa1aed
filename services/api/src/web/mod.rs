pub mod admin;
pub mod auth;
pub mod middleware;
pub mod rest;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use middleware::{require_admin, require_auth};
pub use state::AppState;

/// Builds the full API router: public auth routes, the session-guarded study
/// routes and the admin-only routes.
pub fn router(app_state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/auth/session", get(auth::session_handler))
        .route("/upload", post(rest::upload_handler))
        .route("/summarize", post(rest::summarize_handler))
        .route("/explain", post(rest::explain_handler))
        .route("/generate-flashcards", post(rest::generate_flashcards_handler))
        .route("/generate-quiz", post(rest::generate_quiz_handler))
        .route("/tts", post(rest::tts_handler))
        .route("/tts/voices", get(rest::list_voices_handler))
        .route("/quiz/score", post(rest::score_quiz_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    // Admin routes: the outer layer runs first, so auth precedes the role check.
    let admin_routes = Router::new()
        .route(
            "/admin/users",
            get(admin::list_users_handler).post(admin::manage_user_handler),
        )
        .layer(axum_middleware::from_fn(require_admin))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .layer(DefaultBodyLimit::max(app_state.config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
