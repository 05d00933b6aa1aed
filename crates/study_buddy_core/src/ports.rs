//! crates/study_buddy_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like LLM or TTS APIs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    AdminUser, ChatRequest, Narration, NarrationRequest, SessionUser, UserCredentials,
    UserData, VoiceInfo,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// The error taxonomy shared by every port.
///
/// Each variant corresponds to one failure class the HTTP layer renders
/// with its own status code.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// A required upstream credential is not configured.
    #[error("{0}")]
    Configuration(String),
    /// Missing or malformed caller input.
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    UnsupportedMediaType(String),
    /// The uploaded document could not be turned into text.
    #[error("Failed to extract text: {0}")]
    Extraction(String),
    /// The LLM call failed or produced nothing.
    #[error("Generation failed: {0}")]
    Generation(String),
    /// The LLM answered, but not in the requested shape.
    #[error("Malformed model output: {0}")]
    MalformedGeneration(String),
    #[error("Authentication failed: {0}")]
    Authentication(String),
    #[error("Access denied: {0}")]
    AccessDenied(String),
    #[error("Rate limited: {0}")]
    RateLimited(String),
    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden")]
    Forbidden,
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait TextExtractionService: Send + Sync {
    /// Extracts the embedded text of a PDF document, pages in order.
    async fn extract_text(&self, pdf_bytes: &[u8]) -> PortResult<String>;
}

#[async_trait]
pub trait ChatCompletionService: Send + Sync {
    /// Runs a single-turn chat completion and returns the first choice's text.
    async fn complete(&self, request: &ChatRequest) -> PortResult<String>;
}

#[async_trait]
pub trait NarrationProvider: Send + Sync {
    /// Turns plain text into speech, or into instructions for producing it.
    async fn narrate(&self, request: &NarrationRequest) -> PortResult<Narration>;
}

#[async_trait]
pub trait VoiceCatalog: Send + Sync {
    async fn list_voices(&self) -> PortResult<Vec<VoiceInfo>>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list_users(&self) -> PortResult<Vec<AdminUser>>;

    async fn create_user(&self, data: UserData) -> PortResult<AdminUser>;

    async fn update_user(&self, user_id: &str, data: UserData) -> PortResult<AdminUser>;

    async fn delete_user(&self, user_id: &str) -> PortResult<AdminUser>;

    /// Flips `active` <-> `inactive`.
    async fn toggle_status(&self, user_id: &str) -> PortResult<AdminUser>;
}

#[async_trait]
pub trait AccountService: Send + Sync {
    async fn get_credentials_by_email(&self, email: &str) -> PortResult<UserCredentials>;
}

#[async_trait]
pub trait AuthSessionStore: Send + Sync {
    async fn create_auth_session(
        &self,
        session_id: &str,
        user: SessionUser,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<SessionUser>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;
}
