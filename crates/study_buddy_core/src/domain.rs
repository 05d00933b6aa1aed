//! crates/study_buddy_core/src/domain.rs
//!
//! Defines the core data structures for the application.
//! Every entity here is a request-scoped DTO; nothing outlives a single
//! HTTP exchange except the in-memory admin fixtures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

//=========================================================================================
// Selectors
//=========================================================================================

/// One of the five study-material languages. Controls prompt template choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Telugu,
    Hindi,
    Tamil,
    Kannada,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::English,
        Language::Telugu,
        Language::Hindi,
        Language::Tamil,
        Language::Kannada,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Telugu => "telugu",
            Language::Hindi => "hindi",
            Language::Tamil => "tamil",
            Language::Kannada => "kannada",
        }
    }

    /// Human-readable name, used inside prompts.
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Telugu => "Telugu",
            Language::Hindi => "Hindi",
            Language::Tamil => "Tamil",
            Language::Kannada => "Kannada",
        }
    }

    pub fn is_indian(&self) -> bool {
        !matches!(self, Language::English)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "english" => Ok(Language::English),
            "telugu" => Ok(Language::Telugu),
            "hindi" => Ok(Language::Hindi),
            "tamil" => Ok(Language::Tamil),
            "kannada" => Ok(Language::Kannada),
            other => Err(format!("unsupported language '{}'", other)),
        }
    }
}

/// Quiz difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unsupported difficulty '{}'", other)),
        }
    }
}

//=========================================================================================
// Study Material
//=========================================================================================

/// A summary in two renderings: markdown for display, plain text for speech.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SummaryResult {
    pub summary: String,
    #[serde(rename = "plainText")]
    pub plain_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Flashcard {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub explanation: String,
    pub category: String,
}

/// The outcome of one quiz attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub total_questions: usize,
    pub correct_answers: usize,
    /// Percentage in `0..=100`.
    pub score: u32,
    /// Elapsed seconds.
    pub time_spent: u64,
    pub completed_at: DateTime<Utc>,
}

//=========================================================================================
// Narration
//=========================================================================================

/// The two cloud voices the application is tuned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Voice {
    /// Male Indian English voice, used for the Indian languages.
    VarunR,
    /// Female voice, used for English.
    MonikaSogam,
}

impl Voice {
    /// The provider-side identifier for this voice.
    pub fn provider_id(&self) -> &'static str {
        match self {
            Voice::VarunR => "ZnctpSuzUbwVNbRu45m0",
            Voice::MonikaSogam => "2zRM7PkgwBPiau2jvVXc",
        }
    }

    pub fn alias(&self) -> &'static str {
        match self {
            Voice::VarunR => "varun-r",
            Voice::MonikaSogam => "monika-sogam",
        }
    }

    pub fn for_language(language: Language) -> Self {
        if language.is_indian() {
            Voice::VarunR
        } else {
            Voice::MonikaSogam
        }
    }
}

impl FromStr for Voice {
    type Err = String;

    /// Accepts either the alias (`varun-r`) or the raw provider id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        [Voice::VarunR, Voice::MonikaSogam]
            .into_iter()
            .find(|v| s == v.provider_id() || s.eq_ignore_ascii_case(v.alias()))
            .ok_or_else(|| format!("unknown voice '{}'", s))
    }
}

/// Which voice engine produces the speech.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NarrationEngine {
    #[default]
    Cloud,
    Browser,
}

/// Input to a narration provider.
#[derive(Debug, Clone)]
pub struct NarrationRequest {
    pub text: String,
    pub language: Language,
    pub voice: Option<Voice>,
    pub rate: Option<f32>,
    pub pitch: Option<f32>,
    pub volume: Option<f32>,
}

/// Synthesized audio returned by the cloud engine.
#[derive(Debug, Clone)]
pub struct NarrationAudio {
    pub audio: Vec<u8>,
    pub voice_id: String,
    pub model_id: String,
}

/// Utterance configuration for the browser's built-in speech synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SpeechSettings {
    pub text: String,
    /// BCP-47 tag the client should prefer when picking a voice.
    pub lang: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

/// What a narration provider hands back.
#[derive(Debug, Clone)]
pub enum Narration {
    Audio(NarrationAudio),
    ClientSide(SpeechSettings),
}

/// A voice advertised by the cloud provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VoiceInfo {
    pub id: String,
    pub name: String,
    pub category: String,
}

//=========================================================================================
// LLM Requests
//=========================================================================================

/// A single-turn chat completion request.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

//=========================================================================================
// Users and Sessions
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
}

impl UserStatus {
    pub fn toggled(self) -> Self {
        match self {
            UserStatus::Active => UserStatus::Inactive,
            UserStatus::Inactive => UserStatus::Active,
        }
    }
}

/// A user as shown on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub last_active: DateTime<Utc>,
    pub documents_processed: u32,
    pub created_at: DateTime<Utc>,
}

/// Editable fields of an admin user. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UserData {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
}

/// The signed-in principal attached to a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

// Only used internally for login - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: SessionUser,
    pub hashed_password: String,
}
