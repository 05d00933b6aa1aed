//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the study endpoints and the master
//! definition for the OpenAPI specification.

use crate::{
    adapters::tts::is_indian_voice,
    error::{ApiError, ErrorBody},
    web::{admin, auth, state::AppState},
};
use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::JsonRejection,
        Multipart, State,
    },
    response::Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use study_buddy_core::{
    chunking,
    domain::{
        Difficulty, Flashcard, Language, Narration, NarrationEngine, NarrationRequest,
        QuizQuestion, QuizResult, SpeechSettings, SummaryResult, Voice, VoiceInfo,
    },
    scoring, study, PortError,
};
use tracing::{info, instrument};
use utoipa::{OpenApi, ToSchema};

pub const MAX_GENERATION_COUNT: u32 = 50;
const DEFAULT_FLASHCARD_COUNT: u32 = 5;
const DEFAULT_QUESTION_COUNT: u32 = 10;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        upload_handler,
        summarize_handler,
        explain_handler,
        generate_flashcards_handler,
        generate_quiz_handler,
        tts_handler,
        list_voices_handler,
        score_quiz_handler,
        auth::login_handler,
        auth::logout_handler,
        auth::session_handler,
        admin::list_users_handler,
        admin::manage_user_handler,
    ),
    components(
        schemas(
            UploadResponse, SummarizeRequest, SummaryResult, ExplainRequest, ExplainResponse,
            FlashcardsRequest, FlashcardsResponse, Flashcard, QuizRequest, QuizResponse,
            QuizQuestion, TtsRequest, TtsResponse, TtsAudioResponse, SpeechSettings, VoicesResponse,
            VoiceInfo, ScoreQuizRequest, QuizResult, Language, Difficulty, NarrationEngine,
            ErrorBody, auth::LoginRequest, admin::UsersResponse, admin::UserResponse,
            admin::ManageUserRequest,
        )
    ),
    tags(
        (name = "Study Buddy API", description = "Turns uploaded PDFs into summaries, flashcards, quizzes and narration.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Request and Response Structs
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct UploadResponse {
    pub chunks: Vec<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub text: String,
    /// Defaults to `telugu`.
    pub language: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct ExplainRequest {
    #[serde(default)]
    pub chunk: String,
    /// Defaults to `telugu`.
    pub language: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct ExplainResponse {
    pub explanation: String,
}

#[derive(Deserialize, ToSchema)]
pub struct FlashcardsRequest {
    #[serde(default)]
    pub text: String,
    pub language: Option<String>,
    pub count: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct FlashcardsResponse {
    pub flashcards: Vec<Flashcard>,
    pub count: usize,
    pub language: Language,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizRequest {
    #[serde(default)]
    pub text: String,
    pub language: Option<String>,
    pub question_count: Option<u32>,
    pub difficulty: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct QuizResponse {
    pub questions: Vec<QuizQuestion>,
    pub count: usize,
    pub language: Language,
    pub difficulty: Difficulty,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TtsRequest {
    #[serde(default)]
    pub text: String,
    /// A voice alias (`varun-r`, `monika-sogam`) or a raw provider id.
    pub voice_id: Option<String>,
    pub language: Option<String>,
    pub engine: Option<NarrationEngine>,
    pub rate: Option<f32>,
    pub pitch: Option<f32>,
    pub volume: Option<f32>,
}

#[derive(Serialize, ToSchema)]
pub struct TtsAudioResponse {
    /// Base64-encoded audio.
    pub audio: String,
    #[serde(rename = "voiceId")]
    pub voice_id: String,
    pub model_id: String,
}

/// Cloud narration returns audio; browser narration returns utterance settings.
#[derive(Serialize, ToSchema)]
#[serde(untagged)]
pub enum TtsResponse {
    Audio(TtsAudioResponse),
    Browser(SpeechSettings),
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoicesResponse {
    pub all_voices: Vec<VoiceInfo>,
    pub indian_voices: Vec<VoiceInfo>,
    pub total_voices: usize,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreQuizRequest {
    pub questions: Vec<QuizQuestion>,
    /// One entry per question. `null` or a negative number marks a skipped question.
    pub selected_answers: Vec<Option<i64>>,
    #[serde(default)]
    pub time_spent: u64,
}

//=========================================================================================
// Request Helpers
//=========================================================================================

fn require_text(text: &str, what: &str) -> Result<(), ApiError> {
    if text.trim().is_empty() {
        return Err(ApiError::validation(format!("No {} provided.", what)));
    }
    Ok(())
}

fn parse_language(raw: Option<&str>, default: Language) -> Result<Language, ApiError> {
    match raw {
        None => Ok(default),
        Some(s) if s.trim().is_empty() => Ok(default),
        Some(s) => s.parse().map_err(ApiError::validation),
    }
}

fn checked_count(count: Option<u32>, default: u32, field: &str) -> Result<u32, ApiError> {
    let count = count.unwrap_or(default);
    if !(1..=MAX_GENERATION_COUNT).contains(&count) {
        return Err(ApiError::validation(format!(
            "{} must be between 1 and {}",
            field, MAX_GENERATION_COUNT
        )));
    }
    Ok(count)
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Upload a PDF and get its text back as paragraph chunks.
#[utoipa::path(
    post,
    path = "/upload",
    request_body(content_type = "multipart/form-data", description = "A `file` part holding the PDF."),
    responses(
        (status = 200, description = "Text extracted", body = UploadResponse),
        (status = 400, description = "Missing file or not a PDF", body = ErrorBody),
        (status = 500, description = "The PDF could not be parsed", body = ErrorBody)
    )
)]
#[instrument(skip_all)]
pub async fn upload_handler(
    State(app_state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart
        .map_err(|e| ApiError::validation(format!("Expected a multipart form: {}", e)))?;

    let mut pdf_bytes: Option<Bytes> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Failed to read multipart data: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        // The declared type is checked before any bytes reach the parser.
        if field.content_type() != Some("application/pdf") {
            return Err(PortError::UnsupportedMediaType(
                "Invalid file type. Please upload a PDF.".to_string(),
            )
            .into());
        }
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation(format!("Failed to read file bytes: {}", e)))?;
        pdf_bytes = Some(data);
        break;
    }

    let pdf_bytes = pdf_bytes.ok_or_else(|| ApiError::validation("No file uploaded"))?;
    info!(bytes = pdf_bytes.len(), "Extracting uploaded PDF");

    let text = app_state.extractor.extract_text(&pdf_bytes).await?;
    let chunks = chunking::split_paragraphs(&text);
    info!(chunks = chunks.len(), "Upload processed");

    Ok(Json(UploadResponse { chunks }))
}

/// Summarize text in the requested language.
#[utoipa::path(
    post,
    path = "/summarize",
    request_body = SummarizeRequest,
    responses(
        (status = 200, description = "Markdown summary and its plain-text rendering", body = SummaryResult),
        (status = 400, description = "Missing text or unknown language", body = ErrorBody),
        (status = 500, description = "Missing credential or upstream failure", body = ErrorBody)
    )
)]
#[instrument(skip_all)]
pub async fn summarize_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<SummarizeRequest>, JsonRejection>,
) -> Result<Json<SummaryResult>, ApiError> {
    let Json(req) = payload?;
    require_text(&req.text, "text")?;
    let language = parse_language(req.language.as_deref(), Language::Telugu)?;

    let result = study::summarize(
        app_state.llm.as_ref(),
        &app_state.config.summary_model,
        &req.text,
        language,
    )
    .await?;
    Ok(Json(result))
}

/// Explain one chunk of the document.
#[utoipa::path(
    post,
    path = "/explain",
    request_body = ExplainRequest,
    responses(
        (status = 200, description = "Explanation generated", body = ExplainResponse),
        (status = 400, description = "Missing chunk or unknown language", body = ErrorBody),
        (status = 500, description = "Missing credential or upstream failure", body = ErrorBody)
    )
)]
#[instrument(skip_all)]
pub async fn explain_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<ExplainRequest>, JsonRejection>,
) -> Result<Json<ExplainResponse>, ApiError> {
    let Json(req) = payload?;
    require_text(&req.chunk, "text chunk")?;
    let language = parse_language(req.language.as_deref(), Language::Telugu)?;

    let explanation = study::explain(
        app_state.llm.as_ref(),
        &app_state.config.summary_model,
        &req.chunk,
        language,
    )
    .await?;
    Ok(Json(ExplainResponse { explanation }))
}

/// Generate flashcards from text.
#[utoipa::path(
    post,
    path = "/generate-flashcards",
    request_body = FlashcardsRequest,
    responses(
        (status = 200, description = "Flashcards generated", body = FlashcardsResponse),
        (status = 400, description = "Missing text, bad count or unknown language", body = ErrorBody),
        (status = 500, description = "Upstream failure or malformed model output", body = ErrorBody)
    )
)]
#[instrument(skip_all)]
pub async fn generate_flashcards_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<FlashcardsRequest>, JsonRejection>,
) -> Result<Json<FlashcardsResponse>, ApiError> {
    let Json(req) = payload?;
    require_text(&req.text, "text")?;
    let language = parse_language(req.language.as_deref(), Language::English)?;
    let count = checked_count(req.count, DEFAULT_FLASHCARD_COUNT, "count")?;

    let flashcards = study::generate_flashcards(
        app_state.llm.as_ref(),
        &app_state.config.generation_model,
        &req.text,
        language,
        count,
    )
    .await?;

    Ok(Json(FlashcardsResponse {
        count: flashcards.len(),
        flashcards,
        language,
    }))
}

/// Generate a multiple-choice quiz from text.
#[utoipa::path(
    post,
    path = "/generate-quiz",
    request_body = QuizRequest,
    responses(
        (status = 200, description = "Quiz generated", body = QuizResponse),
        (status = 400, description = "Missing text, bad count, difficulty or language", body = ErrorBody),
        (status = 500, description = "Upstream failure or malformed model output", body = ErrorBody)
    )
)]
#[instrument(skip_all)]
pub async fn generate_quiz_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<QuizRequest>, JsonRejection>,
) -> Result<Json<QuizResponse>, ApiError> {
    let Json(req) = payload?;
    require_text(&req.text, "text")?;
    let language = parse_language(req.language.as_deref(), Language::English)?;
    let count = checked_count(req.question_count, DEFAULT_QUESTION_COUNT, "questionCount")?;
    let difficulty = match req.difficulty.as_deref() {
        None => Difficulty::default(),
        Some(raw) => raw.parse().map_err(ApiError::validation)?,
    };

    let questions = study::generate_quiz(
        app_state.llm.as_ref(),
        &app_state.config.generation_model,
        &req.text,
        language,
        difficulty,
        count,
    )
    .await?;

    Ok(Json(QuizResponse {
        count: questions.len(),
        questions,
        language,
        difficulty,
    }))
}

/// Narrate text with the cloud voice or get browser speech settings.
#[utoipa::path(
    post,
    path = "/tts",
    request_body = TtsRequest,
    responses(
        (status = 200, description = "Base64 audio (cloud engine) or speech settings (browser engine)", body = TtsResponse),
        (status = 400, description = "Missing text, unknown voice or language", body = ErrorBody),
        (status = 401, description = "Provider rejected the API key", body = ErrorBody),
        (status = 403, description = "Provider denied access", body = ErrorBody),
        (status = 429, description = "Provider rate limit", body = ErrorBody),
        (status = 500, description = "Missing credential or synthesis failure", body = ErrorBody)
    )
)]
#[instrument(skip_all)]
pub async fn tts_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<TtsRequest>, JsonRejection>,
) -> Result<Json<TtsResponse>, ApiError> {
    let Json(req) = payload?;
    require_text(&req.text, "text")?;
    let language = parse_language(req.language.as_deref(), Language::English)?;
    let voice = req
        .voice_id
        .as_deref()
        .map(str::parse::<Voice>)
        .transpose()
        .map_err(ApiError::validation)?;
    let engine = req.engine.unwrap_or_default();

    let request = NarrationRequest {
        text: req.text,
        language,
        voice,
        rate: req.rate,
        pitch: req.pitch,
        volume: req.volume,
    };

    let response = match app_state.narrator(engine).narrate(&request).await? {
        Narration::Audio(audio) => TtsResponse::Audio(TtsAudioResponse {
            audio: STANDARD.encode(&audio.audio),
            voice_id: audio.voice_id,
            model_id: audio.model_id,
        }),
        Narration::ClientSide(settings) => TtsResponse::Browser(settings),
    };
    Ok(Json(response))
}

/// List the cloud provider's voices.
#[utoipa::path(
    get,
    path = "/tts/voices",
    responses(
        (status = 200, description = "All voices and the Indian-sounding subset", body = VoicesResponse),
        (status = 500, description = "Missing credential or provider failure", body = ErrorBody)
    )
)]
pub async fn list_voices_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<VoicesResponse>, ApiError> {
    let all_voices = app_state.voices.list_voices().await?;
    let indian_voices = all_voices
        .iter()
        .filter(|v| is_indian_voice(v))
        .cloned()
        .collect();
    Ok(Json(VoicesResponse {
        total_voices: all_voices.len(),
        all_voices,
        indian_voices,
    }))
}

/// Score a completed quiz attempt.
#[utoipa::path(
    post,
    path = "/quiz/score",
    request_body = ScoreQuizRequest,
    responses(
        (status = 200, description = "Attempt scored", body = QuizResult),
        (status = 400, description = "Answer count does not match question count", body = ErrorBody)
    )
)]
pub async fn score_quiz_handler(
    payload: Result<Json<ScoreQuizRequest>, JsonRejection>,
) -> Result<Json<QuizResult>, ApiError> {
    let Json(req) = payload?;
    let selections: Vec<Option<usize>> = req
        .selected_answers
        .iter()
        .map(|s| s.and_then(|v| usize::try_from(v).ok()))
        .collect();
    let result = scoring::score_quiz(&req.questions, &selections, req.time_spent)?;
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_defaults_and_rejects_unknown() {
        assert_eq!(parse_language(None, Language::Telugu).unwrap(), Language::Telugu);
        assert_eq!(parse_language(Some("  "), Language::English).unwrap(), Language::English);
        assert_eq!(parse_language(Some("Hindi"), Language::Telugu).unwrap(), Language::Hindi);
        assert!(parse_language(Some("klingon"), Language::English).is_err());
    }

    #[test]
    fn counts_are_bounded() {
        assert_eq!(checked_count(None, 5, "count").unwrap(), 5);
        assert_eq!(checked_count(Some(50), 5, "count").unwrap(), 50);
        assert!(checked_count(Some(0), 5, "count").is_err());
        assert!(checked_count(Some(51), 5, "count").is_err());
    }

    #[test]
    fn tts_response_documents_both_engines() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let schema = &doc["paths"]["/tts"]["post"]["responses"]["200"]["content"]
            ["application/json"]["schema"];
        assert_eq!(schema["$ref"], "#/components/schemas/TtsResponse");

        let tts = doc["components"]["schemas"]["TtsResponse"].to_string();
        assert!(tts.contains("#/components/schemas/TtsAudioResponse"), "{tts}");
        assert!(tts.contains("#/components/schemas/SpeechSettings"), "{tts}");
    }
}
