//! services/api/src/adapters/tts.rs
//!
//! This module contains the two narration engines. Both implement the
//! `NarrationProvider` port from the `core` crate:
//!
//! * `ElevenLabsNarrator` calls the ElevenLabs text-to-speech API and returns audio.
//! * `BrowserSpeechNarrator` makes no network call; it returns the utterance
//!   settings the browser's built-in speech synthesis should use.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use study_buddy_core::{
    domain::{
        Narration, NarrationAudio, NarrationRequest, SpeechSettings, Voice, VoiceInfo,
    },
    ports::{NarrationProvider, PortError, PortResult, VoiceCatalog},
};
use tracing::{debug, error, info};

//=========================================================================================
// ElevenLabs (cloud engine)
//=========================================================================================

const STABILITY: f32 = 0.75;
const SIMILARITY_BOOST: f32 = 0.75;

/// Name fragments that mark a provider voice as suited to Indian-language content.
const INDIAN_VOICE_MARKERS: [&str; 8] = [
    "indian", "india", "varun", "monika", "hindi", "telugu", "tamil", "kannada",
];

#[derive(Serialize)]
struct SynthesisBody<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
}

#[derive(Deserialize)]
struct VoicesResponse {
    voices: Vec<ProviderVoice>,
}

#[derive(Deserialize)]
struct ProviderVoice {
    voice_id: String,
    name: String,
    #[serde(default)]
    category: Option<String>,
}

/// An adapter that implements `NarrationProvider` and `VoiceCatalog` using ElevenLabs.
#[derive(Clone)]
pub struct ElevenLabsNarrator {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model_id: String,
}

impl ElevenLabsNarrator {
    /// Creates a new `ElevenLabsNarrator`.
    pub fn new(
        api_key: Option<String>,
        base_url: String,
        model_id: String,
        timeout: Duration,
    ) -> PortResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PortError::Unexpected(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            api_key,
            base_url,
            model_id,
        })
    }

    fn api_key(&self) -> PortResult<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            PortError::Configuration("ElevenLabs API key not set.".to_string())
        })
    }
}

/// Maps a non-success provider status to the narration failure taxonomy.
pub fn classify_failure(status: StatusCode, body: &str) -> PortError {
    match status {
        StatusCode::UNAUTHORIZED => PortError::Authentication(
            "Your ElevenLabs API key is invalid or expired.".to_string(),
        ),
        StatusCode::FORBIDDEN => PortError::AccessDenied(
            "Your API key doesn't have sufficient permissions or you've exceeded your usage limits."
                .to_string(),
        ),
        StatusCode::TOO_MANY_REQUESTS => PortError::RateLimited(
            "You've exceeded your API rate limits. Please try again later.".to_string(),
        ),
        other => PortError::Synthesis(format!("provider returned {}: {}", other, body)),
    }
}

pub fn is_indian_voice(voice: &VoiceInfo) -> bool {
    let name = voice.name.to_lowercase();
    INDIAN_VOICE_MARKERS.iter().any(|marker| name.contains(marker))
}

#[async_trait]
impl NarrationProvider for ElevenLabsNarrator {
    async fn narrate(&self, request: &NarrationRequest) -> PortResult<Narration> {
        let api_key = self.api_key()?;
        let voice = request
            .voice
            .unwrap_or_else(|| Voice::for_language(request.language));
        let voice_id = voice.provider_id();
        info!(voice = voice.alias(), chars = request.text.len(), "Requesting cloud narration");

        let body = SynthesisBody {
            text: &request.text,
            model_id: &self.model_id,
            voice_settings: VoiceSettings {
                stability: STABILITY,
                similarity_boost: SIMILARITY_BOOST,
            },
        };

        let response = self
            .http
            .post(format!("{}/v1/text-to-speech/{}", self.base_url, voice_id))
            .header("xi-api-key", api_key)
            .header(reqwest::header::ACCEPT, "audio/mpeg")
            .json(&body)
            .send()
            .await
            .map_err(|e| PortError::Synthesis(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            error!(%status, detail = %detail, "ElevenLabs rejected the synthesis request");
            return Err(classify_failure(status, &detail));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| PortError::Synthesis(e.to_string()))?;
        debug!(bytes = audio.len(), "Received narration audio");

        Ok(Narration::Audio(NarrationAudio {
            audio: audio.to_vec(),
            voice_id: voice_id.to_string(),
            model_id: self.model_id.clone(),
        }))
    }
}

#[async_trait]
impl VoiceCatalog for ElevenLabsNarrator {
    async fn list_voices(&self) -> PortResult<Vec<VoiceInfo>> {
        let api_key = self.api_key()?;
        let response = self
            .http
            .get(format!("{}/v1/voices", self.base_url))
            .header("xi-api-key", api_key)
            .send()
            .await
            .map_err(|e| PortError::Synthesis(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &detail));
        }

        let payload: VoicesResponse = response
            .json()
            .await
            .map_err(|e| PortError::Synthesis(format!("Unexpected voices payload: {}", e)))?;

        Ok(payload
            .voices
            .into_iter()
            .map(|v| VoiceInfo {
                id: v.voice_id,
                name: v.name,
                category: v.category.unwrap_or_default(),
            })
            .collect())
    }
}

//=========================================================================================
// Browser speech synthesis (local engine)
//=========================================================================================

pub const DEFAULT_RATE: f32 = 0.9;
pub const DEFAULT_PITCH: f32 = 1.0;
pub const DEFAULT_VOLUME: f32 = 1.0;

/// Produces `SpeechSettings` for the client's built-in speech synthesis.
#[derive(Clone, Default)]
pub struct BrowserSpeechNarrator;

impl BrowserSpeechNarrator {
    pub fn new() -> Self {
        Self
    }
}

fn clamp_or(value: Option<f32>, min: f32, max: f32, default: f32) -> f32 {
    match value {
        Some(v) if v.is_finite() => v.clamp(min, max),
        _ => default,
    }
}

#[async_trait]
impl NarrationProvider for BrowserSpeechNarrator {
    async fn narrate(&self, request: &NarrationRequest) -> PortResult<Narration> {
        let lang = if request.language.is_indian() { "en-IN" } else { "en-US" };
        Ok(Narration::ClientSide(SpeechSettings {
            text: request.text.clone(),
            lang: lang.to_string(),
            rate: clamp_or(request.rate, 0.5, 2.0, DEFAULT_RATE),
            pitch: clamp_or(request.pitch, 0.5, 2.0, DEFAULT_PITCH),
            volume: clamp_or(request.volume, 0.0, 1.0, DEFAULT_VOLUME),
        }))
    }
}
