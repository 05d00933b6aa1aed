//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::{
    adapters::{
        BrowserSpeechNarrator, ElevenLabsNarrator, InMemoryAuthSessionStore,
        InMemoryUserRepository, LopdfExtractor, OpenAiChatAdapter, StaticAccounts,
    },
    config::Config,
    error::ApiError,
};
use std::{sync::Arc, time::Duration};
use study_buddy_core::{
    domain::NarrationEngine,
    ports::{
        AccountService, AuthSessionStore, ChatCompletionService, NarrationProvider,
        TextExtractionService, UserRepository, VoiceCatalog,
    },
};

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub extractor: Arc<dyn TextExtractionService>,
    pub llm: Arc<dyn ChatCompletionService>,
    pub cloud_narrator: Arc<dyn NarrationProvider>,
    pub browser_narrator: Arc<dyn NarrationProvider>,
    pub voices: Arc<dyn VoiceCatalog>,
    pub users: Arc<dyn UserRepository>,
    pub accounts: Arc<dyn AccountService>,
    pub sessions: Arc<dyn AuthSessionStore>,
}

impl AppState {
    /// Wires the production adapters from the loaded configuration.
    pub fn from_config(config: Arc<Config>) -> Result<Self, ApiError> {
        let eleven_labs = Arc::new(ElevenLabsNarrator::new(
            config.elevenlabs_api_key.clone(),
            config.elevenlabs_base_url.clone(),
            config.tts_model.clone(),
            Duration::from_secs(config.tts_timeout_secs),
        )?);
        let accounts = StaticAccounts::new(&config.admin_email, &config.admin_password)?;

        Ok(Self {
            extractor: Arc::new(LopdfExtractor::new()),
            llm: Arc::new(OpenAiChatAdapter::new(config.openai_api_key.as_deref())),
            cloud_narrator: eleven_labs.clone(),
            browser_narrator: Arc::new(BrowserSpeechNarrator::new()),
            voices: eleven_labs,
            users: Arc::new(InMemoryUserRepository::seeded()),
            accounts: Arc::new(accounts),
            sessions: Arc::new(InMemoryAuthSessionStore::new()),
            config,
        })
    }

    pub fn narrator(&self, engine: NarrationEngine) -> &Arc<dyn NarrationProvider> {
        match engine {
            NarrationEngine::Cloud => &self.cloud_narrator,
            NarrationEngine::Browser => &self.browser_narrator,
        }
    }
}
