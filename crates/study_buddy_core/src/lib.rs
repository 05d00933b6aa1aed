pub mod chunking;
pub mod domain;
pub mod generation;
pub mod markdown;
pub mod ports;
pub mod prompts;
pub mod scoring;
pub mod study;

pub use domain::{
    AdminUser, ChatRequest, Difficulty, Flashcard, Language, Narration, NarrationAudio,
    NarrationEngine, NarrationRequest, QuizQuestion, QuizResult, SessionUser, SpeechSettings,
    SummaryResult, UserCredentials, UserData, UserRole, UserStatus, Voice, VoiceInfo,
};
pub use ports::{
    AccountService, AuthSessionStore, ChatCompletionService, NarrationProvider, PortError,
    PortResult, TextExtractionService, UserRepository, VoiceCatalog,
};
