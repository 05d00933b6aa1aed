pub mod accounts;
pub mod llm;
pub mod pdf;
pub mod sessions;
pub mod tts;
pub mod users;

pub use accounts::StaticAccounts;
pub use llm::OpenAiChatAdapter;
pub use pdf::LopdfExtractor;
pub use sessions::InMemoryAuthSessionStore;
pub use tts::{BrowserSpeechNarrator, ElevenLabsNarrator};
pub use users::InMemoryUserRepository;
