//! The study-material pipelines: prompt selection, one model call, and
//! shaping of the answer. Each function is a single upstream round-trip with
//! no retry.

use tracing::{debug, info};

use crate::domain::{ChatRequest, Difficulty, Flashcard, Language, QuizQuestion, SummaryResult};
use crate::generation;
use crate::markdown;
use crate::ports::{ChatCompletionService, PortError, PortResult};
use crate::prompts;

pub const SUMMARY_TEMPERATURE: f32 = 0.8;
pub const SUMMARY_MAX_TOKENS: u32 = 1000;
pub const EXPLAIN_MAX_TOKENS: u32 = 400;
pub const GENERATION_TEMPERATURE: f32 = 0.7;
pub const FLASHCARD_MAX_TOKENS: u32 = 2000;
pub const QUIZ_MAX_TOKENS: u32 = 3000;

/// Summarizes `text` in `language`, returning both the markdown and the
/// speech-ready plain text.
pub async fn summarize(
    llm: &dyn ChatCompletionService,
    model: &str,
    text: &str,
    language: Language,
) -> PortResult<SummaryResult> {
    debug!(%language, chars = text.len(), "Selecting summary prompt");
    let request = ChatRequest {
        model: model.to_string(),
        system: prompts::summary_system_prompt(language),
        user: prompts::summary_prompt(language, text),
        temperature: SUMMARY_TEMPERATURE,
        max_tokens: SUMMARY_MAX_TOKENS,
    };

    let summary = non_empty(llm.complete(&request).await?, "summary")?;
    let plain_text = markdown::to_plain_text(&summary);
    info!(%language, summary_len = summary.len(), "Generated summary");

    Ok(SummaryResult {
        summary,
        plain_text,
    })
}

/// Explains a single chunk in a casual tutoring voice.
pub async fn explain(
    llm: &dyn ChatCompletionService,
    model: &str,
    chunk: &str,
    language: Language,
) -> PortResult<String> {
    let request = ChatRequest {
        model: model.to_string(),
        system: prompts::EXPLAIN_SYSTEM_PROMPT.to_string(),
        user: prompts::explain_prompt(language, chunk),
        temperature: SUMMARY_TEMPERATURE,
        max_tokens: EXPLAIN_MAX_TOKENS,
    };
    non_empty(llm.complete(&request).await?, "explanation")
}

pub async fn generate_flashcards(
    llm: &dyn ChatCompletionService,
    model: &str,
    text: &str,
    language: Language,
    count: u32,
) -> PortResult<Vec<Flashcard>> {
    let request = ChatRequest {
        model: model.to_string(),
        system: prompts::FLASHCARD_SYSTEM_PROMPT.to_string(),
        user: prompts::flashcard_prompt(language, count, text),
        temperature: GENERATION_TEMPERATURE,
        max_tokens: FLASHCARD_MAX_TOKENS,
    };
    let raw = non_empty(llm.complete(&request).await?, "flashcards")?;
    let cards = generation::parse_flashcards(&raw)?;
    info!(%language, requested = count, generated = cards.len(), "Generated flashcards");
    Ok(cards)
}

pub async fn generate_quiz(
    llm: &dyn ChatCompletionService,
    model: &str,
    text: &str,
    language: Language,
    difficulty: Difficulty,
    count: u32,
) -> PortResult<Vec<QuizQuestion>> {
    let request = ChatRequest {
        model: model.to_string(),
        system: prompts::QUIZ_SYSTEM_PROMPT.to_string(),
        user: prompts::quiz_prompt(language, difficulty, count, text),
        temperature: GENERATION_TEMPERATURE,
        max_tokens: QUIZ_MAX_TOKENS,
    };
    let raw = non_empty(llm.complete(&request).await?, "quiz")?;
    let questions = generation::parse_quiz(&raw)?;
    info!(
        %language,
        difficulty = difficulty.as_str(),
        requested = count,
        generated = questions.len(),
        "Generated quiz"
    );
    Ok(questions)
}

fn non_empty(content: String, what: &str) -> PortResult<String> {
    if content.trim().is_empty() {
        return Err(PortError::Generation(format!("No {what} returned by the model")));
    }
    Ok(content)
}
