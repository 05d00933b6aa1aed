//! Parsing and normalization of model-generated study material.
//!
//! The model is asked for a bare JSON array, but the per-item shape is only
//! a request. Items are coerced where a sensible default exists (id,
//! category, explanation, options, correct index) and dropped when the part
//! a learner actually reads is missing. A batch where nothing survives is
//! rejected as a whole.

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::warn;

use crate::domain::{Flashcard, QuizQuestion};
use crate::ports::{PortError, PortResult};

const DEFAULT_CATEGORY: &str = "General";
const DEFAULT_EXPLANATION: &str = "No explanation provided";

static RE_OUTER_FENCES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(?:json)?\s*\n(.*?)\n?```$").unwrap());

/// Parses a flashcard batch from raw model output.
pub fn parse_flashcards(raw: &str) -> PortResult<Vec<Flashcard>> {
    let stamp = Utc::now().timestamp_millis();
    let items = parse_array(raw)?;
    let total = items.len();

    let cards: Vec<Flashcard> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let obj = as_object(&item, index)?;
            let question = non_blank(obj, "question");
            let answer = non_blank(obj, "answer");
            let (Some(question), Some(answer)) = (question, answer) else {
                warn!(index, "Dropping flashcard without question or answer text");
                return None;
            };
            Some(Flashcard {
                id: id_or_placeholder(obj, "flashcard", stamp, index),
                question,
                answer,
                category: non_blank(obj, "category").unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            })
        })
        .collect();

    ensure_survivors(cards, total, "flashcards")
}

/// Parses a quiz batch from raw model output.
pub fn parse_quiz(raw: &str) -> PortResult<Vec<QuizQuestion>> {
    let stamp = Utc::now().timestamp_millis();
    let items = parse_array(raw)?;
    let total = items.len();

    let questions: Vec<QuizQuestion> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let obj = as_object(&item, index)?;
            let Some(question) = non_blank(obj, "question") else {
                warn!(index, "Dropping quiz question without question text");
                return None;
            };

            let options: Vec<String> = match obj.get("options") {
                Some(Value::Array(values)) => values.iter().filter_map(option_text).collect(),
                _ => Vec::new(),
            };

            let correct_answer = match obj.get("correctAnswer") {
                Some(Value::Number(n)) => match whole_index(n) {
                    Some(i) => i,
                    None => {
                        warn!(index, "Dropping quiz question with negative or fractional correctAnswer");
                        return None;
                    }
                },
                _ => 0,
            };
            if !options.is_empty() && correct_answer >= options.len() {
                warn!(
                    index,
                    correct_answer,
                    options = options.len(),
                    "Dropping quiz question whose correctAnswer is out of range"
                );
                return None;
            }

            Some(QuizQuestion {
                id: id_or_placeholder(obj, "quiz", stamp, index),
                question,
                options,
                correct_answer,
                explanation: non_blank(obj, "explanation")
                    .unwrap_or_else(|| DEFAULT_EXPLANATION.to_string()),
                category: non_blank(obj, "category").unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            })
        })
        .collect();

    ensure_survivors(questions, total, "quiz questions")
}

/// Accepts `2` and `2.0` alike; rejects negatives and fractions.
fn whole_index(n: &serde_json::Number) -> Option<usize> {
    if let Some(i) = n.as_u64() {
        return usize::try_from(i).ok();
    }
    let f = n.as_f64()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= usize::MAX as f64 {
        Some(f as usize)
    } else {
        None
    }
}

fn parse_array(raw: &str) -> PortResult<Vec<Value>> {
    let trimmed = raw.trim();
    let body = RE_OUTER_FENCES
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map_or(trimmed, |m| m.as_str());

    let value: Value = serde_json::from_str(body).map_err(|e| {
        warn!(error = %e, "Model output is not valid JSON");
        PortError::MalformedGeneration(format!("Invalid response format from AI: {}", e))
    })?;

    match value {
        Value::Array(items) => Ok(items),
        other => Err(PortError::MalformedGeneration(format!(
            "Expected a JSON array, got {}",
            json_kind(&other)
        ))),
    }
}

fn as_object(item: &Value, index: usize) -> Option<&Map<String, Value>> {
    let obj = item.as_object();
    if obj.is_none() {
        warn!(index, kind = json_kind(item), "Dropping non-object item");
    }
    obj
}

fn non_blank(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn id_or_placeholder(obj: &Map<String, Value>, prefix: &str, stamp: i64, index: usize) -> String {
    match obj.get("id") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => format!("{prefix}_{stamp}_{index}"),
    }
}

fn option_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn ensure_survivors<T>(items: Vec<T>, total: usize, what: &str) -> PortResult<Vec<T>> {
    if items.is_empty() && total > 0 {
        return Err(PortError::MalformedGeneration(format!(
            "None of the {total} generated {what} were usable"
        )));
    }
    Ok(items)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
