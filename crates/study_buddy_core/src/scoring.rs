//! Quiz scoring.

use chrono::Utc;

use crate::domain::{QuizQuestion, QuizResult};
use crate::ports::{PortError, PortResult};

/// Scores a quiz attempt.
///
/// `selections[i]` is the option index chosen for `questions[i]`, or `None`
/// if the question was skipped. A selection counts as correct only on exact
/// index equality with `correct_answer`.
pub fn score_quiz(
    questions: &[QuizQuestion],
    selections: &[Option<usize>],
    time_spent: u64,
) -> PortResult<QuizResult> {
    if questions.len() != selections.len() {
        return Err(PortError::Validation(format!(
            "Expected {} selected answers, got {}",
            questions.len(),
            selections.len()
        )));
    }

    let correct_answers = questions
        .iter()
        .zip(selections)
        .filter(|(question, selection)| **selection == Some(question.correct_answer))
        .count();

    Ok(QuizResult {
        total_questions: questions.len(),
        correct_answers,
        score: percentage(correct_answers, questions.len()),
        time_spent,
        completed_at: Utc::now(),
    })
}

/// `round(correct / total * 100)`, with an empty quiz scoring 0.
pub fn percentage(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((correct as f64 / total as f64) * 100.0).round() as u32
}
