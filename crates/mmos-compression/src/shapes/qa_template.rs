//! `[topic] Q: <question> A: <answer entities>` for question/answer pairs.

use mmos_tokens::is_question;

use super::extractive::extract;
use crate::preservation::TurnAnalysis;

/// The template fits when the user asked something and the answer carries
/// at least one number or entity.
pub fn applies(user: &TurnAnalysis, assistant: &TurnAnalysis) -> bool {
    is_question(user.text()) && assistant.preserved.has_answer_entities
}

pub fn render(
    topic: &str,
    user: &TurnAnalysis,
    assistant: &TurnAnalysis,
    keep_ratio: f64,
) -> String {
    let question = extract(user, keep_ratio);
    let answer = assistant.preserved.spans.render(assistant.text());
    format!("[{topic}] Q: {question} A: {answer}")
}
