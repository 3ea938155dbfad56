//! Trigger phrase detection.
//!
//! The assistant stays silent unless an utterance starts with the trigger
//! phrase. Detection is a literal prefix check: case-insensitive on the
//! phrase, no fuzzy matching, no punctuation handling beyond whitespace
//! trimming. It runs on every incoming transcription, so it stays pure and
//! synchronous.

/// The literal phrase that gates assistant responses.
pub const TRIGGER_PHRASE: &str = "hey assistant";

/// Outcome of trigger detection over one utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerResult {
    /// Normal conversation; the assistant stays silent.
    NotTriggered,
    /// The utterance started with the trigger phrase; carries the question
    /// that followed it.
    Triggered(String),
}

/// Classify an utterance as triggering or not.
///
/// The question is the remainder after the phrase with surrounding whitespace
/// removed. A bare trigger with nothing after it yields `NotTriggered` so an
/// empty question is never dispatched downstream.
pub fn detect(text: &str) -> TriggerResult {
    let text = text.trim();

    // `get` rather than slicing: the prefix boundary may fall inside a
    // multi-byte character for non-ASCII input.
    let matched = match text.get(..TRIGGER_PHRASE.len()) {
        Some(prefix) => prefix.eq_ignore_ascii_case(TRIGGER_PHRASE),
        None => false,
    };
    if !matched {
        return TriggerResult::NotTriggered;
    }

    let question = text[TRIGGER_PHRASE.len()..].trim();
    if question.is_empty() {
        return TriggerResult::NotTriggered;
    }

    TriggerResult::Triggered(question.to_string())
}
