//! Best-effort cleanup of raw model output.
//!
//! Reasoning models may emit `<think>...</think>` blocks or a labelled
//! `Answer:` section. Tag matching is exact and case-sensitive.

use std::sync::OnceLock;

use regex::Regex;

pub const ANSWER_MARKER: &str = "Answer:";

pub trait AnswerExtractor: Send + Sync {
    fn extract(&self, raw: &str) -> String;
}

static THINK_BLOCK: OnceLock<Option<Regex>> = OnceLock::new();

fn think_block() -> Option<&'static Regex> {
    THINK_BLOCK.get_or_init(|| Regex::new(r"(?s)<think>.*?</think>").ok()).as_ref()
}

/// Strips reasoning blocks until none remain, keeps the text after the last `Answer:`
/// marker and trims surrounding whitespace.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReasoningAnswerExtractor;

impl AnswerExtractor for ReasoningAnswerExtractor {
    fn extract(&self, raw: &str) -> String {
        let mut stripped = raw.to_string();
        if let Some(pattern) = think_block() {
            // removing an inner block can splice a new pair together
            loop {
                let next = pattern.replace_all(&stripped, "").into_owned();
                if next == stripped {
                    break;
                }
                stripped = next;
            }
        }
        let stripped = stripped.trim();

        match stripped.rfind(ANSWER_MARKER) {
            Some(position) => stripped[position + ANSWER_MARKER.len()..].trim().to_string(),
            None => stripped.to_string(),
        }
    }
}

/// Returns the model text unchanged apart from trimming.
#[derive(Clone, Copy, Debug, Default)]
pub struct VerbatimAnswerExtractor;

impl AnswerExtractor for VerbatimAnswerExtractor {
    fn extract(&self, raw: &str) -> String {
        raw.trim().to_string()
    }
}
