use serde::{Deserialize, Serialize};

use crate::domain::product::Product;

/// Shown to end users whenever the assistant pipeline fails.
pub const APOLOGY_MESSAGE: &str = "I apologize, but I'm having trouble processing your request right now. Please try again or contact our support team.";

/// Outcome of one assistant turn. `answer` is set only on success and `error`
/// only on failure; a failed result never carries products.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    pub products: Vec<Product>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatResult {
    pub fn answered(answer: impl Into<String>, products: Vec<Product>) -> Self {
        Self { success: true, answer: Some(answer.into()), products, error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self { success: false, answer: None, products: Vec::new(), error: Some(error.into()) }
    }

    /// Text safe to show the shopper: the answer, or the fixed apology.
    pub fn reply_text(&self) -> &str {
        match (&self.answer, self.success) {
            (Some(answer), true) => answer,
            _ => APOLOGY_MESSAGE,
        }
    }
}
