use shopwise_core::domain::conversation::{ConversationTurn, TurnRole};

use crate::llm::CompletionMessage;

pub const DEFAULT_HISTORY_WINDOW: usize = 10;

/// The chronologically last `max_turns` entries, in their original order.
pub fn window(history: &[ConversationTurn], max_turns: usize) -> &[ConversationTurn] {
    let start = history.len().saturating_sub(max_turns);
    &history[start..]
}

/// Maps stored turns onto provider roles.
pub fn to_messages(turns: &[ConversationTurn]) -> Vec<CompletionMessage> {
    turns
        .iter()
        .map(|turn| match turn.role {
            TurnRole::User => CompletionMessage::user(turn.content.clone()),
            TurnRole::Assistant => CompletionMessage::assistant(turn.content.clone()),
        })
        .collect()
}
