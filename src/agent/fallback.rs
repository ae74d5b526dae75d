//! Canned reply used when no FAQ entry matches

use super::ConversationTurn;

/// Number of most recent turns quoted in the context recap
pub const RECAP_TURNS: usize = 4;

/// Maximum length of the context recap, in characters
pub const RECAP_MAX_CHARS: usize = 280;

/// Build the fallback reply for `message`
///
/// `history` must already contain the user turn for `message`.
#[must_use]
pub fn fallback_response(message: &str, tip: Option<&str>, history: &[ConversationTurn]) -> String {
    let mut response = format!(
        "I do not have an exact FAQ entry for that yet. \
         Based on the conversation so far, here is how you might proceed:\n\
         - Re-read your prompt: '{message}'.\n\
         - Summarize the key intent before acting.\n"
    );

    if let Some(tip) = tip.filter(|t| !t.is_empty()) {
        response.push_str("- Tip: ");
        response.push_str(tip);
        response.push('\n');
    }

    response.push_str("- Context recap: ");
    response.push_str(&context_recap(history));
    response
}

/// Contents of the last few turns joined by spaces, truncated
fn context_recap(history: &[ConversationTurn]) -> String {
    let start = history.len().saturating_sub(RECAP_TURNS);
    let joined = history[start..]
        .iter()
        .map(|turn| turn.content.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    joined.chars().take(RECAP_MAX_CHARS).collect()
}
