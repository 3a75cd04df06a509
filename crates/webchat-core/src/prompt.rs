//! Prompt assembly for the chat and coaching agents.
//!
//! Both builders are deterministic and bound their input: the chat prompt
//! keeps the last [`CHAT_HISTORY_WINDOW`] turns, the coaching prompt the last
//! [`COACH_HISTORY_WINDOW`] messages, regardless of conversation length.
//!
//! Chat prompt layout:
//! ```text
//! Context:
//! plan: pro
//!
//! MEMORY:
//! Known persistent facts for user ...
//!
//! You are WebChat's helpful assistant. ...
//!
//! USER: ...
//! ASSISTANT: ...
//!
//! ASSISTANT:
//! ```

use serde_json::Value;
use webchat_types::chat::{ConversationTurn, PromptContext, TurnRole};

/// Number of trailing turns kept in a chat prompt.
pub const CHAT_HISTORY_WINDOW: usize = 12;

/// Number of trailing messages kept in a coaching prompt.
pub const COACH_HISTORY_WINDOW: usize = 8;

/// Persona line placed between the memory block and the turns.
pub const CHAT_INSTRUCTION: &str = "You are WebChat's helpful assistant. Use the MEMORY section as ground truth about the user \
whenever relevant. Be concise and factual. If unsure, say you’re not sure.";

/// Build the completion-style prompt for the chat agent.
///
/// Sections, in order: optional `Context:` block, optional `MEMORY:` block
/// (omitted entirely when `memory_block` is empty), the persona instruction,
/// the bounded turn window, and a trailing `ASSISTANT:` cue.
pub fn build_chat_prompt(
    history: &[ConversationTurn],
    context: Option<&PromptContext>,
    memory_block: &str,
) -> String {
    let context_section = match context {
        Some(ctx) if !ctx.is_empty() => {
            let lines: Vec<String> = ctx
                .iter()
                .map(|(key, value)| format!("{key}: {}", render_context_value(value)))
                .collect();
            format!("Context:\n{}\n\n", lines.join("\n"))
        }
        _ => String::new(),
    };

    let start = history.len().saturating_sub(CHAT_HISTORY_WINDOW);
    let mut turns: Vec<String> = history[start..]
        .iter()
        .map(|turn| format!("{}: {}", turn.normalized_role().label(), turn.content))
        .collect();
    if turns.is_empty() {
        turns.push(format!("{}: Hello", TurnRole::User.label()));
    }

    let memory_section = if memory_block.is_empty() {
        String::new()
    } else {
        format!("MEMORY:\n{memory_block}\n")
    };

    format!(
        "{context_section}{memory_section}{CHAT_INSTRUCTION}\n\n{}\n\nASSISTANT:",
        turns.join("\n")
    )
}

/// Build the prompt asking the coaching agent for up to `max` suggestions.
///
/// Only the visible thread is used; memory is never injected here.
pub fn build_coach_prompt(last_messages: &[ConversationTurn], max: usize) -> String {
    let start = last_messages.len().saturating_sub(COACH_HISTORY_WINDOW);
    let thread: Vec<String> = last_messages[start..]
        .iter()
        .map(|m| format!("{}: {}", m.role.to_uppercase(), m.content))
        .collect();

    format!(
        "You assist a human support agent in a live chat.\n\
         From the recent thread below, propose up to {max} concise next-message suggestions.\n\
         - Max 25 words each\n\
         - Helpful, specific, and polite\n\
         - No preambles or numbering, just the suggestions\n\
         - Don't repeat the user's words\n\
         \n\
         Thread:\n{}",
        thread.join("\n")
    )
}

/// Literal rendering of a context value.
///
/// Top-level strings are unquoted. `null`, `true` and `false` print as `None`,
/// `True` and `False`; lists and objects print as `[a, b]` and `{'k': v}`.
fn render_context_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => literal_repr(other),
    }
}

fn literal_repr(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote_literal(s),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(literal_repr).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", quote_literal(k), literal_repr(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

/// Single-quoted unless the text holds `'` and no `"`.
fn quote_literal(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
