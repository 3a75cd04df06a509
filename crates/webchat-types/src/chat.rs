//! Request-scoped conversation types.
//!
//! Turns arrive from the caller with free-form role strings. They are
//! normalized into [`TurnRole`] only when a prompt is assembled.

use serde::{Deserialize, Serialize};

use std::fmt;

/// Free-form key/value context supplied by the caller.
///
/// Keys keep the caller's order (serde_json `preserve_order`).
pub type PromptContext = serde_json::Map<String, serde_json::Value>;

/// A single chat turn as received on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: String,
    pub content: String,
}

impl ConversationTurn {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Normalized role of this turn.
    pub fn normalized_role(&self) -> TurnRole {
        TurnRole::normalize(&self.role)
    }
}

/// Normalized prompt role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    System,
    User,
    Assistant,
}

impl TurnRole {
    /// Map a caller-supplied role onto the three prompt roles.
    ///
    /// `system` stays system, `assistant`/`agent`/`bot` become assistant,
    /// anything else is treated as the user.
    pub fn normalize(role: &str) -> Self {
        match role.trim().to_lowercase().as_str() {
            "system" => TurnRole::System,
            "assistant" | "agent" | "bot" => TurnRole::Assistant,
            _ => TurnRole::User,
        }
    }

    /// Upper-case label used as the line prefix in prompts.
    pub fn label(&self) -> &'static str {
        match self {
            TurnRole::System => "SYSTEM",
            TurnRole::User => "USER",
            TurnRole::Assistant => "ASSISTANT",
        }
    }
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
