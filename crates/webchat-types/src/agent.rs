//! Agent gateway request/result types.
//!
//! The agent runtime is an external collaborator whose result shape is not
//! guaranteed. [`AgentRunResult`] names the shapes we know how to read and
//! keeps everything else as an untyped fallback.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which agent profile handles a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentPersona {
    /// Answers end users directly.
    Chat,
    /// Proposes reply suggestions for human support agents.
    Coach,
}

impl AgentPersona {
    /// Agent name reported to the runtime.
    pub fn agent_name(&self) -> &'static str {
        match self {
            AgentPersona::Chat => "webchat_chat_agent",
            AgentPersona::Coach => "webchat_coach_agent",
        }
    }
}

impl fmt::Display for AgentPersona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentPersona::Chat => write!(f, "chat"),
            AgentPersona::Coach => write!(f, "coach"),
        }
    }
}

/// One prompt execution scoped to a user and session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRunRequest {
    pub session_id: String,
    pub user_id: String,
    pub persona: AgentPersona,
    pub prompt: String,
}

/// A message in the transcript a runtime may return alongside its answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentMessage {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
}

/// Typed run output. Every payload field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<AgentMessage>,
    /// Raw source citations; key naming varies between tools.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<serde_json::Value>>,
}

impl RunOutput {
    /// Output carrying only a `content` payload.
    pub fn from_content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }
}

/// Result of an agent run, by known shape.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentRunResult {
    /// Result produced by a gateway that maps a typed response.
    Completion(RunOutput),
    /// Untyped JSON body from an external agent runtime.
    Json(serde_json::Value),
    /// Anything else, kept as its string rendering.
    Opaque(String),
}

impl fmt::Display for AgentRunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentRunResult::Completion(output) => {
                let rendered = serde_json::to_string(output).map_err(|_| fmt::Error)?;
                f.write_str(&rendered)
            }
            AgentRunResult::Json(value) => write!(f, "{value}"),
            AgentRunResult::Opaque(raw) => f.write_str(raw),
        }
    }
}

/// A citation returned to API callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub url: String,
}

/// Errors from agent gateway operations.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("upstream agent error (status {status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("agent transport error: {0}")]
    Transport(String),

    #[error("could not decode agent response: {0}")]
    Decode(String),

    #[error("operation not supported by agent gateway '{0}'")]
    Unsupported(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_output_deserialize_partial() {
        let output: RunOutput = serde_json::from_str(
            r#"{"output_text":"hello","messages":[{"role":"assistant","content":"x"}]}"#,
        )
        .unwrap();
        assert_eq!(output.output_text.as_deref(), Some("hello"));
        assert!(output.content.is_none());
        assert_eq!(output.messages.len(), 1);
    }

    #[test]
    fn test_completion_display_is_json() {
        let result = AgentRunResult::Completion(RunOutput::from_content("hi"));
        assert_eq!(result.to_string(), r#"{"content":"hi"}"#);
    }

    #[test]
    fn test_opaque_display_is_raw() {
        let result = AgentRunResult::Opaque("RunResponse(id=1)".to_string());
        assert_eq!(result.to_string(), "RunResponse(id=1)");
    }

    #[test]
    fn test_persona_agent_names() {
        assert_eq!(AgentPersona::Chat.agent_name(), "webchat_chat_agent");
        assert_eq!(AgentPersona::Coach.agent_name(), "webchat_coach_agent");
    }

    #[test]
    fn test_agent_error_display() {
        let err = AgentError::Upstream {
            status: 503,
            message: "busy".to_string(),
        };
        assert_eq!(err.to_string(), "upstream agent error (status 503): busy");
    }
}
