//! AgentGateway trait definition.
//!
//! The gateway is the only component that talks to the model. It is an
//! opaque, nondeterministic dependency: no timeout or retry is applied here.

use webchat_types::agent::{AgentError, AgentRunRequest, AgentRunResult};

/// Trait for agent runtimes that turn a prompt into a run result.
///
/// Implementations live in webchat-infra (e.g., `OpenAiAgentGateway`).
pub trait AgentGateway: Send + Sync {
    /// Human-readable gateway name (e.g., "openai", "agent-runtime").
    fn name(&self) -> &str;

    /// Model identifier reported by the health endpoint.
    fn model(&self) -> &str;

    /// Execute one prompt for a user/session.
    fn run(
        &self,
        request: &AgentRunRequest,
    ) -> impl std::future::Future<Output = Result<AgentRunResult, AgentError>> + Send;

    /// Write a note into the runtime's own memory, if it has one.
    ///
    /// Gateways without a memory mechanism keep the default, which reports
    /// [`AgentError::Unsupported`].
    fn remember(
        &self,
        session_id: &str,
        user_id: &str,
        note: &str,
    ) -> impl std::future::Future<Output = Result<(), AgentError>> + Send {
        let _ = (session_id, user_id, note);
        let name = self.name().to_string();
        async move { Err(AgentError::Unsupported(name)) }
    }
}
