//! BoxAgentGateway -- object-safe dynamic dispatch wrapper for AgentGateway.
//!
//! 1. Define an object-safe `AgentGatewayDyn` trait with boxed futures
//! 2. Blanket-impl `AgentGatewayDyn` for all `T: AgentGateway`
//! 3. `BoxAgentGateway` wraps `Box<dyn AgentGatewayDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use webchat_types::agent::{AgentError, AgentRunRequest, AgentRunResult};

use super::gateway::AgentGateway;

/// Object-safe version of [`AgentGateway`] with boxed futures.
pub trait AgentGatewayDyn: Send + Sync {
    fn name(&self) -> &str;

    fn model(&self) -> &str;

    fn run_boxed<'a>(
        &'a self,
        request: &'a AgentRunRequest,
    ) -> Pin<Box<dyn Future<Output = Result<AgentRunResult, AgentError>> + Send + 'a>>;

    fn remember_boxed<'a>(
        &'a self,
        session_id: &'a str,
        user_id: &'a str,
        note: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), AgentError>> + Send + 'a>>;
}

impl<T: AgentGateway> AgentGatewayDyn for T {
    fn name(&self) -> &str {
        AgentGateway::name(self)
    }

    fn model(&self) -> &str {
        AgentGateway::model(self)
    }

    fn run_boxed<'a>(
        &'a self,
        request: &'a AgentRunRequest,
    ) -> Pin<Box<dyn Future<Output = Result<AgentRunResult, AgentError>> + Send + 'a>> {
        Box::pin(self.run(request))
    }

    fn remember_boxed<'a>(
        &'a self,
        session_id: &'a str,
        user_id: &'a str,
        note: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), AgentError>> + Send + 'a>> {
        Box::pin(self.remember(session_id, user_id, note))
    }
}

/// Type-erased agent gateway for runtime backend selection.
///
/// Since `AgentGateway` uses RPITIT, it cannot be used as a trait object
/// directly; this wrapper exposes the same methods over `dyn AgentGatewayDyn`.
pub struct BoxAgentGateway {
    inner: Box<dyn AgentGatewayDyn + Send + Sync>,
}

impl BoxAgentGateway {
    /// Wrap a concrete `AgentGateway` in a type-erased box.
    pub fn new<T: AgentGateway + 'static>(gateway: T) -> Self {
        Self {
            inner: Box::new(gateway),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn model(&self) -> &str {
        self.inner.model()
    }

    /// Execute one prompt for a user/session.
    pub async fn run(&self, request: &AgentRunRequest) -> Result<AgentRunResult, AgentError> {
        self.inner.run_boxed(request).await
    }

    /// Write a note into the runtime's own memory.
    pub async fn remember(
        &self,
        session_id: &str,
        user_id: &str,
        note: &str,
    ) -> Result<(), AgentError> {
        self.inner.remember_boxed(session_id, user_id, note).await
    }
}
