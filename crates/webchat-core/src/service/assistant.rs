//! Assistant service orchestrating the answer, suggest and memory-update flows.
//!
//! Infrastructure failures (store, gateway) are fatal to the request and are
//! returned as [`ServiceError`]. Shape surprises from the model are absorbed
//! by the normalizers, and the secondary memory write is best-effort.

use tracing::{debug, info, warn};

use webchat_types::agent::{AgentError, AgentPersona, AgentRunRequest, Source};
use webchat_types::chat::{ConversationTurn, PromptContext};
use webchat_types::error::StorageError;
use webchat_types::memory::{Actor, DEFAULT_MEMORY_LIMIT};

use crate::agent::box_gateway::BoxAgentGateway;
use crate::memory::formatter::format_memory_block;
use crate::memory::store::MemoryStore;
use crate::prompt::{build_chat_prompt, build_coach_prompt};
use crate::response::{extract_sources, extract_text};
use crate::suggest::extract_suggestions;

/// Errors that fail a request.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Agent(#[from] AgentError),
}

/// Input for [`AssistantService::answer`].
#[derive(Debug, Clone)]
pub struct AnswerInput {
    pub session_id: String,
    pub user_id: String,
    pub messages: Vec<ConversationTurn>,
    pub context: Option<PromptContext>,
}

/// Normalized answer returned to callers.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutput {
    pub text: String,
    pub sources: Vec<Source>,
}

/// Input for [`AssistantService::suggest`].
#[derive(Debug, Clone)]
pub struct SuggestInput {
    pub session_id: String,
    pub user_id: String,
    pub last_messages: Vec<ConversationTurn>,
    pub max: usize,
}

/// Input for [`AssistantService::update_memory`].
#[derive(Debug, Clone)]
pub struct MemoryUpdateInput {
    pub session_id: String,
    pub user_id: String,
    pub actor: Actor,
    pub text: String,
}

/// Wires the memory store and agent gateway into the three request flows.
///
/// Generic over `MemoryStore` so webchat-core never depends on webchat-infra.
/// Holds no per-request state; share it behind an `Arc`.
pub struct AssistantService<M: MemoryStore> {
    store: M,
    gateway: BoxAgentGateway,
    memory_limit: i64,
}

impl<M: MemoryStore> AssistantService<M> {
    /// Create a service recalling up to [`DEFAULT_MEMORY_LIMIT`] records per answer.
    pub fn new(store: M, gateway: BoxAgentGateway) -> Self {
        Self {
            store,
            gateway,
            memory_limit: DEFAULT_MEMORY_LIMIT,
        }
    }

    /// Override how many memory records are recalled per answer.
    pub fn with_memory_limit(mut self, limit: i64) -> Self {
        self.memory_limit = limit;
        self
    }

    /// Access the memory store.
    pub fn store(&self) -> &M {
        &self.store
    }

    /// Model identifier of the configured gateway.
    pub fn model(&self) -> &str {
        self.gateway.model()
    }

    /// Answer an end-user message with recalled memory injected.
    #[tracing::instrument(
        name = "answer",
        skip(self, input),
        fields(user_id = %input.user_id, session_id = %input.session_id, turns = input.messages.len())
    )]
    pub async fn answer(&self, input: AnswerInput) -> Result<AnswerOutput, ServiceError> {
        let memory_block =
            format_memory_block(&self.store, &input.user_id, self.memory_limit).await?;
        let prompt = build_chat_prompt(&input.messages, input.context.as_ref(), &memory_block);

        let request = AgentRunRequest {
            session_id: input.session_id,
            user_id: input.user_id,
            persona: AgentPersona::Chat,
            prompt,
        };
        let result = self.gateway.run(&request).await?;

        let text = extract_text(&result);
        let sources = extract_sources(&result);
        debug!(
            has_memory = !memory_block.is_empty(),
            sources = sources.len(),
            "Answer produced"
        );

        Ok(AnswerOutput { text, sources })
    }

    /// Propose up to `input.max` reply suggestions for a human agent.
    #[tracing::instrument(
        name = "suggest",
        skip(self, input),
        fields(user_id = %input.user_id, session_id = %input.session_id, max = input.max)
    )]
    pub async fn suggest(&self, input: SuggestInput) -> Result<Vec<String>, ServiceError> {
        let prompt = build_coach_prompt(&input.last_messages, input.max);
        let request = AgentRunRequest {
            session_id: input.session_id,
            user_id: input.user_id,
            persona: AgentPersona::Coach,
            prompt,
        };
        let result = self.gateway.run(&request).await?;

        let raw = extract_text(&result);
        Ok(extract_suggestions(&raw, input.max))
    }

    /// Persist one utterance, then mirror it into the gateway's own memory.
    ///
    /// The durable write comes first and its failure fails the request. The
    /// mirror write never does.
    #[tracing::instrument(
        name = "update_memory",
        skip(self, input),
        fields(user_id = %input.user_id, session_id = %input.session_id, actor = %input.actor)
    )]
    pub async fn update_memory(&self, input: MemoryUpdateInput) -> Result<(), ServiceError> {
        let stored = self
            .store
            .append(
                &input.user_id,
                &input.session_id,
                input.actor,
                &input.text,
                None,
            )
            .await?;

        if !stored {
            debug!("Blank memory text, nothing stored");
            return Ok(());
        }
        info!("Memory record stored");

        let note = format!("[{}] {}", input.actor, input.text);
        self.mirror_to_gateway(&input.session_id, &input.user_id, &note)
            .await;

        Ok(())
    }

    /// Best-effort boundary: gateway memory errors are logged and discarded here.
    async fn mirror_to_gateway(&self, session_id: &str, user_id: &str, note: &str) {
        match self.gateway.remember(session_id, user_id, note).await {
            Ok(()) => debug!(gateway = self.gateway.name(), "Mirrored memory to gateway"),
            Err(AgentError::Unsupported(name)) => {
                debug!(gateway = %name, "Gateway has no memory support, skipping mirror")
            }
            Err(e) => warn!(
                gateway = self.gateway.name(),
                error = %e,
                "Secondary memory write failed; continuing"
            ),
        }
    }
}
