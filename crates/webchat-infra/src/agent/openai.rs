//! OpenAI chat-completions gateway.
//!
//! Sends the assembled prompt as a single user message and maps the first
//! choice into a typed [`RunOutput`]. Works against any OpenAI-compatible
//! endpoint via the configured base URL.

use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
};
use async_openai::Client;
use secrecy::{ExposeSecret, SecretString};

use webchat_core::agent::gateway::AgentGateway;
use webchat_types::agent::{AgentError, AgentMessage, AgentRunRequest, AgentRunResult, RunOutput};

/// System line sent with every run.
const FORMAT_INSTRUCTION: &str = "Use markdown to format your answers.";

/// Gateway backed by an OpenAI-compatible chat completions API.
///
/// Does NOT derive Debug: the `async_openai::Client` holds the API key.
pub struct OpenAiAgentGateway {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiAgentGateway {
    pub fn new(api_key: &SecretString, base_url: &str, model: &str) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key.expose_secret())
            .with_api_base(base_url);

        Self {
            client: Client::with_config(openai_config),
            model: model.to_string(),
        }
    }

    fn build_request(&self, request: &AgentRunRequest) -> CreateChatCompletionRequest {
        let messages = vec![
            ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                content: ChatCompletionRequestSystemMessageContent::Text(
                    FORMAT_INSTRUCTION.to_string(),
                ),
                name: None,
            }),
            ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(request.prompt.clone()),
                name: Some(request.persona.agent_name().to_string()),
            }),
        ];

        CreateChatCompletionRequest {
            model: self.model.clone(),
            messages,
            ..Default::default()
        }
    }
}

impl AgentGateway for OpenAiAgentGateway {
    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    #[tracing::instrument(name = "openai_run", skip(self, request), fields(persona = %request.persona))]
    async fn run(&self, request: &AgentRunRequest) -> Result<AgentRunResult, AgentError> {
        let oai_request = self.build_request(request);

        let response = self
            .client
            .chat()
            .create(oai_request)
            .await
            .map_err(map_openai_error)?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone());

        let messages = content
            .iter()
            .map(|text| AgentMessage {
                role: "assistant".to_string(),
                content: Some(text.clone()),
            })
            .collect();

        Ok(AgentRunResult::Completion(RunOutput {
            content,
            messages,
            ..Default::default()
        }))
    }
}

/// Map an `async_openai::error::OpenAIError` to an [`AgentError`].
fn map_openai_error(err: async_openai::error::OpenAIError) -> AgentError {
    use async_openai::error::OpenAIError;

    match &err {
        OpenAIError::ApiError(api_err) => AgentError::Upstream {
            status: 0,
            message: api_err.message.clone(),
        },
        OpenAIError::Reqwest(reqwest_err) => match reqwest_err.status() {
            Some(status) => AgentError::Upstream {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => AgentError::Transport(err.to_string()),
        },
        OpenAIError::JSONDeserialize(_, content) => {
            AgentError::Decode(format!("failed to parse response: {content}"))
        }
        _ => AgentError::Transport(err.to_string()),
    }
}
