//! Agent gateway implementations.
//!
//! Concrete implementations of the [`AgentGateway`] trait defined in
//! `webchat-core`, plus a factory ([`create_gateway`]) that picks one from
//! the service configuration.
//!
//! [`AgentGateway`]: webchat_core::agent::gateway::AgentGateway

pub mod http_runtime;
pub mod openai;

use webchat_core::agent::box_gateway::BoxAgentGateway;
use webchat_types::error::ConfigError;

use crate::config::ServiceConfig;

use self::http_runtime::HttpAgentGateway;
use self::openai::OpenAiAgentGateway;

/// Build the gateway selected by `config`.
///
/// `AGENT_RUNTIME_URL` wins when set; otherwise the OpenAI gateway is used
/// and an API key is required.
pub fn create_gateway(config: &ServiceConfig) -> Result<BoxAgentGateway, ConfigError> {
    if let Some(runtime_url) = config.agent_runtime_url.as_deref() {
        let gateway = HttpAgentGateway::new(runtime_url, &config.model).map_err(|e| {
            ConfigError::Invalid {
                name: "AGENT_RUNTIME_URL",
                message: e.to_string(),
            }
        })?;
        tracing::info!(url = %runtime_url, "Using external agent runtime");
        return Ok(BoxAgentGateway::new(gateway));
    }

    let api_key = config
        .openai_api_key
        .as_ref()
        .ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;
    let gateway = OpenAiAgentGateway::new(api_key, &config.openai_base_url, &config.model);
    tracing::info!(model = %config.model, "Using OpenAI agent gateway");
    Ok(BoxAgentGateway::new(gateway))
}
