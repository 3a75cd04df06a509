//! Application state wiring the assistant service together.
//!
//! `AssistantService` is generic over the memory store; AppState pins it to
//! the concrete infra store selected from `DATABASE_URL`.

use std::sync::Arc;

use webchat_core::agent::box_gateway::BoxAgentGateway;
use webchat_core::service::AssistantService;
use webchat_infra::agent::create_gateway;
use webchat_infra::config::ServiceConfig;
use webchat_infra::store::DatabaseMemoryStore;

/// Concrete service type pinned to the infra memory store.
pub type ConcreteAssistantService = AssistantService<DatabaseMemoryStore>;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<ConcreteAssistantService>,
}

impl AppState {
    /// Connect the store, build the gateway, and wire the service.
    pub async fn init(config: &ServiceConfig) -> anyhow::Result<Self> {
        let gateway = create_gateway(config)?;
        let store = open_store(config).await?;
        Ok(Self::new(store, gateway))
    }

    pub fn new(store: DatabaseMemoryStore, gateway: BoxAgentGateway) -> Self {
        Self {
            assistant: Arc::new(AssistantService::new(store, gateway)),
        }
    }
}

/// Open the memory store alone (CLI memory commands need no gateway).
pub async fn open_store(config: &ServiceConfig) -> anyhow::Result<DatabaseMemoryStore> {
    let store = DatabaseMemoryStore::connect(&config.database_url).await?;
    tracing::info!(backend = store.backend(), "Memory store ready");
    Ok(store)
}
