//! Service configuration loaded from the environment.
//!
//! `main` loads `.env` (dotenvy) first, so values there behave like exported
//! variables. Everything is read once at startup into [`ServiceConfig`].

use secrecy::SecretString;
use webchat_types::error::ConfigError;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 7001;
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Process-wide settings.
///
/// Does NOT derive Debug: it carries the OpenAI API key.
pub struct ServiceConfig {
    pub model: String,
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub openai_api_key: Option<SecretString>,
    pub openai_base_url: String,
    pub agent_runtime_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub enable_otel: bool,
}

impl ServiceConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                message: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let request_timeout_secs = get("REQUEST_TIMEOUT_SECS")
            .map(|raw| {
                raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                    name: "REQUEST_TIMEOUT_SECS",
                    message: e.to_string(),
                })
            })
            .transpose()?
            .filter(|secs| *secs > 0);

        let enable_otel = get("WEBCHAT_OTEL")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);

        Ok(Self {
            model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            database_url,
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            openai_api_key: get("OPENAI_API_KEY").map(SecretString::from),
            openai_base_url: get("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            agent_runtime_url: get("AGENT_RUNTIME_URL"),
            request_timeout_secs,
            enable_otel,
        })
    }

    /// Socket address string for the HTTP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
