//! Gateway for an external agent runtime reachable over HTTP.
//!
//! Wire contract:
//! - `POST {base}/runs` with `{session_id, user_id, agent, message}`; the JSON
//!   body is returned untouched as [`AgentRunResult::Json`].
//! - `POST {base}/memories` with `{session_id, user_id, memory}`.
//!
//! The runtime owns its own memory and tools; this client only forwards.

use serde::Serialize;

use webchat_core::agent::gateway::AgentGateway;
use webchat_types::agent::{AgentError, AgentRunRequest, AgentRunResult};

#[derive(Serialize)]
struct RunBody<'a> {
    session_id: &'a str,
    user_id: &'a str,
    agent: &'a str,
    message: &'a str,
}

#[derive(Serialize)]
struct MemoryBody<'a> {
    session_id: &'a str,
    user_id: &'a str,
    memory: &'a str,
}

/// reqwest client for an agent runtime service.
pub struct HttpAgentGateway {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl HttpAgentGateway {
    /// `model` is only reported (health endpoint); the runtime picks its own.
    pub fn new(base_url: &str, model: &str) -> Result<Self, AgentError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("webchat-ai/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AgentError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<String, AgentError> {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await
            .map_err(|e| AgentError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AgentError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(AgentError::Upstream {
                status: status.as_u16(),
                message: text,
            });
        }
        Ok(text)
    }
}

impl AgentGateway for HttpAgentGateway {
    fn name(&self) -> &str {
        "agent-runtime"
    }

    fn model(&self) -> &str {
        &self.model
    }

    #[tracing::instrument(name = "runtime_run", skip(self, request), fields(persona = %request.persona))]
    async fn run(&self, request: &AgentRunRequest) -> Result<AgentRunResult, AgentError> {
        let body = RunBody {
            session_id: &request.session_id,
            user_id: &request.user_id,
            agent: request.persona.agent_name(),
            message: &request.prompt,
        };
        let text = self.post("/runs", &body).await?;

        // A non-JSON body is still an answer; keep it as-is.
        Ok(match serde_json::from_str(&text) {
            Ok(value) => AgentRunResult::Json(value),
            Err(_) => AgentRunResult::Opaque(text),
        })
    }

    async fn remember(
        &self,
        session_id: &str,
        user_id: &str,
        note: &str,
    ) -> Result<(), AgentError> {
        let body = MemoryBody {
            session_id,
            user_id,
            memory: note,
        };
        self.post("/memories", &body).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use webchat_types::agent::AgentPersona;

    use super::*;

    type Seen = Arc<Mutex<Vec<Value>>>;

    /// Start a fake runtime on an ephemeral port and return its base URL.
    async fn spawn_runtime(run_reply: (StatusCode, String)) -> (String, Seen) {
        let seen: Seen = Arc::default();

        let app = Router::new()
            .route(
                "/runs",
                post({
                    let reply = run_reply.clone();
                    move |State(seen): State<Seen>, Json(body): Json<Value>| {
                        let reply = reply.clone();
                        async move {
                            seen.lock().unwrap().push(body);
                            reply
                        }
                    }
                }),
            )
            .route(
                "/memories",
                post(|State(seen): State<Seen>, Json(body): Json<Value>| async move {
                    seen.lock().unwrap().push(body);
                    StatusCode::NO_CONTENT
                }),
            )
            .with_state(seen.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}/"), seen)
    }

    fn request() -> AgentRunRequest {
        AgentRunRequest {
            session_id: "s1".to_string(),
            user_id: "u1".to_string(),
            persona: AgentPersona::Coach,
            prompt: "Thread:\nUSER: hi".to_string(),
        }
    }

    #[tokio::test]
    async fn test_run_posts_body_and_returns_json() {
        let reply = json!({"content": "hello", "sources": []}).to_string();
        let (base, seen) = spawn_runtime((StatusCode::OK, reply)).await;
        let gateway = HttpAgentGateway::new(&base, "gpt-4o-mini").unwrap();

        let result = gateway.run(&request()).await.unwrap();
        assert_eq!(
            result,
            AgentRunResult::Json(json!({"content": "hello", "sources": []}))
        );

        let seen = seen.lock().unwrap();
        assert_eq!(
            seen[0],
            json!({
                "session_id": "s1",
                "user_id": "u1",
                "agent": "webchat_coach_agent",
                "message": "Thread:\nUSER: hi"
            })
        );
    }

    #[tokio::test]
    async fn test_run_keeps_plain_text_body() {
        let (base, _seen) = spawn_runtime((StatusCode::OK, "just text".to_string())).await;
        let gateway = HttpAgentGateway::new(&base, "m").unwrap();

        let result = gateway.run(&request()).await.unwrap();
        assert_eq!(result, AgentRunResult::Opaque("just text".to_string()));
    }

    #[tokio::test]
    async fn test_non_success_is_upstream_error() {
        let (base, _seen) =
            spawn_runtime((StatusCode::SERVICE_UNAVAILABLE, "overloaded".to_string())).await;
        let gateway = HttpAgentGateway::new(&base, "m").unwrap();

        let err = gateway.run(&request()).await.unwrap_err();
        assert!(matches!(
            err,
            AgentError::Upstream { status: 503, ref message } if message == "overloaded"
        ));
    }

    #[tokio::test]
    async fn test_remember_posts_note() {
        let (base, seen) = spawn_runtime((StatusCode::OK, "{}".to_string())).await;
        let gateway = HttpAgentGateway::new(&base, "m").unwrap();

        gateway.remember("s1", "u1", "[user] I prefer email").await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(
            seen[0],
            json!({"session_id": "s1", "user_id": "u1", "memory": "[user] I prefer email"})
        );
    }

    #[tokio::test]
    async fn test_unreachable_runtime_is_transport_error() {
        let gateway = HttpAgentGateway::new("http://127.0.0.1:9", "m").unwrap();
        let err = gateway.run(&request()).await.unwrap_err();
        assert!(matches!(err, AgentError::Transport(_)));
    }
}
