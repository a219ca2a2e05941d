use std::{fmt, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use shared::{
    domain::{SessionId, SessionTranscript},
    protocol::{
        ApiKeyResponse, AskRequest, AskResponse, ConfigValueRequest, DeleteSessionRequest,
        ListResponse, NewSessionResponse, SessionListResponse, UpdateApiKeyResponse,
        UpdateSessionResponse, AGENT_PATH, API_KEY_PATH, ASK_PATH, BOTS_PATH,
        CURRENT_SESSION_PATH, HISTORY_PATH, SESSION_PATH,
    },
};
use tracing::{debug, warn};

pub mod diagnostics;
pub mod error;

pub use diagnostics::{DiagnosticsSink, MemorySink, TracingSink};
pub use error::{ClientError, ClientResult, ErrorCategory};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetApiKey,
    SetApiKey,
    ListSessions,
    SelectSession,
    CurrentTranscript,
    DeleteSession,
    CreateSession,
    ListModels,
    ListAgents,
    Ask,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::GetApiKey => "get_api_key",
            Operation::SetApiKey => "set_api_key",
            Operation::ListSessions => "list_sessions",
            Operation::SelectSession => "select_session",
            Operation::CurrentTranscript => "current_transcript",
            Operation::DeleteSession => "delete_session",
            Operation::CreateSession => "create_session",
            Operation::ListModels => "list_models",
            Operation::ListAgents => "list_agents",
            Operation::Ask => "ask",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One method per backend endpoint. Each call is a single HTTP round trip;
/// nothing is cached or retried.
#[async_trait]
pub trait BotApi: Send + Sync {
    async fn get_api_key(&self) -> ClientResult<String>;
    async fn set_api_key(&self, value: &str) -> ClientResult<UpdateApiKeyResponse>;
    async fn list_sessions(&self) -> ClientResult<Vec<SessionId>>;
    async fn select_session(&self, session_id: &SessionId) -> ClientResult<UpdateSessionResponse>;
    async fn current_transcript(&self) -> ClientResult<SessionTranscript>;
    async fn delete_session(&self, session_id: &SessionId) -> ClientResult<()>;
    async fn create_session(&self) -> ClientResult<SessionId>;
    async fn list_models(&self) -> ClientResult<Vec<String>>;
    async fn list_agents(&self) -> ClientResult<Vec<String>>;
    async fn ask(
        &self,
        content: &str,
        agent: &str,
        data: Map<String, Value>,
    ) -> ClientResult<AskResponse>;
}

#[derive(Debug, Clone)]
pub struct BotClient {
    http: Client,
    base_url: String,
}

impl BotClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(Client::new(), base_url)
    }

    /// `None` leaves reqwest's defaults in place.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> reqwest::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_http(builder.build()?, base_url))
    }

    pub fn with_http(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Non-success statuses are logged, not rejected: callers only care
    /// whether the body has the shape they expect.
    async fn read_body(operation: Operation, response: Response) -> ClientResult<String> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| ClientError::Transport { operation, source })?;
        if !status.is_success() {
            warn!(
                operation = operation.as_str(),
                status = status.as_u16(),
                "backend answered with non-success status"
            );
        }
        Ok(body)
    }

    async fn decode<T: DeserializeOwned>(
        operation: Operation,
        response: Response,
    ) -> ClientResult<T> {
        let body = Self::read_body(operation, response).await?;
        serde_json::from_str(&body).map_err(|source| ClientError::Decode { operation, source })
    }

    async fn send(
        operation: Operation,
        request: reqwest::RequestBuilder,
    ) -> ClientResult<Response> {
        debug!(operation = operation.as_str(), "sending backend request");
        request
            .send()
            .await
            .map_err(|source| ClientError::Transport { operation, source })
    }
}

impl Default for BotClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl BotApi for BotClient {
    async fn get_api_key(&self) -> ClientResult<String> {
        let operation = Operation::GetApiKey;
        let response = Self::send(operation, self.http.get(self.endpoint(API_KEY_PATH))).await?;
        let body: ApiKeyResponse = Self::decode(operation, response).await?;
        Ok(body.api_key)
    }

    async fn set_api_key(&self, value: &str) -> ClientResult<UpdateApiKeyResponse> {
        let operation = Operation::SetApiKey;
        let request = self
            .http
            .post(self.endpoint(API_KEY_PATH))
            .json(&ConfigValueRequest {
                value: value.to_string(),
            });
        let response = Self::send(operation, request).await?;
        Self::decode(operation, response).await
    }

    async fn list_sessions(&self) -> ClientResult<Vec<SessionId>> {
        let operation = Operation::ListSessions;
        let response = Self::send(operation, self.http.get(self.endpoint(HISTORY_PATH))).await?;
        let body: SessionListResponse = Self::decode(operation, response).await?;
        Ok(body.sessions)
    }

    async fn select_session(&self, session_id: &SessionId) -> ClientResult<UpdateSessionResponse> {
        let operation = Operation::SelectSession;
        let request = self
            .http
            .post(self.endpoint(CURRENT_SESSION_PATH))
            .json(&ConfigValueRequest {
                value: session_id.0.clone(),
            });
        let response = Self::send(operation, request).await?;
        Self::decode(operation, response).await
    }

    async fn current_transcript(&self) -> ClientResult<SessionTranscript> {
        let operation = Operation::CurrentTranscript;
        let response = Self::send(operation, self.http.get(self.endpoint(SESSION_PATH))).await?;
        Self::decode(operation, response).await
    }

    async fn delete_session(&self, session_id: &SessionId) -> ClientResult<()> {
        let operation = Operation::DeleteSession;
        let request = self
            .http
            .delete(self.endpoint(HISTORY_PATH))
            .json(&DeleteSessionRequest {
                session_id: session_id.clone(),
            });
        let response = Self::send(operation, request).await?;
        // Whatever the status, the body carries nothing the caller needs.
        Self::read_body(operation, response).await?;
        Ok(())
    }

    async fn create_session(&self) -> ClientResult<SessionId> {
        let operation = Operation::CreateSession;
        let response = Self::send(operation, self.http.put(self.endpoint(HISTORY_PATH))).await?;
        let body: NewSessionResponse = Self::decode(operation, response).await?;
        Ok(body.session_id)
    }

    async fn list_models(&self) -> ClientResult<Vec<String>> {
        let operation = Operation::ListModels;
        let response = Self::send(operation, self.http.get(self.endpoint(BOTS_PATH))).await?;
        let body: ListResponse = Self::decode(operation, response).await?;
        Ok(body.data)
    }

    async fn list_agents(&self) -> ClientResult<Vec<String>> {
        let operation = Operation::ListAgents;
        let response = Self::send(operation, self.http.get(self.endpoint(AGENT_PATH))).await?;
        let body: ListResponse = Self::decode(operation, response).await?;
        Ok(body.data)
    }

    async fn ask(
        &self,
        content: &str,
        agent: &str,
        data: Map<String, Value>,
    ) -> ClientResult<AskResponse> {
        let operation = Operation::Ask;
        let request = self.http.post(self.endpoint(ASK_PATH)).json(&AskRequest {
            content: content.to_string(),
            agent: agent.to_string(),
            data,
        });
        let response = Self::send(operation, request).await?;
        Self::decode(operation, response).await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
