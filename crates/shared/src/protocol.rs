//! JSON shapes exchanged with the chat-bot backend.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::SessionId;

pub const API_KEY_PATH: &str = "/config/bot.api_key";
pub const CURRENT_SESSION_PATH: &str = "/config/runtime.current_session_id";
pub const HISTORY_PATH: &str = "/history";
pub const SESSION_PATH: &str = "/session";
pub const BOTS_PATH: &str = "/bots";
pub const AGENT_PATH: &str = "/agent";
pub const ASK_PATH: &str = "/ask";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValueRequest {
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyResponse {
    #[serde(rename = "bot.api_key")]
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateApiKeyResponse {
    #[serde(rename = "bot.api_key")]
    pub api_key: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSessionResponse {
    #[serde(rename = "runtime.current_session_id")]
    pub session_id: SessionId,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteSessionRequest {
    pub session_id: SessionId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSessionResponse {
    pub session_id: SessionId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    pub data: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub content: String,
    pub agent: String,
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskResponse {
    pub content: String,
    pub agent_name: String,
    pub data: AskAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskAction {
    pub action: String,
    pub message: String,
    pub title: String,
}
