//! Backend commands queued from UI to backend worker.

use serde_json::{Map, Value};
use shared::domain::SessionId;

#[derive(Debug, Clone, PartialEq)]
pub enum BackendCommand {
    FetchApiKey {
        generation: u64,
    },
    SaveApiKey {
        value: String,
    },
    ListSessions {
        generation: u64,
    },
    /// Points the backend at `session_id`, then loads its transcript.
    SelectSession {
        session_id: SessionId,
        generation: u64,
    },
    FetchTranscript {
        generation: u64,
    },
    CreateSession,
    DeleteSession {
        session_id: SessionId,
    },
    ListModels {
        generation: u64,
    },
    ListAgents {
        generation: u64,
    },
    Ask {
        content: String,
        agent: String,
        data: Map<String, Value>,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::FetchApiKey { .. } => "fetch_api_key",
            BackendCommand::SaveApiKey { .. } => "save_api_key",
            BackendCommand::ListSessions { .. } => "list_sessions",
            BackendCommand::SelectSession { .. } => "select_session",
            BackendCommand::FetchTranscript { .. } => "fetch_transcript",
            BackendCommand::CreateSession => "create_session",
            BackendCommand::DeleteSession { .. } => "delete_session",
            BackendCommand::ListModels { .. } => "list_models",
            BackendCommand::ListAgents { .. } => "list_agents",
            BackendCommand::Ask { .. } => "ask",
        }
    }
}
