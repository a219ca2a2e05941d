//! Completed backend calls delivered back to the UI thread.

use client_core::ClientError;
use shared::{
    domain::{SessionId, SessionTranscript},
    protocol::{AskResponse, UpdateApiKeyResponse, UpdateSessionResponse},
};

/// Reads whose result replaces a whole slice of view state. Each kind keeps
/// its own generation counter so an older response cannot overwrite a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotKind {
    ApiKey,
    Sessions,
    Transcript,
    Models,
    Agents,
}

impl SnapshotKind {
    const COUNT: usize = 5;

    fn index(self) -> usize {
        match self {
            SnapshotKind::ApiKey => 0,
            SnapshotKind::Sessions => 1,
            SnapshotKind::Transcript => 2,
            SnapshotKind::Models => 3,
            SnapshotKind::Agents => 4,
        }
    }
}

#[derive(Debug, Default)]
pub struct RequestGenerations {
    latest: [u64; SnapshotKind::COUNT],
}

impl RequestGenerations {
    pub fn issue(&mut self, kind: SnapshotKind) -> u64 {
        let slot = &mut self.latest[kind.index()];
        *slot += 1;
        *slot
    }

    pub fn is_current(&self, kind: SnapshotKind, generation: u64) -> bool {
        self.latest[kind.index()] == generation
    }
}

#[derive(Debug)]
pub enum UiEvent {
    ApiKeyLoaded {
        generation: u64,
        api_key: String,
    },
    ApiKeyUpdated(UpdateApiKeyResponse),
    SessionsLoaded {
        generation: u64,
        sessions: Vec<SessionId>,
    },
    SessionSelected(UpdateSessionResponse),
    TranscriptLoaded {
        generation: u64,
        transcript: SessionTranscript,
    },
    SessionCreated(SessionId),
    SessionDeleted(SessionId),
    ModelsLoaded {
        generation: u64,
        models: Vec<String>,
    },
    AgentsLoaded {
        generation: u64,
        agents: Vec<String>,
    },
    Answered(AskResponse),
    Failed(ClientError),
}
