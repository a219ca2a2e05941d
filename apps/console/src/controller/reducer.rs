//! View state and the transitions that mutate it. User actions update local
//! state synchronously and return the backend command to dispatch; completed
//! calls are folded back in through [`Controller::apply`].

use std::sync::Arc;

use client_core::DiagnosticsSink;
use serde_json::Map;
use shared::domain::{FormField, FormState, SessionId, SessionTranscript};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::events::{RequestGenerations, SnapshotKind, UiEvent},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Config,
    Session,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub section: Section,
    pub form: FormState,
    pub sessions: Vec<SessionId>,
    pub selected: Option<SessionId>,
    pub transcript: Option<SessionTranscript>,
    pub models: Vec<String>,
    pub agents: Vec<String>,
}

pub struct Controller {
    state: ViewState,
    generations: RequestGenerations,
    diagnostics: Arc<dyn DiagnosticsSink>,
}

impl Controller {
    pub fn new(diagnostics: Arc<dyn DiagnosticsSink>) -> Self {
        Self {
            state: ViewState::default(),
            generations: RequestGenerations::default(),
            diagnostics,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Initial loads; none depends on another.
    pub fn activate(&mut self) -> Vec<BackendCommand> {
        vec![
            BackendCommand::FetchApiKey {
                generation: self.generations.issue(SnapshotKind::ApiKey),
            },
            BackendCommand::ListSessions {
                generation: self.generations.issue(SnapshotKind::Sessions),
            },
            BackendCommand::ListModels {
                generation: self.generations.issue(SnapshotKind::Models),
            },
            BackendCommand::ListAgents {
                generation: self.generations.issue(SnapshotKind::Agents),
            },
        ]
    }

    pub fn show_section(&mut self, section: Section) {
        self.state.section = section;
    }

    pub fn edit_field(&mut self, field: FormField, value: impl Into<String>) {
        self.state.form.set(field, value);
    }

    /// There is no submit endpoint; the form is only logged.
    pub fn submit_form(&self) {
        let form = &self.state.form;
        tracing::info!(
            model = %form.model,
            agent = %form.agent,
            debug_tag = %form.debug_tag,
            api_key_set = !form.api_key.is_empty(),
            "form submitted"
        );
    }

    pub fn save_api_key(&self) -> BackendCommand {
        BackendCommand::SaveApiKey {
            value: self.state.form.api_key.clone(),
        }
    }

    /// Selection changes before the backend confirms it and is not rolled
    /// back if either call fails.
    pub fn select_session(&mut self, session_id: SessionId) -> BackendCommand {
        self.state.selected = Some(session_id.clone());
        BackendCommand::SelectSession {
            session_id,
            generation: self.generations.issue(SnapshotKind::Transcript),
        }
    }

    pub fn create_session(&self) -> BackendCommand {
        BackendCommand::CreateSession
    }

    pub fn delete_selected_session(&self) -> Option<BackendCommand> {
        self.state
            .selected
            .clone()
            .map(|session_id| BackendCommand::DeleteSession { session_id })
    }

    pub fn ask(&self) -> BackendCommand {
        BackendCommand::Ask {
            content: self.state.form.content.clone(),
            agent: self.state.form.agent.clone(),
            data: Map::new(),
        }
    }

    /// Folds a completed backend call into state. Returns a follow-up command
    /// when the event calls for one.
    pub fn apply(&mut self, event: UiEvent) -> Option<BackendCommand> {
        match event {
            UiEvent::ApiKeyLoaded {
                generation,
                api_key,
            } => {
                if self.accept(SnapshotKind::ApiKey, generation) {
                    self.state.form.api_key = api_key;
                }
            }
            UiEvent::ApiKeyUpdated(updated) => {
                tracing::info!(status = %updated.status, "api key updated");
            }
            UiEvent::SessionsLoaded {
                generation,
                sessions,
            } => {
                if self.accept(SnapshotKind::Sessions, generation) {
                    if let Some(first) = sessions.first() {
                        self.state.selected = Some(first.clone());
                    }
                    self.state.sessions = sessions;
                }
            }
            UiEvent::SessionSelected(selected) => {
                tracing::debug!(session_id = %selected.session_id, status = %selected.status, "backend session switched");
            }
            UiEvent::TranscriptLoaded {
                generation,
                transcript,
            } => {
                if self.accept(SnapshotKind::Transcript, generation) {
                    self.state.transcript = Some(transcript);
                }
            }
            UiEvent::SessionCreated(session_id) => {
                tracing::info!(%session_id, "session created");
                self.state.sessions.push(session_id.clone());
                self.state.selected = Some(session_id);
            }
            UiEvent::SessionDeleted(session_id) => {
                tracing::info!(%session_id, "session deleted");
                self.state.sessions.retain(|existing| existing != &session_id);
                if self.state.selected.as_ref() == Some(&session_id) {
                    self.state.selected = self.state.sessions.first().cloned();
                }
            }
            UiEvent::ModelsLoaded { generation, models } => {
                if self.accept(SnapshotKind::Models, generation) {
                    if let Some(first) = models.first() {
                        self.state.form.model = first.clone();
                    }
                    self.state.models = models;
                }
            }
            UiEvent::AgentsLoaded { generation, agents } => {
                if self.accept(SnapshotKind::Agents, generation) {
                    if let Some(first) = agents.first() {
                        self.state.form.agent = first.clone();
                    }
                    self.state.agents = agents;
                }
            }
            UiEvent::Answered(answer) => {
                tracing::info!(agent = %answer.agent_name, "ask answered");
                if self.state.transcript.is_some() {
                    return Some(BackendCommand::FetchTranscript {
                        generation: self.generations.issue(SnapshotKind::Transcript),
                    });
                }
            }
            UiEvent::Failed(err) => self.diagnostics.report(&err),
        }
        None
    }

    fn accept(&self, kind: SnapshotKind, generation: u64) -> bool {
        let current = self.generations.is_current(kind, generation);
        if !current {
            tracing::debug!(?kind, generation, "discarding stale response");
        }
        current
    }
}

#[cfg(test)]
#[path = "../tests/reducer_tests.rs"]
mod tests;
