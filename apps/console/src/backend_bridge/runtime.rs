//! Worker thread owning the tokio runtime. Every command runs as its own task,
//! so independent calls are in flight at the same time and complete in any order.

use std::{sync::Arc, thread};

use client_core::BotApi;
use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::{backend_bridge::commands::BackendCommand, controller::events::UiEvent};

pub fn launch(
    api: Arc<dyn BotApi>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            tracing::info!("backend worker ready");
            while let Ok(cmd) = cmd_rx.recv() {
                let api = Arc::clone(&api);
                let ui_tx = ui_tx.clone();
                tokio::spawn(async move {
                    for event in execute(api.as_ref(), cmd).await {
                        deliver(&ui_tx, event);
                    }
                });
            }
            tracing::info!("command queue closed; backend worker stopping");
        });
    })
}

fn deliver(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    match ui_tx.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => {
            tracing::warn!(?event, "ui event queue full; dropping backend result");
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::debug!("ui event queue closed");
        }
    }
}

/// Performs one command against the backend and returns the events it
/// produced, in order. Failures end the command with a single `Failed` event.
pub async fn execute(api: &dyn BotApi, cmd: BackendCommand) -> Vec<UiEvent> {
    let result = match cmd {
        BackendCommand::FetchApiKey { generation } => api
            .get_api_key()
            .await
            .map(|api_key| vec![UiEvent::ApiKeyLoaded { generation, api_key }]),
        BackendCommand::SaveApiKey { value } => api
            .set_api_key(&value)
            .await
            .map(|updated| vec![UiEvent::ApiKeyUpdated(updated)]),
        BackendCommand::ListSessions { generation } => api
            .list_sessions()
            .await
            .map(|sessions| vec![UiEvent::SessionsLoaded { generation, sessions }]),
        BackendCommand::SelectSession {
            session_id,
            generation,
        } => {
            let selected = match api.select_session(&session_id).await {
                Ok(selected) => selected,
                Err(err) => return vec![UiEvent::Failed(err)],
            };
            let mut events = vec![UiEvent::SessionSelected(selected)];
            match api.current_transcript().await {
                Ok(transcript) => events.push(UiEvent::TranscriptLoaded {
                    generation,
                    transcript,
                }),
                Err(err) => events.push(UiEvent::Failed(err)),
            }
            Ok(events)
        }
        BackendCommand::FetchTranscript { generation } => {
            api.current_transcript().await.map(|transcript| {
                vec![UiEvent::TranscriptLoaded {
                    generation,
                    transcript,
                }]
            })
        }
        BackendCommand::CreateSession => api
            .create_session()
            .await
            .map(|session_id| vec![UiEvent::SessionCreated(session_id)]),
        BackendCommand::DeleteSession { session_id } => api
            .delete_session(&session_id)
            .await
            .map(|()| vec![UiEvent::SessionDeleted(session_id)]),
        BackendCommand::ListModels { generation } => api
            .list_models()
            .await
            .map(|models| vec![UiEvent::ModelsLoaded { generation, models }]),
        BackendCommand::ListAgents { generation } => api
            .list_agents()
            .await
            .map(|agents| vec![UiEvent::AgentsLoaded { generation, agents }]),
        BackendCommand::Ask {
            content,
            agent,
            data,
        } => api
            .ask(&content, &agent, data)
            .await
            .map(|answer| vec![UiEvent::Answered(answer)]),
    };

    result.unwrap_or_else(|err| vec![UiEvent::Failed(err)])
}

#[cfg(test)]
#[path = "../tests/runtime_tests.rs"]
mod tests;
