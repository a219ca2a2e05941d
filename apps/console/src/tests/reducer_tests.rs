use super::*;

use client_core::{ClientError, ErrorCategory, MemorySink, Operation};
use shared::{
    domain::{ChatMessage, MessageId, Role},
    protocol::{AskAction, AskResponse, UpdateSessionResponse},
};

fn controller() -> (Controller, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::default());
    (Controller::new(sink.clone()), sink)
}

fn ids(values: &[&str]) -> Vec<SessionId> {
    values.iter().map(|value| SessionId::new(*value)).collect()
}

fn transcript(id: &str, messages: &[(&str, Role, &str)]) -> SessionTranscript {
    SessionTranscript {
        id: SessionId::new(id),
        messages: messages
            .iter()
            .map(|(message_id, role, content)| ChatMessage {
                id: MessageId::new(*message_id),
                role: *role,
                content: content.to_string(),
                created_at_raw: "2024-05-01T12:00:00".to_string(),
            })
            .collect(),
        created_at_raw: "2024-05-01T11:00:00".to_string(),
        vector_store_id: None,
    }
}

fn decode_failure(operation: Operation) -> ClientError {
    let source = serde_json::from_str::<serde_json::Value>("<html>").expect_err("not json");
    ClientError::Decode { operation, source }
}

fn answer() -> AskResponse {
    AskResponse {
        content: "hi there".into(),
        agent_name: "agentX".into(),
        data: AskAction {
            action: "none".into(),
            message: "ok".into(),
            title: "reply".into(),
        },
    }
}

fn transcript_generation(cmd: &BackendCommand) -> u64 {
    match cmd {
        BackendCommand::SelectSession { generation, .. }
        | BackendCommand::FetchTranscript { generation } => *generation,
        other => panic!("expected a transcript-loading command, got {other:?}"),
    }
}

/// Runs activation and feeds the session list straight back in.
fn with_sessions(controller: &mut Controller, sessions: &[&str]) {
    let generation = controller
        .activate()
        .into_iter()
        .find_map(|cmd| match cmd {
            BackendCommand::ListSessions { generation } => Some(generation),
            _ => None,
        })
        .expect("list sessions command");
    controller.apply(UiEvent::SessionsLoaded {
        generation,
        sessions: ids(sessions),
    });
}

#[test]
fn activation_issues_the_four_initial_loads() {
    let (mut controller, _sink) = controller();
    let names: Vec<&str> = controller.activate().iter().map(|cmd| cmd.name()).collect();
    assert_eq!(
        names,
        vec!["fetch_api_key", "list_sessions", "list_models", "list_agents"]
    );
}

#[test]
fn first_listed_session_becomes_selected() {
    let (mut controller, _sink) = controller();
    with_sessions(&mut controller, &["a", "b"]);

    assert_eq!(controller.state().sessions, ids(&["a", "b"]));
    assert_eq!(controller.state().selected, Some(SessionId::new("a")));
}

#[test]
fn empty_session_list_leaves_selection_empty() {
    let (mut controller, _sink) = controller();
    with_sessions(&mut controller, &[]);
    assert!(controller.state().selected.is_none());
}

#[test]
fn failed_transcript_fetch_keeps_optimistic_selection() {
    let (mut controller, sink) = controller();
    with_sessions(&mut controller, &["a", "b"]);
    let cmd = controller.select_session(SessionId::new("a"));
    let before = transcript("a", &[("m1", Role::User, "hi")]);
    controller.apply(UiEvent::TranscriptLoaded {
        generation: transcript_generation(&cmd),
        transcript: before.clone(),
    });

    let cmd = controller.select_session(SessionId::new("b"));
    assert_eq!(
        cmd,
        BackendCommand::SelectSession {
            session_id: SessionId::new("b"),
            generation: transcript_generation(&cmd),
        }
    );
    assert_eq!(controller.state().selected, Some(SessionId::new("b")));

    controller.apply(UiEvent::SessionSelected(UpdateSessionResponse {
        session_id: SessionId::new("b"),
        status: "ok".into(),
    }));
    let follow_up = controller.apply(UiEvent::Failed(decode_failure(Operation::CurrentTranscript)));

    assert!(follow_up.is_none());
    assert_eq!(controller.state().selected, Some(SessionId::new("b")));
    assert_eq!(controller.state().transcript, Some(before));
    let reports = sink.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].operation, Operation::CurrentTranscript);
    assert_eq!(reports[0].category, ErrorCategory::Decode);
}

#[test]
fn stale_transcript_response_is_discarded() {
    let (mut controller, _sink) = controller();
    with_sessions(&mut controller, &["a", "b"]);
    let first = controller.select_session(SessionId::new("a"));
    let second = controller.select_session(SessionId::new("b"));

    controller.apply(UiEvent::TranscriptLoaded {
        generation: transcript_generation(&second),
        transcript: transcript("b", &[]),
    });
    controller.apply(UiEvent::TranscriptLoaded {
        generation: transcript_generation(&first),
        transcript: transcript("a", &[]),
    });

    let shown = controller.state().transcript.as_ref().expect("transcript");
    assert_eq!(shown.id, SessionId::new("b"));
}

#[test]
fn ask_without_loaded_transcript_does_not_refetch() {
    let (mut controller, _sink) = controller();
    controller.edit_field(FormField::Content, "hello");
    controller.edit_field(FormField::Agent, "agentX");

    assert_eq!(
        controller.ask(),
        BackendCommand::Ask {
            content: "hello".into(),
            agent: "agentX".into(),
            data: Map::new(),
        }
    );
    assert!(controller.apply(UiEvent::Answered(answer())).is_none());
}

#[test]
fn ask_with_loaded_transcript_refetches_whole_transcript() {
    let (mut controller, _sink) = controller();
    with_sessions(&mut controller, &["a"]);
    let cmd = controller.select_session(SessionId::new("a"));
    controller.apply(UiEvent::TranscriptLoaded {
        generation: transcript_generation(&cmd),
        transcript: transcript("a", &[("m1", Role::User, "hi")]),
    });

    let follow_up = controller
        .apply(UiEvent::Answered(answer()))
        .expect("refetch command");
    let refreshed = transcript(
        "a",
        &[("m1", Role::User, "hi"), ("m2", Role::Assistant, "hi there")],
    );
    controller.apply(UiEvent::TranscriptLoaded {
        generation: transcript_generation(&follow_up),
        transcript: refreshed.clone(),
    });
    assert_eq!(controller.state().transcript, Some(refreshed));
}

#[test]
fn deleting_last_session_clears_selection() {
    let (mut controller, _sink) = controller();
    with_sessions(&mut controller, &["a"]);

    let cmd = controller.delete_selected_session().expect("delete command");
    assert_eq!(
        cmd,
        BackendCommand::DeleteSession {
            session_id: SessionId::new("a")
        }
    );
    controller.apply(UiEvent::SessionDeleted(SessionId::new("a")));

    assert!(controller.state().sessions.is_empty());
    assert!(controller.state().selected.is_none());
}

#[test]
fn deleting_selected_session_falls_back_to_first_remaining() {
    let (mut controller, _sink) = controller();
    with_sessions(&mut controller, &["a", "b", "c"]);
    controller.select_session(SessionId::new("b"));

    controller.apply(UiEvent::SessionDeleted(SessionId::new("b")));
    assert_eq!(controller.state().sessions, ids(&["a", "c"]));
    assert_eq!(controller.state().selected, Some(SessionId::new("a")));
}

#[test]
fn deleting_unselected_session_removes_only_that_entry() {
    let (mut controller, _sink) = controller();
    with_sessions(&mut controller, &["a", "b", "c"]);
    controller.select_session(SessionId::new("c"));

    controller.apply(UiEvent::SessionDeleted(SessionId::new("b")));
    assert_eq!(controller.state().sessions, ids(&["a", "c"]));
    assert_eq!(controller.state().selected, Some(SessionId::new("c")));
}

#[test]
fn delete_without_selection_is_a_no_op() {
    let (controller, _sink) = controller();
    assert!(controller.delete_selected_session().is_none());
}

#[test]
fn created_session_is_appended_and_selected() {
    let (mut controller, _sink) = controller();
    with_sessions(&mut controller, &["a"]);
    assert_eq!(controller.create_session(), BackendCommand::CreateSession);

    controller.apply(UiEvent::SessionCreated(SessionId::new("z")));
    assert_eq!(controller.state().sessions, ids(&["a", "z"]));
    assert_eq!(controller.state().selected, Some(SessionId::new("z")));
}

#[test]
fn catalogs_replace_lists_and_default_form_choices() {
    let (mut controller, _sink) = controller();
    let cmds = controller.activate();
    let generation_of = |name: &str| match cmds.iter().find(|cmd| cmd.name() == name) {
        Some(BackendCommand::ListModels { generation })
        | Some(BackendCommand::ListAgents { generation })
        | Some(BackendCommand::FetchApiKey { generation }) => *generation,
        other => panic!("unexpected command {other:?}"),
    };

    controller.apply(UiEvent::ModelsLoaded {
        generation: generation_of("list_models"),
        models: vec!["gpt-4o".into(), "claude".into()],
    });
    controller.apply(UiEvent::AgentsLoaded {
        generation: generation_of("list_agents"),
        agents: Vec::new(),
    });
    controller.apply(UiEvent::ApiKeyLoaded {
        generation: generation_of("fetch_api_key"),
        api_key: "sk-live".into(),
    });

    let state = controller.state();
    assert_eq!(state.models, vec!["gpt-4o".to_string(), "claude".to_string()]);
    assert_eq!(state.form.model, "gpt-4o");
    assert!(state.agents.is_empty());
    assert!(state.form.agent.is_empty());
    assert_eq!(state.form.api_key, "sk-live");
}

#[test]
fn failures_leave_state_untouched() {
    let (mut controller, sink) = controller();
    with_sessions(&mut controller, &["a", "b"]);
    let before = controller.state().clone();

    for operation in [Operation::ListModels, Operation::DeleteSession, Operation::Ask] {
        assert!(controller.apply(UiEvent::Failed(decode_failure(operation))).is_none());
    }

    assert_eq!(controller.state(), &before);
    assert_eq!(sink.reports().len(), 3);
}

#[test]
fn field_edits_apply_immediately() {
    let (mut controller, _sink) = controller();
    assert_eq!(controller.state().form.debug_tag, "ALERT");

    controller.edit_field(FormField::ApiKey, "sk-typed");
    controller.edit_field(FormField::DebugTag, "TRACE");
    controller.show_section(Section::Session);

    assert_eq!(
        controller.save_api_key(),
        BackendCommand::SaveApiKey {
            value: "sk-typed".into()
        }
    );
    assert_eq!(controller.state().form.debug_tag, "TRACE");
    assert_eq!(controller.state().section, Section::Session);
}

#[test]
fn stale_model_list_does_not_override_newer_one() {
    let (mut controller, _sink) = controller();
    let model_generation = |cmds: Vec<BackendCommand>| {
        cmds.into_iter()
            .find_map(|cmd| match cmd {
                BackendCommand::ListModels { generation } => Some(generation),
                _ => None,
            })
            .expect("list models command")
    };
    let older = model_generation(controller.activate());
    let newer = model_generation(controller.activate());

    controller.apply(UiEvent::ModelsLoaded {
        generation: newer,
        models: vec!["claude".into()],
    });
    controller.apply(UiEvent::ModelsLoaded {
        generation: older,
        models: vec!["gpt-3.5".into(), "gpt-4o".into()],
    });

    assert_eq!(controller.state().models, vec!["claude".to_string()]);
    assert_eq!(controller.state().form.model, "claude");
}
