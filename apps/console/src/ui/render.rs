use std::io::{self, Write};

use shared::domain::SessionTranscript;

use crate::controller::reducer::{Section, ViewState};

pub fn render_section(out: &mut impl Write, state: &ViewState) -> io::Result<()> {
    match state.section {
        Section::Config => render_config(out, state),
        Section::Session => {
            render_sessions(out, state)?;
            if let Some(transcript) = &state.transcript {
                render_transcript(out, transcript)?;
            }
            Ok(())
        }
    }
}

pub fn render_config(out: &mut impl Write, state: &ViewState) -> io::Result<()> {
    let form = &state.form;
    writeln!(out, "model:     {} (available: {})", form.model, state.models.join(", "))?;
    writeln!(out, "agent:     {} (available: {})", form.agent, state.agents.join(", "))?;
    writeln!(out, "api key:   {}", mask(&form.api_key))?;
    writeln!(out, "debug tag: {}", form.debug_tag)
}

pub fn render_sessions(out: &mut impl Write, state: &ViewState) -> io::Result<()> {
    if state.sessions.is_empty() {
        return writeln!(out, "no sessions");
    }
    for session in &state.sessions {
        let marker = if state.selected.as_ref() == Some(session) {
            '*'
        } else {
            ' '
        };
        writeln!(out, "{marker} {session}")?;
    }
    Ok(())
}

pub fn render_transcript(out: &mut impl Write, transcript: &SessionTranscript) -> io::Result<()> {
    writeln!(out, "-- session {} --", transcript.id)?;
    for message in &transcript.messages {
        let prefix = if message.role.is_user() { "you>" } else { "bot>" };
        writeln!(out, "{prefix} {}", message.content)?;
    }
    Ok(())
}

fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 4 {
        visible
    } else {
        format!("{visible}…")
    }
}
