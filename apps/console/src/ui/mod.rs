//! Line-oriented front end. Owns the controller on the UI thread and routes
//! input lines and worker events through it.

pub mod input;
pub mod render;

use std::io::Write;

use crossbeam_channel::Sender;
use shared::domain::FormField;

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::{
        events::UiEvent,
        orchestration::{dispatch_all, dispatch_backend_command},
        reducer::{Controller, Section},
    },
};
use input::{parse_line, UserAction, HELP};

pub struct ConsoleApp<W: Write> {
    controller: Controller,
    cmd_tx: Sender<BackendCommand>,
    status: String,
    out: W,
}

impl<W: Write> ConsoleApp<W> {
    pub fn new(controller: Controller, cmd_tx: Sender<BackendCommand>, out: W) -> Self {
        Self {
            controller,
            cmd_tx,
            status: String::new(),
            out,
        }
    }

    pub fn activate(&mut self) {
        let cmds = self.controller.activate();
        dispatch_all(&self.cmd_tx, cmds, &mut self.status);
        self.flush_status();
    }

    /// Returns `false` once the user asked to quit.
    pub fn handle_line(&mut self, line: &str) -> bool {
        let action = match parse_line(line) {
            Ok(Some(action)) => action,
            Ok(None) => return true,
            Err(message) => {
                self.print(&message);
                return true;
            }
        };

        let cmd = match action {
            UserAction::Quit => return false,
            UserAction::Help => {
                self.print(HELP);
                None
            }
            UserAction::Show => {
                self.redraw();
                None
            }
            UserAction::ShowSection(section) => {
                self.controller.show_section(section);
                self.redraw();
                None
            }
            UserAction::Edit(field, value) => {
                self.controller.edit_field(field, value);
                None
            }
            UserAction::Submit => {
                self.controller.submit_form();
                None
            }
            UserAction::SaveApiKey => Some(self.controller.save_api_key()),
            UserAction::Select(session_id) => Some(self.controller.select_session(session_id)),
            UserAction::NewSession => Some(self.controller.create_session()),
            UserAction::DeleteSession => {
                let cmd = self.controller.delete_selected_session();
                if cmd.is_none() {
                    self.print("no session selected");
                }
                cmd
            }
            UserAction::Ask(content) => {
                self.controller.edit_field(FormField::Content, content);
                Some(self.controller.ask())
            }
        };

        if let Some(cmd) = cmd {
            dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status);
        }
        self.flush_status();
        true
    }

    pub fn handle_event(&mut self, event: UiEvent) {
        let redraw = matches!(
            event,
            UiEvent::SessionsLoaded { .. }
                | UiEvent::TranscriptLoaded { .. }
                | UiEvent::SessionCreated(_)
                | UiEvent::SessionDeleted(_)
        ) && self.controller.state().section == Section::Session;
        let answer = match &event {
            UiEvent::Answered(answer) => Some(format!("{}> {}", answer.agent_name, answer.content)),
            _ => None,
        };

        if let Some(cmd) = self.controller.apply(event) {
            dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status);
        }

        if let Some(answer) = answer {
            self.print(&answer);
        }
        if redraw {
            self.redraw();
        }
        self.flush_status();
    }

    fn redraw(&mut self) {
        if let Err(err) = render::render_section(&mut self.out, self.controller.state()) {
            tracing::error!("failed to write to console: {err}");
        }
    }

    fn print(&mut self, text: &str) {
        if let Err(err) = writeln!(self.out, "{text}") {
            tracing::error!("failed to write to console: {err}");
        }
    }

    fn flush_status(&mut self) {
        if !self.status.is_empty() {
            let status = std::mem::take(&mut self.status);
            self.print(&status);
        }
        if let Err(err) = self.out.flush() {
            tracing::error!("failed to flush console output: {err}");
        }
    }
}
