//! Console command parsing. Colon-prefixed lines are commands; any other
//! non-empty line is a question for the current agent.

use shared::domain::{FormField, SessionId};

use crate::controller::reducer::Section;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    ShowSection(Section),
    Edit(FormField, String),
    SaveApiKey,
    Submit,
    Select(SessionId),
    NewSession,
    DeleteSession,
    Ask(String),
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  :config | :session      switch section
  :model <name>           choose model
  :agent <name>           choose agent
  :key <value>            edit api key (local)
  :save-key               push api key to backend
  :tag <value>            edit debug tag
  :submit                 log the form
  :select <session id>    switch session and load transcript
  :new                    create session
  :delete                 delete selected session
  :show                   redraw current section
  :help                   this text
  :quit                   exit
anything else is sent to the selected agent";

/// Free text is returned exactly as typed; trimming only decides whether the
/// line is blank or a command.
pub fn parse_line(line: &str) -> Result<Option<UserAction>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let Some(command) = trimmed.strip_prefix(':') else {
        return Ok(Some(UserAction::Ask(line.to_string())));
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    let action = match name {
        "config" => UserAction::ShowSection(Section::Config),
        "session" => UserAction::ShowSection(Section::Session),
        "model" => UserAction::Edit(FormField::Model, required(name, arg)?),
        "agent" => UserAction::Edit(FormField::Agent, required(name, arg)?),
        "key" => UserAction::Edit(FormField::ApiKey, arg.to_string()),
        "tag" => UserAction::Edit(FormField::DebugTag, arg.to_string()),
        "save-key" => UserAction::SaveApiKey,
        "submit" => UserAction::Submit,
        "select" => UserAction::Select(SessionId::new(required(name, arg)?)),
        "new" => UserAction::NewSession,
        "delete" => UserAction::DeleteSession,
        "show" => UserAction::Show,
        "help" => UserAction::Help,
        "quit" | "q" => UserAction::Quit,
        other => return Err(format!("unknown command ':{other}' (try :help)")),
    };
    Ok(Some(action))
}

fn required(name: &str, arg: &str) -> Result<String, String> {
    if arg.is_empty() {
        Err(format!(":{name} needs an argument"))
    } else {
        Ok(arg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_question() {
        assert_eq!(
            parse_line("  what is rust?  "),
            Ok(Some(UserAction::Ask("  what is rust?  ".into())))
        );
        assert_eq!(parse_line("   "), Ok(None));
    }

    #[test]
    fn commands_with_arguments() {
        assert_eq!(
            parse_line(":select  s-42"),
            Ok(Some(UserAction::Select(SessionId::new("s-42"))))
        );
        assert_eq!(
            parse_line(":key"),
            Ok(Some(UserAction::Edit(FormField::ApiKey, String::new())))
        );
        assert!(parse_line(":model").is_err());
        assert!(parse_line(":frobnicate").is_err());
    }
}
