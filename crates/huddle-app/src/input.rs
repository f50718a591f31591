//! Maps stdin lines to session commands.

use huddle_chat::SessionCommand;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    Command(SessionCommand),
    Help,
    Quit,
    Unknown(String),
    Nothing,
}

pub const HELP: &str = "\
commands:
  /enter            join the chat
  /leave            leave the chat
  /typing <draft>   update the draft (signals typing)
  /help             show this help
  /quit             exit
anything else is sent as a message";

pub fn parse_line(line: &str) -> InputAction {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return InputAction::Nothing;
    }

    let Some(rest) = line.trim_start().strip_prefix('/') else {
        return InputAction::Command(SessionCommand::Submit(line.to_string()));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim_start()),
        None => (rest, ""),
    };

    match name {
        "enter" => InputAction::Command(SessionCommand::EnterChat),
        "leave" => InputAction::Command(SessionCommand::LeaveChat),
        "typing" => InputAction::Command(SessionCommand::Input(arg.to_string())),
        "help" | "?" => InputAction::Help,
        "quit" | "exit" => InputAction::Quit,
        other => InputAction::Unknown(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_submits() {
        assert_eq!(
            parse_line("hello there\n"),
            InputAction::Command(SessionCommand::Submit("hello there".into()))
        );
    }

    #[test]
    fn blank_lines_do_nothing() {
        assert_eq!(parse_line(""), InputAction::Nothing);
        assert_eq!(parse_line("   \n"), InputAction::Nothing);
    }

    #[test]
    fn membership_commands() {
        assert_eq!(
            parse_line("/enter"),
            InputAction::Command(SessionCommand::EnterChat)
        );
        assert_eq!(
            parse_line("/leave"),
            InputAction::Command(SessionCommand::LeaveChat)
        );
    }

    #[test]
    fn typing_carries_draft() {
        assert_eq!(
            parse_line("/typing half a thought"),
            InputAction::Command(SessionCommand::Input("half a thought".into()))
        );
        assert_eq!(
            parse_line("/typing"),
            InputAction::Command(SessionCommand::Input(String::new()))
        );
    }

    #[test]
    fn quit_help_and_unknown() {
        assert_eq!(parse_line("/quit"), InputAction::Quit);
        assert_eq!(parse_line("/exit"), InputAction::Quit);
        assert_eq!(parse_line("/help"), InputAction::Help);
        assert_eq!(parse_line("/dance now"), InputAction::Unknown("dance".into()));
    }
}
