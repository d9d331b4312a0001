//! Stdin command parsing for headless mode
//!
//! One command per line. Each command expands into the messages a user
//! would have produced by hand in the TUI.

use instancer_app::{ControlAction, Message};
use instancer_core::Route;

/// Parse one input line.
///
/// Blank lines yield no messages; unknown commands are an error string.
pub fn parse_command(line: &str) -> Result<Vec<Message>, String> {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let messages = match (command, rest) {
        ("", _) => Vec::new(),

        ("q" | "quit", _) => vec![Message::Quit],

        ("catalog" | "challs", _) => vec![Message::Navigate(Route::Catalog)],
        ("open" | "chall", "") => return Err(format!("usage: {} <challenge-id>", command)),
        ("open" | "chall", id) => vec![Message::Navigate(Route::challenge(id))],
        ("goto", path) => match Route::parse(path) {
            Some(route) => vec![Message::Navigate(route)],
            None => return Err(format!("unknown path: {}", path)),
        },
        ("profile", _) => vec![Message::Navigate(Route::Profile)],

        ("d" | "deploy", _) => vec![Message::Control(ControlAction::Deploy)],
        ("e" | "extend", _) => vec![Message::Control(ControlAction::Extend)],
        ("t" | "terminate", _) => vec![Message::Control(ControlAction::Terminate)],
        ("r" | "reload", _) => vec![Message::LoadChallenge],
        ("refresh", _) => vec![Message::FetchChallenges],

        ("login", "") => return Err("usage: login <token>".to_string()),
        ("login", token) => vec![
            Message::Navigate(Route::Login {
                token: Some(token.to_string()),
                chall: None,
            }),
            Message::LoginSubmit,
        ],
        ("register", args) => {
            let mut parts = args.split_whitespace();
            let (Some(username), Some(email), None) = (parts.next(), parts.next(), parts.next())
            else {
                return Err("usage: register <username> <email>".to_string());
            };
            let mut messages = vec![Message::Navigate(Route::Register)];
            messages.extend(username.chars().map(Message::FormInput));
            messages.push(Message::FormNextField);
            messages.extend(email.chars().map(Message::FormInput));
            messages.push(Message::RegisterSubmit);
            messages
        }
        ("logout", _) => vec![Message::Logout],

        _ => return Err(format!("unknown command: {}", command)),
    };

    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(line: &str) -> Message {
        let mut messages = parse_command(line).expect("valid command");
        assert_eq!(messages.len(), 1, "expected one message for {:?}", line);
        messages.remove(0)
    }

    #[test]
    fn test_blank_line_is_ignored() {
        assert!(parse_command("   ").unwrap().is_empty());
    }

    #[test]
    fn test_controls() {
        assert!(matches!(
            single("deploy"),
            Message::Control(ControlAction::Deploy)
        ));
        assert!(matches!(single("e"), Message::Control(ControlAction::Extend)));
        assert!(matches!(
            single("terminate"),
            Message::Control(ControlAction::Terminate)
        ));
        assert!(matches!(single("reload"), Message::LoadChallenge));
    }

    #[test]
    fn test_open_challenge() {
        match single("open  baby-sqli ") {
            Message::Navigate(route) => assert_eq!(route, Route::challenge("baby-sqli")),
            other => panic!("unexpected {:?}", other),
        }
        assert!(parse_command("open").is_err());
    }

    #[test]
    fn test_goto_parses_paths() {
        match single("goto /chall/web-1/") {
            Message::Navigate(route) => assert_eq!(route, Route::challenge("web-1")),
            other => panic!("unexpected {:?}", other),
        }
        assert!(parse_command("goto /nowhere/at/all").is_err());
    }

    #[test]
    fn test_login_navigates_then_submits() {
        let messages = parse_command("login T0K").unwrap();
        assert_eq!(messages.len(), 2);
        assert!(matches!(
            &messages[0],
            Message::Navigate(Route::Login { token: Some(t), chall: None }) if t == "T0K"
        ));
        assert!(matches!(messages[1], Message::LoginSubmit));
    }

    #[test]
    fn test_register_types_both_fields() {
        let messages = parse_command("register rocket team@example.com").unwrap();
        assert!(matches!(messages[0], Message::Navigate(Route::Register)));
        assert!(matches!(messages[1], Message::FormInput('r')));
        assert!(messages
            .iter()
            .any(|m| matches!(m, Message::FormNextField)));
        assert!(matches!(messages.last(), Some(Message::RegisterSubmit)));
        assert!(parse_command("register onlyname").is_err());
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            parse_command("fly away").unwrap_err(),
            "unknown command: fly"
        );
    }
}
