//! Slash command parsing for the ask loop.
//!
//! Commands start with `/`. Plain `exit` / `quit` (any case) also end
//! the session, matching the exit-keyword behavior of the loop.

use console::style;

/// Available slash commands in the ask loop.
#[derive(Debug, PartialEq)]
pub enum AskCommand {
    /// Show available commands.
    Help,
    /// Clear the terminal screen.
    Clear,
    /// Show the chunks behind the previous answer.
    Sources,
    /// Exit the session.
    Exit,
    /// Unknown command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<AskCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let cmd = trimmed.split_whitespace().next().unwrap_or(trimmed);
    match cmd.to_lowercase().as_str() {
        "/help" | "/h" | "/?" => Some(AskCommand::Help),
        "/clear" | "/cls" => Some(AskCommand::Clear),
        "/sources" | "/src" => Some(AskCommand::Sources),
        "/exit" | "/quit" | "/q" => Some(AskCommand::Exit),
        other => Some(AskCommand::Unknown(other.to_string())),
    }
}

/// True when the bare input is an exit keyword.
pub fn is_exit_keyword(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "exit" | "quit")
}

/// Print the help text listing all available commands.
pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    println!("  {}     {}", style("/help").cyan(), "Show this help message");
    println!("  {}    {}", style("/clear").cyan(), "Clear the screen");
    println!(
        "  {}  {}",
        style("/sources").cyan(),
        "Show the passages behind the last answer"
    );
    println!("  {}     {}", style("/exit").cyan(), "End the session");
    println!();
    println!(
        "  {}",
        style("'exit', 'quit' or Ctrl+D also end the session").dim()
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_help() {
        assert_eq!(parse("/help"), Some(AskCommand::Help));
        assert_eq!(parse("/h"), Some(AskCommand::Help));
        assert_eq!(parse("/?"), Some(AskCommand::Help));
    }

    #[test]
    fn test_parse_exit_family() {
        assert_eq!(parse("/exit"), Some(AskCommand::Exit));
        assert_eq!(parse("/quit"), Some(AskCommand::Exit));
        assert_eq!(parse("/q"), Some(AskCommand::Exit));
    }

    #[test]
    fn test_parse_sources() {
        assert_eq!(parse("/sources"), Some(AskCommand::Sources));
        assert_eq!(parse("/src"), Some(AskCommand::Sources));
    }

    #[test]
    fn test_parse_not_a_command() {
        assert_eq!(parse("where is the team from?"), None);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse("/foo"), Some(AskCommand::Unknown("/foo".to_string())));
    }

    #[test]
    fn test_exit_keywords() {
        assert!(is_exit_keyword("exit"));
        assert!(is_exit_keyword("QUIT"));
        assert!(is_exit_keyword("  exit  "));
        assert!(!is_exit_keyword("exit the building how?"));
    }
}
