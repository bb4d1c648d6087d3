//! Command parsing for the chat application.
//!
//! Input starting with `/` controls the session instead of being sent to the
//! model. The bare words `exit` and `quit` also end the session.

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Clear the conversation history, keeping the system prompt.
    Clear,

    /// Change the model.
    Model(String),

    /// List the models the service offers.
    Models,

    /// Set the system prompt, or restore the default with `None`.
    System(Option<String>),

    /// Show the current model and history length.
    History,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for commands.
///
/// Returns `Some(ChatCommand)` if the input is a command,
/// or `None` if it should be sent as a message.
///
/// # Examples
///
/// ```
/// # use anura::chat::{ChatCommand, parse_command};
/// assert_eq!(parse_command("/quit"), Some(ChatCommand::Quit));
/// assert_eq!(parse_command("exit"), Some(ChatCommand::Quit));
/// assert!(parse_command("/model qwen2.5:7b").is_some());
/// assert!(parse_command("Hello!").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if input == "exit" || input == "quit" {
        return Some(ChatCommand::Quit);
    }

    let rest = input.strip_prefix('/')?;
    let mut parts = rest.splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "clear" => ChatCommand::Clear,
        "model" => match argument {
            Some(model) => ChatCommand::Model(model.to_string()),
            None => ChatCommand::Invalid("/model requires a model name".to_string()),
        },
        "models" => ChatCommand::Models,
        "system" => ChatCommand::System(argument.map(|s| s.to_string())),
        "history" | "stats" => ChatCommand::History,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{command}")),
    };

    Some(result)
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /clear                 Clear conversation history
  /model <name>          Change the model (e.g., /model qwen2.5:7b)
  /models                List available models
  /system [prompt]       Set system prompt (no argument restores the default)
  /history               Show the current model and message count
  /help                  Show this help message
  /quit                  Exit (also: exit, quit, Ctrl+D)"#
}
