//! Command parsing for the chat terminal.
//!
//! Two command sets live here.  [`BuiltinCommand`] covers the words the chat
//! terminal itself understands (`help`, `clear`, `exit`).  [`ChatCommand`]
//! covers the slash commands of the `geminius-chat` front-end, which stand in
//! for the host's command palette.

use crate::chat::selection::SelectionSpec;

/// A command understood by the chat terminal.
///
/// Matching is case-insensitive and exact after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinCommand {
    /// Show the help text.
    Help,
    /// Clear the transcript and the terminal view.
    Clear,
    /// Close the session.
    Exit,
}

impl BuiltinCommand {
    /// Parses a terminal line; `None` means the line is a question.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "help" => Some(BuiltinCommand::Help),
            "clear" => Some(BuiltinCommand::Clear),
            "exit" => Some(BuiltinCommand::Exit),
            _ => None,
        }
    }
}

/// Lines printed when a session starts.
pub fn welcome_banner() -> &'static [&'static str] {
    &[
        "🤖 Welcome to the Gemini AI assistant!",
        "💡 How to use it:",
        "  - Type a question and the AI will answer it",
        "  - Select code and run the analyze command for a quick explanation",
        "  - Type help for more commands",
        "  - Type clear to clear the conversation history",
        "  - Type exit to leave the assistant",
        "----------------------------------------",
    ]
}

/// Lines printed by the `help` command.
pub fn help_text() -> &'static [&'static str] {
    &[
        "📚 Gemini AI assistant help:",
        "🔧 Available commands:",
        "  help    - Show this help message",
        "  clear   - Clear the conversation history",
        "  exit    - Leave the AI assistant",
        "💡 Tips:",
        "  - Ask programming questions, for code explanations, or for debugging advice",
        "  - Every question is answered on its own; earlier turns are not sent along",
        "  - Select code and use the analyze command to explain it quickly",
    ]
}

/// A parsed front-end slash command.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Open (or focus) the chat session and offer the quick-pick actions.
    Start,
    /// Ask a question, prompting for it when no text is given.
    Ask(Option<String>),
    /// Explain the code at the given location.
    Analyze(SelectionSpec),
    /// Ask a question about the code at the given location.
    AskCode(SelectionSpec),
    /// Re-read the configuration.
    Reload,
    /// Show the current configuration.
    ShowConfig,
    /// Display front-end help.
    Help,
    /// Exit the front-end.
    Quit,
    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input starts with `/`, or `None` if it
/// should go to the chat terminal.
///
/// # Examples
///
/// ```
/// # use geminius::chat::{ChatCommand, parse_command};
/// assert_eq!(parse_command("/quit"), Some(ChatCommand::Quit));
/// assert!(parse_command("/analyze src/main.rs:10-20").is_some());
/// assert!(parse_command("What is a lifetime?").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();
    let rest = input.strip_prefix('/')?;

    let mut parts = rest.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or_default().to_lowercase();
    let argument = parts.next().map(str::trim).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "start" | "chat" => ChatCommand::Start,
        "ask" => ChatCommand::Ask(argument.map(String::from)),
        "analyze" | "explain" => match argument {
            Some(arg) => match SelectionSpec::parse(arg) {
                Ok(spec) => ChatCommand::Analyze(spec),
                Err(err) => ChatCommand::Invalid(format!("/analyze {err}")),
            },
            None => ChatCommand::Invalid("/analyze requires <file>[:start[-end]]".to_string()),
        },
        "ask-code" => match argument {
            Some(arg) => match SelectionSpec::parse(arg) {
                Ok(spec) => ChatCommand::AskCode(spec),
                Err(err) => ChatCommand::Invalid(format!("/ask-code {err}")),
            },
            None => ChatCommand::Invalid("/ask-code requires <file>[:start[-end]]".to_string()),
        },
        "reload" => ChatCommand::Reload,
        "config" => ChatCommand::ShowConfig,
        "help" | "?" => ChatCommand::Help,
        "quit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{command}")),
    };

    Some(result)
}

/// Returns help text describing the front-end slash commands.
pub fn frontend_help_text() -> &'static str {
    r#"Front-end commands:
  /start                        Open the chat session and pick an action
  /ask [question]               Ask a question (prompts when omitted)
  /analyze <file>[:start[-end]] Explain the selected lines of a file
  /ask-code <file>[:start[-end]] Ask a question about the selected lines
  /reload                       Re-read the configuration
  /config                       Show the current configuration
  /help                         Show this help message
  /quit                         Exit
Anything else is typed into the chat terminal (try `help`)."#
}
