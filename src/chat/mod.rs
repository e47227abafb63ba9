//! The chat terminal and its command-line front-end.
//!
//! - [`session`]: the session state machine behind the chat terminal
//! - [`commands`]: terminal builtins and front-end slash commands
//! - [`selection`]: picking the code to analyze
//! - [`config`]: command-line arguments for `geminius-chat`

mod commands;
mod config;
mod selection;
mod session;

pub use commands::{
    BuiltinCommand, ChatCommand, frontend_help_text, help_text, parse_command, welcome_banner,
};
pub use config::ChatArgs;
pub use selection::{SelectionSpec, display_lines, escape_for_display, selected_code};
pub use session::{
    ChatTerminal, ConversationTurn, PROMPT_MARKER, RESPONSE_COOLDOWN, Role, SessionState,
    SessionStatus, TERMINAL_NAME,
};
