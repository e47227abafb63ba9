//! The host UI boundary.
//!
//! Everything the assistant shows or asks goes through these traits.  The
//! host owns the real surfaces (terminals, an output panel, toasts, input
//! boxes, the editor and the status bar); this crate only consumes them.
//!
//! Two implementations ship with the crate:
//!
//! - [`console`]: a plain terminal host used by the `geminius-chat` binary
//! - [`memory`]: an in-memory recorder for tests and embedders

use std::sync::Arc;

pub mod console;
pub mod memory;

/// A disposable pseudo-terminal the chat session writes to.
pub trait Terminal: Send + Sync {
    /// Bring the terminal to the foreground.
    fn show(&self);

    /// Write one line of output.
    fn write_line(&self, line: &str);

    /// Write the input prompt marker without a trailing newline.
    fn write_prompt(&self, marker: &str);

    /// Clear the visible contents.
    fn clear(&self);

    /// True until the terminal is disposed, by us or by the user.
    fn is_open(&self) -> bool;

    /// Close the terminal and release its resources.
    fn dispose(&self);
}

/// A persistent panel where answers are shown.
pub trait OutputPanel: Send + Sync {
    /// Remove all content.
    fn clear(&self);

    /// Append one line.
    fn append_line(&self, line: &str);

    /// Reveal the panel; with `preserve_focus` the cursor stays where it is.
    fn show(&self, preserve_focus: bool);
}

/// How loudly a notification is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Informational.
    Info,
    /// Something the user should fix.
    Warning,
    /// An operation failed.
    Error,
}

/// Options for a single-line input box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputRequest {
    /// Text shown above the input.
    pub prompt: String,
    /// Example text shown while the input is empty.
    pub placeholder: String,
}

impl InputRequest {
    /// Creates an input request.
    pub fn new(prompt: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            placeholder: placeholder.into(),
        }
    }
}

/// A status bar entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusItem {
    /// Label, which may use the host's icon syntax.
    pub text: String,
    /// Hover text.
    pub tooltip: String,
    /// Identifier of the command run when the item is clicked.
    pub command: String,
}

/// What the active editor has selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorSelection {
    /// The selected text; empty when nothing is selected.
    pub selected_text: String,
    /// The full text of the line holding the cursor.
    pub current_line: String,
}

impl EditorSelection {
    /// A selection covering `text`.
    pub fn selected(text: impl Into<String>) -> Self {
        Self {
            selected_text: text.into(),
            current_line: String::new(),
        }
    }

    /// An empty selection with the cursor on `line`.
    pub fn cursor_on(line: impl Into<String>) -> Self {
        Self {
            selected_text: String::new(),
            current_line: line.into(),
        }
    }
}

/// The host environment.
#[async_trait::async_trait]
pub trait Workbench: Send + Sync {
    /// Create a new terminal with the given title.
    fn create_terminal(&self, name: &str) -> Arc<dyn Terminal>;

    /// The output panel answers are written to.
    fn output_panel(&self) -> Arc<dyn OutputPanel>;

    /// Show a notification with optional action buttons and wait for the
    /// chosen action, if any.
    async fn notify(&self, severity: Severity, message: &str, actions: &[&str]) -> Option<String>;

    /// Ask the user for a line of text.  `None` means the prompt was dismissed.
    async fn input_box(&self, request: InputRequest) -> Option<String>;

    /// The selection of the active editor, or `None` if no editor is open.
    fn active_editor(&self) -> Option<EditorSelection>;

    /// Show or update the status bar item.
    fn set_status(&self, item: &StatusItem);

    /// Open the settings UI focused on `setting`.
    fn open_settings(&self, setting: &str);
}
