//! A host backed by the process's own terminal.
//!
//! The console has a single screen, so the chat terminal, the output panel
//! and notifications all print to stdout/stderr.  Input boxes and action
//! pickers read a line with rustyline on a blocking thread.  The chat prompt
//! marker is not printed directly; the front-end's readline loop picks it up
//! through [`ConsoleWorkbench::prompt_marker`].

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use rustyline::DefaultEditor;

use crate::config::API_KEY_ENV;
use crate::host::{
    EditorSelection, InputRequest, OutputPanel, Severity, StatusItem, Terminal, Workbench,
};
use crate::utils::sync::lock;

/// ANSI escape code for dim text.
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for bold text.
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code for cyan text (used for the terminal title).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for yellow text (used for warnings).
const ANSI_YELLOW: &str = "\x1b[33m";

/// ANSI escape code for green text (used for the output panel).
const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// Clears the screen and homes the cursor.
const ANSI_CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

#[derive(Clone, Copy)]
struct Style {
    use_color: bool,
}

impl Style {
    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_color {
            format!("{code}{text}{ANSI_RESET}")
        } else {
            text.to_string()
        }
    }
}

/// The chat terminal on the console.
pub struct ConsoleTerminal {
    name: String,
    style: Style,
    open: AtomicBool,
    prompt: Arc<Mutex<Option<String>>>,
}

impl Terminal for ConsoleTerminal {
    fn show(&self) {}

    fn write_line(&self, line: &str) {
        println!("{line}");
    }

    fn write_prompt(&self, marker: &str) {
        *lock(&self.prompt) = Some(marker.to_string());
    }

    fn clear(&self) {
        let mut stdout = io::stdout();
        if self.style.use_color {
            let _ = write!(stdout, "{ANSI_CLEAR_SCREEN}");
        }
        let _ = writeln!(stdout, "{}", self.style.paint(ANSI_BOLD, &self.name));
        let _ = stdout.flush();
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    fn dispose(&self) {
        if self.open.swap(false, Ordering::SeqCst) {
            *lock(&self.prompt) = None;
        }
    }
}

/// The output panel on the console.
pub struct ConsoleOutputPanel {
    style: Style,
}

impl OutputPanel for ConsoleOutputPanel {
    fn clear(&self) {
        println!();
    }

    fn append_line(&self, line: &str) {
        println!("{}", self.style.paint(ANSI_GREEN, line));
    }

    fn show(&self, _preserve_focus: bool) {
        let _ = io::stdout().flush();
    }
}

/// A [`Workbench`] on stdin/stdout.
pub struct ConsoleWorkbench {
    style: Style,
    panel: Arc<ConsoleOutputPanel>,
    prompt: Arc<Mutex<Option<String>>>,
    selection: Mutex<Option<EditorSelection>>,
    config_path: Option<PathBuf>,
}

impl ConsoleWorkbench {
    /// Creates a console host; `config_path` is where settings live.
    pub fn new(use_color: bool, config_path: Option<PathBuf>) -> Self {
        let style = Style { use_color };
        Self {
            style,
            panel: Arc::new(ConsoleOutputPanel { style }),
            prompt: Arc::new(Mutex::new(None)),
            selection: Mutex::new(None),
            config_path,
        }
    }

    /// Sets what the "active editor" reports.
    pub fn set_selection(&self, selection: Option<EditorSelection>) {
        *lock(&self.selection) = selection;
    }

    /// The prompt marker of the live chat terminal, if it is showing one.
    pub fn prompt_marker(&self) -> Option<String> {
        lock(&self.prompt).clone()
    }

    fn label(&self, severity: Severity) -> String {
        match severity {
            Severity::Info => self.style.paint(ANSI_CYAN, "info"),
            Severity::Warning => self.style.paint(ANSI_YELLOW, "warning"),
            Severity::Error => self.style.paint(ANSI_RED, "error"),
        }
    }
}

#[async_trait::async_trait]
impl Workbench for ConsoleWorkbench {
    fn create_terminal(&self, name: &str) -> Arc<dyn Terminal> {
        *lock(&self.prompt) = None;
        Arc::new(ConsoleTerminal {
            name: name.to_string(),
            style: self.style,
            open: AtomicBool::new(true),
            prompt: Arc::clone(&self.prompt),
        })
    }

    fn output_panel(&self) -> Arc<dyn OutputPanel> {
        self.panel.clone()
    }

    async fn notify(&self, severity: Severity, message: &str, actions: &[&str]) -> Option<String> {
        eprintln!("[{}] {message}", self.label(severity));
        if actions.is_empty() {
            return None;
        }
        for (idx, action) in actions.iter().enumerate() {
            eprintln!("  {}) {action}", idx + 1);
        }
        let hint = format!("choose 1-{} (enter to dismiss): ", actions.len());
        let choice = read_line(self.style.paint(ANSI_DIM, &hint)).await?;
        let idx = choice.trim().parse::<usize>().ok()?.checked_sub(1)?;
        actions.get(idx).map(|action| action.to_string())
    }

    async fn input_box(&self, request: InputRequest) -> Option<String> {
        eprintln!("{}", request.prompt);
        if !request.placeholder.is_empty() {
            eprintln!("{}", self.style.paint(ANSI_DIM, &request.placeholder));
        }
        let answer = read_line("? ".to_string()).await?;
        let answer = answer.trim();
        if answer.is_empty() {
            None
        } else {
            Some(answer.to_string())
        }
    }

    fn active_editor(&self) -> Option<EditorSelection> {
        lock(&self.selection).clone()
    }

    fn set_status(&self, item: &StatusItem) {
        let text = format!("[{}] {} ({})", item.text, item.tooltip, item.command);
        eprintln!("{}", self.style.paint(ANSI_DIM, &text));
    }

    fn open_settings(&self, setting: &str) {
        match &self.config_path {
            Some(path) => eprintln!(
                "Set `{setting}` in {} or export {API_KEY_ENV}, then run /reload",
                path.display()
            ),
            None => eprintln!("Export {API_KEY_ENV}, then run /reload"),
        }
    }
}

async fn read_line(prompt: String) -> Option<String> {
    tokio::task::spawn_blocking(move || {
        let mut editor = DefaultEditor::new().ok()?;
        editor.readline(&prompt).ok()
    })
    .await
    .ok()
    .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_marker_follows_terminal() {
        let workbench = ConsoleWorkbench::new(false, None);
        assert_eq!(workbench.prompt_marker(), None);

        let terminal = workbench.create_terminal("chat");
        terminal.write_prompt("AI> ");
        assert_eq!(workbench.prompt_marker(), Some("AI> ".to_string()));

        terminal.dispose();
        assert!(!terminal.is_open());
        assert_eq!(workbench.prompt_marker(), None);
    }

    #[test]
    fn selection_round_trip() {
        let workbench = ConsoleWorkbench::new(false, None);
        assert_eq!(workbench.active_editor(), None);
        workbench.set_selection(Some(EditorSelection::cursor_on("x + 1")));
        assert_eq!(
            workbench.active_editor(),
            Some(EditorSelection::cursor_on("x + 1"))
        );
    }

    #[test]
    fn style_respects_color() {
        assert_eq!(Style { use_color: false }.paint(ANSI_RED, "x"), "x");
        assert_eq!(
            Style { use_color: true }.paint(ANSI_RED, "x"),
            "\x1b[31mx\x1b[0m"
        );
    }
}
