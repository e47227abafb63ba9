//! An in-memory host.
//!
//! [`MemoryWorkbench`] records everything written to it and answers
//! notifications and input boxes from scripted queues, so sessions can be
//! driven and inspected without a real UI.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::host::{
    EditorSelection, InputRequest, OutputPanel, Severity, StatusItem, Terminal, Workbench,
};
use crate::utils::sync::lock;

/// One thing that happened to a [`MemoryTerminal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    /// The terminal was brought to the foreground.
    Show,
    /// A line was written.
    Line(String),
    /// The prompt marker was written.
    Prompt(String),
    /// The view was cleared.
    Clear,
    /// The terminal was disposed.
    Dispose,
}

/// A terminal that records its events.
#[derive(Debug)]
pub struct MemoryTerminal {
    name: String,
    open: AtomicBool,
    events: Mutex<Vec<TerminalEvent>>,
}

impl MemoryTerminal {
    /// Creates an open terminal.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            open: AtomicBool::new(true),
            events: Mutex::new(Vec::new()),
        }
    }

    /// The title the terminal was created with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every recorded event, in order.
    pub fn events(&self) -> Vec<TerminalEvent> {
        lock(&self.events).clone()
    }

    /// Every line written, in order.
    pub fn lines(&self) -> Vec<String> {
        lock(&self.events)
            .iter()
            .filter_map(|event| match event {
                TerminalEvent::Line(line) => Some(line.clone()),
                _ => None,
            })
            .collect()
    }

    /// How many times the prompt marker was written.
    pub fn prompt_count(&self) -> usize {
        lock(&self.events)
            .iter()
            .filter(|event| matches!(event, TerminalEvent::Prompt(_)))
            .count()
    }

    /// True if any written line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }

    /// Simulates the user closing the terminal from the host UI.
    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
    }

    fn record(&self, event: TerminalEvent) {
        lock(&self.events).push(event);
    }
}

impl Terminal for MemoryTerminal {
    fn show(&self) {
        self.record(TerminalEvent::Show);
    }

    fn write_line(&self, line: &str) {
        self.record(TerminalEvent::Line(line.to_string()));
    }

    fn write_prompt(&self, marker: &str) {
        self.record(TerminalEvent::Prompt(marker.to_string()));
    }

    fn clear(&self) {
        self.record(TerminalEvent::Clear);
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    fn dispose(&self) {
        self.open.store(false, Ordering::SeqCst);
        self.record(TerminalEvent::Dispose);
    }
}

/// One thing that happened to a [`MemoryOutputPanel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    /// The panel was cleared.
    Clear,
    /// A line was appended.
    Line(String),
    /// The panel was revealed.
    Show {
        /// Whether focus stayed in the editor.
        preserve_focus: bool,
    },
}

/// An output panel that records its events.
#[derive(Debug, Default)]
pub struct MemoryOutputPanel {
    events: Mutex<Vec<PanelEvent>>,
}

impl MemoryOutputPanel {
    /// Every recorded event, in order.
    pub fn events(&self) -> Vec<PanelEvent> {
        lock(&self.events).clone()
    }

    /// The lines appended since the last clear.
    pub fn contents(&self) -> Vec<String> {
        let events = lock(&self.events);
        let start = events
            .iter()
            .rposition(|event| *event == PanelEvent::Clear)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        events[start..]
            .iter()
            .filter_map(|event| match event {
                PanelEvent::Line(line) => Some(line.clone()),
                _ => None,
            })
            .collect()
    }

    /// How many times the panel was revealed; one per displayed answer.
    pub fn display_count(&self) -> usize {
        lock(&self.events)
            .iter()
            .filter(|event| matches!(event, PanelEvent::Show { .. }))
            .count()
    }
}

impl OutputPanel for MemoryOutputPanel {
    fn clear(&self) {
        lock(&self.events).push(PanelEvent::Clear);
    }

    fn append_line(&self, line: &str) {
        lock(&self.events).push(PanelEvent::Line(line.to_string()));
    }

    fn show(&self, preserve_focus: bool) {
        lock(&self.events).push(PanelEvent::Show { preserve_focus });
    }
}

/// A notification shown through [`MemoryWorkbench::notify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// How it was presented.
    pub severity: Severity,
    /// The message text.
    pub message: String,
    /// The offered actions.
    pub actions: Vec<String>,
}

/// A workbench that records everything and replays scripted answers.
#[derive(Debug, Default)]
pub struct MemoryWorkbench {
    terminals: Mutex<Vec<Arc<MemoryTerminal>>>,
    panel: Arc<MemoryOutputPanel>,
    notifications: Mutex<Vec<Notification>>,
    notification_replies: Mutex<VecDeque<Option<String>>>,
    input_requests: Mutex<Vec<InputRequest>>,
    input_replies: Mutex<VecDeque<Option<String>>>,
    editor: Mutex<Option<EditorSelection>>,
    status: Mutex<Option<StatusItem>>,
    opened_settings: Mutex<Vec<String>>,
}

impl MemoryWorkbench {
    /// Creates an empty workbench with no editor open.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the action chosen for the next notification (`None` = dismissed).
    pub fn push_notification_reply(&self, reply: Option<&str>) {
        lock(&self.notification_replies).push_back(reply.map(String::from));
    }

    /// Queue the text entered in the next input box (`None` = dismissed).
    pub fn push_input_reply(&self, reply: Option<&str>) {
        lock(&self.input_replies).push_back(reply.map(String::from));
    }

    /// Set what the active editor reports; `None` closes the editor.
    pub fn set_editor(&self, selection: Option<EditorSelection>) {
        *lock(&self.editor) = selection;
    }

    /// Every terminal created so far, oldest first.
    pub fn terminals(&self) -> Vec<Arc<MemoryTerminal>> {
        lock(&self.terminals).clone()
    }

    /// The most recently created terminal.
    pub fn last_terminal(&self) -> Option<Arc<MemoryTerminal>> {
        lock(&self.terminals).last().cloned()
    }

    /// The shared output panel.
    pub fn panel(&self) -> Arc<MemoryOutputPanel> {
        Arc::clone(&self.panel)
    }

    /// Every notification shown so far.
    pub fn notifications(&self) -> Vec<Notification> {
        lock(&self.notifications).clone()
    }

    /// Notifications of one severity.
    pub fn notifications_of(&self, severity: Severity) -> Vec<Notification> {
        self.notifications()
            .into_iter()
            .filter(|n| n.severity == severity)
            .collect()
    }

    /// Every input box shown so far.
    pub fn input_requests(&self) -> Vec<InputRequest> {
        lock(&self.input_requests).clone()
    }

    /// The current status bar item.
    pub fn status(&self) -> Option<StatusItem> {
        lock(&self.status).clone()
    }

    /// Settings the user was sent to.
    pub fn opened_settings(&self) -> Vec<String> {
        lock(&self.opened_settings).clone()
    }
}

#[async_trait::async_trait]
impl Workbench for MemoryWorkbench {
    fn create_terminal(&self, name: &str) -> Arc<dyn Terminal> {
        let terminal = Arc::new(MemoryTerminal::new(name));
        lock(&self.terminals).push(Arc::clone(&terminal));
        terminal
    }

    fn output_panel(&self) -> Arc<dyn OutputPanel> {
        self.panel()
    }

    async fn notify(&self, severity: Severity, message: &str, actions: &[&str]) -> Option<String> {
        lock(&self.notifications).push(Notification {
            severity,
            message: message.to_string(),
            actions: actions.iter().map(|a| a.to_string()).collect(),
        });
        if actions.is_empty() {
            return None;
        }
        lock(&self.notification_replies).pop_front().flatten()
    }

    async fn input_box(&self, request: InputRequest) -> Option<String> {
        lock(&self.input_requests).push(request);
        lock(&self.input_replies).pop_front().flatten()
    }

    fn active_editor(&self) -> Option<EditorSelection> {
        lock(&self.editor).clone()
    }

    fn set_status(&self, item: &StatusItem) {
        *lock(&self.status) = Some(item.clone());
    }

    fn open_settings(&self, setting: &str) {
        lock(&self.opened_settings).push(setting.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_records_and_closes() {
        let terminal = MemoryTerminal::new("test");
        terminal.write_line("hello");
        terminal.write_prompt("> ");
        assert_eq!(terminal.lines(), vec!["hello".to_string()]);
        assert_eq!(terminal.prompt_count(), 1);
        assert!(terminal.is_open());
        terminal.close();
        assert!(!terminal.is_open());
    }

    #[test]
    fn panel_contents_since_clear() {
        let panel = MemoryOutputPanel::default();
        panel.append_line("old");
        panel.clear();
        panel.append_line("new");
        panel.show(true);
        assert_eq!(panel.contents(), vec!["new".to_string()]);
        assert_eq!(panel.display_count(), 1);
    }

    #[tokio::test]
    async fn scripted_replies() {
        let workbench = MemoryWorkbench::new();
        workbench.push_notification_reply(Some("Open Settings"));
        workbench.push_input_reply(Some("why?"));

        // No actions: nothing to choose, the reply queue is left alone.
        assert_eq!(workbench.notify(Severity::Info, "hi", &[]).await, None);
        assert_eq!(
            workbench
                .notify(Severity::Warning, "no key", &["Open Settings"])
                .await,
            Some("Open Settings".to_string())
        );
        assert_eq!(
            workbench.input_box(InputRequest::new("Ask", "")).await,
            Some("why?".to_string())
        );
        assert_eq!(workbench.input_box(InputRequest::new("Ask", "")).await, None);
        assert_eq!(workbench.notifications().len(), 2);
    }
}
