//! The chat terminal session.
//!
//! [`ChatTerminal`] owns at most one live session, bound to one host
//! terminal.  Each session carries its own [`SessionState`] and transcript;
//! replacing the session (after `exit` or after the user closes the
//! terminal) starts both from scratch.
//!
//! A session never has more than one generation request in flight.  The
//! flag is taken by an RAII guard before the request is sent and released
//! when the guard drops, whether the request succeeded, failed, or the
//! future was abandoned.  A dispatch that finds the flag taken is dropped
//! without redisplaying the prompt; the request already in flight does that
//! when it completes.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;

use crate::chat::commands::{BuiltinCommand, help_text, welcome_banner};
use crate::chat::selection::{display_lines, selected_code};
use crate::clean::clean;
use crate::client::Generator;
use crate::error::Result;
use crate::host::{OutputPanel, Severity, Terminal, Workbench};
use crate::observability::{
    SESSION_DROPPED_DISPATCHES, SESSION_DUPLICATE_RESPONSES, SESSION_LINES,
    SESSION_ORPHANED_RESPONSES, SESSIONS_CREATED,
};
use crate::utils::sync::lock;

/// Title of the chat terminal.
pub const TERMINAL_NAME: &str = "🤖 Gemini AI Assistant";

/// Marker written when the session is ready for the next line.
pub const PROMPT_MARKER: &str = "🤖 AI> ";

/// After an answer is displayed, further display attempts are dropped for
/// this long.
pub const RESPONSE_COOLDOWN: Duration = Duration::from_millis(100);

const SEPARATOR: &str = "----------------------------------------";
const PANEL_HEADER: &str = "🤖 Gemini AI assistant answer:";
const PANEL_RULE_WIDTH: usize = 50;

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The person at the keyboard.
    User,
    /// The model.
    Assistant,
}

/// One entry of a session transcript.
///
/// Transcripts are kept for the user's benefit only; requests always carry
/// just the latest prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    /// Who said it.
    pub role: Role,
    /// What was said.
    pub content: String,
}

impl ConversationTurn {
    /// A user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// An assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Mutable per-session flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// The prompt marker is showing and the next line will be accepted.
    pub awaiting_input: bool,
    /// A generation request has been sent and not yet handled.
    pub request_in_flight: bool,
    /// The cleaned text of the last answer shown.
    pub last_displayed_response: String,
    cooldown_until: Option<Instant>,
}

/// Where the chat terminal is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No live session.
    Closed,
    /// A session is bound to an open terminal.
    Active {
        /// Whether the next submitted line will be accepted.
        awaiting_input: bool,
    },
}

struct Session {
    terminal: Arc<dyn Terminal>,
    state: Mutex<SessionState>,
    transcript: Mutex<Vec<ConversationTurn>>,
}

impl Session {
    fn new(terminal: Arc<dyn Terminal>) -> Self {
        Self {
            terminal,
            state: Mutex::new(SessionState::default()),
            transcript: Mutex::new(Vec::new()),
        }
    }

    fn write_line(&self, line: &str) {
        self.terminal.write_line(line);
    }

    fn show_prompt(&self) {
        self.terminal.write_prompt(PROMPT_MARKER);
        lock(&self.state).awaiting_input = true;
    }

    fn echo_code(&self, code: &str) {
        self.write_line(SEPARATOR);
        for line in display_lines(code) {
            self.write_line(&line);
        }
        self.write_line(SEPARATOR);
    }
}

/// Holds a session's in-flight flag until dropped.
struct InFlightGuard<'a> {
    session: &'a Session,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(session: &'a Session) -> Option<Self> {
        let mut state = lock(&session.state);
        if state.request_in_flight {
            return None;
        }
        state.request_in_flight = true;
        Some(Self { session })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        lock(&self.session.state).request_in_flight = false;
    }
}

enum Request {
    Chat(String),
    Explain(String),
    AskAboutCode { code: String, question: String },
}

impl Request {
    async fn send(&self, generator: &dyn Generator) -> Result<String> {
        match self {
            Request::Chat(prompt) => generator.generate(prompt).await,
            Request::Explain(code) => generator.explain_code(code).await,
            Request::AskAboutCode { code, question } => {
                generator.ask_about_code(code, question).await
            }
        }
    }

    fn user_turn(&self) -> Option<String> {
        match self {
            Request::Chat(prompt) => Some(prompt.clone()),
            Request::Explain(_) => None,
            Request::AskAboutCode { question, .. } => {
                Some(format!("Question about code: {question}"))
            }
        }
    }
}

/// The chat terminal and its session state machine.
pub struct ChatTerminal {
    generator: Arc<dyn Generator>,
    workbench: Arc<dyn Workbench>,
    output: Arc<dyn OutputPanel>,
    current: Mutex<Option<Arc<Session>>>,
}

impl ChatTerminal {
    /// Creates a chat terminal with no session yet.
    pub fn new(generator: Arc<dyn Generator>, workbench: Arc<dyn Workbench>) -> Self {
        let output = workbench.output_panel();
        Self {
            generator,
            workbench,
            output,
            current: Mutex::new(None),
        }
    }

    /// Opens a session, or brings the live one to the foreground.
    pub fn create_session(&self) {
        self.open_session();
    }

    fn open_session(&self) -> Arc<Session> {
        // Never call into the host while `current` is locked.
        let existing = lock(&self.current).clone();
        if let Some(session) = existing
            && session.terminal.is_open()
        {
            session.terminal.show();
            return session;
        }
        let session = Arc::new(Session::new(self.workbench.create_terminal(TERMINAL_NAME)));
        let stale = lock(&self.current).replace(Arc::clone(&session));
        if let Some(stale) = stale {
            stale.terminal.dispose();
        }

        SESSIONS_CREATED.click();
        tracing::info!("chat session created");
        session.terminal.show();
        session.terminal.clear();
        for line in welcome_banner() {
            session.write_line(line);
        }
        session.show_prompt();
        session
    }

    fn live_session(&self) -> Option<Arc<Session>> {
        let current = lock(&self.current).clone();
        current.filter(|session| session.terminal.is_open())
    }

    fn is_current(&self, session: &Arc<Session>) -> bool {
        let same = lock(&self.current)
            .as_ref()
            .is_some_and(|live| Arc::ptr_eq(live, session));
        same && session.terminal.is_open()
    }

    fn close(&self, session: &Arc<Session>) {
        lock(&session.state).awaiting_input = false;
        session.terminal.dispose();
        let mut current = lock(&self.current);
        if current
            .as_ref()
            .is_some_and(|live| Arc::ptr_eq(live, session))
        {
            *current = None;
        }
        tracing::info!("chat session closed");
    }

    /// The lifecycle state of the chat terminal.
    pub fn status(&self) -> SessionStatus {
        match self.live_session() {
            Some(session) => SessionStatus::Active {
                awaiting_input: lock(&session.state).awaiting_input,
            },
            None => SessionStatus::Closed,
        }
    }

    /// A snapshot of the live session's flags.
    pub fn state(&self) -> Option<SessionState> {
        self.live_session()
            .map(|session| lock(&session.state).clone())
    }

    /// A copy of the live session's transcript.
    pub fn transcript(&self) -> Vec<ConversationTurn> {
        self.live_session()
            .map(|session| lock(&session.transcript).clone())
            .unwrap_or_default()
    }

    /// Handles one line typed into the terminal.
    ///
    /// Ignored unless the session is waiting for input.
    pub async fn submit_line(&self, text: &str) {
        let Some(session) = self.live_session() else {
            return;
        };
        {
            let mut state = lock(&session.state);
            if !state.awaiting_input {
                return;
            }
            state.awaiting_input = false;
        }
        SESSION_LINES.click();

        let line = text.trim();
        if line.is_empty() {
            session.show_prompt();
            return;
        }
        match BuiltinCommand::parse(line) {
            Some(BuiltinCommand::Help) => {
                write_help(&session);
                session.show_prompt();
            }
            Some(BuiltinCommand::Clear) => {
                lock(&session.transcript).clear();
                session.terminal.clear();
                session.write_line("🧹 Conversation history cleared!");
                session.show_prompt();
            }
            Some(BuiltinCommand::Exit) => {
                session.write_line("👋 Goodbye! The AI assistant has exited.");
                self.close(&session);
            }
            None => {
                session.write_line(&format!("👤 You: {line}"));
                session.write_line("🤔 AI is thinking...");
                self.dispatch(&session, Request::Chat(line.to_string()))
                    .await;
            }
        }
    }

    /// Writes the help text to the live session and redisplays the prompt.
    pub fn show_help(&self) {
        if let Some(session) = self.live_session() {
            write_help(&session);
            session.show_prompt();
        }
    }

    /// The code the user is pointing at, warning through the host when
    /// there is none.
    pub async fn selected_code(&self) -> Option<String> {
        let Some(selection) = self.workbench.active_editor() else {
            self.workbench
                .notify(
                    Severity::Warning,
                    "Open a file and select the code to analyze first",
                    &[],
                )
                .await;
            return None;
        };
        let code = selected_code(&selection);
        if code.is_none() {
            self.workbench
                .notify(
                    Severity::Warning,
                    "The current line is empty; select the code to analyze",
                    &[],
                )
                .await;
        }
        code
    }

    /// Explains the selected code (or the current line).
    pub async fn analyze_selection(&self) {
        let Some(code) = self.selected_code().await else {
            return;
        };
        let session = self.open_session();
        session.write_line("📝 Analyzing the following code:");
        session.echo_code(&code);
        session.write_line("🤔 AI is analyzing...");
        self.dispatch(&session, Request::Explain(code)).await;
    }

    /// Answers `question` about the selected code (or the current line).
    pub async fn answer_about_selection(&self, question: &str) {
        let Some(code) = self.selected_code().await else {
            return;
        };
        self.answer_about_code(code, question).await;
    }

    /// Asks `question` about `code` captured earlier by the caller.
    pub async fn answer_about_code(&self, code: String, question: &str) {
        let session = self.open_session();
        session.write_line("📝 Question about code:");
        session.write_line(&format!("❓ {question}"));
        session.write_line("📄 Code:");
        session.echo_code(&code);
        session.write_line("🤔 AI is analyzing...");
        let request = Request::AskAboutCode {
            code,
            question: question.to_string(),
        };
        self.dispatch(&session, request).await;
    }

    async fn dispatch(&self, session: &Arc<Session>, request: Request) {
        let Some(guard) = InFlightGuard::acquire(session) else {
            SESSION_DROPPED_DISPATCHES.click();
            tracing::debug!("a request is already in flight; dropping dispatch");
            return;
        };
        let result = request.send(self.generator.as_ref()).await;

        if !self.is_current(session) {
            SESSION_ORPHANED_RESPONSES.click();
            tracing::debug!("session closed while its request was in flight");
            return;
        }
        match result {
            Ok(response) => {
                if let Some(user) = request.user_turn() {
                    let mut transcript = lock(&session.transcript);
                    transcript.push(ConversationTurn::user(user));
                    transcript.push(ConversationTurn::assistant(response.clone()));
                }
                self.display_response(session, &response);
            }
            Err(err) => {
                session.write_line(&format!("❌ Error: {err}"));
            }
        }
        drop(guard);
        session.show_prompt();
    }

    // Returns false when the answer was suppressed as a duplicate delivery.
    fn display_response(&self, session: &Session, raw: &str) -> bool {
        let cleaned = clean(raw);
        {
            let mut state = lock(&session.state);
            let now = Instant::now();
            if state.cooldown_until.is_some_and(|until| now < until) {
                SESSION_DUPLICATE_RESPONSES.click();
                return false;
            }
            if cleaned == state.last_displayed_response {
                state.cooldown_until = None;
                SESSION_DUPLICATE_RESPONSES.click();
                tracing::debug!("suppressing repeated answer");
                return false;
            }
            state.last_displayed_response = cleaned.clone();
            state.cooldown_until = Some(now + RESPONSE_COOLDOWN);
        }

        let rule = "=".repeat(PANEL_RULE_WIDTH);
        self.output.clear();
        self.output.append_line(PANEL_HEADER);
        self.output.append_line(&rule);
        self.output.append_line(&cleaned);
        self.output.append_line(&rule);
        self.output.show(true);
        session.write_line("🤖 The answer is shown in the output panel.");
        true
    }

    /// Closes the live session, if any.
    pub fn dispose(&self) {
        let session = lock(&self.current).take();
        if let Some(session) = session {
            session.terminal.dispose();
        }
    }
}

fn write_help(session: &Session) {
    for line in help_text() {
        session.write_line(line);
    }
}
