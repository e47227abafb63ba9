//! Host command dispatch.
//!
//! [`Assistant`] is what a host wires its commands to.  Every command first
//! checks that the generator has an API key; without one the user is warned
//! and offered the settings, and nothing else happens.

use std::sync::Arc;

use crate::chat::ChatTerminal;
use crate::client::{Gemini, Generator};
use crate::config::{API_KEY_SETTING, GeminiConfig};
use crate::error::Result;
use crate::host::{InputRequest, Severity, StatusItem, Workbench};

/// Action offered when the API key is missing.
pub const OPEN_SETTINGS: &str = "Open Settings";

const ACTION_ASK: &str = "💬 Ask";
const ACTION_ANALYZE: &str = "📝 Analyze Code";
const ACTION_HELP: &str = "📚 Help";

/// A command the host can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    /// Open the chat session and offer the quick actions.
    StartChat,
    /// Ask a free-form question.
    AskQuestion,
    /// Explain the selected code.
    AnalyzeSelection,
    /// Ask a question about the selected code.
    AskAboutSelection,
}

impl HostCommand {
    /// Every command, in registration order.
    pub const ALL: [HostCommand; 4] = [
        HostCommand::StartChat,
        HostCommand::AskQuestion,
        HostCommand::AnalyzeSelection,
        HostCommand::AskAboutSelection,
    ];

    /// The identifier the host registers the command under.
    pub fn id(self) -> &'static str {
        match self {
            HostCommand::StartChat => "geminius.startChat",
            HostCommand::AskQuestion => "geminius.askQuestion",
            HostCommand::AnalyzeSelection => "geminius.analyzeCode",
            HostCommand::AskAboutSelection => "geminius.askAboutCode",
        }
    }

    /// Looks a command up by identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.id() == id)
    }
}

/// Dispatches host commands to the chat terminal.
pub struct Assistant<G: Generator + 'static> {
    generator: Arc<G>,
    workbench: Arc<dyn Workbench>,
    terminal: ChatTerminal,
}

impl<G: Generator + 'static> Assistant<G> {
    /// Creates an assistant; nothing is shown until [`Assistant::activate`].
    pub fn new(generator: Arc<G>, workbench: Arc<dyn Workbench>) -> Self {
        let terminal = ChatTerminal::new(generator.clone(), Arc::clone(&workbench));
        Self {
            generator,
            workbench,
            terminal,
        }
    }

    /// The chat terminal commands are routed to.
    pub fn terminal(&self) -> &ChatTerminal {
        &self.terminal
    }

    /// The status bar entry installed by [`Assistant::activate`].
    pub fn status_item() -> StatusItem {
        StatusItem {
            text: "$(robot) Gemini AI".to_string(),
            tooltip: "Start the Gemini AI assistant".to_string(),
            command: HostCommand::StartChat.id().to_string(),
        }
    }

    /// Installs the status item and announces readiness.
    pub async fn activate(&self) {
        self.workbench.set_status(&Self::status_item());
        tracing::info!("assistant activated");
        self.workbench
            .notify(Severity::Info, "🤖 Gemini AI assistant is ready!", &[])
            .await;
    }

    /// Releases the chat session.
    pub fn deactivate(&self) {
        self.terminal.dispose();
        tracing::info!("assistant deactivated");
    }

    /// Returns true if an API key is configured, warning the user otherwise.
    pub async fn ensure_configured(&self) -> bool {
        if self.generator.is_configured() {
            return true;
        }
        let choice = self
            .workbench
            .notify(
                Severity::Warning,
                "Please configure your Gemini API key first",
                &[OPEN_SETTINGS],
            )
            .await;
        if choice.as_deref() == Some(OPEN_SETTINGS) {
            self.workbench.open_settings(API_KEY_SETTING);
        }
        false
    }

    /// Runs a host command.
    pub async fn execute(&self, command: HostCommand) {
        tracing::debug!(command = command.id(), "executing command");
        if !self.ensure_configured().await {
            return;
        }
        match command {
            HostCommand::StartChat => self.start_chat().await,
            HostCommand::AskQuestion => self.ask(None).await,
            HostCommand::AnalyzeSelection => self.terminal.analyze_selection().await,
            HostCommand::AskAboutSelection => self.ask_about_selection().await,
        }
    }

    /// Asks `question`, or prompts for one when `None`.
    ///
    /// The question goes through the chat terminal like a typed line.
    pub async fn ask_question(&self, question: Option<String>) {
        if self.ensure_configured().await {
            self.ask(question).await;
        }
    }

    async fn start_chat(&self) {
        self.terminal.create_session();
        let choice = self
            .workbench
            .notify(
                Severity::Info,
                "🤖 Gemini AI assistant is running! Choose how to interact:",
                &[ACTION_ASK, ACTION_ANALYZE, ACTION_HELP],
            )
            .await;
        match choice.as_deref() {
            Some(ACTION_ASK) => self.ask(None).await,
            Some(ACTION_ANALYZE) => self.ask_about_selection().await,
            Some(ACTION_HELP) => self.terminal.show_help(),
            _ => {}
        }
    }

    async fn ask(&self, question: Option<String>) {
        self.terminal.create_session();
        let question = match question {
            Some(question) => Some(question),
            None => {
                self.workbench
                    .input_box(InputRequest::new(
                        "🤖 Enter your question",
                        "e.g. How can I optimize this code?",
                    ))
                    .await
            }
        };
        if let Some(question) = question.filter(|q| !q.trim().is_empty()) {
            self.terminal.submit_line(&question).await;
        }
    }

    async fn ask_about_selection(&self) {
        let Some(code) = self.terminal.selected_code().await else {
            return;
        };
        let question = self
            .workbench
            .input_box(InputRequest::new(
                "🤖 What would you like to know about the selected code?",
                "e.g. What does this code do? How can it be optimized?",
            ))
            .await;
        if let Some(question) = question.filter(|q| !q.trim().is_empty()) {
            self.terminal.answer_about_code(code, question.trim()).await;
        }
    }
}

impl Assistant<Gemini> {
    /// Replaces the client configuration; used when settings change.
    pub fn refresh_config(&self, config: GeminiConfig) -> Result<()> {
        self.generator.update_config(config)
    }

    /// The configuration currently in use.
    pub fn config(&self) -> GeminiConfig {
        self.generator.config()
    }
}
