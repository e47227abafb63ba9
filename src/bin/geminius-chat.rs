//! Interactive Gemini assistant on the console.
//!
//! # Usage
//!
//! ```bash
//! # Read ~/.config/geminius/config.yaml and GEMINI_API_KEY
//! geminius-chat
//!
//! # Use another config file, model and answer language
//! geminius-chat --config ./geminius.yaml --model gemini-1.5-pro --language Deutsch
//!
//! # Disable colors (useful for piping output)
//! geminius-chat --no-color
//! ```
//!
//! Lines typed at the `🤖 AI>` prompt go to the chat terminal (`help`,
//! `clear` and `exit` included).  Slash commands stand in for the editor
//! commands:
//! - `/start` - Open the chat session and pick an action
//! - `/ask [question]` - Ask a question
//! - `/analyze <file>[:start[-end]]` - Explain code from a file
//! - `/ask-code <file>[:start[-end]]` - Ask about code from a file
//! - `/reload` - Re-read the configuration
//! - `/config` - Show the configuration
//! - `/quit` - Exit the application
//!
//! Set `GEMINIUS_LOG_LEVEL` (e.g. `debug`) to see logs on stderr.

use std::sync::Arc;

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use geminius::chat::{
    ChatArgs, ChatCommand, SelectionSpec, SessionStatus, frontend_help_text, parse_command,
};
use geminius::host::console::ConsoleWorkbench;
use geminius::host::{Severity, Workbench};
use geminius::{Assistant, Gemini, HostCommand};

/// Prompt shown when no chat session is open.
const IDLE_PROMPT: &str = "geminius> ";

fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let filter = tracing_subscriber::EnvFilter::from_env("GEMINIUS_LOG_LEVEL")
        .add_directive("reqwest=warn".parse()?)
        .add_directive("hyper=warn".parse()?);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    Ok(())
}

/// Main entry point for the geminius-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;
    let (args, _) = ChatArgs::from_command_line_relaxed("geminius-chat [OPTIONS]");
    let loader = args.loader();
    let config = loader.load()?;

    let client = Arc::new(Gemini::new(config)?);
    let workbench = Arc::new(ConsoleWorkbench::new(
        args.use_color(),
        loader.path().map(|p| p.to_path_buf()),
    ));
    let assistant = Assistant::new(client, workbench.clone());
    let mut rl = DefaultEditor::new()?;

    println!("Gemini assistant (model: {})", assistant.config().model);
    println!("Type /help for commands, /quit to exit\n");
    assistant.activate().await;
    if assistant.ensure_configured().await {
        assistant.terminal().create_session();
    }

    loop {
        let prompt = workbench
            .prompt_marker()
            .unwrap_or_else(|| IDLE_PROMPT.to_string());

        match rl.readline(&prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.as_str());
                }

                // Check for slash commands
                let Some(cmd) = parse_command(&line) else {
                    if assistant.terminal().status() == SessionStatus::Closed {
                        if !line.trim().is_empty() {
                            println!("No chat session is open; type /start to open one.");
                        }
                    } else {
                        assistant.terminal().submit_line(&line).await;
                    }
                    continue;
                };
                match cmd {
                    ChatCommand::Start => assistant.execute(HostCommand::StartChat).await,
                    ChatCommand::Ask(question) => assistant.ask_question(question).await,
                    ChatCommand::Analyze(spec) => {
                        if select(&workbench, &spec).await {
                            assistant.execute(HostCommand::AnalyzeSelection).await;
                        }
                    }
                    ChatCommand::AskCode(spec) => {
                        if select(&workbench, &spec).await {
                            assistant.execute(HostCommand::AskAboutSelection).await;
                        }
                    }
                    ChatCommand::Reload => {
                        match loader.load().and_then(|config| assistant.refresh_config(config)) {
                            Ok(()) => println!(
                                "Configuration reloaded (model: {})",
                                assistant.config().model
                            ),
                            Err(err) => {
                                workbench
                                    .notify(Severity::Error, &format!("Reload failed: {err}"), &[])
                                    .await;
                            }
                        }
                    }
                    ChatCommand::ShowConfig => {
                        println!("{:#?}", assistant.config());
                        if let Some(path) = loader.path() {
                            println!("config file: {}", path.display());
                        }
                    }
                    ChatCommand::Help => {
                        for line in frontend_help_text().lines() {
                            println!("    {line}");
                        }
                    }
                    ChatCommand::Quit => {
                        println!("Goodbye!");
                        break;
                    }
                    ChatCommand::Invalid(msg) => {
                        eprintln!("Error: {msg}");
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("Error: {err}");
                break;
            }
        }
    }

    assistant.deactivate();
    Ok(())
}

/// Loads `spec` into the console's editor selection.
async fn select(workbench: &ConsoleWorkbench, spec: &SelectionSpec) -> bool {
    match spec.load() {
        Ok(selection) => {
            workbench.set_selection(Some(selection));
            true
        }
        Err(err) => {
            workbench
                .notify(Severity::Error, &format!("Code analysis failed: {err}"), &[])
                .await;
            false
        }
    }
}
