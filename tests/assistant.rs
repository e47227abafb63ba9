//! The assistant wired to a real client and an in-memory host.

mod common;

use std::sync::Arc;

use common::{FakeServer, Reply};
use geminius::chat::{ConversationTurn, SessionStatus};
use geminius::host::memory::MemoryWorkbench;
use geminius::host::{EditorSelection, Severity};
use geminius::{Assistant, Gemini, GeminiConfig, HostCommand};

fn assistant(base_url: &str, api_key: &str) -> (Assistant<Gemini>, Arc<MemoryWorkbench>) {
    let client = Gemini::new(
        GeminiConfig::new()
            .with_api_key(api_key)
            .with_base_url(base_url),
    )
    .unwrap();
    let workbench = Arc::new(MemoryWorkbench::new());
    let assistant = Assistant::new(Arc::new(client), workbench.clone());
    (assistant, workbench)
}

#[tokio::test]
async fn question_round_trip() {
    let server = FakeServer::start(Reply::text("**Lifetimes** name how long `refs` live.")).await;
    let (assistant, workbench) = assistant(&server.base_url, "k");
    workbench.push_input_reply(Some("What is a lifetime?"));

    assistant.execute(HostCommand::AskQuestion).await;

    assert_eq!(server.requests().len(), 1);
    assert_eq!(
        workbench.panel().contents()[2],
        "Lifetimes name how long 'refs' live."
    );
    assert_eq!(
        assistant.terminal().transcript(),
        vec![
            ConversationTurn::user("What is a lifetime?"),
            ConversationTurn::assistant("**Lifetimes** name how long `refs` live."),
        ]
    );
    assert_eq!(
        assistant.terminal().status(),
        SessionStatus::Active {
            awaiting_input: true
        }
    );
}

#[tokio::test]
async fn api_failure_is_shown_in_terminal() {
    let server = FakeServer::start(Reply::error(401, "API key not valid")).await;
    let (assistant, workbench) = assistant(&server.base_url, "bad-key");
    workbench.set_editor(Some(EditorSelection::cursor_on("let z = 3;")));

    assistant.execute(HostCommand::AnalyzeSelection).await;

    let terminal = workbench.last_terminal().unwrap();
    assert!(terminal.contains("❌ Error: Authentication error: API key not valid"));
    assert_eq!(workbench.panel().display_count(), 0);
    assert!(!assistant.terminal().state().unwrap().request_in_flight);
}

#[tokio::test]
async fn refreshed_key_unblocks_commands() {
    let server = FakeServer::start(Reply::text("Fine.")).await;
    let (assistant, workbench) = assistant(&server.base_url, "");
    workbench.push_notification_reply(None);

    assistant.execute(HostCommand::StartChat).await;
    assert_eq!(workbench.notifications_of(Severity::Warning).len(), 1);
    assert!(workbench.terminals().is_empty());

    assistant
        .refresh_config(
            GeminiConfig::new()
                .with_api_key("now-set")
                .with_base_url(&server.base_url),
        )
        .unwrap();
    assistant
        .ask_question(Some("How are you?".to_string()))
        .await;
    assert_eq!(server.requests().len(), 1);
    assert_eq!(workbench.panel().display_count(), 1);
}
