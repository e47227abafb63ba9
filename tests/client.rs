//! Client behavior against a local fake of the generateContent endpoint.

mod common;

use std::time::Duration;

use common::{FakeServer, Reply};
use geminius::{Gemini, GeminiConfig, Generator};

fn client(server: &FakeServer) -> Gemini {
    Gemini::new(
        GeminiConfig::new()
            .with_api_key("test-key")
            .with_model("gemini-test")
            .with_base_url(&server.base_url),
    )
    .expect("client builds")
}

#[tokio::test]
async fn sends_one_post_with_prompt() {
    let server = FakeServer::start(Reply::text("Hello from Gemini")).await;
    let client = client(&server);

    let text = client.generate("Say hello").await.unwrap();
    assert_eq!(text, "Hello from Gemini");

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(
        request.request_line,
        "POST /v1beta/models/gemini-test:generateContent?key=test-key HTTP/1.1"
    );
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert_eq!(
        request.json(),
        serde_json::json!({
            "contents": [{"parts": [{"text": "Say hello"}]}],
            "generationConfig": {"temperature": 0.7}
        })
    );
}

#[tokio::test]
async fn explain_code_uses_configured_language() {
    let server = FakeServer::start(Reply::text("Es addiert.")).await;
    let client = Gemini::new(
        GeminiConfig::new()
            .with_api_key("k")
            .with_language("Deutsch")
            .with_base_url(&server.base_url),
    )
    .unwrap();

    client.explain_code("a + b").await.unwrap();
    let body = server.requests()[0].json();
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("explain it in Deutsch"));
    assert!(prompt.contains("```\na + b\n```"));
}

#[tokio::test]
async fn unauthorized_is_authentication_error() {
    let server = FakeServer::start(Reply::error(401, "API key not valid")).await;
    let err = client(&server).generate("hi").await.unwrap_err();
    assert!(err.is_authentication(), "{err:?}");
    assert!(err.to_string().contains("API key not valid"));
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn too_many_requests_is_rate_limit() {
    let server = FakeServer::start(
        Reply::error(429, "Resource has been exhausted").with_header("Retry-After", "7"),
    )
    .await;
    let err = client(&server).generate("hi").await.unwrap_err();
    assert!(err.is_rate_limit(), "{err:?}");
    assert!(err.to_string().contains("Resource has been exhausted"));
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn server_error_carries_status_and_message() {
    let server = FakeServer::start(Reply::error(500, "internal failure")).await;
    let err = client(&server).generate("hi").await.unwrap_err();
    assert!(err.is_request(), "{err:?}");
    assert_eq!(err.status_code(), Some(500));
    assert!(err.to_string().contains("internal failure"));
}

#[tokio::test]
async fn error_without_body_uses_reason() {
    let server = FakeServer::start(Reply {
        status: 503,
        headers: Vec::new(),
        body: String::new(),
        delay: None,
    })
    .await;
    let err = client(&server).generate("hi").await.unwrap_err();
    assert_eq!(err.status_code(), Some(503));
    assert!(err.to_string().contains("Service Unavailable"), "{err}");
}

#[tokio::test]
async fn no_candidates_is_empty_response() {
    let server = FakeServer::start(Reply::json(200, serde_json::json!({"candidates": []}))).await;
    let err = client(&server).generate("hi").await.unwrap_err();
    assert!(err.is_empty_response(), "{err:?}");
}

#[tokio::test]
async fn candidate_without_text_is_empty_response() {
    let server = FakeServer::start(Reply::json(
        200,
        serde_json::json!({"candidates": [{"content": {"parts": [{}]}}]}),
    ))
    .await;
    let err = client(&server).generate("hi").await.unwrap_err();
    assert!(err.is_empty_response(), "{err:?}");
}

#[tokio::test]
async fn slow_server_times_out() {
    let server =
        FakeServer::start(Reply::text("too late").delayed(Duration::from_secs(5))).await;
    let client = Gemini::new(
        GeminiConfig::new()
            .with_api_key("k")
            .with_base_url(&server.base_url)
            .with_timeout(Duration::from_millis(200)),
    )
    .unwrap();
    let err = client.generate("hi").await.unwrap_err();
    assert!(err.is_timeout(), "{err:?}");
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn missing_key_never_reaches_server() {
    let server = FakeServer::start(Reply::text("unused")).await;
    let client = Gemini::new(GeminiConfig::new().with_base_url(&server.base_url)).unwrap();
    let err = client.generate("hi").await.unwrap_err();
    assert!(err.is_config(), "{err:?}");
    assert_eq!(err.setting(), Some("api_key"));
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn error_messages_do_not_leak_key() {
    // Nothing listens on the discard port.
    let client = Gemini::new(
        GeminiConfig::new()
            .with_api_key("super-secret-key")
            .with_base_url("http://127.0.0.1:9/v1beta/models"),
    )
    .unwrap();
    let err = client.generate("hi").await.unwrap_err();
    assert!(err.is_request(), "{err:?}");
    assert!(!err.to_string().contains("super-secret-key"));
}

#[tokio::test]
async fn update_config_applies_to_next_request() {
    let server = FakeServer::start(Reply::text("ok")).await;
    let client = Gemini::new(GeminiConfig::new().with_base_url(&server.base_url)).unwrap();
    assert!(client.generate("hi").await.unwrap_err().is_config());

    client
        .update_config(
            GeminiConfig::new()
                .with_api_key("late-key")
                .with_model("gemini-1.5-pro")
                .with_base_url(&server.base_url),
        )
        .unwrap();
    assert_eq!(client.generate("hi").await.unwrap(), "ok");
    assert!(
        server.requests()[0]
            .request_line
            .contains("/gemini-1.5-pro:generateContent?key=late-key")
    );
}
