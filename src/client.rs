use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response};
use url::Url;

use crate::config::GeminiConfig;
use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUESTS, CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS};
use crate::prompts;
use crate::types::{ErrorBody, GenerateContentRequest, GenerateContentResponse};

/// Something that turns a prompt into generated text.
///
/// The chat session talks to the model only through this trait, so tests can
/// substitute a scripted generator for [`Gemini`].
#[async_trait::async_trait]
pub trait Generator: Send + Sync {
    /// Generate a response for a single prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// The language template prompts ask the model to answer in.
    fn response_language(&self) -> String {
        crate::config::DEFAULT_LANGUAGE.to_string()
    }

    /// True when the generator has the credentials it needs.
    fn is_configured(&self) -> bool {
        true
    }

    /// Ask a question about a block of code.
    async fn ask_about_code(&self, code: &str, question: &str) -> Result<String> {
        let prompt = prompts::ask_about_code(code, question, &self.response_language());
        self.generate(&prompt).await
    }

    /// Ask for a concise explanation of a block of code.
    async fn explain_code(&self, code: &str) -> Result<String> {
        let prompt = prompts::explain_code(code, &self.response_language());
        self.generate(&prompt).await
    }
}

/// Client for the Gemini `generateContent` API.
///
/// The configuration is cached behind a lock so that [`Gemini::update_config`]
/// can refresh it in place while sessions hold a shared reference.
#[derive(Debug)]
pub struct Gemini {
    inner: RwLock<Inner>,
}

#[derive(Debug, Clone)]
struct Inner {
    config: GeminiConfig,
    client: ReqwestClient,
}

impl Gemini {
    /// Create a new client.  An empty API key is accepted here; it is
    /// reported as a configuration error when a request is attempted.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = build_http_client(config.timeout())?;
        Ok(Self {
            inner: RwLock::new(Inner { config, client }),
        })
    }

    /// A snapshot of the current configuration.
    pub fn config(&self) -> GeminiConfig {
        self.snapshot().config
    }

    /// Replace the cached configuration.
    ///
    /// The HTTP client is rebuilt only when the timeout changes.
    pub fn update_config(&self, config: GeminiConfig) -> Result<()> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if inner.config.timeout() != config.timeout() {
            inner.client = build_http_client(config.timeout())?;
        }
        tracing::info!(model = %config.model, configured = config.has_api_key(), "configuration refreshed");
        inner.config = config;
        Ok(())
    }

    fn snapshot(&self) -> Inner {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Create and return default headers for API requests.
    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// Process API response errors and convert to our Error type
    async fn process_error_response(response: Response) -> Error {
        let status = response.status();
        let status_code = status.as_u16();

        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|val| val.to_str().ok())
            .and_then(|val| val.parse::<u64>().ok());

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::request(
                    format!("failed to read error response: {e}"),
                    Some(status_code),
                    Some(Box::new(e)),
                );
            }
        };
        let error_message = ErrorBody::message_from(&error_body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .map(String::from)
                .unwrap_or_else(|| format!("HTTP {status_code}"))
        });

        match status_code {
            401 => Error::authentication(error_message),
            429 => Error::rate_limit(error_message, retry_after),
            _ => Error::request(error_message, Some(status_code), None),
        }
    }

    async fn send(&self, inner: &Inner, prompt: &str) -> Result<String> {
        let api_key = inner.config.require_api_key()?;
        let url = endpoint(&inner.config.base_url, &inner.config.model, api_key)?;
        let body = GenerateContentRequest::from_prompt(prompt);
        let timeout = inner.config.timeout();

        let response = inner
            .client
            .post(url)
            .headers(Self::default_headers())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                // reqwest embeds the URL (and with it the key) in its messages.
                let e = e.without_url();
                if e.is_timeout() {
                    Error::timeout(
                        "request timed out; check the network connection",
                        Some(timeout.as_secs_f64()),
                    )
                } else {
                    Error::request(format!("{e}"), None, Some(Box::new(e)))
                }
            })?;

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        let response = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| {
                let e = e.without_url();
                if e.is_timeout() {
                    Error::timeout(
                        "request timed out while reading the response",
                        Some(timeout.as_secs_f64()),
                    )
                } else {
                    Error::serialization(
                        format!("failed to parse response: {e}"),
                        Some(Box::new(e)),
                    )
                }
            })?;

        response
            .first_text()
            .map(String::from)
            .ok_or_else(|| Error::empty_response("no valid response received from the model"))
    }
}

#[async_trait::async_trait]
impl Generator for Gemini {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let inner = self.snapshot();
        CLIENT_REQUESTS.click();
        let start = Instant::now();
        tracing::debug!(model = %inner.config.model, prompt_chars = prompt.chars().count(), "sending generateContent");
        let result = self.send(&inner, prompt).await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());
        match &result {
            Ok(text) => {
                tracing::debug!(response_chars = text.chars().count(), "generateContent succeeded")
            }
            Err(err) => {
                CLIENT_REQUEST_ERRORS.click();
                tracing::warn!(error = %err, "generateContent failed");
            }
        }
        result
    }

    fn response_language(&self) -> String {
        self.snapshot().config.language
    }

    fn is_configured(&self) -> bool {
        self.snapshot().config.has_api_key()
    }
}

/// Builds `{base_url}/{model}:generateContent?key={api_key}`.
pub fn endpoint(base_url: &str, model: &str, api_key: &str) -> Result<Url> {
    let mut url = Url::parse(base_url)?;
    url.path_segments_mut()
        .map_err(|_| Error::url(format!("base URL cannot be a base: {base_url}"), None))?
        .pop_if_empty()
        .push(&format!("{model}:generateContent"));
    url.query_pairs_mut().append_pair("key", api_key);
    Ok(url)
}

fn build_http_client(timeout: Duration) -> Result<ReqwestClient> {
    ReqwestClient::builder().timeout(timeout).build().map_err(|e| {
        Error::request(
            format!("failed to build HTTP client: {e}"),
            None,
            Some(Box::new(e)),
        )
    })
}
