//! Test doubles shared by unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::Semaphore;

use crate::client::Generator;
use crate::error::{Error, Result};
use crate::utils::sync::lock;

/// A generator that replays queued results and records every prompt.
///
/// A gated generator parks each call until the test adds a permit, which
/// keeps a request "in flight" for as long as the test needs.
pub(crate) struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String>>>,
    prompts: Mutex<Vec<String>>,
    gate: Option<Arc<Semaphore>>,
    configured: bool,
}

impl ScriptedGenerator {
    pub(crate) fn new<I>(replies: I) -> Self
    where
        I: IntoIterator<Item = Result<String>>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
            gate: None,
            configured: true,
        }
    }

    pub(crate) fn answering(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok(r.to_string())))
    }

    pub(crate) fn gated<I>(replies: I) -> (Self, Arc<Semaphore>)
    where
        I: IntoIterator<Item = Result<String>>,
    {
        let gate = Arc::new(Semaphore::new(0));
        let mut generator = Self::new(replies);
        generator.gate = Some(Arc::clone(&gate));
        (generator, gate)
    }

    pub(crate) fn unconfigured() -> Self {
        let mut generator = Self::new([]);
        generator.configured = false;
        generator
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }

    pub(crate) fn calls(&self) -> usize {
        lock(&self.prompts).len()
    }
}

#[async_trait::async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        lock(&self.prompts).push(prompt.to_string());
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate is never closed").forget();
        }
        lock(&self.replies)
            .pop_front()
            .unwrap_or_else(|| Err(Error::empty_response("script exhausted")))
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}
