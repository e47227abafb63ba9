use serde::{Deserialize, Serialize};

use crate::types::{Content, GenerationConfig};

/// Request body for `POST {model}:generateContent`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// The prompt.  Only the latest prompt is ever sent.
    pub contents: Vec<Content>,

    /// Sampling parameters.
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    /// Create a request carrying a single text prompt with default sampling.
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content::from_text(prompt)],
            generation_config: GenerationConfig::default(),
        }
    }
}
