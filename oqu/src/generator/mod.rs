//! Text generation backends
//!
//! The pipeline only needs "prompt in, raw text out". [`GeminiClient`]
//! talks to the hosted model with one API key; [`FailoverGenerator`] tries
//! a list of such clients in order.

pub mod failover;
pub mod gemini;

pub use failover::FailoverGenerator;
pub use gemini::GeminiClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default model id
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// One generation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: f32,
}

impl GenerationRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>, temperature: f32) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            temperature,
        }
    }
}

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Generator returned no text")]
    EmptyResponse,

    #[error("No API keys configured. Set GEMINI_API_KEY")]
    NoCredentials,

    #[error("All {attempts} API key(s) failed. Last error: {last}")]
    Exhausted {
        attempts: usize,
        last: Box<GenerateError>,
    },

    #[error("{0}")]
    Other(String),
}

/// Anything that turns a prompt into raw model text
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerateError>;
}

/// Split a `GEMINI_API_KEY`-style value into keys: comma separated,
/// trimmed, empties dropped
pub fn parse_api_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(String::from)
        .collect()
}
