//! Gemini generation client
//!
//! This module provides HTTP client functionality for the Google generative
//! language API with retry logic and error handling. Handlers depend on the
//! [`Generator`] trait so tests can substitute a stub client.

use crate::config::GeminiConfig;
use crate::{PlannerError, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest_middleware::ClientWithMiddleware;
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

/// A client able to turn a prompt into free text
#[async_trait]
pub trait Generator: Send + Sync {
    /// Send a single user-role message and return the model's text response
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Request body for `models/{model}:generateContent`
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// One message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

impl Content {
    /// A single user-role message holding the prompt
    #[must_use]
    pub fn user(text: &str) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

/// A text fragment of a message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

/// Fixed generation parameters sent with every request
#[derive(Debug, Clone, Serialize)]
pub struct GenerationConfig {
    pub temperature: f64,
}

/// Response body of `generateContent`
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// One candidate completion
#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: Content,
    #[serde(rename = "finishReason", default)]
    pub finish_reason: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate
    #[must_use]
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

/// Configured handle for the generative language API, constructed once at
/// startup and shared read-only across all requests
#[derive(Debug)]
pub struct GeminiClient {
    client: ClientWithMiddleware,
    base_url: String,
    model: String,
    api_key: String,
    temperature: f64,
}

impl GeminiClient {
    /// Build the client from configuration.
    ///
    /// A missing API key is the configuration failure the page reports once;
    /// the caller keeps the server running with generation disabled.
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            PlannerError::config("Gemini API key is not configured".to_string())
        })?;

        let timeout = Duration::from_secs(config.timeout_seconds.into());
        let inner = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("travel-planner/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PlannerError::config(format!("Failed to create HTTP client: {e}")))?;

        // Fixed exponential backoff with bounded attempts; transient failures
        // retry transparently inside the client
        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(
                Duration::from_secs(config.retry_initial_seconds),
                Duration::from_secs(config.retry_max_seconds),
            )
            .build_with_max_retries(config.max_retries);

        let client = reqwest_middleware::ClientBuilder::new(inner)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            temperature: config.temperature,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl Generator for GeminiClient {
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content::user(prompt)],
            generation_config: Some(GenerationConfig {
                temperature: self.temperature,
            }),
        };

        debug!("Sending generateContent request ({} chars)", prompt.len());
        let start_time = Instant::now();

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Generation request failed: {e}");
                PlannerError::generation(e.to_string())
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            error!("Gemini API authentication failed (HTTP {status})");
            return Err(PlannerError::generation(format!(
                "Gemini API rejected the API key (HTTP {status})"
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Gemini API returned HTTP {status}: {body}");
            return Err(PlannerError::generation(format!(
                "Gemini API request failed with status {status}: {body}"
            )));
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| {
            error!("Failed to parse generateContent response: {e}");
            PlannerError::generation(format!("Invalid response from Gemini API: {e}"))
        })?;

        let text = parsed.text();
        if text.is_empty() {
            return Err(PlannerError::generation(
                "Gemini API returned no candidates",
            ));
        }

        info!(
            "Generation completed in {:.3}s ({} chars)",
            start_time.elapsed().as_secs_f64(),
            text.len()
        );
        Ok(text)
    }
}
