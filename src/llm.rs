//! Language-model collaborator: the [`Generator`] trait and the
//! Gemini-backed implementation.
//!
//! Used for both condensing follow-up questions and generating grounded
//! answers; the prompt decides which. Temperature is kept low (0.3 by
//! default) to favor faithfulness over creativity. Retry policy matches the
//! embedding client: backoff on 429/5xx and network errors, immediate
//! failure on other 4xx.

use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::config::LlmConfig;

/// Produces text from a prompt. One implementation talks to the Gemini API;
/// tests substitute scripted stubs.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Chat model backed by the Google Generative Language API
/// (`POST /v1beta/models/{model}:generateContent`).
pub struct GeminiGenerator {
    client: reqwest::Client,
    api_base: String,
    model: String,
    api_key: String,
    temperature: f32,
    max_retries: u32,
}

impl GeminiGenerator {
    pub fn new(config: &LlmConfig, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            temperature: config.temperature,
            max_retries: config.max_retries,
        })
    }
}

#[async_trait]
impl Generator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.api_base, self.model, self.api_key
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "temperature": self.temperature },
        });

        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                tokio::time::sleep(delay).await;
            }

            let resp = self.client.post(&url).json(&body).send().await;

            match resp {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let json: serde_json::Value = response.json().await?;
                        let text = parse_candidate_text(&json)?;
                        debug!(model = %self.model, chars = text.len(), "generated text");
                        return Ok(text);
                    }

                    if status.as_u16() == 429 || status.is_server_error() {
                        let body_text = response.text().await.unwrap_or_default();
                        last_err = Some(anyhow!("LLM API error {}: {}", status, body_text));
                        continue;
                    }

                    let body_text = response.text().await.unwrap_or_default();
                    bail!("LLM API error {}: {}", status, body_text);
                }
                Err(e) => {
                    last_err = Some(e.into());
                    continue;
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow!("generation failed after retries")))
    }
}

/// Join the text parts of the first candidate in a generateContent response.
fn parse_candidate_text(json: &serde_json::Value) -> Result<String> {
    let parts = json
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .ok_or_else(|| anyhow!("invalid LLM response: no candidate content"))?;

    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect::<Vec<_>>()
        .join("");

    if text.is_empty() {
        bail!("invalid LLM response: candidate has no text");
    }
    Ok(text)
}
