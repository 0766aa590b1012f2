use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::error::PipelineError;

/// Default Generative Language API endpoint. Overridable per client section
/// so tests can point at a mock server.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub chunking: ChunkingConfig,
    pub retrieval: RetrievalConfig,
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ChunkingConfig {
    pub max_chars: usize,
    pub overlap_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chars: 1500,
            overlap_chars: 150,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k: usize,
    /// Minimum cosine similarity a chunk must reach to be handed to the
    /// model as context. 0.0 keeps every retrieved chunk.
    pub min_score: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 4,
            min_score: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub api_base: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gemini-pro".to_string(),
            temperature: 0.3,
            timeout_secs: 60,
            max_retries: 3,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub model: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub batch_size: usize,
    pub api_base: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "embedding-001".to_string(),
            timeout_secs: 30,
            max_retries: 3,
            batch_size: 64,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

/// Load configuration from a TOML file. A missing file yields the defaults
/// so the tool runs with zero configuration.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.chunking.max_chars == 0 {
        anyhow::bail!("chunking.max_chars must be > 0");
    }
    if config.chunking.overlap_chars >= config.chunking.max_chars {
        anyhow::bail!("chunking.overlap_chars must be < chunking.max_chars");
    }
    if config.retrieval.top_k < 1 {
        anyhow::bail!("retrieval.top_k must be >= 1");
    }
    if !(-1.0..=1.0).contains(&config.retrieval.min_score) {
        anyhow::bail!("retrieval.min_score must be in [-1.0, 1.0]");
    }
    if !(0.0..=2.0).contains(&config.llm.temperature) {
        anyhow::bail!("llm.temperature must be in [0.0, 2.0]");
    }
    if config.embedding.batch_size == 0 {
        anyhow::bail!("embedding.batch_size must be > 0");
    }
    Ok(())
}

/// Resolve the service API key from the environment (a `.env` file is
/// loaded at startup). Absence is fatal for processing and answering.
pub fn api_key() -> Result<String, PipelineError> {
    match std::env::var("GOOGLE_API_KEY") {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(PipelineError::MissingCredential),
    }
}
